use std::fmt;

use serde::{Deserialize, Serialize};

/// Structured fields extracted from a freeform job description.
///
/// Accepts the `job_`-prefixed field names as well, since models occasionally
/// echo the label from the instruction instead of the key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobBreakdown {
    #[serde(alias = "job_title")]
    pub title: String,
    #[serde(alias = "job_description")]
    pub description: String,
    #[serde(alias = "job_requirements")]
    pub requirements: String,
}

/// Textual rendering used both in the message log and as the summarizer's input.
impl fmt::Display for JobBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Job Title: {}", self.title)?;
        writeln!(f, "Job Description: {}", self.description)?;
        write!(f, "Job Requirements: {}", self.requirements)
    }
}
