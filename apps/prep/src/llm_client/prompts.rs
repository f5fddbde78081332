// Cross-cutting prompt fragments used by the client itself.
// Stage instructions live in pipeline/prompts.rs.

use crate::llm_client::OutputShape;

/// Instruction fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Renders the structured-output instruction appended to the system prompt
/// when a call requests a target shape.
pub fn structured_output_instruction(shape: &OutputShape) -> String {
    let fields = shape
        .fields
        .iter()
        .map(|f| format!("  \"{}\": \"string — {}\"", f.name, f.description))
        .collect::<Vec<_>>()
        .join(",\n");

    format!(
        "{JSON_ONLY_SYSTEM}\n\nReturn a JSON object with this EXACT schema (no extra fields):\n{{\n{fields}\n}}"
    )
}
