pub mod job;
pub mod turn;
