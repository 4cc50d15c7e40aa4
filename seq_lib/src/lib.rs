pub mod pulse_sequence;
pub mod tse;
