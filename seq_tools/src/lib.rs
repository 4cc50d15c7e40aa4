pub mod hardware_constants;
pub mod pulse;
pub mod gradient_event;
pub mod rf_event;
pub mod acq_event;
pub mod event_block;
pub mod execution;
pub mod sequence;

use thiserror::Error;

#[derive(Error,Debug)]
pub enum SeqError {
    #[error("invalid trapezoid: {0}")]
    InvalidTrapezoid(String),
    #[error("gradient amplitude {amplitude:.1} Hz/m exceeds the system limit of {max:.1} Hz/m")]
    AmplitudeViolation{amplitude:f64,max:f64},
    #[error("delay must be finite and non-negative (got {0} s)")]
    InvalidDelay(f64),
    #[error("more than one {0} event in a block")]
    DuplicateEvent(String),
    #[error("cannot add block {index}")]
    Block{index:usize,#[source] source:Box<SeqError>},
}
