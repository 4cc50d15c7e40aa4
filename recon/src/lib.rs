pub mod bart_wrapper;
pub mod recon_config;
pub mod whiten;
pub mod coil_combine;
pub mod brain_mask;
pub mod metrics;

use thiserror::Error;

#[derive(Error,Debug)]
pub enum ReconError {
    #[error("{0}")]
    Config(String),
    #[error("shape mismatch: {0:?} vs {1:?}")]
    ShapeMismatch(Vec<usize>,Vec<usize>),
    #[error("noise whitening failed: {0}")]
    Whitening(String),
    #[error("reference image has zero range but differs from the prediction (rmse {rmse})")]
    DegenerateRange{rmse:f64},
}
