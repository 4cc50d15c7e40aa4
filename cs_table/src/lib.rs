pub mod sampling_mask;
