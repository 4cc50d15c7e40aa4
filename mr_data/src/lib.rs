pub mod cfl;
pub mod fft;
