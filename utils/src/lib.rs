use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use std::sync::Arc;
use rustfft::{Fft, FftDirection, FftPlanner};
use num_complex::Complex;

// tolerance used when deciding if a time sits on a raster grid
const RASTER_EPS:f64 = 1E-9;

/// round a time value to the nearest multiple of the raster
pub fn round_to_raster(t:f64,raster:f64) -> f64 {
    (t/raster).round()*raster
}

/// round a time value up to the next multiple of the raster. Values already on the raster
/// are returned unchanged
pub fn ceil_to_raster(t:f64,raster:f64) -> f64 {
    ((t/raster) - RASTER_EPS).ceil()*raster
}

pub fn is_on_raster(t:f64,raster:f64) -> bool {
    let n = t/raster;
    (n - n.round()).abs() < 1E-6
}

/// round to nearest integer with ties going to the even neighbor (banker's rounding)
pub fn round_half_even(x:f64) -> f64 {
    x.round_ties_even()
}

pub fn deg_to_rad(degrees:f64) -> f64 {
    degrees*std::f64::consts::PI/180.0
}

/// shift zero-frequency to the center of the vector
pub fn fftshift<T>(x:&mut [T]) {
    let n = x.len();
    x.rotate_right(n/2);
}

/// inverse of fftshift. Identical to fftshift for even lengths
pub fn ifftshift<T>(x:&mut [T]) {
    let n = x.len();
    x.rotate_left(n/2);
}

#[derive(Clone,Copy,Debug,PartialEq)]
pub enum FftNorm {
    /// forward transform is not scaled, inverse is scaled by 1/n
    Backward,
    /// both directions are scaled by 1/sqrt(n)
    Ortho,
}

/// a planned 1-D transform that treats the zero-frequency sample as sitting at the
/// center of the line
pub struct CenteredFft {
    fft:Arc<dyn Fft<f32>>,
    n:usize,
    scale:f32,
    direction:FftDirection,
}

impl CenteredFft {
    pub fn new(planner:&mut FftPlanner<f32>,n:usize,direction:FftDirection,norm:FftNorm) -> Self {
        let fft = planner.plan_fft(n,direction);
        let scale = match (norm,direction) {
            (FftNorm::Ortho,_) => 1.0/(n as f32).sqrt(),
            (FftNorm::Backward,FftDirection::Inverse) => 1.0/n as f32,
            (FftNorm::Backward,FftDirection::Forward) => 1.0,
        };
        Self {
            fft,
            n,
            scale,
            direction
        }
    }

    pub fn len(&self) -> usize {
        self.n
    }

    /// transform a line in place. The line length must match the planned length
    pub fn process(&self,line:&mut [Complex<f32>]) {
        assert_eq!(line.len(),self.n,"line length does not match planned fft length");
        // numpy convention: fftshift the input for the forward pass of an inverse transform
        match self.direction {
            FftDirection::Inverse => fftshift(line),
            FftDirection::Forward => ifftshift(line),
        }
        self.fft.process(line);
        match self.direction {
            FftDirection::Inverse => ifftshift(line),
            FftDirection::Forward => fftshift(line),
        }
        if self.scale != 1.0 {
            line.iter_mut().for_each(|e| *e *= self.scale);
        }
    }
}

/// Invoke inkscape to render a figure template to a pdf. The call is fire-and-forget: a
/// failure to launch is logged and the exit status is returned without inspection.
pub fn inkscape_export(template:&Path,output:&Path,working_dir:&Path) -> Option<ExitStatus> {
    let mut cmd = Command::new("inkscape");
    cmd.arg(format!("--export-filename={}",output.display()))
        .arg(template)
        .current_dir(working_dir);
    log::info!("{:?}",cmd);
    match cmd.status() {
        Ok(status) => {
            if !status.success() {
                log::warn!("inkscape exited with {}",status);
            }
            Some(status)
        }
        Err(e) => {
            log::warn!("failed to launch inkscape: {}",e);
            None
        }
    }
}

/// directory holding the running executable. Falls back to the working directory
pub fn exe_dir() -> PathBuf {
    std::env::current_exe().ok()
        .and_then(|exe| exe.parent().map(|p| p.to_owned()))
        .unwrap_or_else(|| PathBuf::from("."))
}
