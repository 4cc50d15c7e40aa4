use std::ops::Range;
use ndarray::{Array3, Axis};
use num_complex::Complex32;
use rand::Rng;
use thiserror::Error;
use utils::round_half_even;

/// fraction of the phase encodes fully sampled at 4x, scaled by 4/R for other accelerations
pub const CENTER_FRACTION_AT_4X:f64 = 0.06;

#[derive(Error,Debug,PartialEq)]
pub enum MaskError {
    #[error("acceleration {0} cannot be reached with the requested center band")]
    InvalidAcceleration(f64),
    #[error("center fraction must lie in [0,1] (got {0})")]
    InvalidCenterFraction(f64),
    #[error("mask has {expected} phase encodes but the data has {found}")]
    ShapeMismatch{expected:usize,found:usize},
}

/// One flag per phase encode column. Flags broadcast over the read and channel axes
#[derive(Clone,Debug,PartialEq)]
pub struct SamplingMask {
    flags:Vec<bool>,
    center:Range<usize>,
}

impl SamplingMask {
    /// fully sampled
    pub fn ones(n_cols:usize) -> Self {
        Self {
            flags:vec![true;n_cols],
            center:0..n_cols,
        }
    }

    /// center fraction that goes with an acceleration factor
    pub fn center_fraction(acceleration:f64) -> f64 {
        CENTER_FRACTION_AT_4X*4.0/acceleration
    }

    /// Equispaced mask with a fully sampled center band. The spacing of the outer lines is
    /// adjusted so that center and outer lines together hit the acceleration on average. An
    /// acceleration of 1 or less gives a fully sampled mask
    pub fn equispaced(n_cols:usize,acceleration:f64,center_fraction:f64,offset:usize) -> Result<Self,MaskError> {
        if !acceleration.is_finite() || acceleration <= 0.0 {
            return Err(MaskError::InvalidAcceleration(acceleration));
        }
        if acceleration <= 1.0 {
            return Ok(Self::ones(n_cols));
        }
        let center = center_band(n_cols,center_fraction)?;
        let spacing = adjusted_spacing(n_cols,center.len(),acceleration)?;

        let mut flags = vec![false;n_cols];
        flags[center.clone()].iter_mut().for_each(|f| *f = true);
        let stop = n_cols.saturating_sub(1) as f64;
        let mut k = 0;
        loop {
            let pos = offset as f64 + k as f64*spacing;
            if pos >= stop {break}
            flags[round_half_even(pos) as usize] = true;
            k += 1;
        }
        let mask = Self{flags,center};
        log::debug!("equispaced mask: {} of {} lines, effective acceleration {:.3}",mask.n_sampled(),n_cols,mask.acceleration());
        Ok(mask)
    }

    /// equispaced mask whose offset is drawn uniformly from [0, round(spacing))
    pub fn equispaced_random<R:Rng>(n_cols:usize,acceleration:f64,center_fraction:f64,rng:&mut R) -> Result<Self,MaskError> {
        if acceleration > 1.0 {
            let center = center_band(n_cols,center_fraction)?;
            let spacing = adjusted_spacing(n_cols,center.len(),acceleration)?;
            let offset = rng.gen_range(0..offset_bound(spacing));
            log::debug!("mask offset {}",offset);
            Self::equispaced(n_cols,acceleration,center_fraction,offset)
        }else {
            Self::equispaced(n_cols,acceleration,center_fraction,0)
        }
    }

    pub fn flags(&self) -> &[bool] {
        &self.flags
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    pub fn center(&self) -> Range<usize> {
        self.center.clone()
    }

    pub fn n_sampled(&self) -> usize {
        self.flags.iter().filter(|f| **f).count()
    }

    pub fn acceleration(&self) -> f64 {
        self.len() as f64/self.n_sampled() as f64
    }

    /// zero the unsampled phase encodes (axis 1) of every read line and channel
    pub fn apply(&self,ksp:&Array3<Complex32>) -> Result<Array3<Complex32>,MaskError> {
        let n_phase = ksp.shape()[1];
        if n_phase != self.len() {
            return Err(MaskError::ShapeMismatch{expected:self.len(),found:n_phase});
        }
        let mut out = ksp.clone();
        out.axis_iter_mut(Axis(1)).zip(self.flags.iter()).for_each(|(mut lane,keep)| {
            if !keep {
                lane.fill(Complex32::new(0.0,0.0));
            }
        });
        Ok(out)
    }
}

fn center_band(n_cols:usize,center_fraction:f64) -> Result<Range<usize>,MaskError> {
    if !(0.0..=1.0).contains(&center_fraction) {
        return Err(MaskError::InvalidCenterFraction(center_fraction));
    }
    let n_low = round_half_even(n_cols as f64*center_fraction) as usize;
    let pad = (n_cols - n_low + 1)/2;
    Ok(pad..pad + n_low)
}

fn adjusted_spacing(n_cols:usize,n_low:usize,acceleration:f64) -> Result<f64,MaskError> {
    let denom = n_low as f64*acceleration - n_cols as f64;
    let spacing = acceleration*(n_low as f64 - n_cols as f64)/denom;
    if denom == 0.0 || !spacing.is_finite() || spacing < 1.0 {
        return Err(MaskError::InvalidAcceleration(acceleration));
    }
    Ok(spacing)
}

/// exclusive upper bound of the random mask offset, round(spacing) with ties to even
fn offset_bound(spacing:f64) -> usize {
    (round_half_even(spacing) as usize).max(1)
}
