use serde::{Deserialize, Serialize};
use crate::hardware_constants::SystemLimits;
use crate::pulse::Trapezoid;
use crate::SeqError;
use utils::ceil_to_raster;

#[derive(Clone,Copy,Debug,PartialEq,Eq,Hash,Serialize,Deserialize)]
pub enum Channel{
    Read,
    Phase,
    Slice
}

impl Channel {
    pub fn axis(&self) -> &str {
        match &self {
            Channel::Read => "x",
            Channel::Phase => "y",
            Channel::Slice => "z",
        }
    }
}

/// A trapezoidal gradient on a single channel. Amplitude is in Hz/m
#[derive(Clone,Debug)]
pub struct GradEvent {
    pub channel:Channel,
    pub amplitude:f64,
    pub shape:Trapezoid,
    pub delay:f64,
}

impl GradEvent {
    pub fn new(channel:Channel,amplitude:f64,shape:Trapezoid) -> Self {
        Self {
            channel,
            amplitude,
            shape,
            delay:0.0
        }
    }

    /// gradient with a prescribed plateau area and duration. The ramp time is the fastest
    /// the slew limit allows unless given explicitly
    pub fn from_flat_area(channel:Channel,flat_area:f64,flat_time:f64,rise_time:Option<f64>,sys:&SystemLimits) -> Result<Self,SeqError> {
        if flat_time <= 0.0 {
            return Err(SeqError::InvalidTrapezoid(format!("flat time must be positive (got {})",flat_time)));
        }
        let amplitude = flat_area/flat_time;
        let rise_time = match rise_time {
            Some(rise) => rise,
            None => min_ramp(amplitude,sys)
        };
        check_amplitude(amplitude,sys)?;
        Ok(Self::new(channel,amplitude,Trapezoid::new(rise_time,flat_time)))
    }

    /// gradient with a prescribed total area played out over a fixed duration
    pub fn from_area_duration(channel:Channel,area:f64,duration:f64,sys:&SystemLimits) -> Result<Self,SeqError> {
        let dc = 1.0/sys.max_slew;
        let discriminant = duration.powi(2) - 4.0*area.abs()*dc;
        if discriminant < 0.0 {
            return Err(SeqError::InvalidTrapezoid(format!("requested area {} is too large for duration {}",area,duration)));
        }
        let trial_amplitude = (duration - discriminant.sqrt())/(2.0*dc);
        let rise_time = min_ramp(trial_amplitude,sys);
        let flat_time = duration - 2.0*rise_time;
        if flat_time < 0.0 {
            return Err(SeqError::InvalidTrapezoid(format!("duration {} is shorter than the ramps",duration)));
        }
        let amplitude = area/(duration - rise_time);
        check_amplitude(amplitude,sys)?;
        Ok(Self::new(channel,amplitude,Trapezoid::new(rise_time,flat_time)))
    }

    /// shortest triangle or trapezoid that reaches the area
    pub fn from_area(channel:Channel,area:f64,sys:&SystemLimits) -> Result<Self,SeqError> {
        let raster = sys.grad_raster_time;
        let mut rise_time = ceil_to_raster((area.abs()/sys.max_slew).sqrt(),raster).max(raster);
        let mut amplitude = area/rise_time;
        let mut t_eff = rise_time;
        if amplitude.abs() > sys.max_grad {
            t_eff = ceil_to_raster(area.abs()/sys.max_grad,raster);
            amplitude = area/t_eff;
            rise_time = min_ramp(amplitude,sys);
        }
        let flat_time = t_eff - rise_time;
        check_amplitude(amplitude,sys)?;
        Ok(Self::new(channel,amplitude,Trapezoid::new(rise_time,flat_time)))
    }

    pub fn area(&self) -> f64 {
        self.shape.area(self.amplitude)
    }

    pub fn flat_area(&self) -> f64 {
        self.shape.flat_area(self.amplitude)
    }

    pub fn rise_time(&self) -> f64 {
        self.shape.rise_time
    }

    pub fn duration(&self) -> f64 {
        self.delay + self.shape.duration()
    }

    /// (time, amplitude) corner points relative to the start of the block
    pub fn corners(&self) -> Vec<(f64,f64)> {
        let a = self.amplitude;
        self.shape.corner_times().iter().zip([0.0,a,a,0.0]).map(|(t,amp)| (t + self.delay,amp)).collect()
    }
}

fn min_ramp(amplitude:f64,sys:&SystemLimits) -> f64 {
    let raster = sys.grad_raster_time;
    ceil_to_raster(amplitude.abs()/sys.max_slew,raster).max(raster)
}

fn check_amplitude(amplitude:f64,sys:&SystemLimits) -> Result<(),SeqError> {
    if amplitude.abs() > sys.max_grad {
        Err(SeqError::AmplitudeViolation{amplitude,max:sys.max_grad})
    }else {
        Ok(())
    }
}
