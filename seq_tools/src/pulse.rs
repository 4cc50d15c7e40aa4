/*
 A pulse (in this module) is a normalized waveform shape. RF shapes are rendered on a fixed
 raster and scaled to a flip angle by the rf event that owns them. Gradient shapes are
 described by their corner points.
 */

use std::f64::consts::PI;

pub trait Pulse {
    fn duration(&self) -> f64;
    fn n_samples(&self,dwell:f64) -> usize {
        (self.duration()/dwell).round() as usize
    }
    /// sample times at the middle of each raster interval
    fn sample_times(&self,dwell:f64) -> Vec<f64> {
        (0..self.n_samples(dwell)).map(|i| (i as f64 + 0.5)*dwell).collect()
    }
    /// un-scaled waveform sampled on the raster
    fn render(&self,dwell:f64) -> Vec<f64>;
    /// integral of the rendered waveform
    fn power_net(&self,dwell:f64) -> f64 {
        self.render(dwell).iter().sum::<f64>()*dwell
    }
}

#[derive(Clone,Copy,Debug,PartialEq)]
pub struct Trapezoid {
    pub rise_time:f64,
    pub flat_time:f64,
    pub fall_time:f64,
}

impl Trapezoid {
    pub fn new(ramp_time:f64,flat_time:f64) -> Trapezoid {
        Trapezoid{rise_time:ramp_time,flat_time,fall_time:ramp_time}
    }
    pub fn duration(&self) -> f64 {
        self.rise_time + self.flat_time + self.fall_time
    }
    pub fn area(&self,amplitude:f64) -> f64 {
        amplitude*(self.flat_time + 0.5*(self.rise_time + self.fall_time))
    }
    pub fn flat_area(&self,amplitude:f64) -> f64 {
        amplitude*self.flat_time
    }
    /// times of the four corners relative to the start of the shape
    pub fn corner_times(&self) -> [f64;4] {
        [
            0.0,
            self.rise_time,
            self.rise_time + self.flat_time,
            self.duration()
        ]
    }
    /// the steepest ramp of the shape for a given amplitude
    pub fn max_slew(&self,amplitude:f64) -> f64 {
        let steepest = self.rise_time.min(self.fall_time);
        if steepest > 0.0 {amplitude.abs()/steepest} else if amplitude == 0.0 {0.0} else {f64::INFINITY}
    }
}

#[derive(Clone,Copy,Debug)]
pub struct Hardpulse {
    duration:f64
}

impl Hardpulse {
    pub fn new(duration:f64) -> Hardpulse {
        Hardpulse{duration}
    }
}

impl Pulse for Hardpulse {
    fn duration(&self) -> f64 {
        self.duration
    }
    fn render(&self,dwell:f64) -> Vec<f64> {
        vec![1.0;self.n_samples(dwell)]
    }
}

/// apodized sinc, the shape of a slice selective pulse
#[derive(Clone,Copy,Debug)]
pub struct SincPulse {
    duration:f64,
    time_bw_product:f64,
    apodization:f64,
    center_pos:f64,
}

impl SincPulse {
    pub fn new(duration:f64,time_bw_product:f64,apodization:f64) -> Self {
        Self {
            duration,
            time_bw_product,
            apodization,
            center_pos:0.5
        }
    }
    pub fn bandwidth_hz(&self) -> f64 {
        self.time_bw_product/self.duration
    }
    pub fn center_pos(&self) -> f64 {
        self.center_pos
    }
    pub fn grad_strength_hzpm(&self,slice_thickness:f64) -> f64 {
        self.bandwidth_hz()/slice_thickness
    }
}

impl Pulse for SincPulse {
    fn duration(&self) -> f64 {
        self.duration
    }
    fn render(&self,dwell:f64) -> Vec<f64> {
        let bw = self.bandwidth_hz();
        let a = self.apodization;
        self.sample_times(dwell).iter().map(|t| {
            let tt = t - self.duration*self.center_pos;
            let window = 1.0 - a + a*(2.0*PI*tt/self.duration).cos();
            window*sinc(bw*tt)
        }).collect()
    }
}

/// normalized sinc: sin(pi x)/(pi x)
pub fn sinc(x:f64) -> f64 {
    if x == 0.0 {
        1.0
    }else {
        (PI*x).sin()/(PI*x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trapezoid_area() {
        let t = Trapezoid::new(50E-6,6.4E-3);
        let area = t.area(50_000.0);
        assert!((area - 322.5).abs() < 1E-9);
        assert!((t.flat_area(50_000.0) - 320.0).abs() < 1E-9);
        assert!((t.duration() - 6.5E-3).abs() < 1E-12);
    }

    #[test]
    fn sinc_shape_is_symmetric_and_peaks_at_center() {
        let p = SincPulse::new(1E-3,4.0,0.5);
        let w = p.render(1E-6);
        assert_eq!(w.len(),1000);
        for i in 0..500 {
            assert!((w[i] - w[999-i]).abs() < 1E-9);
        }
        let max = w.iter().cloned().fold(f64::MIN,f64::max);
        assert!((max - w[499]).abs() < 1E-12);
        assert!((p.bandwidth_hz() - 4000.0).abs() < 1E-9);
    }

    #[test]
    fn hardpulse_power() {
        let p = Hardpulse::new(1E-3);
        assert!((p.power_net(1E-6) - 1E-3).abs() < 1E-12);
    }
}
