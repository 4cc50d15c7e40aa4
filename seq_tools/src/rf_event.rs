use std::f64::consts::PI;
use crate::gradient_event::{Channel, GradEvent};
use crate::hardware_constants::SystemLimits;
use crate::pulse::{Hardpulse, Pulse, SincPulse};
use crate::SeqError;
use utils::ceil_to_raster;

#[derive(Clone,Copy,Debug,PartialEq)]
pub enum RfUse {
    Excitation,
    Refocusing,
    Inversion,
}

/// An rf pulse sampled on the rf raster. Signal amplitude is in Hz and phase offset in radians
#[derive(Clone,Debug)]
pub struct RfEvent {
    pub signal:Vec<f64>,
    pub t:Vec<f64>,
    pub shape_dur:f64,
    pub delay:f64,
    pub freq_offset:f64,
    pub phase_offset:f64,
    pub dead_time:f64,
    pub ringdown_time:f64,
    pub rf_use:RfUse,
}

/// slice selective pulse with its slice-select gradient and the rephaser that
/// follows it
pub struct SliceSelectivePulse {
    pub rf:RfEvent,
    pub gz:GradEvent,
    pub gz_rephase:GradEvent,
}

impl RfEvent {
    fn from_pulse(pulse:&dyn Pulse,flip_angle:f64,phase_offset:f64,rf_use:RfUse,sys:&SystemLimits) -> Self {
        let dwell = sys.rf_raster_time;
        let flip = 2.0*PI*pulse.power_net(dwell);
        let signal = pulse.render(dwell).iter().map(|s| s*flip_angle/flip).collect();
        Self {
            signal,
            t:pulse.sample_times(dwell),
            shape_dur:pulse.duration(),
            delay:sys.rf_dead_time,
            freq_offset:0.0,
            phase_offset,
            dead_time:sys.rf_dead_time,
            ringdown_time:sys.rf_ringdown_time,
            rf_use,
        }
    }

    /// Slice selective apodized sinc. flip angle and phase are in radians, slice thickness in m
    pub fn sinc(flip_angle:f64,phase_offset:f64,duration:f64,slice_thickness:f64,apodization:f64,time_bw_product:f64,rf_use:RfUse,sys:&SystemLimits) -> Result<SliceSelectivePulse,SeqError> {
        let pulse = SincPulse::new(duration,time_bw_product,apodization);
        let mut rf = Self::from_pulse(&pulse,flip_angle,phase_offset,rf_use,sys);

        let amplitude = pulse.grad_strength_hzpm(slice_thickness);
        let area = amplitude*duration;
        let mut gz = GradEvent::from_flat_area(Channel::Slice,area,duration,None,sys)?;
        let center_pos = pulse.center_pos();
        let gzr_area = -gz.area()*(1.0 - center_pos) - 0.5*(gz.area() - gz.flat_area());
        let gz_rephase = GradEvent::from_area(Channel::Slice,gzr_area,sys)?;

        // align the pulse with the flat top of the slice select gradient
        if rf.delay > gz.rise_time() {
            gz.delay = ceil_to_raster(rf.delay - gz.rise_time(),sys.grad_raster_time);
        }
        if rf.delay < gz.rise_time() + gz.delay {
            rf.delay = gz.rise_time() + gz.delay;
        }
        Ok(SliceSelectivePulse{rf,gz,gz_rephase})
    }

    /// non-selective rectangular pulse
    pub fn block(flip_angle:f64,duration:f64,rf_use:RfUse,sys:&SystemLimits) -> Self {
        Self::from_pulse(&Hardpulse::new(duration),flip_angle,0.0,rf_use,sys)
    }

    pub fn duration(&self) -> f64 {
        self.delay + self.shape_dur + self.ringdown_time
    }

    /// realized flip angle in radians
    pub fn flip_angle(&self,dwell:f64) -> f64 {
        self.signal.iter().sum::<f64>()*dwell*2.0*PI
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fig3_system() -> SystemLimits {
        SystemLimits::new(28.0,150.0).with_rf_timing(20E-6,100E-6)
    }

    #[test]
    fn sinc_timing_aligns_with_gradient() {
        let sys = fig3_system();
        let ss = RfEvent::sinc(PI/2.0,PI/2.0,1E-3,50E-3,0.5,4.0,RfUse::Excitation,&sys).unwrap();
        // rf starts after the dead time, the gradient plateau starts with it
        assert!((ss.rf.delay - 100E-6).abs() < 1E-12);
        assert!((ss.gz.delay + ss.gz.rise_time() - ss.rf.delay).abs() < 1E-12);
        assert!((ss.rf.duration() - 1.12E-3).abs() < 1E-12);
        assert!((ss.gz.duration() - 1.12E-3).abs() < 1E-12);
        assert!((ss.rf.flip_angle(sys.rf_raster_time) - PI/2.0).abs() < 1E-9);
    }

    #[test]
    fn rephaser_cancels_half_the_slice_select() {
        let sys = fig3_system();
        let ss = RfEvent::sinc(PI,0.0,1E-3,50E-3,0.5,4.0,RfUse::Refocusing,&sys).unwrap();
        let expected = -ss.gz.area()*0.5 - 0.5*(ss.gz.area() - ss.gz.flat_area());
        assert!((ss.gz_rephase.area() - expected).abs() < 1E-9);
    }

    #[test]
    fn block_pulse_is_flat() {
        let sys = fig3_system();
        let rf = RfEvent::block(PI,1E-3,RfUse::Inversion,&sys);
        assert_eq!(rf.signal.len(),1000);
        assert!((rf.signal[0] - 500.0).abs() < 1E-9);
        assert!(rf.signal.iter().all(|s| (s - 500.0).abs() < 1E-9));
        assert!((rf.flip_angle(sys.rf_raster_time) - PI).abs() < 1E-9);
    }
}
