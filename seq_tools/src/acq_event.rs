use crate::hardware_constants::SystemLimits;

/// Acquisition window. Phase offset is in radians
#[derive(Clone,Debug)]
pub struct AdcEvent {
    pub num_samples:usize,
    pub dwell:f64,
    pub delay:f64,
    pub freq_offset:f64,
    pub phase_offset:f64,
    pub dead_time:f64,
}

impl AdcEvent {
    /// acquisition of `num_samples` spread over `duration`. The delay is pushed out to the
    /// adc dead time if it is shorter
    pub fn new(num_samples:usize,duration:f64,delay:f64,phase_offset:f64,sys:&SystemLimits) -> Self {
        let delay = if delay < sys.adc_dead_time {
            log::debug!("adc delay {} raised to the dead time {}",delay,sys.adc_dead_time);
            sys.adc_dead_time
        }else {
            delay
        };
        Self {
            num_samples,
            dwell:duration/num_samples as f64,
            delay,
            freq_offset:0.0,
            phase_offset,
            dead_time:sys.adc_dead_time,
        }
    }

    pub fn sample_time(&self) -> f64 {
        self.num_samples as f64*self.dwell
    }

    pub fn duration(&self) -> f64 {
        self.delay + self.sample_time() + self.dead_time
    }

    /// sample times relative to the block start, at the center of each dwell interval
    pub fn sample_times(&self) -> Vec<f64> {
        (0..self.num_samples).map(|i| self.delay + (i as f64 + 0.5)*self.dwell).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_clamped_to_dead_time() {
        let sys = SystemLimits::default().with_adc_dead_time(20E-6);
        let adc = AdcEvent::new(64,6.4E-3,0.0,0.0,&sys);
        assert!((adc.delay - 20E-6).abs() < 1E-12);
        assert!((adc.dwell - 100E-6).abs() < 1E-12);
        assert!((adc.duration() - 6.44E-3).abs() < 1E-12);
        assert_eq!(adc.sample_times().len(),64);
    }
}
