use serde::{Deserialize, Serialize};

/// gyromagnetic ratio of 1H in Hz/T
pub const GAMMA_1H:f64 = 42.576E6;

/// Hardware limits and timing grids that every event is built against. Gradients are handled
/// in Hz/m and slew rates in Hz/m/s.
#[derive(Clone,Debug,Serialize,Deserialize)]
pub struct SystemLimits {
    pub max_grad:f64,
    pub max_slew:f64,
    pub rf_ringdown_time:f64,
    pub rf_dead_time:f64,
    pub adc_dead_time:f64,
    pub grad_raster_time:f64,
    pub rf_raster_time:f64,
    pub adc_raster_time:f64,
    pub block_duration_raster:f64,
    pub gamma:f64,
}

impl SystemLimits {
    /// limits given in scanner units (mT/m and T/m/s)
    pub fn new(max_grad_mt_per_m:f64,max_slew_t_per_m_per_s:f64) -> Self {
        Self {
            max_grad: max_grad_mt_per_m*1E-3*GAMMA_1H,
            max_slew: max_slew_t_per_m_per_s*GAMMA_1H,
            ..Self::default()
        }
    }
    pub fn with_rf_timing(mut self,ringdown_time:f64,dead_time:f64) -> Self {
        self.rf_ringdown_time = ringdown_time;
        self.rf_dead_time = dead_time;
        self
    }
    pub fn with_adc_dead_time(mut self,dead_time:f64) -> Self {
        self.adc_dead_time = dead_time;
        self
    }
    pub fn with_grad_raster(mut self,raster:f64) -> Self {
        self.grad_raster_time = raster;
        self
    }
}

impl Default for SystemLimits {
    fn default() -> Self {
        Self {
            max_grad: 40E-3*GAMMA_1H,
            max_slew: 170.0*GAMMA_1H,
            rf_ringdown_time: 0.0,
            rf_dead_time: 0.0,
            adc_dead_time: 0.0,
            grad_raster_time: 10E-6,
            rf_raster_time: 1E-6,
            adc_raster_time: 100E-9,
            block_duration_raster: 10E-6,
            gamma: GAMMA_1H,
        }
    }
}
