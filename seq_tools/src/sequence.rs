use std::fmt;
use crate::event_block::{Block, Event};
use crate::execution::{render_blocks, SequenceWaveforms};
use crate::hardware_constants::SystemLimits;
use crate::SeqError;
use utils::is_on_raster;

// relative slack allowed when comparing against hardware limits
const LIMIT_TOLERANCE:f64 = 1E-6;

/// a single violation found by the timing check
#[derive(Clone,Debug,PartialEq)]
pub struct TimingError {
    pub block:usize,
    pub event:String,
    pub description:String,
}

impl fmt::Display for TimingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f,"blk: {} {}: {}",self.block,self.event,self.description)
    }
}

#[derive(Clone,Debug,Default)]
pub struct TimingReport {
    pub errors:Vec<TimingError>
}

impl TimingReport {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Ordered list of blocks that play out back to back
#[derive(Clone,Debug)]
pub struct Sequence {
    system:SystemLimits,
    blocks:Vec<Block>,
}

impl Sequence {
    pub fn new(system:SystemLimits) -> Self {
        Self {
            system,
            blocks:vec![]
        }
    }

    pub fn system(&self) -> &SystemLimits {
        &self.system
    }

    pub fn add_block(&mut self,events:Vec<Event>) -> Result<(),SeqError> {
        let block = Block::new(events).map_err(|e| SeqError::Block{index:self.blocks.len(),source:Box::new(e)})?;
        self.blocks.push(block);
        Ok(())
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn n_blocks(&self) -> usize {
        self.blocks.len()
    }

    pub fn duration(&self) -> f64 {
        self.blocks.iter().map(|b| b.duration()).sum()
    }

    pub fn block_start_times(&self) -> Vec<f64> {
        let mut t = 0.0;
        self.blocks.iter().map(|b| {
            let start = t;
            t += b.duration();
            start
        }).collect()
    }

    /// Check every block and event against the raster grids and hardware limits. Violations are
    /// collected, never corrected
    pub fn check_timing(&self) -> TimingReport {
        let sys = &self.system;
        let mut errors = Vec::<TimingError>::new();
        for (i,block) in self.blocks.iter().enumerate() {
            let mut report = |event:&str,description:String| errors.push(TimingError{
                block:i,
                event:event.to_string(),
                description
            });
            if !is_on_raster(block.duration(),sys.block_duration_raster) {
                report("block",format!("duration {:.3} us is not aligned to the block raster of {} us",1E6*block.duration(),1E6*sys.block_duration_raster));
            }
            for event in block.events() {
                let label = event.label();
                match event {
                    Event::Grad(g) => {
                        if g.delay < 0.0 {
                            report(&label,format!("negative delay {} us",1E6*g.delay));
                        }
                        for (name,t) in [("delay",g.delay),("rise time",g.shape.rise_time),("flat time",g.shape.flat_time),("fall time",g.shape.fall_time)] {
                            if !is_on_raster(t,sys.grad_raster_time) {
                                report(&label,format!("{} {:.3} us is not aligned to the gradient raster",name,1E6*t));
                            }
                        }
                        if g.amplitude.abs() > sys.max_grad*(1.0 + LIMIT_TOLERANCE) {
                            report(&label,format!("amplitude {:.1} Hz/m exceeds the limit of {:.1} Hz/m",g.amplitude,sys.max_grad));
                        }
                        let slew = g.shape.max_slew(g.amplitude);
                        if slew > sys.max_slew*(1.0 + LIMIT_TOLERANCE) {
                            report(&label,format!("slew rate {:.1} Hz/m/s exceeds the limit of {:.1} Hz/m/s",slew,sys.max_slew));
                        }
                    }
                    Event::Rf(rf) => {
                        if rf.delay < rf.dead_time*(1.0 - LIMIT_TOLERANCE) {
                            report(&label,format!("delay {:.3} us is shorter than the rf dead time {:.3} us",1E6*rf.delay,1E6*rf.dead_time));
                        }
                        if !is_on_raster(rf.delay,sys.rf_raster_time) {
                            report(&label,format!("delay {:.3} us is not aligned to the rf raster",1E6*rf.delay));
                        }
                    }
                    Event::Adc(adc) => {
                        if adc.delay < adc.dead_time*(1.0 - LIMIT_TOLERANCE) {
                            report(&label,format!("delay {:.3} us is shorter than the adc dead time {:.3} us",1E6*adc.delay,1E6*adc.dead_time));
                        }
                        if !is_on_raster(adc.dwell,sys.adc_raster_time) {
                            report(&label,format!("dwell time {:.4} us is not aligned to the adc raster",1E6*adc.dwell));
                        }
                    }
                    Event::Delay(_) => {}
                }
            }
        }
        TimingReport{errors}
    }

    /// waveforms of the blocks overlapping the time range (s)
    pub fn waveforms(&self,time_range:(f64,f64)) -> SequenceWaveforms {
        render_blocks(&self.blocks,&self.block_start_times(),time_range)
    }
}
