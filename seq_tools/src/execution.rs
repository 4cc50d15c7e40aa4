use serde::Serialize;
use crate::event_block::Block;
use crate::gradient_event::Channel;

#[derive(Debug,Clone,Default,Serialize)]
pub struct PlotTrace {
    pub x:Vec<f64>,
    pub y:Vec<f64>
}

impl PlotTrace {
    pub fn push(&mut self,x:f64,y:f64) {
        self.x.push(x);
        self.y.push(y);
    }
    pub fn points(&self) -> impl Iterator<Item=(f64,f64)> + '_ {
        self.x.iter().cloned().zip(self.y.iter().cloned())
    }
}

/// Waveforms of a sequence inside a time window, in absolute sequence time (s)
#[derive(Debug,Clone,Default,Serialize)]
pub struct SequenceWaveforms {
    pub time_range:(f64,f64),
    /// adc sample times
    pub adc:Vec<f64>,
    /// rf magnitude in Hz
    pub rf_magnitude:PlotTrace,
    /// rf phase in radians, one trace per pulse
    pub rf_phase:Vec<PlotTrace>,
    /// gradients in Hz/m
    pub gx:PlotTrace,
    pub gy:PlotTrace,
    pub gz:PlotTrace,
}

/// render the blocks that overlap the time range. block_starts gives the absolute start of every
/// block
pub fn render_blocks(blocks:&[Block],block_starts:&[f64],time_range:(f64,f64)) -> SequenceWaveforms {
    let mut w = SequenceWaveforms {
        time_range,
        ..Default::default()
    };
    for (block,t0) in blocks.iter().zip(block_starts.iter()) {
        let t0 = *t0;
        if t0 + block.duration() < time_range.0 || t0 > time_range.1 {
            continue;
        }
        if let Some(adc) = block.adc() {
            w.adc.extend(adc.sample_times().iter().map(|t| t0 + t));
        }
        if let Some(rf) = block.rf() {
            let start = t0 + rf.delay;
            let mut phase = PlotTrace::default();
            w.rf_magnitude.push(start,0.0);
            rf.signal.iter().zip(rf.t.iter()).for_each(|(s,t)| {
                let theta = rf.phase_offset + 2.0*std::f64::consts::PI*t*rf.freq_offset;
                let (re,im) = (s*theta.cos(),s*theta.sin());
                w.rf_magnitude.push(start + t,s.abs());
                phase.push(start + t,im.atan2(re));
            });
            w.rf_magnitude.push(start + rf.shape_dur,0.0);
            w.rf_phase.push(phase);
        }
        for channel in [Channel::Read,Channel::Phase,Channel::Slice] {
            if let Some(g) = block.grad(channel) {
                let trace = match channel {
                    Channel::Read => &mut w.gx,
                    Channel::Phase => &mut w.gy,
                    Channel::Slice => &mut w.gz,
                };
                g.corners().iter().for_each(|(t,a)| trace.push(t0 + t,*a));
            }
        }
    }
    w
}
