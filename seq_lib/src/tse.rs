use std::f64::consts::PI;
use serde::{Deserialize, Serialize};
use seq_tools::acq_event::AdcEvent;
use seq_tools::event_block::{calc_duration, Delay, Event};
use seq_tools::gradient_event::{Channel, GradEvent};
use seq_tools::hardware_constants::SystemLimits;
use seq_tools::rf_event::{RfEvent, RfUse, SliceSelectivePulse};
use seq_tools::sequence::Sequence;
use utils::{deg_to_rad, round_half_even};
use crate::pulse_sequence::{Initialize, PulseSequence, SequenceBuildError};

/// grid that the half echo time and the echo delay are snapped to
pub const ECHO_RASTER:f64 = 1E-4;

const RF_DURATION:f64 = 1E-3;
const RF_TIME_BW_PRODUCT:f64 = 4.0;
const RF_APODIZATION:f64 = 0.5;
const PHASE_ENCODE_TIME:f64 = 1E-3;
const PREWINDER_TIME:f64 = 1E-3;
const EXCITATION_SPOILER_TIME:f64 = 1.5E-3;
const INVERSION_PULSE_TIME:f64 = 1E-3;

#[derive(Clone,Copy,Debug,PartialEq,Serialize,Deserialize)]
pub enum PhaseEncodeOrder {
    Linear,
    Centric,
}

impl PhaseEncodeOrder {
    /// phase encode indices in acquisition order.
    /// linear: -n/2 .. n/2-1, centric: 0,-1,1,-2,2 ...
    pub fn steps(&self,n:usize) -> Vec<i64> {
        let n = n as i64;
        match self {
            PhaseEncodeOrder::Linear => (-n/2..n/2).collect(),
            PhaseEncodeOrder::Centric => (0..n).map(|i| if i%2 == 0 {i/2} else {-(i+1)/2}).collect(),
        }
    }
}

#[derive(Clone,Copy,Debug,PartialEq,Serialize,Deserialize)]
pub enum AdcPhaseMode {
    /// receiver phase follows the excitation phase
    SameAsExcitation,
    /// receiver phase advances by 180 degrees before every readout
    Alternating,
}

#[derive(Clone,Debug,Serialize,Deserialize)]
#[serde(default)]
pub struct TseParams {
    pub base_resolution:usize,
    pub echo_time:f64,
    pub inversion_time:f64,
    pub excitation_flip_angle:f64,
    pub excitation_phase:f64,
    pub adc_phase_mode:AdcPhaseMode,
    pub refocus_flip_angle:f64,
    pub refocus_phase:f64,
    pub r_spoil:f64,
    pub phase_encode_order:PhaseEncodeOrder,
    pub phase_grad_on:bool,
    pub read_grad_on:bool,
    pub fov:f64,
    pub slice_thickness:f64,
    pub dwell:f64,
    pub system:SystemLimits,
}

impl Default for TseParams {
    fn default() -> Self {
        Self {
            base_resolution: 64,
            echo_time: 10E-3,
            inversion_time: 0.0,
            excitation_flip_angle: 90.0,
            excitation_phase: 90.0,
            adc_phase_mode: AdcPhaseMode::SameAsExcitation,
            refocus_flip_angle: 180.0,
            refocus_phase: 0.0,
            r_spoil: 1.0,
            phase_encode_order: PhaseEncodeOrder::Linear,
            phase_grad_on: true,
            read_grad_on: true,
            fov: 200E-3,
            slice_thickness: 50E-3,
            dwell: 100E-6,
            system: SystemLimits::new(28.0,150.0)
                .with_rf_timing(20E-6,100E-6)
                .with_adc_dead_time(20E-6)
                .with_grad_raster(10E-6),
        }
    }
}

impl Initialize for TseParams {}

/// nearest multiple of the echo raster, ties to even
fn round_to_echo_raster(t:f64) -> f64 {
    round_half_even(t/ECHO_RASTER)*ECHO_RASTER
}

#[derive(Clone,Copy,Debug,PartialEq)]
pub struct EchoTiming {
    /// shortest achievable TE/2, on the echo raster
    pub min_half_echo:f64,
    /// padding inserted on both sides of every readout
    pub echo_delay:f64,
}

impl EchoTiming {
    fn new(min_half_echo:f64,echo_time:f64) -> Self {
        let min_half_echo = round_to_echo_raster(min_half_echo);
        let echo_delay = round_to_echo_raster((echo_time/2.0 - min_half_echo).max(0.0));
        Self {
            min_half_echo,
            echo_delay
        }
    }
    pub fn echo_time(&self) -> f64 {
        2.0*(self.min_half_echo + self.echo_delay)
    }
    /// requested TE was at or below the minimum
    pub fn is_clamped(&self) -> bool {
        self.echo_delay == 0.0
    }
}

struct TseEvents {
    excitation:SliceSelectivePulse,
    refocus:SliceSelectivePulse,
    readout:GradEvent,
    adc:AdcEvent,
    spoiler:GradEvent,
    prewinder:GradEvent,
    inversion:RfEvent,
}

pub struct Tse {
    params:TseParams,
    events:TseEvents,
    timing:EchoTiming,
}

impl Tse {
    pub fn new(params:TseParams) -> Result<Self,SequenceBuildError> {
        Self::validate(&params)?;
        let events = Self::events(&params)?;
        let sys = &params.system;
        let gp = GradEvent::from_area_duration(Channel::Phase,0.0,PHASE_ENCODE_TIME,sys)?;
        // one full refocusing period: refocusing pulse, readout and two phase encodes
        let half_min = (calc_duration(&[Event::from(events.refocus.gz.clone())])
            + calc_duration(&[Event::from(events.readout.clone())])
            + 2.0*calc_duration(&[Event::from(gp)]))/2.0;
        let timing = EchoTiming::new(half_min,params.echo_time);
        log::debug!("minimum TE/2 = {} s, echo delay = {} s",timing.min_half_echo,timing.echo_delay);
        Ok(Self {
            params,
            events,
            timing
        })
    }

    fn validate(params:&TseParams) -> Result<(),SequenceBuildError> {
        if params.base_resolution == 0 || params.base_resolution%2 != 0 {
            return Err(SequenceBuildError::InvalidParameter(format!("base resolution must be a positive even number (got {})",params.base_resolution)));
        }
        if params.echo_time < 0.0 || params.inversion_time < 0.0 {
            return Err(SequenceBuildError::InvalidParameter(String::from("echo and inversion times must not be negative")));
        }
        if params.fov <= 0.0 || params.slice_thickness <= 0.0 || params.dwell <= 0.0 {
            return Err(SequenceBuildError::InvalidParameter(String::from("fov, slice thickness and dwell time must be positive")));
        }
        Ok(())
    }

    fn events(params:&TseParams) -> Result<TseEvents,SequenceBuildError> {
        let sys = &params.system;
        let n_read = params.base_resolution;
        let read_flag = if params.read_grad_on {1.0} else {0.0};

        let excitation = RfEvent::sinc(
            deg_to_rad(params.excitation_flip_angle),
            deg_to_rad(params.excitation_phase),
            RF_DURATION,
            params.slice_thickness,
            RF_APODIZATION,
            RF_TIME_BW_PRODUCT,
            RfUse::Excitation,
            sys
        )?;

        let refocus = RfEvent::sinc(
            deg_to_rad(params.refocus_flip_angle),
            deg_to_rad(params.refocus_phase),
            RF_DURATION,
            params.slice_thickness,
            RF_APODIZATION,
            RF_TIME_BW_PRODUCT,
            RfUse::Refocusing,
            sys
        )?;

        let readout = GradEvent::from_flat_area(
            Channel::Read,
            n_read as f64/params.fov*read_flag,
            n_read as f64*params.dwell,
            Some(0.5*params.dwell),
            sys
        )?;

        let adc = AdcEvent::new(n_read,n_read as f64*params.dwell,0.0,excitation.rf.phase_offset,sys);

        let spoiler = GradEvent::from_area_duration(Channel::Read,(1.0 + params.r_spoil)*readout.area()/2.0,EXCITATION_SPOILER_TIME,sys)?;
        let prewinder = GradEvent::from_area_duration(Channel::Read,params.r_spoil*readout.area()/2.0,PREWINDER_TIME,sys)?;
        let inversion = RfEvent::block(PI,INVERSION_PULSE_TIME,RfUse::Inversion,sys);

        Ok(TseEvents {
            excitation,
            refocus,
            readout,
            adc,
            spoiler,
            prewinder,
            inversion
        })
    }

    pub fn params(&self) -> &TseParams {
        &self.params
    }

    pub fn echo_timing(&self) -> EchoTiming {
        self.timing
    }

    pub fn phase_encode_steps(&self) -> Vec<i64> {
        self.params.phase_encode_order.steps(self.params.base_resolution)
    }

    /// phase encode gradient areas (1/m) in acquisition order
    pub fn phase_encode_areas(&self) -> Vec<f64> {
        let flag = if self.params.phase_grad_on {1.0} else {0.0};
        self.phase_encode_steps().iter().map(|k| *k as f64/self.params.fov*flag).collect()
    }

    /// console line reporting the realized echo time
    pub fn echo_time_report(&self) -> String {
        let te_ms = 1E3*self.timing.echo_time();
        if self.timing.is_clamped() {
            format!("echo time set to minTE [ms] {}",te_ms)
        }else {
            format!(" TE [ms] {}",te_ms)
        }
    }
}

impl PulseSequence for Tse {
    fn name(&self) -> String {
        String::from("tse")
    }

    fn compile(&self) -> Result<Sequence,SequenceBuildError> {
        let sys = &self.params.system;
        let e = &self.events;
        let t = &self.timing;
        let mut seq = Sequence::new(sys.clone());

        // magnetization preparation
        if self.params.inversion_time > 0.0 {
            seq.add_block(vec![e.inversion.clone().into()])?;
            seq.add_block(vec![e.spoiler.clone().into()])?;
            seq.add_block(vec![Delay::new(self.params.inversion_time)?.into()])?;
        }

        seq.add_block(vec![e.excitation.rf.clone().into(),e.excitation.gz.clone().into()])?;
        seq.add_block(vec![e.spoiler.clone().into(),e.excitation.gz_rephase.clone().into()])?;

        // fill the remainder of TE/2 between the excitation and the first refocusing pulse
        let fill = (t.min_half_echo + t.echo_delay)
            - calc_duration(&[Event::from(e.excitation.gz.clone())])
            - calc_duration(&[Event::from(e.spoiler.clone())]);
        seq.add_block(vec![Delay::new(fill)?.into()])?;

        let mut adc = e.adc.clone();
        for area in self.phase_encode_areas() {
            let gp = GradEvent::from_area_duration(Channel::Phase,area,PHASE_ENCODE_TIME,sys)?;
            let gp_rewind = GradEvent::from_area_duration(Channel::Phase,-area,PHASE_ENCODE_TIME,sys)?;

            seq.add_block(vec![e.refocus.rf.clone().into(),e.refocus.gz.clone().into()])?;
            seq.add_block(vec![Delay::new(t.echo_delay)?.into()])?;
            seq.add_block(vec![e.prewinder.clone().into(),gp.into()])?;
            if self.params.adc_phase_mode == AdcPhaseMode::Alternating {
                adc.phase_offset += PI;
            }
            seq.add_block(vec![adc.clone().into(),e.readout.clone().into()])?;
            seq.add_block(vec![e.prewinder.clone().into(),gp_rewind.into()])?;
            seq.add_block(vec![Delay::new(t.echo_delay)?.into()])?;
        }
        log::info!("tse compiled with {} blocks, duration {:.4} s",seq.n_blocks(),seq.duration());
        Ok(seq)
    }

    fn plot_time_range(&self) -> (f64,f64) {
        let ti = self.params.inversion_time;
        (ti,ti + 2.5*self.params.echo_time)
    }
}

/// number of refocusing blocks in a compiled sequence
pub fn count_refocusing_blocks(seq:&Sequence) -> usize {
    seq.blocks().iter().filter(|b| b.rf().map(|rf| rf.rf_use == RfUse::Refocusing).unwrap_or(false)).count()
}

/// receiver phases of every readout in play-out order
pub fn adc_phases(seq:&Sequence) -> Vec<f64> {
    seq.blocks().iter().flat_map(|b| b.adc().map(|adc| adc.phase_offset)).collect()
}
