use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use seq_tools::sequence::Sequence;
use seq_tools::SeqError;

#[derive(Error,Debug)]
pub enum SequenceLoadError {
    #[error("cannot access parameter file")]
    Io(#[from] std::io::Error),
    #[error("parameter file has an invalid format")]
    InvalidFormat(#[from] serde_json::Error),
}

#[derive(Error,Debug)]
pub enum SequenceBuildError {
    #[error("invalid sequence parameter: {0}")]
    InvalidParameter(String),
    #[error(transparent)]
    Event(#[from] SeqError),
}

/// Parameter sets that live in json files next to the sequence they describe
pub trait Initialize: Serialize + DeserializeOwned + Default {
    fn load(params_file:&Path) -> Result<Self,SequenceLoadError> {
        let mut f = File::open(params_file)?;
        let mut json_str = String::new();
        f.read_to_string(&mut json_str)?;
        Ok(serde_json::from_str(&json_str)?)
    }
    fn write(&self,params_file:&Path) -> Result<(),SequenceLoadError> {
        let str = serde_json::to_string_pretty(&self)?;
        let mut f = File::create(params_file)?;
        f.write_all(str.as_bytes())?;
        Ok(())
    }
    fn write_default(params_file:&Path) -> Result<(),SequenceLoadError> {
        Self::default().write(params_file)
    }
}

pub trait PulseSequence {
    fn name(&self) -> String;
    /// assemble the event blocks of the sequence in play-out order
    fn compile(&self) -> Result<Sequence,SequenceBuildError>;
    /// window (s) shown by the timing diagram
    fn plot_time_range(&self) -> (f64,f64);
}
