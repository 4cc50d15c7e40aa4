use std::path::{Path, PathBuf};
use crate::ReconError;

pub const TOOLBOX_VARS:[&str;2] = ["BART_TOOLBOX_PATH","TOOLBOX_PATH"];

/// Location of a bart installation. Checked before any data is touched
#[derive(Clone,Debug,PartialEq)]
pub struct BartToolbox {
    root:PathBuf,
}

impl BartToolbox {
    /// first of BART_TOOLBOX_PATH and TOOLBOX_PATH that is set and exists
    pub fn from_env() -> Result<Self,ReconError> {
        Self::resolve(|var| std::env::var(var).ok())
    }

    /// resolve with a custom variable lookup
    pub fn resolve<F>(lookup:F) -> Result<Self,ReconError>
        where F:Fn(&str) -> Option<String> {
        for var in TOOLBOX_VARS {
            if let Some(value) = lookup(var) {
                let root = PathBuf::from(&value);
                if root.exists() {
                    log::info!("using bart toolbox at {:?} ({})",root,var);
                    return Ok(Self{root})
                }
                log::debug!("{} points to missing path {:?}",var,root);
            }
        }
        Err(ReconError::Config(String::from("BART_TOOLBOX_PATH is not set correctly!")))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}
