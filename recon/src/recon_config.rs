use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use crate::ReconError;

pub trait ConfigFile: Sized {
    fn to_file(&self,filename:&Path) -> Result<(),ReconError>;
    fn from_file(filename:&Path) -> Result<Self,ReconError>;
}

/// Settings of the masking experiment. Defaults reproduce the published figure
#[derive(Clone,Debug,Serialize,Deserialize,PartialEq)]
#[serde(default)]
pub struct MaskingSettings {
    /// k-space cfl base relative to the executable directory
    pub kspace:PathBuf,
    pub slice:usize,
    pub acceleration:f64,
    /// fixed offset of the outer lines. Drawn at random when absent
    pub mask_offset:Option<usize>,
    /// seed for the offset draw
    pub mask_seed:Option<u64>,
    pub crop_vertical:f64,
    pub crop_horizontal:f64,
    pub brain_threshold:f64,
    pub hole_structure:usize,
    pub erosion_structure:usize,
    pub loose_padding:usize,
    pub frame_width:usize,
}

impl Default for MaskingSettings {
    fn default() -> Self {
        Self {
            kspace: PathBuf::from("../Data/ksp_fully"),
            slice: 0,
            acceleration: 2.0,
            mask_offset: None,
            mask_seed: None,
            crop_vertical: 0.26,
            crop_horizontal: 0.2,
            brain_threshold: 0.1,
            hole_structure: 40,
            erosion_structure: 10,
            loose_padding: 1,
            frame_width: 3,
        }
    }
}

impl ConfigFile for MaskingSettings {
    fn to_file(&self,filename:&Path) -> Result<(),ReconError> {
        let t = toml::to_string_pretty(&self).map_err(|e| ReconError::Config(e.to_string()))?;
        let mut f = File::create(filename).map_err(|e| ReconError::Config(format!("cannot create {:?}: {}",filename,e)))?;
        f.write_all(t.as_bytes()).map_err(|e| ReconError::Config(format!("cannot write {:?}: {}",filename,e)))?;
        Ok(())
    }
    fn from_file(filename:&Path) -> Result<Self,ReconError> {
        let mut t = String::new();
        File::open(filename).and_then(|mut f| f.read_to_string(&mut t))
            .map_err(|e| ReconError::Config(format!("cannot read {:?}: {}",filename,e)))?;
        toml::from_str(&t).map_err(|e| ReconError::Config(format!("masking settings {:?} must be corrupt: {}",filename,e)))
    }
}

impl MaskingSettings {
    pub fn validate(&self) -> Result<(),ReconError> {
        if !(0.0..0.5).contains(&self.crop_vertical) || !(0.0..0.5).contains(&self.crop_horizontal) {
            return Err(ReconError::Config(String::from("crop fractions must lie in [0, 0.5)")));
        }
        if self.hole_structure == 0 || self.erosion_structure == 0 {
            return Err(ReconError::Config(String::from("structuring elements must not be empty")));
        }
        if self.acceleration <= 0.0 {
            return Err(ReconError::Config(format!("acceleration must be positive (got {})",self.acceleration)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_file_cycle() {
        let file = std::env::temp_dir().join("recon_masking_settings.toml");
        let s = MaskingSettings {
            acceleration: 4.0,
            mask_seed: Some(42),
            ..MaskingSettings::default()
        };
        s.to_file(&file).unwrap();
        assert_eq!(MaskingSettings::from_file(&file).unwrap(),s);
    }

    #[test]
    fn partial_file_uses_defaults() {
        let s:MaskingSettings = toml::from_str("acceleration = 3.0\n").unwrap();
        assert_eq!(s.acceleration,3.0);
        assert_eq!(s.hole_structure,40);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn bad_crop_rejected() {
        let s = MaskingSettings {
            crop_vertical: 0.6,
            ..MaskingSettings::default()
        };
        assert!(s.validate().is_err());
    }
}
