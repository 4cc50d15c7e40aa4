use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::fs::File;
use std::io::{Read, Write};
use byteorder::{ByteOrder, LittleEndian};
use ndarray::{Array, Array3, ArrayD, Axis, Dimension, IxDyn, ShapeError};
use num_complex::Complex32;
use thiserror::Error;

const DIMENSIONS_KEY:&str = "# Dimensions";
// bart headers always list 16 dimensions
const BART_DIMS:usize = 16;

#[derive(Error,Debug)]
pub enum CflError {
    #[error("cannot access cfl file")]
    Io(#[from] std::io::Error),
    #[error("no dimension entry in header {0:?}")]
    MissingDimensions(PathBuf),
    #[error("cannot parse dimension '{0}'")]
    InvalidDimension(String),
    #[error("header describes {expected} complex samples but the data file holds {found}")]
    SizeMismatch{expected:usize,found:usize},
    #[error("expected at most {expected} dimensions, found {found}")]
    Rank{expected:usize,found:usize},
    #[error("slice index {index} is out of range for {n_slices} slices")]
    SliceOutOfRange{index:usize,n_slices:usize},
    #[error(transparent)]
    Shape(#[from] ShapeError),
}

fn cfl_base_decode(cfl_base:&Path) -> (PathBuf,PathBuf) {
    (cfl_base.with_extension("hdr"),cfl_base.with_extension("cfl"))
}

/// header entries keyed by their '#' line, holding the line that follows
pub fn load_cfl_header(cfl_base:&Path) -> Result<HashMap<String,String>,CflError> {
    let (hdr,_) = cfl_base_decode(cfl_base);
    let mut f = File::open(&hdr)?;
    let mut s = String::new();
    f.read_to_string(&mut s)?;
    let mut h = HashMap::<String,String>::new();
    let lines:Vec<&str> = s.lines().collect();
    lines.iter().enumerate().for_each(|(i,line)| {
        if line.starts_with('#') {
            if let Some(value) = lines.get(i+1) {
                h.insert(line.trim().to_string(),value.to_string());
            }
        }
    });
    Ok(h)
}

/// array dimensions with trailing singletons removed. Inner singletons are kept so that axis
/// positions stay meaningful
pub fn get_dims(cfl_base:&Path) -> Result<Vec<usize>,CflError> {
    let h = load_cfl_header(cfl_base)?;
    let d = h.get(DIMENSIONS_KEY).ok_or_else(|| CflError::MissingDimensions(cfl_base.with_extension("hdr")))?;
    let mut dims = d.split_whitespace()
        .map(|s| s.parse::<usize>().map_err(|_| CflError::InvalidDimension(s.to_string())))
        .collect::<Result<Vec<usize>,CflError>>()?;
    while dims.len() > 1 && dims.last() == Some(&1) {
        dims.pop();
    }
    Ok(dims)
}

fn load(cfl:&Path) -> Result<Vec<f32>,CflError> {
    let mut f = File::open(cfl)?;
    let mut buf = Vec::<u8>::new();
    f.read_to_end(&mut buf)?;
    let mut fbuf:Vec<f32> = vec![0.0;buf.len()/4];
    LittleEndian::read_f32_into(&buf[0..4*fbuf.len()],&mut fbuf);
    Ok(fbuf)
}

/// Read a cfl pair into an array indexed in the header's dimension order (first dimension
/// varies fastest on disk)
pub fn read_cfl(cfl_base:&Path) -> Result<ArrayD<Complex32>,CflError> {
    let (_,cfl) = cfl_base_decode(cfl_base);
    let dims = get_dims(cfl_base)?;
    let flat = load(&cfl)?;
    let expected:usize = dims.iter().product();
    if flat.len() != 2*expected {
        return Err(CflError::SizeMismatch{expected,found:flat.len()/2});
    }
    let complex:Vec<Complex32> = flat.chunks_exact(2).map(|c| Complex32::new(c[0],c[1])).collect();
    let mut reversed = dims.clone();
    reversed.reverse();
    let arr = ArrayD::from_shape_vec(IxDyn(&reversed),complex)?;
    log::debug!("read {:?} with dims {:?}",cfl,dims);
    Ok(arr.reversed_axes())
}

/// Write any array as a cfl pair. The header is padded to 16 dimensions
pub fn write_cfl<D:Dimension>(vol:&Array<Complex32,D>,cfl_base:&Path) -> Result<(),CflError> {
    if vol.ndim() > BART_DIMS {
        return Err(CflError::Rank{expected:BART_DIMS,found:vol.ndim()});
    }
    let (hdr,cfl) = cfl_base_decode(cfl_base);
    let mut dims:Vec<String> = vol.shape().iter().map(|d| d.to_string()).collect();
    dims.resize(BART_DIMS,String::from("1"));
    let mut hdr = File::create(hdr)?;
    hdr.write_all(format!("{}\n{}\n",DIMENSIONS_KEY,dims.join(" ")).as_bytes())?;

    // column-major traversal is row-major over the transposed view
    let flat:Vec<f32> = vol.t().iter().flat_map(|c| [c.re,c.im]).collect();
    let mut byte_buff:Vec<u8> = vec![0;flat.len()*4];
    LittleEndian::write_f32_into(&flat,&mut byte_buff);
    let mut cfl = File::create(cfl)?;
    cfl.write_all(&byte_buff)?;
    Ok(())
}

/// Pick one slice out of read x phase x slice x channel k-space, giving read x phase x channel.
/// Data with fewer than four dimensions is treated as having singleton trailing axes
pub fn select_slice(ksp:&ArrayD<Complex32>,slice:usize) -> Result<Array3<Complex32>,CflError> {
    if ksp.ndim() > 4 {
        return Err(CflError::Rank{expected:4,found:ksp.ndim()});
    }
    let mut k = ksp.view();
    while k.ndim() < 4 {
        let n = k.ndim();
        k.insert_axis_inplace(Axis(n));
    }
    let n_slices = k.shape()[2];
    if slice >= n_slices {
        return Err(CflError::SliceOutOfRange{index:slice,n_slices});
    }
    let s = k.index_axis(Axis(2),slice).to_owned();
    Ok(s.into_dimensionality()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array4;

    fn test_base(name:&str) -> PathBuf {
        std::env::temp_dir().join(name)
    }

    #[test]
    fn write_read_cycle() {
        let base = test_base("mr_data_cfl_cycle");
        let vol = Array4::from_shape_fn((4,3,2,5),|(r,p,s,c)| Complex32::new((r + 10*p) as f32,(s + 10*c) as f32));
        write_cfl(&vol,&base).unwrap();
        assert_eq!(get_dims(&base).unwrap(),vec![4,3,2,5]);
        let back = read_cfl(&base).unwrap();
        assert_eq!(back.shape(),&[4,3,2,5]);
        assert_eq!(back[[3,2,1,4]],Complex32::new(23.0,41.0));
        assert_eq!(back,vol.into_dyn());
    }

    #[test]
    fn disk_order_is_column_major() {
        let base = test_base("mr_data_cfl_order");
        let vol = ndarray::Array2::from_shape_fn((2,3),|(r,c)| Complex32::new((r + 2*c) as f32,0.0));
        write_cfl(&vol,&base).unwrap();
        let flat = load(&base.with_extension("cfl")).unwrap();
        let re:Vec<f32> = flat.iter().step_by(2).cloned().collect();
        assert_eq!(re,vec![0.0,1.0,2.0,3.0,4.0,5.0]);
        let h = load_cfl_header(&base).unwrap();
        assert!(h[DIMENSIONS_KEY].starts_with("2 3 1 1"));
    }

    #[test]
    fn truncated_data_is_rejected() {
        let base = test_base("mr_data_cfl_truncated");
        let vol = Array3::<Complex32>::zeros((4,4,2));
        write_cfl(&vol,&base).unwrap();
        let mut f = File::create(base.with_extension("cfl")).unwrap();
        f.write_all(&[0u8;16]).unwrap();
        assert!(matches!(read_cfl(&base),Err(CflError::SizeMismatch{..})));
    }

    #[test]
    fn slice_selection() {
        let vol = Array4::from_shape_fn((4,3,2,5),|(r,_,s,c)| Complex32::new(r as f32,(s*10 + c) as f32)).into_dyn();
        let s1 = select_slice(&vol,1).unwrap();
        assert_eq!(s1.dim(),(4,3,5));
        assert_eq!(s1[[2,0,3]],Complex32::new(2.0,13.0));
        assert!(select_slice(&vol,2).is_err());

        // single slice, single coil data written without trailing axes
        let flat = ndarray::Array2::<Complex32>::zeros((4,3)).into_dyn();
        assert_eq!(select_slice(&flat,0).unwrap().dim(),(4,3,1));
    }
}
