use ndarray::{Array2, Axis};
use crate::ReconError;

/// Square structuring element of side k. Window offsets follow the ndimage convention where the
/// element origin sits at k/2: erosion looks at [-k/2, k-1-k/2], dilation at the reflected window
#[derive(Clone,Copy,Debug,PartialEq)]
pub struct SquareElement {
    pub size:usize,
}

impl SquareElement {
    pub fn new(size:usize) -> Self {
        Self{size}
    }
    fn erosion_window(&self) -> (isize,isize) {
        let k = self.size as isize;
        let c = k/2;
        (-c,k - 1 - c)
    }
    fn dilation_window(&self) -> (isize,isize) {
        let (lo,hi) = self.erosion_window();
        (-hi,-lo)
    }
}

#[derive(Clone,Copy,Debug)]
enum Morph {
    Erode,
    Dilate,
}

/// 1-D min/max filter over a window of offsets. Positions outside the line count as unset
fn filter_line(line:&[bool],window:(isize,isize),op:Morph) -> Vec<bool> {
    let n = line.len() as isize;
    let mut prefix = vec![0usize;line.len() + 1];
    for (i,v) in line.iter().enumerate() {
        prefix[i+1] = prefix[i] + *v as usize;
    }
    let width = (window.1 - window.0 + 1) as usize;
    (0..n).map(|x| {
        let lo = x + window.0;
        let hi = x + window.1;
        let (clo,chi) = (lo.max(0),hi.min(n - 1));
        let count = if chi < clo {0} else {prefix[chi as usize + 1] - prefix[clo as usize]};
        match op {
            Morph::Erode => lo >= 0 && hi < n && count == width,
            Morph::Dilate => count > 0,
        }
    }).collect()
}

fn filter(mask:&Array2<bool>,element:SquareElement,op:Morph) -> Array2<bool> {
    if element.size == 0 {
        return mask.clone()
    }
    let window = match op {
        Morph::Erode => element.erosion_window(),
        Morph::Dilate => element.dilation_window(),
    };
    let mut out = mask.clone();
    // the square is separable into a row pass and a column pass
    for axis in [Axis(1),Axis(0)] {
        for mut lane in out.lanes_mut(axis) {
            let line:Vec<bool> = lane.iter().cloned().collect();
            let filtered = filter_line(&line,window,op);
            lane.iter_mut().zip(filtered).for_each(|(v,f)| *v = f);
        }
    }
    out
}

/// binary erosion with border value 0
pub fn erode(mask:&Array2<bool>,element:SquareElement) -> Array2<bool> {
    filter(mask,element,Morph::Erode)
}

pub fn dilate(mask:&Array2<bool>,element:SquareElement,iterations:usize) -> Array2<bool> {
    (0..iterations).fold(mask.clone(),|m,_| filter(&m,element,Morph::Dilate))
}

/// dilation followed by erosion
pub fn close(mask:&Array2<bool>,element:SquareElement) -> Array2<bool> {
    erode(&dilate(mask,element,1),element)
}

#[derive(Clone,Copy,Debug)]
pub struct BrainMaskParams {
    pub threshold:f64,
    pub hole_structure:usize,
    pub erosion_structure:usize,
    pub loose_padding:usize,
}

impl Default for BrainMaskParams {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            hole_structure: 40,
            erosion_structure: 10,
            loose_padding: 1,
        }
    }
}

pub struct BrainMasks {
    pub tight:Array2<bool>,
    pub loose:Array2<bool>,
}

/// Threshold the normalized image, close holes and erode for the tight mask. The loose mask
/// dilates the tight one and erodes it again
pub fn brain_masks(image:&Array2<f32>,params:&BrainMaskParams) -> BrainMasks {
    let lo = image.iter().cloned().fold(f32::INFINITY,f32::min);
    let hi = image.iter().cloned().fold(f32::NEG_INFINITY,f32::max);
    let range = (hi - lo) as f64;
    let thresholded = image.mapv(|v| range > 0.0 && ((v - lo) as f64/range) > params.threshold);

    let hole = SquareElement::new(params.hole_structure);
    let ero = SquareElement::new(params.erosion_structure);

    let tight = erode(&close(&thresholded,hole),ero);
    let loose = erode(&dilate(&tight,hole,params.loose_padding),ero);
    log::debug!("tight mask {} px, loose mask {} px",tight.iter().filter(|v| **v).count(),loose.iter().filter(|v| **v).count());
    BrainMasks{tight,loose}
}

/// Display frame: ones with rows 0..3, h-3..h-1 and columns 0..3, w-3..w-1 cleared. The last row
/// and column stay set
pub fn frame_mask(shape:(usize,usize),width:usize) -> Array2<bool> {
    let (h,w) = shape;
    Array2::from_shape_fn(shape,|(r,c)| {
        let edge_row = r < width || (r + width >= h && r + 1 < h);
        let edge_col = c < width || (c + width >= w && c + 1 < w);
        !(edge_row || edge_col)
    })
}

/// multiply an image by a mask of the same shape
pub fn apply_mask(image:&Array2<f32>,mask:&Array2<bool>) -> Result<Array2<f32>,ReconError> {
    if image.dim() != mask.dim() {
        return Err(ReconError::ShapeMismatch(image.shape().to_vec(),mask.shape().to_vec()));
    }
    let mut out = image.clone();
    out.zip_mut_with(mask,|v,m| if !m {*v = 0.0});
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn from_rows(rows:&[&str]) -> Array2<bool> {
        let h = rows.len();
        let w = rows[0].len();
        Array2::from_shape_fn((h,w),|(r,c)| rows[r].as_bytes()[c] == b'1')
    }

    #[test]
    fn even_element_erosion_is_shifted() {
        // size 2: erosion looks at x-1 and x
        let line = [false,true,true,true,false];
        let out = filter_line(&line,SquareElement::new(2).erosion_window(),Morph::Erode);
        assert_eq!(out,vec![false,false,true,true,false]);
        // dilation looks at x and x+1
        let dot = [false,false,true,false,false];
        let out = filter_line(&dot,SquareElement::new(2).dilation_window(),Morph::Dilate);
        assert_eq!(out,vec![false,true,true,false,false]);
    }

    #[test]
    fn erosion_border_is_unset() {
        let m = Array2::from_elem((5,5),true);
        let e = erode(&m,SquareElement::new(3));
        let expected = from_rows(&["00000","01110","01110","01110","00000"]);
        assert_eq!(e,expected);
    }

    #[test]
    fn closing_fills_a_hole() {
        let m = from_rows(&[
            "0000000",
            "0111110",
            "0111110",
            "0110110",
            "0111110",
            "0111110",
            "0000000",
        ]);
        let c = close(&m,SquareElement::new(3));
        assert!(c[[3,3]]);
        assert!(!c[[0,0]]);
    }

    #[test]
    fn dilation_iterations_grow() {
        let mut m = Array2::from_elem((9,9),false);
        m[[4,4]] = true;
        let d1 = dilate(&m,SquareElement::new(3),1);
        let d2 = dilate(&m,SquareElement::new(3),2);
        assert_eq!(d1.iter().filter(|v| **v).count(),9);
        assert_eq!(d2.iter().filter(|v| **v).count(),25);
    }

    #[test]
    fn frame_keeps_last_row_and_column() {
        let f = frame_mask((10,8),3);
        assert!(!f[[0,4]] && !f[[2,4]] && f[[3,4]]);
        assert!(!f[[7,4]] && !f[[8,4]] && f[[6,4]]);
        assert!(f[[9,4]]);
        assert!(!f[[5,5]] && !f[[5,6]] && f[[5,7]] && f[[5,4]]);
        assert!(!f[[9,0]]);
    }

    #[test]
    fn blob_masks_nest() {
        let img = Array2::from_shape_fn((60,60),|(r,c)| {
            let d = ((r as f32 - 30.0).powi(2) + (c as f32 - 30.0).powi(2)).sqrt();
            if d < 20.0 {1.0} else {0.0}
        });
        let params = BrainMaskParams {hole_structure:5,erosion_structure:3,..BrainMaskParams::default()};
        let m = brain_masks(&img,&params);
        let n_tight = m.tight.iter().filter(|v| **v).count();
        let n_loose = m.loose.iter().filter(|v| **v).count();
        assert!(n_tight > 0 && n_loose > n_tight);
        assert!(m.tight[[30,30]] && !m.tight[[0,0]]);
    }

    #[test]
    fn masking_requires_same_shape() {
        let img = array![[1.0f32,2.0],[3.0,4.0]];
        let mask = array![[true,false],[false,true]];
        assert_eq!(apply_mask(&img,&mask).unwrap(),array![[1.0f32,0.0],[0.0,4.0]]);
        assert!(apply_mask(&img,&Array2::from_elem((3,2),true)).is_err());
    }
}
