use ndarray::{s, Array2, Array3, Axis};
use num_complex::Complex32;
use mr_data::fft::ifft2c;

/// root sum of squares over the channel axis
pub fn rss(img:&Array3<Complex32>) -> Array2<f32> {
    img.map(|c| c.norm_sqr()).sum_axis(Axis(2)).mapv(f32::sqrt)
}

pub fn flipud(img:&Array2<f32>) -> Array2<f32> {
    let mut out = img.clone();
    out.invert_axis(Axis(0));
    out.as_standard_layout().to_owned()
}

/// Remove int(rows*vertical) rows from the top and the bottom and int(cols*horizontal) columns
/// from the left and the right
pub fn crop(img:&Array2<f32>,vertical:f64,horizontal:f64) -> Array2<f32> {
    let (rows,cols) = img.dim();
    let v = (rows as f64*vertical) as usize;
    let h = (cols as f64*horizontal) as usize;
    img.slice(s![v..rows.saturating_sub(v).max(v),h..cols.saturating_sub(h).max(h)]).to_owned()
}

/// magnitude image of multi-channel k-space: centered 2-D inverse transform, rss, vertical flip
/// and background crop
pub fn reconstruct(ksp:&Array3<Complex32>,vertical:f64,horizontal:f64) -> Array2<f32> {
    let img = rss(&ifft2c(ksp));
    crop(&flipud(&img),vertical,horizontal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rss_of_two_channels() {
        let mut img = Array3::<Complex32>::zeros((2,2,2));
        img[[0,1,0]] = Complex32::new(3.0,0.0);
        img[[0,1,1]] = Complex32::new(0.0,4.0);
        let r = rss(&img);
        assert_eq!(r[[0,1]],5.0);
        assert_eq!(r[[1,1]],0.0);
    }

    #[test]
    fn flip_reverses_rows() {
        let img = Array2::from_shape_fn((3,2),|(r,c)| (10*r + c) as f32);
        let f = flipud(&img);
        assert_eq!(f[[0,0]],20.0);
        assert_eq!(f[[2,1]],1.0);
    }

    #[test]
    fn crop_matches_figure_geometry() {
        let img = Array2::<f32>::zeros((640,420));
        assert_eq!(crop(&img,0.26,0.2).dim(),(640 - 2*166,420 - 2*84));
        assert_eq!(crop(&img,0.0,0.0).dim(),(640,420));
    }

    #[test]
    fn flat_kspace_center_gives_flat_image() {
        let mut ksp = Array3::<Complex32>::zeros((8,4,2));
        ksp[[4,2,0]] = Complex32::new(32.0,0.0);
        ksp[[4,2,1]] = Complex32::new(0.0,32.0);
        let img = reconstruct(&ksp,0.0,0.0);
        img.iter().for_each(|v| assert!((v - 2f32.sqrt()).abs() < 1E-5));
    }
}
