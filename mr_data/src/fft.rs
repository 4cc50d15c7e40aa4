use ndarray::{Array, Array3, Axis};
use num_complex::Complex32;
use rustfft::FftPlanner;
use utils::CenteredFft;
pub use rustfft::FftDirection;
pub use utils::FftNorm;

/// centered 1-D transform along one axis of a multi-channel volume
pub fn fft_axis(vol:&Array3<Complex32>,axis:usize,direction:FftDirection,norm:FftNorm) -> Array3<Complex32> {
    let mut vol = vol.clone();
    let n = vol.shape()[axis];
    let mut planner = FftPlanner::<f32>::new();
    let fft = CenteredFft::new(&mut planner,n,direction,norm);
    vol.lanes_mut(Axis(axis)).into_iter().for_each(|mut line| {
        let mut temp = line.to_vec();
        fft.process(&mut temp);
        line.assign(&Array::from_vec(temp));
    });
    vol
}

/// centered 2-D inverse transform over the first two axes of every channel, scaled by 1/(rows*cols)
pub fn ifft2c(ksp:&Array3<Complex32>) -> Array3<Complex32> {
    let tmp = fft_axis(ksp,0,FftDirection::Inverse,FftNorm::Backward);
    fft_axis(&tmp,1,FftDirection::Inverse,FftNorm::Backward)
}

/// centered 2-D forward transform over the first two axes of every channel, unscaled
pub fn fft2c(img:&Array3<Complex32>) -> Array3<Complex32> {
    let tmp = fft_axis(img,0,FftDirection::Forward,FftNorm::Backward);
    fft_axis(&tmp,1,FftDirection::Forward,FftNorm::Backward)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_sample_gives_flat_image() {
        let mut k = Array3::<Complex32>::zeros((8,6,2));
        k[[4,3,0]] = Complex32::new(48.0,0.0);
        k[[4,3,1]] = Complex32::new(0.0,48.0);
        let img = ifft2c(&k);
        img.index_axis(Axis(2),0).iter().for_each(|v| assert!((v - Complex32::new(1.0,0.0)).norm() < 1E-5));
        img.index_axis(Axis(2),1).iter().for_each(|v| assert!((v - Complex32::new(0.0,1.0)).norm() < 1E-5));
    }

    #[test]
    fn forward_inverts_inverse_for_even_lengths() {
        // the shift pair only cancels for even line lengths
        let k = Array3::from_shape_fn((6,4,3),|(r,c,ch)| Complex32::new((r*c) as f32,(ch + c) as f32 - 2.0));
        let back = fft2c(&ifft2c(&k));
        back.iter().zip(k.iter()).for_each(|(a,b)| assert!((a - b).norm() < 1E-4));
    }

    #[test]
    fn odd_lengths_do_not_round_trip() {
        let k = Array3::from_shape_fn((6,5,3),|(r,c,ch)| Complex32::new((r*c) as f32,(ch + c) as f32 - 2.0));
        let back = fft2c(&ifft2c(&k));
        let err = back.iter().zip(k.iter()).map(|(a,b)| (a - b).norm()).fold(0.0,f32::max);
        assert!(err > 1.0);
        // energy is still preserved
        let e0:f32 = k.iter().map(|v| v.norm_sqr()).sum();
        let e1:f32 = back.iter().map(|v| v.norm_sqr()).sum();
        assert!((e0 - e1).abs()/e0 < 1E-4);
    }

    #[test]
    fn ortho_axis_transform_keeps_energy() {
        let k = Array3::from_shape_fn((16,2,2),|(r,c,ch)| Complex32::new(r as f32 - 4.0,(c*ch) as f32));
        let t = fft_axis(&k,0,FftDirection::Inverse,FftNorm::Ortho);
        let e0:f32 = k.iter().map(|v| v.norm_sqr()).sum();
        let e1:f32 = t.iter().map(|v| v.norm_sqr()).sum();
        assert!((e0 - e1).abs()/e0 < 1E-5);
    }
}
