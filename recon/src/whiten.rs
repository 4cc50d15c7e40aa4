use nalgebra::DMatrix;
use ndarray::{Array3, Axis};
use num_complex::{Complex, Complex32};
use mr_data::fft::{fft_axis, FftDirection, FftNorm};
use crate::ReconError;

type CMatrix = DMatrix<Complex<f64>>;

// smallest allowed ratio of cholesky diagonal entries
const CONDITION_LIMIT:f64 = 1E-6;

/// Noise estimate taken from the k-space itself: unitary inverse transform along read, then read
/// and phase swapped
pub fn noise_from_kspace(ksp:&Array3<Complex32>) -> Array3<Complex32> {
    let scan = fft_axis(ksp,0,FftDirection::Inverse,FftNorm::Ortho);
    scan.permuted_axes([1,0,2]).as_standard_layout().to_owned()
}

/// channel covariance NᴴN/n over every sample of the last axis
pub fn noise_covariance(noise:&Array3<Complex32>) -> Result<CMatrix,ReconError> {
    let nc = noise.shape()[2];
    let n = noise.len()/nc.max(1);
    if n == 0 || nc == 0 {
        return Err(ReconError::Whitening(String::from("noise data is empty")));
    }
    let mut cov = CMatrix::zeros(nc,nc);
    for x in noise.lanes(Axis(2)) {
        for i in 0..nc {
            let xi = x[i].to_f64_complex();
            for j in i..nc {
                cov[(i,j)] += xi.conj()*x[j].to_f64_complex();
            }
        }
    }
    for i in 0..nc {
        for j in i+1..nc {
            cov[(j,i)] = cov[(i,j)].conj();
        }
    }
    Ok(cov.map(|c| c/(n as f64)))
}

/// inverse of the Cholesky factor of the covariance
pub fn whitening_matrix(cov:&CMatrix) -> Result<CMatrix,ReconError> {
    let chol = cov.clone().cholesky()
        .ok_or_else(|| ReconError::Whitening(String::from("noise covariance is not positive definite")))?;
    let l = chol.l();
    let diag:Vec<f64> = l.diagonal().iter().map(|d| d.re).collect();
    let d_max = diag.iter().cloned().fold(0.0,f64::max);
    if diag.iter().any(|d| *d <= CONDITION_LIMIT*d_max) {
        return Err(ReconError::Whitening(String::from("noise covariance is rank deficient")));
    }
    l.try_inverse()
        .ok_or_else(|| ReconError::Whitening(String::from("cholesky factor is singular")))
}

/// Replace every channel vector x of the k-space by L⁻¹x where LLᴴ is the covariance of the
/// noise. The result has unit noise variance and uncorrelated channels
pub fn whiten(ksp:&Array3<Complex32>,noise:&Array3<Complex32>) -> Result<Array3<Complex32>,ReconError> {
    let nc = ksp.shape()[2];
    if noise.shape()[2] != nc {
        return Err(ReconError::ShapeMismatch(ksp.shape().to_vec(),noise.shape().to_vec()));
    }
    let cov = noise_covariance(noise)?;
    // covariance of a column vector is E[x xᴴ], the transpose of what was accumulated
    let w = whitening_matrix(&cov.transpose())?;
    log::debug!("whitening {} channels",nc);
    let mut out = ksp.clone();
    let mut x = nalgebra::DVector::<Complex<f64>>::zeros(nc);
    for mut lane in out.lanes_mut(Axis(2)) {
        lane.iter().enumerate().for_each(|(i,v)| x[i] = v.to_f64_complex());
        let y = &w*&x;
        lane.iter_mut().zip(y.iter()).for_each(|(v,yi)| *v = Complex32::new(yi.re as f32,yi.im as f32));
    }
    Ok(out)
}

/// whiten using the noise estimate derived from the same k-space
pub fn self_whiten(ksp:&Array3<Complex32>) -> Result<Array3<Complex32>,ReconError> {
    whiten(ksp,&noise_from_kspace(ksp))
}

trait ToF64 {
    fn to_f64_complex(&self) -> Complex<f64>;
}

impl ToF64 for Complex32 {
    fn to_f64_complex(&self) -> Complex<f64> {
        Complex::new(self.re as f64,self.im as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn correlated_kspace() -> Array3<Complex32> {
        let mut rng = StdRng::seed_from_u64(3);
        let mut ksp = Array3::<Complex32>::zeros((32,24,3));
        for mut x in ksp.lanes_mut(Axis(2)) {
            let a = Complex32::new(rng.gen_range(-1.0..1.0),rng.gen_range(-1.0..1.0));
            let b = Complex32::new(rng.gen_range(-1.0..1.0),rng.gen_range(-1.0..1.0));
            let c = Complex32::new(rng.gen_range(-1.0..1.0),rng.gen_range(-1.0..1.0));
            x[0] = a*4.0;
            x[1] = a + b*0.5;
            x[2] = a*Complex32::new(0.0,1.0) + b*0.2 + c*0.1;
        }
        ksp
    }

    #[test]
    fn covariance_is_hermitian() {
        let cov = noise_covariance(&correlated_kspace()).unwrap();
        for i in 0..3 {
            assert!(cov[(i,i)].im.abs() < 1E-9);
            assert!(cov[(i,i)].re > 0.0);
            for j in 0..3 {
                assert!((cov[(i,j)] - cov[(j,i)].conj()).norm() < 1E-9);
            }
        }
    }

    #[test]
    fn whitened_noise_has_identity_covariance() {
        let ksp = correlated_kspace();
        let white = self_whiten(&ksp).unwrap();
        // whitening commutes with the transform along read, so the noise of the output is white
        let cov = noise_covariance(&noise_from_kspace(&white)).unwrap();
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j {1.0} else {0.0};
                assert!((cov[(i,j)] - Complex::new(expected,0.0)).norm() < 1E-3,"cov[{},{}] = {}",i,j,cov[(i,j)]);
            }
        }
    }

    #[test]
    fn degenerate_channels_fail() {
        let ksp = Array3::<Complex32>::from_elem((8,8,2),Complex32::new(1.0,0.0));
        assert!(matches!(self_whiten(&ksp),Err(ReconError::Whitening(_))));
    }

    #[test]
    fn channel_count_must_match() {
        let a = Array3::<Complex32>::zeros((4,4,2));
        let b = Array3::<Complex32>::zeros((4,4,3));
        assert!(matches!(whiten(&a,&b),Err(ReconError::ShapeMismatch(..))));
    }
}
