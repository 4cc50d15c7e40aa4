use ndarray::Array2;
use crate::ReconError;

/// Root mean squared error normalized by the range of the reference image. A reference with
/// zero range only yields a value when the images agree (0); otherwise it is an error
pub fn nrmse(pred:&Array2<f32>,truth:&Array2<f32>) -> Result<f64,ReconError> {
    if pred.dim() != truth.dim() {
        return Err(ReconError::ShapeMismatch(pred.shape().to_vec(),truth.shape().to_vec()));
    }
    if truth.is_empty() {
        return Err(ReconError::ShapeMismatch(pred.shape().to_vec(),truth.shape().to_vec()));
    }
    let mse = truth.iter().zip(pred.iter())
        .map(|(t,p)| (*t as f64 - *p as f64).powi(2))
        .sum::<f64>()/truth.len() as f64;
    let rmse = mse.sqrt();
    let lo = truth.iter().cloned().fold(f32::INFINITY,f32::min) as f64;
    let hi = truth.iter().cloned().fold(f32::NEG_INFINITY,f32::max) as f64;
    let range = hi - lo;
    if range == 0.0 {
        return if rmse == 0.0 {Ok(0.0)} else {Err(ReconError::DegenerateRange{rmse})};
    }
    Ok(rmse/range)
}

/// "NRMSE: .123" style label used on the mask panels
pub fn nrmse_label(value:f64) -> String {
    format!("NRMSE: {:.3}",value).replace("0.",".")
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn identical_images_score_zero() {
        let a = array![[1.0f32,2.0],[3.0,5.0]];
        assert_eq!(nrmse(&a,&a).unwrap(),0.0);
    }

    #[test]
    fn known_value() {
        let t = array![[0.0f32,0.0],[0.0,4.0]];
        let p = array![[1.0f32,1.0],[1.0,5.0]];
        // rmse 1, range 4
        assert!((nrmse(&p,&t).unwrap() - 0.25).abs() < 1E-12);
        assert!(nrmse(&t,&p).unwrap() > 0.0);
    }

    #[test]
    fn all_zero_images_score_zero() {
        let z = Array2::<f32>::zeros((4,4));
        assert_eq!(nrmse(&z,&z).unwrap(),0.0);
    }

    #[test]
    fn flat_reference_with_error_is_rejected() {
        let z = Array2::<f32>::zeros((2,2));
        let p = Array2::<f32>::ones((2,2));
        assert!(matches!(nrmse(&p,&z),Err(ReconError::DegenerateRange{..})));
    }

    #[test]
    fn shapes_must_match() {
        let a = Array2::<f32>::zeros((2,2));
        let b = Array2::<f32>::zeros((2,3));
        assert!(matches!(nrmse(&a,&b),Err(ReconError::ShapeMismatch(..))));
    }

    #[test]
    fn label_drops_leading_zero() {
        assert_eq!(nrmse_label(0.0523),"NRMSE: .052");
        assert_eq!(nrmse_label(0.0),"NRMSE: .000");
    }
}
