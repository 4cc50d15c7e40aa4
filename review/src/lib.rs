pub mod timing_diagram;
pub mod image;

use std::error::Error;

pub type PlotResult = Result<(),Box<dyn Error>>;

/// a failed plot, carrying only the message of the drawing error
#[derive(thiserror::Error,Debug)]
#[error("plotting failed: {0}")]
pub struct PlotError(String);

pub fn plot_error(e:Box<dyn Error>) -> PlotError {
    PlotError(e.to_string())
}

/// axis limits for a set of values with a little head room. Flat or empty data gets a unit span
pub(crate) fn padded_range(values:impl Iterator<Item=f64>) -> (f64,f64) {
    let (lo,hi) = values.fold((f64::INFINITY,f64::NEG_INFINITY),|(lo,hi),v| (lo.min(v),hi.max(v)));
    if !lo.is_finite() || !hi.is_finite() {
        return (-1.0,1.0)
    }
    if (hi - lo).abs() < 1E-12 {
        return (lo - 1.0,hi + 1.0)
    }
    let pad = 0.05*(hi - lo);
    (lo - pad,hi + pad)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plot_error_keeps_message() {
        let e:Box<dyn Error> = "no font".into();
        assert_eq!(plot_error(e).to_string(),"plotting failed: no font");
    }

    #[test]
    fn flat_data_gets_unit_span() {
        assert_eq!(padded_range([2.0,2.0].into_iter()),(1.0,3.0));
        assert_eq!(padded_range(std::iter::empty()),(-1.0,1.0));
        let (lo,hi) = padded_range([0.0,10.0].into_iter());
        assert!((lo + 0.5).abs() < 1E-12 && (hi - 10.5).abs() < 1E-12);
    }
}
