//! Robust and weighted moment estimators for catalog kinematics.
//!
//! These are the statistical helpers used when summarizing the kinematics of
//! candidate member stars: a Robust Scatter Estimate for dispersion, and
//! inverse-variance weighted means of scalar and 2D vector measurements. The
//! 2D form accounts for the full per-star covariance between the vector
//! components, which is how proper-motion uncertainties are published (sigma
//! on each component plus a correlation coefficient).

use serde::{Deserialize, Serialize};

use crate::error::StartabError;
use crate::Result;

/// RSE scaling constant, `1 / (sqrt(2) * 2 * erfinv(0.8))`.
///
/// Scales the 10th-to-90th interpercentile range so that the RSE of a
/// Gaussian equals its standard deviation (GAIA-C3-TN-ARI-HL-007).
pub const RSE_CONSTANT: f64 = 0.390_152_073_036_189_43;

/// Weighted mean of a set of 2D vectors, with its covariance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightedMean2d {
    /// Weighted mean of the x components
    pub x: f64,
    /// Weighted mean of the y components
    pub y: f64,
    /// Covariance matrix of the weighted mean, row major
    pub cov: [[f64; 2]; 2],
}

/// Calculate the Robust Scatter Estimate of a set of values.
///
/// The RSE is `0.390152 * (P90 - P10)`, with the percentiles interpolated
/// linearly between order statistics. It matches the standard deviation for
/// Gaussian data while being insensitive to outliers.
///
/// # Example
///
/// ```rust
/// use startablib::rse;
///
/// let x: Vec<f64> = (1..=10).map(f64::from).collect();
/// assert!((rse(&x).unwrap() - 2.8090949258605638).abs() < 1e-12);
/// ```
pub fn rse(x: &[f64]) -> Result<f64> {
    if x.is_empty() {
        return Err(StartabError::EmptyInput("rse"));
    }
    let mut sorted = x.to_vec();
    sorted.sort_by(f64::total_cmp);
    Ok(RSE_CONSTANT * (percentile(&sorted, 90.0) - percentile(&sorted, 10.0)))
}

/// Linearly interpolated percentile of already-sorted values.
fn percentile(sorted: &[f64], per: f64) -> f64 {
    let h = (sorted.len() - 1) as f64 * per / 100.0;
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(sorted.len() - 1);
    sorted[lo] + (sorted[hi] - sorted[lo]) * (h - lo as f64)
}

/// Calculate the inverse-variance weighted mean of measurements `x` with
/// uncertainties `sx`.
///
/// Returns the weighted mean and its uncertainty.
pub fn weighted_mean_oned(x: &[f64], sx: &[f64]) -> Result<(f64, f64)> {
    if x.is_empty() {
        return Err(StartabError::EmptyInput("weighted_mean_oned"));
    }
    if x.len() != sx.len() {
        return Err(StartabError::LengthMismatch("x and sx"));
    }

    let mut wsum = 0.0;
    let mut wxsum = 0.0;
    for (i, (&xi, &sxi)) in x.iter().zip(sx).enumerate() {
        let w = 1.0 / (sxi * sxi);
        if !w.is_finite() {
            return Err(StartabError::SingularCovariance(i));
        }
        wsum += w;
        wxsum += w * xi;
    }
    Ok((wxsum / wsum, (1.0 / wsum).sqrt()))
}

/// Calculate the weighted mean of the vectors `(x, y)`.
///
/// Each sample `(x_i, y_i)` carries the covariance matrix
///
/// ```text
/// | sx_i^2            cxy_i*sx_i*sy_i |
/// | cxy_i*sx_i*sy_i   sy_i^2          |
/// ```
///
/// built from the component sigmas and their correlation coefficient. The
/// mean solves the normal equations of the stacked measurement model: per
/// sample the inverse covariance is accumulated into the information matrix,
/// and the mean is that matrix's inverse applied to the accumulated weighted
/// measurements.
pub fn weighted_mean_twod(
    x: &[f64],
    y: &[f64],
    sx: &[f64],
    sy: &[f64],
    cxy: &[f64],
) -> Result<WeightedMean2d> {
    if x.is_empty() {
        return Err(StartabError::EmptyInput("weighted_mean_twod"));
    }
    let n = x.len();
    if y.len() != n || sx.len() != n || sy.len() != n || cxy.len() != n {
        return Err(StartabError::LengthMismatch("x, y, sx, sy and cxy"));
    }

    // Information matrix and information-weighted measurement sum.
    let mut info = [[0.0f64; 2]; 2];
    let mut b = [0.0f64; 2];
    for i in 0..n {
        let off = cxy[i] * sx[i] * sy[i];
        let w = invert2([[sx[i] * sx[i], off], [off, sy[i] * sy[i]]])
            .ok_or(StartabError::SingularCovariance(i))?;
        info[0][0] += w[0][0];
        info[0][1] += w[0][1];
        info[1][0] += w[1][0];
        info[1][1] += w[1][1];
        b[0] += w[0][0] * x[i] + w[0][1] * y[i];
        b[1] += w[1][0] * x[i] + w[1][1] * y[i];
    }

    let cov = invert2(info).ok_or(StartabError::SingularCovariance(n))?;
    Ok(WeightedMean2d {
        x: cov[0][0] * b[0] + cov[0][1] * b[1],
        y: cov[1][0] * b[0] + cov[1][1] * b[1],
        cov,
    })
}

/// Invert a 2x2 matrix, or `None` if it is singular.
fn invert2(m: [[f64; 2]; 2]) -> Option<[[f64; 2]; 2]> {
    let det = m[0][0] * m[1][1] - m[0][1] * m[1][0];
    if det == 0.0 || !det.is_finite() {
        return None;
    }
    Some([
        [m[1][1] / det, -m[0][1] / det],
        [-m[1][0] / det, m[0][0] / det],
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn test_rse_one_to_ten() {
        let x: Vec<f64> = (1..=10).map(f64::from).collect();
        assert!(close(rse(&x).unwrap(), 2.8090949258605638));
    }

    #[test]
    fn test_rse_order_independent() {
        let shuffled = [4.0, 8.0, 1.0, 9.0, 3.0, 7.0, 2.0, 10.0, 6.0, 5.0];
        assert!(close(rse(&shuffled).unwrap(), 2.8090949258605638));
    }

    #[test]
    fn test_rse_single_value_is_zero() {
        assert!(close(rse(&[42.0]).unwrap(), 0.0));
    }

    #[test]
    fn test_rse_empty() {
        assert!(matches!(rse(&[]), Err(StartabError::EmptyInput(_))));
    }

    #[test]
    fn test_weighted_mean_oned_equal_sigmas_is_plain_mean() {
        let (wx, err) = weighted_mean_oned(&[1.0, 2.0, 3.0, 4.0], &[2.0; 4]).unwrap();
        assert!(close(wx, 2.5));
        assert!(close(err, 1.0));
    }

    #[test]
    fn test_weighted_mean_oned_unequal_sigmas() {
        let (wx, err) = weighted_mean_oned(&[1.0, 3.0], &[1.0, 2.0]).unwrap();
        assert!(close(wx, 1.4));
        assert!(close(err, 0.8944271909999159));
    }

    #[test]
    fn test_weighted_mean_oned_zero_sigma() {
        let result = weighted_mean_oned(&[1.0, 2.0], &[1.0, 0.0]);
        assert!(matches!(result, Err(StartabError::SingularCovariance(1))));
    }

    #[test]
    fn test_weighted_mean_oned_length_mismatch() {
        let result = weighted_mean_oned(&[1.0, 2.0], &[1.0]);
        assert!(matches!(result, Err(StartabError::LengthMismatch(_))));
    }

    #[test]
    fn test_weighted_mean_twod_single_point_returns_its_covariance() {
        let m = weighted_mean_twod(&[1.5], &[-2.0], &[0.3], &[0.4], &[0.5]).unwrap();
        assert!(close(m.x, 1.5));
        assert!(close(m.y, -2.0));
        assert!(close(m.cov[0][0], 0.09));
        assert!(close(m.cov[1][1], 0.16));
        assert!(close(m.cov[0][1], 0.5 * 0.3 * 0.4));
        assert!(close(m.cov[0][1], m.cov[1][0]));
    }

    #[test]
    fn test_weighted_mean_twod_uncorrelated_equal_sigmas() {
        let m = weighted_mean_twod(
            &[1.0, 3.0],
            &[2.0, 6.0],
            &[0.5, 0.5],
            &[0.5, 0.5],
            &[0.0, 0.0],
        )
        .unwrap();
        assert!(close(m.x, 2.0));
        assert!(close(m.y, 4.0));
        // Two equal-weight samples halve the variance.
        assert!(close(m.cov[0][0], 0.125));
        assert!(close(m.cov[1][1], 0.125));
        assert!(close(m.cov[0][1], 0.0));
    }

    #[test]
    fn test_weighted_mean_twod_with_correlations() {
        let m = weighted_mean_twod(
            &[1.0, 3.0],
            &[2.0, 6.0],
            &[0.5, 1.0],
            &[0.4, 0.8],
            &[0.3, -0.2],
        )
        .unwrap();
        assert!(close(m.x, 1.8202020202020204));
        assert!(close(m.y, 2.9616161616161625));
        assert!(close(m.cov[0][0], 0.19191919191919196));
        assert!(close(m.cov[0][1], 0.03135353535353535));
        assert!(close(m.cov[1][0], 0.03135353535353535));
        assert!(close(m.cov[1][1], 0.12282828282828287));
    }

    #[test]
    fn test_weighted_mean_twod_perfect_correlation_is_singular() {
        let result = weighted_mean_twod(&[1.0], &[2.0], &[0.5], &[0.4], &[1.0]);
        assert!(matches!(result, Err(StartabError::SingularCovariance(0))));
    }

    #[test]
    fn test_weighted_mean_twod_length_mismatch() {
        let result = weighted_mean_twod(&[1.0, 2.0], &[1.0], &[0.1, 0.1], &[0.1, 0.1], &[0.0, 0.0]);
        assert!(matches!(result, Err(StartabError::LengthMismatch(_))));
    }
}
