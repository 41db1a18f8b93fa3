//! Weight functions used by the density pass ([`crate::density`]).

use crate::errors::ClueError;

/// A convolution kernel evaluated over the distance between two points.
///
/// All variants share the same contract: `eval(dist, i, j)` returns a non-negative
/// weight, and `eval(0.0, i, i)` always returns exactly `1.0` regardless of the
/// kernel's shape -- the self-term is frozen so that a point's own weight always
/// contributes `w[i] * 1` to its density.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Kernel {
    /// Constant weight `h` for every pair with `i != j`.
    Flat(f64),
    /// `amp * exp(-avg * dist)`.
    Exponential { avg: f64, amp: f64 },
    /// `amp * exp(-(dist - avg)^2 / (2 * std^2))`.
    Gaussian { avg: f64, std: f64, amp: f64 },
}

impl Kernel {
    /// Builds a flat kernel. Fails unless `h > 0`.
    pub fn flat(h: f64) -> Result<Kernel, ClueError> {
        if !(h > 0.0) {
            return Err(ClueError::InvalidParameter {
                reason: format!("flat kernel height must be positive, got {h}"),
            });
        }
        Ok(Kernel::Flat(h))
    }

    /// Builds an exponential kernel. Fails unless `avg > 0` and `amp > 0`.
    pub fn exponential(avg: f64, amp: f64) -> Result<Kernel, ClueError> {
        if !(avg > 0.0) || !(amp > 0.0) {
            return Err(ClueError::InvalidParameter {
                reason: format!(
                    "exponential kernel requires avg > 0 and amp > 0, got avg={avg}, amp={amp}"
                ),
            });
        }
        Ok(Kernel::Exponential { avg, amp })
    }

    /// Builds a Gaussian kernel. Fails unless `avg`, `std`, `amp` are all positive.
    pub fn gaussian(avg: f64, std: f64, amp: f64) -> Result<Kernel, ClueError> {
        if !(avg > 0.0) || !(std > 0.0) || !(amp > 0.0) {
            return Err(ClueError::InvalidParameter {
                reason: format!(
                    "gaussian kernel requires avg, std, amp > 0, got avg={avg}, std={std}, amp={amp}"
                ),
            });
        }
        Ok(Kernel::Gaussian { avg, std, amp })
    }

    /// Evaluates the kernel for a pair of points `i`, `j` separated by `dist`.
    ///
    /// The self-term (`i == j`) always returns `1.0`.
    pub fn eval(&self, dist: f64, i: usize, j: usize) -> f64 {
        if i == j {
            return 1.0;
        }
        match *self {
            Kernel::Flat(h) => h,
            Kernel::Exponential { avg, amp } => amp * (-avg * dist).exp(),
            Kernel::Gaussian { avg, std, amp } => {
                let z = (dist - avg) / std;
                amp * (-0.5 * z * z).exp()
            }
        }
    }
}

impl Default for Kernel {
    fn default() -> Self {
        Kernel::Flat(0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn self_term_is_always_one() {
        let flat = Kernel::flat(0.5).unwrap();
        let exp = Kernel::exponential(1.0, 2.0).unwrap();
        let gauss = Kernel::gaussian(1.0, 1.0, 2.0).unwrap();
        assert_eq!(flat.eval(0.0, 4, 4), 1.0);
        assert_eq!(exp.eval(0.0, 4, 4), 1.0);
        assert_eq!(gauss.eval(0.0, 4, 4), 1.0);
    }

    #[test]
    fn flat_rejects_non_positive_height() {
        assert!(Kernel::flat(0.0).is_err());
        assert!(Kernel::flat(-1.0).is_err());
    }

    #[test]
    fn exponential_rejects_bad_parameters() {
        assert!(Kernel::exponential(0.0, 1.0).is_err());
        assert!(Kernel::exponential(1.0, 0.0).is_err());
        assert!(Kernel::exponential(-1.0, 1.0).is_err());
    }

    #[test]
    fn gaussian_rejects_bad_parameters() {
        assert!(Kernel::gaussian(0.0, 1.0, 1.0).is_err());
        assert!(Kernel::gaussian(1.0, 0.0, 1.0).is_err());
        assert!(Kernel::gaussian(1.0, 1.0, 0.0).is_err());
    }

    #[test]
    fn flat_kernel_returns_constant_off_diagonal() {
        let k = Kernel::flat(0.75).unwrap();
        assert_eq!(k.eval(1.0, 0, 1), 0.75);
        assert_eq!(k.eval(10.0, 0, 1), 0.75);
    }

    #[test]
    fn exponential_decays_with_distance() {
        let k = Kernel::exponential(1.0, 2.0).unwrap();
        let near = k.eval(0.1, 0, 1);
        let far = k.eval(5.0, 0, 1);
        assert!(near > far);
    }

    #[test]
    fn gaussian_peaks_at_avg() {
        let k = Kernel::gaussian(2.0, 1.0, 3.0).unwrap();
        let at_peak = k.eval(2.0, 0, 1);
        let off_peak = k.eval(5.0, 0, 1);
        assert!((at_peak - 3.0).abs() < 1e-12);
        assert!(at_peak > off_peak);
    }
}
