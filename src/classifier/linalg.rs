//! Small dense linear algebra helpers for the Newton solver

use crate::error::{Result, TrainError};

/// Dot product of two equal-length slices
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

pub fn norm(a: &[f64]) -> f64 {
    dot(a, a).sqrt()
}

/// Solve `A x = b` for a symmetric positive definite `A` (row-major, `n x n`)
/// via Cholesky factorisation.
pub fn cholesky_solve(a: &[f64], b: &[f64]) -> Result<Vec<f64>> {
    let n = b.len();
    if a.len() != n * n {
        return Err(TrainError::DimensionMismatch {
            expected: n * n,
            found: a.len(),
        });
    }

    // Lower triangle, row-major
    let mut l = vec![0.0; n * n];
    for i in 0..n {
        for j in 0..=i {
            let mut sum = a[i * n + j];
            for k in 0..j {
                sum -= l[i * n + k] * l[j * n + k];
            }
            if i == j {
                if sum <= 0.0 || !sum.is_finite() {
                    return Err(TrainError::Singular);
                }
                l[i * n + i] = sum.sqrt();
            } else {
                l[i * n + j] = sum / l[j * n + j];
            }
        }
    }

    // L y = b
    let mut y = vec![0.0; n];
    for i in 0..n {
        let mut sum = b[i];
        for k in 0..i {
            sum -= l[i * n + k] * y[k];
        }
        y[i] = sum / l[i * n + i];
    }

    // L^T x = y
    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = y[i];
        for k in (i + 1)..n {
            sum -= l[k * n + i] * x[k];
        }
        x[i] = sum / l[i * n + i];
    }

    Ok(x)
}

/// Solve `A x = b` for a symmetric positive definite `A` that may be badly
/// scaled.
///
/// The system is Jacobi-scaled to unit diagonal before factorising. If the
/// factorisation still breaks down, a growing ridge is added to the diagonal.
pub fn solve_spd(a: &[f64], b: &[f64]) -> Result<Vec<f64>> {
    let n = b.len();
    if a.len() != n * n {
        return Err(TrainError::DimensionMismatch {
            expected: n * n,
            found: a.len(),
        });
    }

    let mut scale = Vec::with_capacity(n);
    for i in 0..n {
        let d = a[i * n + i];
        if d <= 0.0 || !d.is_finite() {
            return Err(TrainError::Singular);
        }
        scale.push(1.0 / d.sqrt());
    }

    let mut scaled = vec![0.0; n * n];
    for i in 0..n {
        for j in 0..n {
            scaled[i * n + j] = a[i * n + j] * scale[i] * scale[j];
        }
    }
    let scaled_b: Vec<f64> = b.iter().zip(&scale).map(|(v, s)| v * s).collect();

    let mut ridge = 0.0;
    for _ in 0..12 {
        let mut attempt = scaled.clone();
        for i in 0..n {
            attempt[i * n + i] += ridge;
        }
        match cholesky_solve(&attempt, &scaled_b) {
            Ok(y) => return Ok(y.iter().zip(&scale).map(|(v, s)| v * s).collect()),
            Err(TrainError::Singular) => {
                ridge = if ridge == 0.0 { 1e-12 } else { ridge * 10.0 };
            }
            Err(e) => return Err(e),
        }
    }
    Err(TrainError::Singular)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cholesky_solve() {
        // [[4, 2], [2, 3]] x = [2, 1] -> x = [0.5, 0]
        let x = cholesky_solve(&[4.0, 2.0, 2.0, 3.0], &[2.0, 1.0]).unwrap();
        assert!((x[0] - 0.5).abs() < 1e-12);
        assert!(x[1].abs() < 1e-12);
    }

    #[test]
    fn test_solve_spd_badly_scaled() {
        // diag(1e12, 1) scaled system
        let x = solve_spd(&[1e12, 0.0, 0.0, 1.0], &[2e12, 3.0]).unwrap();
        assert!((x[0] - 2.0).abs() < 1e-9);
        assert!((x[1] - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_cholesky_rejects_indefinite() {
        let err = cholesky_solve(&[1.0, 2.0, 2.0, 1.0], &[1.0, 1.0]).unwrap_err();
        assert!(matches!(err, TrainError::Singular));
    }
}
