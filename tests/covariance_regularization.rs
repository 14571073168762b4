use manifold_ad::covariance::{assure_positive_definite, is_positive_definite, DEFAULT_EPSILON};
use manifold_ad::{assert_finite, check_finite, NumericError};
use nalgebra::{DMatrix, Matrix4, SymmetricEigen};

/// Deterministic pseudo-random symmetric matrices in [-1, 1].
fn symmetric(seed: u64, n: usize) -> DMatrix<f64> {
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    let mut next = move || {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((state >> 11) as f64 / (1u64 << 53) as f64) * 2.0 - 1.0
    };
    let a = DMatrix::from_fn(n, n, |_, _| next());
    (&a + a.transpose()) * 0.5
}

// ── Regularizer ─────────────────────────────────────────────────────

#[test]
fn random_symmetric_matrices_become_positive_definite() {
    for seed in 0..40 {
        let n = 2 + (seed as usize % 7);
        let mut p = symmetric(seed, n);
        let clamped = assure_positive_definite(&mut p, 1e-6).unwrap();
        assert!(is_positive_definite(&p), "seed {} clamped {}", seed, clamped);

        let min = SymmetricEigen::new(p.clone()).eigenvalues.min();
        assert!(min >= 1e-6, "seed {}: min eigenvalue {}", seed, min);
    }
}

#[test]
fn second_pass_leaves_output_bit_identical() {
    for seed in 100..300 {
        let mut once = symmetric(seed, 5);
        assure_positive_definite(&mut once, 1e-3).unwrap();
        let mut twice = once.clone();
        assert_eq!(assure_positive_definite(&mut twice, 1e-3), Ok(0), "seed {}", seed);
        assert_eq!(once, twice, "seed {}", seed);
    }
}

#[test]
fn well_conditioned_covariance_is_bit_identical() {
    let a = Matrix4::from_fn(|i, j| ((i + 1) * (j + 1)) as f64 + if i == j { 10.0 } else { 0.0 });
    let p = a * a.transpose();
    let mut q = p;
    assert_eq!(assure_positive_definite(&mut q, DEFAULT_EPSILON), Ok(0));
    assert_eq!(q, p);
}

#[test]
fn error_messages() {
    let mut p = DMatrix::<f64>::zeros(3, 2);
    let err = assure_positive_definite(&mut p, DEFAULT_EPSILON).unwrap_err();
    assert_eq!(err.to_string(), "matrix is 3x2, expected a square matrix");
}

// ── Finiteness macros ───────────────────────────────────────────────

#[test]
fn check_finite_from_outside_the_crate() {
    let state = nalgebra::Vector3::new(1.0, 2.0, 3.0);
    let gain = DMatrix::<f64>::from_element(3, 3, f64::NAN);
    assert_eq!(check_finite!(state), Ok(()));
    let err = check_finite!(state, gain).unwrap_err();
    assert_eq!(err, NumericError::NotFinite { expression: "gain" });
    assert_eq!(err.to_string(), "`gain` contains NaN or infinite values");
}

#[test]
fn assert_finite_accepts_finite_values() {
    let p = Matrix4::<f64>::identity();
    assert_finite!(p, 1.0_f64);
}
