// sentinel-embed/src/similarity.rs
//! Vector comparison kernels.

use libm::sqrtf;

/// Compute cosine similarity between two vectors.
///
/// Returns a value clamped to `[-1.0, 1.0]`. Vectors with a near-zero norm
/// compare as `0.0` rather than producing NaN.
#[inline]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a = sqrtf(a.iter().map(|x| x * x).sum::<f32>());
    let norm_b = sqrtf(b.iter().map(|x| x * x).sum::<f32>());

    if norm_a < 1e-8 || norm_b < 1e-8 {
        0.0
    } else {
        (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
    }
}

/// Normalize a vector to unit length in place. Zero vectors are left as-is.
#[inline]
pub fn l2_normalize(v: &mut [f32]) {
    let norm = sqrtf(v.iter().map(|x| x * x).sum::<f32>());
    if norm >= 1e-8 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn identical_vectors_cosine_one() {
        let a = [0.5f32; 16];
        let sim = cosine_similarity(&a, &a);
        assert!((sim - 1.0).abs() < 1e-6, "expected ~1.0, got {}", sim);
    }

    #[test]
    fn orthogonal_vectors_cosine_zero() {
        let mut a = vec![0.0f32; 16];
        let mut b = vec![0.0f32; 16];
        a[0] = 1.0;
        b[1] = 1.0;
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn zero_norm_guard() {
        let a = [0.0f32; 16];
        let b = [1.0f32; 16];
        let sim = cosine_similarity(&a, &b);
        assert!(!sim.is_nan());
        assert_eq!(sim, 0.0);
    }

    #[test]
    fn normalize_produces_unit_vector() {
        let mut v = vec![3.0f32, 4.0];
        l2_normalize(&mut v);
        let norm: f32 = v.iter().map(|x| x * x).sum();
        assert!((norm - 1.0).abs() < 1e-6);
    }

    #[test]
    fn normalize_leaves_zero_vector() {
        let mut v = vec![0.0f32; 8];
        l2_normalize(&mut v);
        assert!(v.iter().all(|x| *x == 0.0));
    }
}
