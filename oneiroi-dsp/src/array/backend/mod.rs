//! Array primitive backends.
//!
//! Every [`FloatArray`](super::FloatArray) operation that touches whole
//! buffers funnels through an [`ArrayBackend`]. Two implementations exist and
//! both are always compiled; the `accel` feature decides which one is
//! [`Active`]. Whichever is linked must produce the same numbers within
//! floating-point tolerance.

mod scalar;
mod unrolled;

pub use scalar::Scalar;
pub use unrolled::Unrolled;

/// Backend selected for this build.
#[cfg(not(feature = "accel"))]
pub type Active = Scalar;

/// Backend selected for this build.
#[cfg(feature = "accel")]
pub type Active = Unrolled;

/// Buffer-wide primitives.
///
/// Binary `_into` forms read `a.len()` elements; destinations must be at
/// least that long. In-place forms cover the aliasing case where source and
/// destination are the same buffer.
pub trait ArrayBackend {
    fn fill(dst: &mut [f32], value: f32);

    fn add(dst: &mut [f32], src: &[f32]);
    fn add_into(a: &[f32], b: &[f32], dst: &mut [f32]);
    fn sub(dst: &mut [f32], src: &[f32]);
    fn sub_into(a: &[f32], b: &[f32], dst: &mut [f32]);
    fn mul(dst: &mut [f32], src: &[f32]);
    fn mul_into(a: &[f32], b: &[f32], dst: &mut [f32]);

    fn scale(dst: &mut [f32], gain: f32);
    fn scale_into(src: &[f32], gain: f32, dst: &mut [f32]);
    fn offset(dst: &mut [f32], value: f32);
    fn offset_into(src: &[f32], value: f32, dst: &mut [f32]);

    fn negate(dst: &mut [f32]);
    fn negate_into(src: &[f32], dst: &mut [f32]);
    fn abs(dst: &mut [f32]);
    fn abs_into(src: &[f32], dst: &mut [f32]);

    fn sum(src: &[f32]) -> f32;
    /// Sum of squares.
    fn power(src: &[f32]) -> f32;
    /// Smallest value and the index of its first occurrence; `(0.0, 0)` when empty.
    fn min(src: &[f32]) -> (f32, usize);
    /// Largest value and the index of its first occurrence; `(0.0, 0)` when empty.
    fn max(src: &[f32]) -> (f32, usize);

    /// Full convolution; writes `a.len() + b.len() - 1` outputs.
    fn convolve(a: &[f32], b: &[f32], dst: &mut [f32]);
    /// Convolution outputs `offset..offset + samples`, stored at the same
    /// indices a full convolution would use.
    fn convolve_partial(a: &[f32], b: &[f32], dst: &mut [f32], offset: usize, samples: usize);
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::vec::Vec;

    fn close(a: f32, b: f32, tol: f32) -> bool {
        (a - b).abs() <= tol * (1.0 + a.abs().max(b.abs()))
    }

    fn signal() -> impl Strategy<Value = Vec<f32>> {
        proptest::collection::vec(-4.0f32..4.0, 0..67)
    }

    proptest! {
        #[test]
        fn elementwise_ops_match(a in signal(), s in -2.0f32..2.0) {
            let b: Vec<f32> = a.iter().map(|x| x * 0.5 - 0.25).collect();
            let n = a.len();

            let mut x = vec![0.0; n];
            let mut y = vec![0.0; n];
            Scalar::add_into(&a, &b, &mut x);
            Unrolled::add_into(&a, &b, &mut y);
            prop_assert_eq!(&x, &y);

            Scalar::mul_into(&a, &b, &mut x);
            Unrolled::mul_into(&a, &b, &mut y);
            prop_assert_eq!(&x, &y);

            Scalar::sub(&mut x, &b);
            Unrolled::sub(&mut y, &b);
            prop_assert_eq!(&x, &y);

            Scalar::scale_into(&a, s, &mut x);
            Unrolled::scale_into(&a, s, &mut y);
            prop_assert_eq!(&x, &y);

            Scalar::offset(&mut x, s);
            Unrolled::offset(&mut y, s);
            Scalar::negate(&mut x);
            Unrolled::negate(&mut y);
            Scalar::abs(&mut x);
            Unrolled::abs(&mut y);
            prop_assert_eq!(&x, &y);
        }

        #[test]
        fn reductions_match(a in signal()) {
            let magnitude: f32 = a.iter().map(|x| x.abs()).sum();
            prop_assert!((Scalar::sum(&a) - Unrolled::sum(&a)).abs() <= 1e-5 * (1.0 + magnitude));
            prop_assert!(close(Scalar::power(&a), Unrolled::power(&a), 1e-5));
            prop_assert_eq!(Scalar::min(&a), Unrolled::min(&a));
            prop_assert_eq!(Scalar::max(&a), Unrolled::max(&a));
        }

        #[test]
        fn convolution_matches(a in proptest::collection::vec(-1.0f32..1.0, 1..24),
                               b in proptest::collection::vec(-1.0f32..1.0, 1..9)) {
            let n = a.len() + b.len() - 1;
            let mut x = vec![0.0; n];
            let mut y = vec![0.0; n];
            Scalar::convolve(&a, &b, &mut x);
            Unrolled::convolve(&a, &b, &mut y);
            for (p, q) in x.iter().zip(&y) {
                prop_assert!(close(*p, *q, 1e-5));
            }
        }
    }

    #[test]
    fn active_backend_is_usable() {
        let mut buf = [1.0f32; 5];
        Active::scale(&mut buf, 2.0);
        assert_eq!(buf, [2.0; 5]);
    }
}
