use super::ArrayBackend;

/// Straight sample-by-sample loops.
pub struct Scalar;

impl ArrayBackend for Scalar {
    fn fill(dst: &mut [f32], value: f32) {
        for d in dst.iter_mut() {
            *d = value;
        }
    }

    fn add(dst: &mut [f32], src: &[f32]) {
        for (d, s) in dst.iter_mut().zip(src) {
            *d += s;
        }
    }

    fn add_into(a: &[f32], b: &[f32], dst: &mut [f32]) {
        for ((d, x), y) in dst.iter_mut().zip(a).zip(b) {
            *d = x + y;
        }
    }

    fn sub(dst: &mut [f32], src: &[f32]) {
        for (d, s) in dst.iter_mut().zip(src) {
            *d -= s;
        }
    }

    fn sub_into(a: &[f32], b: &[f32], dst: &mut [f32]) {
        for ((d, x), y) in dst.iter_mut().zip(a).zip(b) {
            *d = x - y;
        }
    }

    fn mul(dst: &mut [f32], src: &[f32]) {
        for (d, s) in dst.iter_mut().zip(src) {
            *d *= s;
        }
    }

    fn mul_into(a: &[f32], b: &[f32], dst: &mut [f32]) {
        for ((d, x), y) in dst.iter_mut().zip(a).zip(b) {
            *d = x * y;
        }
    }

    fn scale(dst: &mut [f32], gain: f32) {
        for d in dst.iter_mut() {
            *d *= gain;
        }
    }

    fn scale_into(src: &[f32], gain: f32, dst: &mut [f32]) {
        for (d, s) in dst.iter_mut().zip(src) {
            *d = s * gain;
        }
    }

    fn offset(dst: &mut [f32], value: f32) {
        for d in dst.iter_mut() {
            *d += value;
        }
    }

    fn offset_into(src: &[f32], value: f32, dst: &mut [f32]) {
        for (d, s) in dst.iter_mut().zip(src) {
            *d = s + value;
        }
    }

    fn negate(dst: &mut [f32]) {
        for d in dst.iter_mut() {
            *d = -*d;
        }
    }

    fn negate_into(src: &[f32], dst: &mut [f32]) {
        for (d, s) in dst.iter_mut().zip(src) {
            *d = -s;
        }
    }

    fn abs(dst: &mut [f32]) {
        for d in dst.iter_mut() {
            *d = libm::fabsf(*d);
        }
    }

    fn abs_into(src: &[f32], dst: &mut [f32]) {
        for (d, s) in dst.iter_mut().zip(src) {
            *d = libm::fabsf(*s);
        }
    }

    fn sum(src: &[f32]) -> f32 {
        let mut acc = 0.0;
        for s in src {
            acc += s;
        }
        acc
    }

    fn power(src: &[f32]) -> f32 {
        let mut acc = 0.0;
        for s in src {
            acc += s * s;
        }
        acc
    }

    fn min(src: &[f32]) -> (f32, usize) {
        let Some(&first) = src.first() else {
            return (0.0, 0);
        };
        let mut best = (first, 0);
        for (i, &v) in src.iter().enumerate().skip(1) {
            if v < best.0 {
                best = (v, i);
            }
        }
        best
    }

    fn max(src: &[f32]) -> (f32, usize) {
        let Some(&first) = src.first() else {
            return (0.0, 0);
        };
        let mut best = (first, 0);
        for (i, &v) in src.iter().enumerate().skip(1) {
            if v > best.0 {
                best = (v, i);
            }
        }
        best
    }

    fn convolve(a: &[f32], b: &[f32], dst: &mut [f32]) {
        if a.is_empty() || b.is_empty() {
            return;
        }
        let n = a.len() + b.len() - 1;
        Self::convolve_partial(a, b, dst, 0, n);
    }

    fn convolve_partial(a: &[f32], b: &[f32], dst: &mut [f32], offset: usize, samples: usize) {
        let end = (offset + samples).min(dst.len());
        for n in offset..end {
            let mut acc = 0.0;
            for (k, &h) in b.iter().enumerate() {
                // a[n - k], skipping indices outside a
                if k > n {
                    break;
                }
                if let Some(&x) = a.get(n - k) {
                    acc += x * h;
                }
            }
            dst[n] = acc;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_convolution() {
        let a = [1.0, 2.0, 3.0];
        let b = [0.0, 1.0, 0.5];
        let mut out = [0.0; 5];
        Scalar::convolve(&a, &b, &mut out);
        assert_eq!(out, [0.0, 1.0, 2.5, 4.0, 1.5]);
    }

    #[test]
    fn min_max_pick_first_occurrence() {
        let data = [3.0, -1.0, 7.0, -1.0, 7.0];
        assert_eq!(Scalar::min(&data), (-1.0, 1));
        assert_eq!(Scalar::max(&data), (7.0, 2));
        assert_eq!(Scalar::max(&[]), (0.0, 0));
    }
}
