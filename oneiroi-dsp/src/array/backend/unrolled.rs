use super::{ArrayBackend, Scalar};

/// Four-lane unrolled loops.
///
/// The hot elementwise kernels and the reductions are processed in chunks of
/// four so the optimiser can keep lanes in registers; the remainder is
/// handled one sample at a time. Index-returning searches and convolution
/// reuse the scalar code.
pub struct Unrolled;

const LANES: usize = 4;

macro_rules! binary_in_place {
    ($dst:ident, $src:ident, |$d:ident, $s:ident| $body:expr) => {{
        let n = $dst.len().min($src.len());
        let (dst, src) = (&mut $dst[..n], &$src[..n]);
        let mut dc = dst.chunks_exact_mut(LANES);
        let mut sc = src.chunks_exact(LANES);
        for (dd, ss) in (&mut dc).zip(&mut sc) {
            for lane in 0..LANES {
                let $d = &mut dd[lane];
                let $s = ss[lane];
                $body;
            }
        }
        for ($d, &$s) in dc.into_remainder().iter_mut().zip(sc.remainder()) {
            $body;
        }
    }};
}

macro_rules! binary_into {
    ($a:ident, $b:ident, $dst:ident, |$x:ident, $y:ident| $body:expr) => {{
        let n = $a.len().min($b.len()).min($dst.len());
        let (a, b, dst) = (&$a[..n], &$b[..n], &mut $dst[..n]);
        let mut dc = dst.chunks_exact_mut(LANES);
        let mut ac = a.chunks_exact(LANES);
        let mut bc = b.chunks_exact(LANES);
        for ((dd, aa), bb) in (&mut dc).zip(&mut ac).zip(&mut bc) {
            for lane in 0..LANES {
                let ($x, $y) = (aa[lane], bb[lane]);
                dd[lane] = $body;
            }
        }
        for ((d, &$x), &$y) in dc
            .into_remainder()
            .iter_mut()
            .zip(ac.remainder())
            .zip(bc.remainder())
        {
            *d = $body;
        }
    }};
}

macro_rules! unary_in_place {
    ($dst:ident, |$d:ident| $body:expr) => {{
        let mut dc = $dst.chunks_exact_mut(LANES);
        for dd in &mut dc {
            for $d in dd.iter_mut() {
                $body;
            }
        }
        for $d in dc.into_remainder().iter_mut() {
            $body;
        }
    }};
}

macro_rules! unary_into {
    ($src:ident, $dst:ident, |$s:ident| $body:expr) => {{
        let n = $src.len().min($dst.len());
        let (src, dst) = (&$src[..n], &mut $dst[..n]);
        let mut dc = dst.chunks_exact_mut(LANES);
        let mut sc = src.chunks_exact(LANES);
        for (dd, ss) in (&mut dc).zip(&mut sc) {
            for lane in 0..LANES {
                let $s = ss[lane];
                dd[lane] = $body;
            }
        }
        for (d, &$s) in dc.into_remainder().iter_mut().zip(sc.remainder()) {
            *d = $body;
        }
    }};
}

impl ArrayBackend for Unrolled {
    fn fill(dst: &mut [f32], value: f32) {
        unary_in_place!(dst, |d| *d = value);
    }

    fn add(dst: &mut [f32], src: &[f32]) {
        binary_in_place!(dst, src, |d, s| *d += s);
    }

    fn add_into(a: &[f32], b: &[f32], dst: &mut [f32]) {
        binary_into!(a, b, dst, |x, y| x + y);
    }

    fn sub(dst: &mut [f32], src: &[f32]) {
        binary_in_place!(dst, src, |d, s| *d -= s);
    }

    fn sub_into(a: &[f32], b: &[f32], dst: &mut [f32]) {
        binary_into!(a, b, dst, |x, y| x - y);
    }

    fn mul(dst: &mut [f32], src: &[f32]) {
        binary_in_place!(dst, src, |d, s| *d *= s);
    }

    fn mul_into(a: &[f32], b: &[f32], dst: &mut [f32]) {
        binary_into!(a, b, dst, |x, y| x * y);
    }

    fn scale(dst: &mut [f32], gain: f32) {
        unary_in_place!(dst, |d| *d *= gain);
    }

    fn scale_into(src: &[f32], gain: f32, dst: &mut [f32]) {
        unary_into!(src, dst, |s| s * gain);
    }

    fn offset(dst: &mut [f32], value: f32) {
        unary_in_place!(dst, |d| *d += value);
    }

    fn offset_into(src: &[f32], value: f32, dst: &mut [f32]) {
        unary_into!(src, dst, |s| s + value);
    }

    fn negate(dst: &mut [f32]) {
        unary_in_place!(dst, |d| *d = -*d);
    }

    fn negate_into(src: &[f32], dst: &mut [f32]) {
        unary_into!(src, dst, |s| -s);
    }

    fn abs(dst: &mut [f32]) {
        unary_in_place!(dst, |d| *d = libm::fabsf(*d));
    }

    fn abs_into(src: &[f32], dst: &mut [f32]) {
        unary_into!(src, dst, |s| libm::fabsf(s));
    }

    fn sum(src: &[f32]) -> f32 {
        let mut acc = [0.0f32; LANES];
        let chunks = src.chunks_exact(LANES);
        let tail: f32 = chunks.remainder().iter().sum();
        for c in chunks {
            for lane in 0..LANES {
                acc[lane] += c[lane];
            }
        }
        (acc[0] + acc[1]) + (acc[2] + acc[3]) + tail
    }

    fn power(src: &[f32]) -> f32 {
        let mut acc = [0.0f32; LANES];
        let chunks = src.chunks_exact(LANES);
        let tail: f32 = chunks.remainder().iter().map(|x| x * x).sum();
        for c in chunks {
            for lane in 0..LANES {
                acc[lane] += c[lane] * c[lane];
            }
        }
        (acc[0] + acc[1]) + (acc[2] + acc[3]) + tail
    }

    fn min(src: &[f32]) -> (f32, usize) {
        Scalar::min(src)
    }

    fn max(src: &[f32]) -> (f32, usize) {
        Scalar::max(src)
    }

    fn convolve(a: &[f32], b: &[f32], dst: &mut [f32]) {
        Scalar::convolve(a, b, dst)
    }

    fn convolve_partial(a: &[f32], b: &[f32], dst: &mut [f32], offset: usize, samples: usize) {
        Scalar::convolve_partial(a, b, dst, offset, samples)
    }
}
