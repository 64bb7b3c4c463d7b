//! Slice kernels shared by the runtime-sized and compile-time-sized types.
//!
//! Matrices are passed as row-major slices. Callers validate sizes; the
//! kernels only `debug_assert!` them.

/// Largest square order accepted by [`determinant`] (one bit per column).
pub(crate) const MAX_DET_ORDER: usize = u64::BITS as usize;

#[inline]
pub(crate) fn dot(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[inline]
pub(crate) fn distance_squared(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = y - x;
            d * d
        })
        .sum()
}

#[inline]
pub(crate) fn lerp(dst: &mut [f32], target: &[f32], t: f32) {
    debug_assert_eq!(dst.len(), target.len());
    for (d, s) in dst.iter_mut().zip(target) {
        *d += (s - *d) * t;
    }
}

/// `acos` of the cosine between `a` and `b`, or `None` if either is zero-length.
///
/// The cosine is clamped to [-1, 1] so rounding cannot push it out of the
/// domain of `acos`. Each magnitude is rooted before multiplying, so very
/// small or very large operands do not underflow or overflow the product.
pub(crate) fn angle(a: &[f32], b: &[f32]) -> Option<f32> {
    let (aa, bb) = (dot(a, a), dot(b, b));
    if aa == 0.0 || bb == 0.0 {
        return None;
    }
    let denom = aa.sqrt() * bb.sqrt();
    if denom == 0.0 || !denom.is_finite() {
        return None;
    }
    Some((dot(a, b) / denom).clamp(-1.0, 1.0).acos())
}

/// Scales `v` to unit length, returning `false` (and leaving `v` untouched)
/// when it is zero-length or has a non-finite component.
///
/// Components are divided by the largest magnitude first, so vectors whose
/// squared length would overflow or underflow still normalize.
pub(crate) fn normalize(v: &mut [f32]) -> bool {
    if v.iter().any(|x| !x.is_finite()) {
        return false;
    }
    let max = v.iter().fold(0.0f32, |m, x| m.max(x.abs()));
    if max == 0.0 {
        return false;
    }
    let mag = v.iter().map(|x| (x / max) * (x / max)).sum::<f32>().sqrt();
    for x in v.iter_mut() {
        *x = (*x / max) / mag;
    }
    true
}

/// `out = a * b` for an `a_rows x inner` matrix and an `inner x b_cols` matrix.
pub(crate) fn multiply(
    a: &[f32],
    a_rows: usize,
    inner: usize,
    b: &[f32],
    b_cols: usize,
    out: &mut [f32],
) {
    debug_assert_eq!(a.len(), a_rows * inner);
    debug_assert_eq!(b.len(), inner * b_cols);
    debug_assert_eq!(out.len(), a_rows * b_cols);

    for i in 0..a_rows {
        let row = &a[i * inner..(i + 1) * inner];
        for j in 0..b_cols {
            out[i * b_cols + j] = row.iter().enumerate().map(|(k, x)| x * b[k * b_cols + j]).sum();
        }
    }
}

/// `out[i] = Σ_j m[i][j] * v[j]` for a `rows x v.len()` matrix.
///
/// `out` must not alias `v`; callers pass a snapshot or a fresh buffer.
pub(crate) fn transform(m: &[f32], rows: usize, v: &[f32], out: &mut [f32]) {
    let cols = v.len();
    debug_assert_eq!(m.len(), rows * cols);
    debug_assert_eq!(out.len(), rows);

    for (i, o) in out.iter_mut().enumerate() {
        *o = dot(&m[i * cols..(i + 1) * cols], v);
    }
}

/// In-place transpose of an `n x n` row-major matrix.
///
/// Only the strict upper triangle is visited, so every off-diagonal pair is
/// swapped exactly once.
pub(crate) fn transpose_square(m: &mut [f32], n: usize) {
    debug_assert_eq!(m.len(), n * n);
    for i in 0..n {
        for j in (i + 1)..n {
            m.swap(i * n + j, j * n + i);
        }
    }
}

/// Determinant of an `n x n` row-major matrix by cofactor expansion along
/// the last row. O(n!), meant for the small orders used in rendering.
pub(crate) fn determinant(m: &[f32], n: usize) -> f32 {
    debug_assert_eq!(m.len(), n * n);
    debug_assert!(n <= MAX_DET_ORDER);

    let cols = if n == MAX_DET_ORDER { u64::MAX } else { (1u64 << n) - 1 };
    cofactor(m, n, n, cols)
}

// Determinant of the minor made of rows 0..k and the columns set in `cols`.
// Expanding along the last row always leaves rows 0..k-1, so only the column
// set needs tracking.
fn cofactor(m: &[f32], stride: usize, k: usize, cols: u64) -> f32 {
    match k {
        0 => 1.0,
        1 => m[cols.trailing_zeros() as usize],
        2 => {
            let c0 = cols.trailing_zeros() as usize;
            let c1 = (cols & (cols - 1)).trailing_zeros() as usize;
            m[c0] * m[stride + c1] - m[c1] * m[stride + c0]
        }
        _ => {
            let row = (k - 1) * stride;
            let mut det = 0.0;
            let mut rest = cols;
            let mut pos = 0usize;

            while rest != 0 {
                let col = rest.trailing_zeros() as usize;
                rest &= rest - 1;

                // Zero entries are still multiplied so NaN and inf propagate.
                let term = m[row + col] * cofactor(m, stride, k - 1, cols & !(1u64 << col));
                // Sign of the (k-1, pos) cofactor.
                if (k - 1 + pos) % 2 == 0 {
                    det += term;
                } else {
                    det -= term;
                }
                pos += 1;
            }

            det
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() <= 1e-5 * (1.0 + a.abs().max(b.abs()))
    }

    // ── determinant ───────────────────────────────────────────────────────

    #[test]
    fn determinant_2x2() {
        assert_eq!(determinant(&[1.0, 2.0, 3.0, 4.0], 2), -2.0);
    }

    #[test]
    fn determinant_3x3() {
        // Expanded by hand along the first row: 2*(0*1-1*4) - 0 + 1*(1*4-0*3) = -4.
        let m = [2.0, 0.0, 1.0, 1.0, 0.0, 1.0, 3.0, 4.0, 1.0];
        assert!(close(determinant(&m, 3), -4.0));
    }

    #[test]
    fn determinant_4x4_diagonal() {
        let mut m = [0.0f32; 16];
        for (i, v) in [2.0, 3.0, 4.0, 5.0].into_iter().enumerate() {
            m[i * 4 + i] = v;
        }
        assert!(close(determinant(&m, 4), 120.0));
    }

    #[test]
    fn determinant_4x4_row_swap_flips_sign() {
        // Identity with rows 0 and 1 swapped.
        let m = [
            0.0, 1.0, 0.0, 0.0, //
            1.0, 0.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ];
        assert!(close(determinant(&m, 4), -1.0));
    }

    #[test]
    fn determinant_propagates_nan_through_zero_entries() {
        // The last-row zero at column 1 multiplies a minor of inf*0 - 0*1 = NaN.
        let m = [
            f32::INFINITY, 1.0, 0.0, //
            1.0, 1.0, 0.0, //
            0.0, 0.0, 1.0,
        ];
        assert!(determinant(&m, 3).is_nan());
    }

    #[test]
    fn determinant_1x1_and_empty() {
        assert_eq!(determinant(&[7.5], 1), 7.5);
        assert_eq!(determinant(&[], 0), 1.0);
    }

    // ── multiply / transform ──────────────────────────────────────────────

    #[test]
    fn multiply_rectangular() {
        // (2x3) * (3x1)
        let a = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let b = [1.0, 0.0, -1.0];
        let mut out = [0.0; 2];
        multiply(&a, 2, 3, &b, 1, &mut out);
        assert_eq!(out, [-2.0, -2.0]);
    }

    #[test]
    fn transform_rectangular() {
        let m = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let mut out = [0.0; 2];
        transform(&m, 2, &[1.0, 1.0, 1.0], &mut out);
        assert_eq!(out, [6.0, 15.0]);
    }

    // ── transpose ─────────────────────────────────────────────────────────

    #[test]
    fn transpose_swaps_each_pair_once() {
        let mut m = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0];
        transpose_square(&mut m, 3);
        assert_eq!(m, [1.0, 4.0, 7.0, 2.0, 5.0, 8.0, 3.0, 6.0, 9.0]);
    }

    // ── angle ─────────────────────────────────────────────────────────────

    #[test]
    fn angle_of_parallel_vectors_is_zero_despite_rounding() {
        let a = [0.1, 0.2, 0.3];
        let b = [0.3, 0.6, 0.9];
        let theta = angle(&a, &b).unwrap();
        assert!(!theta.is_nan());
        assert!(theta.abs() < 1e-3);
    }

    #[test]
    fn angle_with_zero_vector_is_none() {
        assert!(angle(&[0.0, 0.0], &[1.0, 0.0]).is_none());
    }

    #[test]
    fn angle_of_tiny_orthogonal_vectors() {
        let theta = angle(&[1e-12, 0.0, 0.0], &[0.0, 1e-12, 0.0]).unwrap();
        assert!(close(theta, core::f32::consts::FRAC_PI_2));
    }

    #[test]
    fn angle_of_huge_vectors_is_finite() {
        let theta = angle(&[1e10, 0.0, 0.0], &[1e10, 1.0, 0.0]).unwrap();
        assert!(theta.abs() < 1e-3);
    }

    // ── normalize ─────────────────────────────────────────────────────────

    #[test]
    fn normalize_prescales_huge_components() {
        let mut v = [1e20, 1e20, 0.0];
        assert!(normalize(&mut v));
        assert!(close(v[0], core::f32::consts::FRAC_1_SQRT_2));
        assert!(close(v[1], core::f32::consts::FRAC_1_SQRT_2));
        assert_eq!(v[2], 0.0);
    }

    #[test]
    fn normalize_rejects_non_finite_without_writing() {
        let mut v = [f32::NAN, 1.0];
        assert!(!normalize(&mut v));
        assert!(v[0].is_nan());
        assert_eq!(v[1], 1.0);
    }
}
