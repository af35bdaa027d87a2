//! Two-dimensional DCT-II and nested-square coefficient ordering.

use std::f64::consts::PI;

/// Unnormalised 2-D DCT-II of a row-major `height x width` block.
///
/// `out[u][v] = Σ_i Σ_j x[i][j]·cos(π·u·(2i+1)/2H)·cos(π·v·(2j+1)/2W)`,
/// each coefficient truncated toward zero to `i16`.
pub fn dct_2d(width: usize, height: usize, values: &[i8]) -> Vec<i16> {
    debug_assert_eq!(values.len(), width * height);

    let row_basis = cosine_basis(height);
    let col_basis = cosine_basis(width);
    let mut out = Vec::with_capacity(width * height);

    for u in 0..height {
        for v in 0..width {
            let mut sum = 0.0f64;
            for i in 0..height {
                let cu = row_basis[u * height + i];
                for j in 0..width {
                    sum += f64::from(values[i * width + j]) * cu * col_basis[v * width + j];
                }
            }
            out.push(sum as i16);
        }
    }

    out
}

// basis[k * n + i] = cos(π·k·(2i+1) / 2n)
fn cosine_basis(n: usize) -> Vec<f64> {
    let mut basis = Vec::with_capacity(n * n);
    for k in 0..n {
        for i in 0..n {
            basis.push((PI * k as f64 * (2 * i + 1) as f64 / (2 * n) as f64).cos());
        }
    }
    basis
}

/// Side length of the largest square that fits in `len` elements.
pub fn square_side(len: usize) -> usize {
    let mut side = (len as f64).sqrt() as usize;
    while side * side > len {
        side -= 1;
    }
    while (side + 1) * (side + 1) <= len {
        side += 1;
    }
    side
}

/// Reorder a row-major square matrix so that every prefix of length `k²`
/// is exactly its top-left `k x k` block.
///
/// Level `L` contributes the corner `(L, L)` followed by `(o, L)` and
/// `(L, o)` for each `o < L`.
pub fn flatten_nested_squares(matrix: &[i16]) -> Vec<i16> {
    let side = square_side(matrix.len());
    debug_assert_eq!(side * side, matrix.len(), "matrix must be square");

    let mut out = Vec::with_capacity(side * side);
    for level in 0..side {
        out.push(matrix[level * side + level]);
        for o in 0..level {
            out.push(matrix[o * side + level]);
            out.push(matrix[level * side + o]);
        }
    }
    out
}

/// Inverse of [`flatten_nested_squares`].
pub fn unflatten_nested_squares(samples: &[i16]) -> Vec<i16> {
    let side = square_side(samples.len());
    let mut matrix = vec![0i16; side * side];
    let mut it = samples.iter().copied();

    for level in 0..side {
        matrix[level * side + level] = it.next().unwrap_or_default();
        for o in 0..level {
            matrix[o * side + level] = it.next().unwrap_or_default();
            matrix[level * side + o] = it.next().unwrap_or_default();
        }
    }
    matrix
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_three_by_three() {
        let matrix = [0, 2, 5, 3, 1, 7, 6, 8, 4];
        assert_eq!(flatten_nested_squares(&matrix), (0..9).collect::<Vec<i16>>());
    }

    #[test]
    fn test_prefixes_are_top_left_blocks() {
        let side = 8;
        let matrix: Vec<i16> = (0..(side * side) as i16).collect();
        let flat = flatten_nested_squares(&matrix);

        for k in 1..=side {
            let mut prefix: Vec<i16> = flat[..k * k].to_vec();
            let mut block: Vec<i16> = (0..k)
                .flat_map(|r| (0..k).map(move |c| (r * side + c) as i16))
                .collect();
            prefix.sort_unstable();
            block.sort_unstable();
            assert_eq!(prefix, block, "prefix of level {k} is not the top-left block");
        }
    }

    #[test]
    fn test_unflatten_inverts_flatten() {
        let matrix: Vec<i16> = (100..164).collect();
        let flat = flatten_nested_squares(&matrix);
        assert_eq!(unflatten_nested_squares(&flat), matrix);
    }

    #[test]
    fn test_dct_constant_block_has_only_dc() {
        let values = [10i8; 64];
        let out = dct_2d(8, 8, &values);
        assert_eq!(out[0], 640);
        assert!(out[1..].iter().all(|&c| c == 0), "AC terms: {:?}", &out[1..]);
    }

    #[test]
    fn test_dct_horizontal_ramp_has_no_vertical_frequencies() {
        let values: Vec<i8> = (0..64).map(|i| (i % 8) as i8 * 10 - 35).collect();
        let out = dct_2d(8, 8, &values);
        for u in 1..8 {
            for v in 0..8 {
                assert_eq!(out[u * 8 + v], 0, "coefficient ({u},{v}) should vanish");
            }
        }
        assert_ne!(out[1], 0);
    }

    #[test]
    fn test_square_side() {
        assert_eq!(square_side(0), 0);
        assert_eq!(square_side(1), 1);
        assert_eq!(square_side(4), 2);
        assert_eq!(square_side(63), 7);
        assert_eq!(square_side(64), 8);
    }
}
