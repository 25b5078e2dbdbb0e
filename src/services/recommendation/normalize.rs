use super::matrix::DenseMatrix;

/// Column-wise min-max scaling into `[0, 1]`
///
/// A constant column (including an all-zero one) has no spread to scale by
/// and becomes all zeros. Non-finite inputs are also written as zero so the
/// result never contains NaN.
pub fn min_max_columns(matrix: &DenseMatrix) -> DenseMatrix {
    let cols = matrix.cols();
    let mut normalized = matrix.clone();
    if cols == 0 {
        return normalized;
    }

    let bounds: Vec<(f64, f64)> = (0..cols)
        .map(|col| {
            matrix
                .column(col)
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                    (lo.min(v), hi.max(v))
                })
        })
        .collect();

    for cells in normalized.values_mut().chunks_mut(cols) {
        for (cell, &(min, max)) in cells.iter_mut().zip(&bounds) {
            let spread = max - min;
            let scaled = if spread > 0.0 && spread.is_finite() {
                (*cell - min) / spread
            } else {
                0.0
            };
            *cell = if scaled.is_finite() { scaled } else { 0.0 };
        }
    }

    normalized
}
