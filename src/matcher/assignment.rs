//! One-to-one assignment over an IoU matrix.

use ndarray::Array2;

use crate::error::{Error, Result};

/// Cost assigned to padding cells of the square solver matrix.
const PAD_COST: f64 = 1e6;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssignmentResult {
    /// `(row, col)` pairs in row order
    pub matches: Vec<(usize, usize)>,
}

/// Solve the assignment maximizing total IoU.
///
/// Rows and columns are paired by minimizing `1 - iou` with `lapjv`. Pairs whose
/// IoU falls below `threshold` are dropped after solving.
pub fn max_iou_assignment(iou: &Array2<f64>, threshold: f64) -> Result<AssignmentResult> {
    let (num_rows, num_cols) = iou.dim();

    if num_rows == 0 || num_cols == 0 {
        return Ok(AssignmentResult::default());
    }

    let size = num_rows.max(num_cols);
    let mut padded = Array2::<f64>::from_elem((size, size), PAD_COST);
    for ((i, j), &value) in iou.indexed_iter() {
        padded[[i, j]] = 1.0 - value;
    }

    let (row_to_col, _) = lapjv::lapjv(&padded)
        .map_err(|_| Error::Assignment(format!("lapjv failed on a {size}x{size} matrix")))?;

    let matches = row_to_col
        .iter()
        .enumerate()
        .take(num_rows)
        .filter(|&(row, &col)| col < num_cols && iou[[row, col]] >= threshold)
        .map(|(row, &col)| (row, col))
        .collect();

    Ok(AssignmentResult { matches })
}
