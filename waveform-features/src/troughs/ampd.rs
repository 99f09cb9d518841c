//! Automatic multiscale-based peak detection (AMPD).
//!
//! Scholkmann, Boss and Wolf, "An Efficient Algorithm for Automatic Peak Detection in
//! Noisy Periodic and Quasi-Periodic Signals", Algorithms 5(4), 2012. This is the extended
//! variant, which compares each sample to its left and right neighbours separately so that
//! maxima at either end of the signal are also found.
//!
//! The local maxima scalogram holds one boolean per sample per scale, so detection costs
//! `O(n * scale)` time and memory for an `n` sample signal.
use crate::Real;
use thiserror::Error;
use tracing::trace;

#[derive(Clone, Debug, Error, PartialEq)]
#[error("Cannot allocate a {rows}x{len} scalogram ({bytes:?} bytes)")]
pub(crate) struct ScalogramAllocationError {
    pub(crate) rows: usize,
    pub(crate) len: usize,
    /// `None` if the size overflows `usize`.
    pub(crate) bytes: Option<usize>,
}

/// The local maxima scalogram.
///
/// Row `k - 1` is true at sample `i` if `x[i]` exceeds both `x[i - k]` and `x[i + k]`,
/// where each neighbour is only compared if it exists.
struct Scalogram {
    len: usize,
    cells: Vec<bool>,
}

impl Scalogram {
    fn build(
        x: &[Real],
        rows: usize,
        memory_budget: Option<usize>,
    ) -> Result<Self, ScalogramAllocationError> {
        let len = x.len();
        let bytes = rows.checked_mul(len);
        let error = ScalogramAllocationError { rows, len, bytes };
        let bytes = bytes.ok_or(error.clone())?;
        if memory_budget.is_some_and(|budget| bytes > budget) {
            return Err(error);
        }

        let mut cells = Vec::new();
        cells.try_reserve_exact(bytes).map_err(|_| error)?;
        cells.resize(bytes, true);

        for (row, scale) in cells.chunks_exact_mut(len).zip(1..) {
            for ((cell, value), right) in row.iter_mut().zip(x).zip(x.iter().skip(scale)) {
                *cell &= value > right;
            }
            for ((cell, value), left) in row.iter_mut().skip(scale).zip(x.iter().skip(scale)).zip(x)
            {
                *cell &= value > left;
            }
        }
        Ok(Self { len, cells })
    }

    fn rows(&self) -> impl Iterator<Item = &[bool]> {
        self.cells.chunks_exact(self.len)
    }

    /// Index of the row with the most maxima, weighted by `len / 2 - row` to compensate for
    /// the edge regions in which higher scales can still register maxima. Ties go to the lowest row.
    fn most_populated_row(&self) -> usize {
        let half = self.len / 2;
        self.rows()
            .enumerate()
            .map(|(row, cells)| (row, cells.iter().filter(|&&cell| cell).count() * (half - row)))
            .fold((0, 0), |best, candidate| {
                if candidate.1 > best.1 { candidate } else { best }
            })
            .0
    }
}

/// Removes the least-squares straight line from `x`.
pub(crate) fn detrend(x: &[Real]) -> Vec<Real> {
    let n = x.len() as Real;
    if x.len() < 2 {
        return x.to_vec();
    }
    let mean_index = (n - 1.0) / 2.0;
    let mean_value = x.iter().sum::<Real>() / n;
    let (covariance, variance) = x.iter().enumerate().fold((0.0, 0.0), |(cov, var), (i, &v)| {
        let di = i as Real - mean_index;
        (cov + di * (v - mean_value), var + di * di)
    });
    let slope = covariance / variance;
    x.iter()
        .enumerate()
        .map(|(i, &v)| v - (mean_value + slope * (i as Real - mean_index)))
        .collect()
}

/// Finds the indices of the local maxima of `x`, in ascending order.
///
/// # Parameters
/// - x: the signal.
/// - scale: the largest scale considered, i.e. the widest window is `2 * scale + 1` samples.
///   Defaults to, and is capped at, half the length of the signal.
/// - memory_budget: if set, the largest scalogram in bytes that may be allocated.
pub(crate) fn find_maxima(
    x: &[Real],
    scale: Option<usize>,
    memory_budget: Option<usize>,
) -> Result<Vec<usize>, ScalogramAllocationError> {
    if x.len() < 3 {
        return Ok(Vec::new());
    }
    let half = x.len() / 2;
    let rows = scale.filter(|&scale| scale > 0).map_or(half, |scale| scale.min(half));

    let scalogram = Scalogram::build(&detrend(x), rows, memory_budget)?;
    let persistent_rows = scalogram.most_populated_row().max(1);
    trace!("Maxima persist up to scale {persistent_rows} of {rows}");

    let rows = scalogram.rows().take(persistent_rows).collect::<Vec<_>>();
    Ok((0..scalogram.len)
        .filter(|&i| rows.iter().all(|row| row.get(i).copied().unwrap_or_default()))
        .collect())
}
