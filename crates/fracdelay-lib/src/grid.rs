// SPDX-License-Identifier: LGPL-3.0-or-later

//! Frequency grids.
//!
//! In both generators `endpoint` selects whether `stop` itself is the
//! last point; without it the grid covers `[start, stop)`.

/// `n` evenly spaced values from `start` to `stop`.
///
/// # Examples
/// ```
/// use fracdelay_lib::grid::linspace;
///
/// assert_eq!(linspace(0.0, 1.0, 5, true), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
/// assert_eq!(linspace(0.0, 1.0, 4, false), vec![0.0, 0.25, 0.5, 0.75]);
/// ```
pub fn linspace(start: f64, stop: f64, n: usize, endpoint: bool) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let div = if endpoint { n - 1 } else { n } as f64;
            let step = (stop - start) / div;
            let mut out: Vec<f64> = (0..n).map(|i| start + step * i as f64).collect();
            if endpoint {
                out[n - 1] = stop;
            }
            out
        }
    }
}

/// `n` values evenly spaced on a log10 scale, from `10^start_exp` to
/// `10^stop_exp`.
///
/// # Examples
/// ```
/// use fracdelay_lib::grid::logspace;
///
/// let f = logspace(0.0, 3.0, 4, true);
/// assert!((f[1] - 10.0).abs() < 1e-9);
/// assert!((f[3] - 1000.0).abs() < 1e-9);
/// ```
pub fn logspace(start_exp: f64, stop_exp: f64, n: usize, endpoint: bool) -> Vec<f64> {
    linspace(start_exp, stop_exp, n, endpoint)
        .into_iter()
        .map(|e| 10f64.powf(e))
        .collect()
}
