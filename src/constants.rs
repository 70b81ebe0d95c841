//! Fixed quantile grids and numeric constants.

/// Decile probabilities used by the shift function and the decile markers.
pub const DECILES: [f64; 9] = [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9];

/// Index of the median within [`DECILES`].
pub const MEDIAN_DECILE: usize = 4;

/// Default quantile levels of the difference asymmetry function (0.05 to 0.40).
pub const ASYMMETRY_LEVELS: [f64; 8] = [0.05, 0.10, 0.15, 0.20, 0.25, 0.30, 0.35, 0.40];

/// Number of grid points for kernel density curves.
pub const KDE_GRID_POINTS: usize = 512;

/// How many bandwidths the density grid extends past the data range.
pub const KDE_CUT: f64 = 3.0;

/// Default base seed for all report stages.
pub const DEFAULT_SEED: u64 = 21;
