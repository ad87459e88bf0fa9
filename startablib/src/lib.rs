//! # startablib
//!
//! Data-preparation library for a dwarf-galaxy membership analysis: converts
//! the published fixed-width ASCII data table ("Table E1") to CSV, and
//! provides the robust moment estimators used to summarize the kinematics of
//! candidate member stars.
//!
//! ## Overview
//!
//! The published table is whitespace-delimited with a one-byte format marker
//! at the start of the file, and uses `--` for missing measurements. The
//! converter streams it line by line into CSV, mapping every missing-value
//! token to an empty field while preserving the per-row field count exactly.
//! Correctness here means bit-for-bit agreement with the published
//! conversion, so the marker match is deliberately a literal token equality:
//! nothing guards against dashes inside otherwise-valid tokens, and no field
//! validation is performed.
//!
//! The moments module carries the statistical helpers from the original
//! analysis: the Robust Scatter Estimate and inverse-variance weighted means
//! of 1D and 2D measurements, the 2D form taking the full per-star
//! covariance (sigmas plus correlation coefficient) into account as
//! proper-motion catalogs require.
//!
//! ## Example
//!
//! ```rust
//! use startablib::{convert_reader, read_columns, complete_cases, weighted_mean_oned, ConvertOptions};
//!
//! // Convert the published table format to CSV.
//! let table = b"#pmra epmra\n1.20 0.10\n-- 0.20\n1.40 0.10\n";
//! let mut csv = Vec::new();
//! let summary = convert_reader(&table[..], &mut csv, &ConvertOptions::new()).unwrap();
//! assert_eq!(summary.lines, 3);
//!
//! // Read the proper-motion column back, dropping incomplete rows.
//! let cols = read_columns(&csv[..], &[0, 1], true).unwrap();
//! let complete = complete_cases(&cols);
//! let (pmra, err) = weighted_mean_oned(&complete[0], &complete[1]).unwrap();
//! assert!((pmra - 1.3).abs() < 1e-12);
//! assert!(err > 0.0);
//! ```

pub mod columns;
pub mod convert;
pub mod error;
pub mod moments;

pub use columns::{complete_cases, read_columns, read_columns_file};
pub use convert::{convert_file, convert_reader, ConvertOptions, ConvertSummary, MISSING_MARKER};
pub use error::StartabError;
pub use moments::{rse, weighted_mean_oned, weighted_mean_twod, WeightedMean2d, RSE_CONSTANT};

/// Result type for startablib operations
pub type Result<T> = std::result::Result<T, StartabError>;
