//! Summary statistics for fitness samples.
//!
//! The genetic algorithm produces one fitness value per individual per
//! generation. This crate condenses such a sample into a handful of numbers
//! that are cheap to log and to store alongside a run.
//!
//! # Example
//!
//! ```
//! use wordsplit_stats::descriptive::DescriptiveStats;
//!
//! let stats = DescriptiveStats::new([12.0, -10.0, 4.0]).unwrap();
//! assert_eq!(stats.max, 12.0);
//! assert_eq!(stats.median, 4.0);
//! ```

pub mod descriptive;
