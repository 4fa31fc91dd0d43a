#![forbid(unsafe_code)]
//! codecity-analytics library.
//!
//! Structural-health metrics over a layout snapshot and its dependency map:
//! flatten the snapshot ([`flatten`]), build the resolved import graph
//! ([`graph`]), run the independent passes ([`metrics`]) and aggregate them
//! into scored records ([`score`]).
//!
//! # Conventions
//!
//! - **Errors**: none; every pass is total over well-formed input.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod flatten;
pub mod graph;
pub mod metrics;
pub mod score;

pub use flatten::{FlatFileRecord, flatten};
pub use graph::FileGraph;
pub use score::{CityMetrics, DistrictMetrics, FileMetrics, analyze_files, compute_city_metrics};
