//! Analytic passes over a flattened snapshot.
//!
//! # Overview
//!
//! Each pass is independent and returns a complete mapping keyed by file
//! path or district path; [`crate::score`] joins them into the final
//! records.
//!
//! - **Hub & instability** (`hub`): who is imported by everyone, and who
//!   only imports.
//! - **Churn** (`churn`): lines changed relative to current size.
//! - **Coupling radius** (`coupling`): world-space length of imports.
//! - **Modularity** (`modularity`): per-district edge locality and the
//!   city-wide Newman–Girvan Q.
//! - **Skyline** (`skyline`): height variation within a district.
//! - **Abandonment** (`abandoned`): large, stale, unimported files.
//!
//! Only resolved edges (both endpoints in the snapshot) feed the graph
//! passes; see [`crate::graph::FileGraph`].

pub mod abandoned;
pub mod churn;
pub mod coupling;
pub mod hub;
pub mod modularity;
pub mod skyline;

pub use abandoned::{AbandonmentRule, abandoned_files, staleness_cutoff};
pub use churn::churn_rates;
pub use coupling::{ArcRecord, arc_records, district_coupling_radius, global_coupling_radius};
pub use hub::{HubStats, hub_and_instability};
pub use modularity::{local_modularity, modularity_score, newman_girvan_q};
pub use skyline::{SkylineStats, skyline};
