//! File dependency graph for the metrics passes.
//!
//! # Pipeline
//!
//! ```text
//! LayoutNode ──flatten()──▶ Vec<FlatFileRecord>
//!                                │
//! DependencyIndex ───────────────┤ build::FileGraph::build()
//!                                ▼
//!                           FileGraph (resolved edges only)
//! ```
//!
//! ## Cache Invalidation
//!
//! [`FileGraph::content_hash`] is a BLAKE3 hash of the resolved edge set.
//! Compare it against a stored value to detect when metrics need to be
//! recomputed.

pub mod build;

pub use build::FileGraph;
