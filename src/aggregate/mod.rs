//! Final tour selection and export.
//!
//! [`ResultAggregator`] picks one tour from the baseline and the pass
//! champions; [`RouteExporter`] turns it into the [`RouteResult`] callers
//! consume.

mod aggregator;
mod exporter;

pub use aggregator::{Candidate, ResultAggregator};
pub use exporter::{RouteExporter, RouteLeg, RouteResult};
