//! Agency Insights - in-memory analytics for a vehicle agency.
//!
//! The [`analysis::Agency`] aggregator holds vehicles and orders and answers
//! sorting, grouping and ranking queries over them. The remaining modules
//! load dataset snapshots and render query results.

pub mod analysis;
pub mod dataset;
pub mod error;
pub mod models;
pub mod report;

pub use analysis::{Agency, Find, Sort};
pub use dataset::{Dataset, DatasetSummary};
pub use error::{DatasetError, ParseBodyTypeError};
pub use models::{BodyType, Client, Order, Vehicle};
