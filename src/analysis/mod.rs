//! Analysis modules.
//!
//! The [`Sort`] and [`Find`] traits describe the read-only queries an
//! agency answers; [`Agency`] implements both over its own vehicles and
//! orders.

pub mod agency;
pub mod aggregator;

pub use agency::Agency;
pub use aggregator::*;

use crate::models::{BodyType, Client, Vehicle};
use std::collections::{HashMap, HashSet};

/// Ordered views over the held vehicles.
///
/// Every method returns a fresh, stably sorted copy and leaves the stored
/// insertion order untouched.
pub trait Sort {
    fn sort_by_id(&self) -> Vec<Vehicle>;

    fn sort_by_year_of_production(&self) -> Vec<Vehicle>;

    fn sort_by_odometer(&self) -> Vec<Vehicle>;
}

/// Lookup, grouping and ranking queries.
pub trait Find {
    /// Distinct makes. Iteration order is unspecified.
    fn find_makers(&self) -> HashSet<String>;

    /// Distinct body types in first-occurrence order.
    fn find_body_types(&self) -> Vec<BodyType>;

    /// Vehicles keyed by make, insertion order kept within each group.
    fn find_vehicles_grouped_by_make(&self) -> HashMap<String, Vec<Vehicle>>;

    /// Up to `max_count` of `clients` ranked by total order spend, highest
    /// first. Clients without orders are left out.
    fn find_top_clients_by_prices(&self, clients: &[Client], max_count: usize) -> Vec<Client>;

    /// Clients from `clients` whose mean order price, rounded half-down, is
    /// at least `average`. Sorted by client id.
    fn find_clients_with_average_price_no_less_than(
        &self,
        clients: &[Client],
        average: i64,
    ) -> Vec<Client>;

    /// Up to `max_count` known vehicles ranked by number of orders, highest
    /// first.
    fn find_most_ordered_vehicles(&self, max_count: usize) -> Vec<Vehicle>;
}
