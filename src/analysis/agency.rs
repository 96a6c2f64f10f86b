//! The agency aggregator.

use super::aggregator::{
    average_half_down, distinct_body_types, group_by_make, index_by_id, order_counts_by_vehicle,
    rank_descending, spend_by_client,
};
use super::{Find, Sort};
use crate::models::{BodyType, Client, Order, Vehicle};
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Owns the vehicles and orders of an agency and answers queries over them.
///
/// Both collections are append-only. Queries never hand out references into
/// them; every result is an owned copy.
#[derive(Debug, Clone, Default)]
pub struct Agency {
    vehicles: Vec<Vehicle>,
    orders: Vec<Order>,
}

impl Agency {
    /// Creates an empty agency.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_vehicle(&mut self, vehicle: Vehicle) {
        self.vehicles.push(vehicle);
    }

    pub fn add_order(&mut self, order: Order) {
        self.orders.push(order);
    }

    /// Held vehicles in insertion order.
    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    /// Held orders in insertion order.
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    fn sorted_by<K: Ord>(&self, key: impl Fn(&Vehicle) -> K) -> Vec<Vehicle> {
        let mut sorted = self.vehicles.clone();
        sorted.sort_by_key(key);
        sorted
    }
}

impl Sort for Agency {
    fn sort_by_id(&self) -> Vec<Vehicle> {
        self.sorted_by(|v| v.id)
    }

    fn sort_by_year_of_production(&self) -> Vec<Vehicle> {
        self.sorted_by(|v| v.year_of_production)
    }

    fn sort_by_odometer(&self) -> Vec<Vehicle> {
        self.sorted_by(|v| v.odometer)
    }
}

impl Find for Agency {
    fn find_makers(&self) -> HashSet<String> {
        self.vehicles.iter().map(|v| v.make.clone()).collect()
    }

    fn find_body_types(&self) -> Vec<BodyType> {
        distinct_body_types(&self.vehicles)
    }

    fn find_vehicles_grouped_by_make(&self) -> HashMap<String, Vec<Vehicle>> {
        group_by_make(&self.vehicles)
    }

    fn find_top_clients_by_prices(&self, clients: &[Client], max_count: usize) -> Vec<Client> {
        let by_id = index_by_id(clients, |c| c.id);
        let spend = spend_by_client(&self.orders, &by_id);

        debug!(
            "Ranking {} of {} clients by total spend",
            spend.len(),
            by_id.len()
        );

        rank_descending(spend.into_iter().map(|(id, s)| (id, s.total)), max_count)
            .into_iter()
            .filter_map(|id| by_id.get(&id).map(|c| (*c).clone()))
            .collect()
    }

    fn find_clients_with_average_price_no_less_than(
        &self,
        clients: &[Client],
        average: i64,
    ) -> Vec<Client> {
        let by_id = index_by_id(clients, |c| c.id);
        let threshold = Decimal::from(average);

        spend_by_client(&self.orders, &by_id)
            .into_iter()
            .filter(|(id, spend)| match average_half_down(spend.total, spend.orders) {
                Some(mean) => {
                    debug!("Client {} averages {} over {} orders", id, mean, spend.orders);
                    mean >= threshold
                }
                None => false,
            })
            .filter_map(|(id, _)| by_id.get(&id).map(|c| (*c).clone()))
            .collect()
    }

    fn find_most_ordered_vehicles(&self, max_count: usize) -> Vec<Vehicle> {
        let by_id = index_by_id(&self.vehicles, |v| v.id);
        let counts = order_counts_by_vehicle(&self.orders, &by_id);

        if max_count > counts.len() {
            debug!(
                "Requested {} vehicles but only {} were ordered; returning all",
                max_count,
                counts.len()
            );
        }

        rank_descending(counts, max_count)
            .into_iter()
            .filter_map(|id| by_id.get(&id).map(|v| (*v).clone()))
            .collect()
    }
}
