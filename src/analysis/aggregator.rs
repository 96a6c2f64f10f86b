//! Order aggregation and ranking.
//!
//! This module provides the pure building blocks behind [`Agency`]'s
//! queries: id lookups, per-client and per-vehicle accumulation, ranking
//! and decimal averaging.
//!
//! [`Agency`]: super::Agency

use crate::models::{BodyType, Order, Vehicle};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::warn;

/// Accumulated spend of one client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClientSpend {
    /// Exact sum of order prices.
    pub total: Decimal,
    /// Number of orders summed into `total`.
    pub orders: usize,
}

/// Build a lookup from identifier to item. A later duplicate id replaces an
/// earlier one.
pub fn index_by_id<T>(items: &[T], id: impl Fn(&T) -> i64) -> HashMap<i64, &T> {
    items.iter().map(|item| (id(item), item)).collect()
}

/// Sum order prices per client, restricted to clients present in `known`.
///
/// Clients without orders are absent from the result. An order that would
/// overflow its client's total is skipped with a warning.
pub fn spend_by_client<V>(orders: &[Order], known: &HashMap<i64, V>) -> BTreeMap<i64, ClientSpend> {
    let mut spend: BTreeMap<i64, ClientSpend> = BTreeMap::new();

    for order in orders.iter().filter(|o| known.contains_key(&o.client_id)) {
        let entry = spend.entry(order.client_id).or_default();
        match entry.total.checked_add(order.price) {
            Some(total) => {
                entry.total = total;
                entry.orders += 1;
            }
            None => warn!(
                "Skipping order of client {} for vehicle {}: total overflows",
                order.client_id, order.vehicle_id
            ),
        }
    }

    spend
}

/// Count orders per vehicle, restricted to vehicles present in `known`.
pub fn order_counts_by_vehicle<V>(orders: &[Order], known: &HashMap<i64, V>) -> BTreeMap<i64, usize> {
    let mut counts: BTreeMap<i64, usize> = BTreeMap::new();

    for order in orders.iter().filter(|o| known.contains_key(&o.vehicle_id)) {
        *counts.entry(order.vehicle_id).or_default() += 1;
    }

    counts
}

/// Rank identifiers by metric, highest first, and keep at most `max_count`.
///
/// Equal metrics are ordered by identifier ascending.
pub fn rank_descending<M: Ord>(
    metrics: impl IntoIterator<Item = (i64, M)>,
    max_count: usize,
) -> Vec<i64> {
    let mut ranked: Vec<(i64, M)> = metrics.into_iter().collect();

    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(max_count);

    ranked.into_iter().map(|(id, _)| id).collect()
}

/// Mean of `count` prices summing to `total`, rounded half-down to the scale
/// of `total`.
///
/// The division is done on the integer mantissa, so the result is exact
/// half-down at any precision. Returns `None` when `count` is zero.
pub fn average_half_down(total: Decimal, count: usize) -> Option<Decimal> {
    if count == 0 {
        return None;
    }

    let divisor = i128::try_from(count).ok()?;
    let mantissa = total.mantissa();
    let mut quotient = mantissa / divisor;
    let remainder = (mantissa % divisor).abs();

    // Exactly half stays toward zero.
    if remainder * 2 > divisor {
        quotient += mantissa.signum();
    }

    Decimal::try_from_i128_with_scale(quotient, total.scale()).ok()
}

/// Group vehicles by make, keeping insertion order within each group.
pub fn group_by_make(vehicles: &[Vehicle]) -> HashMap<String, Vec<Vehicle>> {
    let mut grouped: HashMap<String, Vec<Vehicle>> = HashMap::new();

    for vehicle in vehicles {
        grouped
            .entry(vehicle.make.clone())
            .or_default()
            .push(vehicle.clone());
    }

    grouped
}

/// Distinct body types in first-occurrence order.
pub fn distinct_body_types(vehicles: &[Vehicle]) -> Vec<BodyType> {
    let mut seen = HashSet::new();

    vehicles
        .iter()
        .map(|v| v.body_type)
        .filter(|body_type| seen.insert(*body_type))
        .collect()
}

/// Count vehicles per make.
pub fn make_distribution(vehicles: &[Vehicle]) -> HashMap<String, usize> {
    let mut dist: HashMap<String, usize> = HashMap::new();

    for vehicle in vehicles {
        *dist.entry(vehicle.make.clone()).or_default() += 1;
    }

    dist
}
