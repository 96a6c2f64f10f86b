//! Dataset snapshot loading.
//!
//! A dataset file holds the vehicles, clients and orders of an agency as
//! JSON or TOML. Loading never validates foreign keys: orders pointing at
//! unknown clients or vehicles are kept and merely reported.

use crate::analysis::{index_by_id, Agency};
use crate::error::{DatasetError, Result};
use crate::models::{Client, Order, Vehicle};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Entity records read from a snapshot file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub vehicles: Vec<Vehicle>,

    #[serde(default)]
    pub clients: Vec<Client>,

    #[serde(default)]
    pub orders: Vec<Order>,
}

/// Counts describing a loaded dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub vehicles: usize,
    pub clients: usize,
    pub orders: usize,
    /// Orders whose client or vehicle id is not in the dataset.
    pub dangling_orders: usize,
}

impl Dataset {
    /// Load a dataset, picking the format from the file extension.
    pub fn load(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        if extension != "json" && extension != "toml" {
            return Err(DatasetError::UnsupportedFormat(path.display().to_string()));
        }

        let content = fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let dataset = if extension == "json" {
            Self::from_json_str(&content).map_err(|source| DatasetError::Json {
                path: path.to_path_buf(),
                source,
            })?
        } else {
            Self::from_toml_str(&content).map_err(|source| DatasetError::Toml {
                path: path.to_path_buf(),
                source,
            })?
        };

        info!(
            "Loaded {} vehicles, {} clients, {} orders from {}",
            dataset.vehicles.len(),
            dataset.clients.len(),
            dataset.orders.len(),
            path.display()
        );

        Ok(dataset)
    }

    pub fn from_json_str(content: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Seed a fresh agency with every vehicle, then every order, in file order.
    pub fn to_agency(&self) -> Agency {
        let mut agency = Agency::new();

        for vehicle in &self.vehicles {
            agency.add_vehicle(vehicle.clone());
        }
        for order in &self.orders {
            agency.add_order(order.clone());
        }

        debug!(
            "Seeded agency with {} vehicles and {} orders",
            agency.vehicles().len(),
            agency.orders().len()
        );

        agency
    }

    /// Summarize the dataset, logging each dangling order.
    pub fn summary(&self) -> DatasetSummary {
        let clients = index_by_id(&self.clients, |c| c.id);
        let vehicles = index_by_id(&self.vehicles, |v| v.id);

        let dangling_orders = self
            .orders
            .iter()
            .filter(|order| {
                let dangling = !clients.contains_key(&order.client_id)
                    || !vehicles.contains_key(&order.vehicle_id);
                if dangling {
                    warn!(
                        "Order references unknown client {} or vehicle {}",
                        order.client_id, order.vehicle_id
                    );
                }
                dangling
            })
            .count();

        DatasetSummary {
            vehicles: self.vehicles.len(),
            clients: self.clients.len(),
            orders: self.orders.len(),
            dangling_orders,
        }
    }
}
