//! Data models for the agency.
//!
//! This module contains the entity records the aggregator works over:
//! vehicles, clients and orders, plus the closed set of body types.

use crate::error::ParseBodyTypeError;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Physical form of a vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
pub enum BodyType {
    Sedan,
    Hatchback,
    Coupe,
    Convertible,
    Wagon,
    Suv,
    Crossover,
    Minivan,
    Van,
    Truck,
}

impl BodyType {
    /// All body types, in declaration order.
    pub const ALL: [BodyType; 10] = [
        BodyType::Sedan,
        BodyType::Hatchback,
        BodyType::Coupe,
        BodyType::Convertible,
        BodyType::Wagon,
        BodyType::Suv,
        BodyType::Crossover,
        BodyType::Minivan,
        BodyType::Van,
        BodyType::Truck,
    ];

    /// Returns the canonical upper-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            BodyType::Sedan => "SEDAN",
            BodyType::Hatchback => "HATCHBACK",
            BodyType::Coupe => "COUPE",
            BodyType::Convertible => "CONVERTIBLE",
            BodyType::Wagon => "WAGON",
            BodyType::Suv => "SUV",
            BodyType::Crossover => "CROSSOVER",
            BodyType::Minivan => "MINIVAN",
            BodyType::Van => "VAN",
            BodyType::Truck => "TRUCK",
        }
    }
}

impl fmt::Display for BodyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BodyType {
    type Err = ParseBodyTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace(['-', '_', ' '], "");

        BodyType::ALL
            .into_iter()
            .find(|body_type| body_type.as_str() == normalized)
            .ok_or_else(|| ParseBodyTypeError(s.to_string()))
    }
}

impl TryFrom<String> for BodyType {
    type Error = ParseBodyTypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A sellable or rentable unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    /// Unique identifier.
    pub id: i64,
    /// Manufacturer name.
    pub make: String,
    /// Physical form.
    pub body_type: BodyType,
    /// Year the vehicle was produced.
    pub year_of_production: i32,
    /// Odometer reading.
    pub odometer: i64,
}

impl Vehicle {
    pub fn new(
        id: i64,
        make: impl Into<String>,
        body_type: BodyType,
        year_of_production: i32,
        odometer: i64,
    ) -> Self {
        Self {
            id,
            make: make.into(),
            body_type,
            year_of_production,
            odometer,
        }
    }
}

/// A party that may place orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    /// Unique identifier.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Contact email.
    #[serde(default)]
    pub email: String,
    /// Contact phone, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl Client {
    pub fn new(id: i64, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            phone: None,
        }
    }
}

/// A priced transaction linking one client to one vehicle.
///
/// Neither identifier is checked against the known clients or vehicles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub client_id: i64,
    pub vehicle_id: i64,
    /// Exact price. Must be written as a string, e.g. `"1999.90"`.
    #[serde(deserialize_with = "deserialize_price")]
    pub price: Decimal,
}

/// Read a price from its string form only.
///
/// A bare number would pass through `f64` first, losing digits and the
/// trailing zeros that set the scale averages are rounded to.
fn deserialize_price<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    raw.trim()
        .parse::<Decimal>()
        .map_err(|e| serde::de::Error::custom(format!("invalid price {:?}: {}", raw, e)))
}

impl Order {
    pub fn new(client_id: i64, vehicle_id: i64, price: Decimal) -> Self {
        Self {
            client_id,
            vehicle_id,
            price,
        }
    }
}
