//! Query execution and report assembly.
//!
//! This module maps the user-facing query names onto [`Sort`] and [`Find`]
//! calls and collects the results into a [`Report`] for rendering.

pub mod generator;

pub use generator::{generate_json_report, generate_markdown_report};

use crate::analysis::{make_distribution, Agency, Find, Sort};
use crate::dataset::{Dataset, DatasetSummary};
use crate::models::{BodyType, Client, Vehicle};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// A named analytical query.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum Query {
    /// Every query below, in order
    All,
    /// Vehicles sorted by identifier
    SortById,
    /// Vehicles sorted by year of production
    SortByYear,
    /// Vehicles sorted by odometer reading
    SortByOdometer,
    /// Distinct makes
    Makers,
    /// Distinct body types, first occurrence first
    BodyTypes,
    /// Vehicles grouped by make
    ByMake,
    /// Clients ranked by total spend
    TopClients,
    /// Clients whose average order price meets the threshold
    AverageClients,
    /// Vehicles ranked by number of orders
    MostOrdered,
}

impl Query {
    /// Every concrete query, in report order.
    pub const ORDERED: [Query; 9] = [
        Query::SortById,
        Query::SortByYear,
        Query::SortByOdometer,
        Query::Makers,
        Query::BodyTypes,
        Query::ByMake,
        Query::TopClients,
        Query::AverageClients,
        Query::MostOrdered,
    ];

    /// Expand `All` and drop repeats, keeping first occurrence.
    pub fn expand(queries: &[Query]) -> Vec<Query> {
        let mut expanded: Vec<Query> = Vec::new();

        for query in queries {
            let items: &[Query] = if *query == Query::All {
                &Query::ORDERED
            } else {
                std::slice::from_ref(query)
            };
            for item in items {
                if !expanded.contains(item) {
                    expanded.push(*item);
                }
            }
        }

        expanded
    }

    /// Section heading for this query.
    pub fn title(&self, params: &QueryParams) -> String {
        match self {
            Query::All => "All Queries".to_string(),
            Query::SortById => "Vehicles by ID".to_string(),
            Query::SortByYear => "Vehicles by Year of Production".to_string(),
            Query::SortByOdometer => "Vehicles by Odometer".to_string(),
            Query::Makers => "Makers".to_string(),
            Query::BodyTypes => "Body Types".to_string(),
            Query::ByMake => "Vehicles Grouped by Make".to_string(),
            Query::TopClients => format!("Top {} Clients by Total Spend", params.top_clients),
            Query::AverageClients => {
                format!("Clients with Average Order Price >= {}", params.min_average)
            }
            Query::MostOrdered => format!("Top {} Most Ordered Vehicles", params.top_vehicles),
        }
    }
}

/// Parameters for the ranking and filtering queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParams {
    pub top_clients: usize,
    pub min_average: i64,
    pub top_vehicles: usize,
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            top_clients: 5,
            min_average: 0,
            top_vehicles: 5,
        }
    }
}

/// Typed result of one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "items", rename_all = "snake_case")]
pub enum QueryOutcome {
    Vehicles(Vec<Vehicle>),
    Makers(Vec<String>),
    BodyTypes(Vec<BodyType>),
    Groups(BTreeMap<String, Vec<Vehicle>>),
    Clients(Vec<Client>),
}

impl QueryOutcome {
    /// Number of top-level entries in the result.
    pub fn len(&self) -> usize {
        match self {
            QueryOutcome::Vehicles(v) => v.len(),
            QueryOutcome::Makers(m) => m.len(),
            QueryOutcome::BodyTypes(b) => b.len(),
            QueryOutcome::Groups(g) => g.len(),
            QueryOutcome::Clients(c) => c.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One rendered query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub query: Query,
    pub title: String,
    pub outcome: QueryOutcome,
}

/// Metadata about the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Label of the analyzed dataset, usually its path.
    pub dataset: String,
    /// When the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Record counts of the dataset.
    pub summary: DatasetSummary,
    /// Parameters the queries ran with.
    pub params: QueryParams,
    /// Vehicles per make, most common first.
    pub makes: Vec<(String, usize)>,
}

/// The complete analytics report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    pub sections: Vec<Section>,
}

/// Run one query against the agency.
///
/// `All` expands to one section per query in [`Query::ORDERED`]; every
/// other query yields exactly one section.
pub fn run_query(
    agency: &Agency,
    clients: &[Client],
    params: &QueryParams,
    query: Query,
) -> Vec<Section> {
    run_queries(agency, clients, params, &[query])
}

/// Run every requested query, expanding `All` and skipping repeats.
pub fn run_queries(
    agency: &Agency,
    clients: &[Client],
    params: &QueryParams,
    queries: &[Query],
) -> Vec<Section> {
    Query::expand(queries)
        .into_iter()
        .filter_map(|query| {
            outcome(agency, clients, params, query).map(|outcome| Section {
                query,
                title: query.title(params),
                outcome,
            })
        })
        .collect()
}

/// Result of a single concrete query, `None` for `All`.
///
/// Makers are sorted alphabetically and groups by make so that rendered
/// output is stable.
fn outcome(
    agency: &Agency,
    clients: &[Client],
    params: &QueryParams,
    query: Query,
) -> Option<QueryOutcome> {
    debug!("Running query {:?}", query);

    let outcome = match query {
        Query::All => return None,
        Query::SortById => QueryOutcome::Vehicles(agency.sort_by_id()),
        Query::SortByYear => QueryOutcome::Vehicles(agency.sort_by_year_of_production()),
        Query::SortByOdometer => QueryOutcome::Vehicles(agency.sort_by_odometer()),
        Query::Makers => {
            let mut makers: Vec<String> = agency.find_makers().into_iter().collect();
            makers.sort();
            QueryOutcome::Makers(makers)
        }
        Query::BodyTypes => QueryOutcome::BodyTypes(agency.find_body_types()),
        Query::ByMake => {
            QueryOutcome::Groups(agency.find_vehicles_grouped_by_make().into_iter().collect())
        }
        Query::TopClients => {
            QueryOutcome::Clients(agency.find_top_clients_by_prices(clients, params.top_clients))
        }
        Query::AverageClients => QueryOutcome::Clients(
            agency.find_clients_with_average_price_no_less_than(clients, params.min_average),
        ),
        Query::MostOrdered => {
            QueryOutcome::Vehicles(agency.find_most_ordered_vehicles(params.top_vehicles))
        }
    };

    Some(outcome)
}

/// Seed an agency from the dataset and run every requested query.
///
/// `summary` is the dataset's [`Dataset::summary`], computed once by the caller.
pub fn build_report(
    label: &str,
    dataset: &Dataset,
    summary: DatasetSummary,
    params: &QueryParams,
    queries: &[Query],
) -> Report {
    let agency = dataset.to_agency();
    let sections = run_queries(&agency, &dataset.clients, params, queries);

    let mut makes: Vec<(String, usize)> = make_distribution(agency.vehicles())
        .into_iter()
        .collect();
    makes.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    Report {
        metadata: ReportMetadata {
            dataset: label.to_string(),
            generated_at: Utc::now(),
            summary,
            params: *params,
            makes,
        },
        sections,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Order;

    fn create_test_dataset() -> Dataset {
        Dataset {
            vehicles: vec![
                Vehicle::new(2, "Kia", BodyType::Suv, 2018, 50_000),
                Vehicle::new(1, "Audi", BodyType::Sedan, 2020, 10_000),
                Vehicle::new(3, "Kia", BodyType::Van, 2016, 120_000),
            ],
            clients: vec![
                Client::new(1, "Alice", "alice@example.com"),
                Client::new(2, "Bob", "bob@example.com"),
            ],
            orders: vec![
                Order::new(1, 2, "100".parse().unwrap()),
                Order::new(1, 2, "50".parse().unwrap()),
                Order::new(2, 1, "200".parse().unwrap()),
            ],
        }
    }

    #[test]
    fn test_expand_all_and_dedup() {
        assert_eq!(Query::expand(&[Query::All]).len(), Query::ORDERED.len());
        assert_eq!(
            Query::expand(&[Query::Makers, Query::TopClients, Query::Makers]),
            vec![Query::Makers, Query::TopClients]
        );
        assert_eq!(
            Query::expand(&[Query::MostOrdered, Query::All])[0],
            Query::MostOrdered
        );
    }

    #[test]
    fn test_run_query_makers_sorted() {
        let dataset = create_test_dataset();
        let agency = dataset.to_agency();

        let sections = run_query(&agency, &dataset.clients, &QueryParams::default(), Query::Makers);
        assert_eq!(sections.len(), 1);
        assert_eq!(
            sections[0].outcome,
            QueryOutcome::Makers(vec!["Audi".to_string(), "Kia".to_string()])
        );
    }

    #[test]
    fn test_run_query_top_clients() {
        let dataset = create_test_dataset();
        let agency = dataset.to_agency();
        let params = QueryParams {
            top_clients: 1,
            ..QueryParams::default()
        };

        let sections = run_query(&agency, &dataset.clients, &params, Query::TopClients);
        match &sections[0].outcome {
            QueryOutcome::Clients(clients) => {
                assert_eq!(clients.len(), 1);
                assert_eq!(clients[0].name, "Bob");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_run_query_all_expands_every_query() {
        let dataset = create_test_dataset();
        let agency = dataset.to_agency();

        let sections = run_query(&agency, &dataset.clients, &QueryParams::default(), Query::All);
        let queries: Vec<Query> = sections.iter().map(|s| s.query).collect();

        assert_eq!(queries, Query::ORDERED.to_vec());
        assert!(sections.iter().all(|s| s.query != Query::All));
        assert_eq!(sections[0].outcome.len(), 3);
    }

    #[test]
    fn test_build_report() {
        let dataset = create_test_dataset();
        let report = build_report(
            "agency.json",
            &dataset,
            dataset.summary(),
            &QueryParams::default(),
            &[Query::ByMake, Query::MostOrdered],
        );

        assert_eq!(report.sections.len(), 2);
        assert_eq!(report.metadata.summary.orders, 3);
        assert_eq!(report.metadata.makes[0], ("Kia".to_string(), 2));

        match &report.sections[0].outcome {
            QueryOutcome::Groups(groups) => {
                let keys: Vec<&str> = groups.keys().map(String::as_str).collect();
                assert_eq!(keys, vec!["Audi", "Kia"]);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(report.sections[1].outcome.len(), 2);
    }

    #[test]
    fn test_build_report_uses_given_summary() {
        let dataset = create_test_dataset();
        let summary = DatasetSummary {
            dangling_orders: 7,
            ..dataset.summary()
        };

        let report = build_report("agency.json", &dataset, summary, &QueryParams::default(), &[]);

        assert_eq!(report.metadata.summary, summary);
        assert!(report.sections.is_empty());
    }
}
