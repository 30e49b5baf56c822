//! Searching the airport list the way the map does.

use super::airport::{Airport, FuelType, Point};
use clap::Args;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Page size used when a query does not ask for one.
pub const DEFAULT_LIMIT: usize = 50;

/// Largest page a query may ask for.
pub const MAX_LIMIT: usize = 500;

/// Criteria an airport must meet to be included in results.
#[derive(Clone, Debug, Default, PartialEq, Eq, Args)]
pub struct Filter {
    /// Only include airports in STATE (repeatable).
    #[clap(long = "state", name = "STATE", env = "NASR_STATES", value_delimiter = ',')]
    pub states: Vec<String>,

    /// Only include airports selling FUEL (repeatable; one of 100ll, jet_a, mogas).
    #[clap(long = "fuel", name = "FUEL", env = "NASR_FUEL", value_delimiter = ',')]
    pub fuel: Vec<FuelType>,

    /// Only include airports whose identifier, name, or city contains TEXT.
    #[clap(long = "search", name = "TEXT", env = "NASR_SEARCH")]
    pub search: Option<String>,
}

impl Filter {
    /// Does this filter accept everything?
    pub fn is_empty(&self) -> bool {
        self.states.is_empty() && self.fuel.is_empty() && self.search.is_none()
    }

    /// Does `airport` meet all of the criteria?
    pub fn matches(&self, airport: &Airport) -> bool {
        if !self.states.is_empty()
            && !self
                .states
                .iter()
                .any(|state| state.eq_ignore_ascii_case(&airport.state))
        {
            return false;
        }
        if !self.fuel.iter().all(|&fuel| airport.fuel.has(fuel)) {
            return false;
        }
        match &self.search {
            Some(text) if !text.is_empty() => {
                let text = text.to_uppercase();
                [&airport.arpt_id, &airport.icao, &airport.name, &airport.city]
                    .into_iter()
                    .any(|field| field.to_uppercase().contains(&text))
            }
            _ => true,
        }
    }

    /// Keep only the airports matching this filter, preserving order.
    pub fn apply(&self, airports: Vec<Airport>) -> Vec<Airport> {
        if self.is_empty() {
            return airports;
        }
        let before = airports.len();
        let airports = airports
            .into_iter()
            .filter(|airport| self.matches(airport))
            .collect::<Vec<_>>();
        tracing::info!("filter kept {} of {before} airports", airports.len());
        airports
    }
}

/// A filtered, optionally distance-sorted, page of airports.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Query {
    pub filter: Filter,
    /// Sort results nearest-first from this point.
    pub origin: Option<Point>,
    pub offset: usize,
    pub limit: Option<usize>,
}

/// An airport in a query result.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Hit {
    #[serde(flatten)]
    pub airport: Airport,
    /// Distance from the query origin, if there was one.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub distance_nm: Option<f64>,
}

/// One page of query results.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Page {
    /// The number of airports matching the query, across all pages.
    pub total: usize,
    pub offset: usize,
    pub airports: Vec<Hit>,
}

impl Query {
    /// The page size this query will actually use.
    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT)
    }

    /// Run this query against `airports`.
    pub fn run(&self, airports: &[Airport]) -> Page {
        let mut hits = airports
            .iter()
            .filter(|airport| self.filter.matches(airport))
            .map(|airport| Hit {
                distance_nm: self
                    .origin
                    .map(|origin| origin.distance_nm(&airport.point())),
                airport: airport.clone(),
            })
            .collect::<Vec<_>>();

        if self.origin.is_some() {
            // Stable, so equidistant airports keep their input order. An undefined distance (from
            // a bad coordinate) sorts last.
            let key = |hit: &Hit| {
                hit.distance_nm
                    .filter(|d| !d.is_nan())
                    .unwrap_or(f64::INFINITY)
            };
            hits.sort_by(|a, b| key(a).total_cmp(&key(b)));
        }

        let total = hits.len();
        let airports = hits
            .into_iter()
            .skip(self.offset)
            .take(self.limit())
            .collect();
        Page {
            total,
            offset: self.offset,
            airports,
        }
    }
}

/// The distinct states present in `airports`, sorted.
pub fn states(airports: &[Airport]) -> BTreeSet<String> {
    airports
        .iter()
        .filter(|airport| !airport.state.is_empty())
        .map(|airport| airport.state.clone())
        .collect()
}
