//! Airport records, as published to the map UI.

use anyhow::Error;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// A landing facility from the NASR airport base data.
///
/// The field names are the JSON format consumed by the browser map, so they must not change.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Airport {
    /// The FAA location identifier (e.g. `PAO`).
    pub arpt_id: String,
    pub name: String,
    pub city: String,
    /// Two-letter state or territory code. Empty for some foreign facilities.
    pub state: String,
    pub icao: String,
    pub lat: f64,
    pub lon: f64,
    pub fuel: Fuel,
}

impl Airport {
    /// The position of this airport.
    pub fn point(&self) -> Point {
        Point {
            lat: self.lat,
            lon: self.lon,
        }
    }
}

/// Kinds of fuel the map can filter on.
#[derive(
    Clone,
    Copy,
    Debug,
    Display,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumIter,
    EnumString,
    Deserialize,
    Serialize,
)]
pub enum FuelType {
    #[strum(serialize = "100ll")]
    #[serde(rename = "100ll")]
    Avgas100LL,
    #[strum(serialize = "jet_a")]
    #[serde(rename = "jet_a")]
    JetA,
    #[strum(serialize = "mogas")]
    #[serde(rename = "mogas")]
    Mogas,
}

impl FuelType {
    /// The token which marks this fuel as available in the NASR `FUEL_TYPES` column.
    ///
    /// NASR lists grades like `100LL`, `100`, `A`, `A+`, `JET-A`, `MOGAS`. Matching is by
    /// substring, so `100` covers every 100-octane avgas grade.
    pub fn token(&self) -> &'static str {
        match self {
            Self::Avgas100LL => "100",
            Self::JetA => "JET",
            Self::Mogas => "MOGAS",
        }
    }
}

/// Which fuels an airport sells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Fuel {
    #[serde(rename = "100ll")]
    pub avgas_100ll: bool,
    pub jet_a: bool,
    pub mogas: bool,
}

impl Fuel {
    /// Interpret the free-form NASR `FUEL_TYPES` field.
    pub fn parse(types: &str) -> Self {
        let types = types.to_uppercase();
        let has = |fuel: FuelType| types.contains(fuel.token());
        Self {
            avgas_100ll: has(FuelType::Avgas100LL),
            jet_a: has(FuelType::JetA),
            mogas: has(FuelType::Mogas),
        }
    }

    /// Is `fuel` available?
    pub fn has(&self, fuel: FuelType) -> bool {
        match fuel {
            FuelType::Avgas100LL => self.avgas_100ll,
            FuelType::JetA => self.jet_a,
            FuelType::Mogas => self.mogas,
        }
    }

    /// Is any fuel at all available?
    pub fn any(&self) -> bool {
        self.avgas_100ll || self.jet_a || self.mogas
    }
}

/// A position in decimal degrees.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct Point {
    pub lat: f64,
    pub lon: f64,
}

/// Mean radius of the Earth in nautical miles.
const EARTH_RADIUS_NM: f64 = 3440.065;

impl Point {
    /// A point at `lat`, `lon` decimal degrees.
    ///
    /// Fails unless both are finite, `lat` is within ±90 and `lon` is within ±180.
    pub fn new(lat: f64, lon: f64) -> Result<Self, Error> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(Error::msg(format!("latitude {lat} out of range")));
        }
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(Error::msg(format!("longitude {lon} out of range")));
        }
        Ok(Self { lat, lon })
    }

    /// Great-circle distance to `other` in nautical miles.
    pub fn distance_nm(&self, other: &Point) -> f64 {
        let (lat1, lat2) = (self.lat.to_radians(), other.lat.to_radians());
        let dlat = lat2 - lat1;
        let dlon = (other.lon - self.lon).to_radians();
        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_NM * a.sqrt().asin()
    }
}
