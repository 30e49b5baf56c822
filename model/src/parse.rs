//! Reader for the NASR `APT_BASE.csv` table.

use super::airport::{Airport, Fuel};
use anyhow::{Context, Error};
use csv::ByteRecord;
use std::io::Read;

/// Locations of the columns we read, resolved from the header row.
#[derive(Clone, Copy, Debug)]
struct Columns {
    id: usize,
    lat: usize,
    lon: usize,
    name: usize,
    city: usize,
    state: usize,
    fuel: usize,
    icao: Option<usize>,
}

impl Columns {
    fn new(header: &ByteRecord) -> Result<Self, Error> {
        let find = |name: &str| header.iter().position(|h| h == name.as_bytes());
        let require = |name: &str| {
            find(name).ok_or_else(|| Error::msg(format!("APT_BASE.csv has no {name} column")))
        };
        Ok(Self {
            id: require("ARPT_ID")?,
            lat: require("LAT_DECIMAL")?,
            lon: require("LONG_DECIMAL")?,
            name: require("ARPT_NAME")?,
            city: require("CITY")?,
            state: require("STATE_CODE")?,
            fuel: require("FUEL_TYPES")?,
            icao: find("ICAO_ID"),
        })
    }

    /// Build an airport from a row, or [`None`] if the row is too short.
    fn airport(&self, row: &ByteRecord) -> Option<Airport> {
        let field = |i: usize| row.get(i).map(String::from_utf8_lossy);
        let id = field(self.id)?.trim().to_string();
        let icao = match self.icao.and_then(field) {
            Some(icao) if !icao.trim().is_empty() => icao.trim().to_string(),
            _ => format!("K{id}"),
        };
        Some(Airport {
            lat: coordinate(&id, "latitude", &field(self.lat)?),
            lon: coordinate(&id, "longitude", &field(self.lon)?),
            name: field(self.name)?.into_owned(),
            city: field(self.city)?.into_owned(),
            state: field(self.state)?.into_owned(),
            fuel: Fuel::parse(&field(self.fuel)?),
            icao,
            arpt_id: id,
        })
    }
}

/// Parse a decimal coordinate, using `0.0` for anything that is not a finite number.
fn coordinate(id: &str, what: &str, value: &str) -> f64 {
    match value.trim().parse::<f64>() {
        Ok(x) if x.is_finite() => x,
        Ok(x) => {
            tracing::warn!("airport {id} has non-finite {what} {x}");
            0.0
        }
        Err(err) => {
            tracing::warn!("airport {id} has malformed {what} {value:?}: {err}");
            0.0
        }
    }
}

/// Parse every airport out of an `APT_BASE.csv` stream.
///
/// Rows which are too short to hold all the columns we need are logged and skipped. Bytes which
/// are not valid UTF-8 (NASR text is occasionally Latin-1) are replaced with U+FFFD rather than
/// dropping the airport. Any read error aborts the parse.
pub fn airports(csv: impl Read) -> Result<Vec<Airport>, Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(csv);

    let header = reader
        .byte_headers()
        .context("reading APT_BASE.csv header")?
        .clone();
    if header.is_empty() {
        return Err(Error::msg("APT_BASE.csv is empty"));
    }
    let columns = Columns::new(&header)?;

    let mut airports = vec![];
    for (i, row) in reader.byte_records().enumerate() {
        let row = row.with_context(|| format!("reading row {}", i + 1))?;
        match columns.airport(&row) {
            Some(airport) => airports.push(airport),
            None => tracing::warn!("row {} has only {} fields, skipping", i + 1, row.len()),
        }
    }

    tracing::info!("parsed {} airports", airports.len());
    Ok(airports)
}
