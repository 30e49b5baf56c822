//! The NASR 28-day publication cycle.

use anyhow::Error;
use chrono::{Duration, NaiveDate, Utc};
use derive_more::{Display, Into};
use std::str::FromStr;

/// Number of days between NASR publications.
pub const CYCLE_LENGTH_DAYS: i64 = 28;

/// Where cycle archives are published.
pub const DEFAULT_BASE_URL: &str = "https://nfdc.faa.gov/webContent/28DaySub/extra/";

/// The effective date of a known cycle, `25_Dec_2025_APT_CSV.zip`.
///
/// Every other cycle lies a whole number of cycle lengths away from this one.
fn anchor() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 12, 25).unwrap()
}

/// A NASR cycle, identified by its effective date.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, PartialOrd, Ord, Hash, Into)]
pub struct Cycle(NaiveDate);

impl Cycle {
    /// The latest cycle in effect on `date`.
    pub fn containing(date: NaiveDate) -> Self {
        let days = (date - anchor()).num_days();
        let n = days.div_euclid(CYCLE_LENGTH_DAYS);
        Self(anchor() + Duration::days(n * CYCLE_LENGTH_DAYS))
    }

    /// The first cycle which takes effect after `date`.
    ///
    /// This is usually published some days ahead of its effective date, but not always, so
    /// callers should be ready to fall back to [`previous`](Self::previous).
    pub fn next_after(date: NaiveDate) -> Self {
        Self::containing(date).next()
    }

    /// The first cycle which takes effect after the current date in UTC.
    pub fn upcoming() -> Self {
        Self::next_after(Utc::now().date_naive())
    }

    /// The cycle following this one.
    pub fn next(&self) -> Self {
        Self(self.0 + Duration::days(CYCLE_LENGTH_DAYS))
    }

    /// The cycle preceding this one.
    pub fn previous(&self) -> Self {
        Self(self.0 - Duration::days(CYCLE_LENGTH_DAYS))
    }

    /// The effective date of this cycle.
    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// The name of the airport CSV archive for this cycle, e.g. `25_Dec_2025_APT_CSV.zip`.
    pub fn file_name(&self) -> String {
        self.0.format("%d_%b_%Y_APT_CSV.zip").to_string()
    }

    /// The download URL for this cycle's airport CSV archive under `base`.
    pub fn url(&self, base: &str) -> String {
        if base.ends_with('/') {
            format!("{base}{}", self.file_name())
        } else {
            format!("{base}/{}", self.file_name())
        }
    }
}

impl TryFrom<NaiveDate> for Cycle {
    type Error = Error;

    fn try_from(date: NaiveDate) -> Result<Self, Self::Error> {
        let cycle = Self::containing(date);
        if cycle.0 == date {
            Ok(cycle)
        } else {
            Err(Error::msg(format!(
                "{date} is not a cycle date (nearest earlier cycle is {cycle})"
            )))
        }
    }
}

impl FromStr for Cycle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|err| Error::msg(format!("invalid date {s}: {err}")))?;
        date.try_into()
    }
}
