//! NASR cycle archives.

use super::{airport::Airport, parse};
use anyhow::{Context, Error};
use std::fs;
use std::io::Cursor;
use std::path::Path;
use zip::ZipArchive;

/// The name of the airport base table inside a cycle archive.
pub const AIRPORT_TABLE: &str = "APT_BASE.csv";

/// A Zip archive containing the airport tables for one NASR cycle.
#[derive(Clone, Debug)]
pub struct Archive {
    zip: ZipArchive<Cursor<Vec<u8>>>,
}

impl Archive {
    /// Interpret `bytes` as a cycle archive.
    ///
    /// Fails if `bytes` is not a valid Zip archive. The FAA serves an HTML error page, with a
    /// success status, for some cycles which have not been published yet, so this check matters
    /// even after a successful download.
    pub fn new(bytes: Vec<u8>) -> Result<Self, Error> {
        Ok(Self {
            zip: ZipArchive::new(Cursor::new(bytes)).context("not a valid Zip archive")?,
        })
    }

    /// Load a cycle archive from the file system.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        Self::new(bytes).with_context(|| format!("loading {}", path.display()))
    }

    /// Parse the airports in this archive.
    pub fn airports(&self) -> Result<Vec<Airport>, Error> {
        let mut zip = self.zip.clone();
        let index = (0..zip.len())
            .find(|&i| match zip.by_index_raw(i) {
                Ok(file) => file.is_file() && is_airport_table(file.name()),
                Err(err) => {
                    tracing::error!("unable to load file {i}: {err}");
                    false
                }
            })
            .ok_or_else(|| Error::msg(format!("{AIRPORT_TABLE} not found in archive")))?;

        let file = zip.by_index(index)?;
        tracing::info!("parsing {}", file.name());
        parse::airports(file)
    }

    /// Write the raw archive to `path`, creating its directory if needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        let path = path.as_ref();
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
        }
        fs::write(path, self.zip.clone().into_inner().into_inner())
            .with_context(|| format!("writing {}", path.display()))
    }

    /// Decompress and extract the contents of this archive to a directory.
    pub fn extract(&self, dir: impl AsRef<Path>) -> Result<(), Error> {
        Ok(self.zip.clone().extract(dir)?)
    }
}

/// Is `name` the path of the airport base table?
///
/// Comparison ignores case and any directory the table is nested in.
fn is_airport_table(name: &str) -> bool {
    name.rsplit(['/', '\\'])
        .next()
        .is_some_and(|file| file.eq_ignore_ascii_case(AIRPORT_TABLE))
}
