//! A NASR client which reads from the local file system instead of the FAA site.

use super::Nasr;
use crate::{archive::Archive, cycle::Cycle};
use anyhow::Error;
use async_trait::async_trait;
use std::path::PathBuf;

/// A NASR client which reads from the local file system instead of the FAA site.
///
/// Archives are looked up by their published file name, so a directory of downloaded cycles can
/// be used as is.
pub struct LocalClient {
    root: PathBuf,
}

impl LocalClient {
    /// Open a directory of cycle archives.
    pub fn open(root: PathBuf) -> Self {
        Self { root }
    }

    /// Cycles available in this directory, oldest first.
    pub fn list_cycles(&self) -> Result<Vec<Cycle>, Error> {
        let mut cycles = self
            .root
            .read_dir()?
            .filter_map(|dirent| {
                let dirent = match dirent {
                    Ok(de) => de,
                    Err(err) => {
                        tracing::error!("unable to read directory {}: {err}", self.root.display());
                        return None;
                    }
                };
                let name = dirent.file_name();
                let date = name.to_str()?.strip_suffix("_APT_CSV.zip")?;
                match chrono::NaiveDate::parse_from_str(date, "%d_%b_%Y")
                    .map_err(Error::from)
                    .and_then(Cycle::try_from)
                {
                    Ok(cycle) => Some(cycle),
                    Err(err) => {
                        tracing::warn!("ignoring {}: {err}", dirent.path().display());
                        None
                    }
                }
            })
            .collect::<Vec<_>>();
        cycles.sort();
        Ok(cycles)
    }
}

#[async_trait]
impl Nasr for LocalClient {
    async fn fetch(&self, cycle: Cycle) -> Result<Archive, Error> {
        let path = self.root.join(cycle.file_name());
        tracing::info!("reading {}", path.display());
        Archive::open(path)
    }
}
