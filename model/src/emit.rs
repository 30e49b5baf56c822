//! Publishing airport data for the map.

use super::airport::Airport;
use anyhow::{Context, Error};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Where the map expects to find its data, relative to the working directory.
pub const DEFAULT_OUTPUT: &str = "public/airports.json";

/// Write `airports` as pretty-printed JSON to `path`.
///
/// The JSON is written to a temporary file next to `path` and then moved into place, so readers
/// never observe a partially written file.
pub fn write_json(path: impl AsRef<Path>, airports: &[Airport]) -> Result<(), Error> {
    let path = path.as_ref();
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = Path::new(&tmp);

    let file = File::create(tmp).with_context(|| format!("creating {}", tmp.display()))?;
    let res = write_pretty(BufWriter::new(file), airports)
        .with_context(|| format!("writing {}", tmp.display()))
        .and_then(|()| {
            fs::rename(tmp, path)
                .with_context(|| format!("moving {} to {}", tmp.display(), path.display()))
        });
    if let Err(err) = res {
        if let Err(rm) = fs::remove_file(tmp) {
            tracing::warn!("unable to remove {}: {rm}", tmp.display());
        }
        return Err(err);
    }
    tracing::info!("wrote {} airports to {}", airports.len(), path.display());
    Ok(())
}

fn write_pretty(mut w: impl Write, airports: &[Airport]) -> Result<(), Error> {
    serde_json::to_writer_pretty(&mut w, airports)?;
    w.write_all(b"\n")?;
    w.flush()?;
    Ok(())
}

/// Load airports previously written by [`write_json`].
pub fn read_json(path: impl AsRef<Path>) -> Result<Vec<Airport>, Error> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing {}", path.display()))
}
