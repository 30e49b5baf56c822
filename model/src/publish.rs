//! The end-to-end update: fetch a cycle, parse it, and publish the airports.

use super::{
    cycle::Cycle,
    emit,
    nasr::{self, Nasr},
    query::Filter,
};
use anyhow::Error;
use clap::Args;
use std::path::PathBuf;

/// Where an update writes its results.
#[derive(Clone, Debug, Args)]
pub struct Outputs {
    /// Write the airport list to FILE.
    #[clap(short, long, env = "NASR_OUT", name = "FILE", default_value = emit::DEFAULT_OUTPUT)]
    pub out: PathBuf,

    /// Extract the raw cycle archive to RAW_DIR.
    #[clap(long, env = "NASR_RAW", name = "RAW_DIR")]
    pub raw: Option<PathBuf>,

    /// Save the downloaded cycle archive, unextracted, to ARCHIVE.
    #[clap(long, env = "NASR_SAVE", name = "ARCHIVE")]
    pub save: Option<PathBuf>,
}

impl Outputs {
    /// Write only the airport list, to `out`.
    pub fn new(out: impl Into<PathBuf>) -> Self {
        Self {
            out: out.into(),
            raw: None,
            save: None,
        }
    }
}

/// What an update produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Summary {
    /// The cycle that was published.
    pub cycle: Cycle,
    /// Airports in the cycle archive.
    pub parsed: usize,
    /// Airports written, after filtering.
    pub written: usize,
}

/// Update the published airport list from the latest available cycle.
///
/// Tries `cycle`, falling back once to the cycle before it, then writes the airports accepted by
/// `filter` to `outputs.out`. The archive itself is saved and extracted if `outputs` asks for it.
pub async fn update<N: Nasr + ?Sized>(
    nasr: &N,
    cycle: Cycle,
    filter: &Filter,
    outputs: &Outputs,
) -> Result<Summary, Error> {
    let (cycle, archive) = nasr::pull(nasr, cycle).await?;
    tracing::info!("loaded cycle {cycle}");

    if let Some(path) = &outputs.save {
        archive.save(path)?;
        tracing::info!("saved cycle {cycle} to {}", path.display());
    }
    if let Some(raw) = &outputs.raw {
        archive.extract(raw)?;
        tracing::info!("extracted cycle {cycle} to {}", raw.display());
    }

    let airports = archive.airports()?;
    let parsed = airports.len();
    let airports = filter.apply(airports);
    emit::write_json(&outputs.out, &airports)?;

    Ok(Summary {
        cycle,
        parsed,
        written: airports.len(),
    })
}
