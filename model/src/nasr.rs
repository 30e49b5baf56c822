//! Facilities for pulling cycle archives from the FAA.

use super::{archive::Archive, cycle::Cycle};
use anyhow::Error;
use async_trait::async_trait;

mod client;
mod local;

pub use client::Client;
pub use local::LocalClient;

/// A source of NASR cycle archives.
#[async_trait]
pub trait Nasr: Sync {
    /// Load the airport archive for `cycle`.
    ///
    /// Fails if the cycle has not been published, or if what was published is not a valid
    /// archive.
    async fn fetch(&self, cycle: Cycle) -> Result<Archive, Error>;
}

/// Load the archive for `cycle`, falling back to the cycle before it.
///
/// `cycle` is normally the upcoming cycle, which the FAA publishes ahead of its effective date.
/// If it is not available yet, the cycle currently in effect is used instead. Only one fallback
/// is attempted.
///
/// Returns the cycle that was actually loaded along with its archive.
pub async fn pull<N: Nasr + ?Sized>(nasr: &N, cycle: Cycle) -> Result<(Cycle, Archive), Error> {
    tracing::info!("trying cycle {cycle}");
    match nasr.fetch(cycle).await {
        Ok(archive) => Ok((cycle, archive)),
        Err(err) => {
            let fallback = cycle.previous();
            tracing::warn!("cycle {cycle} not available ({err:#}), falling back to {fallback}");
            let archive = nasr
                .fetch(fallback)
                .await
                .map_err(|err| err.context(format!("failed to load cycle {fallback}")))?;
            Ok((fallback, archive))
        }
    }
}
