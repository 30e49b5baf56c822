//! An HTTP client for the FAA NASR subscription site.

use super::Nasr;
use crate::{
    archive::Archive,
    cycle::{Cycle, DEFAULT_BASE_URL},
};
use anyhow::Error;
use async_trait::async_trait;
use surf::{middleware::Redirect, StatusCode};

/// An HTTP client for the FAA NASR subscription site.
pub struct Client {
    client: surf::Client,
    base_url: String,
}

impl Default for Client {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL.into())
    }
}

impl Client {
    /// Download cycles from `base_url`.
    pub fn new(base_url: String) -> Self {
        Self {
            client: surf::client().with(Redirect::default()),
            base_url,
        }
    }
}

#[async_trait]
impl Nasr for Client {
    async fn fetch(&self, cycle: Cycle) -> Result<Archive, Error> {
        let url = cycle.url(&self.base_url);
        tracing::info!(%url, "NASR request");

        let mut res = self.client.get(&url).await.map_err(Error::msg)?;
        if res.status() != StatusCode::Ok {
            return Err(Error::msg(format!("HTTP {}: {url}", res.status() as u16)));
        }
        let bytes = res.body_bytes().await.map_err(Error::msg)?;
        tracing::info!("downloaded {} bytes from {url}", bytes.len());

        Archive::new(bytes)
    }
}
