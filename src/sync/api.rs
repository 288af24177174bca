// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Catalog service client.

use std::time::Duration;

use log::debug;
use reqwest::{Url, blocking::Client};

use crate::{
    error::{Result, SyncError},
    sync::wire::{ItemsResponse, PostResponse, StatusResponse},
};

/// Remote operations of the catalog service.
pub trait CatalogApi {
    /// `GET /items`
    fn fetch_items(&self) -> Result<ItemsResponse>;

    /// `POST /sentData/{location}/{item}/{dirty}`
    fn post_interaction(&self, location: &str, item: &str, dirty: bool) -> Result<PostResponse>;

    /// `GET /status`
    fn status(&self) -> Result<StatusResponse>;
}

/// [`CatalogApi`] over HTTP using a blocking `reqwest` client.
pub struct HttpCatalogApi {
    client: Client,
    base_url: Url,
    status_timeout: Duration,
}

impl HttpCatalogApi {
    /// Creates a client for the service at `base_url`.
    ///
    /// # Arguments
    ///
    /// * `timeout` - Bound on item fetches and posts.
    /// * `status_timeout` - Bound on status checks.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client cannot be
    /// built.
    pub fn new(base_url: &str, timeout: Duration, status_timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| SyncError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(SyncError::InvalidUrl(format!("{} cannot be a base URL", base_url)));
        }
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url,
            status_timeout,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| SyncError::InvalidUrl(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

impl CatalogApi for HttpCatalogApi {
    fn fetch_items(&self) -> Result<ItemsResponse> {
        let url = self.endpoint(&["items"])?;
        debug!("Fetching items from {}", url);

        let response = self.client.get(url).send()?.error_for_status()?;
        Ok(response.json()?)
    }

    fn post_interaction(&self, location: &str, item: &str, dirty: bool) -> Result<PostResponse> {
        let dirty = if dirty { "true" } else { "false" };
        let url = self.endpoint(&["sentData", location, item, dirty])?;
        debug!("Posting to {}", url);

        let body = self.client.post(url).send()?.error_for_status()?.text()?;
        Ok(serde_json::from_str(&body).unwrap_or_default())
    }

    fn status(&self) -> Result<StatusResponse> {
        let url = self.endpoint(&["status"])?;

        let response = self
            .client
            .get(url)
            .timeout(self.status_timeout)
            .send()?
            .error_for_status()?;
        Ok(response.json()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(base: &str) -> HttpCatalogApi {
        HttpCatalogApi::new(base, Duration::from_secs(5), Duration::from_secs(3)).unwrap()
    }

    #[test]
    fn path_segments_are_encoded() {
        let api = api("http://10.0.0.2:5000");
        let url = api
            .endpoint(&["sentData", "Main hall", "Pizza box/greasy", "true"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://10.0.0.2:5000/sentData/Main%20hall/Pizza%20box%2Fgreasy/true"
        );
    }

    #[test]
    fn base_path_is_kept() {
        let api = api("http://kiosk.local/api/");
        assert_eq!(
            api.endpoint(&["items"]).unwrap().as_str(),
            "http://kiosk.local/api/items"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = HttpCatalogApi::new("not a url", Duration::from_secs(1), Duration::from_secs(1));
        assert!(matches!(result, Err(SyncError::InvalidUrl(_))));

        let result = HttpCatalogApi::new("mailto:kiosk@example.com", Duration::from_secs(1), Duration::from_secs(1));
        match result {
            Err(e) => assert!(!e.is_recoverable()),
            Ok(_) => panic!("opaque URL accepted"),
        }
    }
}
