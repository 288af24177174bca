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

//! Error types for the synchronization layer.
//!
//! Almost every failure in the core is recoverable: network and parse errors
//! push the catalog fetch further down its fallback chain, and storage errors
//! turn caching and queueing into no-ops. A misconfigured service URL and
//! [`SyncError::CatalogUnavailable`] are the only errors retrying cannot fix.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    /// Timeout, refused connection, DNS failure and so on.
    #[error("network error: {0}")]
    Network(String),

    #[error("unexpected HTTP status {0}")]
    HttpStatus(u16),

    /// A remote or cached payload could not be parsed.
    #[error("malformed data: {0}")]
    Malformed(String),

    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("network link is down")]
    Offline,

    /// The configured service URL cannot address the catalog endpoints.
    #[error("invalid service URL: {0}")]
    InvalidUrl(String),

    /// Remote, local cache and built-in tiers all came up empty.
    #[error("no catalog available from any source")]
    CatalogUnavailable,
}

impl SyncError {
    /// Whether the error should push a fetch down to the next fallback tier.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, SyncError::CatalogUnavailable | SyncError::InvalidUrl(_))
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(e: serde_json::Error) -> Self {
        SyncError::Malformed(e.to_string())
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => SyncError::HttpStatus(status.as_u16()),
            None if e.is_decode() => SyncError::Malformed(e.to_string()),
            None => SyncError::Network(e.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_configuration_and_exhaustion_are_fatal() {
        assert!(SyncError::Network("refused".into()).is_recoverable());
        assert!(SyncError::HttpStatus(503).is_recoverable());
        assert!(SyncError::Offline.is_recoverable());
        assert!(!SyncError::InvalidUrl("nope".into()).is_recoverable());
        assert!(!SyncError::CatalogUnavailable.is_recoverable());
    }
}
