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

//! Network link probing.

use std::{
    net::{TcpStream, ToSocketAddrs},
    time::Duration,
};

use log::trace;

pub trait NetworkLink {
    fn is_connected(&self) -> bool;
}

/// Treats the link as up when a TCP connection to the service can be opened.
pub struct TcpProbeLink {
    address: String,
    timeout: Duration,
}

impl TcpProbeLink {
    pub fn new(host: &str, port: u16, timeout: Duration) -> Self {
        Self {
            address: format!("{}:{}", host, port),
            timeout,
        }
    }
}

impl NetworkLink for TcpProbeLink {
    fn is_connected(&self) -> bool {
        let Ok(mut addrs) = self.address.to_socket_addrs() else {
            trace!("Cannot resolve {}", self.address);
            return false;
        };
        addrs.any(|addr| TcpStream::connect_timeout(&addr, self.timeout).is_ok())
    }
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;

    use super::*;

    #[test]
    fn probe_detects_listening_port() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let link = TcpProbeLink::new("127.0.0.1", port, Duration::from_millis(500));
        assert!(link.is_connected());

        drop(listener);
        assert!(!link.is_connected());
    }
}
