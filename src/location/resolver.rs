//! Location resolver: local database first, remote lookup second.
//!
//! Flow:  database → remote (unless offline) → not found

use super::providers::GeoLookup;
use super::types::{Coordinate, LocationSource, Resolution};
use std::net::Ipv4Addr;
use tracing::{debug, info, warn};

/// Counters reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveStats {
    pub database_hits: usize,
    pub remote_hits: usize,
    pub misses: usize,
}

/// The resolver with its fallback chain. Borrows its providers; the
/// caller owns the database handle for the duration of the run.
pub struct LocationResolver<'a> {
    local: &'a dyn GeoLookup,
    remote: Option<&'a dyn GeoLookup>,
    offline: bool,
    stats: ResolveStats,
}

impl<'a> LocationResolver<'a> {
    pub fn new(local: &'a dyn GeoLookup, remote: Option<&'a dyn GeoLookup>) -> Self {
        Self {
            local,
            remote,
            offline: false,
            stats: ResolveStats::default(),
        }
    }

    /// Offline mode: skip the remote fallback.
    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    pub fn stats(&self) -> ResolveStats {
        self.stats
    }

    /// Resolve one address. Provider failures end up as `NotFound`.
    pub fn resolve(&mut self, ip: Ipv4Addr) -> Resolution {
        // 1. Local database
        match self.local.locate(ip) {
            Ok(Some(coordinate)) => {
                debug!("{} -> {} ({})", ip, coordinate, self.local.name());
                return self.found(coordinate, LocationSource::Database);
            }
            Ok(None) => {}
            Err(e) => warn!("{} lookup failed for {}: {}", self.local.name(), ip, e),
        }

        // 2. Remote fallback
        let remote = match self.remote {
            Some(remote) if !self.offline => remote,
            _ => {
                debug!("{} not in database, remote lookup disabled", ip);
                self.stats.misses += 1;
                return Resolution::NotFound;
            }
        };

        info!("ip address {} not found in database. trying {}...", ip, remote.name());
        match remote.locate(ip) {
            Ok(Some(coordinate)) => {
                debug!("{} -> {} ({})", ip, coordinate, remote.name());
                self.found(coordinate, LocationSource::Remote)
            }
            Ok(None) => {
                debug!("{} has no location for {}", remote.name(), ip);
                self.stats.misses += 1;
                Resolution::NotFound
            }
            Err(e) => {
                warn!("{} lookup failed for {}: {}", remote.name(), ip, e);
                self.stats.misses += 1;
                Resolution::NotFound
            }
        }
    }

    fn found(&mut self, coordinate: Coordinate, source: LocationSource) -> Resolution {
        match source {
            LocationSource::Database => self.stats.database_hits += 1,
            LocationSource::Remote => self.stats.remote_hits += 1,
        }
        Resolution::Found { coordinate, source }
    }
}
