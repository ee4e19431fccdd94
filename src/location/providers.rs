//! Location providers: MaxMind GeoLite2 database and the ipinfo.io API.

use super::types::{Coordinate, LocationError};
use maxminddb::{geoip2, Reader};
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use std::path::Path;
use tracing::{debug, trace};

const USER_AGENT: &str = concat!("ipgeomap/", env!("CARGO_PKG_VERSION"));

/// A source of IP → coordinate answers.
///
/// `Ok(None)` means the provider has no location for the address, which is
/// an ordinary outcome. `Err` is reserved for the provider itself failing.
pub trait GeoLookup {
    fn locate(&self, ip: Ipv4Addr) -> Result<Option<Coordinate>, LocationError>;

    /// Provider name for logs.
    fn name(&self) -> &'static str;
}

// ─── MaxMind ────────────────────────────────────────────────────

/// Local GeoLite2-City database, loaded into memory once.
pub struct MaxMindDatabase {
    reader: Reader<Vec<u8>>,
}

impl MaxMindDatabase {
    pub fn open(path: &Path) -> Result<Self, maxminddb::MaxMindDbError> {
        let reader = Reader::open_readfile(path)?;
        debug!(
            "Opened {} ({} nodes)",
            reader.metadata.database_type, reader.metadata.node_count
        );
        Ok(Self { reader })
    }
}

impl GeoLookup for MaxMindDatabase {
    fn locate(&self, ip: Ipv4Addr) -> Result<Option<Coordinate>, LocationError> {
        let result = self.reader.lookup(IpAddr::V4(ip))?;
        let Some(city) = result.decode::<geoip2::City>()? else {
            trace!("{} absent from database", ip);
            return Ok(None);
        };

        // Some networks only carry country data; treat those as absent.
        match (city.location.latitude, city.location.longitude) {
            (Some(lat), Some(lon)) => Coordinate::new(lat, lon).map(Some),
            _ => {
                trace!("{} has a record without location", ip);
                Ok(None)
            }
        }
    }

    fn name(&self) -> &'static str {
        "MaxMind"
    }
}

// ─── ipinfo.io ──────────────────────────────────────────────────

#[derive(Deserialize, Debug)]
struct IpInfoResponse {
    /// "lat,lon"
    loc: Option<String>,
    #[serde(default)]
    bogon: bool,
}

/// Remote fallback: one blocking GET per address, no timeout override.
pub struct IpInfoClient {
    url_template: String,
}

impl IpInfoClient {
    /// `url_template` uses `{ip}` as the placeholder,
    /// e.g. `https://ipinfo.io/{ip}/json`.
    pub fn new(url_template: &str) -> Self {
        Self {
            url_template: url_template.to_string(),
        }
    }

    fn url_for(&self, ip: Ipv4Addr) -> String {
        self.url_template.replace("{ip}", &ip.to_string())
    }
}

impl GeoLookup for IpInfoClient {
    fn locate(&self, ip: Ipv4Addr) -> Result<Option<Coordinate>, LocationError> {
        let url = self.url_for(ip);
        let response = ureq::get(&url)
            .set("User-Agent", USER_AGENT)
            .call()
            .map_err(|e| LocationError::Network(e.to_string()))?;

        let r: IpInfoResponse = response
            .into_json()
            .map_err(|e| LocationError::InvalidResponse(e.to_string()))?;

        trace!("ipinfo answer for {}: {:?}", ip, r);
        if r.bogon {
            return Ok(None);
        }
        r.loc.as_deref().map(parse_loc).transpose()
    }

    fn name(&self) -> &'static str {
        "ipinfo.io"
    }
}

/// Parse ipinfo's combined `"lat,lon"` field.
pub fn parse_loc(loc: &str) -> Result<Coordinate, LocationError> {
    let (lat, lon) = loc
        .split_once(',')
        .ok_or_else(|| LocationError::InvalidResponse(format!("bad loc '{}'", loc)))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|_| LocationError::InvalidResponse(format!("bad latitude in '{}'", loc)))?;
    let lon: f64 = lon
        .trim()
        .parse()
        .map_err(|_| LocationError::InvalidResponse(format!("bad longitude in '{}'", loc)))?;
    Coordinate::new(lat, lon)
}
