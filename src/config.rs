//! Run configuration, built once from the command line and passed down.

use crate::export::HeatmapOptions;
use std::path::PathBuf;

/// GeoLite2 database looked up in the working directory.
pub const DEFAULT_DATABASE: &str = "GeoLite2-City.mmdb";

/// Remote fallback; `{ip}` is replaced with the address.
pub const DEFAULT_REMOTE_URL: &str = "https://ipinfo.io/{ip}/json";

#[derive(Debug, Clone)]
pub struct Config {
    /// Text file, one address per line.
    pub input: PathBuf,
    pub kml_output: PathBuf,
    pub heatmap_output: PathBuf,
    pub database: PathBuf,
    pub remote_url: String,
    /// Never consult the remote fallback.
    pub offline: bool,
    pub heatmap: HeatmapOptions,
}

impl Config {
    /// Configuration with every optional setting at its default.
    pub fn new(
        input: impl Into<PathBuf>,
        kml_output: impl Into<PathBuf>,
        heatmap_output: impl Into<PathBuf>,
    ) -> Self {
        Self {
            input: input.into(),
            kml_output: kml_output.into(),
            heatmap_output: heatmap_output.into(),
            database: PathBuf::from(DEFAULT_DATABASE),
            remote_url: DEFAULT_REMOTE_URL.to_string(),
            offline: false,
            heatmap: HeatmapOptions::default(),
        }
    }
}
