//! ipgeomap: geolocate a list of IPv4 addresses and plot them.
//!
//! Pipeline: filter → resolve (MaxMind database, then ipinfo.io) →
//! collect → export (KML placemarks, HTML heatmap).

pub mod collector;
pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod location;

pub use config::Config;
pub use error::{Error, Result};

use collector::Collector;
use export::{Exporter, HeatmapExporter, KmlExporter};
use location::{GeoLookup, IpInfoClient, LocationResolver, MaxMindDatabase, ResolveStats};
use std::fs;
use std::path::Path;

/// What a finished run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub tokens: usize,
    pub plotted: usize,
    pub skipped: usize,
    pub stats: ResolveStats,
}

/// Run the whole pipeline.
///
/// The database must exist before the input file is touched. The database
/// handle lives for the duration of this call.
pub fn run(config: &Config) -> Result<RunSummary> {
    if !config.database.is_file() {
        return Err(Error::DatabaseMissing(config.database.clone()));
    }

    let tokens = read_tokens(&config.input)?;
    let database = MaxMindDatabase::open(&config.database).map_err(|source| Error::Database {
        path: config.database.clone(),
        source,
    })?;
    let remote = IpInfoClient::new(&config.remote_url);

    run_with(config, &tokens, &database, Some(&remote))
}

/// Resolve `tokens` with the given providers and write both outputs.
pub fn run_with(
    config: &Config,
    tokens: &[String],
    local: &dyn GeoLookup,
    remote: Option<&dyn GeoLookup>,
) -> Result<RunSummary> {
    let mut resolver = LocationResolver::new(local, remote);
    resolver.set_offline(config.offline);

    let mut collector = Collector::new(&mut resolver);
    let coordinates = collector.collect(tokens);
    let skipped = collector.diagnostics().len();
    let stats = collector.stats();

    KmlExporter.export(&coordinates, &config.kml_output)?;
    HeatmapExporter::new(config.heatmap.clone()).export(&coordinates, &config.heatmap_output)?;

    Ok(RunSummary {
        tokens: tokens.len(),
        plotted: coordinates.len(),
        skipped,
        stats,
    })
}

/// One token per line. Invalid UTF-8 is replaced rather than rejected;
/// such lines fail the address filter later.
pub fn read_tokens(path: &Path) -> Result<Vec<String>> {
    let bytes = fs::read(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&bytes)
        .lines()
        .map(str::to_string)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::resolver::tests::FixtureLookup;
    use tempfile::TempDir;

    fn config_in(dir: &TempDir) -> Config {
        let mut config = Config::new(
            dir.path().join("ips.txt"),
            dir.path().join("out.kml"),
            dir.path().join("out.html"),
        );
        config.database = dir.path().join("GeoLite2-City.mmdb");
        config
    }

    fn tokens(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_missing_database_checked_first() {
        let dir = TempDir::new().unwrap();
        // the input file does not exist either; the database check wins
        let config = config_in(&dir);
        match run(&config) {
            Err(Error::DatabaseMissing(path)) => assert_eq!(path, config.database),
            other => panic!("expected DatabaseMissing, got {:?}", other),
        }
        assert!(!config.kml_output.exists());
    }

    #[test]
    fn test_read_tokens_keeps_blank_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ips.txt");
        fs::write(&path, "8.8.8.8\r\n\n1.1.1.1\n").unwrap();
        assert_eq!(read_tokens(&path).unwrap(), tokens(&["8.8.8.8", "", "1.1.1.1"]));
    }

    #[test]
    fn test_read_tokens_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            read_tokens(&dir.path().join("nope.txt")),
            Err(Error::Read { .. })
        ));
    }

    #[test]
    fn test_pipeline_writes_both_outputs() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        let local = FixtureLookup::with(&[("8.8.8.8", 37.5, -122.0)]);
        let remote = FixtureLookup::with(&[("1.1.1.1", 40.5, -74.0)]);

        let summary = run_with(
            &config,
            &tokens(&["8.8.8.8", "10.0.0.1", "bad-token", "1.1.1.1", "5.5.5.5"]),
            &local,
            Some(&remote),
        )
        .unwrap();

        assert_eq!(summary.tokens, 5);
        assert_eq!(summary.plotted, 2);
        assert_eq!(summary.skipped, 3);
        assert_eq!(
            summary.stats,
            ResolveStats {
                database_hits: 1,
                remote_hits: 1,
                misses: 1,
            }
        );

        let kml = fs::read_to_string(&config.kml_output).unwrap();
        assert!(kml.contains("<coordinates>-122.0,37.5</coordinates>"));
        assert!(kml.contains("<coordinates>-74.0,40.5</coordinates>"));

        let html = fs::read_to_string(&config.heatmap_output).unwrap();
        assert!(html.contains("center: new google.maps.LatLng(39.0, -98.0)"));
    }

    #[test]
    fn test_offline_config_respected() {
        let dir = TempDir::new().unwrap();
        let mut config = config_in(&dir);
        config.offline = true;
        let local = FixtureLookup::with(&[]);
        let remote = FixtureLookup::with(&[("1.1.1.1", 40.7, -74.0)]);

        let summary = run_with(&config, &tokens(&["1.1.1.1"]), &local, Some(&remote)).unwrap();
        assert_eq!(summary.plotted, 0);
        assert_eq!(remote.calls(), 0);
        // empty outputs are still written
        assert!(fs::read_to_string(&config.kml_output).unwrap().contains("<Document/>"));
        assert!(config.heatmap_output.exists());
    }

    #[test]
    fn test_run_with_database_offline() {
        let dir = TempDir::new().unwrap();
        let mut config = config_in(&dir);
        config.offline = true;
        config.database = Path::new(env!("CARGO_MANIFEST_DIR")).join("testdata/city-fixture.mmdb");
        fs::write(&config.input, "81.2.69.142\n2.125.160.216\n10.0.0.1\n").unwrap();

        let summary = run(&config).unwrap();
        assert_eq!(summary.tokens, 3);
        assert_eq!(summary.plotted, 1);
        assert_eq!(summary.stats.database_hits, 1);
        assert_eq!(summary.stats.misses, 1);

        let kml = fs::read_to_string(&config.kml_output).unwrap();
        assert!(kml.contains("<coordinates>-0.0931,51.5142</coordinates>"));
    }

    #[test]
    fn test_placemark_output_is_reproducible() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        let local = FixtureLookup::with(&[("8.8.8.8", 37.4, -122.1), ("9.9.9.9", 47.37, 8.54)]);
        let input = tokens(&["8.8.8.8", "9.9.9.9", "192.168.0.1"]);

        run_with(&config, &input, &local, None).unwrap();
        let first = fs::read(&config.kml_output).unwrap();
        run_with(&config, &input, &local, None).unwrap();
        let second = fs::read(&config.kml_output).unwrap();

        assert_eq!(first, second);
    }
}
