use clap::Parser;
use ipgeomap::config::{Config, DEFAULT_DATABASE, DEFAULT_REMOTE_URL};
use ipgeomap::export::heatmap::{HeatmapOptions, DEFAULT_OPACITY, DEFAULT_RADIUS, DEFAULT_ZOOM};
use ipgeomap::Error;
use std::path::PathBuf;
use tracing::{error, info, Level};

/// ipgeomap: IP to geo KML/HTML map converter
///
/// Geolocates every public IPv4 address in INPUT with the local GeoLite2
/// database (falling back to ipinfo.io) and writes a KML placemark file
/// and a heatmap HTML page.
///
/// Examples:
///   ipgeomap ips.txt ips.kml heatmap.html
///   ipgeomap --offline ips.txt ips.kml heatmap.html
///   ipgeomap --database /data/GeoLite2-City.mmdb --zoom 3 ips.txt ips.kml heatmap.html
#[derive(Parser, Debug)]
#[command(name = "ipgeomap", version, about, long_about = None)]
struct Cli {
    /// Text file with one IP address per line.
    input: PathBuf,

    /// KML file to write.
    output_kml: PathBuf,

    /// Heatmap HTML file to write.
    output_heatmap: PathBuf,

    /// GeoLite2-City database.
    #[arg(long, default_value = DEFAULT_DATABASE)]
    database: PathBuf,

    /// Fallback lookup URL; `{ip}` is replaced with the address.
    #[arg(long, default_value = DEFAULT_REMOTE_URL)]
    remote_url: String,

    /// Offline mode: only use the local database.
    #[arg(long)]
    offline: bool,

    /// Initial heatmap zoom level.
    #[arg(long, default_value_t = DEFAULT_ZOOM, value_parser = clap::value_parser!(u8).range(0..=21))]
    zoom: u8,

    /// Heatmap point radius in pixels.
    #[arg(long, default_value_t = DEFAULT_RADIUS)]
    radius: u32,

    /// Heatmap layer opacity (0 to 1).
    #[arg(long, default_value_t = DEFAULT_OPACITY, value_parser = parse_opacity)]
    opacity: f64,

    /// Google Maps JavaScript API key.
    #[arg(long, value_parser = parse_api_key)]
    api_key: Option<String>,

    /// More log output (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    fn into_config(self) -> Config {
        let mut config = Config::new(self.input, self.output_kml, self.output_heatmap);
        config.database = self.database;
        config.remote_url = self.remote_url;
        config.offline = self.offline;
        config.heatmap = HeatmapOptions {
            zoom: self.zoom,
            radius: self.radius,
            opacity: self.opacity,
            api_key: self.api_key,
            ..HeatmapOptions::default()
        };
        config
    }

    fn log_level(&self) -> Level {
        if self.quiet {
            return Level::ERROR;
        }
        match self.verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}

fn parse_opacity(s: &str) -> Result<f64, String> {
    let v: f64 = s.parse().map_err(|_| format!("'{}' is not a number", s))?;
    if !(0.0..=1.0).contains(&v) {
        return Err(format!("opacity must be between 0 and 1, got {}", v));
    }
    Ok(v)
}

fn parse_api_key(s: &str) -> Result<String, String> {
    if s.is_empty() || !s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
        return Err("API keys contain only letters, digits, '-' and '_'".into());
    }
    Ok(s.to_string())
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level())
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    info!("ip to geo kml/html map converter v{}", env!("CARGO_PKG_VERSION"));

    let config = cli.into_config();

    match ipgeomap::run(&config) {
        Ok(summary) => {
            info!(
                "{} of {} addresses plotted ({} from database, {} remote, {} skipped)",
                summary.plotted,
                summary.tokens,
                summary.stats.database_hits,
                summary.stats.remote_hits,
                summary.skipped,
            );
            println!("done");
        }
        Err(Error::DatabaseMissing(path)) => {
            error!("'{}' file does not exist", path.display());
            error!("please download the GeoLite2 database from https://www.maxmind.com");
            error!("you may need to create a free account to download 'GeoLite2-City.mmdb'");
            std::process::exit(1);
        }
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}
