//! Export sinks for a finished coordinate set.

pub mod heatmap;
pub mod kml;

pub use heatmap::{HeatmapExporter, HeatmapOptions};
pub use kml::KmlExporter;

use crate::error::{Error, Result};
use crate::location::CoordinateSet;
use std::fs;
use std::path::Path;
use tracing::info;

pub trait Exporter {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Render the whole document in memory.
    fn render(&self, coordinates: &CoordinateSet) -> Result<Vec<u8>>;

    /// Render and write `path` in one go.
    fn export(&self, coordinates: &CoordinateSet, path: &Path) -> Result<()> {
        let bytes = self.render(coordinates)?;
        fs::write(path, bytes).map_err(|source| Error::Write {
            path: path.to_path_buf(),
            source,
        })?;
        info!(
            "wrote {} with {} points to {}",
            self.name(),
            coordinates.len(),
            path.display()
        );
        Ok(())
    }
}

/// Plain decimal text for a coordinate component; whole numbers keep
/// one fractional digit (`-74.0`, not `-74`).
fn decimal(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{:.1}", v)
    } else {
        v.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal() {
        assert_eq!(decimal(-74.0), "-74.0");
        assert_eq!(decimal(37.4), "37.4");
        assert_eq!(decimal(0.0000001), "0.0000001");
    }
}
