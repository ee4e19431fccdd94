//! Heatmap export: a standalone HTML page with a Google Maps heatmap layer
//! centered on the mean coordinate.

use super::{decimal, Exporter};
use crate::error::Result;
use crate::location::{Coordinate, CoordinateSet};
use tracing::warn;

const MAPS_API_URL: &str = "https://maps.googleapis.com/maps/api/js";

pub const DEFAULT_ZOOM: u8 = 5;
pub const DEFAULT_RADIUS: u32 = 10;
pub const DEFAULT_OPACITY: f64 = 0.6;

/// Rendering options for the heatmap page.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapOptions {
    /// Initial map zoom (0 = whole world).
    pub zoom: u8,
    /// Influence radius of each point, in pixels.
    pub radius: u32,
    pub opacity: f64,
    /// Whether the radius scales with zoom.
    pub dissipating: bool,
    /// Google Maps API key. Without one the map renders in development mode.
    pub api_key: Option<String>,
}

impl Default for HeatmapOptions {
    fn default() -> Self {
        Self {
            zoom: DEFAULT_ZOOM,
            radius: DEFAULT_RADIUS,
            opacity: DEFAULT_OPACITY,
            dissipating: true,
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct HeatmapExporter {
    options: HeatmapOptions,
}

impl HeatmapExporter {
    pub fn new(options: HeatmapOptions) -> Self {
        Self { options }
    }

    /// Initial view center: the mean of all points, or (0, 0) when there
    /// are none.
    pub fn center(coordinates: &CoordinateSet) -> Coordinate {
        coordinates.mean().unwrap_or_else(|| {
            warn!("no coordinates to plot, centering heatmap on 0, 0");
            Coordinate::default()
        })
    }

    fn script_src(&self) -> String {
        match &self.options.api_key {
            Some(key) => format!(
                "{}?libraries=visualization&key={}",
                MAPS_API_URL,
                percent_encode(key)
            ),
            None => format!("{}?libraries=visualization", MAPS_API_URL),
        }
    }
}

/// Query-string value encoding: RFC 3986 unreserved bytes pass through,
/// everything else becomes `%XX`. The result is also safe inside a quoted
/// HTML attribute.
fn percent_encode(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for b in value.bytes() {
        if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'~') {
            out.push(b as char);
        } else {
            out.push_str(&format!("%{:02X}", b));
        }
    }
    out
}

impl Exporter for HeatmapExporter {
    fn name(&self) -> &'static str {
        "heatmap"
    }

    fn render(&self, coordinates: &CoordinateSet) -> Result<Vec<u8>> {
        let center = Self::center(coordinates);
        let opts = &self.options;
        let mut out = String::new();

        out.push_str("<html>\n<head>\n");
        out.push_str("<meta name=\"viewport\" content=\"initial-scale=1.0, user-scalable=no\" />\n");
        out.push_str("<meta http-equiv=\"content-type\" content=\"text/html; charset=UTF-8\" />\n");
        out.push_str("<title>IP heatmap</title>\n");
        out.push_str(&format!(
            "<script type=\"text/javascript\" src=\"{}\"></script>\n",
            self.script_src()
        ));
        out.push_str("<script type=\"text/javascript\">\n");
        out.push_str("    function initialize() {\n");
        out.push_str("        var map = new google.maps.Map(document.getElementById(\"map_canvas\"), {\n");
        out.push_str(&format!("            zoom: {},\n", opts.zoom));
        out.push_str(&format!(
            "            center: new google.maps.LatLng({}, {})\n",
            decimal(center.lat()),
            decimal(center.lon())
        ));
        out.push_str("        });\n\n");

        out.push_str("        var points = [\n");
        for c in coordinates {
            out.push_str(&format!(
                "            new google.maps.LatLng({}, {}),\n",
                decimal(c.lat()),
                decimal(c.lon())
            ));
        }
        out.push_str("        ];\n\n");

        out.push_str("        var heatmap = new google.maps.visualization.HeatmapLayer({\n");
        out.push_str(&format!("            radius: {},\n", opts.radius));
        out.push_str(&format!("            opacity: {},\n", decimal(opts.opacity)));
        out.push_str(&format!("            dissipating: {},\n", opts.dissipating));
        out.push_str("            data: points\n");
        out.push_str("        });\n");
        out.push_str("        heatmap.setMap(map);\n");
        out.push_str("    }\n");
        out.push_str("</script>\n</head>\n");
        out.push_str("<body style=\"margin:0px; padding:0px;\" onload=\"initialize()\">\n");
        out.push_str("    <div id=\"map_canvas\" style=\"width: 100%; height: 100%;\"></div>\n");
        out.push_str("</body>\n</html>\n");

        Ok(out.into_bytes())
    }
}
