//! KML placemark export. One `<Point>` placemark per coordinate.

use super::{decimal, Exporter};
use crate::error::{Error, Result};
use crate::location::CoordinateSet;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::{self, Write};

const KML_NS: &str = "http://www.opengis.net/kml/2.2";

#[derive(Debug, Clone, Copy, Default)]
pub struct KmlExporter;

impl KmlExporter {
    /// Stream the document into `out` and hand it back.
    pub fn write_to<W: io::Write>(&self, out: W, coordinates: &CoordinateSet) -> Result<W> {
        write_document(Writer::new_with_indent(out, b' ', 2), coordinates).map_err(Error::Kml)
    }
}

fn write_document<W: io::Write>(mut w: Writer<W>, coordinates: &CoordinateSet) -> io::Result<W> {
    w.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    w.write_event(Event::Start(
        BytesStart::new("kml").with_attributes([("xmlns", KML_NS)]),
    ))?;

    if coordinates.is_empty() {
        w.write_event(Event::Empty(BytesStart::new("Document")))?;
    } else {
        w.write_event(Event::Start(BytesStart::new("Document")))?;
        for c in coordinates {
            // KML wants longitude first
            let text = format!("{},{}", decimal(c.lon()), decimal(c.lat()));
            w.write_event(Event::Start(BytesStart::new("Placemark")))?;
            w.write_event(Event::Start(BytesStart::new("Point")))?;
            w.write_event(Event::Start(BytesStart::new("coordinates")))?;
            w.write_event(Event::Text(BytesText::new(&text)))?;
            w.write_event(Event::End(BytesEnd::new("coordinates")))?;
            w.write_event(Event::End(BytesEnd::new("Point")))?;
            w.write_event(Event::End(BytesEnd::new("Placemark")))?;
        }
        w.write_event(Event::End(BytesEnd::new("Document")))?;
    }

    w.write_event(Event::End(BytesEnd::new("kml")))?;

    let mut out = w.into_inner();
    out.write_all(b"\n")?;
    Ok(out)
}

impl Exporter for KmlExporter {
    fn name(&self) -> &'static str {
        "KML"
    }

    fn render(&self, coordinates: &CoordinateSet) -> Result<Vec<u8>> {
        self.write_to(Vec::new(), coordinates)
    }
}
