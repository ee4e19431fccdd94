//! Location subsystem: IP → coordinate.
//!
//! Provides the local MaxMind database provider, the ipinfo.io fallback
//! and the resolver that chains them.

pub mod providers;
pub mod resolver;
pub mod types;

pub use providers::{GeoLookup, IpInfoClient, MaxMindDatabase};
pub use resolver::{LocationResolver, ResolveStats};
pub use types::{Coordinate, CoordinateSet, LocationError, LocationSource, Resolution};
