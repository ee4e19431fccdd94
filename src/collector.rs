//! Coordinate collector: filter, resolve and accumulate input tokens.

use crate::filter::{self, Rejection};
use crate::location::{CoordinateSet, LocationResolver, Resolution, ResolveStats};
use std::fmt;
use tracing::warn;

/// Why a token did not make it into the coordinate set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Filtered(Rejection),
    Unresolved,
}

/// A skipped input token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub token: String,
    pub reason: SkipReason,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason {
            SkipReason::Filtered(why) => write!(f, "skipping '{}': {}", self.token, why),
            SkipReason::Unresolved => write!(
                f,
                "ip address {} could not be located by either database",
                self.token
            ),
        }
    }
}

pub struct Collector<'r, 'a> {
    resolver: &'r mut LocationResolver<'a>,
    diagnostics: Vec<Diagnostic>,
}

impl<'r, 'a> Collector<'r, 'a> {
    pub fn new(resolver: &'r mut LocationResolver<'a>) -> Self {
        Self {
            resolver,
            diagnostics: Vec::new(),
        }
    }

    /// Resolve every token in order. Never stops early; skipped tokens are
    /// logged and recorded in [`Collector::diagnostics`].
    pub fn collect<I, S>(&mut self, tokens: I) -> CoordinateSet
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = CoordinateSet::new();
        for token in tokens {
            let token = token.as_ref();
            let ip = match filter::classify(token) {
                Ok(ip) => ip,
                Err(why) => {
                    self.skip(token, SkipReason::Filtered(why));
                    continue;
                }
            };
            match self.resolver.resolve(ip) {
                Resolution::Found { coordinate, .. } => set.push(coordinate),
                Resolution::NotFound => self.skip(token, SkipReason::Unresolved),
            }
        }
        set
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn stats(&self) -> ResolveStats {
        self.resolver.stats()
    }

    fn skip(&mut self, token: &str, reason: SkipReason) {
        let diagnostic = Diagnostic {
            token: token.trim().to_string(),
            reason,
        };
        warn!("{}", diagnostic);
        self.diagnostics.push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::resolver::tests::FixtureLookup;
    use crate::location::Coordinate;

    #[test]
    fn test_collect_mixed_input() {
        let local = FixtureLookup::with(&[("8.8.8.8", 37.4, -122.1)]);
        let remote = FixtureLookup::with(&[]);
        let mut resolver = LocationResolver::new(&local, Some(&remote));
        let mut collector = Collector::new(&mut resolver);

        let set = collector.collect(["8.8.8.8", "10.0.0.1", "bad-token"]);

        assert_eq!(set.len(), 1);
        assert_eq!(set.iter().next(), Some(&Coordinate::new(37.4, -122.1).unwrap()));
        assert_eq!(
            collector.diagnostics(),
            &[
                Diagnostic {
                    token: "10.0.0.1".into(),
                    reason: SkipReason::Filtered(Rejection::Private),
                },
                Diagnostic {
                    token: "bad-token".into(),
                    reason: SkipReason::Filtered(Rejection::Malformed),
                },
            ]
        );
        // filtered tokens never reach a provider
        assert_eq!(local.calls(), 1);
        assert_eq!(remote.calls(), 0);
    }

    #[test]
    fn test_unresolved_reported_and_skipped() {
        let local = FixtureLookup::with(&[("9.9.9.9", 47.0, 8.0)]);
        let remote = FixtureLookup::failing();
        let mut resolver = LocationResolver::new(&local, Some(&remote));
        let mut collector = Collector::new(&mut resolver);

        let set = collector.collect(vec!["4.4.4.4".to_string(), "9.9.9.9".to_string()]);

        assert_eq!(set.len(), 1);
        assert_eq!(collector.diagnostics().len(), 1);
        assert_eq!(collector.diagnostics()[0].reason, SkipReason::Unresolved);
        assert_eq!(collector.stats().misses, 1);
        assert_eq!(collector.stats().database_hits, 1);
    }

    #[test]
    fn test_order_follows_input() {
        let local = FixtureLookup::with(&[("8.8.8.8", 1.0, 1.0), ("1.1.1.1", 2.0, 2.0)]);
        let mut resolver = LocationResolver::new(&local, None);
        let mut collector = Collector::new(&mut resolver);

        let set = collector.collect(["1.1.1.1", "", "8.8.8.8", "1.1.1.1"]);
        let lats: Vec<f64> = set.iter().map(|c| c.lat()).collect();
        assert_eq!(lats, vec![2.0, 1.0, 2.0]);
        assert_eq!(collector.diagnostics().len(), 1);
    }

    #[test]
    fn test_nothing_resolves() {
        let local = FixtureLookup::with(&[]);
        let mut resolver = LocationResolver::new(&local, None);
        let mut collector = Collector::new(&mut resolver);

        let set = collector.collect(["127.0.0.1", "224.0.0.1", "5.6.7.8"]);
        assert!(set.is_empty());
        assert_eq!(collector.diagnostics().len(), 3);
    }
}
