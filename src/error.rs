//! Typed failures of the routing core.
//!
//! Feed fetching, configuration and the CLI report through `anyhow`; the
//! core keeps its own error type so callers can tell a name that did not
//! resolve apart from a station the graph has never seen.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// An input record could not be used. Skipped during ingestion, never fatal.
    #[error("malformed {kind} record: {reason}")]
    MalformedRecord { kind: &'static str, reason: String },

    /// No station name contains the query.
    #[error("station not recognised: '{0}'")]
    NotFound(String),

    /// A query referenced a node that is not part of the graph.
    #[error("unknown station id: '{0}'")]
    UnknownStation(String),
}

impl RouteError {
    pub(crate) fn malformed(kind: &'static str, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            kind,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_and_unknown_are_distinct() {
        let a = RouteError::NotFound("victoria".into());
        let b = RouteError::UnknownStation("victoria".into());
        assert_ne!(a, b);
        assert_eq!(a.to_string(), "station not recognised: 'victoria'");
    }

    #[test]
    fn test_malformed_message() {
        let err = RouteError::malformed("station", "missing lat");
        assert_eq!(err.to_string(), "malformed station record: missing lat");
    }
}
