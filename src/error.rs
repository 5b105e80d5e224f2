//! Resolver error types (spec.md §7).

use alloc::string::{String, ToString};
use core::fmt;

use crate::calendar::DateTime;

/// Errors the resolver façade can raise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolverError {
    /// Raised by [`crate::resolver::Resolver::new`] when the requested
    /// identifier matches neither a zone nor an alias.
    UnknownZone { requested: String },
    /// Raised by query operations when no compiled period covers the
    /// queried instant.
    OutOfRange { dt: DateTime, zone_id: String },
}

impl fmt::Display for ResolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownZone { requested } => {
                write!(f, "unknown time zone identifier: {requested}")
            }
            Self::OutOfRange { dt, zone_id } => {
                write!(
                    f,
                    "local instant {} is out of the covered range for zone {zone_id}",
                    dt.as_secs()
                )
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ResolverError {}

pub(crate) fn unknown_zone(requested: &str) -> ResolverError {
    ResolverError::UnknownZone {
        requested: requested.to_string(),
    }
}

pub(crate) fn out_of_range(dt: DateTime, zone_id: &str) -> ResolverError {
    ResolverError::OutOfRange {
        dt,
        zone_id: zone_id.to_string(),
    }
}
