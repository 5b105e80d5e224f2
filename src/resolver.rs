//! The resolver façade (spec.md §4.7): the public surface most callers use
//! instead of reaching for `data`/`compiler`/`rules`/`classify` directly.

use alloc::string::String;
use alloc::vec::Vec;

use crate::calendar::DateTime;
use crate::classify::{self, Classification};
use crate::compiler::{compile_periods_with_cache, PeriodEntry};
use crate::data::ZoneDatabase;
use crate::error::{self, ResolverError};

/// A single zone, resolved once and ready to answer repeated queries
/// against its own compiled period table and lazy rule cache.
#[derive(Debug)]
pub struct Resolver<'db> {
    db: &'db ZoneDatabase,
    zone_index: u32,
    periods: Vec<PeriodEntry>,
}

impl<'db> Resolver<'db> {
    /// Looks `id` up first as a zone, then as an alias (spec.md §4.7),
    /// case-insensitively, and eagerly compiles its period table.
    pub fn new(db: &'db ZoneDatabase, id: &str) -> Result<Self, ResolverError> {
        let zone_index = match db.find_zone(id) {
            Some(idx) => idx,
            None => {
                let idx = db.find_alias(id).ok_or_else(|| error::unknown_zone(id))?;
                log::trace!("resolved alias {id} to zone {}", db.zone(idx).name);
                idx
            }
        };
        let periods = compile_periods_with_cache(db, zone_index);
        Ok(Self {
            db,
            zone_index,
            periods,
        })
    }

    /// The canonical zone name this resolver was constructed for, which may
    /// differ from the identifier `new` was called with if that identifier
    /// was an alias.
    pub fn id(&self) -> &str {
        &self.db.zone(self.zone_index).name
    }

    /// Classifies a local instant and returns its UTC offset, DST save, and
    /// classification (spec.md §4.6).
    pub fn offsets_and_type(
        &self,
        dt: DateTime,
    ) -> Result<(i64, i64, Classification), ResolverError> {
        let resolution = self.resolve(dt)?;
        Ok((resolution.offset, resolution.dst_save, resolution.kind))
    }

    /// The zone's display abbreviation at `dt`. When the instant is
    /// `Ambiguous` and `force_daylight` is set, returns the daylight-side
    /// abbreviation instead of the default (standard-side) one.
    pub fn display_name(&self, dt: DateTime, force_daylight: bool) -> Result<String, ResolverError> {
        let resolution = self.resolve(dt)?;
        if force_daylight && resolution.kind == Classification::Ambiguous {
            Ok(resolution.dst_display)
        } else {
            Ok(resolution.display)
        }
    }

    /// Lists every zone name known to the backing database, optionally
    /// including alias names alongside their canonical targets.
    pub fn known_zones(db: &'db ZoneDatabase, include_aliases: bool) -> Vec<&'db str> {
        let mut names: Vec<&str> = db.zones.iter().map(|z| z.name.as_str()).collect();
        if include_aliases {
            names.extend(db.aliases.iter().map(|a| a.name.as_str()));
        }
        names
    }

    fn resolve(&self, dt: DateTime) -> Result<classify::Resolution, ResolverError> {
        let idx = classify::find_period(&self.periods, dt)
            .ok_or_else(|| error::out_of_range(dt, self.id()))?;
        Ok(classify::classify(self.db, &self.periods, idx, dt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar;

    #[test]
    fn unknown_zone_fails() {
        let db = ZoneDatabase::bundled();
        let err = Resolver::new(&db, "Mars/Olympus").unwrap_err();
        assert!(matches!(err, ResolverError::UnknownZone { .. }));
    }

    #[test]
    fn alias_resolves_to_canonical_id() {
        let db = ZoneDatabase::bundled();
        let resolver = Resolver::new(&db, "US/Pacific").unwrap();
        assert_eq!(resolver.id(), "America/Los_Angeles");
    }

    #[test]
    fn display_name_prefers_daylight_on_force_during_fold() {
        let db = ZoneDatabase::bundled();
        let resolver = Resolver::new(&db, "Europe/Bucharest").unwrap();
        let dt = calendar::add_seconds(calendar::encode_date(2013, 10, 27), 3 * 3600 + 30 * 60);
        let (_, _, kind) = resolver.offsets_and_type(dt).unwrap();
        assert_eq!(kind, Classification::Ambiguous);
        assert_eq!(resolver.display_name(dt, false).unwrap(), "EET");
        assert_eq!(resolver.display_name(dt, true).unwrap(), "EEST");
    }

    #[test]
    fn out_of_range_is_reported_with_zone_id() {
        // The bundled database's periods always cover the whole domain (the
        // last period's `until` is forced to the domain maximum), so this
        // exercises the error path directly against a resolver whose period
        // table was left empty, bypassing `new`'s normal compilation.
        let db = ZoneDatabase::bundled();
        let zone_index = db.find_zone("Europe/Bucharest").unwrap();
        let empty = Resolver {
            db: &db,
            zone_index,
            periods: Vec::new(),
        };
        let dt = calendar::encode_date(2013, 6, 15);
        let err = empty.offsets_and_type(dt).unwrap_err();
        assert!(matches!(err, ResolverError::OutOfRange { .. }));
    }

    #[test]
    fn known_zones_includes_aliases_when_requested() {
        let db = ZoneDatabase::bundled();
        let without = Resolver::known_zones(&db, false);
        let with = Resolver::known_zones(&db, true);
        assert!(with.len() > without.len());
        assert!(with.contains(&"US/Pacific"));
        assert!(!without.contains(&"US/Pacific"));
    }
}
