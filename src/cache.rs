//! A process-wide cache of constructed [`Resolver`]s, keyed by canonical
//! zone id (spec.md §6). `std`-only: a `no_std` caller owns its own
//! `Resolver`s directly and has no allocator-independent place to stash a
//! shared cache.

use alloc::string::{String, ToString};
use std::collections::HashMap;
use std::sync::Mutex;

use crate::data::ZoneDatabase;
use crate::error::ResolverError;
use crate::resolver::Resolver;

/// Caches one [`Resolver`] per canonical zone id. Looking a zone up by an
/// alias collapses to the same cached entry as looking it up by its
/// canonical name, so repeated construction under different spellings of
/// the same zone never duplicates work.
pub struct ResolverCache<'db> {
    db: &'db ZoneDatabase,
    entries: Mutex<HashMap<String, std::sync::Arc<Resolver<'db>>>>,
}

impl<'db> ResolverCache<'db> {
    pub fn new(db: &'db ZoneDatabase) -> Self {
        Self {
            db,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the cached resolver for `id`, constructing and inserting one
    /// on first request. `id` may be a canonical name or an alias; either
    /// way the entry is keyed (and deduplicated) by the canonical name the
    /// resolved zone reports via [`Resolver::id`].
    pub fn get(&self, id: &str) -> Result<std::sync::Arc<Resolver<'db>>, ResolverError> {
        let mut entries = self.entries.lock().expect("resolver cache mutex poisoned");

        if let Some(existing) = entries.get(id) {
            return Ok(existing.clone());
        }

        let resolver = Resolver::new(self.db, id)?;
        let canonical = resolver.id().to_string();

        if let Some(existing) = entries.get(&canonical) {
            log::trace!("collapsing {id} onto already-cached resolver for {canonical}");
            let existing = existing.clone();
            entries.insert(id.to_string(), existing.clone());
            return Ok(existing);
        }

        log::trace!("inserting new cached resolver for {canonical}");
        let resolver = std::sync::Arc::new(resolver);
        entries.insert(canonical, resolver.clone());
        if id != resolver.id() {
            entries.insert(id.to_string(), resolver.clone());
        }
        Ok(resolver)
    }

    /// Number of distinct spellings (canonical names and aliases) currently
    /// cached. Exposed for tests; not part of the stable surface.
    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.lock().expect("resolver cache mutex poisoned").len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_lookups_share_one_resolver() {
        let db = ZoneDatabase::bundled();
        let cache = ResolverCache::new(&db);
        let first = cache.get("Europe/Bucharest").unwrap();
        let second = cache.get("Europe/Bucharest").unwrap();
        assert!(std::sync::Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn alias_and_canonical_share_the_same_resolver() {
        let db = ZoneDatabase::bundled();
        let cache = ResolverCache::new(&db);
        let canonical = cache.get("America/Los_Angeles").unwrap();
        let via_alias = cache.get("US/Pacific").unwrap();
        assert!(std::sync::Arc::ptr_eq(&canonical, &via_alias));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn unknown_zone_does_not_populate_the_cache() {
        let db = ZoneDatabase::bundled();
        let cache = ResolverCache::new(&db);
        assert!(cache.get("Mars/Olympus").is_err());
        assert_eq!(cache.len(), 0);
    }
}
