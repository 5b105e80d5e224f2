//! `tzresolver` resolves IANA time zone identifiers and local datetimes
//! against a compiled, static zone database.
//!
//! A [`Resolver`](crate::resolver::Resolver) is built once per zone from a
//! [`ZoneDatabase`](crate::data::ZoneDatabase) and answers repeated queries
//! against its own eagerly compiled period table and a lazily populated,
//! per-year rule cache. Given a local instant it reports the applicable UTC
//! offset, the standard/daylight save, a classification
//! ([`Classification`](crate::classify::Classification): `Standard`,
//! `Daylight`, `Ambiguous`, or `Invalid`), and a display abbreviation.
//!
//! This crate is `#![no_std]` with an allocator (`alloc`); the `std`
//! feature, enabled by default, additionally provides
//! [`cache::ResolverCache`] for sharing constructed resolvers across a
//! process.
#![no_std]
#![cfg_attr(not(test), forbid(clippy::unwrap_used))]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod calendar;
pub mod classify;
pub mod compiler;
pub mod data;
pub mod error;
pub mod model;
pub mod relative_day;
pub mod resolver;
pub mod rules;

#[cfg(feature = "std")]
pub mod cache;

#[doc(inline)]
pub use calendar::DateTime;
#[doc(inline)]
pub use classify::Classification;
#[doc(inline)]
pub use data::ZoneDatabase;
#[doc(inline)]
pub use error::ResolverError;
#[doc(inline)]
pub use resolver::Resolver;

#[cfg(feature = "std")]
#[doc(inline)]
pub use cache::ResolverCache;

/// The resolver's result type.
pub type ResolverResult<T> = Result<T, ResolverError>;
