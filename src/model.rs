//! The static, immutable data model: `RelativeDay`, `Rule`, `YearBoundRule`,
//! `RuleFamily`, `Period`, `Zone`, `Alias`.
//!
//! Everything here is built once, at data-table construction time, and read
//! only thereafter. Following the Design Notes' guidance to replace raw
//! pointers into contiguous arrays with stable indices, zones/periods/rule
//! families/rules are addressed by `u32` index into the arenas in
//! [`crate::data`] rather than by reference, mirroring `zoneinfo_rs`'s own
//! arena-of-records style (`ZoneTable`/`RuleTable` keyed collections) while
//! avoiding the aliasing hazards of the Pascal source's pointer chasing.

use alloc::string::String;

/// A day within a month, expressed relative to either a fixed day number or
/// a weekday occurrence. See spec.md §3/§4.1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelativeDay {
    /// A specific day of the month, `1..=31`.
    Fixed(u8),
    /// The last occurrence of `dow` (`1..=7`, Monday = 1) in the month.
    LastOfMonth { dow: u8 },
    /// The smallest day `>= after_day` whose weekday is `dow`.
    NthOfMonth { dow: u8, after_day: u8 },
}

/// At what reference frame a rule's or period's trigger time is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeMode {
    Local,
    Standard,
    Universal,
}

/// A recurring instruction that shifts a zone's offset starting at a
/// specified moment each year within `YearBoundRule`'s validity range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub in_month: u8,
    pub on_day: RelativeDay,
    pub at: i64,
    pub at_mode: TimeMode,
    pub offset: i64,
    pub fmt_part: String,
}

/// A [`Rule`] bound to an inclusive year range during which it applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearBoundRule {
    pub start_year: u16,
    pub end_year: u16,
    /// Index into the rule arena.
    pub rule: u32,
}

impl YearBoundRule {
    pub fn covers(&self, year: i32) -> bool {
        i32::from(self.start_year) <= year && year <= i32::from(self.end_year)
    }
}

/// An ordered, non-empty sequence of [`YearBoundRule`]s sharing a name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleFamily {
    pub members: alloc::vec::Vec<YearBoundRule>,
}

/// A contiguous interval during which a zone's base UTC offset, format
/// string, and governing rule family are constant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Period {
    /// Base offset from UTC, in seconds.
    pub offset: i64,
    /// Index into the rule-family arena, if this period has a governing
    /// rule family.
    pub rule_family: Option<u32>,
    /// Abbreviation format, e.g. `"CE%sT"`; may contain `%s`.
    pub fmt: String,
    pub until_year: u16,
    pub until_month: u8,
    pub until_day: Option<RelativeDay>,
    pub until_time: i64,
    pub until_time_mode: TimeMode,
}

/// A named IANA zone: an ordered, non-empty sequence of [`Period`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Zone {
    pub name: String,
    /// Indices into the period arena, in declaration order.
    pub periods: alloc::vec::Vec<u32>,
}

/// An alternate name mapped to a canonical [`Zone`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alias {
    pub name: String,
    /// Index of the target zone in the zone table.
    pub target: u32,
}
