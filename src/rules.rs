//! Per-period, per-year rule compilation (spec.md §4.3) and matching-rule
//! lookup (spec.md §4.4), including the lazy cache described in spec.md §5.

use core::cmp::Ordering;

use alloc::vec::Vec;
use hashbrown::HashMap;

use crate::calendar::{self, DateTime};
use crate::data::ZoneDatabase;
use crate::model::{Period, RuleFamily, TimeMode};
use crate::relative_day;

/// A compiled rule activation within a single year's list. `prev`/`next`
/// are indices into that same year's `Vec<CompiledRule>` — links never
/// cross year boundaries (spec.md §3 invariant).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompiledRule {
    /// Index of the underlying [`crate::model::Rule`] in the database.
    pub rule: u32,
    pub starts_on: DateTime,
    pub offset: i64,
    pub prev: Option<usize>,
    pub next: Option<usize>,
}

/// The result of [`last_rule_for_year`]: the rule active at the latest
/// moment within a given year, independent of any time-mode adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LastRuleMatch {
    pub rule: u32,
    pub starts_on: DateTime,
}

/// Scans `family` for the rule whose absolute activation instant in `year`
/// is maximal (spec.md §4.3). Used both to seed the following year's
/// carry-over and by the period compiler to resolve a `Standard`/
/// `Universal`-mode `until_time`.
pub fn last_rule_for_year(db: &ZoneDatabase, family: &RuleFamily, year: i32) -> Option<LastRuleMatch> {
    let mut best: Option<LastRuleMatch> = None;
    for ybr in &family.members {
        if !ybr.covers(year) {
            continue;
        }
        let rule = db.rule(ybr.rule);
        let starts_on = relative_day::resolve(year, rule.in_month, Some(rule.on_day), rule.at);
        let replace = match best {
            None => true,
            // Ties resolve to the later occurrence in the family: `members`
            // is declaration order, so `>=` lets a later member win.
            Some(ref b) => calendar::compare(starts_on, b.starts_on) != Ordering::Less,
        };
        if replace {
            best = Some(LastRuleMatch { rule: ybr.rule, starts_on });
        }
    }
    best
}

/// Builds the date-sorted, linked list of compiled rules active in `year`
/// for one period, including the seeded carry-over from `year - 1`
/// (spec.md §4.3).
pub fn compile_rules_for_year(
    db: &ZoneDatabase,
    period: &Period,
    family: &RuleFamily,
    year: i32,
) -> Vec<CompiledRule> {
    let mut list = Vec::new();

    if let Some(carry_over) = last_rule_for_year(db, family, year - 1) {
        list.push(CompiledRule {
            rule: carry_over.rule,
            starts_on: calendar::encode_date(year, 1, 1),
            offset: db.rule(carry_over.rule).offset,
            prev: None,
            next: None,
        });
    }

    for ybr in &family.members {
        if !ybr.covers(year) {
            continue;
        }
        let rule = db.rule(ybr.rule);
        let mut abs = relative_day::resolve(year, rule.in_month, Some(rule.on_day), rule.at);
        abs = match rule.at_mode {
            TimeMode::Local => abs,
            TimeMode::Standard => calendar::add_seconds(abs, rule.offset),
            TimeMode::Universal => calendar::add_seconds(abs, period.offset + rule.offset),
        };
        list.push(CompiledRule {
            rule: ybr.rule,
            starts_on: abs,
            offset: rule.offset,
            prev: None,
            next: None,
        });
    }

    list.sort_by(|a, b| calendar::compare(a.starts_on, b.starts_on));

    for i in 0..list.len() {
        list[i].prev = i.checked_sub(1);
        list[i].next = if i + 1 < list.len() { Some(i + 1) } else { None };
    }

    list
}

/// The lazy, per-year cache of compiled rules owned by one `CompiledPeriod`.
/// Populated under a lock held across the read-miss, compile, and insert
/// (spec.md §5); lazy compilation is idempotent, so a losing racer simply
/// discards its (identical) result.
#[derive(Debug, Default)]
pub struct RuleCache {
    #[cfg(feature = "std")]
    inner: std::sync::Mutex<HashMap<i32, Vec<CompiledRule>>>,
    #[cfg(not(feature = "std"))]
    inner: core::cell::RefCell<HashMap<i32, Vec<CompiledRule>>>,
}

impl RuleCache {
    /// Looks up the matching compiled rule for `dt`'s year, compiling and
    /// caching that year's rule list on first access, and returns the
    /// matching rule together with its immediate neighbours (copied out of
    /// the lock, since [`CompiledRule`] is small and `Copy`).
    pub fn find_matching_rule(
        &self,
        db: &ZoneDatabase,
        period: &Period,
        dt: DateTime,
    ) -> Option<(CompiledRule, Option<CompiledRule>, Option<CompiledRule>)> {
        let year = calendar::year_of(dt);
        let family_index = period.rule_family?;
        let family = db.rule_family(family_index);

        self.with_year(year, || compile_rules_for_year(db, period, family, year), |list| {
            let idx = rightmost_predecessor(list, dt)?;
            let matched = list[idx];
            let prev = matched.prev.map(|p| list[p]);
            let next = matched.next.map(|n| list[n]);
            Some((matched, prev, next))
        })
    }

    #[cfg(feature = "std")]
    fn with_year<R>(
        &self,
        year: i32,
        compute: impl FnOnce() -> Vec<CompiledRule>,
        read: impl FnOnce(&[CompiledRule]) -> R,
    ) -> R {
        let mut guard = self.inner.lock().expect("rule cache mutex poisoned");
        let list = guard.entry(year).or_insert_with(|| {
            log::trace!("compiling rules for year {year}");
            compute()
        });
        read(list)
    }

    #[cfg(not(feature = "std"))]
    fn with_year<R>(
        &self,
        year: i32,
        compute: impl FnOnce() -> Vec<CompiledRule>,
        read: impl FnOnce(&[CompiledRule]) -> R,
    ) -> R {
        let mut cache = self.inner.borrow_mut();
        let list = cache.entry(year).or_insert_with(compute);
        read(list)
    }
}

/// Returns the index of the last entry in `list` (sorted ascending by
/// `starts_on`) whose `starts_on <= dt`.
fn rightmost_predecessor(list: &[CompiledRule], dt: DateTime) -> Option<usize> {
    list.iter()
        .rposition(|r| calendar::compare(r.starts_on, dt) != Ordering::Greater)
}
