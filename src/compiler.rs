//! Per-zone period compilation (spec.md §4.2), eager at resolver
//! construction time.

use alloc::vec::Vec;

use crate::calendar::{self, DateTime};
use crate::data::ZoneDatabase;
use crate::model::TimeMode;
use crate::relative_day;
use crate::rules::{last_rule_for_year, RuleCache};

/// A [`crate::model::Period`] with its resolved local `[from, until)`
/// interval. Built once per zone at resolver construction; the only
/// mutable part of a `CompiledPeriod` is its lazy per-year rule cache,
/// owned by [`crate::rules::RuleCache`] and stored alongside this struct
/// by the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompiledPeriod {
    /// Index of the underlying [`crate::model::Period`] in the database.
    pub period: u32,
    pub from: DateTime,
    pub until: DateTime,
}

/// Compiles every period of `zone` (identified by its index in `db`) into
/// an ordered list of [`CompiledPeriod`]s satisfying spec.md §8's coverage
/// and contiguity invariants.
pub fn compile_periods(db: &ZoneDatabase, zone_index: u32) -> Vec<CompiledPeriod> {
    let zone = db.zone(zone_index);
    let mut prev_until = DateTime::MIN;
    let mut compiled = Vec::with_capacity(zone.periods.len());

    let last_index = zone.periods.len() - 1;
    for (i, &period_index) in zone.periods.iter().enumerate() {
        let period = db.period(period_index);

        let until = if i == last_index {
            // The final period's `until` is the domain maximum, regardless
            // of the sentinel `until_year` it was declared with.
            DateTime::MAX
        } else {
            let mut until_local =
                relative_day::resolve(i32::from(period.until_year), period.until_month, period.until_day, period.until_time);

            if period.until_day.is_some() {
                if let Some(rule_family) = period.rule_family {
                    let family = db.rule_family(rule_family);
                    if let Some(active) =
                        last_rule_for_year(db, family, i32::from(period.until_year))
                    {
                        let active_rule = db.rule(active.rule);
                        until_local = match period.until_time_mode {
                            TimeMode::Local => until_local,
                            TimeMode::Standard => {
                                calendar::add_seconds(until_local, active_rule.offset)
                            }
                            TimeMode::Universal => calendar::add_seconds(
                                until_local,
                                period.offset + active_rule.offset,
                            ),
                        };
                    }
                }
            }
            until_local
        };

        compiled.push(CompiledPeriod {
            period: period_index,
            from: prev_until,
            until,
        });
        prev_until = until;
    }

    compiled.sort_by(|a, b| calendar::compare(a.until, b.until));
    compiled
}

/// A [`CompiledPeriod`] paired with its lazy per-year rule cache. This is
/// the unit the resolver façade actually stores: the compiled interval is
/// immutable, but the cache is mutated (under its own lock) as queries are
/// served.
#[derive(Debug)]
pub struct PeriodEntry {
    pub compiled: CompiledPeriod,
    pub cache: RuleCache,
}

/// Convenience wrapper around [`compile_periods`] that attaches a fresh,
/// empty [`RuleCache`] to each compiled period.
pub fn compile_periods_with_cache(db: &ZoneDatabase, zone_index: u32) -> Vec<PeriodEntry> {
    compile_periods(db, zone_index)
        .into_iter()
        .map(|compiled| PeriodEntry {
            compiled,
            cache: RuleCache::default(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_eternal_period_covers_whole_domain() {
        let db = ZoneDatabase::bundled();
        let zone = db.find_zone("Europe/Bucharest").unwrap();
        let compiled = compile_periods(&db, zone);
        assert_eq!(compiled.len(), 1);
        assert_eq!(compiled[0].from, DateTime::MIN);
        assert_eq!(compiled[0].until, DateTime::MAX);
    }

    #[test]
    fn contiguity_holds_across_multiple_periods() {
        // Synthesize a two-period zone to exercise the general case, since
        // the bundled database's zones are all single-period.
        use crate::model::{Period, Zone};
        let mut db = ZoneDatabase::bundled();
        let first = Period {
            offset: 3600,
            rule_family: None,
            fmt: "X".into(),
            until_year: 2000,
            until_month: 1,
            until_day: None,
            until_time: 0,
            until_time_mode: TimeMode::Local,
        };
        let second = Period {
            offset: 7200,
            rule_family: None,
            fmt: "Y".into(),
            until_year: crate::data::FOREVER,
            until_month: 1,
            until_day: None,
            until_time: 0,
            until_time_mode: TimeMode::Local,
        };
        let first_idx = db.periods.len() as u32;
        db.periods.push(first);
        let second_idx = db.periods.len() as u32;
        db.periods.push(second);
        let zone_idx = db.zones.len() as u32;
        db.zones.push(Zone {
            name: "Test/Synthetic".into(),
            periods: alloc::vec![first_idx, second_idx],
        });

        let compiled = compile_periods(&db, zone_idx);
        assert_eq!(compiled.len(), 2);
        assert_eq!(compiled[0].from, DateTime::MIN);
        assert_eq!(compiled[0].until, compiled[1].from);
        assert_eq!(compiled[1].until, DateTime::MAX);
    }

    /// Builds a two-period zone whose first period has a `until_day: Some`
    /// boundary governed by `family`, so `compile_periods` has to resolve
    /// the until-time adjustment against the active rule for `until_year`.
    fn synthetic_zone_with_ruled_boundary(
        rule_at_mode: TimeMode,
        rule_offset: i64,
        until_time_mode: TimeMode,
        period_offset: i64,
    ) -> (ZoneDatabase, u32) {
        use crate::model::{Period, RelativeDay, Rule, RuleFamily, YearBoundRule, Zone};

        let mut db = ZoneDatabase::bundled();
        let rule_idx = db.rules.len() as u32;
        db.rules.push(Rule {
            in_month: 6,
            on_day: RelativeDay::Fixed(1),
            at: 0,
            at_mode: rule_at_mode,
            offset: rule_offset,
            fmt_part: "D".into(),
        });
        let family_idx = db.rule_families.len() as u32;
        db.rule_families.push(RuleFamily {
            members: alloc::vec![YearBoundRule {
                start_year: 2000,
                end_year: crate::data::FOREVER,
                rule: rule_idx,
            }],
        });

        let first = Period {
            offset: period_offset,
            rule_family: Some(family_idx),
            fmt: "X".into(),
            until_year: 2005,
            until_month: 3,
            until_day: Some(RelativeDay::Fixed(10)),
            until_time: 7200,
            until_time_mode,
        };
        let second = Period {
            offset: period_offset,
            rule_family: None,
            fmt: "Y".into(),
            until_year: crate::data::FOREVER,
            until_month: 1,
            until_day: None,
            until_time: 0,
            until_time_mode: TimeMode::Local,
        };
        let first_idx = db.periods.len() as u32;
        db.periods.push(first);
        let second_idx = db.periods.len() as u32;
        db.periods.push(second);
        let zone_idx = db.zones.len() as u32;
        db.zones.push(Zone {
            name: "Test/RuledBoundary".into(),
            periods: alloc::vec![first_idx, second_idx],
        });

        (db, zone_idx)
    }

    #[test]
    fn standard_until_time_mode_adds_only_the_active_rules_offset() {
        // A `Standard`-mode `until_time` adds the active rule's own offset
        // to the local boundary time, not the period's base offset. Use a
        // period offset that differs from the rule offset so the two can't
        // be confused.
        let (db, zone_idx) =
            synthetic_zone_with_ruled_boundary(TimeMode::Local, 3600, TimeMode::Standard, 1800);

        let compiled = compile_periods(&db, zone_idx);
        let until_base = relative_day::resolve(
            2005,
            3,
            Some(crate::model::RelativeDay::Fixed(10)),
            7200,
        );
        let expected = calendar::add_seconds(until_base, 3600);
        assert_eq!(compiled[0].until, expected);
    }

    #[test]
    fn universal_until_time_mode_adds_period_and_rule_offsets() {
        // A `Universal`-mode `until_time` adds *both* the period's base
        // offset and the active rule's offset (spec.md §9's open question,
        // resolved literally: `period.offset + rule.offset`).
        let (db, zone_idx) =
            synthetic_zone_with_ruled_boundary(TimeMode::Local, 3600, TimeMode::Universal, 1800);

        let compiled = compile_periods(&db, zone_idx);
        let until_base = relative_day::resolve(
            2005,
            3,
            Some(crate::model::RelativeDay::Fixed(10)),
            7200,
        );
        let expected = calendar::add_seconds(until_base, 1800 + 3600);
        assert_eq!(compiled[0].until, expected);
    }
}
