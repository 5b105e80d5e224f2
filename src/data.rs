//! The bundled static zone database.
//!
//! Per spec.md §1/§6, production of `CZones`/`CAliases` is a build-time
//! concern external to the resolver. This module stands in for that
//! build-time artifact: a small, hand-curated subset of real IANA zones,
//! chosen to exercise every invariant in spec.md §8 (a zone with an active
//! rule family producing both a gap and a fold transition in the same year,
//! a second zone reachable only through an alias, and a zone with no rule
//! family at all). A full generated database (regenerated periodically from
//! upstream tzdata, the way `zoneinfo_rs` itself parses `africa`/`europe`/
//! etc.) is future build tooling, not duplicated here.

use alloc::string::ToString;
use alloc::vec;

use crate::model::{Alias, Period, RelativeDay, Rule, RuleFamily, TimeMode, YearBoundRule, Zone};

/// A sentinel "effectively forever" year, used both for a rule family
/// member's open-ended `end_year` and for a zone's final period's
/// `until_year`. Real tzdata databases use a similarly large sentinel
/// rather than modeling true infinity (spec.md §3: "the final entry uses
/// a sentinel future year").
pub const FOREVER: u16 = 9999;

/// The compiled arenas backing [`crate::resolver::Resolver`]. Immutable
/// once constructed; addressed by `u32` index rather than pointer, per the
/// Design Notes' arena-with-stable-indices guidance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneDatabase {
    pub zones: alloc::vec::Vec<Zone>,
    pub periods: alloc::vec::Vec<Period>,
    pub rule_families: alloc::vec::Vec<RuleFamily>,
    pub rules: alloc::vec::Vec<Rule>,
    pub aliases: alloc::vec::Vec<Alias>,
}

impl ZoneDatabase {
    /// Case-insensitive lookup of a zone by canonical name. Returns the
    /// zone's index in `self.zones`.
    pub fn find_zone(&self, name: &str) -> Option<u32> {
        self.zones
            .iter()
            .position(|z| z.name.eq_ignore_ascii_case(name))
            .map(|i| i as u32)
    }

    /// Case-insensitive lookup of an alias by name. Returns the alias's
    /// target zone index.
    pub fn find_alias(&self, name: &str) -> Option<u32> {
        self.aliases
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .map(|a| a.target)
    }

    pub fn zone(&self, index: u32) -> &Zone {
        &self.zones[index as usize]
    }

    pub fn period(&self, index: u32) -> &Period {
        &self.periods[index as usize]
    }

    pub fn rule_family(&self, index: u32) -> &RuleFamily {
        &self.rule_families[index as usize]
    }

    pub fn rule(&self, index: u32) -> &Rule {
        &self.rules[index as usize]
    }

    /// The bundled zone/alias tables.
    pub fn bundled() -> Self {
        let mut rules = alloc::vec::Vec::new();
        let mut rule_families = alloc::vec::Vec::new();
        let mut periods = alloc::vec::Vec::new();
        let mut zones = alloc::vec::Vec::new();
        let mut aliases = alloc::vec::Vec::new();

        // ---- EU rule family: governs Europe/Bucharest (and, in the real
        // tzdata, every EU member state) from 1981 onward. ----
        let eu_spring_forward = push_rule(
            &mut rules,
            Rule {
                in_month: 3,
                on_day: RelativeDay::LastOfMonth { dow: 7 },
                at: 3600,
                at_mode: TimeMode::Universal,
                offset: 3600,
                fmt_part: "S".to_string(),
            },
        );
        let eu_fall_back = push_rule(
            &mut rules,
            Rule {
                in_month: 10,
                on_day: RelativeDay::LastOfMonth { dow: 7 },
                at: 3600,
                at_mode: TimeMode::Universal,
                offset: 0,
                fmt_part: alloc::string::String::new(),
            },
        );
        let eu_family = push_rule_family(
            &mut rule_families,
            RuleFamily {
                members: vec![
                    YearBoundRule {
                        start_year: 1981,
                        end_year: FOREVER,
                        rule: eu_spring_forward,
                    },
                    YearBoundRule {
                        start_year: 1996,
                        end_year: FOREVER,
                        rule: eu_fall_back,
                    },
                ],
            },
        );

        // ---- US rule family: governs America/Los_Angeles from 2007
        // onward (the real tzdata has earlier, different rules; omitted as
        // out of scope for this bundled subset). ----
        let us_spring_forward = push_rule(
            &mut rules,
            Rule {
                in_month: 3,
                on_day: RelativeDay::NthOfMonth {
                    dow: 7,
                    after_day: 8,
                },
                at: 7200,
                at_mode: TimeMode::Local,
                offset: 3600,
                fmt_part: "D".to_string(),
            },
        );
        let us_fall_back = push_rule(
            &mut rules,
            Rule {
                in_month: 11,
                on_day: RelativeDay::NthOfMonth {
                    dow: 7,
                    after_day: 1,
                },
                at: 7200,
                at_mode: TimeMode::Local,
                offset: 0,
                fmt_part: "S".to_string(),
            },
        );
        let us_family = push_rule_family(
            &mut rule_families,
            RuleFamily {
                members: vec![
                    YearBoundRule {
                        start_year: 2007,
                        end_year: FOREVER,
                        rule: us_spring_forward,
                    },
                    YearBoundRule {
                        start_year: 2007,
                        end_year: FOREVER,
                        rule: us_fall_back,
                    },
                ],
            },
        );

        // ---- Europe/Bucharest: a single eternal period governed by EU. ----
        let bucharest_period = push_period(
            &mut periods,
            Period {
                offset: 7200,
                rule_family: Some(eu_family),
                fmt: "EE%sT".to_string(),
                until_year: FOREVER,
                until_month: 1,
                until_day: None,
                until_time: 0,
                until_time_mode: TimeMode::Local,
            },
        );
        push_zone(
            &mut zones,
            Zone {
                name: "Europe/Bucharest".to_string(),
                periods: vec![bucharest_period],
            },
        );

        // ---- America/Los_Angeles: a single eternal period governed by US. ----
        let los_angeles_period = push_period(
            &mut periods,
            Period {
                offset: -28_800,
                rule_family: Some(us_family),
                fmt: "P%sT".to_string(),
                until_year: FOREVER,
                until_month: 1,
                until_day: None,
                until_time: 0,
                until_time_mode: TimeMode::Local,
            },
        );
        push_zone(
            &mut zones,
            Zone {
                name: "America/Los_Angeles".to_string(),
                periods: vec![los_angeles_period],
            },
        );

        // ---- Etc/UTC: no rule family, base offset zero. ----
        let utc_period = push_period(
            &mut periods,
            Period {
                offset: 0,
                rule_family: None,
                fmt: "UTC".to_string(),
                until_year: FOREVER,
                until_month: 1,
                until_day: None,
                until_time: 0,
                until_time_mode: TimeMode::Local,
            },
        );
        push_zone(
            &mut zones,
            Zone {
                name: "Etc/UTC".to_string(),
                periods: vec![utc_period],
            },
        );

        let los_angeles_index = zones
            .iter()
            .position(|z| z.name == "America/Los_Angeles")
            .expect("just inserted") as u32;
        aliases.push(Alias {
            name: "US/Pacific".to_string(),
            target: los_angeles_index,
        });

        ZoneDatabase {
            zones,
            periods,
            rule_families,
            rules,
            aliases,
        }
    }
}

fn push_rule(rules: &mut alloc::vec::Vec<Rule>, rule: Rule) -> u32 {
    rules.push(rule);
    (rules.len() - 1) as u32
}

fn push_rule_family(families: &mut alloc::vec::Vec<RuleFamily>, family: RuleFamily) -> u32 {
    families.push(family);
    (families.len() - 1) as u32
}

fn push_period(periods: &mut alloc::vec::Vec<Period>, period: Period) -> u32 {
    periods.push(period);
    (periods.len() - 1) as u32
}

fn push_zone(zones: &mut alloc::vec::Vec<Zone>, zone: Zone) -> u32 {
    zones.push(zone);
    (zones.len() - 1) as u32
}
