//! Locating the covering period (spec.md §4.5) and classifying a local
//! instant against it (spec.md §4.6).

use core::cmp::Ordering;

use alloc::string::String;

use crate::calendar::{self, DateTime};
use crate::compiler::PeriodEntry;
use crate::data::ZoneDatabase;
use crate::model::Period;

/// The classification of a local instant, per spec.md §1(c).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Standard,
    Daylight,
    Ambiguous,
    Invalid,
}

/// The full result of classifying a local instant against a zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub offset: i64,
    /// Meaningful only when `kind` is `Daylight`, `Ambiguous`, or `Invalid`
    /// (spec.md §3 invariant); `0` otherwise.
    pub dst_save: i64,
    pub kind: Classification,
    pub display: String,
    pub dst_display: String,
}

/// Scans `periods` from latest to earliest and returns the index of the
/// first whose `[from, until)` contains `dt`. Reverse scan is an
/// O(1)-amortised heuristic for workloads clustered near the present
/// (spec.md §4.5); a binary search on `until` would be an equivalent
/// replacement.
pub fn find_period(periods: &[PeriodEntry], dt: DateTime) -> Option<usize> {
    periods.iter().rposition(|entry| {
        calendar::compare(entry.compiled.from, dt) != Ordering::Greater
            && calendar::compare(dt, entry.compiled.until) == Ordering::Less
    })
}

/// Classifies `dt` against the period at `periods[period_idx]`.
pub fn classify(
    db: &ZoneDatabase,
    periods: &[PeriodEntry],
    period_idx: usize,
    dt: DateTime,
) -> Resolution {
    let entry = &periods[period_idx];
    let period = db.period(entry.compiled.period);
    let offset = period.offset;

    let matched = entry.cache.find_matching_rule(db, period, dt);

    let Some((r, prev, next)) = matched else {
        return Resolution {
            offset,
            dst_save: 0,
            kind: Classification::Standard,
            display: format_abbrev(db, period, None),
            dst_display: format_abbrev(db, period, None),
        };
    };

    // Invalid (gap): dt falls in the window skipped by a forward jump.
    if let Some(next) = next {
        if next.offset > r.offset {
            let gap_start = calendar::add_seconds(next.starts_on, r.offset - next.offset);
            if calendar::compare(dt, gap_start) != Ordering::Less {
                let display = format_abbrev(db, period, Some(r.rule));
                return Resolution {
                    offset,
                    dst_save: next.offset - r.offset,
                    kind: Classification::Invalid,
                    display: display.clone(),
                    dst_display: display,
                };
            }
        }
    }

    // Ambiguous (fold), case A: no predecessor in this year's list, but a
    // negative-offset carry-over means the fold straddles the year boundary.
    if prev.is_none() && r.offset < 0 {
        let fold_end = calendar::add_seconds(r.starts_on, -r.offset);
        if calendar::compare(dt, fold_end) == Ordering::Less {
            let display = format_abbrev(db, period, Some(r.rule));
            return Resolution {
                offset,
                dst_save: r.offset,
                kind: Classification::Ambiguous,
                display: display.clone(),
                dst_display: display,
            };
        }
    }

    // Ambiguous (fold), case B: the usual within-year backward jump.
    if let Some(prev) = prev {
        if prev.offset > r.offset {
            let fold_end = calendar::add_seconds(r.starts_on, prev.offset - r.offset);
            if calendar::compare(dt, fold_end) == Ordering::Less {
                return Resolution {
                    offset,
                    dst_save: prev.offset - r.offset,
                    kind: Classification::Ambiguous,
                    display: format_abbrev(db, period, Some(r.rule)),
                    dst_display: format_abbrev(db, period, Some(prev.rule)),
                };
            }
        }
    }

    if r.offset != 0 {
        let display = format_abbrev(db, period, Some(r.rule));
        Resolution {
            offset,
            dst_save: r.offset,
            kind: Classification::Daylight,
            display: display.clone(),
            dst_display: display,
        }
    } else {
        let display = format_abbrev(db, period, Some(r.rule));
        Resolution {
            offset,
            dst_save: 0,
            kind: Classification::Standard,
            display: display.clone(),
            dst_display: display,
        }
    }
}

/// Substitutes `rule`'s format fragment into `period.fmt` at `%s`. If
/// `period.fmt` has no `%s`, returns it verbatim; if `rule` is `None`,
/// substitutes the empty string.
fn format_abbrev(db: &ZoneDatabase, period: &Period, rule: Option<u32>) -> String {
    let letter = rule.map(|r| db.rule(r).fmt_part.as_str()).unwrap_or("");
    match period.fmt.find("%s") {
        Some(pos) => {
            let mut out = String::with_capacity(period.fmt.len() + letter.len());
            out.push_str(&period.fmt[..pos]);
            out.push_str(letter);
            out.push_str(&period.fmt[pos + 2..]);
            out
        }
        None => period.fmt.clone(),
    }
}
