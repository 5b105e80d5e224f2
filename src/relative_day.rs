//! The relative-day resolver: turns a `(year, month, RelativeDay,
//! seconds-of-day)` tuple into an absolute local [`DateTime`]. Pure function,
//! no zone or rule context — spec.md §4.1.

use crate::calendar::{self, DateTime};
use crate::model::RelativeDay;

/// Resolves a relative day within `year`/`month` to a local instant.
///
/// When `rel_day` is `None`, the first of the month is used (this is the
/// convention a bare `until_year`/`until_month` period boundary with no
/// `until_day` relies on).
pub fn resolve(year: i32, month: u8, rel_day: Option<RelativeDay>, time_of_day: i64) -> DateTime {
    let day = match rel_day {
        None => 1,
        Some(RelativeDay::Fixed(d)) => i32::from(d),
        Some(RelativeDay::LastOfMonth { dow }) => last_of_month(year, month, dow),
        Some(RelativeDay::NthOfMonth { dow, after_day }) => nth_of_month(year, month, dow, after_day),
    };
    calendar::add_seconds(calendar::encode_date(year, month, day), time_of_day)
}

fn last_of_month(year: i32, month: u8, dow: u8) -> i32 {
    let last_day = i32::from(calendar::days_in_month(year, month));
    let mut day = last_day;
    loop {
        let dt = calendar::encode_date(year, month, day);
        if calendar::day_of_week(dt) == dow {
            return day;
        }
        day -= 1;
    }
}

fn nth_of_month(year: i32, month: u8, dow: u8, after_day: u8) -> i32 {
    let mut day = 1;
    while calendar::day_of_week(calendar::encode_date(year, month, day)) != dow {
        day += 1;
    }
    let days_in_month = i32::from(calendar::days_in_month(year, month));
    while day < i32::from(after_day) {
        let next = day + 7;
        if next > days_in_month {
            break;
        }
        day = next;
    }
    day
}
