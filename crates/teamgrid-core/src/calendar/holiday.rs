//! Public holiday computation
//!
//! Fixed-date holidays plus the Easter-relative movable feasts. Holidays are
//! advisory: the timeline engine only warns about them, it never blocks a
//! confirmed operation.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// A public holiday on one calendar day
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holiday {
    pub date: NaiveDate,
    pub name: String,
}

/// Easter Sunday of the given year (Gregorian computus)
pub fn easter_sunday(year: i32) -> NaiveDate {
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    NaiveDate::from_ymd_opt(year, month as u32, day as u32).expect("computus out of range")
}

/// All public holidays of the given year, in date order
pub fn holidays_for_year(year: i32) -> Vec<Holiday> {
    let fixed = |month: u32, day: u32, name: &str| Holiday {
        date: NaiveDate::from_ymd_opt(year, month, day).expect("invalid fixed holiday"),
        name: name.to_string(),
    };
    let easter = easter_sunday(year);
    let movable = |offset_days: i64, name: &str| {
        let date = if offset_days >= 0 {
            easter.checked_add_days(Days::new(offset_days as u64))
        } else {
            easter.checked_sub_days(Days::new(offset_days.unsigned_abs()))
        };
        Holiday {
            date: date.expect("movable holiday out of range"),
            name: name.to_string(),
        }
    };

    let mut holidays = vec![
        fixed(1, 1, "New Year's Day"),
        movable(-2, "Good Friday"),
        movable(0, "Easter Sunday"),
        movable(1, "Easter Monday"),
        fixed(5, 1, "Labour Day"),
        movable(39, "Ascension Day"),
        movable(49, "Whit Sunday"),
        movable(50, "Whit Monday"),
        fixed(12, 25, "Christmas Day"),
        fixed(12, 26, "Boxing Day"),
    ];
    holidays.sort_by_key(|h| h.date);
    holidays
}

/// The public holiday on the given day, if any
pub fn holiday_on(date: NaiveDate) -> Option<Holiday> {
    use chrono::Datelike;
    holidays_for_year(date.year())
        .into_iter()
        .find(|h| h.date == date)
}
