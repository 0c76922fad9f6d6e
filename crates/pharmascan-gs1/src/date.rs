//! `YYMMDD` expiry date conversion for AI `17`.

use chrono::NaiveDate;
use pharmascan_core::constants::{
    CENTURY_CURRENT, CENTURY_PREVIOUS, EXPIRY_DATE_LENGTH, YEAR_PIVOT,
};

/// Expand a two-digit year using the [`YEAR_PIVOT`] rule.
///
/// ```
/// use pharmascan_gs1::date::expand_year;
///
/// assert_eq!(expand_year(0), 2000);
/// assert_eq!(expand_year(50), 2050);
/// assert_eq!(expand_year(51), 1951);
/// assert_eq!(expand_year(99), 1999);
/// ```
pub fn expand_year(yy: i32) -> i32 {
    if yy <= YEAR_PIVOT {
        CENTURY_CURRENT + yy
    } else {
        CENTURY_PREVIOUS + yy
    }
}

/// Convert a 6-digit `YYMMDD` payload into a calendar date.
///
/// A day of `00` stands for the last day of the month. Returns `None` when
/// the payload is not 6 ASCII digits or names an impossible date.
///
/// ```
/// use chrono::NaiveDate;
/// use pharmascan_gs1::date::expiry_from_yymmdd;
///
/// assert_eq!(expiry_from_yymmdd("251231"), NaiveDate::from_ymd_opt(2025, 12, 31));
/// assert_eq!(expiry_from_yymmdd("240200"), NaiveDate::from_ymd_opt(2024, 2, 29));
/// assert_eq!(expiry_from_yymmdd("251331"), None);
/// ```
pub fn expiry_from_yymmdd(payload: &str) -> Option<NaiveDate> {
    if payload.len() != EXPIRY_DATE_LENGTH || !payload.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let yy: i32 = payload[0..2].parse().ok()?;
    let mm: u32 = payload[2..4].parse().ok()?;
    let dd: u32 = payload[4..6].parse().ok()?;
    let year = expand_year(yy);

    if dd == 0 {
        return last_day_of_month(year, mm);
    }
    NaiveDate::from_ymd_opt(year, mm, dd)
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    // Rejects month 0 and months above 12.
    NaiveDate::from_ymd_opt(year, month, 1)?;
    first_of_next?.pred_opt()
}
