// src/dates.rs
//! Date text normalization.
//!
//! Harvested pages print dates either as `YYYY-M-D` or as `M-D-YYYY`. The
//! first hyphen-delimited token decides the shape: four characters means
//! year-first, anything else means month-first. Nothing else is accepted.

use chrono::NaiveDate;
use once_cell::sync::OnceCell;
use regex::Regex;

/// Date given to catalog rows whose stored date is missing or unparseable.
/// Such rows are always expired.
pub const EPOCH_SENTINEL: NaiveDate = match NaiveDate::from_ymd_opt(1970, 1, 1) {
    Some(d) => d,
    None => panic!("epoch sentinel"),
};

fn re_year_first() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| {
        Regex::new(r"^([0-9]{4})-([0-9]{1,2})-([0-9]{1,2})$").expect("year-first regex")
    })
}

fn re_month_first() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| {
        Regex::new(r"^([0-9]{1,2})-([0-9]{1,2})-([0-9]{4})$").expect("month-first regex")
    })
}

/// Parse `text` into a calendar date, or `None` if it is not one of the two
/// accepted shapes or names a day that does not exist.
pub fn normalize(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    let first = text.split('-').next()?;

    // capture group indices of (year, month, day)
    let (re, (yi, mi, di)) = if first.len() == 4 {
        (re_year_first(), (1, 2, 3))
    } else {
        (re_month_first(), (3, 1, 2))
    };
    let caps = re.captures(text)?;
    let field = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());

    NaiveDate::from_ymd_opt(field(yi)? as i32, field(mi)?, field(di)?)
}

/// Canonical on-disk form (`YYYY-MM-DD`).
pub fn format_date(d: NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}
