//! Arabic long-date formatting in the Moroccan convention (`ar-MA`).

use chrono::{Datelike, Local, NaiveDate};

const MONTHS: [&str; 12] = [
    "يناير", "فبراير", "مارس", "أبريل", "ماي", "يونيو", "يوليوز", "غشت", "شتنبر", "أكتوبر",
    "نونبر", "دجنبر",
];

/// `{day} {month} {year}` with Western digits, e.g. `5 غشت 2025`.
pub fn format_long_date(date: NaiveDate) -> String {
    let month = MONTHS[date.month0() as usize];
    format!("{} {} {}", date.day(), month, date.year())
}

pub fn today() -> String {
    format_long_date(Local::now().date_naive())
}
