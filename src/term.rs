//! Forward-looking academic-term detection.
//!
//! Default queries should target the term students are registering for, not
//! the term in session: registration windows open well before a term starts,
//! so October questions are about next Spring, April questions about Fall.

use chrono::{Datelike, Local, NaiveDate};

use crate::types::{Day, Season, Term};

/// The term students are most likely registering for on the given date.
///
/// Nov-Dec: next Spring. Jan-Mar: this Spring. Apr-Sep: this Fall.
/// Oct: next Spring.
pub fn term_for_date(date: NaiveDate) -> Term {
    let year = date.year();
    match date.month() {
        11 | 12 => Term::new(year + 1, Season::Spring),
        1..=3 => Term::new(year, Season::Spring),
        4..=9 => Term::new(year, Season::Fall),
        _ => Term::new(year + 1, Season::Spring), // October
    }
}

/// Registration-default term for today's date.
pub fn current_term() -> Term {
    term_for_date(Local::now().date_naive())
}

/// Today's weekday as an SOC day code, for availability defaults.
pub fn current_day() -> Day {
    Day::from_weekday(Local::now().weekday())
}

/// Minutes since midnight, local time, for "from now" availability windows.
pub fn current_minutes() -> u16 {
    use chrono::Timelike;
    let now = Local::now();
    (now.hour() * 60 + now.minute()) as u16
}
