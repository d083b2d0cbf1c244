//! Open-now evaluation against posted weekly hours.
//!
//! A day entry is either `closed` (any case) or a `HH:MM-HH:MM` window. A
//! window whose end is not after its start wraps past midnight, so
//! `22:00-06:00` covers late evening and early morning, and a window with
//! equal ends covers the whole day.

use crate::domain::model::WeeklyHours;
use crate::domain::ports::Clock;
use chrono::{Datelike, Local, NaiveDateTime, Timelike};
use thiserror::Error;

pub const MINUTES_PER_DAY: u16 = 24 * 60;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HoursError {
    #[error("malformed time window '{0}', expected HH:MM-HH:MM")]
    Malformed(String),
    #[error("time '{0}' is outside 00:00-23:59")]
    OutOfRange(String),
}

/// A daily opening window in minutes since midnight, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: u16,
    pub end: u16,
}

impl TimeWindow {
    pub fn parse(spec: &str) -> Result<Self, HoursError> {
        let (start, end) = spec
            .split_once('-')
            .ok_or_else(|| HoursError::Malformed(spec.to_string()))?;
        if end.contains('-') {
            return Err(HoursError::Malformed(spec.to_string()));
        }
        Ok(Self {
            start: parse_minute_of_day(start)?,
            end: parse_minute_of_day(end)?,
        })
    }

    pub fn wraps_midnight(&self) -> bool {
        self.end <= self.start
    }

    pub fn contains(&self, minute: u16) -> bool {
        if self.wraps_midnight() {
            minute >= self.start || minute <= self.end
        } else {
            self.start <= minute && minute <= self.end
        }
    }
}

/// `HH:MM` to minutes since midnight. Single-digit hours (`9:30`) are accepted.
pub fn parse_minute_of_day(hm: &str) -> Result<u16, HoursError> {
    let hm = hm.trim();
    let (h, m) = hm
        .split_once(':')
        .ok_or_else(|| HoursError::Malformed(hm.to_string()))?;
    let digits = |s: &str| !s.is_empty() && s.len() <= 2 && s.bytes().all(|b| b.is_ascii_digit());
    if !digits(h) || m.len() != 2 || !digits(m) {
        return Err(HoursError::Malformed(hm.to_string()));
    }
    let hours: u16 = h.parse().map_err(|_| HoursError::Malformed(hm.to_string()))?;
    let minutes: u16 = m.parse().map_err(|_| HoursError::Malformed(hm.to_string()))?;
    if hours > 23 || minutes > 59 {
        return Err(HoursError::OutOfRange(hm.to_string()));
    }
    Ok(hours * 60 + minutes)
}

pub fn minute_of_day(now: &NaiveDateTime) -> u16 {
    (now.hour() * 60 + now.minute()) as u16
}

/// Whether `hours` covers `now`. Absent hours, a missing entry for today, a
/// `closed` entry and an unparseable window all count as closed.
pub fn is_open_now(hours: Option<&WeeklyHours>, now: &NaiveDateTime) -> bool {
    let Some(hours) = hours else {
        return false;
    };
    let Some(spec) = hours.get(now.weekday()) else {
        return false;
    };
    if spec.trim().eq_ignore_ascii_case("closed") {
        return false;
    }
    match TimeWindow::parse(spec) {
        Ok(window) => window.contains(minute_of_day(now)),
        Err(e) => {
            tracing::debug!("treating day as closed: {}", e);
            false
        }
    }
}

/// Today's posted entry as written, or an em dash when there is none.
pub fn hours_today<'a>(hours: Option<&'a WeeklyHours>, now: &NaiveDateTime) -> &'a str {
    hours.and_then(|h| h.get(now.weekday())).unwrap_or("—")
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
