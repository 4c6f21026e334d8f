//! Calendar events keyed by date, plus the dashboard's deadline view.

use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::ValidationError;
use crate::schedule::TaskCategory;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CalendarEvent {
    pub time: String,
    pub title: String,
    #[serde(rename = "type")]
    pub category: TaskCategory,
}

impl CalendarEvent {
    pub fn new(time: impl Into<String>, title: impl Into<String>, category: TaskCategory) -> Self {
        Self {
            time: time.into(),
            title: title.into(),
            category,
        }
    }
}

/// Dashboard row: weekday name and event title.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Deadline {
    pub date: NaiveDate,
    pub due: String,
    pub task: String,
}

/// Events grouped by calendar date; each day stays sorted by time.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventBook {
    days: BTreeMap<NaiveDate, Vec<CalendarEvent>>,
}

impl EventBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sample week: a school day today and a project due in two days.
    pub fn seeded(today: NaiveDate) -> Self {
        let mut book = Self::new();
        let sample = [
            (today, "9:00 AM", "Math Class", TaskCategory::School),
            (today, "3:30 PM", "Soccer Practice", TaskCategory::Fun),
            (today, "7:00 PM", "Finish History Reading", TaskCategory::School),
            (today + Duration::days(2), "10:00 AM", "Science Project Due", TaskCategory::School),
            (today + Duration::days(2), "4:00 PM", "Piano Lesson", TaskCategory::Fun),
        ];
        for (date, time, title, category) in sample {
            let added = book.add_event(date, CalendarEvent::new(time, title, category));
            debug_assert!(added.is_ok());
        }
        book
    }

    pub fn events_on(&self, date: NaiveDate) -> &[CalendarEvent] {
        self.days.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NaiveDate, &Vec<CalendarEvent>)> {
        self.days.iter()
    }

    /// Insert an event, keeping the day's list ordered by time of day.
    /// Events at the same time keep their insertion order.
    pub fn add_event(&mut self, date: NaiveDate, event: CalendarEvent) -> Result<usize, ValidationError> {
        if event.title.trim().is_empty() || event.time.trim().is_empty() {
            return Err(ValidationError::MissingEventFields);
        }
        let key = parse_time(&event.time).ok_or_else(|| ValidationError::InvalidTime(event.time.clone()))?;

        let day = self.days.entry(date).or_default();
        let pos = day
            .iter()
            .position(|e| parse_time(&e.time).is_some_and(|t| t > key))
            .unwrap_or(day.len());
        tracing::debug!(%date, title = %event.title, pos, "calendar event added");
        day.insert(pos, event);
        Ok(pos)
    }

    /// Remove the `index`th event of `date`. Out-of-range indexes are ignored.
    pub fn delete_event(&mut self, date: NaiveDate, index: usize) -> Option<CalendarEvent> {
        let day = self.days.get_mut(&date)?;
        if index >= day.len() {
            return None;
        }
        let removed = day.remove(index);
        if day.is_empty() {
            self.days.remove(&date);
        }
        Some(removed)
    }

    /// The next `limit` events dated `today` or later, earliest date first.
    pub fn upcoming_deadlines(&self, today: NaiveDate, limit: usize) -> Vec<Deadline> {
        self.days
            .range(today..)
            .flat_map(|(date, events)| {
                events.iter().map(move |e| Deadline {
                    date: *date,
                    due: weekday_name(date.weekday()).to_string(),
                    task: e.title.clone(),
                })
            })
            .take(limit)
            .collect()
    }
}

/// Parse "9:00 AM", "3:30 pm", "15:00" or "15:00:00".
pub fn parse_time(raw: &str) -> Option<NaiveTime> {
    let s = raw.trim();
    let upper = s.to_ascii_uppercase();
    if let Ok(t) = NaiveTime::parse_from_str(&upper, "%I:%M %p")
        .or_else(|_| NaiveTime::parse_from_str(&upper, "%I:%M%p"))
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
    {
        return Some(t);
    }
    // "3 PM": chrono wants minutes, so supply them.
    let (hour, meridiem) = upper.split_once(' ')?;
    if hour.contains(':') {
        return None;
    }
    NaiveTime::parse_from_str(&format!("{hour}:00 {}", meridiem.trim()), "%I:%M %p").ok()
}

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
