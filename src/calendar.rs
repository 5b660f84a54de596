//! Calendar grid math and the booking slot picker.
//!
//! Months use the UI's 0-based index (0 = January … 11 = December) and
//! weekdays start at Sunday (0), matching the grid layout. The picker is
//! transient state: it exists while a booking is being composed and is
//! dropped after the confirmed selection is handed to the repository.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fixed slot labels offered for booking, in display rows.
///
/// A static enumeration, not derived from clinic availability — there is
/// no conflict detection between bookings.
pub const TIME_SLOTS: [[&str; 3]; 4] = [
    ["09:00 AM", "09:30 AM", "10:00 AM"],
    ["10:30 AM", "11:00 AM", "11:30 AM"],
    ["3:00 PM", "3:30 PM", "4:00 PM"],
    ["4:30 PM", "5:00 PM", "5:30 PM"],
];

/// Whether `label` is one of the offered slot labels.
pub fn is_known_slot(label: &str) -> bool {
    TIME_SLOTS.iter().flatten().any(|slot| *slot == label)
}

// ─── Month math ───────────────────────────────────────────────────────────────

fn first_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month + 1, 1)
}

/// Number of days in the month, leap years included.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    // The day before the first of the following month.
    let (next_year, next_month) = if month >= 11 { (year + 1, 0) } else { (year, month + 1) };
    first_of_month(next_year, next_month)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(0)
}

/// Weekday of day 1 (0 = Sunday … 6 = Saturday), used to left-pad the grid.
pub fn first_weekday_of_month(year: i32, month: u32) -> u32 {
    first_of_month(year, month)
        .map(|d| d.weekday().num_days_from_sunday())
        .unwrap_or(0)
}

/// Displayable month grid: leading empty cells, then day numbers.
pub fn month_grid(year: i32, month: u32) -> Vec<Option<u32>> {
    let pad = first_weekday_of_month(year, month) as usize;
    let mut cells: Vec<Option<u32>> = vec![None; pad];
    cells.extend((1..=days_in_month(year, month)).map(Some));
    cells
}

/// Long-form date label ("January 5, 2025") stamped onto a booking.
///
/// One-way formatting: the numeric parts are not retained on the booking.
pub fn format_appointment_date(year: i32, month: u32, day: u32) -> Option<String> {
    NaiveDate::from_ymd_opt(year, month + 1, day).map(|d| d.format("%B %-d, %Y").to_string())
}

// ─── Month navigation ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Prev,
    Next,
}

/// The displayed month. `month` is 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthCursor {
    pub year: i32,
    pub month: u32,
}

impl MonthCursor {
    pub fn new(year: i32, month: u32) -> Self {
        Self {
            year,
            month: month.min(11),
        }
    }

    /// One month forward or back, wrapping the year at the
    /// December/January boundary.
    pub fn advance(self, direction: Direction) -> Self {
        match direction {
            Direction::Next if self.month == 11 => Self {
                year: self.year + 1,
                month: 0,
            },
            Direction::Next => Self {
                year: self.year,
                month: self.month + 1,
            },
            Direction::Prev if self.month == 0 => Self {
                year: self.year - 1,
                month: 11,
            },
            Direction::Prev => Self {
                year: self.year,
                month: self.month - 1,
            },
        }
    }
}

// ─── Slot picker ──────────────────────────────────────────────────────────────

/// A confirmed day/time pair, ready to stamp onto a booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    /// "January 5, 2025"
    pub date: String,
    /// "09:00 AM"
    pub time: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("no day selected")]
    NoDaySelected,

    #[error("no time slot selected")]
    NoTimeSelected,

    #[error("day {day} is out of range for the displayed month")]
    DayOutOfRange { day: u32 },

    #[error("unknown time slot: {0}")]
    UnknownTimeSlot(String),
}

/// Transient selection state for the booking screen.
#[derive(Debug, Clone)]
pub struct SlotPicker {
    cursor: MonthCursor,
    selected_day: Option<u32>,
    selected_time: Option<String>,
}

impl SlotPicker {
    pub fn new(cursor: MonthCursor) -> Self {
        Self {
            cursor,
            selected_day: None,
            selected_time: None,
        }
    }

    pub fn cursor(&self) -> MonthCursor {
        self.cursor
    }

    pub fn selected_day(&self) -> Option<u32> {
        self.selected_day
    }

    pub fn selected_time(&self) -> Option<&str> {
        self.selected_time.as_deref()
    }

    /// Move the displayed month. Clears the picked day (it may not exist
    /// in the new month); the picked time slot survives.
    pub fn navigate(&mut self, direction: Direction) {
        self.cursor = self.cursor.advance(direction);
        self.selected_day = None;
    }

    pub fn select_day(&mut self, day: u32) -> Result<(), SelectionError> {
        if day == 0 || day > days_in_month(self.cursor.year, self.cursor.month) {
            return Err(SelectionError::DayOutOfRange { day });
        }
        self.selected_day = Some(day);
        Ok(())
    }

    pub fn select_time(&mut self, label: &str) -> Result<(), SelectionError> {
        if !is_known_slot(label) {
            return Err(SelectionError::UnknownTimeSlot(label.to_string()));
        }
        self.selected_time = Some(label.to_string());
        Ok(())
    }

    pub fn can_confirm(&self) -> bool {
        self.selected_day.is_some() && self.selected_time.is_some()
    }

    /// Produce the confirmed selection. Requires both a day and a time —
    /// a booking is never created with an empty date or time.
    pub fn confirm(&self) -> Result<Selection, SelectionError> {
        let day = self.selected_day.ok_or(SelectionError::NoDaySelected)?;
        let time = self
            .selected_time
            .clone()
            .ok_or(SelectionError::NoTimeSelected)?;
        let date = format_appointment_date(self.cursor.year, self.cursor.month, day)
            .ok_or(SelectionError::DayOutOfRange { day })?;
        Ok(Selection {
            year: self.cursor.year,
            month: self.cursor.month,
            day,
            date,
            time,
        })
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
