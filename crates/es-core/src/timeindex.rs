//! Hourly time index covering one scenario year.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Hourly steps in a common year.
pub const HOURS_PER_YEAR: usize = 8760;
/// Hourly steps in a leap year.
pub const HOURS_PER_LEAP_YEAR: usize = 8784;
/// Steps used when a scenario runs in debug mode.
pub const DEBUG_TIME_STEPS: usize = 3;

/// A contiguous, hourly time index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeIndex {
    start: NaiveDateTime,
    steps: usize,
}

impl TimeIndex {
    /// Hourly index with `steps` entries starting at `start`.
    pub fn hourly(start: NaiveDateTime, steps: usize) -> Self {
        Self { start, steps }
    }

    /// Index for a scenario year, starting on 1 January 00:00.
    ///
    /// Debug mode always yields [`DEBUG_TIME_STEPS`] entries; otherwise the
    /// length follows the leap-year status of `year`.
    pub fn for_year(year: Option<i32>, debug: bool) -> CoreResult<Self> {
        let year = year.ok_or_else(|| CoreError::InvalidYear {
            year: "None".to_string(),
        })?;
        let invalid = || CoreError::InvalidYear {
            year: year.to_string(),
        };
        let date = NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(invalid)?;
        let start = date.and_hms_opt(0, 0, 0).ok_or_else(invalid)?;

        let steps = if debug {
            DEBUG_TIME_STEPS
        } else if date.leap_year() {
            HOURS_PER_LEAP_YEAR
        } else {
            HOURS_PER_YEAR
        };

        let index = Self::hourly(start, steps);
        if index.offset(steps - 1).is_none() {
            return Err(invalid());
        }
        Ok(index)
    }

    pub fn len(&self) -> usize {
        self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps == 0
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    /// `start + i` hours, `None` past the representable range.
    fn offset(&self, i: usize) -> Option<NaiveDateTime> {
        let hours = i64::try_from(i).ok()?;
        self.start.checked_add_signed(Duration::try_hours(hours)?)
    }

    /// Timestamp of step `i`.
    pub fn timestamp(&self, i: usize) -> CoreResult<NaiveDateTime> {
        let oob = || CoreError::IndexOob {
            what: "time index",
            index: i,
            len: self.steps,
        };
        if i >= self.steps {
            return Err(oob());
        }
        self.offset(i).ok_or_else(oob)
    }

    /// Iterate over all timestamps in order.
    ///
    /// Stops early if an index built with [`TimeIndex::hourly`] runs past
    /// the last representable date.
    pub fn iter(&self) -> impl Iterator<Item = NaiveDateTime> + '_ {
        (0..self.steps).map_while(move |i| self.offset(i))
    }
}
