use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};

/// Monthly refresh slot: `day` of every month at `hour`:00 UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshSchedule {
    day: u32,
    hour: u32,
}

impl RefreshSchedule {
    /// Days past the 28th are clamped so every month has the slot.
    pub fn new(day: u32, hour: u32) -> Self {
        Self {
            day: day.clamp(1, 28),
            hour: hour.min(23),
        }
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    /// First slot strictly after `now`.
    pub fn next_run_after(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let this_month = self.slot(now.year(), now.month());
        if let Some(slot) = this_month.filter(|slot| *slot > now) {
            return slot;
        }

        let (year, month) = if now.month() == 12 {
            (now.year() + 1, 1)
        } else {
            (now.year(), now.month() + 1)
        };
        self.slot(year, month)
            .unwrap_or_else(|| now + chrono::Duration::days(28))
    }

    pub fn until_next_run(&self, now: DateTime<Utc>) -> std::time::Duration {
        (self.next_run_after(now) - now)
            .to_std()
            .unwrap_or(std::time::Duration::ZERO)
    }

    fn slot(&self, year: i32, month: u32) -> Option<DateTime<Utc>> {
        let naive = NaiveDate::from_ymd_opt(year, month, self.day)?.and_hms_opt(self.hour, 0, 0)?;
        Utc.from_local_datetime(&naive).single()
    }
}

impl Default for RefreshSchedule {
    fn default() -> Self {
        Self::new(1, 9)
    }
}
