// ── Cron expressions ──
//
// Thin wrapper over croner's parsed pattern. Standard 5-field crontab
// (minute hour day-of-month month day-of-week), evaluated in whatever
// timezone the caller passes in.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, TimeZone};
use croner::Cron;

/// A validated cron expression.
#[derive(Clone)]
pub struct CronSchedule {
    expr: String,
    cron: Arc<Cron>,
}

impl CronSchedule {
    /// Parse a crontab expression. The error is croner's message.
    pub fn parse(expr: &str) -> Result<Self, String> {
        let trimmed = expr.trim();
        if trimmed.is_empty() {
            return Err("cron expression is empty".into());
        }
        let cron = Cron::new(trimmed).parse().map_err(|e| e.to_string())?;
        Ok(Self {
            expr: trimmed.to_owned(),
            cron: Arc::new(cron),
        })
    }

    /// The first fire time strictly after `after`, in the same timezone.
    ///
    /// `None` if the pattern can never match again (e.g. `0 0 31 2 *`).
    pub fn next_after<Tz: TimeZone>(&self, after: &DateTime<Tz>) -> Option<DateTime<Tz>> {
        self.cron.find_next_occurrence(after, false).ok()
    }

    pub fn expression(&self) -> &str {
        &self.expr
    }
}

impl fmt::Debug for CronSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CronSchedule").field(&self.expr).finish()
    }
}

impl fmt::Display for CronSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expr)
    }
}

impl PartialEq for CronSchedule {
    fn eq(&self, other: &Self) -> bool {
        self.expr == other.expr
    }
}

impl Eq for CronSchedule {}
