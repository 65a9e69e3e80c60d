// Time-spec parsing and next-occurrence calculation
//
// Wraps the `cron` crate: 6/7-field expressions with seconds precision plus
// @hourly/@daily/@weekly-style shorthands. All evaluation is in UTC.

use crate::errors::ScheduleError;
use chrono::{DateTime, Utc};
use cron::Schedule as CronSchedule;
use std::str::FromStr;

/// A parsed recurring time spec
#[derive(Debug, Clone)]
pub struct Spec {
    expression: String,
    schedule: CronSchedule,
}

impl Spec {
    /// Parse a cron-style expression into a spec
    pub fn parse(expression: &str) -> Result<Self, ScheduleError> {
        let schedule = CronSchedule::from_str(expression).map_err(|e| {
            ScheduleError::InvalidCronExpression {
                expression: expression.to_string(),
                reason: e.to_string(),
            }
        })?;

        Ok(Self {
            expression: expression.to_string(),
            schedule,
        })
    }

    /// The soonest occurrence strictly after `after`, or `None` when the
    /// expression has no further occurrences
    pub fn next_after(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.schedule.after(&after).next()
    }

    /// The original expression text
    pub fn expression(&self) -> &str {
        &self.expression
    }
}
