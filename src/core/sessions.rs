use chrono::{DateTime, SecondsFormat, Timelike, Utc};
use chrono_tz::Tz;
use chrono_tz::US::Eastern;

use crate::config::{Config, SessionTime};

pub const UNDETERMINED: &str = "UNDETERMINED";

#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub ny_time: DateTime<Tz>,
    pub session: String,
    pub killzone: bool,
}

/// Maps wall-clock instants onto the New York session windows the analysis
/// protocol is written against.
pub struct SessionClock {
    sessions: Vec<SessionTime>,
}

impl SessionClock {
    pub fn new(cfg: &Config) -> Self {
        Self {
            sessions: cfg.sessions.clone(),
        }
    }

    pub fn resolve(&self, utc_now: Option<DateTime<Utc>>) -> SessionSnapshot {
        let utc_now = utc_now.unwrap_or_else(Utc::now);
        let ny_time = utc_now.with_timezone(&Eastern);
        let current_time = ny_time.hour() * 60 + ny_time.minute();

        for window in &self.sessions {
            let start_min = window.start.0 * 60 + window.start.1;
            let end_min = window.end.0 * 60 + window.end.1;

            let in_session = if start_min < end_min {
                current_time >= start_min && current_time < end_min
            } else {
                // Wraps midnight (Asia 20:00 - 00:00)
                current_time >= start_min || current_time < end_min
            };

            if in_session {
                return SessionSnapshot {
                    ny_time,
                    session: window.name.clone(),
                    killzone: window.killzone,
                };
            }
        }

        SessionSnapshot {
            ny_time,
            session: UNDETERMINED.to_string(),
            killzone: false,
        }
    }

    /// Context paragraph sent with a chart so the model anchors on the last
    /// candle's session rather than today's clock.
    pub fn time_context(&self, utc_now: Option<DateTime<Utc>>) -> String {
        let utc_now = utc_now.unwrap_or_else(Utc::now);
        let snap = self.resolve(Some(utc_now));

        format!(
            "CONTEXT: Real-world UTC Time is {}. New York local time is {} ({}, killzone {}).\n\
             INSTRUCTION: Look at the LAST candle on the chart. Determine the SESSION of that specific candle based on NY Time.\n\
             Do not use the current real-world time if the chart is historical.\n\
             If time axis is not visible, infer from price action characteristics or state '{}'.",
            utc_now.to_rfc3339_opts(SecondsFormat::Millis, true),
            snap.ny_time.format("%H:%M"),
            snap.session,
            if snap.killzone { "ACTIVE" } else { "INACTIVE" },
            UNDETERMINED,
        )
    }
}
