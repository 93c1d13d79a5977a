use chrono::{DateTime, Utc};
use tracing::warn;

pub const MS_PER_DAY: i64 = 86_400_000;
pub const MS_PER_HOUR: i64 = 3_600_000;
pub const MS_PER_MINUTE: i64 = 60_000;

/// Last-hour and last-five-minutes styling thresholds, in milliseconds.
pub const WARNING_THRESHOLD_MS: i64 = 3_600_000;
pub const CRITICAL_THRESHOLD_MS: i64 = 300_000;

/// Display severity of a countdown. Variant order is severity order: a
/// countdown only ever moves rightwards through it within one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Normal,
    Warning,
    Critical,
    Ended,
}

impl Severity {
    fn for_remaining_ms(ms: i64) -> Self {
        if ms <= 0 {
            Severity::Ended
        } else if ms <= CRITICAL_THRESHOLD_MS {
            // Critical supersedes Warning; a countdown is never both.
            Severity::Critical
        } else if ms <= WARNING_THRESHOLD_MS {
            Severity::Warning
        } else {
            Severity::Normal
        }
    }
}

/// Whole-unit decomposition of a positive remaining duration. Calendar-agnostic:
/// days are fixed 24-hour blocks, there are no month or year units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeParts {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

pub fn split_remaining_ms(ms: i64) -> TimeParts {
    TimeParts {
        days: ms / MS_PER_DAY,
        hours: (ms % MS_PER_DAY) / MS_PER_HOUR,
        minutes: (ms % MS_PER_HOUR) / MS_PER_MINUTE,
        seconds: (ms % MS_PER_MINUTE) / 1_000,
    }
}

/// Largest-two-plus-units text, `urgent` when only seconds are left.
fn format_parts(p: TimeParts) -> (String, bool) {
    if p.days > 0 {
        (format!("{}d {}h {}m", p.days, p.hours, p.minutes), false)
    } else if p.hours > 0 {
        (format!("{}h {}m {}s", p.hours, p.minutes, p.seconds), false)
    } else if p.minutes > 0 {
        (format!("{}m {}s", p.minutes, p.seconds), false)
    } else {
        (format!("{}s", p.seconds), true)
    }
}

/// What one tick of a countdown renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountdownDisplay {
    pub text: String,
    pub severity: Severity,
    pub urgent: bool,
}

/// A single countdown widget: a fixed end timestamp plus the latched severity.
#[derive(Debug, Clone)]
pub struct Countdown {
    label: String,
    end_time: DateTime<Utc>,
    severity: Severity,
}

impl Countdown {
    pub fn new(label: impl Into<String>, end_time: DateTime<Utc>) -> Self {
        Self {
            label: label.into(),
            end_time,
            severity: Severity::Normal,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn end_time(&self) -> DateTime<Utc> {
        self.end_time
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Recompute remaining time and re-render. Severity only ratchets upward,
    /// so a tick can never walk Ended (or Critical) back to something milder.
    pub fn tick(&mut self, now: DateTime<Utc>) -> CountdownDisplay {
        let remaining_ms = (self.end_time - now).num_milliseconds();
        self.severity = self.severity.max(Severity::for_remaining_ms(remaining_ms));

        if self.severity == Severity::Ended {
            return CountdownDisplay {
                text: "Ended".to_string(),
                severity: Severity::Ended,
                urgent: false,
            };
        }

        let (text, seconds_only) = format_parts(split_remaining_ms(remaining_ms));
        CountdownDisplay {
            text,
            severity: self.severity,
            urgent: seconds_only || self.severity == Severity::Critical,
        }
    }
}

/// All countdown widgets discovered on the page, ticked together once a second.
#[derive(Debug, Clone, Default)]
pub struct CountdownSet {
    items: Vec<Countdown>,
}

impl CountdownSet {
    /// Build the set from (label, raw end timestamp) pairs. A blank timestamp
    /// is skipped silently, matching a widget with no end attribute; a
    /// non-blank unparseable one is rejected here with a warning rather than
    /// letting a bogus duration into the tick path.
    pub fn from_deadlines(deadlines: &[(String, String)]) -> Self {
        let mut items = Vec::with_capacity(deadlines.len());
        for (label, raw) in deadlines {
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }
            match DateTime::parse_from_rfc3339(raw) {
                Ok(end) => items.push(Countdown::new(label.clone(), end.with_timezone(&Utc))),
                Err(e) => warn!(label = %label, raw = %raw, err = %e, "skipping unparseable deadline"),
            }
        }
        Self { items }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn tick_all(&mut self, now: DateTime<Utc>) -> Vec<(String, CountdownDisplay)> {
        self.items
            .iter_mut()
            .map(|c| (c.label.clone(), c.tick(now)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn at(ms_left: i64) -> (Countdown, DateTime<Utc>) {
        let now = Utc::now();
        (
            Countdown::new("lot", now + Duration::milliseconds(ms_left)),
            now,
        )
    }

    #[test]
    fn decomposition_is_floor_with_carry() {
        for &ms in &[
            1_i64,
            999,
            1_000,
            59_999,
            60_000,
            3_599_999,
            3_600_000,
            3_600_001,
            86_399_999,
            86_400_000,
            100_000_000,
            9 * 86_400_000 + 5 * 3_600_000 + 42 * 60_000 + 13_500,
        ] {
            let p = split_remaining_ms(ms);
            let floor =
                p.days * MS_PER_DAY + p.hours * MS_PER_HOUR + p.minutes * MS_PER_MINUTE + p.seconds * 1_000;
            assert!(floor <= ms && ms < floor + 1_000, "ms={ms} parts={p:?}");
            assert!(p.hours < 24 && p.minutes < 60 && p.seconds < 60);
        }
    }

    #[test]
    fn format_uses_largest_units() {
        let (text, urgent) = format_parts(split_remaining_ms(2 * MS_PER_DAY + 3 * MS_PER_HOUR + 4 * MS_PER_MINUTE + 5_000));
        assert_eq!(text, "2d 3h 4m");
        assert!(!urgent);

        let (text, _) = format_parts(split_remaining_ms(3 * MS_PER_HOUR + 4 * MS_PER_MINUTE + 5_000));
        assert_eq!(text, "3h 4m 5s");

        let (text, _) = format_parts(split_remaining_ms(4 * MS_PER_MINUTE + 5_000));
        assert_eq!(text, "4m 5s");

        let (text, urgent) = format_parts(split_remaining_ms(5_000));
        assert_eq!(text, "5s");
        assert!(urgent);
    }

    #[test]
    fn ninety_minutes_renders_hours_form() {
        let (mut c, now) = at(90 * MS_PER_MINUTE);
        let d = c.tick(now);
        assert_eq!(d.text, "1h 30m 0s");
        assert_eq!(d.severity, Severity::Normal);
    }

    #[test]
    fn warning_boundary_is_inclusive() {
        let (mut c, now) = at(3_600_001);
        assert_eq!(c.tick(now).severity, Severity::Normal);

        let (mut c, now) = at(3_600_000);
        assert_eq!(c.tick(now).severity, Severity::Warning);
    }

    #[test]
    fn critical_boundary_supersedes_warning() {
        let (mut c, now) = at(300_001);
        assert_eq!(c.tick(now).severity, Severity::Warning);

        let (mut c, now) = at(300_000);
        let d = c.tick(now);
        assert_eq!(d.severity, Severity::Critical);
        assert!(d.urgent);
    }

    #[test]
    fn ended_is_exact_and_latched() {
        let (mut c, now) = at(0);
        let d = c.tick(now);
        assert_eq!(d.text, "Ended");
        assert_eq!(d.severity, Severity::Ended);
        assert!(!d.urgent);

        // A later tick with a clock that somehow runs backwards stays Ended.
        let d = c.tick(now - Duration::hours(2));
        assert_eq!(d.text, "Ended");
        assert_eq!(d.severity, Severity::Ended);
    }

    #[test]
    fn severity_never_regresses() {
        let (mut c, now) = at(1_000);
        assert_eq!(c.tick(now).severity, Severity::Critical);
        // Same countdown observed with plenty of time left keeps Critical.
        assert_eq!(c.tick(now - Duration::hours(5)).severity, Severity::Critical);
    }

    #[test]
    fn seconds_only_is_urgent() {
        let (mut c, now) = at(42_000);
        let d = c.tick(now);
        assert_eq!(d.text, "42s");
        assert!(d.urgent);
    }

    #[test]
    fn from_deadlines_skips_blank_and_unparseable() {
        let deadlines = vec![
            ("good".to_string(), "2026-09-01T12:00:00Z".to_string()),
            ("blank".to_string(), "  ".to_string()),
            ("bad".to_string(), "next tuesday".to_string()),
        ];
        let set = CountdownSet::from_deadlines(&deadlines);
        assert_eq!(set.len(), 1);
    }
}
