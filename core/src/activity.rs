//! Optional activity handle that fault mapping reports into.

use std::fmt;
use std::sync::Mutex;

use tracing::Span;

/// Tag key carrying the fault message.
pub const ERROR_DETAILS_TAG: &str = "error.details";

/// Status recorded on an activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityStatus {
    Unset,
    Ok,
    Error,
}

impl fmt::Display for ActivityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Unset => "unset",
            Self::Ok => "ok",
            Self::Error => "error",
        };
        f.write_str(label)
    }
}

/// A trace/activity span accepting a status and key/value tags.
///
/// Implementations must be cheap and infallible: fault mapping treats every
/// call as best-effort.
pub trait Activity: Send + Sync {
    fn set_status(&self, status: ActivityStatus);
    fn add_tag(&self, key: &str, value: &str);
}

/// Activity that drops everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopActivity;

impl Activity for NoopActivity {
    fn set_status(&self, _status: ActivityStatus) {}
    fn add_tag(&self, _key: &str, _value: &str) {}
}

/// Activity backed by a `tracing` span.
///
/// Status and tags are emitted as events inside the span, so any subscriber
/// that renders span context shows them next to the command name.
#[derive(Debug, Clone)]
pub struct TracingActivity {
    span: Span,
}

impl TracingActivity {
    pub fn new(span: Span) -> Self {
        Self { span }
    }
}

impl Activity for TracingActivity {
    fn set_status(&self, status: ActivityStatus) {
        self.span.in_scope(|| {
            tracing::info!(activity.status = %status, "Activity status changed");
        });
    }

    fn add_tag(&self, key: &str, value: &str) {
        self.span.in_scope(|| {
            tracing::info!(tag.key = key, tag.value = value, "Activity tag added");
        });
    }
}

/// Activity that keeps what it was given, for inspection.
#[derive(Debug, Default)]
pub struct RecordingActivity {
    status: Mutex<Option<ActivityStatus>>,
    tags: Mutex<Vec<(String, String)>>,
}

impl RecordingActivity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> Option<ActivityStatus> {
        self.status.lock().map(|s| *s).unwrap_or(None)
    }

    pub fn tags(&self) -> Vec<(String, String)> {
        self.tags.lock().map(|t| t.clone()).unwrap_or_default()
    }

    /// Value of the last tag recorded under `key`.
    pub fn tag(&self, key: &str) -> Option<String> {
        self.tags()
            .into_iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }
}

impl Activity for RecordingActivity {
    fn set_status(&self, status: ActivityStatus) {
        if let Ok(mut current) = self.status.lock() {
            *current = Some(status);
        }
    }

    fn add_tag(&self, key: &str, value: &str) {
        if let Ok(mut tags) = self.tags.lock() {
            tags.push((key.to_string(), value.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_activity_keeps_last_tag() {
        let activity = RecordingActivity::new();
        assert_eq!(activity.status(), None);

        activity.set_status(ActivityStatus::Error);
        activity.add_tag(ERROR_DETAILS_TAG, "first");
        activity.add_tag(ERROR_DETAILS_TAG, "second");

        assert_eq!(activity.status(), Some(ActivityStatus::Error));
        assert_eq!(activity.tag(ERROR_DETAILS_TAG).as_deref(), Some("second"));
        assert_eq!(activity.tags().len(), 2);
    }

    #[test]
    fn test_noop_activity_accepts_anything() {
        let activity: &dyn Activity = &NoopActivity;
        activity.set_status(ActivityStatus::Error);
        activity.add_tag(ERROR_DETAILS_TAG, "dropped");
        assert_eq!(ActivityStatus::Error.to_string(), "error");
    }

    #[test]
    fn test_tracing_activity_without_subscriber_is_silent() {
        let activity = TracingActivity::new(Span::none());
        activity.set_status(ActivityStatus::Error);
        activity.add_tag(ERROR_DETAILS_TAG, "ignored");
    }
}
