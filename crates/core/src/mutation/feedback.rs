//! Transient user feedback with deadline-based clearing.
//!
//! Feedback never clears itself with a timer. Each message carries its
//! expiry deadline; readers filter expired messages, so visibility is a
//! pure function of the clock.

use std::time::{Duration, Instant};

/// Kind of feedback shown after a mutation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackKind {
    /// The mutation committed.
    Success,
    /// The mutation failed and was rolled back.
    Error,
}

/// One transient feedback message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    kind: FeedbackKind,
    message_key: String,
    expires_at: Instant,
}

impl Feedback {
    /// Creates a success message visible for `ttl`.
    #[must_use]
    pub fn success(message_key: impl Into<String>, ttl: Duration) -> Self {
        Self {
            kind: FeedbackKind::Success,
            message_key: message_key.into(),
            expires_at: Instant::now() + ttl,
        }
    }

    /// Creates an error message visible for `ttl`.
    #[must_use]
    pub fn error(message_key: impl Into<String>, ttl: Duration) -> Self {
        Self {
            kind: FeedbackKind::Error,
            message_key: message_key.into(),
            expires_at: Instant::now() + ttl,
        }
    }

    /// The kind of this message.
    #[must_use]
    pub fn kind(&self) -> FeedbackKind {
        self.kind
    }

    /// The message key to resolve in the presentation layer.
    #[must_use]
    pub fn message_key(&self) -> &str {
        &self.message_key
    }

    /// Returns true while the message should still be shown.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.is_visible_at(Instant::now())
    }

    /// Visibility at an explicit instant.
    #[must_use]
    pub fn is_visible_at(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Auto-clear intervals for success and error feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedbackConfig {
    /// How long a success message stays visible.
    pub success_clear: Duration,
    /// How long an error message stays visible. Longer than success so the
    /// user has time to read what went wrong.
    pub error_clear: Duration,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            success_clear: Duration::from_secs(3),
            error_clear: Duration::from_secs(5),
        }
    }
}

impl From<&darzi_shared::config::FeedbackConfig> for FeedbackConfig {
    fn from(config: &darzi_shared::config::FeedbackConfig) -> Self {
        Self {
            success_clear: Duration::from_secs(config.success_clear_secs),
            error_clear: Duration::from_secs(config.error_clear_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FeedbackConfig::default();
        assert_eq!(config.success_clear, Duration::from_secs(3));
        assert_eq!(config.error_clear, Duration::from_secs(5));
    }

    #[test]
    fn test_visibility_follows_deadline() {
        let feedback = Feedback::success("payment.add.success", Duration::from_secs(60));
        assert!(feedback.is_visible());
        assert_eq!(feedback.kind(), FeedbackKind::Success);
        assert_eq!(feedback.message_key(), "payment.add.success");

        let expired = Feedback::error("payment.add.failed", Duration::ZERO);
        assert!(!expired.is_visible());
    }

    #[test]
    fn test_visibility_at_explicit_instant() {
        let feedback = Feedback::error("payment.update.failed", Duration::from_secs(5));
        let now = Instant::now();
        assert!(feedback.is_visible_at(now));
        assert!(!feedback.is_visible_at(now + Duration::from_secs(6)));
    }

    #[test]
    fn test_from_shared_config() {
        let shared = darzi_shared::config::FeedbackConfig {
            success_clear_secs: 2,
            error_clear_secs: 7,
        };
        let config = FeedbackConfig::from(&shared);
        assert_eq!(config.success_clear, Duration::from_secs(2));
        assert_eq!(config.error_clear, Duration::from_secs(7));
    }
}
