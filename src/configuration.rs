//! Config for the referee's agent-facing deadlines.
//!
//! The five timeouts below are the referee's only tunables. Each one bounds
//! a single category of outbound call; everything else the referee does is
//! non-blocking.
//!
//! Configuration can be created programmatically with
//! [`RefereeConfig::new()`] or from environment variables with
//! [`RefereeConfig::from_env()`].
//!
//! # Environment Variables
//!
//! All values are optional millisecond counts; anything unset or unparsable
//! falls back to the 10 second default.
//!
//! - `FISH_ASSIGN_TIMEOUT_MS` — deadline for `assign_color`
//! - `FISH_PLACEMENT_TIMEOUT_MS` — deadline for `place_penguin`
//! - `FISH_TURN_TIMEOUT_MS` — deadline for `take_turn`
//! - `FISH_INFORM_TIMEOUT_MS` — deadline for `inform_disqualified`
//! - `FISH_OBSERVER_TIMEOUT_MS` — deadline for one observer event delivery

use std::env;
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Deadlines for the referee's outbound calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefereeConfig {
    pub(crate) assign_timeout: Duration,
    pub(crate) placement_timeout: Duration,
    pub(crate) turn_timeout: Duration,
    pub(crate) inform_timeout: Duration,
    pub(crate) observer_timeout: Duration,
}

impl RefereeConfig {
    /// Create a configuration with every deadline at the 10 second default.
    #[must_use]
    pub fn new() -> Self {
        Self {
            assign_timeout: DEFAULT_TIMEOUT,
            placement_timeout: DEFAULT_TIMEOUT,
            turn_timeout: DEFAULT_TIMEOUT,
            inform_timeout: DEFAULT_TIMEOUT,
            observer_timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Create a configuration from environment variables; see the module
    /// documentation for the recognized names.
    #[must_use]
    pub fn from_env() -> Self {
        fn parse_duration_millis(var: &str) -> Option<Duration> {
            env::var(var)
                .ok()?
                .parse::<u64>()
                .ok()
                .map(Duration::from_millis)
        }

        let defaults = Self::new();
        Self {
            assign_timeout: parse_duration_millis("FISH_ASSIGN_TIMEOUT_MS")
                .unwrap_or(defaults.assign_timeout),
            placement_timeout: parse_duration_millis("FISH_PLACEMENT_TIMEOUT_MS")
                .unwrap_or(defaults.placement_timeout),
            turn_timeout: parse_duration_millis("FISH_TURN_TIMEOUT_MS")
                .unwrap_or(defaults.turn_timeout),
            inform_timeout: parse_duration_millis("FISH_INFORM_TIMEOUT_MS")
                .unwrap_or(defaults.inform_timeout),
            observer_timeout: parse_duration_millis("FISH_OBSERVER_TIMEOUT_MS")
                .unwrap_or(defaults.observer_timeout),
        }
    }

    /// Sets the deadline for a single `assign_color` call.
    #[must_use]
    pub fn with_assign_timeout(mut self, timeout: Duration) -> Self {
        self.assign_timeout = timeout;
        self
    }

    /// Sets the deadline for a single `place_penguin` call.
    #[must_use]
    pub fn with_placement_timeout(mut self, timeout: Duration) -> Self {
        self.placement_timeout = timeout;
        self
    }

    /// Sets the deadline for a single `take_turn` call.
    #[must_use]
    pub fn with_turn_timeout(mut self, timeout: Duration) -> Self {
        self.turn_timeout = timeout;
        self
    }

    /// Sets the deadline for a single `inform_disqualified` call.
    #[must_use]
    pub fn with_inform_timeout(mut self, timeout: Duration) -> Self {
        self.inform_timeout = timeout;
        self
    }

    /// Sets the deadline for delivering one event to one observer.
    #[must_use]
    pub fn with_observer_timeout(mut self, timeout: Duration) -> Self {
        self.observer_timeout = timeout;
        self
    }

    /// Sets every deadline at once; convenient for tests.
    #[must_use]
    pub fn with_all_timeouts(self, timeout: Duration) -> Self {
        Self {
            assign_timeout: timeout,
            placement_timeout: timeout,
            turn_timeout: timeout,
            inform_timeout: timeout,
            observer_timeout: timeout,
        }
    }
}

impl Default for RefereeConfig {
    fn default() -> Self {
        Self::new()
    }
}
