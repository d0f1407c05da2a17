//! Sign-in session settings.

use serde::{Deserialize, Serialize};

const fn default_session_minutes() -> i64 {
    60
}

const fn default_pin_length() -> usize {
    4
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Advisory lifetime of a signed-in session.
    #[serde(default = "default_session_minutes")]
    pub session_minutes: i64,

    /// Expected PIN length, used by front ends to size the prompt.
    #[serde(default = "default_pin_length")]
    pub pin_length: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_minutes: default_session_minutes(),
            pin_length: default_pin_length(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = SessionConfig::default();
        assert_eq!(config.session_minutes, 60);
        assert_eq!(config.pin_length, 4);
    }
}
