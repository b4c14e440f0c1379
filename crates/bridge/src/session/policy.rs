//! Reconnect policy: classify a disconnect cause into the action the
//! manager takes before the next connect attempt.
//!
//! Fixed delays, no exponential backoff — the manager's run loop
//! sleeps inline between attempts, so at most one delay is ever
//! pending.

use std::time::Duration;

use wab_adapter::DisconnectCause;
use wab_domain::config::SessionConfig;

/// What to do after a connection closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseAction {
    /// Recoverable cause: retry with the same credentials.
    Reconnect { delay: Duration },
    /// Irrecoverable cause: wipe the credential slot, then start
    /// fresh after the shorter reset delay (a clean slate is expected
    /// to succeed or re-prompt authentication).
    WipeCredentials { delay: Duration },
}

#[derive(Debug, Clone)]
pub struct ReconnectPolicy {
    reconnect_delay: Duration,
    reset_delay: Duration,
    wipe_on_auth_errors: bool,
}

impl ReconnectPolicy {
    pub fn from_config(cfg: &SessionConfig) -> Self {
        Self {
            reconnect_delay: Duration::from_secs(cfg.reconnect_delay_secs),
            reset_delay: Duration::from_secs(cfg.reset_delay_secs),
            wipe_on_auth_errors: cfg.wipe_on_auth_errors,
        }
    }

    /// Delay used for ordinary reconnects and failed connect attempts.
    pub fn reconnect_delay(&self) -> Duration {
        self.reconnect_delay
    }

    pub fn action_for(&self, cause: DisconnectCause) -> CloseAction {
        let destructive =
            cause.is_logged_out() || (self.wipe_on_auth_errors && cause.is_auth_like());
        if destructive {
            CloseAction::WipeCredentials {
                delay: self.reset_delay,
            }
        } else {
            CloseAction::Reconnect {
                delay: self.reconnect_delay,
            }
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(wipe_on_auth_errors: bool) -> ReconnectPolicy {
        ReconnectPolicy::from_config(&SessionConfig {
            reconnect_delay_secs: 30,
            reset_delay_secs: 5,
            pairing_delay_ms: 0,
            wipe_on_auth_errors,
        })
    }

    #[test]
    fn recoverable_causes_reconnect_with_fixed_delay() {
        let p = policy(false);
        for cause in [
            DisconnectCause::CONNECTION_LOST,
            DisconnectCause::CONNECTION_CLOSED,
            DisconnectCause::BAD_SESSION,
            DisconnectCause::SERVICE_UNAVAILABLE,
            DisconnectCause::RESTART_REQUIRED,
            DisconnectCause(499),
        ] {
            assert_eq!(
                p.action_for(cause),
                CloseAction::Reconnect {
                    delay: Duration::from_secs(30)
                },
                "cause {cause}"
            );
        }
    }

    #[test]
    fn logged_out_wipes_with_shorter_delay() {
        let p = policy(false);
        assert_eq!(
            p.action_for(DisconnectCause::LOGGED_OUT),
            CloseAction::WipeCredentials {
                delay: Duration::from_secs(5)
            }
        );
    }

    #[test]
    fn hardening_flag_widens_the_destructive_set() {
        let p = policy(true);
        for cause in [
            DisconnectCause::FORBIDDEN,
            DisconnectCause::METHOD_NOT_ALLOWED,
            DisconnectCause::CONNECTION_CLOSED,
            DisconnectCause::BAD_SESSION,
        ] {
            assert!(
                matches!(p.action_for(cause), CloseAction::WipeCredentials { .. }),
                "cause {cause}"
            );
        }
        // Plain network drops stay recoverable either way.
        assert!(matches!(
            p.action_for(DisconnectCause::CONNECTION_LOST),
            CloseAction::Reconnect { .. }
        ));
    }
}
