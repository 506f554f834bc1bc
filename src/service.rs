//! Forwarder service liveness probe
//!
//! Whether the forwarding service is alive is a one-line query against the
//! OS service manager, kept behind a trait so hosts without systemd can
//! plug in their own lookup.

use std::process::Command;

/// Run state of the forwarding service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    Running,
    Stopped,
    Unknown,
}

impl ServiceState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceState::Running => "running",
            ServiceState::Stopped => "stopped",
            ServiceState::Unknown => "unknown",
        }
    }
}

pub trait ServiceProbe {
    fn status(&self, service: &str) -> ServiceState;
}

/// Probe backed by `systemctl is-active`
pub struct SystemdProbe;

impl ServiceProbe for SystemdProbe {
    fn status(&self, service: &str) -> ServiceState {
        match Command::new("systemctl")
            .args(["is-active", "--quiet", service])
            .status()
        {
            Ok(status) if status.success() => ServiceState::Running,
            Ok(_) => ServiceState::Stopped,
            Err(err) => {
                tracing::debug!(service = %service, error = %err, "systemctl unavailable");
                ServiceState::Unknown
            }
        }
    }
}

/// Probe for hosts without a service manager this crate understands
pub struct NullProbe;

impl ServiceProbe for NullProbe {
    fn status(&self, _service: &str) -> ServiceState {
        ServiceState::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_probe_always_reports_unknown() {
        assert_eq!(NullProbe.status("anything"), ServiceState::Unknown);
    }

    #[test]
    fn state_strings_are_stable() {
        assert_eq!(ServiceState::Running.as_str(), "running");
        assert_eq!(ServiceState::Stopped.as_str(), "stopped");
        assert_eq!(ServiceState::Unknown.as_str(), "unknown");
    }
}
