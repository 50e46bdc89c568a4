//! Process-wide service identity.

use crate::behavior::BehaviorMode;
use crate::config::ServiceConfig;

/// Version, behavior and hostname, fixed for the life of the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceIdentity {
    version: String,
    behavior: String,
    mode: BehaviorMode,
    hostname: String,
}

impl ServiceIdentity {
    /// Build an identity. `behavior` is kept verbatim for reporting while
    /// the policy mode falls back to normal when it is unrecognized.
    pub fn new(
        version: impl Into<String>,
        behavior: impl Into<String>,
        hostname: impl Into<String>,
    ) -> Self {
        let behavior = behavior.into();
        Self {
            version: version.into(),
            mode: BehaviorMode::from_config(&behavior),
            behavior,
            hostname: hostname.into(),
        }
    }

    /// Build the identity from validated configuration, resolving the
    /// hostname from the OS unless overridden.
    pub fn from_config(config: &ServiceConfig) -> Self {
        let hostname = config
            .service
            .hostname
            .clone()
            .unwrap_or_else(resolve_hostname);
        Self::new(
            config.service.version.clone(),
            config.service.behavior.clone(),
            hostname,
        )
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Behavior as configured.
    pub fn behavior(&self) -> &str {
        &self.behavior
    }

    /// Behavior policy in effect.
    pub fn mode(&self) -> BehaviorMode {
        self.mode
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// Whether the configured behavior named a known mode.
    pub fn behavior_recognized(&self) -> bool {
        self.behavior.parse::<BehaviorMode>().is_ok()
    }
}

fn resolve_hostname() -> String {
    hostname::get()
        .ok()
        .and_then(|name| name.into_string().ok())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}
