//! Rotation planning for a validated configuration.
//!
//! Builds the per-server rotation plan handed to the cloud API workers
//! and reports it.

use imageroller::config::{ServerConfig, ValidatedConfig};
use imageroller::retention::RetentionPolicy;

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// One server's part of the rotation plan.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PlanEntry {
    server: String,
    region: String,
    policy: RetentionPolicy,
    auto_enabled: bool,
}

impl From<&ServerConfig> for PlanEntry {
    fn from(server: &ServerConfig) -> Self {
        Self {
            server: server.name().to_string(),
            region: server.region().to_string(),
            policy: RetentionPolicy::from(server),
            auto_enabled: server.auto_enabled(),
        }
    }
}

impl PlanEntry {
    fn describe(&self) -> String {
        format!(
            "{} [{}]: save timeout {}s, retain images {}s{}",
            self.server,
            self.region,
            self.policy.save_timeout().as_secs(),
            self.policy.retain().as_secs(),
            if self.auto_enabled {
                " (enabled by --server)"
            } else {
                ""
            },
        )
    }
}

/// Rotation plan for a run.
#[derive(Debug)]
struct RotationPlan {
    workers: u32,
    force: bool,
    entries: Vec<PlanEntry>,
}

impl From<&ValidatedConfig> for RotationPlan {
    fn from(config: &ValidatedConfig) -> Self {
        Self {
            workers: config.global.concurrent_workers(),
            force: config.force,
            entries: config.global.servers().iter().map(PlanEntry::from).collect(),
        }
    }
}

impl RotationPlan {
    /// Worker count actually needed: never more than there are servers.
    fn effective_workers(&self) -> usize {
        self.entries
            .len()
            .min(usize::try_from(self.workers).unwrap_or(usize::MAX))
    }

    fn summary(&self) -> String {
        format!(
            "Rotating {} server(s) with {} worker(s){}",
            self.entries.len(),
            self.effective_workers(),
            if self.force { ", forced" } else { "" },
        )
    }
}

/// Reports the rotation plan for the validated configuration.
pub fn execute(config: &ValidatedConfig) {
    let plan = RotationPlan::from(config);

    tracing::info!("{}", plan.summary());
    for entry in &plan.entries {
        tracing::info!("{}", entry.describe());
    }
}
