//! Background monitor logging CPU and memory usage of the server process
//!
//! Collects statistics for **the current process** at a configurable
//! interval and emits them through `tracing`. Based on `sysinfo`; the whole
//! machine average is deliberately not collected.

use std::time::Duration;
use sysinfo::{Pid, ProcessesToUpdate, System};
use tokio::time;
use tracing::info;

/// Configuration for the resource monitor
pub struct ResourceMonitorConfig {
    /// Logging interval in seconds
    pub interval_secs: u64,
}

impl Default for ResourceMonitorConfig {
    fn default() -> Self {
        Self { interval_secs: 120 }
    }
}

/// Monitoring task meant to be spawned in the background at startup
pub async fn start_resource_monitoring(config: ResourceMonitorConfig) {
    info!(
        "Starting process resource monitoring with interval: {} seconds",
        config.interval_secs
    );

    let mut sys = System::new_all();
    let current_pid = Pid::from_u32(std::process::id());
    let mut interval = time::interval(Duration::from_secs(config.interval_secs));

    // Skip the first tick, which fires immediately
    interval.tick().await;

    loop {
        interval.tick().await;
        sys.refresh_processes(ProcessesToUpdate::Some(&[current_pid]), true);

        if let Some(process) = sys.process(current_pid) {
            info!(
                "Resource usage - CPU: {:.2}% | Memory: {:.2} MB",
                process.cpu_usage(),
                process.memory() as f64 / (1024.0 * 1024.0)
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ResourceMonitorConfig::default();
        assert_eq!(config.interval_secs, 120);
    }
}
