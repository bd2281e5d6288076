//! Time utilities for the simulation and server status

use std::time::{Duration, Instant};

/// Nominal simulation tick period (~30 Hz). The room measures the real
/// elapsed time between firings rather than assuming this exact value.
pub const SIMULATION_TICK: Duration = Duration::from_millis(33);

/// Server start time for uptime tracking
static SERVER_START: std::sync::OnceLock<Instant> = std::sync::OnceLock::new();

/// Initialize server start time (call once at startup)
pub fn init_server_time() {
    SERVER_START.get_or_init(Instant::now);
}

/// Get server uptime in seconds
pub fn uptime_secs() -> u64 {
    SERVER_START
        .get()
        .map(|start| start.elapsed().as_secs())
        .unwrap_or(0)
}
