use std::time::{Duration, Instant};
#[cfg(feature = "cli")]
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};

/// Resource usage sampled at the end of a report phase.
#[derive(Debug, Clone)]
pub struct PhaseStats {
    pub phase: String,
    pub phase_time: Duration,
    pub elapsed_time: Duration,
    pub memory_usage_mb: Option<u64>,
}

/// Times report phases and, with the `cli` feature, samples process memory.
pub struct RunMonitor {
    enabled: bool,
    start_time: Instant,
    last_mark: Instant,
    phases: Vec<PhaseStats>,
    #[cfg(feature = "cli")]
    system: System,
    #[cfg(feature = "cli")]
    pid: Option<Pid>,
}

impl RunMonitor {
    pub fn new(enabled: bool) -> Self {
        let now = Instant::now();
        Self {
            enabled,
            start_time: now,
            last_mark: now,
            phases: Vec::new(),
            #[cfg(feature = "cli")]
            system: System::new(),
            #[cfg(feature = "cli")]
            pid: sysinfo::get_current_pid().ok(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[cfg(feature = "cli")]
    fn memory_mb(&mut self) -> Option<u64> {
        let pid = self.pid?;
        self.system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[pid]),
            true,
            ProcessRefreshKind::nothing().with_memory(),
        );
        self.system.process(pid).map(|p| p.memory() / 1024 / 1024)
    }

    #[cfg(not(feature = "cli"))]
    fn memory_mb(&mut self) -> Option<u64> {
        None
    }

    /// Closes the current phase. No-op when disabled.
    pub fn mark(&mut self, phase: &str) {
        if !self.enabled {
            return;
        }

        let now = Instant::now();
        let stats = PhaseStats {
            phase: phase.to_string(),
            phase_time: now.duration_since(self.last_mark),
            elapsed_time: now.duration_since(self.start_time),
            memory_usage_mb: self.memory_mb(),
        };
        self.last_mark = now;

        tracing::info!(
            phase = %stats.phase,
            phase_ms = stats.phase_time.as_millis() as u64,
            memory_mb = ?stats.memory_usage_mb,
            "📊 phase finished"
        );
        self.phases.push(stats);
    }

    pub fn phases(&self) -> &[PhaseStats] {
        &self.phases
    }

    pub fn log_final_stats(&self) {
        if !self.enabled {
            return;
        }
        let peak = self.phases.iter().filter_map(|p| p.memory_usage_mb).max();
        tracing::info!(
            "📊 Final Stats - Total Time: {:?}, Peak Memory: {:?}MB",
            self.start_time.elapsed(),
            peak
        );
    }
}

impl Default for RunMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}
