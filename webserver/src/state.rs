//! Server runtime state

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

/// Process-level state shared with handlers.
#[derive(Debug)]
pub struct ServerState {
    pub source_file: PathBuf,
    pub working_file: PathBuf,
    is_running: AtomicBool,
    start_time: Instant,
}

impl ServerState {
    pub fn new(source_file: PathBuf, working_file: PathBuf) -> Self {
        Self {
            source_file,
            working_file,
            is_running: AtomicBool::new(true),
            start_time: Instant::now(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.is_running.load(Ordering::Relaxed)
    }

    pub fn set_running(&self, running: bool) {
        self.is_running.store(running, Ordering::Relaxed);
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    pub fn source_file_exists(&self) -> bool {
        self.source_file.exists()
    }

    pub fn working_file_exists(&self) -> bool {
        self.working_file.exists()
    }
}
