// src/engine/state.rs

//! Process-wide shared runner state.
//!
//! One [`RunnerState`] is created at startup and shared via `Arc` by every
//! pipeline stage for the process lifetime. The shutdown flag has a single
//! writer (the signal listener) and many readers; the per-period counters
//! are incremented by event workers and reset by the heartbeat emitter;
//! each liveness slot has one writer (its owning worker) and one reader
//! (the drain controller).

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use rand::Rng;

pub struct RunnerState {
    shutdown: AtomicBool,

    success_since_heartbeat: AtomicU64,
    error_since_heartbeat: AtomicU64,
    disabled_loop_count: AtomicU64,

    retrievers_live: Vec<AtomicBool>,
    workers_live: Vec<AtomicBool>,

    epoch_offsets: Mutex<HashMap<String, u64>>,
}

impl RunnerState {
    /// Registries are sized once; pool sizes never change after startup.
    pub fn new(num_retrievers: usize, num_workers: usize) -> Self {
        Self {
            shutdown: AtomicBool::new(false),
            success_since_heartbeat: AtomicU64::new(0),
            error_since_heartbeat: AtomicU64::new(0),
            disabled_loop_count: AtomicU64::new(0),
            retrievers_live: (0..num_retrievers).map(|_| AtomicBool::new(false)).collect(),
            workers_live: (0..num_workers).map(|_| AtomicBool::new(false)).collect(),
            epoch_offsets: Mutex::new(HashMap::new()),
        }
    }

    /// Set by the signal listener; never reset.
    pub fn request_shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }

    pub fn record_success(&self) {
        self.success_since_heartbeat.fetch_add(1, Ordering::SeqCst);
    }

    pub fn record_error(&self) {
        self.error_since_heartbeat.fetch_add(1, Ordering::SeqCst);
    }

    /// Atomically read and reset both per-period counters.
    pub fn take_heartbeat_counts(&self) -> (u64, u64) {
        (
            self.success_since_heartbeat.swap(0, Ordering::SeqCst),
            self.error_since_heartbeat.swap(0, Ordering::SeqCst),
        )
    }

    pub fn disabled_loops(&self) -> u64 {
        self.disabled_loop_count.load(Ordering::SeqCst)
    }

    pub fn set_disabled_loops(&self, count: u64) {
        self.disabled_loop_count.store(count, Ordering::SeqCst);
    }

    /// Workers are numbered from 1, matching the ordinals in log lines.
    pub fn set_retriever_live(&self, ordinal: usize, live: bool) {
        if let Some(slot) = self.retrievers_live.get(ordinal - 1) {
            slot.store(live, Ordering::SeqCst);
        }
    }

    pub fn set_worker_live(&self, ordinal: usize, live: bool) {
        if let Some(slot) = self.workers_live.get(ordinal - 1) {
            slot.store(live, Ordering::SeqCst);
        }
    }

    /// Ordinals of event retrievers that have not yet exited.
    pub fn live_retrievers(&self) -> Vec<usize> {
        live_ordinals(&self.retrievers_live)
    }

    /// Ordinals of event workers that have not yet exited.
    pub fn live_workers(&self) -> Vec<usize> {
        live_ordinals(&self.workers_live)
    }

    /// Fixed per-label epoch offset in `[0, period_ns)`, chosen uniformly
    /// at random on the label's first use and stable for the process
    /// lifetime. The fixity is what decorrelates a fleet of identically
    /// configured runners.
    pub fn epoch_offset(&self, label: &str, period_ns: u64) -> u64 {
        let mut offsets = self
            .epoch_offsets
            .lock()
            .expect("epoch offset registry poisoned");
        *offsets
            .entry(label.to_string())
            .or_insert_with(|| rand::rng().random_range(0..period_ns))
    }
}

fn live_ordinals(slots: &[AtomicBool]) -> Vec<usize> {
    slots
        .iter()
        .enumerate()
        .filter(|(_, slot)| slot.load(Ordering::SeqCst))
        .map(|(idx, _)| idx + 1)
        .collect()
}
