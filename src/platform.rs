//! Host core counts, used to size the stepping pool.
//!
//! `physical_core_count` and `logical_core_count` describe the machine as
//! `sysinfo` reports it. `available_core_count` honors the process affinity
//! mask and cgroup limits where the OS reports them.

use std::thread;

use sysinfo::{CpuRefreshKind, RefreshKind, System};

/// Cores this process may actually run on.
pub fn available_core_count() -> usize {
    thread::available_parallelism().map_or(1, |n| n.get())
}

/// Hardware threads online.
pub fn logical_core_count() -> usize {
    let sys =
        System::new_with_specifics(RefreshKind::nothing().with_cpu(CpuRefreshKind::nothing()));
    match sys.cpus().len() {
        0 => available_core_count(),
        n => n,
    }
}

/// Physical cores, not counting SMT siblings.
pub fn physical_core_count() -> usize {
    System::physical_core_count()
        .filter(|&n| n > 0)
        .unwrap_or_else(|| logical_core_count().div_ceil(2))
}
