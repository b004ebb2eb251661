//! Resident memory probe used to annotate solve events.

use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};

/// Resident set size of this process in bytes, if the platform reports it.
pub(crate) fn resident_bytes() -> Option<u64> {
    let pid = Pid::from(std::process::id() as usize);
    let mut sys = System::new();
    // Only refresh our own process.
    sys.refresh_processes_specifics(
        ProcessesToUpdate::Some(&[pid]),
        true,
        ProcessRefreshKind::nothing().with_memory(),
    );
    sys.process(pid).map(|process| process.memory())
}
