use serde::{Deserialize, Serialize};
use std::{
    alloc::{GlobalAlloc, Layout, System},
    io,
    sync::atomic::{AtomicI64, AtomicU64, Ordering},
};
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System as SysInfo};
use tracing::warn;

use crate::error::Result;

/// Source of "how much memory is in use right now" for the harness.
pub trait MemoryGauge {
    fn name(&self) -> &'static str;

    /// Bring the gauge to a state where successive readings are comparable.
    fn settle(&mut self) {}

    fn current_bytes(&mut self) -> Result<i64>;
}

static LIVE_BYTES: AtomicI64 = AtomicI64::new(0);
static ALLOCATIONS: AtomicU64 = AtomicU64::new(0);

/// `System` allocator that keeps a running count of live heap bytes.
/// Install it in a binary with `#[global_allocator]`; until then the
/// counters stay at zero.
pub struct CountingAlloc;

impl CountingAlloc {
    pub fn live_bytes() -> i64 {
        LIVE_BYTES.load(Ordering::SeqCst)
    }

    pub fn allocation_count() -> u64 {
        ALLOCATIONS.load(Ordering::SeqCst)
    }

    pub fn is_installed() -> bool {
        Self::allocation_count() > 0
    }
}

unsafe impl GlobalAlloc for CountingAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc(layout);
        if !ptr.is_null() {
            LIVE_BYTES.fetch_add(layout.size() as i64, Ordering::SeqCst);
            ALLOCATIONS.fetch_add(1, Ordering::SeqCst);
        }
        ptr
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc_zeroed(layout);
        if !ptr.is_null() {
            LIVE_BYTES.fetch_add(layout.size() as i64, Ordering::SeqCst);
            ALLOCATIONS.fetch_add(1, Ordering::SeqCst);
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout);
        LIVE_BYTES.fetch_sub(layout.size() as i64, Ordering::SeqCst);
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let new_ptr = System.realloc(ptr, layout, new_size);
        if !new_ptr.is_null() {
            LIVE_BYTES.fetch_add(new_size as i64 - layout.size() as i64, Ordering::SeqCst);
            ALLOCATIONS.fetch_add(1, Ordering::SeqCst);
        }
        new_ptr
    }
}

/// Live heap bytes as seen by [`CountingAlloc`]. Frees are immediate, so
/// there is nothing to settle.
#[derive(Debug, Default)]
pub struct AllocatorGauge;

impl MemoryGauge for AllocatorGauge {
    fn name(&self) -> &'static str {
        "allocator"
    }

    fn current_bytes(&mut self) -> Result<i64> {
        Ok(CountingAlloc::live_bytes())
    }
}

/// Resident memory of the current process, via `sysinfo`. Coarser than the
/// allocator gauge: freed pages are not always returned to the OS.
pub struct ProcessGauge {
    system: SysInfo,
    pid: Pid,
}

impl ProcessGauge {
    pub fn new() -> Result<Self> {
        let pid = sysinfo::get_current_pid().map_err(io::Error::other)?;
        let mut gauge = Self {
            system: SysInfo::new(),
            pid,
        };
        gauge.settle();
        Ok(gauge)
    }
}

impl MemoryGauge for ProcessGauge {
    fn name(&self) -> &'static str {
        "process"
    }

    fn settle(&mut self) {
        self.system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[self.pid]),
            true,
            ProcessRefreshKind::nothing().with_memory(),
        );
    }

    fn current_bytes(&mut self) -> Result<i64> {
        match self.system.process(self.pid) {
            Some(process) => Ok(process.memory() as i64),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no memory reading for process {}", self.pid),
            )
            .into()),
        }
    }
}

/// Gauge selector, as spelled in config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GaugeKind {
    #[default]
    Allocator,
    Process,
}

impl GaugeKind {
    pub fn open(self) -> Result<Box<dyn MemoryGauge>> {
        Ok(match self {
            GaugeKind::Allocator => {
                if !CountingAlloc::is_installed() {
                    warn!("counting allocator is not the global allocator; memory deltas will read 0");
                }
                Box::new(AllocatorGauge)
            }
            GaugeKind::Process => Box::new(ProcessGauge::new()?),
        })
    }
}
