//! GUID pool
//!
//! A pool owns one closed GUID range `[start, end]` for a single logical
//! network. It tracks which GUIDs are in use and hands out free ones in
//! round-robin order: each search resumes after the last GUID handed out and
//! wraps from `end` back to `start`, so released GUIDs are only reused after
//! the rest of the range has been offered.
//!
//! All state sits behind one mutex, so every public operation is atomic with
//! respect to every other operation on the same pool. Share a pool between
//! tasks with `Arc<GuidPool>`.

use crate::error::GuidPoolError;
use crate::guid::Guid;
use crate::pod_trait::PodClientTrait;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

/// Snapshot of a pool's usage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolStats {
    /// First GUID of the range
    pub start: Guid,
    /// Last GUID of the range
    pub end: Guid,
    /// Number of GUIDs in the range
    pub size: u64,
    /// Number of GUIDs in use
    pub allocated: u64,
    /// Number of GUIDs still available
    pub free: u64,
}

/// Mutable pool state, guarded by the pool's mutex
#[derive(Debug, Default)]
pub(crate) struct PoolState {
    /// Allocated GUIDs; absence means free
    allocated: HashSet<u64>,
    /// Last GUID handed out by `allocate_guid`
    cursor: Option<u64>,
}

impl PoolState {
    pub(crate) fn is_allocated(&self, guid: Guid) -> bool {
        self.allocated.contains(&guid.value())
    }

    pub(crate) fn mark(&mut self, guid: Guid) {
        self.allocated.insert(guid.value());
    }

    fn clear(&mut self, guid: Guid) -> bool {
        self.allocated.remove(&guid.value())
    }

    /// Take over `other`'s allocated set, keeping the cursor
    pub(crate) fn replace_allocated(&mut self, other: PoolState) {
        self.allocated = other.allocated;
    }
}

/// Bounded-range InfiniBand GUID allocator
pub struct GuidPool {
    start: Guid,
    end: Guid,
    state: Mutex<PoolState>,
    client: Option<Arc<dyn PodClientTrait>>,
}

impl std::fmt::Debug for GuidPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GuidPool")
            .field("start", &self.start)
            .field("end", &self.end)
            .field("state", &self.state)
            .field("has_client", &self.client.is_some())
            .finish()
    }
}

impl GuidPool {
    /// Create a pool covering `[start, end]`
    ///
    /// Both bounds must parse and pass [`Guid::is_allowed`], and `start`
    /// must not be greater than `end`. The pod client is only stored here;
    /// it is first used by [`GuidPool::init_pool`].
    pub fn new(
        start: &str,
        end: &str,
        client: Option<Arc<dyn PodClientTrait>>,
    ) -> Result<Self, GuidPoolError> {
        let start = Guid::parse(start)?;
        let end = Guid::parse(end)?;

        for bound in [start, end] {
            if !bound.is_allowed() {
                return Err(GuidPoolError::DisallowedGuid(bound));
            }
        }
        if start > end {
            return Err(GuidPoolError::InvalidRange { start, end });
        }

        debug!("Created GUID pool {} - {}", start, end);
        Ok(Self {
            start,
            end,
            state: Mutex::new(PoolState::default()),
            client,
        })
    }

    /// Allocate the next free GUID after the last one handed out
    ///
    /// The search wraps from the end of the range back to its start and
    /// fails with [`GuidPoolError::PoolExhausted`] when every GUID is in use,
    /// leaving the pool unchanged.
    pub fn allocate_guid(&self) -> Result<Guid, GuidPoolError> {
        let mut state = self.lock();

        // Any allocated.len() + 1 consecutive candidates contain a free one
        let taken = state.allocated.len();
        if taken as u64 >= self.size() {
            warn!("GUID pool {} - {} is exhausted", self.start, self.end);
            return Err(self.exhausted());
        }

        let mut candidate = match state.cursor {
            Some(cursor) if cursor < self.end.value() => cursor + 1,
            _ => self.start.value(),
        };
        for _ in 0..=taken {
            let guid = Guid::new(candidate);
            if !state.is_allocated(guid) {
                state.mark(guid);
                state.cursor = Some(candidate);
                debug!("Allocated GUID {}", guid);
                return Ok(guid);
            }
            candidate = if candidate == self.end.value() {
                self.start.value()
            } else {
                candidate + 1
            };
        }

        Err(self.exhausted())
    }

    /// Allocate the next free GUID and return its canonical text
    pub fn allocate_guid_string(&self) -> Result<String, GuidPoolError> {
        self.allocate_guid().map(|guid| guid.to_string())
    }

    /// Release a GUID so it can be allocated again
    ///
    /// Releasing a GUID that is not allocated is an error, not a no-op.
    /// The allocation cursor is left where it is.
    pub fn release_guid(&self, guid: &str) -> Result<(), GuidPoolError> {
        let guid = Guid::parse(guid)?;

        if !self.lock().clear(guid) {
            return Err(GuidPoolError::NotAllocated(guid));
        }
        debug!("Released GUID {}", guid);
        Ok(())
    }

    /// Mark a specific GUID as allocated
    ///
    /// Used for GUIDs assigned outside the round-robin search. The
    /// allocation cursor is not moved.
    pub fn reserve_guid(&self, guid: &str) -> Result<Guid, GuidPoolError> {
        let guid = Guid::parse(guid)?;
        if !guid.is_allowed() {
            return Err(GuidPoolError::DisallowedGuid(guid));
        }
        if !self.contains(guid) {
            return Err(GuidPoolError::OutOfRange {
                guid,
                start: self.start,
                end: self.end,
            });
        }

        let mut state = self.lock();
        if state.is_allocated(guid) {
            return Err(GuidPoolError::ConflictingAllocation(guid));
        }
        state.mark(guid);
        debug!("Reserved GUID {}", guid);
        Ok(guid)
    }

    /// Whether `guid` is currently allocated
    #[must_use]
    pub fn is_allocated(&self, guid: Guid) -> bool {
        self.lock().is_allocated(guid)
    }

    /// Whether `guid` lies within the pool's range
    #[must_use]
    pub fn contains(&self, guid: Guid) -> bool {
        (self.start..=self.end).contains(&guid)
    }

    /// First and last GUID of the range
    #[must_use]
    pub fn range(&self) -> (Guid, Guid) {
        (self.start, self.end)
    }

    /// Number of GUIDs in the range
    ///
    /// Never overflows: the all-zero GUID is not allowed, so `start >= 1`.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.end.value() - self.start.value() + 1
    }

    /// Current usage snapshot
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        let allocated = self.lock().allocated.len() as u64;
        let size = self.size();
        PoolStats {
            start: self.start,
            end: self.end,
            size,
            allocated,
            free: size - allocated,
        }
    }

    /// Allocated GUIDs in ascending order
    #[must_use]
    pub fn allocated_guids(&self) -> Vec<Guid> {
        let mut guids: Vec<Guid> = self.lock().allocated.iter().copied().map(Guid::new).collect();
        guids.sort_unstable();
        guids
    }

    pub(crate) fn client(&self) -> Option<&Arc<dyn PodClientTrait>> {
        self.client.as_ref()
    }

    /// Lock the pool state
    ///
    /// No operation panics while holding the lock, so a poisoned state is
    /// still consistent and is recovered.
    pub(crate) fn lock(&self) -> MutexGuard<'_, PoolState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn exhausted(&self) -> GuidPoolError {
        GuidPoolError::PoolExhausted {
            start: self.start,
            end: self.end,
        }
    }
}
