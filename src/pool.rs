/// Reusable-slot entity allocator.
///
/// Every entity kind lives in its own `Pool`, which owns a backing store of
/// slots and recycles them through a free list — O(1) acquire/release with no
/// per-frame heap churn once warmed up.  A slot is always in exactly one of
/// {free, active}; releasing resets it to `T::default()` so a recycled slot
/// never leaks stale velocity, lifetime, or behavior flags.

/// Opaque reference to a pool slot.  Stable for the lifetime of one
/// activation; releasing invalidates it (further operations are no-ops).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Handle(usize);

impl Handle {
    pub fn index(self) -> usize {
        self.0
    }
}

pub struct Pool<T: Default> {
    slots: Vec<T>,
    live: Vec<bool>,
    /// Active slot indices in acquisition order (this frame's iteration order).
    order: Vec<usize>,
    /// Free slot indices — popped on acquire, pushed on release.
    free: Vec<usize>,
    /// Lifetime count of slots ever created (diagnostic only).
    allocated: u64,
}

impl<T: Default> Pool<T> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Pre-warm `cap` slots so the steady state never allocates.
    /// The pool grows past this on demand and never shrinks.
    pub fn with_capacity(cap: usize) -> Self {
        let mut pool = Self {
            slots: Vec::with_capacity(cap),
            live: Vec::with_capacity(cap),
            order: Vec::with_capacity(cap),
            free: Vec::with_capacity(cap),
            allocated: 0,
        };
        for _ in 0..cap {
            let idx = pool.grow();
            pool.free.push(idx);
        }
        pool
    }

    fn grow(&mut self) -> usize {
        let idx = self.slots.len();
        self.slots.push(T::default());
        self.live.push(false);
        self.allocated += 1;
        idx
    }

    /// Take a slot from the free set (growing if exhausted), initialise it
    /// with `item`, and mark it active.  Never fails.
    pub fn acquire(&mut self, item: T) -> Handle {
        let idx = match self.free.pop() {
            Some(idx) => idx,
            None => self.grow(),
        };
        self.slots[idx] = item;
        self.live[idx] = true;
        self.order.push(idx);
        Handle(idx)
    }

    /// Return a slot to the free set, resetting it to neutral defaults.
    /// Releasing an already-free handle is a silent no-op: two destruction
    /// paths may legitimately claim the same entity within one frame.
    pub fn release(&mut self, handle: Handle) {
        let idx = handle.0;
        if idx >= self.live.len() || !self.live[idx] {
            return;
        }
        self.live[idx] = false;
        self.slots[idx] = T::default();
        self.order.retain(|&i| i != idx);
        self.free.push(idx);
    }

    /// Release every active slot (game reset / game over).
    pub fn release_all(&mut self) {
        for idx in self.order.drain(..) {
            self.live[idx] = false;
            self.slots[idx] = T::default();
            self.free.push(idx);
        }
    }

    pub fn get(&self, handle: Handle) -> Option<&T> {
        if *self.live.get(handle.0)? {
            Some(&self.slots[handle.0])
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        if *self.live.get(handle.0)? {
            Some(&mut self.slots[handle.0])
        } else {
            None
        }
    }

    /// Snapshot of all active handles in acquisition order.  The snapshot
    /// stays valid while the pool is mutated underneath it: handles released
    /// after the snapshot was taken simply resolve to `None`.
    pub fn handles(&self) -> Vec<Handle> {
        self.order.iter().map(|&i| Handle(i)).collect()
    }

    /// Iterate active slots in acquisition order.
    pub fn iter(&self) -> impl Iterator<Item = (Handle, &T)> + '_ {
        self.order.iter().map(move |&i| (Handle(i), &self.slots[i]))
    }

    /// Number of active slots.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Total slots in the backing store (active + free).
    pub fn total_slots(&self) -> usize {
        self.slots.len()
    }

    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Lifetime slot allocations, including the pre-warmed ones.
    pub fn allocated(&self) -> u64 {
        self.allocated
    }
}

impl<T: Default> Default for Pool<T> {
    fn default() -> Self {
        Self::new()
    }
}
