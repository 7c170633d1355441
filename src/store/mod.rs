//! Shared checkbox state
//!
//! The store owns a fixed domain of checkbox states, ids `1..=N`, fully
//! populated at startup. Nothing is ever added or removed; `toggle` is the
//! only mutation. The checked count is always derived from the states so it
//! cannot drift out of sync with them.

use parking_lot::RwLock;

/// Identifier of a single checkbox, valid in `1..=domain_size`.
pub type CheckboxId = usize;

/// Number of checkboxes in the default deployment.
pub const DEFAULT_DOMAIN_SIZE: usize = 10_000;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in store operations
#[derive(Debug, PartialEq, Eq)]
pub enum StoreError {
    /// The id is outside `1..=domain_size`.
    OutOfRange { id: CheckboxId, max: usize },
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::OutOfRange { id, max } => {
                write!(f, "Checkbox id {} out of range 1..={}", id, max)
            }
        }
    }
}

impl std::error::Error for StoreError {}

/// Thread-safe store for the full set of checkbox states
pub struct CheckboxStore {
    /// Slot `i` holds the state of checkbox `i + 1`.
    states: RwLock<Vec<bool>>,
}

impl CheckboxStore {
    /// Create a store with the default domain of 10,000 checkboxes, all unchecked.
    pub fn new() -> Self {
        Self::with_domain_size(DEFAULT_DOMAIN_SIZE)
    }

    /// Create a store with a custom domain size (used by tests).
    pub fn with_domain_size(size: usize) -> Self {
        Self {
            states: RwLock::new(vec![false; size]),
        }
    }

    /// Number of checkboxes in the domain (constant for the store's lifetime).
    pub fn domain_size(&self) -> usize {
        self.states.read().len()
    }

    /// Flip the checkbox at `id` and return its new state.
    ///
    /// Concurrent toggles on the same id serialize under the write lock, so
    /// no call is ever lost: `k` toggles always land on the parity of `k`.
    pub fn toggle(&self, id: CheckboxId) -> StoreResult<bool> {
        let mut states = self.states.write();
        if id < 1 || id > states.len() {
            return Err(StoreError::OutOfRange {
                id,
                max: states.len(),
            });
        }
        let state = &mut states[id - 1];
        *state = !*state;
        Ok(*state)
    }

    /// Read a single checkbox state.
    pub fn get(&self, id: CheckboxId) -> StoreResult<bool> {
        let states = self.states.read();
        if id < 1 || id > states.len() {
            return Err(StoreError::OutOfRange {
                id,
                max: states.len(),
            });
        }
        Ok(states[id - 1])
    }

    /// Snapshot of all `(id, checked)` pairs at a single instant.
    pub fn get_all(&self) -> Vec<(CheckboxId, bool)> {
        self.states
            .read()
            .iter()
            .enumerate()
            .map(|(i, &checked)| (i + 1, checked))
            .collect()
    }

    /// Number of checked boxes, derived from the same snapshot the states
    /// live in (never a separately maintained counter).
    pub fn checked_count(&self) -> usize {
        self.states.read().iter().filter(|&&c| c).count()
    }
}

impl Default for CheckboxStore {
    fn default() -> Self {
        Self::new()
    }
}
