use alloc::{boxed::Box, sync::Arc, vec::Vec};

use portable_atomic::{AtomicBool, Ordering};
use spin::Mutex;

use super::{LOG_TARGET, StreamError};


/// Cleanup action registered on a [`TeardownRegistry`].
pub type TeardownAction = Box<dyn FnOnce() -> Result<(), StreamError> + Send>;

/// Idempotent cancellation handle tied to one subscription.
///
/// Clones share the same state: disposing any clone disposes all of them. Entries run in
/// registration order, and a child registry is disposed at the position it was added.
#[derive(Clone)]
pub struct TeardownRegistry {
  state: Arc<RegistryState>,
}

impl TeardownRegistry {
  /// Creates an empty registry that has not been disposed.
  #[must_use]
  pub fn new() -> Self {
    Self { state: Arc::new(RegistryState { disposed: AtomicBool::new(false), entries: Mutex::new(Vec::new()) }) }
  }

  /// Returns true once [`TeardownRegistry::dispose`] has run.
  #[must_use]
  pub fn is_disposed(&self) -> bool {
    self.state.disposed.load(Ordering::Acquire)
  }

  /// Returns the number of entries waiting for disposal.
  #[must_use]
  pub fn len(&self) -> usize {
    self.state.entries.lock().len()
  }

  /// Returns true when no entry is waiting for disposal.
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Returns true when both handles point at the same registry.
  #[must_use]
  pub fn same_registry(&self, other: &Self) -> bool {
    Arc::ptr_eq(&self.state, &other.state)
  }

  /// Registers an infallible cleanup action.
  ///
  /// The action runs immediately when the registry is already disposed.
  pub fn add<F>(&self, action: F)
  where
    F: FnOnce() + Send + 'static, {
    self.try_add(move || {
      action();
      Ok(())
    });
  }

  /// Registers a cleanup action that may fail.
  ///
  /// A failure is logged and never prevents sibling actions from running.
  pub fn try_add<F>(&self, action: F)
  where
    F: FnOnce() -> Result<(), StreamError> + Send + 'static, {
    if let Some(entry) = self.push(TeardownEntry::Action(Box::new(action))) {
      entry.run();
    }
  }

  /// Registers a child registry disposed together with this one.
  ///
  /// Adding a registry to itself is ignored. The child is disposed immediately when this registry
  /// is already disposed.
  pub fn add_child(&self, child: &Self) {
    if self.same_registry(child) {
      return;
    }
    if let Some(entry) = self.push(TeardownEntry::Child(child.clone())) {
      entry.run();
    }
  }

  /// Forgets a child registry without disposing it.
  ///
  /// Returns true when the child was registered.
  pub fn remove_child(&self, child: &Self) -> bool {
    let mut entries = self.state.entries.lock();
    let before = entries.len();
    entries.retain(|entry| !matches!(entry, TeardownEntry::Child(registered) if registered.same_registry(child)));
    before != entries.len()
  }

  /// Runs every registered entry once.
  ///
  /// Calling this again, from any clone, is a no-op.
  pub fn dispose(&self) {
    if self.state.disposed.swap(true, Ordering::AcqRel) {
      return;
    }
    let entries = core::mem::take(&mut *self.state.entries.lock());
    tracing::debug!(target: LOG_TARGET, entries = entries.len(), "disposing teardown registry");
    for entry in entries {
      entry.run();
    }
  }

  fn push(&self, entry: TeardownEntry) -> Option<TeardownEntry> {
    let mut entries = self.state.entries.lock();
    // checked under the lock so an entry is never stranded by a concurrent dispose
    if self.is_disposed() {
      return Some(entry);
    }
    entries.push(entry);
    None
  }
}

impl Default for TeardownRegistry {
  fn default() -> Self {
    Self::new()
  }
}

impl core::fmt::Debug for TeardownRegistry {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("TeardownRegistry").field("disposed", &self.is_disposed()).field("entries", &self.len()).finish()
  }
}

struct RegistryState {
  disposed: AtomicBool,
  entries:  Mutex<Vec<TeardownEntry>>,
}

enum TeardownEntry {
  Action(TeardownAction),
  Child(TeardownRegistry),
}

impl TeardownEntry {
  fn run(self) {
    match self {
      | TeardownEntry::Action(action) => {
        if let Err(error) = action() {
          tracing::warn!(target: LOG_TARGET, %error, "teardown action failed");
        }
      },
      | TeardownEntry::Child(child) => child.dispose(),
    }
  }
}
