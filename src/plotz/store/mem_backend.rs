use super::backend::StorageBackend;
use crate::error::{PlotzError, Result};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Default)]
struct MemState {
    items: RefCell<HashMap<String, String>>,
    writes: Cell<usize>,
    simulate_write_error: Cell<bool>,
}

/// In-memory storage backend for testing.
///
/// Uses `Rc` + `RefCell` since plotz is single-threaded. Clones share the same
/// map, which lets a test reopen a store over the "same disk".
#[derive(Clone, Default)]
pub struct MemBackend {
    state: Rc<MemState>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.state.simulate_write_error.set(simulate);
    }

    /// Number of successful `set_item` calls so far.
    pub fn write_count(&self) -> usize {
        self.state.writes.get()
    }

    /// Raw blob for `key`, bypassing the trait.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.state.items.borrow().get(key).cloned()
    }
}

impl StorageBackend for MemBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.raw(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        if self.state.simulate_write_error.get() {
            return Err(PlotzError::Store("Simulated write error".to_string()));
        }
        self.state
            .items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self.state.writes.set(self.state.writes.get() + 1);
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.state.items.borrow_mut().remove(key);
        Ok(())
    }
}
