//! In-memory host.
//!
//! Records every interaction so flows can be driven and inspected without a
//! CI runner.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::Host;
use crate::error::Result;

/// Host that keeps inputs, outputs, state and log commands in memory.
#[derive(Debug, Default)]
pub struct MemoryHost {
    inputs: HashMap<String, String>,
    state: RefCell<HashMap<String, String>>,
    outputs: RefCell<HashMap<String, String>>,
    secrets: RefCell<Vec<String>>,
    paths: RefCell<Vec<PathBuf>>,
    failures: RefCell<Vec<String>>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an input value.
    pub fn with_input(mut self, name: &str, value: &str) -> Self {
        self.inputs.insert(name.to_string(), value.to_string());
        self
    }

    /// Seed state as if a previous step had saved it.
    pub fn with_state(self, name: &str, value: &str) -> Self {
        self.state
            .borrow_mut()
            .insert(name.to_string(), value.to_string());
        self
    }

    pub fn output(&self, name: &str) -> Option<String> {
        self.outputs.borrow().get(name).cloned()
    }

    /// Values registered for masking, in registration order.
    pub fn secrets(&self) -> Vec<String> {
        self.secrets.borrow().clone()
    }

    pub fn saved_state(&self, name: &str) -> Option<String> {
        self.state.borrow().get(name).cloned()
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.paths.borrow().clone()
    }

    pub fn failures(&self) -> Vec<String> {
        self.failures.borrow().clone()
    }
}

impl Host for MemoryHost {
    fn raw_input(&self, name: &str) -> Option<String> {
        self.inputs.get(name).cloned()
    }

    fn set_output(&self, name: &str, value: &str) -> Result<()> {
        self.outputs
            .borrow_mut()
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn set_secret(&self, value: &str) -> Result<()> {
        self.secrets.borrow_mut().push(value.to_string());
        Ok(())
    }

    fn save_state(&self, name: &str, value: &str) -> Result<()> {
        self.state
            .borrow_mut()
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn state(&self, name: &str) -> Option<String> {
        self.saved_state(name)
    }

    fn add_path(&self, dir: &Path) -> Result<()> {
        self.paths.borrow_mut().push(dir.to_path_buf());
        Ok(())
    }

    fn set_failed(&self, message: &str) -> Result<()> {
        self.failures.borrow_mut().push(message.to_string());
        Ok(())
    }
}
