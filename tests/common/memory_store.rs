//! In-memory stack store

use mr_stack::error::{Error, Result};
use mr_stack::stack::{Stack, StackStore};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Stack store backed by a map, counting saves
#[derive(Default)]
pub struct MemoryStackStore {
    stacks: Mutex<HashMap<String, Stack>>,
    current: Mutex<Option<String>>,
    saves: AtomicUsize,
}

impl MemoryStackStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with `stack` as the current stack
    pub fn with_stack(stack: &Stack) -> Self {
        let store = Self::new();
        store
            .stacks
            .lock()
            .unwrap()
            .insert(stack.title.clone(), stack.clone());
        *store.current.lock().unwrap() = Some(stack.title.clone());
        store
    }

    /// Latest saved copy of a stack
    pub fn saved(&self, title: &str) -> Option<Stack> {
        self.stacks.lock().unwrap().get(title).cloned()
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl StackStore for MemoryStackStore {
    fn load(&self, title: &str) -> Result<Stack> {
        self.saved(title)
            .ok_or_else(|| Error::StackNotFound(title.to_string()))
    }

    fn save(&self, stack: &Stack) -> Result<()> {
        stack.validate()?;
        self.saves.fetch_add(1, Ordering::SeqCst);
        self.stacks
            .lock()
            .unwrap()
            .insert(stack.title.clone(), stack.clone());
        Ok(())
    }

    fn delete(&self, title: &str) -> Result<()> {
        self.stacks
            .lock()
            .unwrap()
            .remove(title)
            .map(|_| ())
            .ok_or_else(|| Error::StackNotFound(title.to_string()))
    }

    fn list(&self) -> Result<Vec<String>> {
        let mut titles: Vec<String> = self.stacks.lock().unwrap().keys().cloned().collect();
        titles.sort();
        Ok(titles)
    }

    fn current(&self) -> Result<Option<String>> {
        Ok(self.current.lock().unwrap().clone())
    }

    fn set_current(&self, title: &str) -> Result<()> {
        *self.current.lock().unwrap() = Some(title.to_string());
        Ok(())
    }
}
