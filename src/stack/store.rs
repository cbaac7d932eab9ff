//! Stack persistence
//!
//! Stacks are stored as one JSON document per stack under
//! `<git-dir>/stacked/`, next to a `CURRENT` file naming the active stack.

use crate::error::{Error, Result};
use crate::stack::Stack;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const STACK_DIR: &str = "stacked";
const CURRENT_FILE: &str = "CURRENT";
const STACK_EXT: &str = "json";

/// Storage for stack metadata
pub trait StackStore: Send + Sync {
    /// Load a stack by title
    fn load(&self, title: &str) -> Result<Stack>;

    /// Persist a stack, replacing any previous version
    fn save(&self, stack: &Stack) -> Result<()>;

    /// Delete a stack
    fn delete(&self, title: &str) -> Result<()>;

    /// Titles of all stored stacks
    fn list(&self) -> Result<Vec<String>>;

    /// Title of the active stack, if one is set
    fn current(&self) -> Result<Option<String>>;

    /// Mark a stack as active
    fn set_current(&self, title: &str) -> Result<()>;
}

/// File-backed stack store
#[derive(Debug, Clone)]
pub struct FileStackStore {
    root: PathBuf,
}

impl FileStackStore {
    /// Create a store inside a repository's git directory
    pub fn new(git_dir: &Path) -> Self {
        Self {
            root: git_dir.join(STACK_DIR),
        }
    }

    /// Directory holding the stack files
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, title: &str) -> PathBuf {
        self.root.join(format!("{}.{STACK_EXT}", file_stem(title)))
    }
}

/// Titles are free text; percent-encode them so they stay inside the stack
/// directory and distinct titles never share a file
fn file_stem(title: &str) -> String {
    urlencoding::encode(title).into_owned()
}

impl StackStore for FileStackStore {
    fn load(&self, title: &str) -> Result<Stack> {
        let path = self.path_for(title);
        if !path.exists() {
            return Err(Error::StackNotFound(title.to_string()));
        }

        debug!("Loading stack '{title}' from {}", path.display());
        let stack: Stack = serde_json::from_str(&fs::read_to_string(&path)?)?;
        stack.validate()?;
        Ok(stack)
    }

    fn save(&self, stack: &Stack) -> Result<()> {
        stack.validate()?;
        fs::create_dir_all(&self.root)?;

        let path = self.path_for(&stack.title);
        debug!("Saving stack '{}' to {}", stack.title, path.display());
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_string_pretty(stack)?)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn delete(&self, title: &str) -> Result<()> {
        let path = self.path_for(title);
        if !path.exists() {
            return Err(Error::StackNotFound(title.to_string()));
        }
        fs::remove_file(path)?;

        if self.current()?.as_deref() == Some(title) {
            fs::remove_file(self.root.join(CURRENT_FILE))?;
        }
        Ok(())
    }

    fn list(&self) -> Result<Vec<String>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut titles = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(STACK_EXT) {
                continue;
            }
            let stack: Stack = serde_json::from_str(&fs::read_to_string(&path)?)?;
            titles.push(stack.title);
        }
        titles.sort();
        Ok(titles)
    }

    fn current(&self) -> Result<Option<String>> {
        let path = self.root.join(CURRENT_FILE);
        if !path.exists() {
            return Ok(None);
        }
        let title = fs::read_to_string(path)?.trim().to_string();
        Ok((!title.is_empty()).then_some(title))
    }

    fn set_current(&self, title: &str) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        fs::write(self.root.join(CURRENT_FILE), format!("{title}\n"))?;
        Ok(())
    }
}
