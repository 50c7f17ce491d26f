//! Category tree repository
//!
//! Holds the whole tree in memory and persists it to categories.json.

use std::path::PathBuf;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::TallyError;
use crate::models::CategoryTree;

use super::file_io::{read_json, write_json_atomic};

/// Repository for the category tree
pub struct CategoryRepository {
    path: PathBuf,
    tree: RwLock<CategoryTree>,
}

impl CategoryRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            tree: RwLock::new(CategoryTree::new()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, CategoryTree>, TallyError> {
        self.tree
            .read()
            .map_err(|e| TallyError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, CategoryTree>, TallyError> {
        self.tree
            .write()
            .map_err(|e| TallyError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    /// Load the tree from disk; the file is validated while parsing
    pub fn load(&self) -> Result<(), TallyError> {
        let tree: CategoryTree = read_json(&self.path)?;
        tracing::debug!(nodes = tree.len(), "loaded category tree");
        *self.write()? = tree;
        Ok(())
    }

    pub fn save(&self) -> Result<(), TallyError> {
        let tree = self.read()?;
        write_json_atomic(&self.path, &*tree)
    }

    /// A copy of the current tree
    pub fn tree(&self) -> Result<CategoryTree, TallyError> {
        Ok(self.read()?.clone())
    }

    /// Replace the whole tree
    pub fn replace(&self, tree: CategoryTree) -> Result<(), TallyError> {
        *self.write()? = tree;
        Ok(())
    }

    /// Apply an edit to the tree in place
    ///
    /// The tree is left unchanged when `edit` fails.
    pub fn update<F, T>(&self, edit: F) -> Result<T, TallyError>
    where
        F: FnOnce(&mut CategoryTree) -> Result<T, TallyError>,
    {
        let mut guard = self.write()?;
        let mut draft = guard.clone();
        let out = edit(&mut draft)?;
        *guard = draft;
        Ok(out)
    }

    pub fn count(&self) -> Result<usize, TallyError> {
        Ok(self.read()?.len())
    }
}
