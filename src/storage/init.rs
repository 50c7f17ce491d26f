//! First-run setup
//!
//! Writes default settings and a starter category tree the first time the
//! data directory is used.

use crate::config::{Settings, TallyPaths};
use crate::error::TallyError;
use crate::models::{CategoryTree, Money};

use super::file_io::write_json_atomic;

/// Starter categories: (top-level name, alias, monthly budget in cents, children)
const STARTER_CATEGORIES: &[(&str, Option<&str>, Option<i64>, &[&str])] = &[
    ("Housing", Some("Home"), None, &["Rent", "Utilities", "Insurance"]),
    ("Food", None, None, &["Groceries", "Dining Out"]),
    ("Car", Some("Vehicle"), None, &["Gas", "Maintenance"]),
    ("Entertainment", None, Some(10_000), &["Subscriptions"]),
    ("Health", None, None, &[]),
    ("Other", None, None, &[]),
];

/// Build the starter tree
pub fn starter_tree() -> Result<CategoryTree, TallyError> {
    let mut tree = CategoryTree::new();
    for (name, alias, budget, children) in STARTER_CATEGORIES {
        let root = tree.add_root(name)?;
        tree.set_alias(root, *alias)?;
        if let Some(cents) = budget {
            tree.set_fixed_amount(root, Some(Money::from_cents(*cents)))?;
        }
        for child in children.iter() {
            tree.add_child(root, child)?;
        }
    }
    Ok(tree)
}

/// Prepare a data directory for use
///
/// Returns `true` when this call did the initialisation. An existing
/// category file is never overwritten.
pub fn initialize_storage(paths: &TallyPaths, with_starter: bool) -> Result<bool, TallyError> {
    paths.ensure_directories()?;

    let fresh = !paths.is_initialized();
    if fresh {
        Settings::default().save(paths)?;
    }

    if !paths.categories_file().exists() {
        let tree = if with_starter {
            starter_tree()?
        } else {
            CategoryTree::new()
        };
        write_json_atomic(paths.categories_file(), &tree)?;
        tracing::info!(categories = tree.len(), "created category file");
    }

    Ok(fresh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::file_io::read_json;
    use tempfile::TempDir;

    #[test]
    fn test_starter_tree_is_valid() {
        let tree = starter_tree().unwrap();
        tree.validate().unwrap();
        assert!(tree.find("Car > Gas").is_some());
        assert_eq!(tree.find_by_name("Vehicle").map(|n| n.name()), Some("Car"));
    }

    #[test]
    fn test_initialize_once() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TallyPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert!(initialize_storage(&paths, true).unwrap());
        assert!(!initialize_storage(&paths, true).unwrap());

        let tree: CategoryTree = read_json(paths.categories_file()).unwrap();
        assert_eq!(tree.len(), starter_tree().unwrap().len());
    }

    #[test]
    fn test_initialize_empty() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TallyPaths::with_base_dir(temp_dir.path().to_path_buf());

        initialize_storage(&paths, false).unwrap();
        let tree: CategoryTree = read_json(paths.categories_file()).unwrap();
        assert!(tree.is_empty());
    }
}
