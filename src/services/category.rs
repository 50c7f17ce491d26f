//! Category service
//!
//! Edits to the category tree: each operation applies the edit, saves the
//! tree, and writes an audit entry.

use crate::audit::EntityType;
use crate::error::{TallyError, TallyResult};
use crate::models::{CategoryColor, CategoryId, CategoryNode, CategoryTree, Money};
use crate::storage::Storage;

/// Service for category management
pub struct CategoryService<'a> {
    storage: &'a Storage,
}

/// Everything `category show` prints about one category
#[derive(Debug, Clone)]
pub struct CategoryDetail {
    pub node: CategoryNode,
    pub path: String,
    /// Recursive rollup, `None` if nothing in the subtree is budgeted
    pub monthly_budget: Option<Money>,
    pub children: Vec<String>,
}

impl<'a> CategoryService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// The current tree
    pub fn tree(&self) -> TallyResult<CategoryTree> {
        self.storage.categories.tree()
    }

    /// Find a category by name, alias, "A > B" path, or id
    pub fn find(&self, identifier: &str) -> TallyResult<Option<CategoryNode>> {
        Ok(self.tree()?.find(identifier).cloned())
    }

    fn resolve(&self, identifier: &str) -> TallyResult<CategoryNode> {
        self.find(identifier)?
            .ok_or_else(|| TallyError::category_not_found(identifier))
    }

    /// Full detail for one category
    pub fn detail(&self, identifier: &str) -> TallyResult<CategoryDetail> {
        let tree = self.tree()?;
        let node = tree
            .find(identifier)
            .ok_or_else(|| TallyError::category_not_found(identifier))?;

        Ok(CategoryDetail {
            path: tree.path_string(node.id()),
            monthly_budget: tree.monthly_budget(node.id()),
            children: tree
                .children(node.id())
                .into_iter()
                .map(|c| c.name().to_string())
                .collect(),
            node: node.clone(),
        })
    }

    /// Add a category at the top level or under `parent`
    pub fn add(&self, name: &str, parent: Option<&str>) -> TallyResult<CategoryNode> {
        let parent_id = match parent {
            Some(p) => Some(self.resolve(p)?.id()),
            None => None,
        };

        let node = self.storage.categories.update(|tree| {
            let id = match parent_id {
                Some(p) => tree.add_child(p, name.trim())?,
                None => tree.add_root(name.trim())?,
            };
            tree.get(id)
                .cloned()
                .ok_or_else(|| TallyError::category_not_found(id.to_string()))
        })?;
        self.storage.categories.save()?;

        self.storage.log_create(
            EntityType::Category,
            node.id().to_string(),
            Some(node.name().to_string()),
            &node,
        )?;
        tracing::info!(category = node.name(), "added category");

        Ok(node)
    }

    /// Apply one edit to a single category, save, and audit it
    fn edit<F>(&self, identifier: &str, apply: F) -> TallyResult<CategoryNode>
    where
        F: FnOnce(&mut CategoryTree, CategoryId) -> TallyResult<()>,
    {
        let before = self.resolve(identifier)?;
        let id = before.id();

        let after = self.storage.categories.update(|tree| {
            apply(tree, id)?;
            tree.get(id)
                .cloned()
                .ok_or_else(|| TallyError::category_not_found(id.to_string()))
        })?;
        self.storage.categories.save()?;

        self.storage.log_update(
            EntityType::Category,
            id.to_string(),
            Some(after.name().to_string()),
            &before,
            &after,
        )?;

        Ok(after)
    }

    /// Set or clear a category's own monthly allocation
    pub fn set_budget(&self, identifier: &str, amount: Option<Money>) -> TallyResult<CategoryNode> {
        self.edit(identifier, |tree, id| {
            tree.set_fixed_amount(id, amount).map_err(Into::into)
        })
    }

    pub fn set_color(
        &self,
        identifier: &str,
        color: Option<CategoryColor>,
    ) -> TallyResult<CategoryNode> {
        self.edit(identifier, |tree, id| tree.set_color(id, color).map_err(Into::into))
    }

    pub fn set_alias(&self, identifier: &str, alias: Option<&str>) -> TallyResult<CategoryNode> {
        self.edit(identifier, |tree, id| tree.set_alias(id, alias).map_err(Into::into))
    }

    pub fn rename(&self, identifier: &str, new_name: &str) -> TallyResult<CategoryNode> {
        self.edit(identifier, |tree, id| {
            tree.rename(id, new_name.trim()).map_err(Into::into)
        })
    }

    /// Move a category under `new_parent`, or to the top level when `None`
    pub fn move_to(&self, identifier: &str, new_parent: Option<&str>) -> TallyResult<CategoryNode> {
        let parent_id = match new_parent {
            Some(p) => Some(self.resolve(p)?.id()),
            None => None,
        };
        self.edit(identifier, |tree, id| {
            tree.move_node(id, parent_id).map_err(Into::into)
        })
    }

    /// Remove a category and its subtree
    ///
    /// Records labelled with a removed category are kept; they fall into
    /// the "Other" bucket from then on.
    pub fn remove(&self, identifier: &str) -> TallyResult<Vec<CategoryNode>> {
        let target = self.resolve(identifier)?;
        let removed = self
            .storage
            .categories
            .update(|tree| tree.remove(target.id()).map_err(Into::into))?;
        self.storage.categories.save()?;

        for node in &removed {
            self.storage.log_delete(
                EntityType::Category,
                node.id().to_string(),
                Some(node.name().to_string()),
                node,
            )?;
        }
        tracing::info!(category = target.name(), removed = removed.len(), "removed category");

        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Operation;
    use crate::config::paths::TallyPaths;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = TallyPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_add_and_find() {
        let (_temp, storage) = create_test_storage();
        let service = CategoryService::new(&storage);

        service.add("Car", None).unwrap();
        let gas = service.add("Gas", Some("Car")).unwrap();

        assert_eq!(service.find("Car > Gas").unwrap().map(|n| n.id()), Some(gas.id()));
        assert!(service.add("Gas", Some("Car")).is_err());
        assert!(service.add("Oil", Some("Boat")).unwrap_err().is_not_found());
    }

    #[test]
    fn test_set_budget_and_detail() {
        let (_temp, storage) = create_test_storage();
        let service = CategoryService::new(&storage);
        service.add("Car", None).unwrap();
        service.add("Gas", Some("Car")).unwrap();

        service
            .set_budget("Gas", Some(Money::from_cents(15000)))
            .unwrap();
        let detail = service.detail("Car").unwrap();

        assert_eq!(detail.monthly_budget, Some(Money::from_cents(15000)));
        assert_eq!(detail.children, vec!["Gas".to_string()]);
        assert_eq!(detail.path, "Car");
        assert!(service.set_budget("Gas", Some(Money::from_cents(-1))).is_err());
    }

    #[test]
    fn test_edits_are_persisted_and_audited() {
        let (temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);
        service.add("Car", None).unwrap();
        service.rename("Car", "Vehicle").unwrap();

        let reopened = Storage::new(TallyPaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();
        reopened.load_all().unwrap();
        assert!(CategoryService::new(&reopened).find("Vehicle").unwrap().is_some());

        let entries = storage.audit().read_all().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].operation, Operation::Update);
        assert_eq!(
            entries[1].diff_summary.as_deref(),
            Some("name: \"Car\" -> \"Vehicle\"")
        );
    }

    #[test]
    fn test_move_rejects_cycle() {
        let (_temp, storage) = create_test_storage();
        let service = CategoryService::new(&storage);
        service.add("Car", None).unwrap();
        service.add("Gas", Some("Car")).unwrap();

        assert!(service.move_to("Car", Some("Gas")).is_err());
        service.move_to("Gas", None).unwrap();
        assert_eq!(service.tree().unwrap().roots().len(), 2);
    }

    #[test]
    fn test_remove_cascades() {
        let (_temp, storage) = create_test_storage();
        let service = CategoryService::new(&storage);
        service.add("Car", None).unwrap();
        service.add("Gas", Some("Car")).unwrap();

        let removed = service.remove("Car").unwrap();
        assert_eq!(removed.len(), 2);
        assert!(service.tree().unwrap().is_empty());
        assert!(service.remove("Car").unwrap_err().is_not_found());
    }
}
