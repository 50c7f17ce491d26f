//! Category tree model
//!
//! Budget categories form a forest: top-level categories (e.g. "Car",
//! "Housing") own ordered subcategories to any depth. Each node may carry a
//! fixed monthly amount, a color tag, and an alias (the asset type whose
//! payments belong to the category).
//!
//! Nodes live in an arena keyed by [`CategoryId`]; the parent link is a plain
//! id and the owning node's `children` list is the only strong reference.
//! Every edit goes through [`CategoryTree`] so sibling names stay unique and
//! the structure stays acyclic. Deserialized trees are validated before use.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

use super::ids::CategoryId;
use super::money::Money;

/// Maximum length of a category or alias name
pub const MAX_NAME_LEN: usize = 50;

/// Color tag used when charting a category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryColor {
    Red,
    Orange,
    Yellow,
    Green,
    Mint,
    Teal,
    Cyan,
    Blue,
    Indigo,
    Purple,
    Pink,
    Brown,
    Gray,
}

impl CategoryColor {
    /// All colors in palette order
    pub fn all() -> &'static [Self] {
        &[
            Self::Red,
            Self::Orange,
            Self::Yellow,
            Self::Green,
            Self::Mint,
            Self::Teal,
            Self::Cyan,
            Self::Blue,
            Self::Indigo,
            Self::Purple,
            Self::Pink,
            Self::Brown,
            Self::Gray,
        ]
    }

    /// Lowercase name as stored on disk
    pub fn name(&self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Orange => "orange",
            Self::Yellow => "yellow",
            Self::Green => "green",
            Self::Mint => "mint",
            Self::Teal => "teal",
            Self::Cyan => "cyan",
            Self::Blue => "blue",
            Self::Indigo => "indigo",
            Self::Purple => "purple",
            Self::Pink => "pink",
            Self::Brown => "brown",
            Self::Gray => "gray",
        }
    }

    /// Parse a color name (case-insensitive, accepts "grey")
    pub fn parse(s: &str) -> Result<Self, CategoryValidationError> {
        let lower = s.trim().to_lowercase();
        if lower == "grey" {
            return Ok(Self::Gray);
        }
        Self::all()
            .iter()
            .copied()
            .find(|c| c.name() == lower)
            .ok_or_else(|| CategoryValidationError::UnknownColor(s.to_string()))
    }

    /// 256-color ANSI code closest to this tag
    pub fn ansi_code(&self) -> u8 {
        match self {
            Self::Red => 196,
            Self::Orange => 208,
            Self::Yellow => 226,
            Self::Green => 34,
            Self::Mint => 121,
            Self::Teal => 30,
            Self::Cyan => 51,
            Self::Blue => 27,
            Self::Indigo => 54,
            Self::Purple => 129,
            Self::Pink => 213,
            Self::Brown => 130,
            Self::Gray => 244,
        }
    }
}

impl fmt::Display for CategoryColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A single budget category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryNode {
    id: CategoryId,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fixed_amount: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    color: Option<CategoryColor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    alias_name: Option<String>,
    #[serde(default)]
    parent: Option<CategoryId>,
    #[serde(default)]
    children: Vec<CategoryId>,
}

impl CategoryNode {
    fn new(name: String, parent: Option<CategoryId>) -> Self {
        Self {
            id: CategoryId::new(),
            name,
            fixed_amount: None,
            color: None,
            alias_name: None,
            parent,
            children: Vec::new(),
        }
    }

    pub fn id(&self) -> CategoryId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The node's own monthly allocation, excluding subcategories
    pub fn fixed_amount(&self) -> Option<Money> {
        self.fixed_amount
    }

    pub fn color(&self) -> Option<CategoryColor> {
        self.color
    }

    pub fn alias_name(&self) -> Option<&str> {
        self.alias_name.as_deref()
    }

    pub fn parent_id(&self) -> Option<CategoryId> {
        self.parent
    }

    pub fn child_ids(&self) -> &[CategoryId] {
        &self.children
    }

    /// A leaf has no subcategories
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Check whether a transaction label names this node
    pub fn answers_to(&self, label: &str) -> bool {
        self.name == label || self.alias_name.as_deref() == Some(label)
    }
}

impl fmt::Display for CategoryNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Result of resolving a transaction label against the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedCategory<'a> {
    /// Bucket name the amount is reported under
    pub name: &'a str,
    /// The node the label resolved to, if any
    pub node: Option<&'a CategoryNode>,
    /// False when the label matched nothing and fell back to "Other"
    pub matched: bool,
}

/// On-disk shape of the tree: roots in order plus nodes in depth-first order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryTreeData {
    #[serde(default)]
    pub roots: Vec<CategoryId>,
    #[serde(default)]
    pub nodes: Vec<CategoryNode>,
}

/// The forest of budget categories
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CategoryTreeData", into = "CategoryTreeData")]
pub struct CategoryTree {
    roots: Vec<CategoryId>,
    nodes: HashMap<CategoryId, CategoryNode>,
}

impl CategoryTree {
    /// Create an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of categories at all depths
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get a node by ID
    pub fn get(&self, id: CategoryId) -> Option<&CategoryNode> {
        self.nodes.get(&id)
    }

    /// Top-level categories in order
    pub fn roots(&self) -> Vec<&CategoryNode> {
        self.roots.iter().filter_map(|id| self.nodes.get(id)).collect()
    }

    pub fn root_ids(&self) -> &[CategoryId] {
        &self.roots
    }

    /// Direct subcategories of a node in order
    pub fn children(&self, id: CategoryId) -> Vec<&CategoryNode> {
        self.nodes
            .get(&id)
            .map(|node| {
                node.children
                    .iter()
                    .filter_map(|c| self.nodes.get(c))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn parent(&self, id: CategoryId) -> Option<&CategoryNode> {
        self.nodes
            .get(&id)
            .and_then(|n| n.parent)
            .and_then(|p| self.nodes.get(&p))
    }

    /// All nodes paired with their depth, pre-order, roots first
    pub fn walk(&self) -> Vec<(usize, &CategoryNode)> {
        let mut out = Vec::with_capacity(self.nodes.len());
        for root in &self.roots {
            self.walk_from(*root, 0, &mut out);
        }
        out
    }

    fn walk_from<'a>(&'a self, id: CategoryId, depth: usize, out: &mut Vec<(usize, &'a CategoryNode)>) {
        if let Some(node) = self.nodes.get(&id) {
            out.push((depth, node));
            for child in &node.children {
                self.walk_from(*child, depth + 1, out);
            }
        }
    }

    /// Ancestors of a node from its top-level category down to the node itself
    pub fn path_of(&self, id: CategoryId) -> Vec<&CategoryNode> {
        let mut path = Vec::new();
        let mut current = self.nodes.get(&id);
        while let Some(node) = current {
            path.push(node);
            current = node.parent.and_then(|p| self.nodes.get(&p));
        }
        path.reverse();
        path
    }

    /// Display path such as "Car > Gas"
    pub fn path_string(&self, id: CategoryId) -> String {
        self.path_of(id)
            .iter()
            .map(|n| n.name.as_str())
            .collect::<Vec<_>>()
            .join(" > ")
    }

    /// The top-level ancestor of a node (the node itself for roots)
    pub fn root_of(&self, id: CategoryId) -> Option<&CategoryNode> {
        self.path_of(id).into_iter().next()
    }

    /// Check whether `node` sits somewhere below `ancestor`
    pub fn is_descendant(&self, node: CategoryId, ancestor: CategoryId) -> bool {
        let mut current = self.nodes.get(&node).and_then(|n| n.parent);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes.get(&id).and_then(|n| n.parent);
        }
        false
    }

    // === Lookup ===

    /// Find a category by exact name or alias anywhere in the forest
    ///
    /// Searches depth-first, roots in order and children in order; the first
    /// match wins, so a subcategory named "Fast Food" is found even though it
    /// sits below "Food".
    pub fn find_by_name(&self, name: &str) -> Option<&CategoryNode> {
        self.roots
            .iter()
            .find_map(|root| self.find_below(*root, name))
    }

    fn find_below(&self, id: CategoryId, name: &str) -> Option<&CategoryNode> {
        let node = self.nodes.get(&id)?;
        if node.answers_to(name) {
            return Some(node);
        }
        node.children
            .iter()
            .find_map(|child| self.find_below(*child, name))
    }

    /// Find a category by name, alias, ID, or "Parent > Child" path
    pub fn find(&self, identifier: &str) -> Option<&CategoryNode> {
        let identifier = identifier.trim();
        if let Some(node) = self.find_by_name(identifier) {
            return Some(node);
        }
        if identifier.contains('>') {
            return self.find_by_path(identifier);
        }
        self.nodes.values().find(|n| n.id.matches(identifier))
    }

    fn find_by_path(&self, path: &str) -> Option<&CategoryNode> {
        let mut candidates: Vec<CategoryId> = self.roots.clone();
        let mut found = None;
        for segment in path.split('>').map(str::trim) {
            let next = candidates
                .iter()
                .filter_map(|id| self.nodes.get(id))
                .find(|n| n.name == segment)?;
            candidates = next.children.clone();
            found = Some(next);
        }
        found
    }

    /// Resolve a transaction label, falling back to the "Other" bucket
    ///
    /// Unmatched labels go to the top-level category whose name equals
    /// `other_name` case-insensitively. When there is no such category the
    /// result is a bare bucket named `other_name`.
    pub fn resolve_or_other<'a>(&'a self, label: &str, other_name: &'a str) -> ResolvedCategory<'a> {
        if let Some(node) = self.find_by_name(label) {
            return ResolvedCategory {
                name: &node.name,
                node: Some(node),
                matched: true,
            };
        }

        let other_lower = other_name.to_lowercase();
        match self
            .roots()
            .into_iter()
            .find(|n| n.name.to_lowercase() == other_lower)
        {
            Some(node) => ResolvedCategory {
                name: &node.name,
                node: Some(node),
                matched: false,
            },
            None => ResolvedCategory {
                name: other_name,
                node: None,
                matched: false,
            },
        }
    }

    // === Budget rollup ===

    /// Monthly budget of a category including all of its subcategories
    ///
    /// `None` means nothing in the subtree is budgeted; a zero amount means
    /// the subtree is explicitly budgeted at zero. An interior node's own
    /// `fixed_amount` is added on top of its children's rollup.
    pub fn monthly_budget(&self, id: CategoryId) -> Option<Money> {
        self.nodes.get(&id).and_then(|node| self.rollup(node))
    }

    fn rollup(&self, node: &CategoryNode) -> Option<Money> {
        let child_sum = node
            .children
            .iter()
            .filter_map(|c| self.nodes.get(c))
            .filter_map(|c| self.rollup(c))
            .reduce(|a, b| a + b);

        match (child_sum, node.fixed_amount) {
            (None, None) => None,
            (children, own) => Some(children.unwrap_or_default() + own.unwrap_or_default()),
        }
    }

    /// Sum of the rollups of the given categories, `None` if none is budgeted
    pub fn total_of(&self, ids: &[CategoryId]) -> Option<Money> {
        ids.iter()
            .filter_map(|id| self.monthly_budget(*id))
            .reduce(|a, b| a + b)
    }

    /// Total monthly budget across all top-level categories
    pub fn total_budget(&self) -> Option<Money> {
        self.total_of(&self.roots)
    }

    // === Editing ===

    /// Add a top-level category
    pub fn add_root(&mut self, name: &str) -> Result<CategoryId, CategoryValidationError> {
        let name = validate_name(name)?;
        self.ensure_unique_sibling(None, &name, None)?;

        let node = CategoryNode::new(name, None);
        let id = node.id;
        self.roots.push(id);
        self.nodes.insert(id, node);
        Ok(id)
    }

    /// Add a subcategory under `parent`
    pub fn add_child(
        &mut self,
        parent: CategoryId,
        name: &str,
    ) -> Result<CategoryId, CategoryValidationError> {
        let name = validate_name(name)?;
        if !self.nodes.contains_key(&parent) {
            return Err(CategoryValidationError::UnknownCategory(parent.to_string()));
        }
        self.ensure_unique_sibling(Some(parent), &name, None)?;

        let node = CategoryNode::new(name, Some(parent));
        let id = node.id;
        self.nodes.insert(id, node);
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.push(id);
        }
        Ok(id)
    }

    /// Rename a category
    pub fn rename(&mut self, id: CategoryId, name: &str) -> Result<(), CategoryValidationError> {
        let name = validate_name(name)?;
        let parent = self.node(id)?.parent;
        self.ensure_unique_sibling(parent, &name, Some(id))?;
        self.node_mut(id)?.name = name;
        Ok(())
    }

    /// Set or clear a category's own monthly allocation
    pub fn set_fixed_amount(
        &mut self,
        id: CategoryId,
        amount: Option<Money>,
    ) -> Result<(), CategoryValidationError> {
        if amount.is_some_and(|a| a.is_negative()) {
            return Err(CategoryValidationError::NegativeBudget);
        }
        self.node_mut(id)?.fixed_amount = amount;
        Ok(())
    }

    pub fn set_color(
        &mut self,
        id: CategoryId,
        color: Option<CategoryColor>,
    ) -> Result<(), CategoryValidationError> {
        self.node_mut(id)?.color = color;
        Ok(())
    }

    /// Set or clear the asset-type alias a category answers to
    pub fn set_alias(
        &mut self,
        id: CategoryId,
        alias: Option<&str>,
    ) -> Result<(), CategoryValidationError> {
        let alias = alias.map(validate_name).transpose()?;
        self.node_mut(id)?.alias_name = alias;
        Ok(())
    }

    /// Move a category (with its subtree) under a new parent, or to the top level
    ///
    /// Moving a category below itself or one of its descendants is rejected.
    pub fn move_node(
        &mut self,
        id: CategoryId,
        new_parent: Option<CategoryId>,
    ) -> Result<(), CategoryValidationError> {
        let node = self.node(id)?;
        let name = node.name.clone();
        let old_parent = node.parent;

        if let Some(target) = new_parent {
            self.node(target)?;
            if target == id || self.is_descendant(target, id) {
                return Err(CategoryValidationError::CycleDetected(name));
            }
        }
        if old_parent == new_parent {
            return Ok(());
        }
        self.ensure_unique_sibling(new_parent, &name, Some(id))?;

        self.detach(id, old_parent);
        match new_parent {
            Some(target) => {
                if let Some(p) = self.nodes.get_mut(&target) {
                    p.children.push(id);
                }
            }
            None => self.roots.push(id),
        }
        self.node_mut(id)?.parent = new_parent;
        Ok(())
    }

    /// Remove a category and its whole subtree, returning the removed nodes
    pub fn remove(&mut self, id: CategoryId) -> Result<Vec<CategoryNode>, CategoryValidationError> {
        let parent = self.node(id)?.parent;
        self.detach(id, parent);

        let mut removed = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(&current) {
                stack.extend(node.children.iter().copied());
                removed.push(node);
            }
        }
        Ok(removed)
    }

    fn detach(&mut self, id: CategoryId, parent: Option<CategoryId>) {
        match parent {
            Some(p) => {
                if let Some(parent_node) = self.nodes.get_mut(&p) {
                    parent_node.children.retain(|c| *c != id);
                }
            }
            None => self.roots.retain(|r| *r != id),
        }
    }

    fn node(&self, id: CategoryId) -> Result<&CategoryNode, CategoryValidationError> {
        self.nodes
            .get(&id)
            .ok_or_else(|| CategoryValidationError::UnknownCategory(id.to_string()))
    }

    fn node_mut(&mut self, id: CategoryId) -> Result<&mut CategoryNode, CategoryValidationError> {
        self.nodes
            .get_mut(&id)
            .ok_or_else(|| CategoryValidationError::UnknownCategory(id.to_string()))
    }

    fn ensure_unique_sibling(
        &self,
        parent: Option<CategoryId>,
        name: &str,
        except: Option<CategoryId>,
    ) -> Result<(), CategoryValidationError> {
        let siblings: &[CategoryId] = match parent {
            Some(p) => &self.node(p)?.children,
            None => &self.roots,
        };
        let clash = siblings
            .iter()
            .filter(|s| Some(**s) != except)
            .filter_map(|s| self.nodes.get(s))
            .any(|s| s.name == name);
        if clash {
            Err(CategoryValidationError::DuplicateSibling(name.to_string()))
        } else {
            Ok(())
        }
    }

    // === Integrity ===

    /// Check links, sibling uniqueness, and acyclicity
    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        let mut visited: HashSet<CategoryId> = HashSet::with_capacity(self.nodes.len());
        let mut stack: Vec<(CategoryId, Option<CategoryId>)> =
            self.roots.iter().rev().map(|r| (*r, None)).collect();
        self.check_siblings(&self.roots)?;

        while let Some((id, expected_parent)) = stack.pop() {
            let node = self.node(id)?;
            if !visited.insert(id) {
                return Err(CategoryValidationError::CycleDetected(node.name.clone()));
            }
            if node.parent != expected_parent {
                return Err(CategoryValidationError::InconsistentLink(node.name.clone()));
            }
            validate_name(&node.name)?;
            if node.fixed_amount.is_some_and(|a| a.is_negative()) {
                return Err(CategoryValidationError::NegativeBudget);
            }
            self.check_siblings(&node.children)?;
            stack.extend(node.children.iter().rev().map(|c| (*c, Some(id))));
        }

        if let Some(orphan) = self.nodes.values().find(|n| !visited.contains(&n.id)) {
            // Unreachable from the roots means the node sits on a detached cycle
            return Err(CategoryValidationError::CycleDetected(orphan.name.clone()));
        }
        Ok(())
    }

    fn check_siblings(&self, ids: &[CategoryId]) -> Result<(), CategoryValidationError> {
        let mut seen = HashSet::new();
        for id in ids {
            let node = self.node(*id)?;
            if !seen.insert(node.name.as_str()) {
                return Err(CategoryValidationError::DuplicateSibling(node.name.clone()));
            }
        }
        Ok(())
    }
}

impl TryFrom<CategoryTreeData> for CategoryTree {
    type Error = CategoryValidationError;

    fn try_from(data: CategoryTreeData) -> Result<Self, Self::Error> {
        let mut nodes = HashMap::with_capacity(data.nodes.len());
        for node in data.nodes {
            let name = node.name.clone();
            if nodes.insert(node.id, node).is_some() {
                return Err(CategoryValidationError::InconsistentLink(name));
            }
        }
        let tree = Self {
            roots: data.roots,
            nodes,
        };
        tree.validate()?;
        Ok(tree)
    }
}

impl From<CategoryTree> for CategoryTreeData {
    fn from(tree: CategoryTree) -> Self {
        let order: Vec<CategoryId> = tree.walk().into_iter().map(|(_, n)| n.id).collect();
        let CategoryTree { roots, mut nodes } = tree;
        let mut ordered: Vec<CategoryNode> =
            order.iter().filter_map(|id| nodes.remove(id)).collect();
        // Anything unreachable is kept so a bad tree still round-trips to disk
        ordered.extend(nodes.into_values());
        Self {
            roots,
            nodes: ordered,
        }
    }
}

fn validate_name(name: &str) -> Result<String, CategoryValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CategoryValidationError::EmptyName);
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(CategoryValidationError::NameTooLong(name.chars().count()));
    }
    Ok(name.to_string())
}

/// Validation errors for categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    EmptyName,
    NameTooLong(usize),
    NegativeBudget,
    DuplicateSibling(String),
    UnknownCategory(String),
    UnknownColor(String),
    CycleDetected(String),
    InconsistentLink(String),
}

impl fmt::Display for CategoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Category name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Category name too long ({} chars, max {})", len, MAX_NAME_LEN)
            }
            Self::NegativeBudget => write!(f, "Budget amount cannot be negative"),
            Self::DuplicateSibling(name) => {
                write!(f, "A sibling category named '{}' already exists", name)
            }
            Self::UnknownCategory(id) => write!(f, "Unknown category: {}", id),
            Self::UnknownColor(name) => write!(f, "Unknown color: {}", name),
            Self::CycleDetected(name) => {
                write!(f, "Category '{}' would be its own ancestor", name)
            }
            Self::InconsistentLink(name) => {
                write!(f, "Category '{}' has inconsistent parent links", name)
            }
        }
    }
}

impl std::error::Error for CategoryValidationError {}

impl From<CategoryValidationError> for crate::error::TallyError {
    fn from(err: CategoryValidationError) -> Self {
        match err {
            CategoryValidationError::DuplicateSibling(name) => Self::Duplicate {
                entity_type: "Category",
                identifier: name,
            },
            CategoryValidationError::UnknownCategory(id) => Self::category_not_found(id),
            other => Self::Validation(other.to_string()),
        }
    }
}
