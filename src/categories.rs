//! Categories
//!
//! Navigation tree construction from the flat category list the API returns.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::localization::LocalizedContent;

/// A product category as stored upstream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Category identifier
    pub id: String,

    /// Display name
    #[serde(default)]
    pub name: LocalizedContent,

    /// URL slug
    #[serde(default)]
    pub slug: String,

    /// Parent category, if nested
    #[serde(default)]
    pub parent_id: Option<String>,

    /// Position among siblings
    #[serde(default)]
    pub sort_order: i32,

    /// Whether the category is shown
    #[serde(default = "active_default")]
    pub is_active: bool,
}

fn active_default() -> bool {
    true
}

/// A category with its nested children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryNode<'a> {
    /// The category
    pub category: &'a Category,

    /// Child categories in display order
    pub children: Vec<CategoryNode<'a>>,
}

/// A category positioned in a flattened tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlatCategory<'a> {
    /// Category identifier
    pub id: &'a str,

    /// Display name
    pub name: &'a LocalizedContent,

    /// URL slug
    pub slug: &'a str,

    /// Distance from the root, roots are 0
    pub depth: usize,
}

/// Nest categories under their parents.
///
/// Inactive categories are dropped together with everything beneath them. A category
/// whose parent does not exist becomes a root, as does one member of any parent cycle,
/// so every active category appears exactly once.
pub fn build_category_tree(categories: &[Category]) -> Vec<CategoryNode<'_>> {
    let by_id = index_by_id(categories);

    let visible: FxHashMap<&str, &Category> = categories
        .iter()
        .filter(|category| !is_hidden(category, &by_id))
        .map(|category| (category.id.as_str(), category))
        .collect();

    let mut children: FxHashMap<&str, Vec<&Category>> = FxHashMap::default();
    let mut roots: Vec<&Category> = Vec::new();

    for category in visible.values() {
        match category.parent_id.as_deref() {
            Some(parent) if visible.contains_key(parent) => {
                children.entry(parent).or_default().push(category);
            }
            _ => roots.push(category),
        }
    }

    sort_siblings(&mut roots);
    for siblings in children.values_mut() {
        sort_siblings(siblings);
    }

    let mut placed: FxHashSet<&str> = FxHashSet::default();
    let mut tree: Vec<CategoryNode<'_>> = roots
        .into_iter()
        .map(|root| build_node(root, &children, &mut placed))
        .collect();

    // Anything left unplaced hangs off a parent cycle.
    let mut stranded: Vec<&Category> = visible
        .values()
        .filter(|category| !placed.contains(category.id.as_str()))
        .copied()
        .collect();
    sort_siblings(&mut stranded);

    for category in stranded {
        if !placed.contains(category.id.as_str()) {
            tree.push(build_node(category, &children, &mut placed));
        }
    }

    tree
}

/// Flatten a tree depth-first for indented navigation menus.
pub fn flatten_category_tree<'a>(roots: &[CategoryNode<'a>]) -> Vec<FlatCategory<'a>> {
    let mut flat = Vec::new();
    let mut stack: Vec<(&CategoryNode<'a>, usize)> =
        roots.iter().rev().map(|node| (node, 0)).collect();

    while let Some((node, depth)) = stack.pop() {
        flat.push(FlatCategory {
            id: &node.category.id,
            name: &node.category.name,
            slug: &node.category.slug,
            depth,
        });

        stack.extend(node.children.iter().rev().map(|child| (child, depth + 1)));
    }

    flat
}

/// Breadcrumb trail from the root down to `id`.
///
/// Empty when `id` is unknown. Stops at a missing parent or when a parent cycle
/// would revisit a category.
pub fn category_path<'a>(categories: &'a [Category], id: &str) -> SmallVec<[&'a Category; 4]> {
    let by_id = index_by_id(categories);

    let mut path: SmallVec<[&Category; 4]> = SmallVec::new();
    let mut seen: FxHashSet<&str> = FxHashSet::default();
    let mut current = by_id.get(id).copied();

    while let Some(category) = current {
        if !seen.insert(category.id.as_str()) {
            break;
        }

        path.push(category);
        current = category
            .parent_id
            .as_deref()
            .and_then(|parent| by_id.get(parent).copied());
    }

    path.reverse();
    path
}

fn sort_siblings(siblings: &mut [&Category]) {
    siblings.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then_with(|| a.id.cmp(&b.id)));
}

fn index_by_id(categories: &[Category]) -> FxHashMap<&str, &Category> {
    categories
        .iter()
        .map(|category| (category.id.as_str(), category))
        .collect()
}

/// Whether the category or any of its ancestors is inactive.
fn is_hidden(category: &Category, by_id: &FxHashMap<&str, &Category>) -> bool {
    let mut seen: FxHashSet<&str> = FxHashSet::default();
    let mut current = Some(category);

    while let Some(category) = current {
        if !category.is_active {
            return true;
        }

        if !seen.insert(category.id.as_str()) {
            return false;
        }

        current = category
            .parent_id
            .as_deref()
            .and_then(|parent| by_id.get(parent).copied());
    }

    false
}

fn build_node<'a>(
    category: &'a Category,
    children: &FxHashMap<&str, Vec<&'a Category>>,
    placed: &mut FxHashSet<&'a str>,
) -> CategoryNode<'a> {
    placed.insert(category.id.as_str());

    let kids = children
        .get(category.id.as_str())
        .cloned()
        .unwrap_or_default();

    let mut child_nodes = Vec::with_capacity(kids.len());

    for kid in kids {
        // A parent cycle can place a kid while its siblings are being built.
        if !placed.contains(kid.id.as_str()) {
            child_nodes.push(build_node(kid, children, placed));
        }
    }

    CategoryNode {
        category,
        children: child_nodes,
    }
}
