//! Navigation menu tree.
//!
//! Nav rows are flat in the store (each row points at an optional parent).
//! Rendering needs a tree filtered for the current viewer, so this module
//! builds one from the visible rows. The sorted visible rows are cached
//! process-wide in [`NavCache`]; the store invalidates the cache whenever a
//! nav row is written or deleted.

use crate::models::NavItem;
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Who is looking at the menu.
#[derive(Debug, Clone, Default)]
pub struct Viewer {
    pub authenticated: bool,
    pub groups: Vec<String>,
}

impl Viewer {
    pub fn anonymous() -> Self {
        Self::default()
    }

    fn can_see(&self, item: &NavItem) -> bool {
        if item.login_required && !self.authenticated {
            return false;
        }
        if item.allowed_groups.is_empty() {
            return true;
        }
        item.allowed_groups.iter().any(|g| self.groups.contains(g))
    }
}

/// One rendered menu entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavNode {
    pub title: String,
    pub url: String,
    pub external: bool,
    pub new_tab: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub icon: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NavNode>,
}

/// Visible rows sorted by `(order, title)`.
pub fn visible_sorted(items: &[NavItem]) -> Vec<NavItem> {
    let mut visible: Vec<NavItem> = items.iter().filter(|i| i.visible).cloned().collect();
    visible.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.title.cmp(&b.title)));
    visible
}

/// Build the menu tree for `viewer` from rows already sorted by
/// [`visible_sorted`].
///
/// A child whose parent is hidden (or filtered out for this viewer) is
/// dropped along with that parent's subtree.
pub fn build_nav_tree(sorted: &[NavItem], viewer: &Viewer) -> Vec<NavNode> {
    build_level(sorted, None, viewer)
}

fn build_level(sorted: &[NavItem], parent: Option<u64>, viewer: &Viewer) -> Vec<NavNode> {
    sorted
        .iter()
        .filter(|item| item.parent == parent && viewer.can_see(item))
        .map(|item| NavNode {
            title: item.title.clone(),
            url: item.link().to_string(),
            external: item.external,
            new_tab: item.new_tab,
            icon: item.icon.clone(),
            children: build_level(sorted, Some(item.id), viewer),
        })
        .collect()
}

/// Process-wide cache of the sorted visible nav rows.
///
/// Invalidation bumps a generation counter, which cannot fail, and then
/// tries to drop the cached rows. If the slot is busy the drop is skipped;
/// the stale entry is still ignored because its generation no longer
/// matches.
#[derive(Debug, Default)]
pub struct NavCache {
    generation: AtomicU64,
    slot: RwLock<Option<(u64, Vec<NavItem>)>>,
}

impl NavCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached rows, or `load()` stored under the current generation.
    pub fn get_or_load(&self, load: impl FnOnce() -> Vec<NavItem>) -> Vec<NavItem> {
        let current = self.generation.load(Ordering::Acquire);
        if let Some((generation, rows)) = self.slot.read().as_ref()
            && *generation == current
        {
            return rows.clone();
        }
        let rows = load();
        *self.slot.write() = Some((current, rows.clone()));
        rows
    }

    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        match self.slot.try_write() {
            Some(mut slot) => *slot = None,
            None => tracing::debug!("nav cache busy; stale entry left to expire"),
        }
    }

    pub fn is_warm(&self) -> bool {
        let current = self.generation.load(Ordering::Acquire);
        matches!(self.slot.read().as_ref(), Some((generation, _)) if *generation == current)
    }
}
