//! 站点地图树：视图层的树节点 arena
//!
//! Items are a derived projection of controller entries. Children are ordered
//! id lists; the entry index maps each entry to at most one live item.

use compact_str::CompactString;
use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use std::fmt;
use std::time::Instant;

use super::entry::{EntryId, SitemapEntry};

new_key_type! { pub struct ItemId; }

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LoadState {
    Unloaded,
    Loading,
    Loaded,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Background {
    #[default]
    Default,
    Yellow,
}

#[derive(Debug, PartialEq, Eq)]
pub enum SitemapTreeError {
    InvalidItemId,
    MoveIntoDescendant,
}

impl fmt::Display for SitemapTreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SitemapTreeError::InvalidItemId => write!(f, "invalid tree item id"),
            SitemapTreeError::MoveIntoDescendant => {
                write!(f, "cannot move item into its own subtree")
            }
        }
    }
}

impl std::error::Error for SitemapTreeError {}

#[derive(Debug, Clone)]
pub struct TreeItem {
    pub entry_id: EntryId,
    pub name: CompactString,
    pub site_path: String,
    pub title: String,
    pub icon: String,
    pub in_navigation: bool,
    pub load_state: LoadState,
    pub open: bool,
    pub background: Background,
    pub highlight_until: Option<Instant>,
    parent: Option<ItemId>,
    children: Vec<ItemId>,
}

impl TreeItem {
    pub fn from_entry(entry: &SitemapEntry) -> Self {
        let load_state = if entry.children_loaded_initially {
            LoadState::Loaded
        } else {
            LoadState::Unloaded
        };
        Self {
            entry_id: entry.id,
            name: CompactString::from(super::entry::last_segment(&entry.site_path)),
            site_path: entry.site_path.clone(),
            title: entry.title.clone(),
            icon: String::new(),
            in_navigation: entry.in_navigation,
            load_state,
            open: false,
            background: Background::Default,
            highlight_until: None,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Refreshes the display fields from a newer copy of the entry.
    pub fn update_entry(&mut self, entry: &SitemapEntry) {
        self.title = entry.title.clone();
        self.in_navigation = entry.in_navigation;
        self.update_site_path(&entry.site_path);
    }

    pub fn update_site_path(&mut self, site_path: &str) {
        if self.site_path != site_path {
            self.site_path = site_path.to_string();
            self.name = CompactString::from(super::entry::last_segment(site_path));
        }
    }

    pub fn parent(&self) -> Option<ItemId> {
        self.parent
    }

    pub fn children(&self) -> &[ItemId] {
        &self.children
    }

    pub fn is_highlighted(&self) -> bool {
        self.highlight_until.is_some()
    }
}

pub struct SitemapTree {
    arena: SlotMap<ItemId, TreeItem>,
    root: Option<ItemId>,
    by_entry: FxHashMap<EntryId, ItemId>,
    animation_enabled: bool,
    suppressed_regions: u64,
}

impl Default for SitemapTree {
    fn default() -> Self {
        Self::new()
    }
}

impl SitemapTree {
    pub fn new() -> Self {
        Self {
            arena: SlotMap::with_key(),
            root: None,
            by_entry: FxHashMap::default(),
            animation_enabled: true,
            suppressed_regions: 0,
        }
    }

    pub fn root(&self) -> Option<ItemId> {
        self.root
    }

    /// Installs `id` as the root, dropping any previous tree.
    pub fn set_root(&mut self, id: ItemId) -> Result<(), SitemapTreeError> {
        if !self.arena.contains_key(id) {
            return Err(SitemapTreeError::InvalidItemId);
        }
        if let Some(old) = self.root.take() {
            if old != id {
                self.remove_subtree(old);
            }
        }
        self.detach(id);
        self.root = Some(id);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn items(&self) -> impl Iterator<Item = (ItemId, &TreeItem)> {
        self.arena.iter()
    }

    pub fn items_mut(&mut self) -> impl Iterator<Item = (ItemId, &mut TreeItem)> {
        self.arena.iter_mut()
    }

    pub fn item(&self, id: ItemId) -> Option<&TreeItem> {
        self.arena.get(id)
    }

    pub fn item_mut(&mut self, id: ItemId) -> Option<&mut TreeItem> {
        self.arena.get_mut(id)
    }

    pub fn item_id(&self, entry: EntryId) -> Option<ItemId> {
        self.by_entry.get(&entry).copied()
    }

    pub fn item_for_entry(&self, entry: EntryId) -> Option<&TreeItem> {
        self.item_id(entry).and_then(|id| self.arena.get(id))
    }

    pub fn item_for_entry_mut(&mut self, entry: EntryId) -> Option<&mut TreeItem> {
        let id = self.item_id(entry)?;
        self.arena.get_mut(id)
    }

    pub fn parent(&self, id: ItemId) -> Option<ItemId> {
        self.arena.get(id).and_then(|item| item.parent)
    }

    pub fn children(&self, id: ItemId) -> &[ItemId] {
        self.arena
            .get(id)
            .map(|item| item.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn child_count(&self, id: ItemId) -> usize {
        self.children(id).len()
    }

    pub fn child_by_name(&self, id: ItemId, name: &str) -> Option<ItemId> {
        self.children(id)
            .iter()
            .copied()
            .find(|child| self.arena.get(*child).is_some_and(|c| c.name == name))
    }

    /// Ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: ItemId) -> Vec<ItemId> {
        let mut result = Vec::new();
        let mut current = self.parent(id);
        while let Some(parent) = current {
            result.push(parent);
            current = self.parent(parent);
        }
        result
    }

    /// Adds a detached item and registers it for its entry. A stale item for
    /// the same entry is removed first so an entry never maps to two items.
    pub fn insert_detached(&mut self, item: TreeItem) -> ItemId {
        let entry_id = item.entry_id;
        if let Some(stale) = self.by_entry.get(&entry_id).copied() {
            tracing::debug!(entry = %entry_id, "replacing stale tree item");
            self.remove_subtree(stale);
        }
        let id = self.arena.insert(item);
        self.by_entry.insert(entry_id, id);
        id
    }

    /// Inserts `child` under `parent` at `index`, appending when the index is
    /// at or past the current child count. Returns the index actually used.
    pub fn insert_child(
        &mut self,
        parent: ItemId,
        child: ItemId,
        index: usize,
    ) -> Result<usize, SitemapTreeError> {
        if !self.arena.contains_key(parent) || !self.arena.contains_key(child) {
            return Err(SitemapTreeError::InvalidItemId);
        }
        if parent == child || self.is_ancestor(child, parent) {
            return Err(SitemapTreeError::MoveIntoDescendant);
        }

        self.detach(child);

        let children = &mut self
            .arena
            .get_mut(parent)
            .ok_or(SitemapTreeError::InvalidItemId)?
            .children;
        let index = if index < children.len() {
            children.insert(index, child);
            index
        } else {
            children.push(child);
            children.len() - 1
        };

        self.arena
            .get_mut(child)
            .ok_or(SitemapTreeError::InvalidItemId)?
            .parent = Some(parent);
        Ok(index)
    }

    pub fn add_child(&mut self, parent: ItemId, child: ItemId) -> Result<usize, SitemapTreeError> {
        self.insert_child(parent, child, usize::MAX)
    }

    /// Unlinks `id` from its parent. The item stays in the arena.
    pub fn detach(&mut self, id: ItemId) -> Option<ItemId> {
        let parent = self.arena.get_mut(id)?.parent.take()?;
        if let Some(parent_item) = self.arena.get_mut(parent) {
            parent_item.children.retain(|c| *c != id);
        }
        Some(parent)
    }

    /// Detaches `id` and drops it and its descendants from the arena and the
    /// entry index.
    pub fn remove_subtree(&mut self, id: ItemId) {
        self.detach(id);
        if self.root == Some(id) {
            self.root = None;
        }

        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(item) = self.arena.remove(current) else {
                continue;
            };
            if self.by_entry.get(&item.entry_id) == Some(&current) {
                self.by_entry.remove(&item.entry_id);
            }
            stack.extend(item.children);
        }
    }

    pub fn clear_children(&mut self, id: ItemId) {
        let children = match self.arena.get(id) {
            Some(item) => item.children.clone(),
            None => return,
        };
        for child in children {
            self.remove_subtree(child);
        }
    }

    pub fn is_ancestor(&self, ancestor: ItemId, mut descendant: ItemId) -> bool {
        while let Some(parent) = self.parent(descendant) {
            if parent == ancestor {
                return true;
            }
            descendant = parent;
        }
        false
    }

    /// Items of the subtree rooted at `id`, pre-order.
    pub fn subtree(&self, id: ItemId) -> Vec<ItemId> {
        let mut result = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(item) = self.arena.get(current) else {
                continue;
            };
            result.push(current);
            stack.extend(item.children.iter().rev().copied());
        }
        result
    }

    pub fn animation_enabled(&self) -> bool {
        self.animation_enabled
    }

    /// Number of animation-suppressed regions that have completed.
    pub fn suppressed_regions(&self) -> u64 {
        self.suppressed_regions
    }

    /// Runs `f` with transition animations off, restoring the previous value
    /// once `f` returns.
    pub fn with_animations_suppressed<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let prev = self.suppress_animations();
        let result = f(self);
        self.restore_animations(prev);
        result
    }

    /// Turns animations off and returns the previous value for
    /// [`restore_animations`](Self::restore_animations).
    pub fn suppress_animations(&mut self) -> bool {
        std::mem::replace(&mut self.animation_enabled, false)
    }

    pub fn restore_animations(&mut self, prev: bool) {
        self.animation_enabled = prev;
        self.suppressed_regions = self.suppressed_regions.saturating_add(1);
    }
}

#[derive(Debug, Clone)]
pub struct SitemapTreeRow {
    pub id: ItemId,
    pub entry_id: EntryId,
    pub depth: u16,
    pub name: CompactString,
    pub title: String,
    pub is_open: bool,
    pub load_state: LoadState,
    pub highlighted: bool,
}

impl SitemapTree {
    /// Rows of every visible item: the root and children of open items.
    pub fn flatten_for_view(&self) -> Vec<SitemapTreeRow> {
        let mut result = Vec::new();
        let Some(root) = self.root else {
            return result;
        };
        let mut stack: Vec<(ItemId, u16)> = vec![(root, 0)];

        while let Some((id, depth)) = stack.pop() {
            let Some(item) = self.arena.get(id) else {
                continue;
            };
            result.push(SitemapTreeRow {
                id,
                entry_id: item.entry_id,
                depth,
                name: item.name.clone(),
                title: item.title.clone(),
                is_open: item.open,
                load_state: item.load_state,
                highlighted: item.is_highlighted(),
            });

            if item.open {
                for child in item.children.iter().rev() {
                    stack.push((*child, depth + 1));
                }
            }
        }

        result
    }
}

#[cfg(test)]
#[path = "../../tests/unit/models/sitemap_tree.rs"]
mod tests;
