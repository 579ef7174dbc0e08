//! 站点地图视图状态
//!
//! Explicitly constructed application context: tree items, gallery items,
//! toolbar and mode. The store is the only writer.

use std::time::Instant;

use crate::kernel::services::ports::{SitemapConfig, SitemapController};
use crate::kernel::Effect;
use crate::models::{
    Background, EditorMode, EntryId, GalleryTree, ItemId, LoadState, SitemapData, SitemapEntry,
    SitemapTree, TreeItem,
};

pub const NAVIGATION_LEVEL_ICON: &str = "cms_type_icon navigation_level";
pub const NEW_DISABLED_IN_VFS_MODE: &str = "Creating new pages is only possible in navigation mode";

/// Icon classes for a resource type; files also get a suffix class.
pub fn resource_icon(type_name: &str, site_path: Option<&str>) -> String {
    let mut icon = format!("cms_type_icon cms_type_icon_{}", type_name);
    let suffix = site_path
        .filter(|p| !p.ends_with('/'))
        .and_then(|p| p.rsplit('/').next())
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty());
    if let Some(ext) = suffix {
        icon.push_str(" cms_file_icon_");
        icon.push_str(&ext.to_ascii_lowercase());
    }
    icon
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToolbarState {
    pub new_enabled: bool,
    pub new_disabled_reason: Option<String>,
    pub galleries_mode: bool,
    pub gallery_types: Vec<crate::models::GalleryType>,
}

impl Default for ToolbarState {
    fn default() -> Self {
        Self {
            new_enabled: true,
            new_disabled_reason: None,
            galleries_mode: false,
            gallery_types: Vec::new(),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NotificationKind {
    Warning,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

pub struct SitemapViewState {
    pub tree: SitemapTree,
    pub galleries: GalleryTree,
    pub toolbar: ToolbarState,
    editor_mode: EditorMode,
    main_tree_visible: bool,
    gallery_tree_visible: bool,
    root_site_path: String,
    return_code: Option<String>,
    parent_sitemap: Option<String>,
    pub(crate) galleries_folder: Option<EntryId>,
    initializing: bool,
    notifications: Vec<Notification>,
    config: SitemapConfig,
}

impl SitemapViewState {
    pub fn new(data: &SitemapData, config: SitemapConfig) -> Self {
        Self {
            tree: SitemapTree::new(),
            galleries: GalleryTree::new(),
            toolbar: ToolbarState::default(),
            editor_mode: EditorMode::Navigation,
            main_tree_visible: true,
            gallery_tree_visible: false,
            root_site_path: data.root.site_path.clone(),
            return_code: data.return_code.clone(),
            parent_sitemap: data.parent_sitemap.clone().filter(|p| !p.trim().is_empty()),
            galleries_folder: None,
            initializing: false,
            notifications: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &SitemapConfig {
        &self.config
    }

    pub fn editor_mode(&self) -> EditorMode {
        self.editor_mode
    }

    pub fn is_gallery_mode(&self) -> bool {
        self.editor_mode == EditorMode::Galleries
    }

    pub fn is_navigation_mode(&self) -> bool {
        self.editor_mode == EditorMode::Navigation
    }

    pub fn main_tree_visible(&self) -> bool {
        self.main_tree_visible
    }

    pub fn gallery_tree_visible(&self) -> bool {
        self.gallery_tree_visible
    }

    pub fn root_site_path(&self) -> &str {
        &self.root_site_path
    }

    pub fn parent_sitemap(&self) -> Option<&str> {
        self.parent_sitemap.as_deref()
    }

    pub fn galleries_folder(&self) -> Option<EntryId> {
        self.galleries_folder
    }

    pub fn is_initializing(&self) -> bool {
        self.initializing
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn push_notification(&mut self, kind: NotificationKind, message: impl Into<String>) {
        self.notifications.push(Notification {
            kind,
            message: message.into(),
        });
    }

    pub fn root_item(&self) -> Option<ItemId> {
        self.tree.root()
    }

    /// Builds the root item from the initial data and expands the open path.
    pub(crate) fn initiate_tree_items(
        &mut self,
        controller: &dyn SitemapController,
        data: &SitemapData,
    ) -> Vec<Effect> {
        let mut effects = Vec::new();

        let root_id = self.create_sitemap_item(controller, &data.root);
        if let Err(e) = self.tree.set_root(root_id) {
            tracing::error!(error = %e, "failed to install sitemap root item");
            return effects;
        }
        if let Some(root) = self.tree.item_mut(root_id) {
            root.load_state = LoadState::Loaded;
            root.open = true;
        }
        effects.push(Effect::RecomputeProperties);

        if !controller.is_editable() {
            let reason = data.no_edit_reason.clone().unwrap_or_default();
            self.push_notification(
                NotificationKind::Warning,
                format!("The sitemap is not editable: {}", reason),
            );
        }

        if let Some(open_path) = data.open_path.as_deref().filter(|p| !p.trim().is_empty()) {
            self.initializing = true;
            let (_, open_effects) = self.open_items_on_path(open_path);
            effects.extend(open_effects);
            self.initializing = false;
        }

        effects
    }

    pub fn icon_for_entry(&self, controller: &dyn SitemapController, entry: &SitemapEntry) -> String {
        if !entry.sub_sitemap && entry.navigation_level {
            return NAVIGATION_LEVEL_ICON.to_string();
        }
        let mut icon = resource_icon(&entry.resource_type_name, Some(&entry.site_path));
        if self.is_navigation_mode() {
            if controller.is_detail_page(entry.id) {
                if let Some(info) = controller.detail_page_info(entry.id) {
                    icon = resource_icon(&info.icon_type, None);
                }
            } else if !entry.sub_sitemap {
                if let Some(default_type) = entry
                    .default_file_type
                    .as_deref()
                    .filter(|t| !t.trim().is_empty())
                {
                    icon = resource_icon(default_type, None);
                }
            }
        }
        icon
    }

    /// Whether the entry is the page the user came from.
    pub fn is_last_page(&self, entry: &SitemapEntry) -> bool {
        let Some(code) = self.return_code.as_deref() else {
            return false;
        };
        (entry.in_navigation && entry.id.to_string() == code)
            || entry
                .default_file_id
                .is_some_and(|id| id.to_string() == code)
    }

    pub fn create_item(&mut self, controller: &dyn SitemapController, entry: &SitemapEntry) -> ItemId {
        let mut item = TreeItem::from_entry(entry);
        item.icon = self.icon_for_entry(controller, entry);
        if self.is_last_page(entry) {
            item.background = Background::Yellow;
        }
        self.tree.insert_detached(item)
    }

    /// Creates the item for `entry` and items for all of its sub-entries.
    pub fn create_sitemap_item(
        &mut self,
        controller: &dyn SitemapController,
        entry: &SitemapEntry,
    ) -> ItemId {
        let id = self.create_item(controller, entry);
        for child in &entry.sub_entries {
            let child_id = self.create_sitemap_item(controller, child);
            if let Err(e) = self.tree.add_child(id, child_id) {
                tracing::warn!(error = %e, entry = %child.id, "failed to attach child item");
            }
        }
        id
    }

    /// Lazy-open handler.
    pub fn open_item(&mut self, entry: EntryId) -> (bool, Vec<Effect>) {
        let Some(id) = self.tree.item_id(entry) else {
            tracing::debug!(entry = %entry, "open ignored, no tree item");
            return (false, Vec::new());
        };
        self.open_item_id(id)
    }

    pub(crate) fn open_item_id(&mut self, id: ItemId) -> (bool, Vec<Effect>) {
        let Some(item) = self.tree.item(id) else {
            return (false, Vec::new());
        };
        if item.open {
            return (false, Vec::new());
        }
        let entry_id = item.entry_id;
        let load_state = item.load_state;

        match load_state {
            LoadState::Unloaded => {
                if let Some(item) = self.tree.item_mut(id) {
                    item.load_state = LoadState::Loading;
                    item.open = false;
                }
                tracing::trace!(entry = %entry_id, "fetching children");
                (
                    true,
                    vec![Effect::FetchChildren {
                        id: entry_id,
                        set_open: true,
                    }],
                )
            }
            LoadState::Loading => (false, Vec::new()),
            LoadState::Loaded => {
                if let Some(item) = self.tree.item_mut(id) {
                    item.open = true;
                }
                let first_child_unloaded = self
                    .tree
                    .children(id)
                    .first()
                    .and_then(|c| self.tree.item(*c))
                    .is_some_and(|c| c.load_state == LoadState::Unloaded);
                if !self.initializing && first_child_unloaded {
                    tracing::trace!(entry = %entry_id, "prefetching grandchildren");
                    return (
                        true,
                        vec![Effect::FetchChildren {
                            id: entry_id,
                            set_open: false,
                        }],
                    );
                }
                (true, Vec::new())
            }
        }
    }

    pub fn close_item(&mut self, entry: EntryId) -> bool {
        match self.tree.item_for_entry_mut(entry) {
            Some(item) if item.open => {
                item.open = false;
                true
            }
            _ => false,
        }
    }

    /// Refreshes display fields of the entry's item and, recursively, of its
    /// sub-entries' items. Stops at entries without an item.
    pub fn update_all(&mut self, controller: &dyn SitemapController, entry: &SitemapEntry) -> bool {
        let icon = self.icon_for_entry(controller, entry);
        let Some(item) = self.tree.item_for_entry_mut(entry.id) else {
            return false;
        };
        item.update_entry(entry);
        item.icon = icon;
        for child in &entry.sub_entries {
            self.update_all(controller, child);
        }
        true
    }

    pub fn update_entries_by_id(
        &mut self,
        controller: &dyn SitemapController,
        ids: &[EntryId],
    ) -> bool {
        let mut changed = false;
        for entry in controller.entries_by_id(ids) {
            let icon = self.icon_for_entry(controller, &entry);
            if let Some(item) = self.tree.item_for_entry_mut(entry.id) {
                item.update_entry(&entry);
                item.icon = icon;
                changed = true;
            }
        }
        changed
    }

    pub fn update_detail_page_view(
        &mut self,
        controller: &dyn SitemapController,
        entry: &SitemapEntry,
    ) -> bool {
        if !controller.is_detail_page(entry.id) {
            return false;
        }
        let mut ids = vec![entry.id];
        ids.extend(controller.detail_page_ids());
        self.update_entries_by_id(controller, &ids)
    }

    /// Recomputes the icon of every mounted item.
    pub fn refresh_icons(&mut self, controller: &dyn SitemapController) {
        let ids: Vec<EntryId> = self.tree.items().map(|(_, item)| item.entry_id).collect();
        for entry in controller.entries_by_id(&ids) {
            let icon = self.icon_for_entry(controller, &entry);
            if let Some(item) = self.tree.item_for_entry_mut(entry.id) {
                item.icon = icon;
            }
        }
    }

    /// Site path relative to the root, `None` when `path` is outside of it.
    fn relative_path<'a>(&self, path: &'a str) -> Option<&'a str> {
        if let Some(rest) = path.strip_prefix(self.root_site_path.as_str()) {
            return Some(rest);
        }
        if self.root_site_path.strip_suffix('/') == Some(path) {
            return Some("");
        }
        None
    }

    pub fn item_by_path(&self, path: &str) -> Option<ItemId> {
        let mut current = self.tree.root()?;
        let remaining = self.relative_path(path)?;
        for name in remaining.split('/').filter(|s| !s.trim().is_empty()) {
            current = self.tree.child_by_name(current, name)?;
        }
        Some(current)
    }

    /// The root item and every item found along `path`.
    pub fn items_on_path(&self, path: &str) -> Vec<ItemId> {
        let mut result = Vec::new();
        let Some(root) = self.tree.root() else {
            return result;
        };
        result.push(root);
        let Some(remaining) = self.relative_path(path) else {
            return result;
        };

        let mut current = root;
        for name in remaining.split('/').filter(|s| !s.trim().is_empty()) {
            match self.tree.child_by_name(current, name) {
                Some(child) => {
                    result.push(child);
                    current = child;
                }
                None => break,
            }
        }
        result
    }

    pub fn open_items_on_path(&mut self, path: &str) -> (bool, Vec<Effect>) {
        let mut changed = false;
        let mut effects = Vec::new();
        for id in self.items_on_path(path) {
            let (c, e) = self.open_item_id(id);
            changed |= c;
            effects.extend(e);
        }
        (changed, effects)
    }

    /// Opens every ancestor of the entry's item and scrolls it into view.
    pub fn ensure_visible(&mut self, entry: EntryId) -> (bool, Vec<Effect>) {
        let Some(id) = self.tree.item_id(entry) else {
            return (false, Vec::new());
        };
        let mut changed = false;
        let mut effects = Vec::new();
        for ancestor in self.tree.ancestors(id) {
            let (c, e) = self.open_item_id(ancestor);
            changed |= c;
            effects.extend(e);
        }
        effects.push(Effect::ScrollIntoView(entry));
        (changed, effects)
    }

    pub fn highlight_path(&mut self, path: &str, now: Instant) -> (bool, Vec<Effect>) {
        let (mut changed, effects) = self.open_items_on_path(path);
        let until = now + self.config.highlight_duration();
        match self.item_by_path(path).and_then(|id| self.tree.item_mut(id)) {
            Some(item) => {
                item.highlight_until = Some(until);
                changed = true;
            }
            None => tracing::debug!(path, "highlight skipped, path not found"),
        }
        (changed, effects)
    }

    /// Clears highlights that expired at `now`.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut changed = false;
        for (_, item) in self.tree.items_mut() {
            if item.highlight_until.is_some_and(|until| until <= now) {
                item.highlight_until = None;
                changed = true;
            }
        }
        changed
    }

    /// Splits the loaded descendants of `path` into those whose items are
    /// loaded and the rest.
    pub fn open_and_closed_descendants(
        &self,
        controller: &dyn SitemapController,
        path: &str,
    ) -> (Vec<SitemapEntry>, Vec<SitemapEntry>) {
        let mut open = Vec::new();
        let mut closed = Vec::new();
        for entry in controller.loaded_descendants(path) {
            let loaded = self
                .item_by_path(&entry.site_path)
                .and_then(|id| self.tree.item(id))
                .is_some_and(|item| item.load_state == LoadState::Loaded);
            if loaded {
                open.push(entry);
            } else {
                closed.push(entry);
            }
        }
        (open, closed)
    }

    pub fn set_editor_mode(
        &mut self,
        controller: &dyn SitemapController,
        mode: EditorMode,
    ) -> (bool, Vec<Effect>) {
        if mode == self.editor_mode {
            return (false, Vec::new());
        }
        self.editor_mode = mode;
        let mut effects = Vec::new();

        match mode {
            EditorMode::Galleries => {
                self.main_tree_visible = false;
                self.gallery_tree_visible = true;
                effects.push(Effect::LoadGalleries);
            }
            EditorMode::Navigation => {
                self.main_tree_visible = true;
                self.gallery_tree_visible = false;
                self.toolbar.new_enabled = true;
                self.toolbar.new_disabled_reason = None;
            }
            EditorMode::Vfs => {
                self.main_tree_visible = true;
                self.gallery_tree_visible = false;
                self.toolbar.new_enabled = false;
                self.toolbar.new_disabled_reason = Some(NEW_DISABLED_IN_VFS_MODE.to_string());
            }
        }

        if self.tree.root().is_some() {
            self.refresh_icons(controller);
        }
        self.toolbar.galleries_mode = self.is_gallery_mode();
        tracing::debug!(mode = ?mode, "editor mode changed");
        (true, effects)
    }

    /// Runs `f` with tree animations off; they are restored once `f` returns.
    pub fn with_animations_suppressed<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let prev = self.tree.suppress_animations();
        let result = f(self);
        self.tree.restore_animations(prev);
        result
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/state.rs"]
mod tests;
