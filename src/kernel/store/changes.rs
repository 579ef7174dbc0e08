use crate::kernel::change::{ChangeType, SitemapChange};
use crate::kernel::services::ports::SitemapController;
use crate::kernel::Effect;
use crate::models::{LoadState, SitemapEntry};

impl super::Store {
    pub(super) fn reduce_change(
        &mut self,
        controller: &dyn SitemapController,
        change: SitemapChange,
    ) -> super::DispatchResult {
        let mut result = match change.change_type {
            ChangeType::Delete => super::DispatchResult {
                effects: Vec::new(),
                state_changed: self.apply_delete(&change),
            },
            ChangeType::Create | ChangeType::Undelete => super::DispatchResult {
                effects: Vec::new(),
                state_changed: self.apply_create(controller, &change),
            },
            ChangeType::BumpDetailPage => match controller.entry_by_id(change.entry_id) {
                Some(entry) => {
                    let detail_changed = self.state.update_detail_page_view(controller, &entry);
                    let changed = self.state.update_all(controller, &entry);
                    super::DispatchResult {
                        effects: Vec::new(),
                        state_changed: detail_changed || changed,
                    }
                }
                None => {
                    tracing::warn!(entry = %change.entry_id, "bumped detail page is unknown");
                    super::DispatchResult::unchanged()
                }
            },
            ChangeType::Modify if change.is_move() => self.apply_move(controller, &change),
            ChangeType::Modify | ChangeType::Remove => match controller.entry_by_id(change.entry_id)
            {
                Some(entry) => super::DispatchResult {
                    effects: Vec::new(),
                    state_changed: self.state.update_all(controller, &entry),
                },
                None => {
                    tracing::warn!(entry = %change.entry_id, "modified entry is unknown");
                    super::DispatchResult::unchanged()
                }
            },
            ChangeType::ClipboardOnly => super::DispatchResult::unchanged(),
        };

        if self.state.is_gallery_mode() {
            result.state_changed |= self.apply_change_to_gallery_tree(controller, &change);
        }
        result
    }

    fn apply_delete(&mut self, change: &SitemapChange) -> bool {
        let tree = &mut self.state.tree;
        let Some(id) = tree.item_id(change.entry_id) else {
            tracing::debug!(entry = %change.entry_id, "delete ignored, no tree item");
            return false;
        };
        if tree.root() == Some(id) {
            tracing::warn!(entry = %change.entry_id, "refusing to delete the root item");
            return false;
        }
        tree.remove_subtree(id);
        true
    }

    fn apply_create(&mut self, controller: &dyn SitemapController, change: &SitemapChange) -> bool {
        let Some(entry) = controller.entry_by_id(change.entry_id) else {
            tracing::warn!(entry = %change.entry_id, "created entry is unknown");
            return false;
        };
        let Some(parent) = change
            .parent_id
            .or(entry.parent_id)
            .and_then(|p| self.state.tree.item_id(p))
        else {
            tracing::debug!(entry = %entry.id, "create ignored, parent not mounted");
            return false;
        };

        let id = self.state.create_sitemap_item(controller, &entry);
        match self.state.tree.insert_child(parent, id, entry.position) {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(error = %e, entry = %entry.id, "failed to insert created item");
                self.state.tree.remove_subtree(id);
                false
            }
        }
    }

    fn apply_move(
        &mut self,
        controller: &dyn SitemapController,
        change: &SitemapChange,
    ) -> super::DispatchResult {
        let Some(entry) = controller.entry_by_id(change.entry_id) else {
            tracing::warn!(entry = %change.entry_id, "moved entry is unknown");
            return super::DispatchResult::unchanged();
        };
        let Some(item) = self.state.tree.item_id(entry.id) else {
            tracing::debug!(entry = %entry.id, "move ignored, no tree item");
            return super::DispatchResult::unchanged();
        };
        let Some(source_parent) = self.state.tree.parent(item) else {
            tracing::debug!(entry = %entry.id, "root cannot move, refreshing instead");
            return super::DispatchResult {
                effects: Vec::new(),
                state_changed: self.state.update_all(controller, &entry),
            };
        };

        let effects = self.state.with_animations_suppressed(|state| {
            state.tree.detach(item);
            let dest = if change.has_new_parent {
                change.parent_id.and_then(|p| state.tree.item_id(p))
            } else {
                Some(source_parent)
            };
            let Some(dest) = dest else {
                tracing::debug!(entry = %entry.id, "move target not mounted, dropping item");
                state.tree.remove_subtree(item);
                return Vec::new();
            };
            if let Err(e) = state.tree.insert_child(dest, item, entry.position) {
                tracing::warn!(error = %e, entry = %entry.id, "failed to move item");
                state.tree.remove_subtree(item);
                return Vec::new();
            }
            state.update_all(controller, &entry);
            let (_, effects) = state.ensure_visible(entry.id);
            effects
        });

        super::DispatchResult {
            effects,
            state_changed: true,
        }
    }

    pub(super) fn reduce_children_loaded(
        &mut self,
        controller: &dyn SitemapController,
        entry: SitemapEntry,
        set_open: bool,
    ) -> super::DispatchResult {
        let Some(id) = self.state.tree.item_id(entry.id) else {
            tracing::debug!(entry = %entry.id, "load ignored, no tree item");
            return super::DispatchResult::unchanged();
        };

        self.state.with_animations_suppressed(|state| {
            state.tree.clear_children(id);
            for child in &entry.sub_entries {
                let child_id = state.create_sitemap_item(controller, child);
                if let Err(e) = state.tree.add_child(id, child_id) {
                    tracing::warn!(error = %e, entry = %child.id, "failed to attach loaded child");
                }
            }
            if let Some(item) = state.tree.item_mut(id) {
                item.load_state = LoadState::Loaded;
            }
        });

        let mut effects = Vec::new();
        if set_open {
            let (_, open_effects) = self.state.open_item_id(id);
            effects.extend(open_effects);
        }
        effects.push(Effect::RecomputeProperties);

        tracing::debug!(
            entry = %entry.id,
            children = entry.sub_entries.len(),
            "children loaded"
        );
        super::DispatchResult {
            effects,
            state_changed: true,
        }
    }
}
