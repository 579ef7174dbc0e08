use std::collections::BTreeSet;

use crate::kernel::change::{ChangeType, SitemapChange};
use crate::kernel::services::ports::SitemapController;
use crate::kernel::Effect;
use crate::models::{
    last_segment, parent_folder, GalleryFolderEntry, GalleryItemId, GalleryType, PROPERTY_TITLE,
};

impl super::Store {
    pub(super) fn display_galleries(
        &mut self,
        mut galleries: Vec<(GalleryType, Vec<GalleryFolderEntry>)>,
    ) -> super::DispatchResult {
        let state = &mut self.state;
        state.galleries.clear();

        let folder_name = state.config().galleries_folder_name.clone();
        state.galleries_folder = state
            .tree
            .root()
            .and_then(|root| state.tree.child_by_name(root, &folder_name))
            .and_then(|id| state.tree.item(id))
            .map(|item| item.entry_id);

        galleries.sort_by(|a, b| a.0.nice_name.cmp(&b.0.nice_name));
        state.toolbar.gallery_types = galleries.iter().map(|(t, _)| t.clone()).collect();

        for (gallery_type, folders) in &galleries {
            let type_item = state.galleries.add_type(gallery_type.clone());
            if folders.is_empty() {
                if let Some(item) = state.galleries.item_mut(type_item) {
                    item.hidden = true;
                }
            } else {
                state.galleries.add_folders_recursive(type_item, folders);
            }
        }

        let pinned = state.config().pinned_gallery_types.clone();
        for type_name in pinned.iter().rev() {
            state.galleries.move_type_to_top(type_name);
        }

        tracing::debug!(types = galleries.len(), "galleries displayed");
        super::DispatchResult {
            effects: Vec::new(),
            state_changed: true,
        }
    }

    pub(super) fn display_new_gallery(
        &mut self,
        folder: GalleryFolderEntry,
    ) -> super::DispatchResult {
        let state = &mut self.state;
        let mut effects = Vec::new();

        let parent_path = parent_folder(&folder.site_path)
            .unwrap_or(state.root_site_path())
            .to_string();
        let parent_entry = state
            .item_by_path(&parent_path)
            .and_then(|id| state.tree.item(id))
            .map(|item| item.entry_id);
        match parent_entry {
            Some(parent) => effects.push(Effect::UpdateEntry(parent)),
            None => effects.push(Effect::LoadPath(parent_path)),
        }

        let Some(type_item) = state.galleries.type_item(&folder.resource_type) else {
            tracing::warn!(
                resource_type = %folder.resource_type,
                "new gallery has no gallery type item"
            );
            return super::DispatchResult {
                effects,
                state_changed: false,
            };
        };

        let gallery_parent = parent_entry.and_then(|p| state.galleries.folder_item(p));
        state
            .galleries
            .add_folder(gallery_parent.unwrap_or(type_item), &folder);
        if let Some(item) = gallery_parent.and_then(|p| state.galleries.item_mut(p)) {
            item.open = true;
        }
        if let Some(item) = state.galleries.item_mut(type_item) {
            item.open = true;
            item.hidden = false;
        }

        super::DispatchResult {
            effects,
            state_changed: true,
        }
    }

    /// Replays a sitemap change against the gallery tree.
    pub(super) fn apply_change_to_gallery_tree(
        &mut self,
        controller: &dyn SitemapController,
        change: &SitemapChange,
    ) -> bool {
        let galleries = &mut self.state.galleries;
        match change.change_type {
            ChangeType::Delete => galleries.remove_folder(change.entry_id),
            ChangeType::Create | ChangeType::Undelete => {
                let Some(gallery_type) = change
                    .new_resource_type_id
                    .and_then(|id| controller.gallery_type(id))
                else {
                    return false;
                };
                let Some(type_item) = galleries.type_item(&gallery_type.type_name) else {
                    return false;
                };
                let title = change
                    .property_changes
                    .iter()
                    .find(|m| m.name == PROPERTY_TITLE)
                    .map(|m| m.value.clone())
                    .unwrap_or_default();
                let folder = GalleryFolderEntry {
                    structure_id: change.entry_id,
                    site_path: change.site_path.clone().unwrap_or_default(),
                    resource_type: gallery_type.type_name,
                    title,
                    sub_galleries: Vec::new(),
                };
                galleries.add_folder(type_item, &folder).is_some()
            }
            ChangeType::Modify => {
                let Some(item) = galleries
                    .folder_item(change.entry_id)
                    .and_then(|id| galleries.item_mut(id))
                else {
                    return false;
                };
                let mut changed = false;
                for modification in &change.property_changes {
                    if modification.name == PROPERTY_TITLE {
                        item.title = modification.value.clone();
                        changed = true;
                    }
                }
                if let Some(name) = change.name.as_deref() {
                    if last_segment(&item.site_path) != name {
                        let parent = parent_folder(&item.site_path).unwrap_or("/");
                        item.site_path = format!("{}{}/", parent, name);
                        changed = true;
                    }
                }
                changed
            }
            ChangeType::BumpDetailPage | ChangeType::ClipboardOnly | ChangeType::Remove => false,
        }
    }

    /// Requests the parent folders of gallery children whose entries are not
    /// loaded yet.
    pub(super) fn reduce_gallery_opened(
        &mut self,
        controller: &dyn SitemapController,
        item: GalleryItemId,
    ) -> super::DispatchResult {
        let galleries = &mut self.state.galleries;
        let Some(gallery_item) = galleries.item_mut(item) else {
            return super::DispatchResult::unchanged();
        };
        let state_changed = !gallery_item.open;
        gallery_item.open = true;

        let mut parent_paths = BTreeSet::new();
        for child in galleries.children(item) {
            let Some(child_item) = galleries.item(*child) else {
                continue;
            };
            let Some(structure_id) = child_item.structure_id() else {
                continue;
            };
            if controller.entry_by_id(structure_id).is_none() {
                if let Some(parent) = parent_folder(&child_item.site_path) {
                    parent_paths.insert(parent.to_string());
                }
            }
        }

        super::DispatchResult {
            effects: parent_paths.into_iter().map(Effect::LoadPath).collect(),
            state_changed,
        }
    }
}
