//! 画廊树：按资源类型分组的画廊文件夹视图

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};

use super::entry::{EntryId, GalleryFolderEntry, GalleryType};

new_key_type! { pub struct GalleryItemId; }

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GalleryItemKind {
    Type(GalleryType),
    Folder {
        structure_id: EntryId,
        resource_type: String,
    },
}

#[derive(Debug, Clone)]
pub struct GalleryItem {
    pub kind: GalleryItemKind,
    pub title: String,
    pub site_path: String,
    pub open: bool,
    pub hidden: bool,
    parent: Option<GalleryItemId>,
    children: Vec<GalleryItemId>,
}

impl GalleryItem {
    fn for_type(gallery_type: GalleryType) -> Self {
        Self {
            title: gallery_type.nice_name.clone(),
            kind: GalleryItemKind::Type(gallery_type),
            site_path: String::new(),
            open: false,
            hidden: false,
            parent: None,
            children: Vec::new(),
        }
    }

    fn for_folder(folder: &GalleryFolderEntry) -> Self {
        Self {
            kind: GalleryItemKind::Folder {
                structure_id: folder.structure_id,
                resource_type: folder.resource_type.clone(),
            },
            title: folder.title.clone(),
            site_path: folder.site_path.clone(),
            open: false,
            hidden: false,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn structure_id(&self) -> Option<EntryId> {
        match &self.kind {
            GalleryItemKind::Folder { structure_id, .. } => Some(*structure_id),
            GalleryItemKind::Type(_) => None,
        }
    }

    pub fn parent(&self) -> Option<GalleryItemId> {
        self.parent
    }

    pub fn children(&self) -> &[GalleryItemId] {
        &self.children
    }
}

#[derive(Default)]
pub struct GalleryTree {
    arena: SlotMap<GalleryItemId, GalleryItem>,
    top_level: Vec<GalleryItemId>,
    by_structure: FxHashMap<EntryId, GalleryItemId>,
    by_type: FxHashMap<String, GalleryItemId>,
}

impl GalleryTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.arena.clear();
        self.top_level.clear();
        self.by_structure.clear();
        self.by_type.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn item(&self, id: GalleryItemId) -> Option<&GalleryItem> {
        self.arena.get(id)
    }

    pub fn item_mut(&mut self, id: GalleryItemId) -> Option<&mut GalleryItem> {
        self.arena.get_mut(id)
    }

    pub fn top_level(&self) -> &[GalleryItemId] {
        &self.top_level
    }

    pub fn children(&self, id: GalleryItemId) -> &[GalleryItemId] {
        self.arena
            .get(id)
            .map(|item| item.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn type_item(&self, type_name: &str) -> Option<GalleryItemId> {
        self.by_type.get(type_name).copied()
    }

    pub fn folder_item(&self, structure_id: EntryId) -> Option<GalleryItemId> {
        self.by_structure.get(&structure_id).copied()
    }

    pub fn contains_folder(&self, structure_id: EntryId) -> bool {
        self.by_structure.contains_key(&structure_id)
    }

    pub fn add_type(&mut self, gallery_type: GalleryType) -> GalleryItemId {
        let name = gallery_type.type_name.clone();
        let id = self.arena.insert(GalleryItem::for_type(gallery_type));
        self.top_level.push(id);
        self.by_type.insert(name, id);
        id
    }

    /// Moves a type item to the first top-level position.
    pub fn move_type_to_top(&mut self, type_name: &str) -> bool {
        let Some(id) = self.type_item(type_name) else {
            return false;
        };
        self.top_level.retain(|t| *t != id);
        self.top_level.insert(0, id);
        true
    }

    /// Appends a single folder item under `parent`, replacing any item already
    /// registered for the same structure id.
    pub fn add_folder(
        &mut self,
        parent: GalleryItemId,
        folder: &GalleryFolderEntry,
    ) -> Option<GalleryItemId> {
        if !self.arena.contains_key(parent) {
            return None;
        }
        if self.by_structure.contains_key(&folder.structure_id) {
            self.remove_folder(folder.structure_id);
        }
        let mut item = GalleryItem::for_folder(folder);
        item.parent = Some(parent);
        let id = self.arena.insert(item);
        self.arena.get_mut(parent)?.children.push(id);
        self.by_structure.insert(folder.structure_id, id);
        Some(id)
    }

    /// Adds `folders` and all of their sub-galleries under `parent`.
    pub fn add_folders_recursive(&mut self, parent: GalleryItemId, folders: &[GalleryFolderEntry]) {
        for folder in folders {
            if let Some(id) = self.add_folder(parent, folder) {
                self.add_folders_recursive(id, &folder.sub_galleries);
            }
        }
    }

    /// Removes the folder item for `structure_id` and its descendants. Returns
    /// false when no such item exists.
    pub fn remove_folder(&mut self, structure_id: EntryId) -> bool {
        let Some(id) = self.by_structure.get(&structure_id).copied() else {
            return false;
        };
        if let Some(parent) = self.arena.get(id).and_then(|item| item.parent) {
            if let Some(parent_item) = self.arena.get_mut(parent) {
                parent_item.children.retain(|c| *c != id);
            }
        }

        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(item) = self.arena.remove(current) else {
                continue;
            };
            if let Some(sid) = item.structure_id() {
                if self.by_structure.get(&sid) == Some(&current) {
                    self.by_structure.remove(&sid);
                }
            }
            stack.extend(item.children);
        }
        true
    }

    /// Top-level type items in display order, skipping hidden ones.
    pub fn visible_types(&self) -> Vec<&GalleryType> {
        self.top_level
            .iter()
            .filter_map(|id| self.arena.get(*id))
            .filter(|item| !item.hidden)
            .filter_map(|item| match &item.kind {
                GalleryItemKind::Type(t) => Some(t),
                GalleryItemKind::Folder { .. } => None,
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/models/gallery_tree.rs"]
mod tests;
