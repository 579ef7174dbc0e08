//! 内存控制器：权威条目存储
//!
//! Entries are kept flat, keyed by id, with children as ordered id lists.
//! Site paths and positions are derived from the parent chain on the way out.
//! Structural operations update the store first and return the change event
//! the view has to apply.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::kernel::change::{ChangeType, SitemapChange};
use crate::kernel::error::{Result, SitemapError};
use crate::kernel::services::bus::SitemapBusSender;
use crate::kernel::services::ports::{EffectHandler, SitemapController};
use crate::kernel::{Action, Effect};
use crate::models::{
    child_path, last_segment, DetailPageInfo, EntryId, GalleryFolderEntry, GalleryType,
    PropertyModification, SitemapData, SitemapEntry, PROPERTY_TITLE,
};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GallerySnapshot {
    pub gallery_type: GalleryType,
    #[serde(default)]
    pub folders: Vec<GalleryFolderEntry>,
}

/// JSON form of a complete server-side sitemap.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SitemapSnapshot {
    pub data: SitemapData,
    #[serde(default = "default_editable")]
    pub editable: bool,
    #[serde(default)]
    pub detail_pages: Vec<DetailPageInfo>,
    #[serde(default)]
    pub galleries: Vec<GallerySnapshot>,
}

fn default_editable() -> bool {
    true
}

#[derive(Clone, Debug)]
struct EntryRecord {
    entry: SitemapEntry,
    parent: Option<EntryId>,
    children: Vec<EntryId>,
    is_folder: bool,
    /// Children are known client-side.
    loaded: bool,
}

pub struct MemoryController {
    records: FxHashMap<EntryId, EntryRecord>,
    root: EntryId,
    template: SitemapData,
    available: bool,
    editable: bool,
    deleted: FxHashMap<EntryId, (EntryId, usize)>,
    detail_pages: Vec<DetailPageInfo>,
    galleries: Vec<GallerySnapshot>,
    next_id: u64,
    recompute_count: usize,
    scrolled: Vec<EntryId>,
}

impl MemoryController {
    pub fn from_snapshot(snapshot: SitemapSnapshot) -> Self {
        let SitemapSnapshot {
            mut data,
            editable,
            detail_pages,
            galleries,
        } = snapshot;

        let root = std::mem::take(&mut data.root);
        let root_id = root.id;
        let mut controller = Self {
            records: FxHashMap::default(),
            root: root_id,
            template: data,
            available: true,
            editable,
            deleted: FxHashMap::default(),
            detail_pages,
            galleries,
            next_id: 0,
            recompute_count: 0,
            scrolled: Vec::new(),
        };
        controller.template.root = SitemapEntry {
            sub_entries: Vec::new(),
            ..root.clone()
        };
        controller.insert_tree(root, None);
        if let Some(record) = controller.records.get_mut(&root_id) {
            record.loaded = true;
        }
        controller.next_id = controller.records.keys().map(|id| id.0).max().unwrap_or(0) + 1;
        controller
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let snapshot: SitemapSnapshot = serde_json::from_str(json)?;
        Ok(Self::from_snapshot(snapshot))
    }

    /// A controller whose initial data failed to load.
    pub fn unavailable() -> Self {
        let mut controller = Self::from_snapshot(SitemapSnapshot {
            data: SitemapData {
                root: SitemapEntry::new(EntryId(1), "/"),
                ..SitemapData::default()
            },
            editable: false,
            detail_pages: Vec::new(),
            galleries: Vec::new(),
        });
        controller.available = false;
        controller
    }

    fn insert_tree(&mut self, mut entry: SitemapEntry, parent: Option<EntryId>) {
        let sub_entries = std::mem::take(&mut entry.sub_entries);
        if entry.name.is_empty() {
            entry.name = last_segment(&entry.site_path).to_string();
        }
        let id = entry.id;
        let record = EntryRecord {
            is_folder: !entry.is_leaf(),
            loaded: entry.children_loaded_initially,
            parent,
            children: sub_entries.iter().map(|c| c.id).collect(),
            entry,
        };
        self.records.insert(id, record);
        for child in sub_entries {
            self.insert_tree(child, Some(id));
        }
    }

    pub fn root_id(&self) -> EntryId {
        self.root
    }

    pub fn set_editable(&mut self, editable: bool) {
        self.editable = editable;
    }

    pub fn recompute_count(&self) -> usize {
        self.recompute_count
    }

    pub fn scrolled(&self) -> &[EntryId] {
        &self.scrolled
    }

    pub fn is_loaded(&self, id: EntryId) -> bool {
        self.records.get(&id).is_some_and(|r| r.loaded)
    }

    fn site_path(&self, id: EntryId) -> String {
        let Some(record) = self.records.get(&id) else {
            return String::new();
        };
        match record.parent {
            None => self.template.root.site_path.clone(),
            Some(parent) => child_path(&self.site_path(parent), &record.entry.name, record.is_folder),
        }
    }

    fn position(&self, id: EntryId) -> usize {
        self.records
            .get(&id)
            .and_then(|r| r.parent)
            .and_then(|p| self.records.get(&p))
            .and_then(|p| p.children.iter().position(|c| *c == id))
            .unwrap_or(0)
    }

    fn is_deleted(&self, mut id: EntryId) -> bool {
        loop {
            if self.deleted.contains_key(&id) {
                return true;
            }
            match self.records.get(&id).and_then(|r| r.parent) {
                Some(parent) => id = parent,
                None => return false,
            }
        }
    }

    fn materialize(&self, id: EntryId) -> Option<SitemapEntry> {
        let record = self.records.get(&id)?;
        let mut entry = record.entry.clone();
        entry.parent_id = record.parent;
        entry.site_path = self.site_path(id);
        entry.position = self.position(id);
        entry.children_loaded_initially = record.loaded;
        entry.sub_entries = if record.loaded {
            record
                .children
                .iter()
                .filter_map(|c| self.materialize(*c))
                .collect()
        } else {
            Vec::new()
        };
        Some(entry)
    }

    pub fn entry_id_by_path(&self, path: &str) -> Option<EntryId> {
        let root_path = self.template.root.site_path.as_str();
        let rest = path
            .strip_prefix(root_path)
            .or_else(|| (root_path.strip_suffix('/') == Some(path)).then_some(""))?;
        let mut current = self.root;
        for name in rest.split('/').filter(|s| !s.is_empty()) {
            let record = self.records.get(&current)?;
            current = record
                .children
                .iter()
                .copied()
                .find(|c| self.records.get(c).is_some_and(|r| r.entry.name == name))?;
        }
        Some(current)
    }

    fn record_mut(&mut self, id: EntryId) -> Result<&mut EntryRecord> {
        if self.is_deleted(id) {
            return Err(SitemapError::InvalidEntryId(id));
        }
        self.records
            .get_mut(&id)
            .ok_or(SitemapError::InvalidEntryId(id))
    }

    fn is_descendant_or_self(&self, ancestor: EntryId, mut id: EntryId) -> bool {
        loop {
            if id == ancestor {
                return true;
            }
            match self.records.get(&id).and_then(|r| r.parent) {
                Some(parent) => id = parent,
                None => return false,
            }
        }
    }

    /// Creates a folder entry under `parent` at `position` (clamped).
    pub fn create_entry(
        &mut self,
        parent: EntryId,
        name: &str,
        position: usize,
    ) -> Result<SitemapChange> {
        self.create_entry_of_type(parent, name, position, "folder")
    }

    pub fn create_entry_of_type(
        &mut self,
        parent: EntryId,
        name: &str,
        position: usize,
        resource_type: &str,
    ) -> Result<SitemapChange> {
        let id = EntryId(self.next_id);
        self.next_id += 1;

        let parent_record = self.record_mut(parent)?;
        let index = position.min(parent_record.children.len());
        parent_record.children.insert(index, id);

        let mut entry = SitemapEntry::new(id, "");
        entry.name = name.to_string();
        entry.title = name.to_string();
        entry.in_navigation = true;
        entry.resource_type_name = resource_type.to_string();
        self.records.insert(
            id,
            EntryRecord {
                entry,
                parent: Some(parent),
                children: Vec::new(),
                is_folder: true,
                loaded: true,
            },
        );

        let mut change = SitemapChange::new(id, ChangeType::Create)
            .with_parent(parent)
            .with_position(index);
        change.name = Some(name.to_string());
        change.site_path = Some(self.site_path(id));
        tracing::debug!(entry = %id, parent = %parent, index, "entry created");
        Ok(change)
    }

    /// Creates a gallery folder of the gallery type `type_id`.
    pub fn create_gallery(
        &mut self,
        parent: EntryId,
        name: &str,
        type_id: i32,
    ) -> Result<SitemapChange> {
        let gallery = self
            .galleries
            .iter()
            .find(|g| g.gallery_type.type_id == type_id)
            .map(|g| g.gallery_type.type_name.clone())
            .unwrap_or_else(|| "folder".to_string());
        let mut change = self.create_entry_of_type(parent, name, usize::MAX, &gallery)?;
        change.new_resource_type_id = Some(type_id);
        change
            .property_changes
            .push(PropertyModification::new(PROPERTY_TITLE, name));

        let folder = GalleryFolderEntry {
            structure_id: change.entry_id,
            site_path: change.site_path.clone().unwrap_or_default(),
            resource_type: gallery,
            title: name.to_string(),
            sub_galleries: Vec::new(),
        };
        if let Some(snapshot) = self
            .galleries
            .iter_mut()
            .find(|g| g.gallery_type.type_id == type_id)
        {
            snapshot.folders.push(folder);
        }
        Ok(change)
    }

    pub fn delete_entry(&mut self, id: EntryId) -> Result<SitemapChange> {
        if id == self.root {
            return Err(SitemapError::InvalidEntryId(id));
        }
        let parent = self
            .record_mut(id)?
            .parent
            .ok_or(SitemapError::InvalidEntryId(id))?;
        let position = self.position(id);
        self.record_mut(parent)?.children.retain(|c| *c != id);
        self.deleted.insert(id, (parent, position));
        for snapshot in &mut self.galleries {
            snapshot.folders.retain(|f| f.structure_id != id);
        }
        Ok(SitemapChange::new(id, ChangeType::Delete).with_parent(parent))
    }

    pub fn undelete_entry(&mut self, id: EntryId) -> Result<SitemapChange> {
        let (parent, position) = self
            .deleted
            .get(&id)
            .copied()
            .ok_or(SitemapError::InvalidEntryId(id))?;
        let parent_record = self.record_mut(parent)?;
        let index = position.min(parent_record.children.len());
        parent_record.children.insert(index, id);
        self.deleted.remove(&id);
        let mut change = SitemapChange::new(id, ChangeType::Undelete)
            .with_parent(parent)
            .with_position(index);
        change.site_path = Some(self.site_path(id));
        Ok(change)
    }

    pub fn move_entry(
        &mut self,
        id: EntryId,
        new_parent: EntryId,
        position: usize,
    ) -> Result<SitemapChange> {
        if id == self.root || self.is_descendant_or_self(id, new_parent) {
            return Err(SitemapError::InvalidEntryId(id));
        }
        let old_parent = self
            .record_mut(id)?
            .parent
            .ok_or(SitemapError::InvalidEntryId(id))?;
        self.record_mut(new_parent)?;

        self.record_mut(old_parent)?.children.retain(|c| *c != id);
        let parent_record = self.record_mut(new_parent)?;
        let index = position.min(parent_record.children.len());
        parent_record.children.insert(index, id);
        self.record_mut(id)?.parent = Some(new_parent);

        let mut change = if old_parent == new_parent {
            SitemapChange::new(id, ChangeType::Modify).with_parent(new_parent)
        } else {
            SitemapChange::new(id, ChangeType::Modify).with_new_parent(new_parent)
        };
        change.position = Some(index);
        change.site_path = Some(self.site_path(id));
        tracing::debug!(entry = %id, from = %old_parent, to = %new_parent, index, "entry moved");
        Ok(change)
    }

    pub fn rename_entry(&mut self, id: EntryId, name: &str) -> Result<SitemapChange> {
        if id == self.root {
            return Err(SitemapError::InvalidEntryId(id));
        }
        self.record_mut(id)?.entry.name = name.to_string();
        let mut change = SitemapChange::new(id, ChangeType::Modify);
        change.name = Some(name.to_string());
        change.site_path = Some(self.site_path(id));
        Ok(change)
    }

    pub fn set_title(&mut self, id: EntryId, title: &str) -> Result<SitemapChange> {
        self.record_mut(id)?.entry.title = title.to_string();
        let mut change = SitemapChange::new(id, ChangeType::Modify);
        change
            .property_changes
            .push(PropertyModification::new(PROPERTY_TITLE, title));
        Ok(change)
    }

    pub fn remove_from_navigation(&mut self, id: EntryId) -> Result<SitemapChange> {
        self.record_mut(id)?.entry.in_navigation = false;
        Ok(SitemapChange::new(id, ChangeType::Remove))
    }

    /// Makes `id` the preferred detail page for its type.
    pub fn bump_detail_page(&mut self, id: EntryId) -> Result<SitemapChange> {
        self.record_mut(id)?;
        let index = self
            .detail_pages
            .iter()
            .position(|d| d.id == id)
            .ok_or(SitemapError::InvalidEntryId(id))?;
        let info = self.detail_pages.remove(index);
        self.detail_pages.insert(0, info);
        Ok(SitemapChange::new(id, ChangeType::BumpDetailPage))
    }

    fn send(&self, bus: &SitemapBusSender, action: Action) {
        if bus.send_action(action).is_err() {
            tracing::warn!("sitemap bus closed, dropping controller response");
        }
    }
}

impl SitemapController for MemoryController {
    fn data(&self) -> Option<SitemapData> {
        if !self.available {
            return None;
        }
        Some(SitemapData {
            root: self.materialize(self.root)?,
            ..self.template.clone()
        })
    }

    fn entry_by_id(&self, id: EntryId) -> Option<SitemapEntry> {
        if self.is_deleted(id) {
            return None;
        }
        self.materialize(id)
    }

    fn is_detail_page(&self, id: EntryId) -> bool {
        self.detail_pages.iter().any(|d| d.id == id)
    }

    fn detail_page_info(&self, id: EntryId) -> Option<DetailPageInfo> {
        self.detail_pages.iter().find(|d| d.id == id).cloned()
    }

    fn detail_page_ids(&self) -> Vec<EntryId> {
        self.detail_pages.iter().map(|d| d.id).collect()
    }

    fn gallery_type(&self, type_id: i32) -> Option<GalleryType> {
        self.galleries
            .iter()
            .find(|g| g.gallery_type.type_id == type_id)
            .map(|g| g.gallery_type.clone())
    }

    fn is_editable(&self) -> bool {
        self.editable
    }

    fn loaded_descendants(&self, path: &str) -> Vec<SitemapEntry> {
        let mut result = Vec::new();
        let Some(start) = self.entry_id_by_path(path) else {
            return result;
        };
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            let Some(record) = self.records.get(&id) else {
                continue;
            };
            if !record.loaded {
                continue;
            }
            for child in record.children.iter().rev() {
                stack.push(*child);
            }
            for child in &record.children {
                if let Some(entry) = self.materialize(*child) {
                    result.push(entry);
                }
            }
        }
        result
    }
}

impl EffectHandler for MemoryController {
    fn handle_effect(&mut self, effect: Effect, bus: &SitemapBusSender) {
        tracing::trace!(effect = ?effect, "controller effect");
        match effect {
            Effect::FetchChildren { id, set_open } => {
                let Some(record) = self.records.get_mut(&id) else {
                    tracing::debug!(entry = %id, "fetch for unknown entry");
                    return;
                };
                let was_loaded = std::mem::replace(&mut record.loaded, true);
                if was_loaded {
                    let children = record.children.clone();
                    for child in children {
                        if let Some(child_record) = self.records.get_mut(&child) {
                            child_record.loaded = true;
                        }
                    }
                }
                if let Some(entry) = self.entry_by_id(id) {
                    self.send(bus, Action::ChildrenLoaded { entry, set_open });
                }
            }
            Effect::LoadPath(path) => {
                let Some(target) = self.entry_id_by_path(&path) else {
                    tracing::debug!(path = %path, "load path for unknown path");
                    return;
                };
                let mut chain = vec![target];
                let mut current = target;
                while let Some(parent) = self.records.get(&current).and_then(|r| r.parent) {
                    chain.push(parent);
                    current = parent;
                }

                let mut topmost = None;
                for id in chain.into_iter().rev() {
                    if let Some(record) = self.records.get_mut(&id) {
                        if !record.loaded {
                            record.loaded = true;
                            topmost.get_or_insert(id);
                        }
                    }
                }
                if let Some(entry) = topmost.and_then(|id| self.entry_by_id(id)) {
                    self.send(
                        bus,
                        Action::ChildrenLoaded {
                            entry,
                            set_open: false,
                        },
                    );
                }
            }
            Effect::UpdateEntry(id) => {
                self.send(
                    bus,
                    Action::Change(SitemapChange::new(id, ChangeType::Modify)),
                );
            }
            Effect::RecomputeProperties => {
                self.recompute_count += 1;
            }
            Effect::LoadGalleries => {
                let galleries = self
                    .galleries
                    .iter()
                    .map(|g| (g.gallery_type.clone(), g.folders.clone()))
                    .collect();
                self.send(bus, Action::GalleriesLoaded(galleries));
            }
            Effect::ScrollIntoView(id) => {
                self.scrolled.push(id);
            }
        }
    }
}

#[cfg(test)]
#[path = "../../../../tests/unit/kernel/services/adapters/memory.rs"]
mod tests;
