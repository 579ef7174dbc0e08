use serde::{Deserialize, Serialize};

use crate::models::{EntryId, PropertyModification};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
    Delete,
    Undelete,
    Create,
    Modify,
    Remove,
    BumpDetailPage,
    ClipboardOnly,
}

/// One structural change emitted by the controller after it has updated its
/// own entry store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SitemapChange {
    pub entry_id: EntryId,
    pub change_type: ChangeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<EntryId>,
    /// Set when the entry's position among its siblings changed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
    #[serde(default)]
    pub has_new_parent: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_resource_type_id: Option<i32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub property_changes: Vec<PropertyModification>,
}

impl SitemapChange {
    pub fn new(entry_id: EntryId, change_type: ChangeType) -> Self {
        Self {
            entry_id,
            change_type,
            parent_id: None,
            position: None,
            has_new_parent: false,
            name: None,
            site_path: None,
            new_resource_type_id: None,
            property_changes: Vec::new(),
        }
    }

    pub fn with_parent(mut self, parent_id: EntryId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn with_position(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_new_parent(mut self, parent_id: EntryId) -> Self {
        self.parent_id = Some(parent_id);
        self.has_new_parent = true;
        self
    }

    pub fn has_changed_position(&self) -> bool {
        self.position.is_some()
    }

    /// Whether applying the change moves the item in the tree.
    pub fn is_move(&self) -> bool {
        self.change_type == ChangeType::Modify && (self.has_changed_position() || self.has_new_parent)
    }
}
