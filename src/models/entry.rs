//! 站点地图条目数据模型
//!
//! Entries are owned by the controller; the view only reads them.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub u64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EntryId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditorMode {
    #[default]
    Navigation,
    Vfs,
    Galleries,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SitemapEntry {
    pub id: EntryId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<EntryId>,
    /// Last segment of the site path; empty for the root.
    #[serde(default)]
    pub name: String,
    pub site_path: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub position: usize,
    #[serde(default)]
    pub sub_entries: Vec<SitemapEntry>,
    #[serde(default)]
    pub in_navigation: bool,
    #[serde(default)]
    pub children_loaded_initially: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_file_id: Option<EntryId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_file_type: Option<String>,
    #[serde(default)]
    pub resource_type_name: String,
    #[serde(default)]
    pub sub_sitemap: bool,
    #[serde(default)]
    pub navigation_level: bool,
}

impl SitemapEntry {
    pub fn new(id: EntryId, site_path: impl Into<String>) -> Self {
        let site_path = site_path.into();
        Self {
            id,
            name: last_segment(&site_path).to_string(),
            site_path,
            resource_type_name: "folder".to_string(),
            ..Self::default()
        }
    }

    pub fn is_leaf(&self) -> bool {
        !self.site_path.ends_with('/')
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SitemapInfo {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub site_host: String,
    #[serde(default)]
    pub site_locale: String,
}

/// Initial data handed over by the controller at startup.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SitemapData {
    pub root: SitemapEntry,
    #[serde(default)]
    pub editor_mode: EditorMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_sitemap: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_edit_reason: Option<String>,
    #[serde(default)]
    pub info: SitemapInfo,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailPageInfo {
    pub id: EntryId,
    pub type_name: String,
    pub icon_type: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GalleryType {
    pub type_id: i32,
    pub type_name: String,
    pub nice_name: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryFolderEntry {
    pub structure_id: EntryId,
    pub site_path: String,
    pub resource_type: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub sub_galleries: Vec<GalleryFolderEntry>,
}

pub const PROPERTY_TITLE: &str = "Title";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyModification {
    pub name: String,
    pub value: String,
}

impl PropertyModification {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// `/a/b/` -> `b`, `/a/b.html` -> `b.html`, `/` -> ``.
pub fn last_segment(site_path: &str) -> &str {
    site_path
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or("")
}

/// `/a/b/` -> `/a/`, `/a/b.html` -> `/a/`. The root has no parent.
pub fn parent_folder(site_path: &str) -> Option<&str> {
    let trimmed = site_path.trim_end_matches('/');
    if trimmed.is_empty() {
        return None;
    }
    let idx = trimmed.rfind('/')?;
    Some(&site_path[..=idx])
}

/// Joins a folder path and a child name, folders get a trailing slash.
pub fn child_path(parent: &str, name: &str, is_folder: bool) -> String {
    let mut path = String::with_capacity(parent.len() + name.len() + 2);
    path.push_str(parent);
    if !path.ends_with('/') {
        path.push('/');
    }
    path.push_str(name);
    if is_folder {
        path.push('/');
    }
    path
}
