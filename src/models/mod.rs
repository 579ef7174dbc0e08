//! 数据模型层

pub mod entry;
pub mod gallery_tree;
pub mod sitemap_tree;

pub use entry::{
    child_path, last_segment, parent_folder, DetailPageInfo, EditorMode, EntryId,
    GalleryFolderEntry, GalleryType, PropertyModification, SitemapData, SitemapEntry, SitemapInfo,
    PROPERTY_TITLE,
};
pub use gallery_tree::{GalleryItem, GalleryItemId, GalleryItemKind, GalleryTree};
pub use sitemap_tree::{
    Background, ItemId, LoadState, SitemapTree, SitemapTreeError, SitemapTreeRow, TreeItem,
};
