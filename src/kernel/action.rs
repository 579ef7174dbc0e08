use std::time::Instant;

use crate::kernel::change::SitemapChange;
use crate::models::{
    EditorMode, EntryId, GalleryFolderEntry, GalleryItemId, GalleryType, SitemapEntry,
};

#[derive(Debug, Clone)]
pub enum Action {
    /// The user (or a traversal) expanded an item.
    Open {
        entry: EntryId,
    },
    Close {
        entry: EntryId,
    },
    Change(SitemapChange),
    /// Children fetched by the controller for an already mounted item.
    ChildrenLoaded {
        entry: SitemapEntry,
        set_open: bool,
    },
    SetEditorMode(EditorMode),
    HighlightPath {
        path: String,
        now: Instant,
    },
    EnsureVisible {
        entry: EntryId,
    },
    GalleriesLoaded(Vec<(GalleryType, Vec<GalleryFolderEntry>)>),
    NewGallery(GalleryFolderEntry),
    GalleryOpened {
        item: GalleryItemId,
    },
    /// Ids whose entries changed outside of a change event.
    UpdateEntries(Vec<EntryId>),
    Tick {
        now: Instant,
    },
}
