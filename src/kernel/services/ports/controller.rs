//! Controller contract consumed by the sitemap view.
//!
//! Queries are synchronous and answered from the controller's entry store.
//! Anything that needs a round trip is an [`Effect`] handed to
//! [`EffectHandler`]; its outcome comes back through the bus as a later action.

use crate::kernel::services::bus::SitemapBusSender;
use crate::kernel::Effect;
use crate::models::{DetailPageInfo, EntryId, GalleryType, SitemapData, SitemapEntry};

pub trait SitemapController {
    /// Initial data, `None` when the controller failed to load it.
    fn data(&self) -> Option<SitemapData>;

    /// The entry with its currently loaded sub-entries.
    fn entry_by_id(&self, id: EntryId) -> Option<SitemapEntry>;

    fn entries_by_id(&self, ids: &[EntryId]) -> Vec<SitemapEntry> {
        ids.iter().filter_map(|id| self.entry_by_id(*id)).collect()
    }

    fn is_detail_page(&self, id: EntryId) -> bool;

    fn detail_page_info(&self, id: EntryId) -> Option<DetailPageInfo>;

    /// Every id in the detail page table.
    fn detail_page_ids(&self) -> Vec<EntryId>;

    fn gallery_type(&self, type_id: i32) -> Option<GalleryType>;

    fn is_editable(&self) -> bool;

    /// Loaded entries strictly below `path`.
    fn loaded_descendants(&self, path: &str) -> Vec<SitemapEntry>;
}

pub trait EffectHandler {
    fn handle_effect(&mut self, effect: Effect, bus: &SitemapBusSender);
}
