mod changes;
mod gallery;

use super::error::{Result, SitemapError};
use super::services::ports::{SitemapConfig, SitemapController};
use super::{Action, Effect, SitemapViewState};

pub struct DispatchResult {
    pub effects: Vec<Effect>,
    pub state_changed: bool,
}

impl DispatchResult {
    fn unchanged() -> Self {
        Self {
            effects: Vec::new(),
            state_changed: false,
        }
    }

    fn from_pair((state_changed, effects): (bool, Vec<Effect>)) -> Self {
        Self {
            effects,
            state_changed,
        }
    }
}

pub struct Store {
    state: SitemapViewState,
}

impl Store {
    /// Builds the view from the controller's initial data. Fails when the
    /// controller has none; the caller is expected to surface this and stop.
    pub fn init(
        controller: &dyn SitemapController,
        config: SitemapConfig,
    ) -> Result<(Self, Vec<Effect>)> {
        let Some(data) = controller.data() else {
            tracing::error!("controller supplied no sitemap data");
            return Err(SitemapError::DataUnavailable);
        };

        let mut state = SitemapViewState::new(&data, config);
        let (_, mut effects) = state.set_editor_mode(controller, data.editor_mode);
        effects.extend(state.initiate_tree_items(controller, &data));

        tracing::info!(
            root = %data.root.site_path,
            mode = ?data.editor_mode,
            items = state.tree.len(),
            "sitemap view initialized"
        );
        Ok((Self { state }, effects))
    }

    pub fn state(&self) -> &SitemapViewState {
        &self.state
    }

    pub fn dispatch(
        &mut self,
        controller: &dyn SitemapController,
        action: Action,
    ) -> DispatchResult {
        match action {
            Action::Open { entry } => DispatchResult::from_pair(self.state.open_item(entry)),
            Action::Close { entry } => DispatchResult {
                effects: Vec::new(),
                state_changed: self.state.close_item(entry),
            },
            Action::Change(change) => self.reduce_change(controller, change),
            Action::ChildrenLoaded { entry, set_open } => {
                self.reduce_children_loaded(controller, entry, set_open)
            }
            Action::SetEditorMode(mode) => {
                DispatchResult::from_pair(self.state.set_editor_mode(controller, mode))
            }
            Action::HighlightPath { path, now } => {
                DispatchResult::from_pair(self.state.highlight_path(&path, now))
            }
            Action::EnsureVisible { entry } => {
                DispatchResult::from_pair(self.state.ensure_visible(entry))
            }
            Action::GalleriesLoaded(galleries) => self.display_galleries(galleries),
            Action::NewGallery(folder) => self.display_new_gallery(folder),
            Action::GalleryOpened { item } => self.reduce_gallery_opened(controller, item),
            Action::UpdateEntries(ids) => DispatchResult {
                effects: Vec::new(),
                state_changed: self.state.update_entries_by_id(controller, &ids),
            },
            Action::Tick { now } => DispatchResult {
                effects: Vec::new(),
                state_changed: self.state.tick(now),
            },
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/store.rs"]
mod tests;
