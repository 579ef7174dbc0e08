use crate::models::EntryId;

/// Work requested from the controller (or the host UI) by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Fetch one level of children for `id`. The result arrives later as
    /// `Action::ChildrenLoaded`.
    FetchChildren {
        id: EntryId,
        set_open: bool,
    },
    LoadPath(String),
    UpdateEntry(EntryId),
    RecomputeProperties,
    LoadGalleries,
    ScrollIntoView(EntryId),
}
