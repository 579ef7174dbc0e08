use std::time::Instant;

use serde::{Deserialize, Serialize};

use super::SitemapRuntime;
use crate::kernel::error::Result;
use crate::kernel::services::adapters::MemoryController;
use crate::kernel::Action;
use crate::models::{EditorMode, EntryId};

/// One step of a replay script.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ScriptOp {
    Open {
        entry: EntryId,
    },
    Close {
        entry: EntryId,
    },
    Create {
        parent: EntryId,
        name: String,
        #[serde(default)]
        position: usize,
    },
    CreateGallery {
        parent: EntryId,
        name: String,
        type_id: i32,
    },
    Delete {
        entry: EntryId,
    },
    Undelete {
        entry: EntryId,
    },
    Move {
        entry: EntryId,
        parent: EntryId,
        #[serde(default)]
        position: usize,
    },
    Rename {
        entry: EntryId,
        name: String,
    },
    SetTitle {
        entry: EntryId,
        title: String,
    },
    RemoveFromNavigation {
        entry: EntryId,
    },
    BumpDetailPage {
        entry: EntryId,
    },
    SetMode {
        mode: EditorMode,
    },
    Highlight {
        path: String,
    },
}

impl ScriptOp {
    fn apply(self, runtime: &mut SitemapRuntime<MemoryController>) -> Result<()> {
        match self {
            ScriptOp::Open { entry } => {
                runtime.dispatch(Action::Open { entry });
            }
            ScriptOp::Close { entry } => {
                runtime.dispatch(Action::Close { entry });
            }
            ScriptOp::Create {
                parent,
                name,
                position,
            } => runtime.apply(|c| c.create_entry(parent, &name, position))?,
            ScriptOp::CreateGallery {
                parent,
                name,
                type_id,
            } => runtime.apply(|c| c.create_gallery(parent, &name, type_id))?,
            ScriptOp::Delete { entry } => runtime.apply(|c| c.delete_entry(entry))?,
            ScriptOp::Undelete { entry } => runtime.apply(|c| c.undelete_entry(entry))?,
            ScriptOp::Move {
                entry,
                parent,
                position,
            } => runtime.apply(|c| c.move_entry(entry, parent, position))?,
            ScriptOp::Rename { entry, name } => runtime.apply(|c| c.rename_entry(entry, &name))?,
            ScriptOp::SetTitle { entry, title } => runtime.apply(|c| c.set_title(entry, &title))?,
            ScriptOp::RemoveFromNavigation { entry } => {
                runtime.apply(|c| c.remove_from_navigation(entry))?
            }
            ScriptOp::BumpDetailPage { entry } => runtime.apply(|c| c.bump_detail_page(entry))?,
            ScriptOp::SetMode { mode } => {
                runtime.dispatch(Action::SetEditorMode(mode));
            }
            ScriptOp::Highlight { path } => {
                runtime.dispatch(Action::HighlightPath {
                    path,
                    now: Instant::now(),
                });
            }
        }
        Ok(())
    }
}

/// Applies `ops` in order, draining the bus after each one. A failing
/// operation is logged and skipped; returns how many failed.
pub fn run_script(runtime: &mut SitemapRuntime<MemoryController>, ops: Vec<ScriptOp>) -> usize {
    let mut failed = 0;
    runtime.run_until_idle();
    for op in ops {
        let desc = format!("{:?}", op);
        if let Err(e) = op.apply(runtime) {
            tracing::warn!(op = %desc, error = %e, "script operation failed");
            failed += 1;
        }
        runtime.run_until_idle();
    }
    failed
}
