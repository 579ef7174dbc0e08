//! Headless sitemap view core (state/action/effect).

pub mod action;
pub mod change;
pub mod effect;
pub mod error;
pub mod services;
pub mod state;
pub mod store;

pub use action::Action;
pub use change::{ChangeType, SitemapChange};
pub use effect::Effect;
pub use error::{Result, SitemapError};
pub use state::{Notification, NotificationKind, SitemapViewState, ToolbarState};
pub use store::{DispatchResult, Store};
