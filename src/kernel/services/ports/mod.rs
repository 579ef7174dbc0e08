//! Service ports: traits + data contracts.

pub mod config;
pub mod controller;

pub use config::{SitemapConfig, DOWNLOAD_GALLERY_TYPE, GALLERIES_FOLDER_NAME, IMAGE_GALLERY_TYPE};
pub use controller::{EffectHandler, SitemapController};
