//! Service adapters: in-memory controller and on-disk settings.

pub mod memory;
pub mod settings;

pub use memory::{GallerySnapshot, MemoryController, SitemapSnapshot};
pub use settings::{
    ensure_log_dir, ensure_settings_file, ensure_settings_file_at, get_log_dir, get_settings_path,
    load_config, load_config_from,
};
