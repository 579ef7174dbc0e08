use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DOWNLOAD_GALLERY_TYPE: &str = "downloadgallery";
pub const IMAGE_GALLERY_TYPE: &str = "imagegallery";
pub const GALLERIES_FOLDER_NAME: &str = ".galleries";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SitemapConfig {
    /// 临时高亮持续时间（毫秒）
    pub highlight_duration_ms: u64,
    pub galleries_folder_name: String,
    /// Gallery types shown first, in this order.
    pub pinned_gallery_types: Vec<String>,
    pub log_filter: String,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            highlight_duration_ms: 1500,
            galleries_folder_name: GALLERIES_FOLDER_NAME.to_string(),
            pinned_gallery_types: vec![
                IMAGE_GALLERY_TYPE.to_string(),
                DOWNLOAD_GALLERY_TYPE.to_string(),
            ],
            log_filter: "sitemap_sync=info".to_string(),
        }
    }
}

impl SitemapConfig {
    pub fn highlight_duration(&self) -> Duration {
        Duration::from_millis(self.highlight_duration_ms)
    }
}
