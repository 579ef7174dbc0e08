//! sitemap-sync - 站点地图树同步库
//!
//! 模块结构：
//! - models: 数据模型（SitemapEntry, SitemapTree, GalleryTree）
//! - kernel: 视图状态、动作、副作用与 Store
//! - runtime: 单消费者动作循环与回放脚本

pub mod kernel;
pub mod models;
pub mod runtime;
