//! Services layer (ports + adapters).
//!
//! - `ports`: contracts the view consumes (controller, config).
//! - `adapters`: concrete implementations (in-memory controller, settings IO).

pub mod adapters;
pub mod bus;
pub mod ports;

pub use bus::{sitemap_bus, SitemapBusReceiver, SitemapBusSender, SitemapMessage};
