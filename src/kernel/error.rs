use std::{fmt, io};

use crate::models::{EntryId, SitemapTreeError};

pub type Result<T> = std::result::Result<T, SitemapError>;

#[derive(Debug)]
pub enum SitemapError {
    /// The controller could not supply initial data. Fatal at startup.
    DataUnavailable,
    InvalidEntryId(EntryId),
    Tree(SitemapTreeError),
    Io(io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for SitemapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SitemapError::DataUnavailable => write!(f, "error while loading the sitemap data"),
            SitemapError::InvalidEntryId(id) => write!(f, "unknown sitemap entry: {}", id),
            SitemapError::Tree(e) => write!(f, "tree error: {}", e),
            SitemapError::Io(e) => write!(f, "io error: {}", e),
            SitemapError::Json(e) => write!(f, "json error: {}", e),
        }
    }
}

impl std::error::Error for SitemapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SitemapError::Tree(e) => Some(e),
            SitemapError::Io(e) => Some(e),
            SitemapError::Json(e) => Some(e),
            SitemapError::DataUnavailable | SitemapError::InvalidEntryId(_) => None,
        }
    }
}

impl From<SitemapTreeError> for SitemapError {
    fn from(e: SitemapTreeError) -> Self {
        SitemapError::Tree(e)
    }
}

impl From<io::Error> for SitemapError {
    fn from(e: io::Error) -> Self {
        SitemapError::Io(e)
    }
}

impl From<serde_json::Error> for SitemapError {
    fn from(e: serde_json::Error) -> Self {
        SitemapError::Json(e)
    }
}
