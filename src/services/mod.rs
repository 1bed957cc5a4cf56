use async_trait::async_trait;

use crate::models::music::{LinkMatch, MusicItem, MusicLink, Service};

pub mod apple;
pub mod spotify;
pub mod youtube;

/// One streaming service: recognizes its own links, resolves them against
/// its catalog, and finds its equivalent of items that came from elsewhere.
#[async_trait]
pub trait MusicService: Send + Sync {
    fn service(&self) -> Service;

    /// The first link in `text` this service recognizes, if any.
    fn parse_link(&self, text: &str) -> Option<LinkMatch>;

    /// Canonical URL for a link this service parsed.
    fn item_url(&self, link: &MusicLink) -> String;

    /// Fetch canonical metadata for a parsed link from the catalog.
    async fn lookup(&self, link: &MusicLink) -> anyhow::Result<MusicItem>;

    /// Search the catalog for an item resolved on another service and
    /// return a link to the top result, trusting the catalog's own ranking.
    async fn search(&self, item: &MusicItem) -> anyhow::Result<String>;
}
