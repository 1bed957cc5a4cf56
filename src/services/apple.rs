use anyhow::Context;
use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::constants::music::APPLE_URL_REGEX;
use crate::models::itunes::ItunesResponse;
use crate::models::music::{Kind, LinkMatch, MusicItem, MusicLink, Service};
use crate::services::MusicService;

const SEARCH_URL: &str = "https://itunes.apple.com/search";
const LOOKUP_URL: &str = "https://itunes.apple.com/lookup";

/// Apple Music needs no credential; the iTunes search and lookup endpoints
/// are open.
pub struct AppleMusicClient {
    client: reqwest::Client,
}

impl AppleMusicClient {
    pub fn new(client: reqwest::Client) -> Self {
        AppleMusicClient { client }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> anyhow::Result<T> {
        let resp = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .inspect_err(
                |e| tracing::error!(err = ?e, "an error occurred when sending itunes request"),
            )?;

        let text = resp.text().await.inspect_err(
            |e| tracing::error!(err = ?e, "an error occurred when receiving response text"),
        )?;

        let body = serde_json::from_str(&text).inspect_err(
            |e| tracing::error!(err = ?e, text = %text, "an error occurred when parsing response body"),
        )?;

        Ok(body)
    }
}

#[async_trait]
impl MusicService for AppleMusicClient {
    fn service(&self) -> Service {
        Service::AppleMusic
    }

    fn parse_link(&self, text: &str) -> Option<LinkMatch> {
        let caps = APPLE_URL_REGEX.captures(text).ok()??;
        let whole = caps.get(0)?;

        // the `i` query parameter carries a track id; without it the link
        // points at the whole album
        let (kind, id) = match caps.get(2) {
            Some(track_id) => (Kind::Track, track_id.as_str().to_string()),
            None => (Kind::Album, caps[1].to_string()),
        };

        Some(LinkMatch {
            link: MusicLink {
                service: Service::AppleMusic,
                kind,
                id,
            },
            start: whole.start(),
        })
    }

    fn item_url(&self, link: &MusicLink) -> String {
        match link.kind {
            Kind::Track => format!("https://music.apple.com/us/song/{}", link.id),
            Kind::Album => format!("https://music.apple.com/us/album/{}", link.id),
        }
    }

    async fn lookup(&self, link: &MusicLink) -> anyhow::Result<MusicItem> {
        let body: ItunesResponse = self
            .get_json(LOOKUP_URL, &[("id", link.id.as_str()), ("country", "US")])
            .await?;

        let result = body
            .results
            .into_iter()
            .next()
            .context("itunes lookup returned no results")?;

        let title = match link.kind {
            Kind::Track => result.track_name.context("lookup result has no track name")?,
            Kind::Album => result
                .collection_name
                .context("lookup result has no collection name")?,
        };

        Ok(MusicItem {
            title,
            artist: result.artist_name.context("lookup result has no artist name")?,
            kind: link.kind,
            source_service: Service::AppleMusic,
            source_id: link.id.clone(),
            artwork_url: result.artwork_url100,
        })
    }

    async fn search(&self, item: &MusicItem) -> anyhow::Result<String> {
        let entity = match item.kind {
            Kind::Track => "song",
            Kind::Album => "album",
        };
        let term = format!("{} {}", item.title, item.artist);

        let body: ItunesResponse = self
            .get_json(
                SEARCH_URL,
                &[
                    ("term", term.as_str()),
                    ("country", "US"),
                    ("media", "music"),
                    ("entity", entity),
                    ("limit", "1"),
                    ("lang", "en_us"),
                    ("version", "2"),
                    ("explicit", "Yes"),
                ],
            )
            .await?;

        let result = body
            .results
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("no apple music results for {}", item))?;

        match item.kind {
            Kind::Track => result.track_view_url.context("search result has no track url"),
            Kind::Album => result
                .collection_view_url
                .context("search result has no collection url"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> AppleMusicClient {
        AppleMusicClient::new(reqwest::Client::new())
    }

    #[test]
    fn parses_album_links() {
        let m = client()
            .parse_link("https://music.apple.com/us/album/discovery/697194953")
            .unwrap();

        assert_eq!(m.link.kind, Kind::Album);
        assert_eq!(m.link.id, "697194953");
    }

    #[test]
    fn track_parameter_wins_over_album_id() {
        let m = client()
            .parse_link("https://music.apple.com/us/album/discovery/697194953?i=697195787")
            .unwrap();

        assert_eq!(m.link.kind, Kind::Track);
        assert_eq!(m.link.id, "697195787");
    }

    #[test]
    fn parses_legacy_itunes_links() {
        let m = client()
            .parse_link("https://itunes.apple.com/us/album/id697194953")
            .unwrap();

        assert_eq!(m.link.kind, Kind::Album);
        assert_eq!(m.link.id, "697194953");
    }

    #[test]
    fn rejects_non_album_paths() {
        assert!(client().parse_link("https://music.apple.com/us/artist/daft-punk/5468295").is_none());
    }
}
