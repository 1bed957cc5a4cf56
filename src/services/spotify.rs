use std::time::{Duration, Instant};

use anyhow::Context;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;

use crate::constants::music::{PARENS_REGEX, SPOTIFY_URL_REGEX};
use crate::models::music::{Kind, LinkMatch, MusicItem, MusicLink, Service};
use crate::models::spotify::{Album, SearchResponse, TokenResponse, Track};
use crate::services::MusicService;

const API_BASE: &str = "https://api.spotify.com/v1";
const TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

pub struct SpotifyClient {
    client: reqwest::Client,
    client_id: String,
    client_secret: String,
    token: Mutex<Option<CachedToken>>,
}

struct CachedToken {
    value: String,
    expires_at: Instant,
}

impl SpotifyClient {
    pub fn new(client: reqwest::Client, client_id: String, client_secret: String) -> Self {
        SpotifyClient {
            client,
            client_id,
            client_secret,
            token: Mutex::new(None),
        }
    }

    async fn access_token(&self) -> anyhow::Result<String> {
        let mut token = self.token.lock().await;

        if let Some(cached) = token.as_ref() {
            if Instant::now() < cached.expires_at {
                return Ok(cached.value.clone());
            }
        }

        let resp = self
            .client
            .post(TOKEN_URL)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .inspect_err(
                |e| tracing::error!(err = ?e, "an error occurred when requesting a spotify token"),
            )?;

        let text = resp.text().await.inspect_err(
            |e| tracing::error!(err = ?e, "an error occurred when receiving response text"),
        )?;

        let body: TokenResponse = serde_json::from_str(&text).inspect_err(
            |e| tracing::error!(err = ?e, text = %text, "an error occurred when parsing token response"),
        )?;

        let value = body.access_token.clone();
        *token = Some(CachedToken {
            value: body.access_token,
            // refresh a minute early so a request in flight never carries an
            // expired token
            expires_at: Instant::now() + Duration::from_secs(body.expires_in.saturating_sub(60)),
        });

        Ok(value)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
        token: &str,
    ) -> anyhow::Result<T> {
        let resp = self
            .client
            .get(url)
            .bearer_auth(token)
            .query(query)
            .send()
            .await
            .inspect_err(
                |e| tracing::error!(err = ?e, "an error occurred when sending spotify request"),
            )?;

        let text = resp.text().await.inspect_err(
            |e| tracing::error!(err = ?e, "an error occurred when receiving response text"),
        )?;

        let body = serde_json::from_str(&text).inspect_err(
            |e| tracing::error!(err = ?e, text = %text, "an error occurred when parsing response body"),
        )?;

        Ok(body)
    }

    async fn search_once(
        &self,
        query: &str,
        kind: Kind,
        token: &str,
    ) -> anyhow::Result<Option<String>> {
        let kind_param = match kind {
            Kind::Track => "track",
            Kind::Album => "album",
        };

        let body: SearchResponse = self
            .get_json(
                &format!("{API_BASE}/search"),
                &[("q", query), ("type", kind_param), ("limit", "1")],
                token,
            )
            .await?;

        let url = match kind {
            Kind::Track => body
                .tracks
                .and_then(|page| page.items.into_iter().next())
                .map(|track| track.external_urls.spotify),
            Kind::Album => body
                .albums
                .and_then(|page| page.items.into_iter().next())
                .map(|album| album.external_urls.spotify),
        };

        Ok(url)
    }
}

fn strict_query(item: &MusicItem) -> String {
    let field = match item.kind {
        Kind::Track => "track",
        Kind::Album => "album",
    };

    format!("artist:\"{}\" {}:\"{}\"", item.artist, field, item.title)
}

/// Less accurate but more forgiving: qualifiers like "(2009 Remaster)" often
/// keep the fielded query from matching anything.
fn naive_query(item: &MusicItem) -> String {
    let title = PARENS_REGEX.replace_all(&item.title, "");
    let title = title.split_whitespace().collect::<Vec<_>>().join(" ");

    format!("{} {}", title, item.artist)
}

#[async_trait]
impl MusicService for SpotifyClient {
    fn service(&self) -> Service {
        Service::Spotify
    }

    fn parse_link(&self, text: &str) -> Option<LinkMatch> {
        let caps = SPOTIFY_URL_REGEX.captures(text).ok()??;
        let whole = caps.get(0)?;

        let kind = match &caps[1] {
            "track" => Kind::Track,
            _ => Kind::Album,
        };

        Some(LinkMatch {
            link: MusicLink {
                service: Service::Spotify,
                kind,
                id: caps[2].to_string(),
            },
            start: whole.start(),
        })
    }

    fn item_url(&self, link: &MusicLink) -> String {
        match link.kind {
            Kind::Track => format!("https://open.spotify.com/track/{}", link.id),
            Kind::Album => format!("https://open.spotify.com/album/{}", link.id),
        }
    }

    async fn lookup(&self, link: &MusicLink) -> anyhow::Result<MusicItem> {
        let token = self.access_token().await?;

        match link.kind {
            Kind::Track => {
                let track: Track = self
                    .get_json(&format!("{API_BASE}/tracks/{}", link.id), &[], &token)
                    .await?;
                let artist = track.artists.into_iter().next().context("track has no artists")?;

                Ok(MusicItem {
                    title: track.name,
                    artist: artist.name,
                    kind: Kind::Track,
                    source_service: Service::Spotify,
                    source_id: link.id.clone(),
                    artwork_url: track.album.images.into_iter().next().map(|image| image.url),
                })
            }
            Kind::Album => {
                let album: Album = self
                    .get_json(&format!("{API_BASE}/albums/{}", link.id), &[], &token)
                    .await?;
                let artist = album.artists.into_iter().next().context("album has no artists")?;

                Ok(MusicItem {
                    title: album.name,
                    artist: artist.name,
                    kind: Kind::Album,
                    source_service: Service::Spotify,
                    source_id: link.id.clone(),
                    artwork_url: album.images.into_iter().next().map(|image| image.url),
                })
            }
        }
    }

    async fn search(&self, item: &MusicItem) -> anyhow::Result<String> {
        let token = self.access_token().await?;

        if let Some(url) = self.search_once(&strict_query(item), item.kind, &token).await? {
            return Ok(url);
        }

        self.search_once(&naive_query(item), item.kind, &token)
            .await?
            .ok_or_else(|| anyhow::anyhow!("no spotify results for {}", item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> SpotifyClient {
        SpotifyClient::new(reqwest::Client::new(), "id".into(), "secret".into())
    }

    fn item(kind: Kind, title: &str, artist: &str) -> MusicItem {
        MusicItem {
            title: title.into(),
            artist: artist.into(),
            kind,
            source_service: Service::YouTube,
            source_id: "dQw4w9WgXcQ".into(),
            artwork_url: None,
        }
    }

    #[test]
    fn parses_track_links() {
        let m = client()
            .parse_link("check this out https://open.spotify.com/track/1ysj4ThiNp8jQ8l7Y3Ef8c?si=xyz")
            .unwrap();

        assert_eq!(m.link.kind, Kind::Track);
        assert_eq!(m.link.id, "1ysj4ThiNp8jQ8l7Y3Ef8c");
        assert_eq!(m.link.service, Service::Spotify);
    }

    #[test]
    fn parses_album_links_with_locale_segment() {
        let m = client()
            .parse_link("https://open.spotify.com/intl-de/album/4LH4d3cOWNNsVw41Gqt2kv")
            .unwrap();

        assert_eq!(m.link.kind, Kind::Album);
        assert_eq!(m.link.id, "4LH4d3cOWNNsVw41Gqt2kv");
    }

    #[test]
    fn rejects_foreign_links() {
        assert!(client().parse_link("https://example.com/track/1ysj4ThiNp8jQ8l7Y3Ef8c").is_none());
        assert!(client().parse_link("no links here at all").is_none());
    }

    #[test]
    fn canonical_urls_follow_link_kind() {
        let c = client();
        let link = MusicLink {
            service: Service::Spotify,
            kind: Kind::Album,
            id: "4LH4d3cOWNNsVw41Gqt2kv".into(),
        };

        assert_eq!(
            c.item_url(&link),
            "https://open.spotify.com/album/4LH4d3cOWNNsVw41Gqt2kv"
        );
    }

    #[test]
    fn strict_query_uses_fielded_terms() {
        assert_eq!(
            strict_query(&item(Kind::Track, "Harvest Moon", "Neil Young")),
            r#"artist:"Neil Young" track:"Harvest Moon""#
        );
        assert_eq!(
            strict_query(&item(Kind::Album, "Harvest Moon", "Neil Young")),
            r#"artist:"Neil Young" album:"Harvest Moon""#
        );
    }

    #[test]
    fn naive_query_strips_parenthesized_qualifiers() {
        assert_eq!(
            naive_query(&item(Kind::Track, "Harvest Moon (2009 Remaster)", "Neil Young")),
            "Harvest Moon Neil Young"
        );
    }
}
