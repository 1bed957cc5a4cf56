use anyhow::Context;
use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::constants::music::{YOUTUBE_PLAYLIST_URL_REGEX, YOUTUBE_VIDEO_URL_REGEX};
use crate::models::music::{Kind, LinkMatch, MusicItem, MusicLink, Service};
use crate::models::youtube::{PlaylistListResponse, SearchListResponse, Snippet, VideoListResponse};
use crate::services::MusicService;

const SEARCH_URL: &str = "https://www.googleapis.com/youtube/v3/search";
const VIDEOS_URL: &str = "https://www.googleapis.com/youtube/v3/videos";
const PLAYLISTS_URL: &str = "https://www.googleapis.com/youtube/v3/playlists";

pub struct YouTubeClient {
    client: reqwest::Client,
    api_key: String,
}

impl YouTubeClient {
    pub fn new(client: reqwest::Client, api_key: String) -> Self {
        YouTubeClient { client, api_key }
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
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .inspect_err(
                |e| tracing::error!(err = ?e, "an error occurred when sending youtube request"),
            )?;

        let text = resp.text().await.inspect_err(
            |e| tracing::error!(err = ?e, "an error occurred when receiving response text"),
        )?;

        let body = serde_json::from_str(&text).inspect_err(
            |e| tracing::error!(err = ?e, text = %text, "an error occurred when parsing response body"),
        )?;

        Ok(body)
    }

    fn item_from_snippet(&self, link: &MusicLink, snippet: Snippet) -> MusicItem {
        let artwork_url = snippet
            .thumbnails
            .as_ref()
            .and_then(|thumbnails| thumbnails.best())
            .map(|thumbnail| thumbnail.url.clone());

        MusicItem {
            title: snippet.title,
            artist: channel_artist(&snippet.channel_title),
            kind: link.kind,
            source_service: Service::YouTube,
            source_id: link.id.clone(),
            artwork_url,
        }
    }
}

/// The uploader channel stands in for the artist; auto-generated music
/// channels are named "<artist> - Topic".
fn channel_artist(channel_title: &str) -> String {
    channel_title
        .strip_suffix(" - Topic")
        .unwrap_or(channel_title)
        .trim()
        .to_string()
}

fn track_query(item: &MusicItem) -> String {
    format!("{} {} topic", item.title, item.artist)
}

fn album_query(item: &MusicItem) -> String {
    format!("{} {} full album", item.title, item.artist)
}

#[async_trait]
impl MusicService for YouTubeClient {
    fn service(&self) -> Service {
        Service::YouTube
    }

    fn parse_link(&self, text: &str) -> Option<LinkMatch> {
        let video = YOUTUBE_VIDEO_URL_REGEX.captures(text).ok().flatten().and_then(|caps| {
            Some(LinkMatch {
                link: MusicLink {
                    service: Service::YouTube,
                    kind: Kind::Track,
                    id: caps[1].to_string(),
                },
                start: caps.get(0)?.start(),
            })
        });

        let playlist = YOUTUBE_PLAYLIST_URL_REGEX.captures(text).ok().flatten().and_then(|caps| {
            Some(LinkMatch {
                link: MusicLink {
                    service: Service::YouTube,
                    kind: Kind::Album,
                    id: caps[1].to_string(),
                },
                start: caps.get(0)?.start(),
            })
        });

        match (video, playlist) {
            (Some(video), Some(playlist)) => Some(if playlist.start < video.start {
                playlist
            } else {
                video
            }),
            (video, playlist) => video.or(playlist),
        }
    }

    fn item_url(&self, link: &MusicLink) -> String {
        match link.kind {
            Kind::Track => format!("https://www.youtube.com/watch?v={}", link.id),
            Kind::Album => format!("https://www.youtube.com/playlist?list={}", link.id),
        }
    }

    async fn lookup(&self, link: &MusicLink) -> anyhow::Result<MusicItem> {
        match link.kind {
            Kind::Track => {
                let body: VideoListResponse = self
                    .get_json(VIDEOS_URL, &[("part", "snippet"), ("id", &link.id)])
                    .await?;
                let video = body.items.into_iter().next().context("video not found")?;

                Ok(self.item_from_snippet(link, video.snippet))
            }
            Kind::Album => {
                let body: PlaylistListResponse = self
                    .get_json(PLAYLISTS_URL, &[("part", "snippet"), ("id", &link.id)])
                    .await?;
                let playlist = body.items.into_iter().next().context("playlist not found")?;

                Ok(self.item_from_snippet(link, playlist.snippet))
            }
        }
    }

    async fn search(&self, item: &MusicItem) -> anyhow::Result<String> {
        let (query, result_type) = match item.kind {
            Kind::Track => (track_query(item), "video"),
            Kind::Album => (album_query(item), "playlist"),
        };

        let body: SearchListResponse = self
            .get_json(
                SEARCH_URL,
                &[
                    ("part", "snippet"),
                    ("maxResults", "1"),
                    ("q", &query),
                    ("type", result_type),
                ],
            )
            .await?;

        let result = body
            .items
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("no youtube results for {}", item))?;

        match item.kind {
            Kind::Track => result
                .id
                .video_id
                .map(|id| format!("https://www.youtube.com/watch?v={id}"))
                .context("search result has no video id"),
            Kind::Album => result
                .id
                .playlist_id
                .map(|id| format!("https://www.youtube.com/playlist?list={id}"))
                .context("search result has no playlist id"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> YouTubeClient {
        YouTubeClient::new(reqwest::Client::new(), "key".into())
    }

    #[test]
    fn parses_watch_links() {
        let m = client()
            .parse_link("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
            .unwrap();

        assert_eq!(m.link.kind, Kind::Track);
        assert_eq!(m.link.id, "dQw4w9WgXcQ");
    }

    #[test]
    fn parses_short_and_music_links() {
        let short = client().parse_link("https://youtu.be/dQw4w9WgXcQ").unwrap();
        assert_eq!(short.link.id, "dQw4w9WgXcQ");

        let music = client()
            .parse_link("https://music.youtube.com/watch?v=dQw4w9WgXcQ")
            .unwrap();
        assert_eq!(music.link.kind, Kind::Track);
    }

    #[test]
    fn parses_playlist_links_as_albums() {
        let m = client()
            .parse_link("https://www.youtube.com/playlist?list=OLAK5uy_lgk")
            .unwrap();

        assert_eq!(m.link.kind, Kind::Album);
        assert_eq!(m.link.id, "OLAK5uy_lgk");
    }

    #[test]
    fn rejects_non_video_paths() {
        assert!(client().parse_link("https://www.youtube.com/feed/subscriptions").is_none());
    }

    #[test]
    fn channel_artist_strips_topic_suffix() {
        assert_eq!(channel_artist("Neil Young - Topic"), "Neil Young");
        assert_eq!(channel_artist("NeilYoungChannel"), "NeilYoungChannel");
    }

    #[test]
    fn search_queries_follow_item_kind() {
        let item = MusicItem {
            title: "Harvest Moon".into(),
            artist: "Neil Young".into(),
            kind: Kind::Track,
            source_service: Service::Spotify,
            source_id: "x".into(),
            artwork_url: None,
        };

        assert_eq!(track_query(&item), "Harvest Moon Neil Young topic");

        let album = MusicItem { kind: Kind::Album, ..item };
        assert_eq!(album_query(&album), "Harvest Moon Neil Young full album");
    }
}
