use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: u64,
}

#[derive(Deserialize, Serialize)]
pub struct Track {
    pub name: String,
    pub artists: Vec<Artist>,
    pub album: AlbumRef,
    pub external_urls: ExternalUrls,
}

/// The simplified album object embedded in a track.
#[derive(Deserialize, Serialize)]
pub struct AlbumRef {
    pub name: String,
    pub images: Vec<Image>,
}

#[derive(Deserialize, Serialize)]
pub struct Album {
    pub name: String,
    pub artists: Vec<Artist>,
    pub images: Vec<Image>,
    pub external_urls: ExternalUrls,
}

#[derive(Deserialize, Serialize)]
pub struct Artist {
    pub name: String,
}

#[derive(Deserialize, Serialize)]
pub struct Image {
    pub url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Deserialize, Serialize)]
pub struct ExternalUrls {
    pub spotify: String,
}

#[derive(Deserialize, Serialize)]
pub struct SearchResponse {
    pub tracks: Option<Page<Track>>,
    pub albums: Option<Page<Album>>,
}

#[derive(Deserialize, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
}
