use serde::{Deserialize, Serialize};

/// Envelope shared by the iTunes search and lookup endpoints.
#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItunesResponse {
    pub result_count: u32,
    pub results: Vec<ItunesItem>,
}

#[derive(Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ItunesItem {
    pub wrapper_type: Option<String>,
    pub track_name: Option<String>,
    pub collection_name: Option<String>,
    pub artist_name: Option<String>,
    pub track_view_url: Option<String>,
    pub collection_view_url: Option<String>,
    pub artwork_url100: Option<String>,
}
