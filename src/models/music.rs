use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Spotify,
    YouTube,
    AppleMusic,
}

impl Service {
    pub fn name(self) -> &'static str {
        match self {
            Service::Spotify => "Spotify",
            Service::YouTube => "YouTube",
            Service::AppleMusic => "Apple Music",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Track,
    Album,
}

/// A recognized music URL, reduced to what the catalog APIs need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MusicLink {
    pub service: Service,
    pub kind: Kind,
    pub id: String,
}

/// A [`MusicLink`] together with where it starts in the query text, so the
/// resolver can act on the first recognized URL when several match.
#[derive(Debug, Clone)]
pub struct LinkMatch {
    pub link: MusicLink,
    pub start: usize,
}

/// Canonical metadata for one track or album, as reported by the catalog of
/// the service the inbound link pointed at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MusicItem {
    pub title: String,
    pub artist: String,
    pub kind: Kind,
    pub source_service: Service,
    pub source_id: String,
    pub artwork_url: Option<String>,
}

impl fmt::Display for MusicItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            Kind::Track => write!(f, "{} — {}", self.artist, self.title),
            Kind::Album => write!(f, "{} by {}", self.title, self.artist),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceLink {
    pub service: Service,
    pub url: String,
}

/// One resolved item plus every per-service link that matched, source
/// service first. Holds at most one link per service.
#[derive(Debug, Clone)]
pub struct Reply {
    pub item: MusicItem,
    pub links: Vec<ServiceLink>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(kind: Kind) -> MusicItem {
        MusicItem {
            title: "Bad Apple!!".into(),
            artist: "Alstroemeria Records".into(),
            kind,
            source_service: Service::Spotify,
            source_id: "4uLU6hMCjMI75M1A2tKUQC".into(),
            artwork_url: None,
        }
    }

    #[test]
    fn track_display_is_artist_then_title() {
        assert_eq!(
            item(Kind::Track).to_string(),
            "Alstroemeria Records — Bad Apple!!"
        );
    }

    #[test]
    fn album_display_is_title_by_artist() {
        assert_eq!(
            item(Kind::Album).to_string(),
            "Bad Apple!! by Alstroemeria Records"
        );
    }
}
