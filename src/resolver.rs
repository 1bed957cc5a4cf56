use std::sync::Arc;

use thiserror::Error;

use crate::models::music::{MusicLink, Reply, ServiceLink};
use crate::services::MusicService;
use crate::Data;

/// Both variants are recovered silently at the transport layer: the bot
/// answers the inline query with no suggestions.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("no recognized music link in the query")]
    UnrecognizedInput,
    #[error("source catalog lookup failed")]
    SourceLookupFailed(#[source] anyhow::Error),
}

/// The first recognized URL in `text` by position, with the service that
/// recognized it. Position ties go to the configured service order.
fn first_link<'a>(
    services: &'a [Arc<dyn MusicService>],
    text: &str,
) -> Option<(&'a Arc<dyn MusicService>, MusicLink)> {
    services
        .iter()
        .filter_map(|service| service.parse_link(text).map(|m| (service, m)))
        .min_by_key(|(_, m)| m.start)
        .map(|(service, m)| (service, m.link))
}

/// Resolve a free-text inline query into a [`Reply`]: recognize a link,
/// fetch canonical metadata from the source catalog, then search every
/// other service for an equivalent. The source service's own link always
/// comes first; a cross-service miss drops that service's link and nothing
/// else.
#[tracing::instrument(skip_all)]
pub async fn resolve(data: &Data, text: &str) -> Result<Reply, ResolveError> {
    let (source, link) =
        first_link(&data.services, text).ok_or(ResolveError::UnrecognizedInput)?;

    tracing::debug!(service = %source.service(), kind = ?link.kind, id = %link.id, "recognized music link");

    let item = source
        .lookup(&link)
        .await
        .map_err(ResolveError::SourceLookupFailed)?;

    let mut links = vec![ServiceLink {
        service: source.service(),
        url: source.item_url(&link),
    }];

    for other in data
        .services
        .iter()
        .filter(|service| service.service() != source.service())
    {
        match other.search(&item).await {
            Ok(url) => links.push(ServiceLink {
                service: other.service(),
                url,
            }),
            Err(e) => {
                tracing::debug!(err = ?e, service = %other.service(), "no cross-service match")
            }
        }
    }

    Ok(Reply { item, links })
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::models::music::{Kind, LinkMatch, MusicItem, Service};

    struct StubService {
        service: Service,
        marker: &'static str,
        kind: Kind,
        lookup_ok: bool,
        search_ok: bool,
    }

    #[async_trait]
    impl MusicService for StubService {
        fn service(&self) -> Service {
            self.service
        }

        fn parse_link(&self, text: &str) -> Option<LinkMatch> {
            text.find(self.marker).map(|start| LinkMatch {
                link: MusicLink {
                    service: self.service,
                    kind: self.kind,
                    id: "x1".into(),
                },
                start,
            })
        }

        fn item_url(&self, link: &MusicLink) -> String {
            format!("https://{}/{}", self.marker, link.id)
        }

        async fn lookup(&self, link: &MusicLink) -> anyhow::Result<MusicItem> {
            if !self.lookup_ok {
                anyhow::bail!("not found");
            }

            Ok(MusicItem {
                title: "Harvest Moon".into(),
                artist: "Neil Young".into(),
                kind: link.kind,
                source_service: self.service,
                source_id: link.id.clone(),
                artwork_url: None,
            })
        }

        async fn search(&self, _item: &MusicItem) -> anyhow::Result<String> {
            if !self.search_ok {
                anyhow::bail!("no results");
            }

            Ok(format!("https://{}/found", self.marker))
        }
    }

    fn data(spotify_lookup_ok: bool, youtube_search_ok: bool) -> Data {
        Data {
            services: vec![
                Arc::new(StubService {
                    service: Service::Spotify,
                    marker: "sp.test",
                    kind: Kind::Track,
                    lookup_ok: spotify_lookup_ok,
                    search_ok: true,
                }),
                Arc::new(StubService {
                    service: Service::YouTube,
                    marker: "yt.test",
                    kind: Kind::Album,
                    lookup_ok: true,
                    search_ok: youtube_search_ok,
                }),
            ],
        }
    }

    #[tokio::test]
    async fn unrecognized_input_is_no_match() {
        let result = resolve(&data(true, true), "just some words").await;
        assert!(matches!(result, Err(ResolveError::UnrecognizedInput)));
    }

    #[tokio::test]
    async fn failed_source_lookup_is_no_match() {
        let result = resolve(&data(false, true), "https://sp.test/x1").await;
        assert!(matches!(result, Err(ResolveError::SourceLookupFailed(_))));
    }

    #[tokio::test]
    async fn source_link_comes_first_and_services_are_unique() {
        let reply = resolve(&data(true, true), "https://sp.test/x1").await.unwrap();

        assert_eq!(reply.item.kind, Kind::Track);
        assert_eq!(reply.item.source_service, Service::Spotify);

        let services: Vec<_> = reply.links.iter().map(|link| link.service).collect();
        assert_eq!(services, vec![Service::Spotify, Service::YouTube]);
    }

    #[tokio::test]
    async fn cross_service_miss_only_drops_that_link() {
        let reply = resolve(&data(true, false), "https://sp.test/x1").await.unwrap();

        let services: Vec<_> = reply.links.iter().map(|link| link.service).collect();
        assert_eq!(services, vec![Service::Spotify]);
    }

    #[tokio::test]
    async fn earliest_url_in_the_text_wins() {
        let reply = resolve(&data(true, true), "https://yt.test/a then https://sp.test/b")
            .await
            .unwrap();

        assert_eq!(reply.item.source_service, Service::YouTube);
        assert_eq!(reply.item.kind, Kind::Album);
        assert_eq!(reply.links[0].service, Service::YouTube);
    }

    #[tokio::test]
    async fn resolving_twice_yields_the_same_item() {
        let d = data(true, true);
        let first = resolve(&d, "https://sp.test/x1").await.unwrap();
        let second = resolve(&d, "https://sp.test/x1").await.unwrap();

        assert_eq!(first.item, second.item);
    }
}
