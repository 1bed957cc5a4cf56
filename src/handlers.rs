use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::{
    InlineQueryResult, InlineQueryResultArticle, InputMessageContent, InputMessageContentText,
    ParseMode,
};
use teloxide::utils::html;
use url::Url;

use crate::models::music::Reply;
use crate::resolver::{self, ResolveError};
use crate::{Data, HandlerResult};

/// The message sent when a suggestion is picked: the item line, then one
/// link per matched service, source service first.
fn reply_body(reply: &Reply) -> String {
    let mut lines = Vec::with_capacity(reply.links.len() + 1);
    lines.push(format!("<b>{}</b>", html::escape(&reply.item.to_string())));

    for link in &reply.links {
        lines.push(format!(
            "<a href=\"{}\">{}</a>",
            html::escape(&link.url),
            html::escape(link.service.name())
        ));
    }

    lines.join("\n")
}

fn make_article(reply: &Reply) -> InlineQueryResult {
    let content = InputMessageContent::Text(
        InputMessageContentText::new(reply_body(reply)).parse_mode(ParseMode::Html),
    );

    let mut article = InlineQueryResultArticle::new(
        uuid::Uuid::new_v4().to_string(),
        reply.item.to_string(),
        content,
    )
    .description(reply.item.artist.clone());

    if let Some(thumbnail) = reply
        .item
        .artwork_url
        .as_deref()
        .and_then(|artwork| Url::parse(artwork).ok())
    {
        article = article.thumbnail_url(thumbnail);
    }

    InlineQueryResult::Article(article)
}

#[tracing::instrument(skip_all)]
pub async fn inline_query_handler(bot: Bot, query: InlineQuery, data: Arc<Data>) -> HandlerResult {
    let results = match resolver::resolve(&data, &query.query).await {
        Ok(reply) => vec![make_article(&reply)],
        // both failure modes answer with no suggestions; the client UI
        // simply shows nothing
        Err(ResolveError::UnrecognizedInput) => vec![],
        Err(ResolveError::SourceLookupFailed(e)) => {
            tracing::warn!(err = ?e, "source lookup failed, offering no suggestion");
            vec![]
        }
    };

    bot.answer_inline_query(query.id, results)
        .await
        .inspect_err(
            |e| tracing::error!(err = ?e, "an error occurred when answering inline query"),
        )?;

    Ok(())
}
