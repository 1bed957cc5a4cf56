use std::sync::Arc;

use teloxide::dispatching::DefaultKey;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use crate::commands::{self, Command};
use crate::constants::version::get_version;
use crate::services::apple::AppleMusicClient;
use crate::services::spotify::SpotifyClient;
use crate::services::youtube::YouTubeClient;
use crate::services::MusicService;
use crate::{handlers, telemetry, Data, Error};

/// Cross-service links are listed in this order, source service first.
fn init_services() -> Vec<Arc<dyn MusicService>> {
    let spotify_client_id =
        std::env::var("SPOTIFY_CLIENT_ID").expect("missing SPOTIFY_CLIENT_ID");
    let spotify_client_secret =
        std::env::var("SPOTIFY_CLIENT_SECRET").expect("missing SPOTIFY_CLIENT_SECRET");
    let youtube_api_key = std::env::var("YOUTUBE_API_KEY").expect("missing YOUTUBE_API_KEY");

    let reqwest_client = reqwest::Client::new();

    vec![
        Arc::new(SpotifyClient::new(
            reqwest_client.clone(),
            spotify_client_id,
            spotify_client_secret,
        )),
        Arc::new(YouTubeClient::new(reqwest_client.clone(), youtube_api_key)),
        Arc::new(AppleMusicClient::new(reqwest_client)),
    ]
}

async fn init_bot(
    token: &str,
    data: Arc<Data>,
) -> anyhow::Result<Dispatcher<Bot, Error, DefaultKey>> {
    let bot = Bot::new(token);

    bot.set_my_commands(Command::bot_commands())
        .await
        .inspect_err(|e| tracing::error!(err = ?e, "an error occurred when registering commands"))?;

    let handler = dptree::entry()
        .branch(
            Update::filter_message()
                .filter_command::<Command>()
                .endpoint(commands::handle_command),
        )
        .branch(Update::filter_inline_query().endpoint(handlers::inline_query_handler));

    Ok(Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![data])
        .enable_ctrlc_handler()
        .build())
}

pub async fn init() -> anyhow::Result<Dispatcher<Bot, Error, DefaultKey>> {
    telemetry::init_telemetry().expect("failed to initialize telemetry");

    tracing::info!("linkmusic {} initializing... please wait warmly.", get_version());

    let token = std::env::var("TELEGRAM_TOKEN").expect("missing TELEGRAM_TOKEN");

    let data = Arc::new(Data {
        services: init_services(),
    });

    let dispatcher = init_bot(&token, data).await?;

    tracing::info!("finished initializing!");
    Ok(dispatcher)
}
