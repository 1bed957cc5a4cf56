use std::sync::Arc;

use crate::services::MusicService;

/// Shared state handed to every update handler.
pub struct Data {
    /// The supported services, in the order cross-service links are listed.
    pub services: Vec<Arc<dyn MusicService>>,
}

type Error = Box<dyn std::error::Error + Send + Sync>;
type HandlerResult = Result<(), Error>;

mod commands;
mod constants;
mod handlers;
mod init;
mod models;
mod resolver;
mod services;
mod telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let mut dispatcher = init::init().await?;
    dispatcher.dispatch().await;

    Ok(())
}
