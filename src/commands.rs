use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use crate::HandlerResult;

const START_TEXT: &str = "Hello! I'm designed to be used in inline mode. Type my name \
followed by the link to a song on your favorite music service! I work in all chats.";

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "these commands are supported:")]
pub enum Command {
    #[command(description = "explain how to use the bot.")]
    Start,
    #[command(description = "display this text.")]
    Help,
}

#[tracing::instrument(skip_all)]
pub async fn handle_command(bot: Bot, msg: Message, cmd: Command) -> HandlerResult {
    let text = match cmd {
        Command::Start => START_TEXT.to_string(),
        Command::Help => Command::descriptions().to_string(),
    };

    bot.send_message(msg.chat.id, text)
        .await
        .inspect_err(|e| tracing::error!(err = ?e, "an error occurred when sending reply"))?;

    Ok(())
}
