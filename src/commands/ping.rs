use std::time::Instant;

use bathbot_interactions::{Command, CommandInvocation};
use eyre::Result;
use futures::FutureExt;

pub fn ping() -> Command {
    Command::new("ping", "Check if the bot is online", |_, invocation| {
        ping_(invocation).boxed()
    })
}

async fn ping_(mut invocation: CommandInvocation) -> Result<()> {
    let start = Instant::now();
    invocation.core.reply("Pong", false).await?;
    let elapsed = (Instant::now() - start).as_millis();

    let content = format!(":ping_pong: Pong! ({elapsed}ms)");
    invocation.core.edit_reply(content).await?;

    Ok(())
}
