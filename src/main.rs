#[macro_use]
extern crate tracing;

mod commands;

use std::sync::Arc;

use bathbot_interactions::core::{
    client::TwilightClient, event_loop, logging, BotConfig, Context,
};
use eyre::{Result, WrapErr};
use tokio::{runtime::Builder as RuntimeBuilder, signal};
use twilight_gateway::{Intents, Shard, ShardId};

fn main() {
    let runtime = RuntimeBuilder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Could not build runtime");

    if let Err(err) = dotenvy::dotenv() {
        panic!("Failed to prepare .env variables: {err}");
    }

    let _log_worker_guard = logging::init();

    if let Err(source) = runtime.block_on(async_main()) {
        error!(?source, "Critical error in main");
    }
}

async fn async_main() -> Result<()> {
    let config = BotConfig::from_env().wrap_err("failed to load config")?;
    let token = config.token.to_string();

    let client = TwilightClient::new(&token)
        .await
        .wrap_err("failed to create http client")?;

    let current_user = client.current_user().id;
    let ctx = Context::new(config, Arc::new(client), current_user)
        .wrap_err("failed to create context")?;

    let ctx = Arc::new(ctx);
    ctx.add_commands(commands::commands())?;

    let report = ctx
        .sync_commands()
        .await
        .wrap_err("failed to sync commands")?;

    info!(?report, "Synced {} commands", ctx.commands().len());

    let intents = Intents::GUILD_MESSAGES
        | Intents::GUILD_MESSAGE_REACTIONS
        | Intents::DIRECT_MESSAGES
        | Intents::DIRECT_MESSAGE_REACTIONS
        | Intents::MESSAGE_CONTENT;

    let mut shard = Shard::new(ShardId::ONE, token, intents);

    tokio::select! {
        _ = event_loop(Arc::clone(&ctx), &mut shard) => error!("Event loop ended"),
        res = signal::ctrl_c() => match res {
            Ok(_) => info!("Received Ctrl+C"),
            Err(err) => error!(?err, "Failed to await Ctrl+C"),
        }
    }

    Ok(())
}
