use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    sync::Arc,
};

use eyre::{Report, Result};
use twilight_gateway::{Event, Shard};
use twilight_model::id::{
    marker::{ChannelMarker, GenericMarker, GuildMarker},
    Id,
};

pub use self::{
    interaction::{
        autocomplete_choices, dispatch_autocomplete, dispatch_command, dispatch_component,
        handle_interaction,
    },
    message::{dispatch_message, handle_message},
    reaction::{dispatch_reaction, handle_reaction, ReactionEvent},
};
use super::{
    commands::{Command, CommandArgs, CommandInvocation, CommandKinds},
    Context,
};
use crate::{interaction::InteractionCore, util::Authored};

mod interaction;
mod message;
mod reaction;

#[derive(Debug)]
enum ProcessResult {
    Success,
    NoDM,
}

pub enum EventKind {
    Autocomplete,
    Component,
    ContextMenu,
    PrefixCommand,
    Reaction,
    SlashCommand,
}

impl EventKind {
    fn log<A: Authored>(self, orig: &A, name: &str) {
        let location = EventLocation::new(orig);
        let username = orig.username().unwrap_or("<unknown user>");

        info!("[{location}] {username} {self} `{name}`");
    }
}

impl Display for EventKind {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Autocomplete => f.write_str("autocompleted"),
            Self::Component => f.write_str("used component"),
            Self::ContextMenu => f.write_str("used context menu"),
            Self::PrefixCommand => f.write_str("used prefix command"),
            Self::Reaction => f.write_str("reacted"),
            Self::SlashCommand => f.write_str("used slash command"),
        }
    }
}

enum EventLocation {
    Private,
    Guild {
        guild_id: Id<GuildMarker>,
        channel_id: Id<ChannelMarker>,
    },
}

impl EventLocation {
    fn new<A: Authored>(orig: &A) -> Self {
        match orig.guild_id() {
            Some(guild_id) => Self::Guild {
                guild_id,
                channel_id: orig.channel_id(),
            },
            None => Self::Private,
        }
    }
}

impl Display for EventLocation {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Private => f.write_str("Private"),
            Self::Guild {
                guild_id,
                channel_id,
            } => write!(f, "{guild_id}:{channel_id}"),
        }
    }
}

pub async fn event_loop(ctx: Arc<Context>, shard: &mut Shard) {
    loop {
        let err = match shard.next_event().await {
            Ok(event) => {
                let ctx = Arc::clone(&ctx);
                tokio::spawn(handle_event(ctx, event));

                continue;
            }
            Err(err) => err,
        };

        let is_fatal = err.is_fatal();
        error!("{:?}", Report::new(err).wrap_err("Event error"));

        if is_fatal {
            return;
        }
    }
}

pub async fn handle_event(ctx: Arc<Context>, event: Event) {
    match event {
        Event::GatewayClose(Some(frame)) => {
            warn!(
                "Received closing frame: reason={} (code {})",
                frame.reason, frame.code,
            )
        }
        Event::GatewayClose(None) => warn!("Received closing frame"),
        Event::GatewayReconnect => info!("Gateway requested to reconnect"),
        Event::InteractionCreate(e) => handle_interaction(ctx, e.0).await,
        Event::MessageCreate(msg) => handle_message(ctx, msg.0).await,
        Event::ReactionAdd(e) => handle_reaction(ctx, e.0, true).await,
        Event::ReactionRemove(e) => handle_reaction(ctx, e.0, false).await,
        Event::Ready(ready) => info!("Shard is ready as {}", ready.user.name),
        Event::Resumed => info!("Shard is resumed"),
        _ => {}
    }
}

/// Guard, defer, and run a resolved command.
async fn process_command(
    ctx: Arc<Context>,
    command: Arc<Command>,
    mut core: InteractionCore,
    args: CommandArgs,
    kind: CommandKinds,
    target_id: Option<Id<GenericMarker>>,
) -> Result<ProcessResult> {
    let ephemeral = command.flags.ephemeral() && core.is_interaction();

    if command.flags.only_guilds() && core.guild_id().is_none() {
        let content = "That command is only available in servers";
        core.reply(content, ephemeral).await?;

        return Ok(ProcessResult::NoDM);
    }

    if command.flags.defer() {
        core.defer_reply(ephemeral).await?;
    }

    let invocation = CommandInvocation {
        core,
        args,
        kind,
        target_id,
    };

    command.run(ctx, invocation).await?;

    Ok(ProcessResult::Success)
}

fn log_processed(res: Result<ProcessResult>, kind: &str, name: &str) {
    match res {
        Ok(ProcessResult::Success) => info!("Processed command `{name}`"),
        Ok(result) => info!("Command `{name}` was not processed: {result:?}"),
        Err(err) => {
            let wrap = format!("Failed to process {kind} `{name}`");
            error!("{:?}", err.wrap_err(wrap));
        }
    }
}
