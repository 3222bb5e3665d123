use std::sync::Arc;

use twilight_model::channel::Message;

use super::{log_processed, process_command, EventKind};
use crate::{
    core::{
        commands::{map_positional, tokenize, Command, CommandArgs, CommandKinds},
        Context,
    },
    interaction::{InteractionCore, MessageOrigin},
};

pub async fn handle_message(ctx: Arc<Context>, msg: Message) {
    // Ignore bots and webhooks
    if msg.author.bot || msg.webhook_id.is_some() {
        return;
    }

    dispatch_message(ctx, MessageOrigin::from(&msg), &msg.content).await;
}

/// Run the text command the content invokes, if any.
///
/// Returns whether a command was invoked.
pub async fn dispatch_message(ctx: Arc<Context>, origin: MessageOrigin, content: &str) -> bool {
    let Some((command, args)) = parse_invoke(&ctx, content) else {
        return false;
    };

    let name = command.name.clone();
    EventKind::PrefixCommand.log(&origin, &name);

    let core = InteractionCore::from_message(Arc::clone(&ctx), origin);
    let res = process_command(ctx, command, core, args, CommandKinds::MESSAGE, None).await;
    log_processed(res, "prefix command", &name);

    true
}

fn parse_invoke(ctx: &Context, content: &str) -> Option<(Arc<Command>, CommandArgs)> {
    let content = content.strip_prefix(&*ctx.config().prefix)?;
    let tokens = tokenize(content);
    let (name, rest) = tokens.split_first()?;

    let Some(command) = ctx.command(name) else {
        trace!(name, "Unknown prefix command");

        return None;
    };

    if !command.supports(CommandKinds::MESSAGE) {
        trace!(name, "Command does not support prefix invocations");

        return None;
    }

    let args = map_positional(&command.args, rest);

    Some((command, args))
}
