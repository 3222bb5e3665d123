use std::sync::Arc;

use twilight_model::{
    application::{command::CommandType, interaction::application_command::CommandDataOption},
    id::{marker::GenericMarker, Id},
};

use crate::{
    core::{
        commands::{flatten, CommandKinds},
        events::{log_processed, process_command, EventKind},
        Context,
    },
    interaction::{InteractionCore, InteractionOrigin},
};

/// Resolve and run a slash command or context menu command.
///
/// Returns whether a command was run.
pub async fn dispatch_command(
    ctx: Arc<Context>,
    origin: InteractionOrigin,
    name: &str,
    kind: CommandType,
    options: &[CommandDataOption],
    target_id: Option<Id<GenericMarker>>,
) -> bool {
    let (event_kind, command_kind) = match kind {
        CommandType::ChatInput => (EventKind::SlashCommand, CommandKinds::SLASH),
        CommandType::User => (EventKind::ContextMenu, CommandKinds::USER),
        CommandType::Message => (EventKind::ContextMenu, CommandKinds::MESSAGE_CONTEXT),
        _ => {
            warn!(?kind, name, "Received unknown command type");

            return false;
        }
    };

    let Some(command) = ctx.command(name) else {
        warn!(name, "Received unknown command");

        return false;
    };

    if !command.supports(command_kind) {
        warn!(name, ?kind, "Command does not support the invoked kind");

        return false;
    }

    event_kind.log(&origin, name);

    let args = flatten(options);
    let core = InteractionCore::from_interaction(Arc::clone(&ctx), origin);
    let name = command.name.clone();
    let res = process_command(ctx, command, core, args, command_kind, target_id).await;
    let kind = if command_kind == CommandKinds::SLASH {
        "slash command"
    } else {
        "context menu"
    };

    log_processed(res, kind, &name);

    true
}
