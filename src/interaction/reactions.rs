use eyre::Result;
use twilight_model::{
    guild::Permissions,
    id::{marker::GuildMarker, Id},
};

use crate::{
    core::client::{DiscordApi, SentMessage},
    util::ReactionEmoji,
};

pub(super) async fn apply(
    client: &dyn DiscordApi,
    msg: SentMessage,
    emojis: &[ReactionEmoji],
) -> Result<()> {
    for emoji in emojis {
        client.create_reaction(msg, emoji).await?;
    }

    Ok(())
}

/// Remove reactions of previous content.
///
/// Prefers removing all reactions at once which requires permission to manage
/// messages. Falls back to removing only the bot's own reactions. Failures
/// are logged, never propagated.
pub(super) async fn tear_down(
    client: &dyn DiscordApi,
    msg: SentMessage,
    emojis: &[ReactionEmoji],
    guild_id: Option<Id<GuildMarker>>,
    permissions: Option<Permissions>,
) {
    if emojis.is_empty() {
        return;
    }

    let can_bulk = guild_id.is_some()
        && permissions.map_or(true, |permissions| {
            permissions.contains(Permissions::MANAGE_MESSAGES)
        });

    if can_bulk {
        match client.delete_all_reactions(msg).await {
            Ok(_) => return,
            Err(err) => debug!(?err, "Bulk reaction removal failed, removing own reactions"),
        }
    }

    for emoji in emojis {
        if let Err(err) = client.delete_current_user_reaction(msg, emoji).await {
            warn!(?err, %emoji, "Failed to remove own reaction");
        }
    }
}
