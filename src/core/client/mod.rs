use std::fmt::{Display, Formatter, Result as FmtResult};

use async_trait::async_trait;
use eyre::Result;
use twilight_model::{
    channel::Message,
    http::interaction::InteractionResponse,
    id::{
        marker::{ChannelMarker, GuildMarker, InteractionMarker, MessageMarker},
        Id,
    },
};

pub use self::twilight::TwilightClient;
use crate::{
    core::commands::RemoteCommand,
    util::{MessageBuilder, ReactionEmoji},
};

mod twilight;

#[cfg(test)]
pub(crate) mod testing;

/// Handle of a message that was sent through the platform.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SentMessage {
    pub id: Id<MessageMarker>,
    pub channel_id: Id<ChannelMarker>,
}

impl From<&Message> for SentMessage {
    #[inline]
    fn from(msg: &Message) -> Self {
        Self {
            id: msg.id,
            channel_id: msg.channel_id,
        }
    }
}

/// Where application commands are registered.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CommandScope {
    Global,
    Guild(Id<GuildMarker>),
}

impl Display for CommandScope {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Global => f.write_str("global"),
            Self::Guild(guild) => write!(f, "guild {guild}"),
        }
    }
}

/// The REST surface of the chat platform the framework relies on.
#[async_trait]
pub trait DiscordApi: Send + Sync {
    async fn create_message(
        &self,
        channel_id: Id<ChannelMarker>,
        builder: &MessageBuilder,
        reply_to: Option<Id<MessageMarker>>,
    ) -> Result<SentMessage>;

    /// Replace the content of a message.
    async fn update_message(&self, msg: SentMessage, builder: &MessageBuilder)
        -> Result<SentMessage>;

    async fn delete_message(&self, msg: SentMessage) -> Result<()>;

    async fn create_typing_trigger(&self, channel_id: Id<ChannelMarker>) -> Result<()>;

    async fn create_reaction(&self, msg: SentMessage, emoji: &ReactionEmoji) -> Result<()>;

    /// Remove all reactions of all users, requires permission to manage
    /// messages.
    async fn delete_all_reactions(&self, msg: SentMessage) -> Result<()>;

    /// Remove the bot's own reaction.
    async fn delete_current_user_reaction(
        &self,
        msg: SentMessage,
        emoji: &ReactionEmoji,
    ) -> Result<()>;

    /// Initial callback of an interaction.
    async fn create_response(
        &self,
        interaction_id: Id<InteractionMarker>,
        token: &str,
        response: &InteractionResponse,
    ) -> Result<()>;

    /// The message created through the initial callback.
    async fn response(&self, token: &str) -> Result<SentMessage>;

    async fn update_response(&self, token: &str, builder: &MessageBuilder) -> Result<SentMessage>;

    async fn delete_response(&self, token: &str) -> Result<()>;

    async fn create_followup(
        &self,
        token: &str,
        builder: &MessageBuilder,
        ephemeral: bool,
    ) -> Result<SentMessage>;

    async fn update_followup(
        &self,
        token: &str,
        message_id: Id<MessageMarker>,
        builder: &MessageBuilder,
    ) -> Result<SentMessage>;

    async fn delete_followup(&self, token: &str, message_id: Id<MessageMarker>) -> Result<()>;

    async fn commands(&self, scope: CommandScope) -> Result<Vec<RemoteCommand>>;

    async fn create_command(
        &self,
        scope: CommandScope,
        command: &RemoteCommand,
    ) -> Result<RemoteCommand>;

    async fn update_command(
        &self,
        scope: CommandScope,
        command: &RemoteCommand,
    ) -> Result<RemoteCommand>;

    async fn delete_command(&self, scope: CommandScope, command: &RemoteCommand) -> Result<()>;
}
