use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc,
};

use async_trait::async_trait;
use eyre::Result;
use parking_lot::Mutex;
use twilight_model::{
    application::command::CommandType,
    channel::message::MessageFlags,
    http::interaction::{InteractionResponse, InteractionResponseType},
    id::{
        marker::{ChannelMarker, InteractionMarker, MessageMarker, UserMarker},
        Id,
    },
};

use super::{CommandScope, DiscordApi, SentMessage};
use crate::{
    core::{commands::RemoteCommand, BotConfig, Context},
    util::{MessageBuilder, ReactionEmoji},
};

pub const BOT_ID: Id<UserMarker> = Id::new(1);

/// Channel every message of the recording client lives in unless stated
/// otherwise.
pub const CHANNEL_ID: Id<ChannelMarker> = Id::new(10);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    CreateMessage {
        channel_id: Id<ChannelMarker>,
        content: Option<String>,
        reply_to: Option<Id<MessageMarker>>,
    },
    UpdateMessage {
        msg: SentMessage,
        content: Option<String>,
    },
    DeleteMessage(SentMessage),
    Typing(Id<ChannelMarker>),
    CreateReaction(SentMessage, ReactionEmoji),
    DeleteAllReactions(SentMessage),
    DeleteOwnReaction(SentMessage, ReactionEmoji),
    CreateResponse {
        interaction_id: Id<InteractionMarker>,
        kind: InteractionResponseType,
        ephemeral: bool,
        content: Option<String>,
    },
    UpdateResponse {
        content: Option<String>,
    },
    DeleteResponse,
    CreateFollowup {
        content: Option<String>,
        ephemeral: bool,
    },
    UpdateFollowup {
        message_id: Id<MessageMarker>,
        content: Option<String>,
    },
    DeleteFollowup(Id<MessageMarker>),
    CreateCommand(CommandScope, String),
    UpdateCommand(CommandScope, String),
    DeleteCommand(CommandScope, String),
}

/// In-memory [`DiscordApi`] that records every call.
#[derive(Default)]
pub struct RecordingClient {
    calls: Mutex<Vec<Call>>,
    next_id: AtomicU64,
    response: Mutex<Option<SentMessage>>,
    remote: Mutex<Vec<(CommandScope, RemoteCommand)>>,
    fail_bulk_reactions: AtomicBool,
    failing_commands: Mutex<Option<CommandType>>,
}

impl RecordingClient {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(100),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().clear();
    }

    pub fn fail_bulk_reactions(&self) {
        self.fail_bulk_reactions.store(true, Ordering::SeqCst);
    }

    /// Reject every create, update, and delete of commands with this type.
    pub fn fail_commands_of(&self, kind: CommandType) {
        *self.failing_commands.lock() = Some(kind);
    }

    fn check_command(&self, command: &RemoteCommand) -> Result<()> {
        if *self.failing_commands.lock() == Some(command.kind) {
            bail!("rejected command `{}`", command.name);
        }

        Ok(())
    }

    pub fn remote_commands(&self, scope: CommandScope) -> Vec<RemoteCommand> {
        self.remote
            .lock()
            .iter()
            .filter(|(s, _)| *s == scope)
            .map(|(_, cmd)| cmd.clone())
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().push(call);
    }

    fn next_message(&self, channel_id: Id<ChannelMarker>) -> SentMessage {
        SentMessage {
            id: Id::new(self.next_id.fetch_add(1, Ordering::SeqCst)),
            channel_id,
        }
    }
}

#[async_trait]
impl DiscordApi for RecordingClient {
    async fn create_message(
        &self,
        channel_id: Id<ChannelMarker>,
        builder: &MessageBuilder,
        reply_to: Option<Id<MessageMarker>>,
    ) -> Result<SentMessage> {
        self.record(Call::CreateMessage {
            channel_id,
            content: builder.content.clone(),
            reply_to,
        });

        Ok(self.next_message(channel_id))
    }

    async fn update_message(
        &self,
        msg: SentMessage,
        builder: &MessageBuilder,
    ) -> Result<SentMessage> {
        self.record(Call::UpdateMessage {
            msg,
            content: builder.content.clone(),
        });

        Ok(msg)
    }

    async fn delete_message(&self, msg: SentMessage) -> Result<()> {
        self.record(Call::DeleteMessage(msg));

        Ok(())
    }

    async fn create_typing_trigger(&self, channel_id: Id<ChannelMarker>) -> Result<()> {
        self.record(Call::Typing(channel_id));

        Ok(())
    }

    async fn create_reaction(&self, msg: SentMessage, emoji: &ReactionEmoji) -> Result<()> {
        self.record(Call::CreateReaction(msg, emoji.clone()));

        Ok(())
    }

    async fn delete_all_reactions(&self, msg: SentMessage) -> Result<()> {
        if self.fail_bulk_reactions.load(Ordering::SeqCst) {
            bail!("missing permissions");
        }

        self.record(Call::DeleteAllReactions(msg));

        Ok(())
    }

    async fn delete_current_user_reaction(
        &self,
        msg: SentMessage,
        emoji: &ReactionEmoji,
    ) -> Result<()> {
        self.record(Call::DeleteOwnReaction(msg, emoji.clone()));

        Ok(())
    }

    async fn create_response(
        &self,
        interaction_id: Id<InteractionMarker>,
        _: &str,
        response: &InteractionResponse,
    ) -> Result<()> {
        let data = response.data.as_ref();

        self.record(Call::CreateResponse {
            interaction_id,
            kind: response.kind,
            ephemeral: data
                .and_then(|data| data.flags)
                .map_or(false, |flags| flags.contains(MessageFlags::EPHEMERAL)),
            content: data.and_then(|data| data.content.clone()),
        });

        let msg = self.next_message(CHANNEL_ID);
        *self.response.lock() = Some(msg);

        Ok(())
    }

    async fn response(&self, _: &str) -> Result<SentMessage> {
        (*self.response.lock()).ok_or_else(|| eyre!("no interaction response"))
    }

    async fn update_response(&self, _: &str, builder: &MessageBuilder) -> Result<SentMessage> {
        self.record(Call::UpdateResponse {
            content: builder.content.clone(),
        });

        (*self.response.lock()).ok_or_else(|| eyre!("no interaction response"))
    }

    async fn delete_response(&self, _: &str) -> Result<()> {
        self.record(Call::DeleteResponse);

        Ok(())
    }

    async fn create_followup(
        &self,
        _: &str,
        builder: &MessageBuilder,
        ephemeral: bool,
    ) -> Result<SentMessage> {
        self.record(Call::CreateFollowup {
            content: builder.content.clone(),
            ephemeral,
        });

        Ok(self.next_message(CHANNEL_ID))
    }

    async fn update_followup(
        &self,
        _: &str,
        message_id: Id<MessageMarker>,
        builder: &MessageBuilder,
    ) -> Result<SentMessage> {
        self.record(Call::UpdateFollowup {
            message_id,
            content: builder.content.clone(),
        });

        Ok(SentMessage {
            id: message_id,
            channel_id: CHANNEL_ID,
        })
    }

    async fn delete_followup(&self, _: &str, message_id: Id<MessageMarker>) -> Result<()> {
        self.record(Call::DeleteFollowup(message_id));

        Ok(())
    }

    async fn commands(&self, scope: CommandScope) -> Result<Vec<RemoteCommand>> {
        Ok(self.remote_commands(scope))
    }

    async fn create_command(
        &self,
        scope: CommandScope,
        command: &RemoteCommand,
    ) -> Result<RemoteCommand> {
        self.check_command(command)?;
        self.record(Call::CreateCommand(scope, command.name.clone()));

        let mut created = command.clone();
        created.id = Some(Id::new(self.next_id.fetch_add(1, Ordering::SeqCst)));
        self.remote.lock().push((scope, created.clone()));

        Ok(created)
    }

    async fn update_command(
        &self,
        scope: CommandScope,
        command: &RemoteCommand,
    ) -> Result<RemoteCommand> {
        self.check_command(command)?;
        self.record(Call::UpdateCommand(scope, command.name.clone()));

        let mut remote = self.remote.lock();

        let entry = remote
            .iter_mut()
            .find(|(s, cmd)| *s == scope && cmd.name == command.name && cmd.kind == command.kind)
            .ok_or_else(|| eyre!("unknown command `{}`", command.name))?;

        let id = entry.1.id;
        entry.1 = command.clone();
        entry.1.id = id;

        Ok(entry.1.clone())
    }

    async fn delete_command(&self, scope: CommandScope, command: &RemoteCommand) -> Result<()> {
        self.check_command(command)?;
        self.record(Call::DeleteCommand(scope, command.name.clone()));

        self.remote
            .lock()
            .retain(|(s, cmd)| !(*s == scope && cmd.id == command.id));

        Ok(())
    }
}

/// A [`Context`] backed by a fresh [`RecordingClient`].
pub fn context(config: BotConfig) -> (Arc<Context>, Arc<RecordingClient>) {
    let client = Arc::new(RecordingClient::new());
    let ctx = Context::new(config, Arc::clone(&client) as _, BOT_ID).unwrap();

    (Arc::new(ctx), client)
}
