//! Per-invocation reply bookkeeping.
//!
//! An [`InteractionCore`] wraps either a text message or a platform
//! interaction and tracks the reply and the latest follow-up that were sent
//! in response. Every operation validates the current state against a single
//! transition table (see [`ReplyOp::allowed`]) before touching the platform,
//! so the observable behaviour is the same for both transports.

use std::sync::Arc;

use twilight_model::{
    channel::message::MessageFlags,
    guild::Permissions,
    http::interaction::{InteractionResponse, InteractionResponseData, InteractionResponseType},
    id::{
        marker::{ChannelMarker, GuildMarker, UserMarker},
        Id,
    },
};

pub use self::{
    error::ReplyError,
    origin::{InteractionKind, InteractionOrigin, MessageOrigin},
    record::{ReplyOp, ReplyRecord, ReplyStateError, Slot, SlotState},
};
use crate::{
    core::{client::SentMessage, Context},
    util::{Authored, MessageBuilder},
};

mod error;
mod origin;
mod reactions;
mod record;

type ReplyResult<T> = Result<T, ReplyError>;

#[derive(Clone, Debug)]
pub enum Transport {
    Message(MessageOrigin),
    Interaction(InteractionOrigin),
}

impl Authored for Transport {
    fn channel_id(&self) -> Id<ChannelMarker> {
        match self {
            Self::Message(origin) => origin.channel_id(),
            Self::Interaction(origin) => origin.channel_id(),
        }
    }

    fn guild_id(&self) -> Option<Id<GuildMarker>> {
        match self {
            Self::Message(origin) => origin.guild_id(),
            Self::Interaction(origin) => origin.guild_id(),
        }
    }

    fn user_id(&self) -> Option<Id<UserMarker>> {
        match self {
            Self::Message(origin) => origin.user_id(),
            Self::Interaction(origin) => origin.user_id(),
        }
    }

    fn username(&self) -> Option<&str> {
        match self {
            Self::Message(origin) => origin.username(),
            Self::Interaction(origin) => origin.username(),
        }
    }
}

pub struct InteractionCore {
    ctx: Arc<Context>,
    transport: Transport,
    reply: Option<ReplyRecord>,
    follow_up: Option<ReplyRecord>,
}

impl InteractionCore {
    pub fn new(ctx: Arc<Context>, transport: Transport) -> Self {
        Self {
            ctx,
            transport,
            reply: None,
            follow_up: None,
        }
    }

    pub fn from_message(ctx: Arc<Context>, origin: MessageOrigin) -> Self {
        Self::new(ctx, Transport::Message(origin))
    }

    pub fn from_interaction(ctx: Arc<Context>, origin: InteractionOrigin) -> Self {
        Self::new(ctx, Transport::Interaction(origin))
    }

    pub fn ctx(&self) -> &Arc<Context> {
        &self.ctx
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    pub fn is_interaction(&self) -> bool {
        matches!(self.transport, Transport::Interaction(_))
    }

    pub fn reply_state(&self) -> SlotState {
        SlotState::of(self.reply.as_ref())
    }

    pub fn follow_up_state(&self) -> SlotState {
        SlotState::of(self.follow_up.as_ref())
    }

    pub fn reply_record(&self) -> Option<&ReplyRecord> {
        self.reply.as_ref()
    }

    pub fn follow_up_record(&self) -> Option<&ReplyRecord> {
        self.follow_up.as_ref()
    }

    /// The reply if there is one, the follow-up otherwise.
    pub fn first_reply(&self) -> Option<&ReplyRecord> {
        self.reply.as_ref().or(self.follow_up.as_ref())
    }

    /// The follow-up if there is one, the reply otherwise.
    pub fn last_reply(&self) -> Option<&ReplyRecord> {
        self.follow_up.as_ref().or(self.reply.as_ref())
    }

    pub fn first_reply_message(&self) -> Option<SentMessage> {
        self.first_reply().and_then(ReplyRecord::message)
    }

    pub fn last_reply_message(&self) -> Option<SentMessage> {
        self.last_reply().and_then(ReplyRecord::message)
    }

    fn permissions(&self) -> Option<Permissions> {
        match &self.transport {
            Transport::Message(origin) => origin.permissions,
            Transport::Interaction(origin) => origin.permissions,
        }
    }

    fn slot_mut(&mut self, slot: Slot) -> &mut Option<ReplyRecord> {
        match slot {
            Slot::Reply => &mut self.reply,
            Slot::FollowUp => &mut self.follow_up,
        }
    }

    /// The record of a slot if the operation is allowed on it.
    fn checked(&self, slot: Slot, op: ReplyOp) -> ReplyResult<&ReplyRecord> {
        let record = match slot {
            Slot::Reply => self.reply.as_ref(),
            Slot::FollowUp => self.follow_up.as_ref(),
        };

        let state = SlotState::of(record);
        op.check(slot, state)?;

        record.ok_or_else(|| ReplyStateError { slot, op, state }.into())
    }

    fn check_ephemeral(&self, ephemeral: bool, builder: Option<&MessageBuilder>) -> ReplyResult<()> {
        if !ephemeral {
            return Ok(());
        }

        if let Transport::Message(_) = self.transport {
            return Err(ReplyError::UnsupportedOperation(
                "ephemeral messages require an interaction",
            ));
        }

        if builder.map_or(false, MessageBuilder::has_reactions) {
            return Err(ReplyError::UnsupportedOperation(
                "ephemeral messages cannot have reactions",
            ));
        }

        Ok(())
    }

    /// Acknowledge the invocation without content yet.
    ///
    /// Text messages trigger the typing indicator, interactions send a
    /// deferred response.
    pub async fn defer_reply(&mut self, ephemeral: bool) -> ReplyResult<()> {
        ReplyOp::Defer.check(Slot::Reply, self.reply_state())?;
        self.check_ephemeral(ephemeral, None)?;

        let client = self.ctx.client();

        match &self.transport {
            Transport::Message(origin) => client.create_typing_trigger(origin.channel_id).await?,
            Transport::Interaction(origin) => {
                let kind = match origin.kind {
                    InteractionKind::Component { .. } if !ephemeral => {
                        InteractionResponseType::DeferredUpdateMessage
                    }
                    _ => InteractionResponseType::DeferredChannelMessageWithSource,
                };

                let data = ephemeral.then(|| InteractionResponseData {
                    flags: Some(MessageFlags::EPHEMERAL),
                    ..Default::default()
                });

                let response = InteractionResponse { kind, data };

                client
                    .create_response(origin.id, &origin.token, &response)
                    .await?;
            }
        }

        self.reply = Some(ReplyRecord::deferred(ephemeral));

        Ok(())
    }

    /// Send the reply.
    ///
    /// If the reply was deferred, this completes it and `ephemeral` must match
    /// the deferred flag.
    pub async fn reply(
        &mut self,
        builder: impl Into<MessageBuilder>,
        ephemeral: bool,
    ) -> ReplyResult<&ReplyRecord> {
        let builder = builder.into();
        let state = self.reply_state();
        ReplyOp::Reply.check(Slot::Reply, state)?;
        self.check_ephemeral(ephemeral, Some(&builder))?;

        if state == SlotState::Deferred {
            let deferred_ephemeral = self.reply.as_ref().map_or(false, ReplyRecord::is_ephemeral);

            if deferred_ephemeral != ephemeral {
                return Err(ReplyError::UnsupportedOperation(
                    "the ephemeral flag of a deferred reply cannot change",
                ));
            }

            return self.edit(Slot::Reply, builder).await;
        }

        let client = self.ctx.client();

        let msg = match &self.transport {
            Transport::Message(origin) => {
                client
                    .create_message(origin.channel_id, &builder, Some(origin.message_id))
                    .await?
            }
            Transport::Interaction(origin) => {
                let response = InteractionResponse {
                    kind: InteractionResponseType::ChannelMessageWithSource,
                    data: Some(builder.clone().into_response_data(ephemeral)),
                };

                client
                    .create_response(origin.id, &origin.token, &response)
                    .await?;

                client.response(&origin.token).await?
            }
        };

        let reactions = reactions::apply(client, msg, &builder.reactions).await;
        let record = self.reply.insert(ReplyRecord::sent(msg, builder, ephemeral));
        reactions?;

        Ok(&*record)
    }

    /// Replace the content of the reply or complete a deferred reply.
    pub async fn edit_reply(
        &mut self,
        builder: impl Into<MessageBuilder>,
    ) -> ReplyResult<&ReplyRecord> {
        self.edit(Slot::Reply, builder.into()).await
    }

    pub async fn delete_reply(&mut self) -> ReplyResult<()> {
        self.delete(Slot::Reply).await
    }

    /// Send an additional message.
    ///
    /// Requires a reply or deferred reply. Replaces the previously tracked
    /// follow-up, if any.
    pub async fn follow_up(
        &mut self,
        builder: impl Into<MessageBuilder>,
        ephemeral: bool,
    ) -> ReplyResult<&ReplyRecord> {
        let builder = builder.into();
        let reply = self.reply.as_ref();
        ReplyOp::FollowUp.check(Slot::Reply, SlotState::of(reply))?;

        let ephemeral = match reply {
            Some(reply) if reply.deferred && reply.ephemeral => true,
            _ => ephemeral,
        };

        self.check_ephemeral(ephemeral, Some(&builder))?;
        let client = self.ctx.client();

        let msg = match &self.transport {
            Transport::Message(origin) => {
                client
                    .create_message(origin.channel_id, &builder, None)
                    .await?
            }
            Transport::Interaction(origin) => {
                client
                    .create_followup(&origin.token, &builder, ephemeral)
                    .await?
            }
        };

        let reactions = reactions::apply(client, msg, &builder.reactions).await;
        let record = self
            .follow_up
            .insert(ReplyRecord::sent(msg, builder, ephemeral));
        reactions?;

        Ok(&*record)
    }

    pub async fn edit_follow_up(
        &mut self,
        builder: impl Into<MessageBuilder>,
    ) -> ReplyResult<&ReplyRecord> {
        self.edit(Slot::FollowUp, builder.into()).await
    }

    pub async fn delete_follow_up(&mut self) -> ReplyResult<()> {
        self.delete(Slot::FollowUp).await
    }

    /// Respond to a component interaction by editing the message the
    /// component is attached to.
    pub async fn update_source(
        &mut self,
        builder: impl Into<MessageBuilder>,
    ) -> ReplyResult<&ReplyRecord> {
        let builder = builder.into();

        let source = match &self.transport {
            Transport::Interaction(origin) => origin
                .source_message()
                .map(|message| (origin, message)),
            Transport::Message(_) => None,
        };

        let Some((origin, message)) = source else {
            return Err(ReplyError::UnsupportedOperation(
                "only component interactions have a source message",
            ));
        };

        ReplyOp::UpdateSource.check(Slot::Reply, self.reply_state())?;

        let response = InteractionResponse {
            kind: InteractionResponseType::UpdateMessage,
            data: Some(builder.clone().into_response_data(false)),
        };

        let client = self.ctx.client();

        client
            .create_response(origin.id, &origin.token, &response)
            .await?;

        let reactions = reactions::apply(client, message, &builder.reactions).await;
        let record = self.reply.insert(ReplyRecord::sent(message, builder, false));
        reactions?;

        Ok(&*record)
    }

    /// Reply if there's no reply yet, complete a deferred reply, or follow up
    /// otherwise.
    pub async fn respond(
        &mut self,
        builder: impl Into<MessageBuilder>,
        ephemeral: bool,
    ) -> ReplyResult<&ReplyRecord> {
        match self.reply_state() {
            SlotState::Absent => self.reply(builder, ephemeral).await,
            SlotState::Deferred => self.edit_reply(builder).await,
            SlotState::Sent | SlotState::Deleted => self.follow_up(builder, ephemeral).await,
        }
    }

    async fn edit(&mut self, slot: Slot, builder: MessageBuilder) -> ReplyResult<&ReplyRecord> {
        let record = self.checked(slot, ReplyOp::Edit)?;
        let ephemeral = record.ephemeral;
        let deferred = record.deferred;
        let previous = record.message;

        let mut stale_reactions = record
            .content
            .as_ref()
            .map(|content| content.reactions.clone())
            .unwrap_or_default();

        self.check_ephemeral(ephemeral, Some(&builder))?;

        let guild_id = self.guild_id();
        let permissions = self.permissions();
        let client = self.ctx.client();

        if let Some(msg) = previous {
            // Emoji actions belong to the previous content
            for emoji in self.ctx.actions().detach_message(msg.id) {
                if !stale_reactions.contains(&emoji) {
                    stale_reactions.push(emoji);
                }
            }

            reactions::tear_down(client, msg, &stale_reactions, guild_id, permissions).await;
        }

        let msg = match (&self.transport, slot, previous) {
            // Typing indicators leave no message behind
            (Transport::Message(origin), Slot::Reply, None) => {
                client
                    .create_message(origin.channel_id, &builder, Some(origin.message_id))
                    .await?
            }
            (Transport::Message(_), _, Some(msg)) => client.update_message(msg, &builder).await?,
            (Transport::Interaction(origin), Slot::Reply, _) => {
                client.update_response(&origin.token, &builder).await?
            }
            (Transport::Interaction(origin), Slot::FollowUp, Some(msg)) => {
                client
                    .update_followup(&origin.token, msg.id, &builder)
                    .await?
            }
            (_, Slot::FollowUp, None) => {
                let state = SlotState::Deferred;

                return Err(ReplyStateError {
                    slot,
                    op: ReplyOp::Edit,
                    state,
                }
                .into());
            }
        };

        let reactions = reactions::apply(client, msg, &builder.reactions).await;

        let record = self.slot_mut(slot).insert(ReplyRecord {
            message: Some(msg),
            content: Some(builder),
            ephemeral,
            deleted: false,
            deferred,
        });

        reactions?;

        Ok(&*record)
    }

    async fn delete(&mut self, slot: Slot) -> ReplyResult<()> {
        let record = self.checked(slot, ReplyOp::Delete)?;

        let Some(msg) = record.message else {
            let state = record.state();

            return Err(ReplyStateError {
                slot,
                op: ReplyOp::Delete,
                state,
            }
            .into());
        };

        let client = self.ctx.client();

        match (&self.transport, slot) {
            (Transport::Message(_), _) => client.delete_message(msg).await?,
            (Transport::Interaction(origin), Slot::Reply) => {
                client.delete_response(&origin.token).await?
            }
            (Transport::Interaction(origin), Slot::FollowUp) => {
                client.delete_followup(&origin.token, msg.id).await?
            }
        }

        self.ctx.actions().detach_message(msg.id);

        if let Some(record) = self.slot_mut(slot) {
            record.deleted = true;
        }

        Ok(())
    }
}

impl Authored for InteractionCore {
    fn channel_id(&self) -> Id<ChannelMarker> {
        self.transport.channel_id()
    }

    fn guild_id(&self) -> Option<Id<GuildMarker>> {
        self.transport.guild_id()
    }

    fn user_id(&self) -> Option<Id<UserMarker>> {
        self.transport.user_id()
    }

    fn username(&self) -> Option<&str> {
        self.transport.username()
    }
}
