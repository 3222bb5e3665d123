use twilight_model::{
    application::interaction::Interaction,
    channel::Message,
    guild::Permissions,
    id::{
        marker::{ChannelMarker, GuildMarker, InteractionMarker, MessageMarker, UserMarker},
        Id,
    },
};

use crate::{core::client::SentMessage, util::Authored};

/// A text message that invoked a command.
#[derive(Clone, Debug)]
pub struct MessageOrigin {
    pub message_id: Id<MessageMarker>,
    pub channel_id: Id<ChannelMarker>,
    pub guild_id: Option<Id<GuildMarker>>,
    pub author_id: Id<UserMarker>,
    pub author_name: String,
    /// The bot's permissions in the channel, if known.
    ///
    /// Message events carry no permissions so this is `None` unless set
    /// through [`MessageOrigin::with_permissions`]. Reaction teardown in
    /// guilds then tries bulk removal first and falls back to removing the
    /// bot's own reactions if that is rejected.
    pub permissions: Option<Permissions>,
}

impl MessageOrigin {
    /// Provide the bot's channel permissions, e.g. from a cache.
    pub fn with_permissions(mut self, permissions: Permissions) -> Self {
        self.permissions = Some(permissions);

        self
    }
}

impl From<&Message> for MessageOrigin {
    fn from(msg: &Message) -> Self {
        Self {
            message_id: msg.id,
            channel_id: msg.channel_id,
            guild_id: msg.guild_id,
            author_id: msg.author.id,
            author_name: msg.author.name.clone(),
            permissions: None,
        }
    }
}

impl Authored for MessageOrigin {
    fn channel_id(&self) -> Id<ChannelMarker> {
        self.channel_id
    }

    fn guild_id(&self) -> Option<Id<GuildMarker>> {
        self.guild_id
    }

    fn user_id(&self) -> Option<Id<UserMarker>> {
        Some(self.author_id)
    }

    fn username(&self) -> Option<&str> {
        Some(&self.author_name)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InteractionKind {
    /// Slash command, context menu, or autocomplete.
    Command,
    /// Button or select menu on the given message.
    Component { message: SentMessage },
}

/// A platform interaction.
#[derive(Clone, Debug)]
pub struct InteractionOrigin {
    pub id: Id<InteractionMarker>,
    pub token: String,
    pub channel_id: Id<ChannelMarker>,
    pub guild_id: Option<Id<GuildMarker>>,
    pub user_id: Option<Id<UserMarker>>,
    pub username: Option<String>,
    /// The bot's permissions in the channel.
    pub permissions: Option<Permissions>,
    pub kind: InteractionKind,
}

impl InteractionOrigin {
    /// `None` if the interaction did not happen in a channel.
    pub fn new(interaction: &Interaction) -> Option<Self> {
        let channel_id = interaction.channel.as_ref()?.id;

        let kind = match interaction.message {
            Some(ref msg) => InteractionKind::Component {
                message: SentMessage::from(msg),
            },
            None => InteractionKind::Command,
        };

        Some(Self {
            id: interaction.id,
            token: interaction.token.clone(),
            channel_id,
            guild_id: interaction.guild_id,
            user_id: interaction.author_id(),
            username: interaction.author().map(|user| user.name.clone()),
            permissions: interaction.app_permissions,
            kind,
        })
    }

    pub fn source_message(&self) -> Option<SentMessage> {
        match self.kind {
            InteractionKind::Component { message } => Some(message),
            InteractionKind::Command => None,
        }
    }
}

impl Authored for InteractionOrigin {
    fn channel_id(&self) -> Id<ChannelMarker> {
        self.channel_id
    }

    fn guild_id(&self) -> Option<Id<GuildMarker>> {
        self.guild_id
    }

    fn user_id(&self) -> Option<Id<UserMarker>> {
        self.user_id
    }

    fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }
}
