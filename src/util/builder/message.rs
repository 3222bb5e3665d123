use std::slice;

use twilight_model::{
    channel::message::{component::Component, Embed, MessageFlags},
    http::interaction::InteractionResponseData,
};

use crate::util::ReactionEmoji;

/// Content of a message the framework sends or edits.
///
/// Reactions are not part of the message payload itself, they are applied
/// after the message has been sent and torn down when the content is
/// replaced.
#[derive(Clone, Debug, Default)]
pub struct MessageBuilder {
    pub content: Option<String>,
    pub embed: Option<Embed>,
    pub components: Option<Vec<Component>>,
    pub reactions: Vec<ReactionEmoji>,
}

impl MessageBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());

        self
    }

    pub fn embed(mut self, embed: Embed) -> Self {
        self.embed = Some(embed);

        self
    }

    pub fn components(mut self, components: Vec<Component>) -> Self {
        self.components = Some(components);

        self
    }

    pub fn reaction(mut self, emoji: impl Into<ReactionEmoji>) -> Self {
        self.reactions.push(emoji.into());

        self
    }

    pub fn has_reactions(&self) -> bool {
        !self.reactions.is_empty()
    }

    /// Embeds as slice, empty if there is no embed.
    pub fn embeds(&self) -> &[Embed] {
        self.embed.as_ref().map_or(&[], slice::from_ref)
    }

    /// Components as slice, empty if there are no components.
    pub fn component_slice(&self) -> &[Component] {
        self.components.as_deref().unwrap_or_default()
    }

    /// Payload for an interaction callback.
    pub fn into_response_data(self, ephemeral: bool) -> InteractionResponseData {
        InteractionResponseData {
            content: self.content,
            embeds: self.embed.map(|embed| vec![embed]),
            components: self.components,
            flags: ephemeral.then_some(MessageFlags::EPHEMERAL),
            ..Default::default()
        }
    }
}

impl From<&str> for MessageBuilder {
    #[inline]
    fn from(content: &str) -> Self {
        Self::new().content(content)
    }
}

impl From<String> for MessageBuilder {
    #[inline]
    fn from(content: String) -> Self {
        Self::new().content(content)
    }
}

impl From<Embed> for MessageBuilder {
    #[inline]
    fn from(embed: Embed) -> Self {
        Self::new().embed(embed)
    }
}
