use std::sync::Arc;

use eyre::Result;
use hashbrown::HashMap;
use parking_lot::RwLock;
use twilight_model::id::{marker::MessageMarker, Id};
use uuid::Uuid;

use super::{Action, ActionKind};
use crate::util::ReactionEmoji;

/// All actions that currently listen for components or reactions.
#[derive(Default)]
pub struct ActionRegistry {
    actions: RwLock<HashMap<Uuid, Arc<Action>>>,
}

impl ActionRegistry {
    pub fn register(&self, action: &Arc<Action>) -> Result<()> {
        if action.is_deleted() {
            bail!("cannot register deleted action {}", action.id());
        }

        self.actions.write().insert(action.id(), Arc::clone(action));
        action.set_registered(true);

        Ok(())
    }

    pub fn unregister(&self, id: Uuid) -> Option<Arc<Action>> {
        let action = self.actions.write().remove(&id)?;
        action.set_registered(false);

        Some(action)
    }

    pub fn get(&self, id: Uuid) -> Option<Arc<Action>> {
        self.actions.read().get(&id).cloned()
    }

    /// The button or select menu action with the given custom id.
    pub fn component(&self, custom_id: &str) -> Option<Arc<Action>> {
        let id = Uuid::parse_str(custom_id).ok()?;

        self.get(id).filter(|action| {
            matches!(
                action.kind(),
                ActionKind::Button { .. } | ActionKind::SelectMenu { .. }
            )
        })
    }

    /// Emoji actions with the given emoji that are applied to the message.
    pub fn matching_emoji(
        &self,
        emoji: &ReactionEmoji,
        message_id: Id<MessageMarker>,
    ) -> Vec<Arc<Action>> {
        self.actions
            .read()
            .values()
            .filter(|action| action.has_emoji(emoji) && action.is_applied_to(message_id))
            .cloned()
            .collect()
    }

    /// Detach every emoji action from the message.
    ///
    /// Returns the emojis of the detached actions.
    pub(crate) fn detach_message(&self, message_id: Id<MessageMarker>) -> Vec<ReactionEmoji> {
        let mut emojis = Vec::new();

        for action in self.actions.read().values() {
            if let Some(emoji) = action.detach(message_id) {
                if !emojis.contains(emoji) {
                    emojis.push(emoji.clone());
                }
            }
        }

        emojis
    }

    pub fn len(&self) -> usize {
        self.actions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use futures::FutureExt;
    use twilight_model::channel::message::component::{ButtonStyle, Component};

    use super::*;
    use crate::core::{
        client::{
            testing::{context, Call, CHANNEL_ID},
            SentMessage,
        },
        BotConfig,
    };

    fn noop_emoji(emoji: &str) -> Arc<Action> {
        Action::emoji(emoji, |_, _| async { Ok(()) }.boxed())
    }

    fn msg(id: u64) -> SentMessage {
        SentMessage {
            id: Id::new(id),
            channel_id: CHANNEL_ID,
        }
    }

    #[tokio::test]
    async fn emoji_filtering() {
        let (ctx, _) = context(BotConfig::new("token"));
        let registry = ctx.actions();

        let applied = noop_emoji("✅");
        let not_applied = noop_emoji("✅");
        let other_emoji = noop_emoji("❌");

        for action in [&applied, &not_applied, &other_emoji] {
            registry.register(action).unwrap();
        }

        applied.apply(&ctx, msg(1)).await.unwrap();
        other_emoji.apply(&ctx, msg(1)).await.unwrap();
        not_applied.apply(&ctx, msg(2)).await.unwrap();

        let matching = registry.matching_emoji(&ReactionEmoji::from("✅"), Id::new(1));

        assert_eq!(matching.len(), 1);
        assert_eq!(matching[0].id(), applied.id());
    }

    #[tokio::test]
    async fn delete_is_terminal() {
        let (ctx, client) = context(BotConfig::new("token"));
        let action = noop_emoji("✅");

        ctx.actions().register(&action).unwrap();
        action.apply(&ctx, msg(1)).await.unwrap();
        client.clear();

        action.delete(&ctx).await.unwrap();

        assert!(!action.is_registered());
        assert!(ctx.actions().is_empty());
        assert!(ctx.actions().register(&action).is_err());
        assert!(action.apply(&ctx, msg(1)).await.is_err());

        assert_eq!(
            client.calls(),
            [Call::DeleteOwnReaction(msg(1), ReactionEmoji::from("✅"))]
        );
    }

    #[test]
    fn components_resolve_by_custom_id() {
        let registry = ActionRegistry::default();
        let button = Action::button("Next", ButtonStyle::Primary, |_, _| async { Ok(()) }.boxed());
        let emoji = noop_emoji("✅");

        registry.register(&button).unwrap();
        registry.register(&emoji).unwrap();

        let found = registry.component(&button.custom_id()).unwrap();
        assert_eq!(found.id(), button.id());

        assert!(registry.component(&emoji.custom_id()).is_none());
        assert!(registry.component("not-a-uuid").is_none());

        registry.unregister(button.id());
        assert!(registry.component(&button.custom_id()).is_none());
        assert!(!button.is_registered());
    }

    #[test]
    fn buttons_render_with_custom_id() {
        let button = Action::button("Next", ButtonStyle::Primary, |_, _| async { Ok(()) }.boxed());

        let Some(Component::Button(rendered)) = button.button_component(true) else {
            panic!("expected a button");
        };

        assert_eq!(rendered.custom_id, Some(button.custom_id()));
        assert!(rendered.disabled);
    }
}
