use std::sync::Arc;

use twilight_model::{
    gateway::GatewayReaction,
    id::{
        marker::{ChannelMarker, GuildMarker, UserMarker},
        Id,
    },
};

use super::EventKind;
use crate::{
    action::ActionTrigger,
    core::{client::SentMessage, Context},
    util::{Authored, ReactionEmoji},
};

/// A reaction that was added or removed.
#[derive(Clone, Debug)]
pub struct ReactionEvent {
    pub message: SentMessage,
    pub guild_id: Option<Id<GuildMarker>>,
    pub user_id: Id<UserMarker>,
    pub username: Option<String>,
    pub emoji: ReactionEmoji,
    pub added: bool,
}

impl ReactionEvent {
    pub fn new(reaction: &GatewayReaction, added: bool) -> Self {
        Self {
            message: SentMessage {
                id: reaction.message_id,
                channel_id: reaction.channel_id,
            },
            guild_id: reaction.guild_id,
            user_id: reaction.user_id,
            username: reaction
                .member
                .as_ref()
                .map(|member| member.user.name.clone()),
            emoji: ReactionEmoji::from(&reaction.emoji),
            added,
        }
    }
}

impl Authored for ReactionEvent {
    fn channel_id(&self) -> Id<ChannelMarker> {
        self.message.channel_id
    }

    fn guild_id(&self) -> Option<Id<GuildMarker>> {
        self.guild_id
    }

    fn user_id(&self) -> Option<Id<UserMarker>> {
        Some(self.user_id)
    }

    fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }
}

pub async fn handle_reaction(ctx: Arc<Context>, reaction: GatewayReaction, added: bool) {
    dispatch_reaction(ctx, ReactionEvent::new(&reaction, added)).await;
}

/// Run every emoji action that listens for the reaction.
///
/// Returns how many actions were run.
pub async fn dispatch_reaction(ctx: Arc<Context>, event: ReactionEvent) -> usize {
    // Ignore the bot's own reactions
    if event.user_id == ctx.current_user() {
        return 0;
    }

    let actions = ctx
        .actions()
        .matching_emoji(&event.emoji, event.message.id);

    if actions.is_empty() {
        return 0;
    }

    EventKind::Reaction.log(&event, &event.emoji.to_string());

    for action in actions.iter() {
        let trigger = ActionTrigger::Reaction {
            message: event.message,
            user_id: event.user_id,
            guild_id: event.guild_id,
            added: event.added,
        };

        if let Err(err) = action.run(Arc::clone(&ctx), trigger).await {
            let wrap = format!("Failed to process reaction action {}", action.id());
            error!("{:?}", err.wrap_err(wrap));
        }
    }

    actions.len()
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use futures::FutureExt;
    use parking_lot::Mutex;

    use super::*;
    use crate::{
        action::Action,
        core::{
            client::testing::{context, BOT_ID, CHANNEL_ID},
            BotConfig,
        },
    };

    fn event(emoji: &str, message_id: u64, user_id: Id<UserMarker>) -> ReactionEvent {
        ReactionEvent {
            message: SentMessage {
                id: Id::new(message_id),
                channel_id: CHANNEL_ID,
            },
            guild_id: None,
            user_id,
            username: None,
            emoji: ReactionEmoji::from(emoji),
            added: true,
        }
    }

    fn counting(emoji: &str, counter: &Arc<AtomicUsize>) -> Arc<Action> {
        let counter = Arc::clone(counter);

        Action::emoji(emoji, move |_, invocation| {
            if let ActionTrigger::Reaction { added: true, .. } = invocation.trigger {
                counter.fetch_add(1, Ordering::SeqCst);
            }

            async { Ok(()) }.boxed()
        })
    }

    #[tokio::test]
    async fn only_applied_actions_fire() {
        let (ctx, _) = context(BotConfig::new("token"));
        let user = Id::new(42);

        let applied = Arc::new(AtomicUsize::new(0));
        let elsewhere = Arc::new(AtomicUsize::new(0));
        let other_emoji = Arc::new(AtomicUsize::new(0));

        let actions = [
            (counting("✅", &applied), 1),
            (counting("✅", &elsewhere), 2),
            (counting("❌", &other_emoji), 1),
        ];

        for (action, message_id) in actions.iter() {
            ctx.actions().register(action).unwrap();

            let msg = SentMessage {
                id: Id::new(*message_id),
                channel_id: CHANNEL_ID,
            };

            action.apply(&ctx, msg).await.unwrap();
        }

        let fired = dispatch_reaction(Arc::clone(&ctx), event("✅", 1, user)).await;

        assert_eq!(fired, 1);
        assert_eq!(applied.load(Ordering::SeqCst), 1);
        assert_eq!(elsewhere.load(Ordering::SeqCst), 0);
        assert_eq!(other_emoji.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn every_matching_action_fires() {
        let (ctx, _) = context(BotConfig::new("token"));
        let counter = Arc::new(AtomicUsize::new(0));
        let msg = SentMessage {
            id: Id::new(1),
            channel_id: CHANNEL_ID,
        };

        for _ in 0..2 {
            let action = counting("✅", &counter);
            ctx.actions().register(&action).unwrap();
            action.apply(&ctx, msg).await.unwrap();
        }

        dispatch_reaction(ctx, event("✅", 1, Id::new(42))).await;

        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn own_reactions_are_ignored() {
        let (ctx, _) = context(BotConfig::new("token"));
        let counter = Arc::new(AtomicUsize::new(0));
        let action = counting("✅", &counter);
        let msg = SentMessage {
            id: Id::new(1),
            channel_id: CHANNEL_ID,
        };

        ctx.actions().register(&action).unwrap();
        action.apply(&ctx, msg).await.unwrap();

        assert_eq!(dispatch_reaction(ctx, event("✅", 1, BOT_ID)).await, 0);
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn removals_reach_actions() {
        let (ctx, _) = context(BotConfig::new("token"));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);

        let action = Action::emoji("✅", move |_, invocation| {
            if let ActionTrigger::Reaction { added, user_id, .. } = invocation.trigger {
                seen_clone.lock().push((user_id, added));
            }

            async { Ok(()) }.boxed()
        });

        let msg = SentMessage {
            id: Id::new(1),
            channel_id: CHANNEL_ID,
        };

        ctx.actions().register(&action).unwrap();
        action.apply(&ctx, msg).await.unwrap();

        let user = Id::new(42);
        let mut removed = event("✅", 1, user);
        removed.added = false;

        dispatch_reaction(Arc::clone(&ctx), event("✅", 1, user)).await;
        assert_eq!(dispatch_reaction(Arc::clone(&ctx), removed).await, 1);

        assert_eq!(*seen.lock(), [(user, true), (user, false)]);
    }
}
