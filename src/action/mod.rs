use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

use eyre::{Result, WrapErr};
use futures::future::BoxFuture;
use parking_lot::Mutex;
use twilight_model::{
    channel::message::component::{Button, ButtonStyle, Component},
    id::{
        marker::{GuildMarker, MessageMarker, UserMarker},
        Id,
    },
};
use uuid::Uuid;

pub use self::registry::ActionRegistry;
use crate::{
    core::{client::SentMessage, Context},
    interaction::InteractionCore,
    util::ReactionEmoji,
};

mod registry;

pub type ActionHandler =
    Arc<dyn Fn(Arc<Context>, ActionInvocation) -> BoxFuture<'static, Result<()>> + Send + Sync>;

#[derive(Clone, Debug)]
pub enum ActionKind {
    Button {
        label: String,
        style: ButtonStyle,
        emoji: Option<ReactionEmoji>,
    },
    Emoji {
        emoji: ReactionEmoji,
    },
    SelectMenu {
        placeholder: Option<String>,
    },
}

pub struct ActionInvocation {
    pub action: Arc<Action>,
    pub trigger: ActionTrigger,
}

pub enum ActionTrigger {
    /// A button was pressed or select menu values were chosen.
    Component {
        core: InteractionCore,
        /// Chosen values of a select menu, empty for buttons.
        values: Vec<String>,
    },
    Reaction {
        message: SentMessage,
        user_id: Id<UserMarker>,
        guild_id: Option<Id<GuildMarker>>,
        /// `false` if the reaction was removed.
        added: bool,
    },
}

#[derive(Default)]
struct ActionState {
    registered: bool,
    applied: Vec<SentMessage>,
    deleted: bool,
}

/// Handler of a component or reaction, identified by a random id.
pub struct Action {
    id: Uuid,
    kind: ActionKind,
    handler: ActionHandler,
    state: Mutex<ActionState>,
}

impl Action {
    pub fn new<F>(kind: ActionKind, handler: F) -> Arc<Self>
    where
        F: Fn(Arc<Context>, ActionInvocation) -> BoxFuture<'static, Result<()>>
            + Send
            + Sync
            + 'static,
    {
        Arc::new(Self {
            id: Uuid::new_v4(),
            kind,
            handler: Arc::new(handler),
            state: Mutex::new(ActionState::default()),
        })
    }

    pub fn button<F>(label: impl Into<String>, style: ButtonStyle, handler: F) -> Arc<Self>
    where
        F: Fn(Arc<Context>, ActionInvocation) -> BoxFuture<'static, Result<()>>
            + Send
            + Sync
            + 'static,
    {
        let kind = ActionKind::Button {
            label: label.into(),
            style,
            emoji: None,
        };

        Self::new(kind, handler)
    }

    pub fn emoji<F>(emoji: impl Into<ReactionEmoji>, handler: F) -> Arc<Self>
    where
        F: Fn(Arc<Context>, ActionInvocation) -> BoxFuture<'static, Result<()>>
            + Send
            + Sync
            + 'static,
    {
        let kind = ActionKind::Emoji {
            emoji: emoji.into(),
        };

        Self::new(kind, handler)
    }

    pub fn select_menu<F>(placeholder: Option<String>, handler: F) -> Arc<Self>
    where
        F: Fn(Arc<Context>, ActionInvocation) -> BoxFuture<'static, Result<()>>
            + Send
            + Sync
            + 'static,
    {
        Self::new(ActionKind::SelectMenu { placeholder }, handler)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The id as it's used for component custom ids.
    pub fn custom_id(&self) -> String {
        self.id.to_string()
    }

    pub fn kind(&self) -> &ActionKind {
        &self.kind
    }

    pub fn is_registered(&self) -> bool {
        self.state.lock().registered
    }

    pub fn is_deleted(&self) -> bool {
        self.state.lock().deleted
    }

    pub(crate) fn set_registered(&self, registered: bool) {
        self.state.lock().registered = registered;
    }

    /// Whether the action is an emoji action with the given emoji.
    pub fn has_emoji(&self, emoji: &ReactionEmoji) -> bool {
        matches!(&self.kind, ActionKind::Emoji { emoji: own } if own == emoji)
    }

    pub fn is_applied_to(&self, message_id: Id<MessageMarker>) -> bool {
        self.state
            .lock()
            .applied
            .iter()
            .any(|msg| msg.id == message_id)
    }

    pub fn applied_messages(&self) -> Vec<SentMessage> {
        self.state.lock().applied.clone()
    }

    /// Button component of a button action.
    pub fn button_component(&self, disabled: bool) -> Option<Component> {
        let ActionKind::Button {
            label,
            style,
            emoji,
        } = &self.kind
        else {
            return None;
        };

        let button = Button {
            custom_id: Some(self.custom_id()),
            disabled,
            emoji: emoji.as_ref().map(ReactionEmoji::reaction_type),
            label: Some(label.clone()),
            style: *style,
            url: None,
        };

        Some(Component::Button(button))
    }

    fn reaction_emoji(&self) -> Result<&ReactionEmoji> {
        match &self.kind {
            ActionKind::Emoji { emoji } => Ok(emoji),
            _ => bail!("action {} is not an emoji action", self.id),
        }
    }

    /// React to the message with the action's emoji and start listening for
    /// reactions on it.
    pub async fn apply(&self, ctx: &Context, msg: SentMessage) -> Result<()> {
        let emoji = self.reaction_emoji()?;

        if self.is_deleted() {
            bail!("action {} has been deleted", self.id);
        }

        ctx.client().create_reaction(msg, emoji).await?;

        let mut state = self.state.lock();

        if !state.applied.contains(&msg) {
            state.applied.push(msg);
        }

        Ok(())
    }

    /// Remove the bot's reaction from the message and stop listening for
    /// reactions on it.
    pub async fn remove(&self, ctx: &Context, msg: SentMessage) -> Result<()> {
        let emoji = self.reaction_emoji()?;

        ctx.client().delete_current_user_reaction(msg, emoji).await?;
        self.state.lock().applied.retain(|applied| *applied != msg);

        Ok(())
    }

    /// Stop listening for reactions on the message without touching the
    /// message itself.
    ///
    /// Returns the emoji if the action was applied to the message.
    pub(crate) fn detach(&self, message_id: Id<MessageMarker>) -> Option<&ReactionEmoji> {
        let ActionKind::Emoji { emoji } = &self.kind else {
            return None;
        };

        let mut state = self.state.lock();
        let len = state.applied.len();
        state.applied.retain(|msg| msg.id != message_id);

        (state.applied.len() < len).then_some(emoji)
    }

    /// Remove the action from every message and unregister it for good.
    ///
    /// Removing reactions is best-effort, failures are only logged.
    pub async fn delete(&self, ctx: &Context) -> Result<()> {
        let emoji = self.reaction_emoji()?;

        let applied = {
            let mut state = self.state.lock();
            state.deleted = true;

            std::mem::take(&mut state.applied)
        };

        ctx.actions().unregister(self.id);

        for msg in applied {
            let res = ctx
                .client()
                .delete_current_user_reaction(msg, emoji)
                .await
                .wrap_err("failed to remove reaction of deleted action");

            if let Err(err) = res {
                warn!(?err, action = %self.id, "Failed to clean up emoji action");
            }
        }

        Ok(())
    }

    pub fn run(
        self: &Arc<Self>,
        ctx: Arc<Context>,
        trigger: ActionTrigger,
    ) -> BoxFuture<'static, Result<()>> {
        let invocation = ActionInvocation {
            action: Arc::clone(self),
            trigger,
        };

        (self.handler)(ctx, invocation)
    }
}

impl Debug for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Action")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .finish()
    }
}
