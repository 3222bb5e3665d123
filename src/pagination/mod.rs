use std::{
    sync::{Arc, Weak},
    time::Duration,
};

use eyre::{ContextCompat, Result, WrapErr};
use futures::FutureExt;
use parking_lot::Mutex;
use tokio::{
    sync::watch::{self, Receiver, Sender},
    time::sleep,
};
use twilight_model::{
    channel::message::component::{ActionRow, ButtonStyle, Component},
    id::{marker::UserMarker, Id},
};

use crate::{
    action::{Action, ActionInvocation, ActionTrigger},
    core::{client::SentMessage, Context},
    interaction::InteractionCore,
    util::{Authored, MessageBuilder},
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum PageMove {
    First,
    Previous,
    Next,
    Last,
}

impl PageMove {
    const ALL: [Self; 4] = [Self::First, Self::Previous, Self::Next, Self::Last];

    fn label(self) -> &'static str {
        match self {
            Self::First => "⏮",
            Self::Previous => "◀",
            Self::Next => "▶",
            Self::Last => "⏭",
        }
    }

    fn apply(self, index: usize, last_index: usize) -> usize {
        match self {
            Self::First => 0,
            Self::Previous => index.saturating_sub(1),
            Self::Next => (index + 1).min(last_index),
            Self::Last => last_index,
        }
    }

    fn is_disabled(self, index: usize, last_index: usize) -> bool {
        match self {
            Self::First | Self::Previous => index == 0,
            Self::Next | Self::Last => index == last_index,
        }
    }
}

/// Message with multiple pages that can be browsed through buttons.
pub struct Pagination {
    pages: Vec<MessageBuilder>,
}

impl Pagination {
    pub fn new(pages: Vec<MessageBuilder>) -> Self {
        Self { pages }
    }

    /// Respond with the first page and start listening for button presses.
    ///
    /// Only the author of the invocation can turn pages. The buttons are
    /// removed once no page was turned for the configured timeout.
    pub async fn start(mut self, core: &mut InteractionCore) -> Result<()> {
        if self.pages.len() <= 1 {
            let page = self
                .pages
                .pop()
                .wrap_err("pagination requires at least one page")?;
            core.respond(page, false).await?;

            return Ok(());
        }

        let ctx = Arc::clone(core.ctx());
        let (tx, rx) = watch::channel(());
        let state = PaginationState::new(self.pages, core.user_id(), tx);

        for button in state.buttons.iter() {
            ctx.actions().register(button)?;
        }

        let res = core.respond(state.page(0), false).await;

        let msg = match res {
            Ok(record) => record.message(),
            Err(err) => {
                state.unregister(&ctx);

                return Err(err).wrap_err("failed to send first page");
            }
        };

        let Some(msg) = msg else {
            state.unregister(&ctx);
            bail!("first page was not sent");
        };

        spawn_timeout(ctx, state, rx, msg);

        Ok(())
    }
}

struct PaginationState {
    pages: Vec<MessageBuilder>,
    index: Mutex<usize>,
    author: Option<Id<UserMarker>>,
    buttons: Vec<Arc<Action>>,
    tx: Sender<()>,
}

impl PaginationState {
    fn new(
        pages: Vec<MessageBuilder>,
        author: Option<Id<UserMarker>>,
        tx: Sender<()>,
    ) -> Arc<Self> {
        Arc::new_cyclic(|weak: &Weak<Self>| {
            let buttons = PageMove::ALL
                .into_iter()
                .map(|page_move| {
                    let state = Weak::clone(weak);

                    let handler = move |_: Arc<Context>, invocation: ActionInvocation| {
                        turn_page(Weak::clone(&state), page_move, invocation).boxed()
                    };

                    Action::button(page_move.label(), ButtonStyle::Secondary, handler)
                })
                .collect();

            Self {
                pages,
                index: Mutex::new(0),
                author,
                buttons,
                tx,
            }
        })
    }

    fn last_index(&self) -> usize {
        self.pages.len().saturating_sub(1)
    }

    fn is_author(&self, user: Option<Id<UserMarker>>) -> bool {
        self.author.is_none() || self.author == user
    }

    fn reset_timeout(&self) {
        let _ = self.tx.send(());
    }

    fn components(&self, index: usize) -> Vec<Component> {
        let last_index = self.last_index();

        let buttons = self
            .buttons
            .iter()
            .zip(PageMove::ALL)
            .filter_map(|(button, page_move)| {
                button.button_component(page_move.is_disabled(index, last_index))
            })
            .collect();

        vec![Component::ActionRow(ActionRow {
            components: buttons,
        })]
    }

    fn page(&self, index: usize) -> MessageBuilder {
        self.pages[index].clone().components(self.components(index))
    }

    fn unregister(&self, ctx: &Context) {
        for button in self.buttons.iter() {
            ctx.actions().unregister(button.id());
        }
    }
}

async fn turn_page(
    state: Weak<PaginationState>,
    page_move: PageMove,
    invocation: ActionInvocation,
) -> Result<()> {
    let ActionTrigger::Component { mut core, .. } = invocation.trigger else {
        return Ok(());
    };

    let Some(state) = state.upgrade() else {
        return Ok(());
    };

    if !state.is_author(core.user_id()) {
        // Acknowledge without changing the message
        core.defer_reply(false).await?;

        return Ok(());
    }

    let builder = {
        let mut index = state.index.lock();
        *index = page_move.apply(*index, state.last_index());

        state.page(*index)
    };

    state.reset_timeout();
    core.update_source(builder)
        .await
        .wrap_err("failed to update page")?;

    Ok(())
}

fn spawn_timeout(
    ctx: Arc<Context>,
    state: Arc<PaginationState>,
    mut rx: Receiver<()>,
    msg: SentMessage,
) {
    let timeout: Duration = ctx.config().pagination_timeout;

    tokio::spawn(async move {
        loop {
            tokio::select! {
                res = rx.changed() => if res.is_ok() {
                    continue
                } else {
                    return
                },
                _ = sleep(timeout) => break,
            }
        }

        state.unregister(&ctx);

        let index = *state.index.lock();
        let builder = state.pages[index].clone().components(Vec::new());

        if let Err(err) = ctx.client().update_message(msg, &builder).await {
            warn!("{:?}", err.wrap_err("failed to remove pagination components"));
        }
    });
}
