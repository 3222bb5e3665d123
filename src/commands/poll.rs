use std::sync::Arc;

use bathbot_interactions::{
    Action, ActionInvocation, ActionTrigger, Command, CommandFlags, CommandInvocation, Context,
    MessageBuilder,
};
use eyre::Result;
use futures::FutureExt;

const YES: &str = "👍";
const NO: &str = "👎";

pub fn poll() -> Command {
    Command::new("poll", "Start a yes/no poll", |ctx, invocation| {
        poll_(ctx, invocation).boxed()
    })
    .args(["question"])
    .flags(CommandFlags::ONLY_GUILDS)
}

async fn poll_(ctx: Arc<Context>, mut invocation: CommandInvocation) -> Result<()> {
    let question = invocation
        .args
        .str("question")
        .unwrap_or("Yes or no?")
        .to_owned();

    let builder = MessageBuilder::new().content(format!("**Poll:** {question}"));
    let record = invocation.core.reply(builder, false).await?;

    let Some(msg) = record.message() else {
        return Ok(());
    };

    for emoji in [YES, NO] {
        let action = Action::emoji(emoji, |_, invocation| log_vote(invocation).boxed());
        ctx.actions().register(&action)?;
        action.apply(&ctx, msg).await?;
    }

    Ok(())
}

async fn log_vote(invocation: ActionInvocation) -> Result<()> {
    if let ActionTrigger::Reaction {
        user_id, added, ..
    } = invocation.trigger
    {
        let vote = if added { "voted" } else { "retracted their vote" };
        info!(action = %invocation.action.id(), %user_id, "User {vote}");
    }

    Ok(())
}
