use bathbot_interactions::{Command, CommandFlags, CommandInvocation, OptionSchema};
use eyre::Result;
use futures::FutureExt;

pub fn echo() -> Command {
    Command::new("echo", "Repeat a message", |_, invocation| {
        echo_(invocation).boxed()
    })
    .alias("say")
    .args(["text"])
    .option(OptionSchema::string("text", "What to repeat").required())
    .flags(CommandFlags::EPHEMERAL)
}

async fn echo_(mut invocation: CommandInvocation) -> Result<()> {
    let Some(text) = invocation.args.str("text").map(str::to_owned) else {
        invocation.core.reply("Nothing to repeat", false).await?;

        return Ok(());
    };

    let ephemeral = invocation.core.is_interaction();
    invocation.core.reply(text, ephemeral).await?;

    Ok(())
}
