use bathbot_interactions::{
    pagination::Pagination, Command, CommandFlags, CommandInvocation, MessageBuilder,
    OptionSchema,
};
use eyre::Result;
use futures::FutureExt;

const DEFAULT_COUNT: i64 = 5;

pub fn pages() -> Command {
    let count = OptionSchema::integer("count", "How many pages, defaults to 5");

    Command::new("pages", "Browse some numbered pages", |_, invocation| {
        pages_(invocation).boxed()
    })
    .args(["count"])
    .option(count)
    .flags(CommandFlags::DEFER)
}

async fn pages_(mut invocation: CommandInvocation) -> Result<()> {
    let count = invocation
        .args
        .integer("count")
        .unwrap_or(DEFAULT_COUNT)
        .clamp(1, 25);

    let pages = (1..=count)
        .map(|n| MessageBuilder::new().content(format!("Page {n} of {count}")))
        .collect();

    Pagination::new(pages).start(&mut invocation.core).await
}
