#[macro_use]
extern crate tracing;

#[macro_use]
extern crate eyre;

pub mod action;
pub mod core;
pub mod interaction;
pub mod pagination;
pub mod util;

pub use self::{
    action::{Action, ActionInvocation, ActionKind, ActionRegistry, ActionTrigger},
    core::{
        commands::{Command, CommandFlags, CommandInvocation, CommandKinds, OptionSchema},
        BotConfig, Context,
    },
    interaction::{InteractionCore, ReplyError},
    util::MessageBuilder,
};
