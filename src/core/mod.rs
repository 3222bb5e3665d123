pub use self::{
    config::{BotConfig, DEV_MARKER},
    context::Context,
    events::{event_loop, handle_event, EventKind},
};

mod config;
mod context;

pub mod client;
pub mod commands;
pub mod events;
pub mod logging;
