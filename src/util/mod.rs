pub use self::{authored::Authored, builder::MessageBuilder, emoji::ReactionEmoji};

pub mod builder;

mod authored;
mod emoji;
