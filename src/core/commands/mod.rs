pub use self::{
    args::{map_positional, tokenize, ArgValue, CommandArgs},
    command::{Command, CommandHandler, CommandInvocation},
    flags::{CommandFlags, CommandKinds},
    options::{
        flatten, focused_path, schema_at, walk, AutocompleteHandler, AutocompleteInput,
        OptionChoice, OptionPath, OptionSchema,
    },
    registry::CommandRegistry,
    sync::{
        sync_commands, CategoryReport, CommandCategory, RemoteCommand, SyncError, SyncReport,
    },
};

mod args;
mod command;
mod flags;
mod options;
mod registry;
mod sync;
