use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

use eyre::Result;
use futures::future::BoxFuture;
use twilight_model::{
    application::command::CommandType,
    id::{marker::GenericMarker, Id},
};

use super::{
    args::CommandArgs, options::OptionSchema, sync::RemoteCommand, CommandFlags, CommandKinds,
};
use crate::{
    core::{BotConfig, Context},
    interaction::InteractionCore,
};

pub type CommandHandler =
    Arc<dyn Fn(Arc<Context>, CommandInvocation) -> BoxFuture<'static, Result<()>> + Send + Sync>;

/// Everything a command handler gets to work with.
pub struct CommandInvocation {
    pub core: InteractionCore,
    pub args: CommandArgs,
    /// The single kind through which the command was invoked.
    pub kind: CommandKinds,
    /// Target user or message of context menu commands.
    pub target_id: Option<Id<GenericMarker>>,
}

pub struct Command {
    pub name: String,
    pub aliases: Vec<String>,
    pub description: String,
    pub kinds: CommandKinds,
    /// Positional argument names of text invocations.
    pub args: Vec<String>,
    /// Option tree of slash invocations.
    pub options: Vec<OptionSchema>,
    pub flags: CommandFlags,
    handler: CommandHandler,
}

impl Command {
    /// Creates a command that can be invoked through a prefix and as slash
    /// command.
    pub fn new<F>(name: impl Into<String>, description: impl Into<String>, handler: F) -> Self
    where
        F: Fn(Arc<Context>, CommandInvocation) -> BoxFuture<'static, Result<()>>
            + Send
            + Sync
            + 'static,
    {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            description: description.into(),
            kinds: CommandKinds::MESSAGE | CommandKinds::SLASH,
            args: Vec::new(),
            options: Vec::new(),
            flags: CommandFlags::empty(),
            handler: Arc::new(handler),
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());

        self
    }

    pub fn kinds(mut self, kinds: CommandKinds) -> Self {
        self.kinds = kinds;

        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));

        self
    }

    pub fn option(mut self, option: OptionSchema) -> Self {
        self.options.push(option);

        self
    }

    pub fn flags(mut self, flags: CommandFlags) -> Self {
        self.flags = flags;

        self
    }

    /// The name and all aliases.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    pub fn supports(&self, kind: CommandKinds) -> bool {
        self.kinds.contains(kind)
    }

    pub fn run(
        &self,
        ctx: Arc<Context>,
        invocation: CommandInvocation,
    ) -> BoxFuture<'static, Result<()>> {
        (self.handler)(ctx, invocation)
    }

    /// One remote command for each structured kind the command supports.
    pub fn remote_commands(&self, config: &BotConfig) -> Vec<RemoteCommand> {
        let name = config.remote_name(&self.name);
        let mut commands = Vec::with_capacity(3);

        if self.kinds.contains(CommandKinds::SLASH) {
            let options = self.options.iter().map(OptionSchema::to_command_option);

            commands.push(RemoteCommand {
                id: None,
                name: name.clone(),
                description: self.description.clone(),
                kind: CommandType::ChatInput,
                options: options.collect(),
            });
        }

        if self.kinds.contains(CommandKinds::USER) {
            commands.push(RemoteCommand::context_menu(name.clone(), CommandType::User));
        }

        if self.kinds.contains(CommandKinds::MESSAGE_CONTEXT) {
            commands.push(RemoteCommand::context_menu(name, CommandType::Message));
        }

        commands
    }
}

impl Debug for Command {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("kinds", &self.kinds)
            .field("args", &self.args)
            .field("options", &self.options)
            .field("flags", &self.flags)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use futures::FutureExt;
    use twilight_model::id::Id;

    use super::*;

    fn noop() -> Command {
        Command::new("ping", "Pong", |_, _| async { Ok(()) }.boxed())
    }

    #[test]
    fn context_menus_have_no_description() {
        let command = noop()
            .kinds(CommandKinds::SLASH | CommandKinds::USER | CommandKinds::MESSAGE_CONTEXT)
            .option(OptionSchema::string("text", "Some text"));

        let remote = command.remote_commands(&BotConfig::new("token"));

        assert_eq!(remote.len(), 3);
        assert_eq!(remote[0].kind, CommandType::ChatInput);
        assert_eq!(remote[0].options.len(), 1);

        for menu in &remote[1..] {
            assert!(menu.description.is_empty());
            assert!(menu.options.is_empty());
        }
    }

    #[test]
    fn text_only_commands_stay_local() {
        let command = noop().kinds(CommandKinds::MESSAGE);

        assert!(command.remote_commands(&BotConfig::new("token")).is_empty());
    }

    #[test]
    fn dev_mode_prefixes_remote_names() {
        let config = BotConfig::new("token").dev_mode(Some(Id::new(1)));
        let remote = noop().remote_commands(&config);

        assert_eq!(remote[0].name, "dev-ping");
    }
}
