use std::sync::Arc;

use eyre::Result;
use parking_lot::RwLock;
use twilight_model::id::{marker::UserMarker, Id};

use crate::{
    action::ActionRegistry,
    core::{
        client::{CommandScope, DiscordApi},
        commands::{sync_commands, Command, CommandRegistry, SyncError, SyncReport},
        BotConfig,
    },
};

/// Owns everything that's shared between event handlers.
pub struct Context {
    config: BotConfig,
    client: Arc<dyn DiscordApi>,
    current_user: Id<UserMarker>,
    commands: RwLock<CommandRegistry>,
    actions: ActionRegistry,
}

impl Context {
    pub fn new(
        config: BotConfig,
        client: Arc<dyn DiscordApi>,
        current_user: Id<UserMarker>,
    ) -> Result<Self> {
        Ok(Self {
            config: config.validate()?,
            client,
            current_user,
            commands: RwLock::new(CommandRegistry::default()),
            actions: ActionRegistry::default(),
        })
    }

    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    pub fn client(&self) -> &dyn DiscordApi {
        self.client.as_ref()
    }

    /// Id of the bot's own user.
    pub fn current_user(&self) -> Id<UserMarker> {
        self.current_user
    }

    pub fn actions(&self) -> &ActionRegistry {
        &self.actions
    }

    pub fn add_command(&self, command: Command) -> Result<()> {
        self.commands.write().insert(Arc::new(command))
    }

    /// Stops at the first command that can't be added.
    pub fn add_commands<I>(&self, commands: I) -> Result<()>
    where
        I: IntoIterator<Item = Command>,
    {
        let mut registry = self.commands.write();

        for command in commands {
            registry.insert(Arc::new(command))?;
        }

        Ok(())
    }

    pub fn remove_command(&self, name: &str) -> Option<Arc<Command>> {
        self.commands.write().remove(name)
    }

    pub fn commands(&self) -> Vec<Arc<Command>> {
        self.commands.read().commands()
    }

    /// Resolve an incoming command name, stripping the development marker if
    /// necessary.
    pub fn command(&self, name: &str) -> Option<Arc<Command>> {
        let name = self.config.strip_dev_marker(name);

        self.commands.read().get(name)
    }

    pub fn command_scope(&self) -> CommandScope {
        match self.config.dev_guild {
            Some(guild_id) if self.config.dev_mode => CommandScope::Guild(guild_id),
            _ => CommandScope::Global,
        }
    }

    /// Register all local commands remotely and remove remote commands that
    /// are no longer known locally.
    #[cold]
    pub async fn sync_commands(&self) -> Result<SyncReport, SyncError> {
        let local: Vec<_> = self
            .commands()
            .iter()
            .flat_map(|command| command.remote_commands(&self.config))
            .collect();

        sync_commands(self.client(), self.command_scope(), &local).await
    }
}
