use std::fmt::{Display, Formatter, Result as FmtResult};

use eyre::Report;
use twilight_model::{
    application::command::{Command as TwilightCommand, CommandOption, CommandType},
    id::{marker::CommandMarker, Id},
};

use crate::core::client::{CommandScope, DiscordApi};

/// A command as it is known to the platform.
#[derive(Clone, Debug, PartialEq)]
pub struct RemoteCommand {
    pub id: Option<Id<CommandMarker>>,
    pub name: String,
    pub description: String,
    pub kind: CommandType,
    pub options: Vec<CommandOption>,
}

impl RemoteCommand {
    pub fn context_menu(name: String, kind: CommandType) -> Self {
        Self {
            id: None,
            name,
            description: String::new(),
            kind,
            options: Vec::new(),
        }
    }

    /// Whether both commands define the same thing, ignoring their ids.
    pub fn same_definition(&self, other: &Self) -> bool {
        self.name == other.name
            && self.kind == other.kind
            && self.description == other.description
            && options_eq(&self.options, &other.options)
    }
}

impl From<TwilightCommand> for RemoteCommand {
    fn from(command: TwilightCommand) -> Self {
        Self {
            id: command.id,
            name: command.name,
            description: command.description,
            kind: command.kind,
            options: command.options,
        }
    }
}

// The platform omits default values so `None` and the default are the same.
fn options_eq(a: &[CommandOption], b: &[CommandOption]) -> bool {
    fn option_eq(a: &CommandOption, b: &CommandOption) -> bool {
        a.name == b.name
            && a.kind == b.kind
            && a.description == b.description
            && a.required.unwrap_or(false) == b.required.unwrap_or(false)
            && a.autocomplete.unwrap_or(false) == b.autocomplete.unwrap_or(false)
            && a.choices.as_deref().unwrap_or_default() == b.choices.as_deref().unwrap_or_default()
            && a.channel_types.as_deref().unwrap_or_default()
                == b.channel_types.as_deref().unwrap_or_default()
            && a.min_value == b.min_value
            && a.max_value == b.max_value
            && a.min_length == b.min_length
            && a.max_length == b.max_length
            && options_eq(
                a.options.as_deref().unwrap_or_default(),
                b.options.as_deref().unwrap_or_default(),
            )
    }

    a.len() == b.len() && a.iter().zip(b).all(|(a, b)| option_eq(a, b))
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CommandCategory {
    ChatInput,
    User,
    Message,
}

impl CommandCategory {
    /// All categories in the order in which they're synced.
    pub const ALL: [Self; 3] = [Self::ChatInput, Self::User, Self::Message];

    pub fn kind(self) -> CommandType {
        match self {
            Self::ChatInput => CommandType::ChatInput,
            Self::User => CommandType::User,
            Self::Message => CommandType::Message,
        }
    }
}

impl Display for CommandCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::ChatInput => f.write_str("chat input"),
            Self::User => f.write_str("user context menu"),
            Self::Message => f.write_str("message context menu"),
        }
    }
}

/// Names of the commands that were changed in one category.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CategoryReport {
    pub created: Vec<String>,
    pub deleted: Vec<String>,
    pub updated: Vec<String>,
}

impl CategoryReport {
    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.deleted.is_empty() && self.updated.is_empty()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub chat_input: CategoryReport,
    pub user: CategoryReport,
    pub message: CategoryReport,
}

impl SyncReport {
    pub fn get(&self, category: CommandCategory) -> &CategoryReport {
        match category {
            CommandCategory::ChatInput => &self.chat_input,
            CommandCategory::User => &self.user,
            CommandCategory::Message => &self.message,
        }
    }

    fn get_mut(&mut self, category: CommandCategory) -> &mut CategoryReport {
        match category {
            CommandCategory::ChatInput => &mut self.chat_input,
            CommandCategory::User => &mut self.user,
            CommandCategory::Message => &mut self.message,
        }
    }

    pub fn is_empty(&self) -> bool {
        CommandCategory::ALL
            .into_iter()
            .all(|category| self.get(category).is_empty())
    }
}

/// Syncing stops at the first failing category. Changes that were applied
/// before that remain in place and are listed in the contained report.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("failed to fetch {scope} commands")]
    Fetch {
        scope: CommandScope,
        #[source]
        source: Report,
    },
    #[error("failed to sync {category} commands")]
    Category {
        category: CommandCategory,
        report: SyncReport,
        #[source]
        source: Report,
    },
}

impl SyncError {
    /// Everything that was applied before the failure.
    pub fn report(&self) -> Option<&SyncReport> {
        match self {
            Self::Fetch { .. } => None,
            Self::Category { report, .. } => Some(report),
        }
    }
}

/// Make the remote commands of the scope match the local ones.
///
/// Each category is diffed by name. Within a category, missing commands are
/// created first, then superfluous ones deleted, then changed ones updated.
pub async fn sync_commands(
    client: &dyn DiscordApi,
    scope: CommandScope,
    local: &[RemoteCommand],
) -> Result<SyncReport, SyncError> {
    let remote = client
        .commands(scope)
        .await
        .map_err(|source| SyncError::Fetch { scope, source })?;

    let mut report = SyncReport::default();

    for category in CommandCategory::ALL {
        let kind = category.kind();
        let local: Vec<_> = local.iter().filter(|cmd| cmd.kind == kind).collect();
        let remote: Vec<_> = remote.iter().filter(|cmd| cmd.kind == kind).collect();

        let res = sync_category(client, scope, &local, &remote, report.get_mut(category)).await;

        if let Err(source) = res {
            return Err(SyncError::Category {
                category,
                report,
                source,
            });
        }

        let applied = report.get(category);

        if !applied.is_empty() {
            info!(
                created = applied.created.len(),
                deleted = applied.deleted.len(),
                updated = applied.updated.len(),
                "Synced {category} commands in {scope} scope"
            );
        }
    }

    Ok(report)
}

async fn sync_category(
    client: &dyn DiscordApi,
    scope: CommandScope,
    local: &[&RemoteCommand],
    remote: &[&RemoteCommand],
    report: &mut CategoryReport,
) -> Result<(), Report> {
    fn contains(cmds: &[&RemoteCommand], name: &str) -> bool {
        cmds.iter().any(|cmd| cmd.name == name)
    }

    for cmd in local.iter().filter(|cmd| !contains(remote, &cmd.name)) {
        client.create_command(scope, cmd).await?;
        debug!(name = %cmd.name, "Created command");
        report.created.push(cmd.name.clone());
    }

    for cmd in remote.iter().filter(|cmd| !contains(local, &cmd.name)) {
        client.delete_command(scope, cmd).await?;
        debug!(name = %cmd.name, "Deleted command");
        report.deleted.push(cmd.name.clone());
    }

    for cmd in local {
        let Some(existing) = remote.iter().find(|existing| existing.name == cmd.name) else {
            continue;
        };

        if existing.same_definition(cmd) {
            continue;
        }

        let update = RemoteCommand {
            id: existing.id,
            ..(*cmd).clone()
        };

        client.update_command(scope, &update).await?;
        debug!(name = %cmd.name, "Updated command");
        report.updated.push(cmd.name.clone());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use twilight_model::application::command::CommandOptionType;

    use super::*;
    use crate::core::client::testing::{Call, RecordingClient};

    const SCOPE: CommandScope = CommandScope::Global;

    fn chat_input(name: &str, description: &str) -> RemoteCommand {
        RemoteCommand {
            id: None,
            name: name.to_owned(),
            description: description.to_owned(),
            kind: CommandType::ChatInput,
            options: Vec::new(),
        }
    }

    fn option(name: &str, required: Option<bool>) -> CommandOption {
        CommandOption {
            autocomplete: None,
            channel_types: None,
            choices: None,
            description: "desc".to_owned(),
            description_localizations: None,
            kind: CommandOptionType::String,
            max_length: None,
            max_value: None,
            min_length: None,
            min_value: None,
            name: name.to_owned(),
            name_localizations: None,
            options: None,
            required,
        }
    }

    #[tokio::test]
    async fn second_sync_is_a_noop() {
        let client = RecordingClient::new();

        let local = vec![
            chat_input("ping", "Pong"),
            RemoteCommand::context_menu("avatar".to_owned(), CommandType::User),
            RemoteCommand::context_menu("quote".to_owned(), CommandType::Message),
        ];

        let first = sync_commands(&client, SCOPE, &local).await.unwrap();
        assert_eq!(first.chat_input.created, ["ping"]);
        assert_eq!(first.user.created, ["avatar"]);
        assert_eq!(first.message.created, ["quote"]);

        client.clear();

        let second = sync_commands(&client, SCOPE, &local).await.unwrap();
        assert!(second.is_empty());
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn diff_applies_creates_then_deletes_then_updates() {
        let client = RecordingClient::new();

        let initial = vec![chat_input("old", "Old"), chat_input("keep", "Keep")];
        sync_commands(&client, SCOPE, &initial).await.unwrap();
        client.clear();

        let local = vec![chat_input("keep", "Changed"), chat_input("new", "New")];
        let report = sync_commands(&client, SCOPE, &local).await.unwrap();

        assert_eq!(report.chat_input.created, ["new"]);
        assert_eq!(report.chat_input.deleted, ["old"]);
        assert_eq!(report.chat_input.updated, ["keep"]);

        let expected = [
            Call::CreateCommand(SCOPE, "new".to_owned()),
            Call::DeleteCommand(SCOPE, "old".to_owned()),
            Call::UpdateCommand(SCOPE, "keep".to_owned()),
        ];

        assert_eq!(client.calls(), expected);

        let remote = client.remote_commands(SCOPE);
        let keep = remote.iter().find(|cmd| cmd.name == "keep").unwrap();
        assert_eq!(keep.description, "Changed");
    }

    #[tokio::test]
    async fn categories_are_diffed_separately() {
        let client = RecordingClient::new();

        let local = vec![chat_input("same", "Same")];
        sync_commands(&client, SCOPE, &local).await.unwrap();
        client.clear();

        let local = vec![RemoteCommand::context_menu("same".to_owned(), CommandType::User)];
        let report = sync_commands(&client, SCOPE, &local).await.unwrap();

        assert_eq!(report.chat_input.deleted, ["same"]);
        assert_eq!(report.user.created, ["same"]);
    }

    #[tokio::test]
    async fn failing_category_keeps_earlier_changes() {
        let client = RecordingClient::new();
        client.fail_commands_of(CommandType::User);

        let local = vec![
            chat_input("ping", "Pong"),
            RemoteCommand::context_menu("inspect".to_owned(), CommandType::User),
        ];

        let err = sync_commands(&client, SCOPE, &local).await.unwrap_err();

        assert!(matches!(
            err,
            SyncError::Category {
                category: CommandCategory::User,
                ..
            }
        ));

        let report = err.report().unwrap();
        assert_eq!(report.chat_input.created, ["ping"]);
        assert!(report.user.is_empty());

        let remote = client.remote_commands(SCOPE);
        assert_eq!(remote.len(), 1);
        assert_eq!(remote[0].name, "ping");
        assert_eq!(client.calls(), [Call::CreateCommand(SCOPE, "ping".to_owned())]);
    }

    #[test]
    fn omitted_defaults_are_equal() {
        let mut a = chat_input("cmd", "Desc");
        a.options.push(option("text", Some(false)));

        let mut b = chat_input("cmd", "Desc");
        b.options.push(option("text", None));
        b.id = Some(Id::new(5));

        assert!(a.same_definition(&b));

        b.options[0].required = Some(true);
        assert!(!a.same_definition(&b));
    }
}
