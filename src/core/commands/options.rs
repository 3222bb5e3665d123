use std::{fmt, ops::ControlFlow, sync::Arc};

use eyre::Result;
use futures::future::BoxFuture;
use smallvec::SmallVec;
use twilight_model::{
    application::{
        command::{
            CommandOption, CommandOptionChoice, CommandOptionChoiceValue, CommandOptionType,
        },
        interaction::application_command::{CommandDataOption, CommandOptionValue},
    },
};

use super::args::{ArgValue, CommandArgs};
use crate::core::Context;

/// Names from the top level of an option tree down to one of its nodes.
pub type OptionPath<'a> = SmallVec<[&'a str; 4]>;

pub type AutocompleteHandler = Arc<
    dyn Fn(Arc<Context>, AutocompleteInput) -> BoxFuture<'static, Result<Vec<OptionChoice>>>
        + Send
        + Sync,
>;

/// What the user typed into the focused option.
#[derive(Clone, Debug)]
pub struct AutocompleteInput {
    /// Path of the focused option.
    pub path: Vec<String>,
    /// Raw input, not necessarily valid for the option type.
    pub value: String,
    /// All other options that were provided so far.
    pub args: CommandArgs,
}

#[derive(Clone, Debug, PartialEq)]
pub struct OptionChoice {
    pub name: String,
    pub value: CommandOptionChoiceValue,
}

impl OptionChoice {
    pub fn string(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: CommandOptionChoiceValue::String(value.into()),
        }
    }

    pub fn integer(name: impl Into<String>, value: i64) -> Self {
        Self {
            name: name.into(),
            value: CommandOptionChoiceValue::Integer(value),
        }
    }

    pub fn number(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value: CommandOptionChoiceValue::Number(value),
        }
    }
}

impl From<OptionChoice> for CommandOptionChoice {
    #[inline]
    fn from(choice: OptionChoice) -> Self {
        Self {
            name: choice.name,
            name_localizations: None,
            value: choice.value,
        }
    }
}

/// A node of a command's structured option tree.
#[derive(Clone)]
pub struct OptionSchema {
    pub name: String,
    pub description: String,
    pub kind: CommandOptionType,
    pub required: bool,
    pub choices: Vec<OptionChoice>,
    pub options: Vec<OptionSchema>,
    pub autocomplete: Option<AutocompleteHandler>,
}

impl OptionSchema {
    pub fn new(
        kind: CommandOptionType,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind,
            required: false,
            choices: Vec::new(),
            options: Vec::new(),
            autocomplete: None,
        }
    }

    pub fn string(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(CommandOptionType::String, name, description)
    }

    pub fn integer(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(CommandOptionType::Integer, name, description)
    }

    pub fn number(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(CommandOptionType::Number, name, description)
    }

    pub fn boolean(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(CommandOptionType::Boolean, name, description)
    }

    pub fn user(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(CommandOptionType::User, name, description)
    }

    pub fn channel(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(CommandOptionType::Channel, name, description)
    }

    pub fn role(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(CommandOptionType::Role, name, description)
    }

    pub fn sub_command(
        name: impl Into<String>,
        description: impl Into<String>,
        options: Vec<OptionSchema>,
    ) -> Self {
        Self {
            options,
            ..Self::new(CommandOptionType::SubCommand, name, description)
        }
    }

    pub fn sub_command_group(
        name: impl Into<String>,
        description: impl Into<String>,
        sub_commands: Vec<OptionSchema>,
    ) -> Self {
        Self {
            options: sub_commands,
            ..Self::new(CommandOptionType::SubCommandGroup, name, description)
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;

        self
    }

    pub fn choice(mut self, choice: OptionChoice) -> Self {
        self.choices.push(choice);

        self
    }

    pub fn autocomplete<F>(mut self, handler: F) -> Self
    where
        F: Fn(Arc<Context>, AutocompleteInput) -> BoxFuture<'static, Result<Vec<OptionChoice>>>
            + Send
            + Sync
            + 'static,
    {
        self.autocomplete = Some(Arc::new(handler));

        self
    }

    fn is_group(&self) -> bool {
        matches!(
            self.kind,
            CommandOptionType::SubCommand | CommandOptionType::SubCommandGroup
        )
    }

    pub fn to_command_option(&self) -> CommandOption {
        let is_group = self.is_group();

        CommandOption {
            autocomplete: (!is_group).then_some(self.autocomplete.is_some()),
            channel_types: None,
            choices: (!self.choices.is_empty())
                .then(|| self.choices.iter().cloned().map(From::from).collect()),
            description: self.description.clone(),
            description_localizations: None,
            kind: self.kind,
            max_length: None,
            max_value: None,
            min_length: None,
            min_value: None,
            name: self.name.clone(),
            name_localizations: None,
            options: is_group
                .then(|| self.options.iter().map(Self::to_command_option).collect()),
            required: (!is_group).then_some(self.required),
        }
    }
}

impl fmt::Debug for OptionSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionSchema")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("required", &self.required)
            .field("options", &self.options)
            .field("autocomplete", &self.autocomplete.is_some())
            .finish()
    }
}

/// Visit every option of the tree depth-first, descending into sub-commands
/// and sub-command groups.
pub fn walk<'a, F>(
    options: &'a [CommandDataOption],
    path: &mut OptionPath<'a>,
    visit: &mut F,
) -> ControlFlow<()>
where
    F: FnMut(&OptionPath<'a>, &'a CommandDataOption) -> ControlFlow<()>,
{
    for option in options {
        path.push(&option.name);
        visit(path, option)?;

        if let CommandOptionValue::SubCommand(nested) | CommandOptionValue::SubCommandGroup(nested) =
            &option.value
        {
            walk(nested, path, visit)?;
        }

        path.pop();
    }

    ControlFlow::Continue(())
}

/// Collect all option values into a flat mapping.
///
/// Sub-commands are recorded as path instead of values. If a name occurs
/// multiple times, the first occurrence wins.
pub fn flatten(options: &[CommandDataOption]) -> CommandArgs {
    let mut args = CommandArgs::default();

    let _ = walk(options, &mut OptionPath::new(), &mut |_, option| {
        match &option.value {
            CommandOptionValue::SubCommand(_) | CommandOptionValue::SubCommandGroup(_) => {
                args.push_sub_command(&option.name)
            }
            value => {
                args.insert(&option.name, ArgValue::Option(value.clone()));
            }
        }

        ControlFlow::Continue(())
    });

    args
}

/// Path and current input of the focused option.
pub fn focused_path(options: &[CommandDataOption]) -> Option<(OptionPath<'_>, &str)> {
    let mut focused = None;

    let _ = walk(options, &mut OptionPath::new(), &mut |path, option| {
        match &option.value {
            CommandOptionValue::Focused(value, _) => {
                focused = Some((path.clone(), value.as_str()));

                ControlFlow::Break(())
            }
            _ => ControlFlow::Continue(()),
        }
    });

    focused
}

/// Follow a path of names through the schema tree.
pub fn schema_at<'s>(schema: &'s [OptionSchema], path: &[&str]) -> Option<&'s OptionSchema> {
    let mut level = schema;
    let mut node = None;

    for name in path {
        let next = level
            .iter()
            .find(|option| option.name.eq_ignore_ascii_case(name))?;

        level = &next.options;
        node = Some(next);
    }

    node
}

#[cfg(test)]
mod tests {
    use futures::FutureExt;

    use super::*;

    fn option(name: &str, value: CommandOptionValue) -> CommandDataOption {
        CommandDataOption {
            name: name.to_owned(),
            value,
        }
    }

    fn nested() -> Vec<CommandDataOption> {
        vec![option(
            "config",
            CommandOptionValue::SubCommandGroup(vec![option(
                "set",
                CommandOptionValue::SubCommand(vec![
                    option("key", CommandOptionValue::String("prefix".to_owned())),
                    option(
                        "value",
                        CommandOptionValue::Focused("?".to_owned(), CommandOptionType::String),
                    ),
                ]),
            )]),
        )]
    }

    #[test]
    fn flatten_nested_options() {
        let args = flatten(&nested());

        assert_eq!(args.sub_command(), ["config", "set"]);
        assert_eq!(args.str("key"), Some("prefix"));
        assert_eq!(args.str("value"), Some("?"));
    }

    #[test]
    fn first_occurrence_wins() {
        let options = vec![
            option("n", CommandOptionValue::Integer(1)),
            option(
                "sub",
                CommandOptionValue::SubCommand(vec![option("n", CommandOptionValue::Integer(2))]),
            ),
        ];

        assert_eq!(flatten(&options).integer("n"), Some(1));
    }

    #[test]
    fn focused_option_resolves_in_schema() {
        let schema = vec![OptionSchema::sub_command_group(
            "config",
            "Configure things",
            vec![OptionSchema::sub_command(
                "set",
                "Set a value",
                vec![
                    OptionSchema::string("key", "Key"),
                    OptionSchema::string("value", "Value")
                        .autocomplete(|_, _| async { Ok::<_, eyre::Report>(Vec::new()) }.boxed()),
                ],
            )],
        )];

        let options = nested();
        let (path, value) = focused_path(&options).unwrap();

        assert_eq!(path.as_slice(), ["config", "set", "value"]);
        assert_eq!(value, "?");

        let node = schema_at(&schema, &path).unwrap();
        assert_eq!(node.name, "value");
        assert!(node.autocomplete.is_some());
    }

    #[test]
    fn unknown_path_has_no_schema() {
        let schema = vec![OptionSchema::string("key", "Key")];

        assert!(schema_at(&schema, &["other"]).is_none());
        assert!(schema_at(&schema, &[]).is_none());
    }

    #[test]
    fn groups_carry_nested_options() {
        let schema = OptionSchema::sub_command(
            "set",
            "Set a value",
            vec![OptionSchema::integer("amount", "Amount").required()],
        );

        let option = schema.to_command_option();
        assert_eq!(option.required, None);

        let nested = option.options.unwrap();
        assert_eq!(nested[0].required, Some(true));
        assert_eq!(nested[0].autocomplete, Some(false));
    }
}
