use nom::{
    branch::alt,
    bytes::complete as by,
    character::complete as ch,
    combinator::iterator,
    error::Error as NomError,
    sequence::{delimited, terminated},
    IResult,
};
use twilight_model::{
    application::interaction::application_command::CommandOptionValue,
    id::{
        marker::{ChannelMarker, RoleMarker, UserMarker},
        Id,
    },
};

/// Split text into arguments.
///
/// Whitespace separates arguments unless it's inside double quotes in which
/// case the quoted text is a single argument without the quotes.
pub fn tokenize(content: &str) -> Vec<&str> {
    let mut iter = iterator(content.trim_start(), next_token);
    let tokens: Vec<_> = (&mut iter).collect();

    if let Err(err) = iter.finish() {
        warn!(?err, "Failed to tokenize the full content");
    }

    tokens
}

fn next_token(input: &str) -> IResult<&str, &str, NomError<&str>> {
    let quoted = |start: char, end: char| {
        delimited(
            ch::char(start),
            by::take_till1(move |c| c == end),
            ch::char(end),
        )
    };

    let simple = by::take_till1(char::is_whitespace);

    terminated(
        alt((quoted('"', '"'), quoted('“', '”'), simple)),
        ch::multispace0,
    )(input)
}

/// Map tokens onto argument names by position.
///
/// If there are more tokens than names, the last name absorbs all remaining
/// tokens joined by a space. Names without token stay absent.
pub fn map_positional(names: &[String], tokens: &[&str]) -> CommandArgs {
    let mut args = CommandArgs::default();

    let Some((last, names)) = names.split_last() else {
        return args;
    };

    let mut tokens = tokens.iter();

    for (name, token) in names.iter().zip(tokens.by_ref()) {
        args.insert(name, ArgValue::Text((*token).to_owned()));
    }

    let rest: Vec<_> = tokens.copied().collect();

    if !rest.is_empty() {
        args.insert(last, ArgValue::Text(rest.join(" ")));
    }

    args
}

#[derive(Clone, Debug, PartialEq)]
pub enum ArgValue {
    /// Argument of a text command.
    Text(String),
    /// Option of a structured command.
    Option(CommandOptionValue),
}

impl ArgValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(text) | Self::Option(CommandOptionValue::String(text)) => Some(text),
            Self::Option(CommandOptionValue::Focused(text, _)) => Some(text),
            Self::Option(_) => None,
        }
    }
}

/// Arguments of a command invocation in declaration order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CommandArgs {
    values: Vec<(String, ArgValue)>,
    sub_command: Vec<String>,
}

impl CommandArgs {
    /// Insert a value unless the name is already taken.
    pub(crate) fn insert(&mut self, name: &str, value: ArgValue) -> bool {
        if self.get(name).is_some() {
            return false;
        }

        self.values.push((name.to_owned(), value));

        true
    }

    pub(crate) fn push_sub_command(&mut self, name: &str) {
        self.sub_command.push(name.to_owned());
    }

    pub fn get(&self, name: &str) -> Option<&ArgValue> {
        self.values
            .iter()
            .find_map(|(key, value)| (key == name).then_some(value))
    }

    pub fn str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(ArgValue::as_str)
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        match self.get(name)? {
            ArgValue::Option(CommandOptionValue::Integer(n)) => Some(*n),
            ArgValue::Text(text) => text.parse().ok(),
            _ => None,
        }
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        match self.get(name)? {
            ArgValue::Option(CommandOptionValue::Number(n)) => Some(*n),
            ArgValue::Option(CommandOptionValue::Integer(n)) => Some(*n as f64),
            ArgValue::Text(text) => text.parse().ok(),
            _ => None,
        }
    }

    pub fn boolean(&self, name: &str) -> Option<bool> {
        match self.get(name)? {
            ArgValue::Option(CommandOptionValue::Boolean(b)) => Some(*b),
            ArgValue::Text(text) => text.parse().ok(),
            _ => None,
        }
    }

    /// User of a user option or the mention or id of a text argument.
    pub fn user(&self, name: &str) -> Option<Id<UserMarker>> {
        match self.get(name)? {
            ArgValue::Option(CommandOptionValue::User(id)) => Some(*id),
            ArgValue::Text(text) => parse_mention(text, "@")
                .or_else(|| parse_mention(text, "@!"))
                .map(Id::new),
            _ => None,
        }
    }

    pub fn channel(&self, name: &str) -> Option<Id<ChannelMarker>> {
        match self.get(name)? {
            ArgValue::Option(CommandOptionValue::Channel(id)) => Some(*id),
            ArgValue::Text(text) => parse_mention(text, "#").map(Id::new),
            _ => None,
        }
    }

    pub fn role(&self, name: &str) -> Option<Id<RoleMarker>> {
        match self.get(name)? {
            ArgValue::Option(CommandOptionValue::Role(id)) => Some(*id),
            ArgValue::Text(text) => parse_mention(text, "@&").map(Id::new),
            _ => None,
        }
    }

    /// Names of the invoked sub-command group and sub-command, outermost
    /// first.
    pub fn sub_command(&self) -> &[String] {
        &self.sub_command
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ArgValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Parse `<{kind}123>` or a plain id.
fn parse_mention(text: &str, kind: &str) -> Option<u64> {
    let id = text
        .strip_prefix('<')
        .and_then(|text| text.strip_prefix(kind))
        .and_then(|text| text.strip_suffix('>'))
        .unwrap_or(text);

    id.parse().ok().filter(|&id| id != 0)
}
