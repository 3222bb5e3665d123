use std::{env, time::Duration};

use eyre::Result;
use twilight_model::id::{marker::GuildMarker, Id};

/// Name prefix of every command while in development mode.
pub const DEV_MARKER: &str = "dev-";

pub const DEFAULT_PREFIX: &str = "!";

const DEFAULT_PAGINATION_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Clone, Debug)]
pub struct BotConfig {
    pub token: Box<str>,
    pub prefix: Box<str>,
    pub dev_mode: bool,
    pub dev_guild: Option<Id<GuildMarker>>,
    pub pagination_timeout: Duration,
}

impl BotConfig {
    pub fn new(token: impl Into<Box<str>>) -> Self {
        Self {
            token: token.into(),
            prefix: Box::from(DEFAULT_PREFIX),
            dev_mode: false,
            dev_guild: None,
            pagination_timeout: DEFAULT_PAGINATION_TIMEOUT,
        }
    }

    pub fn prefix(mut self, prefix: impl Into<Box<str>>) -> Self {
        self.prefix = prefix.into();

        self
    }

    /// Enable development mode.
    ///
    /// Commands will be registered in the given guild only and carry the
    /// [`DEV_MARKER`] in their name.
    pub fn dev_mode(mut self, dev_guild: Option<Id<GuildMarker>>) -> Self {
        self.dev_mode = true;
        self.dev_guild = dev_guild;

        self
    }

    pub fn pagination_timeout(mut self, timeout: Duration) -> Self {
        self.pagination_timeout = timeout;

        self
    }

    pub fn from_env() -> Result<Self> {
        let config = Self {
            token: env_var("DISCORD_TOKEN")?,
            prefix: env_var_opt("PREFIX")?.unwrap_or_else(|| Box::from(DEFAULT_PREFIX)),
            dev_mode: env_var_opt("DEV_MODE")?.unwrap_or(false),
            dev_guild: env_var_opt("DEV_GUILD_ID")?,
            pagination_timeout: env_var_opt::<u64>("PAGINATION_TIMEOUT")?
                .map_or(DEFAULT_PAGINATION_TIMEOUT, Duration::from_secs),
        };

        config.validate()
    }

    pub fn validate(self) -> Result<Self> {
        if self.prefix.is_empty() {
            bail!("prefix must not be empty");
        }

        if self.dev_mode && self.dev_guild.is_none() {
            bail!("development mode requires a dev guild to register commands in");
        }

        Ok(self)
    }

    /// Name under which a command is known remotely.
    pub fn remote_name(&self, name: &str) -> String {
        if self.dev_mode {
            format!("{DEV_MARKER}{name}")
        } else {
            name.to_owned()
        }
    }

    /// Strip the [`DEV_MARKER`] off an incoming command name while in
    /// development mode.
    pub fn strip_dev_marker<'n>(&self, name: &'n str) -> &'n str {
        if !self.dev_mode {
            return name;
        }

        name.get(..DEV_MARKER.len())
            .filter(|marker| marker.eq_ignore_ascii_case(DEV_MARKER))
            .map_or(name, |_| &name[DEV_MARKER.len()..])
    }
}

trait EnvKind: Sized {
    const EXPECTED: &'static str;

    fn from_str(s: String) -> Result<Self, String>;
}

macro_rules! env_kind {
    ($($ty:ty: |$arg:ident| $impl:block,)*) => {
        $(
            impl EnvKind for $ty {
                const EXPECTED: &'static str = stringify!($ty);

                fn from_str($arg: String) -> Result<Self, String> {
                    $impl
                }
            }
        )*
    };
}

env_kind! {
    Box<str>: |s| { Ok(s.into_boxed_str()) },
    u64: |s| { s.parse().map_err(|_| s) },
    Id<GuildMarker>: |s| { s.parse().ok().and_then(Id::new_checked).ok_or(s) },
}

impl EnvKind for bool {
    const EXPECTED: &'static str = "a boolean like `true` or `0`";

    fn from_str(s: String) -> Result<Self, String> {
        match s.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(s),
        }
    }
}

fn env_var<T: EnvKind>(name: &str) -> Result<T> {
    env_var_opt(name)?.ok_or_else(|| eyre!("missing env variable `{name}`"))
}

fn env_var_opt<T: EnvKind>(name: &str) -> Result<Option<T>> {
    let Ok(value) = env::var(name) else {
        return Ok(None);
    };

    T::from_str(value).map(Some).map_err(|value| {
        eyre!(
            "failed to parse env variable `{name}={value}`; expected {expected}",
            expected = T::EXPECTED
        )
    })
}
