use std::fmt::{Display, Formatter, Result as FmtResult};

use twilight_http::request::channel::reaction::RequestReactionType;
use twilight_model::{
    channel::message::ReactionType,
    id::{marker::EmojiMarker, Id},
};

/// An emoji as used for reactions.
///
/// Custom emojis compare by id only since their name may change.
#[derive(Clone, Debug)]
pub enum ReactionEmoji {
    Unicode(Box<str>),
    Custom {
        id: Id<EmojiMarker>,
        name: Option<Box<str>>,
    },
}

impl ReactionEmoji {
    pub fn unicode(name: impl Into<Box<str>>) -> Self {
        Self::Unicode(name.into())
    }

    pub fn custom(id: Id<EmojiMarker>, name: Option<&str>) -> Self {
        Self::Custom {
            id,
            name: name.map(Box::from),
        }
    }

    pub fn request_reaction_type(&self) -> RequestReactionType<'_> {
        match self {
            Self::Unicode(name) => RequestReactionType::Unicode { name },
            Self::Custom { id, name } => RequestReactionType::Custom {
                id: *id,
                name: name.as_deref(),
            },
        }
    }

    pub fn reaction_type(&self) -> ReactionType {
        match self {
            Self::Unicode(name) => ReactionType::Unicode {
                name: name.to_string(),
            },
            Self::Custom { id, name } => ReactionType::Custom {
                animated: false,
                id: *id,
                name: name.as_deref().map(str::to_owned),
            },
        }
    }
}

impl PartialEq for ReactionEmoji {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Unicode(a), Self::Unicode(b)) => a == b,
            (Self::Custom { id: a, .. }, Self::Custom { id: b, .. }) => a == b,
            _ => false,
        }
    }
}

impl Eq for ReactionEmoji {}

impl From<&str> for ReactionEmoji {
    #[inline]
    fn from(name: &str) -> Self {
        Self::unicode(name)
    }
}

impl From<&ReactionType> for ReactionEmoji {
    fn from(reaction: &ReactionType) -> Self {
        match reaction {
            ReactionType::Custom { id, name, .. } => Self::custom(*id, name.as_deref()),
            ReactionType::Unicode { name } => Self::unicode(name.as_str()),
        }
    }
}

impl Display for ReactionEmoji {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Unicode(name) => f.write_str(name),
            Self::Custom {
                id,
                name: Some(name),
            } => write!(f, "<:{name}:{id}>"),
            Self::Custom { id, name: None } => write!(f, "<:_:{id}>"),
        }
    }
}
