use twilight_model::id::{
    marker::{ChannelMarker, GuildMarker, UserMarker},
    Id,
};

pub trait Authored {
    /// Channel id of the event
    fn channel_id(&self) -> Id<ChannelMarker>;

    /// Guild id of the event
    fn guild_id(&self) -> Option<Id<GuildMarker>>;

    /// Author's user id, if known
    fn user_id(&self) -> Option<Id<UserMarker>>;

    /// Author's name, if known
    fn username(&self) -> Option<&str>;
}
