bitflags::bitflags! {
    pub struct CommandFlags: u8 {
        const DEFER       = 1 << 0;
        const EPHEMERAL   = 1 << 1;
        const ONLY_GUILDS = 1 << 2;
    }
}

impl CommandFlags {
    pub fn defer(self) -> bool {
        self.contains(CommandFlags::DEFER)
    }

    pub fn ephemeral(self) -> bool {
        self.contains(CommandFlags::EPHEMERAL)
    }

    pub fn only_guilds(self) -> bool {
        self.contains(CommandFlags::ONLY_GUILDS)
    }
}

bitflags::bitflags! {
    /// Ways a command can be invoked.
    pub struct CommandKinds: u8 {
        const MESSAGE         = 1 << 0;
        const SLASH           = 1 << 1;
        const USER            = 1 << 2;
        const MESSAGE_CONTEXT = 1 << 3;
    }
}

impl CommandKinds {
    /// Whether any of the kinds need to be registered remotely.
    pub fn is_structured(self) -> bool {
        self.intersects(Self::SLASH | Self::USER | Self::MESSAGE_CONTEXT)
    }
}
