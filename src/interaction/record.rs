use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::{core::client::SentMessage, util::MessageBuilder};

/// A reply or follow-up of an invocation.
#[derive(Clone, Debug)]
pub struct ReplyRecord {
    pub(super) message: Option<SentMessage>,
    pub(super) content: Option<MessageBuilder>,
    pub(super) ephemeral: bool,
    pub(super) deleted: bool,
    pub(super) deferred: bool,
}

impl ReplyRecord {
    pub(super) fn deferred(ephemeral: bool) -> Self {
        Self {
            message: None,
            content: None,
            ephemeral,
            deleted: false,
            deferred: true,
        }
    }

    pub(super) fn sent(message: SentMessage, content: MessageBuilder, ephemeral: bool) -> Self {
        Self {
            message: Some(message),
            content: Some(content),
            ephemeral,
            deleted: false,
            deferred: false,
        }
    }

    /// `None` while the record is deferred.
    pub fn message(&self) -> Option<SentMessage> {
        self.message
    }

    pub fn content(&self) -> Option<&MessageBuilder> {
        self.content.as_ref()
    }

    pub fn is_ephemeral(&self) -> bool {
        self.ephemeral
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    /// Whether the record started out deferred.
    pub fn was_deferred(&self) -> bool {
        self.deferred
    }

    pub fn state(&self) -> SlotState {
        match (self.message, self.deleted) {
            (_, true) => SlotState::Deleted,
            (Some(_), false) => SlotState::Sent,
            (None, false) => SlotState::Deferred,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SlotState {
    Absent,
    Deferred,
    Sent,
    Deleted,
}

impl SlotState {
    pub(super) fn of(record: Option<&ReplyRecord>) -> Self {
        record.map_or(Self::Absent, ReplyRecord::state)
    }
}

impl Display for SlotState {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Absent => f.write_str("absent"),
            Self::Deferred => f.write_str("deferred"),
            Self::Sent => f.write_str("sent"),
            Self::Deleted => f.write_str("deleted"),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Slot {
    Reply,
    FollowUp,
}

impl Display for Slot {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Reply => f.write_str("reply"),
            Self::FollowUp => f.write_str("follow-up"),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ReplyOp {
    Defer,
    Reply,
    Edit,
    Delete,
    FollowUp,
    UpdateSource,
}

impl ReplyOp {
    /// Whether the operation may be performed on a slot in the given state.
    ///
    /// Follow-ups are checked against the reply slot, everything else against
    /// the slot it operates on.
    pub fn allowed(self, state: SlotState) -> bool {
        match self {
            Self::Defer | Self::UpdateSource => state == SlotState::Absent,
            Self::Reply => matches!(state, SlotState::Absent | SlotState::Deferred),
            Self::Edit => matches!(state, SlotState::Deferred | SlotState::Sent),
            Self::Delete => state == SlotState::Sent,
            Self::FollowUp => state != SlotState::Absent,
        }
    }

    pub(super) fn check(self, slot: Slot, state: SlotState) -> Result<(), ReplyStateError> {
        if self.allowed(state) {
            Ok(())
        } else {
            Err(ReplyStateError {
                slot,
                op: self,
                state,
            })
        }
    }
}

impl Display for ReplyOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Defer => f.write_str("defer"),
            Self::Reply => f.write_str("reply"),
            Self::Edit => f.write_str("edit"),
            Self::Delete => f.write_str("delete"),
            Self::FollowUp => f.write_str("follow up"),
            Self::UpdateSource => f.write_str("update the source message"),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("cannot {op} while the {slot} is {state}")]
pub struct ReplyStateError {
    pub slot: Slot,
    pub op: ReplyOp,
    pub state: SlotState,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_table() {
        use SlotState::*;

        let table = [
            (ReplyOp::Defer, [true, false, false, false]),
            (ReplyOp::Reply, [true, true, false, false]),
            (ReplyOp::Edit, [false, true, true, false]),
            (ReplyOp::Delete, [false, false, true, false]),
            (ReplyOp::FollowUp, [false, true, true, true]),
            (ReplyOp::UpdateSource, [true, false, false, false]),
        ];

        for (op, expected) in table {
            for (state, allowed) in [Absent, Deferred, Sent, Deleted].into_iter().zip(expected) {
                assert_eq!(op.allowed(state), allowed, "{op} in state {state}");
            }
        }
    }

    #[test]
    fn state_error_message() {
        let err = ReplyOp::Delete
            .check(Slot::Reply, SlotState::Deferred)
            .unwrap_err();

        assert_eq!(err.to_string(), "cannot delete while the reply is deferred");
    }
}
