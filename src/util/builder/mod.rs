pub use self::message::MessageBuilder;

mod message;
