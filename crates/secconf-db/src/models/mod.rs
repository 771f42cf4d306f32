//! Typed views over result records.

mod catalog;
mod conference;
mod event;

pub use catalog::{Location, MeetingType, Tag};
pub use conference::{Conference, ConferenceDetails, ConferenceKey};
pub use event::Event;
