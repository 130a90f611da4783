//! Domain entities

mod member;
mod message;
mod room;
mod user;

pub use member::{RoomMember, Roster};
pub use message::Message;
pub use room::{CreateRoomRequest, Room, RoomPrivacy};
pub use user::{BaseUser, User, UserPreview};
