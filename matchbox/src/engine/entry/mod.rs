pub mod album;
pub mod collection;
pub mod match_record;
pub mod proposal;
pub mod user;

pub use album::{Album, Sticker};
pub use collection::{CollectionEntry, StickerStatus};
pub use match_record::MatchRecord;
pub use proposal::{Exchange, MatchProposal};
pub use user::{PublicProfile, User};
