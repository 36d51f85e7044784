pub mod pager;
pub mod record;
pub mod store;

pub use pager::Pager;
pub use record::Record;
pub use store::LeaderboardStore;
