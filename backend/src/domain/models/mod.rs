pub mod activity;
pub mod record;

pub use activity::{ActivityRecord, CachedActivity};
pub use record::{Affirmation, OwnedRecord, Pledge, RecordKind};
