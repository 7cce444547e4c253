pub mod attribute;
pub mod types;

pub use attribute::{AttributeValue, Item};
pub use types::{Batch, ChangeRecord, EventKind, StreamRecord};
