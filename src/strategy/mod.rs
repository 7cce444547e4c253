//! Topic naming strategies.
//!
//! Both strategies share one shape: `Remove` and unrecognised events never
//! publish, `Insert` names the topic from the new image, and `Modify` does
//! too unless the value driving the name is unchanged from the old image.

pub mod encoded;
pub mod state;

pub use encoded::EncodedAttribute;
pub use state::StateTransition;

use crate::error::DecodeError;
use crate::stream::{ChangeRecord, EventKind, Item};

/// Reads the naming value from the new image and suppresses it when a
/// `Modify` left that value untouched.
///
/// A missing or undecodable old value counts as a change.
fn detect_change<'a, T, F>(record: &'a ChangeRecord, read: F) -> Result<Option<T>, DecodeError>
where
    T: PartialEq,
    F: Fn(Option<&'a Item>) -> Result<T, DecodeError>,
{
    match record.event_kind {
        EventKind::Insert => read(record.new_image()).map(Some),
        EventKind::Modify => {
            let new = read(record.new_image())?;
            match read(record.old_image()) {
                Ok(old) if old == new => Ok(None),
                _ => Ok(Some(new)),
            }
        }
        EventKind::Remove | EventKind::Other(_) => Ok(None),
    }
}
