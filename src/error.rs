use thiserror::Error;

use crate::tracker::PointerId;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GestureError {
    /// The registry held no second pointer while a dual-pointer path ran.
    /// This is a coordinator defect, never user input.
    #[error("pointer with any id other than {id} not found")]
    PointerNotFound { id: PointerId },
}
