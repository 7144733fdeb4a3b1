use thiserror::Error;

use crate::cache::GroupId;

/// Configuration errors: the requested value is structurally invalid.
///
/// These are surfaced before any device command is emitted; the mirror is
/// left untouched by a failed apply.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateError {
    #[error("{group} index {index} exceeds device limit {limit}")]
    GroupIndexOutOfRange {
        group: GroupId,
        index: u32,
        limit: u32,
    },
    #[error("attribute pointer component count {size} is out of range 1..=4")]
    InvalidPointerSize { size: u8 },
    #[error("attribute pointer stride {stride} is smaller than one element ({needed} bytes)")]
    PointerStrideTooSmall { stride: u32, needed: u32 },
    #[error("attribute pointer references the reserved buffer id 0")]
    ReservedBufferId,
    #[error("texture unit {unit} references the reserved texture id 0")]
    ReservedTextureId { unit: u32 },
}
