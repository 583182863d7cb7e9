//! `stockwidget-core`: shared inventory building blocks.
//!
//! Error taxonomy and identifiers only; no IO lives here.

pub mod entity;
pub mod error;
pub mod id;

pub use entity::Entity;
pub use error::{Field, InventoryError, InventoryResult, ValidationError, ValidationReason};
pub use id::{ProductCode, RecordId};
