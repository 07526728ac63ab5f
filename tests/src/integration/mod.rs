//! Cross-crate integration flows.

pub mod dispatch;
pub mod properties;
