//! # Posts Shared
//!
//! Wire types shared between the server and its clients: request bodies with
//! their validation rules, version-specific response shapes and the RFC 7807
//! error document.

pub mod dto;
pub mod response;

pub use response::{ErrorResponse, validation_messages};
