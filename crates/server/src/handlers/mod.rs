//! HTTP request handlers.

pub mod common;
pub mod files;
pub mod health;
pub mod photos;
pub mod places;

pub use files::*;
pub use health::*;
pub use photos::*;
pub use places::*;
