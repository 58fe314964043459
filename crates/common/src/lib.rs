//! Error plumbing shared by the boxpanel crates.

pub mod error;

pub use error::FromMessage;
