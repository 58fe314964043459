//! Invocation of the external setup scripts ("actions") that own all server
//! state. Pages call them through the [`ActionRunner`] trait.

pub mod error;
pub mod runner;
#[cfg(any(test, feature = "test-support"))]
pub mod scripted;

pub use {
    error::{Error, Result},
    runner::{ActionOutput, ActionRunner, CliActionRunner},
};

#[cfg(any(test, feature = "test-support"))]
pub use scripted::{ActionCall, ScriptedRunner};
