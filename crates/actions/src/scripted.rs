//! In-process [`ActionRunner`] that answers from a closure and records every
//! call. Only built for tests and the `test-support` feature.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::{
    error::Result,
    runner::{ActionOutput, ActionRunner},
};

/// One recorded invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionCall {
    pub action: String,
    pub args: Vec<String>,
    pub privileged: bool,
}

type Responder = Box<dyn Fn(&ActionCall) -> ActionOutput + Send + Sync>;

pub struct ScriptedRunner {
    respond: Responder,
    calls: Mutex<Vec<ActionCall>>,
}

impl ScriptedRunner {
    pub fn new(respond: impl Fn(&ActionCall) -> ActionOutput + Send + Sync + 'static) -> Self {
        Self {
            respond: Box::new(respond),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every invocation so far, in order.
    pub fn calls(&self) -> Vec<ActionCall> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Only the privileged invocations.
    pub fn privileged_calls(&self) -> Vec<ActionCall> {
        self.calls().into_iter().filter(|c| c.privileged).collect()
    }

    fn record(&self, action: &str, args: &[&str], privileged: bool) -> ActionOutput {
        let call = ActionCall {
            action: action.to_owned(),
            args: args.iter().map(|a| (*a).to_owned()).collect(),
            privileged,
        };
        let output = (self.respond)(&call);
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(call);
        output
    }
}

impl std::fmt::Debug for ScriptedRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptedRunner")
            .field("calls", &self.calls())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ActionRunner for ScriptedRunner {
    async fn run(&self, action: &str, args: &[&str]) -> Result<ActionOutput> {
        Ok(self.record(action, args, false))
    }

    async fn superuser_run(&self, action: &str, args: &[&str]) -> Result<ActionOutput> {
        Ok(self.record(action, args, true))
    }
}
