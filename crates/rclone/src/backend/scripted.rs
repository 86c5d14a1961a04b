//! Scripted backend for tests.
//!
//! Replays queued outputs in order and records every invocation it
//! receives. Clones share state, so a test can keep one handle while the
//! client owns another.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::Result;
use crate::types::{CommandOutput, Invocation};

use super::Backend;

#[derive(Clone, Default)]
pub struct ScriptedBackend {
    outputs: Arc<Mutex<VecDeque<CommandOutput>>>,
    calls: Arc<Mutex<Vec<Invocation>>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful run whose stderr holds the given lines.
    pub fn push_success(&self, stderr_lines: &[&str]) -> &Self {
        self.push(CommandOutput {
            code: Some(0),
            stdout: String::new(),
            stderr: stderr_lines.join("\n"),
        })
    }

    /// Queue a failed run.
    pub fn push_failure(&self, code: i32, stderr: &str) -> &Self {
        self.push(CommandOutput {
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.to_string(),
        })
    }

    pub fn push(&self, output: CommandOutput) -> &Self {
        self.outputs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(output);
        self
    }

    /// Every invocation received so far, in order.
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Backend for ScriptedBackend {
    fn run(&self, invocation: &Invocation) -> Result<CommandOutput> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(invocation.clone());

        // An exhausted script behaves like a quiet, successful rclone
        let next = self
            .outputs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        Ok(next.unwrap_or(CommandOutput {
            code: Some(0),
            ..Default::default()
        }))
    }
}
