// ABOUTME: Shared test support: a scripted command executor.
// ABOUTME: Matches command lines by substring and records every invocation.

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use sitewright::process::{CommandExecutor, CommandResult, ProcessError, RunOptions};

pub fn ok() -> CommandResult {
    ok_with("")
}

pub fn ok_with(output: &str) -> CommandResult {
    CommandResult {
        success: true,
        output: output.to_string(),
        exit_code: 0,
    }
}

pub fn fail() -> CommandResult {
    fail_with("")
}

pub fn fail_with(output: &str) -> CommandResult {
    CommandResult {
        success: false,
        output: output.to_string(),
        exit_code: 1,
    }
}

struct Rule {
    needle: String,
    result: CommandResult,
    remaining: Option<usize>,
}

/// Command executor scripted with substring-matched responses.
///
/// Rules are consulted in registration order; the first match with uses
/// remaining wins. Unscripted commands fail with exit code 1, so lock
/// probes default to "not held" and install probes to "not installed".
pub struct FakeExecutor {
    rules: Mutex<Vec<Rule>>,
    calls: Mutex<Vec<String>>,
}

impl FakeExecutor {
    pub fn new() -> Self {
        Self {
            rules: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Respond to every command line containing `needle`.
    pub fn on(self, needle: &str, result: CommandResult) -> Self {
        self.rules.lock().push(Rule {
            needle: needle.to_string(),
            result,
            remaining: None,
        });
        self
    }

    /// Respond to the first `times` command lines containing `needle`,
    /// then fall through to later rules.
    pub fn on_times(self, needle: &str, result: CommandResult, times: usize) -> Self {
        self.rules.lock().push(Rule {
            needle: needle.to_string(),
            result,
            remaining: Some(times),
        });
        self
    }

    /// Every command line seen so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn count_containing(&self, needle: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|line| line.contains(needle))
            .count()
    }
}

#[async_trait]
impl CommandExecutor for FakeExecutor {
    async fn run(
        &self,
        command: &[String],
        _options: &RunOptions,
    ) -> Result<CommandResult, ProcessError> {
        if command.is_empty() {
            return Err(ProcessError::EmptyCommand);
        }

        let line = command.join(" ");
        self.calls.lock().push(line.clone());

        let mut rules = self.rules.lock();
        for rule in rules.iter_mut() {
            if !line.contains(&rule.needle) {
                continue;
            }
            match &mut rule.remaining {
                Some(0) => continue,
                Some(n) => {
                    *n -= 1;
                    return Ok(rule.result.clone());
                }
                None => return Ok(rule.result.clone()),
            }
        }

        Ok(fail())
    }
}
