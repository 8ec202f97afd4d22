//! Test doubles for the command runner and the prompt.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::Path;

use tagpush_config::Credentials;
use tagpush_git::{CommandRunner, GitError, GitResult, ProcessResult};

use crate::{CredentialPrompt, PromptOutcome};

#[derive(Debug, Clone)]
enum Reply {
    Exit {
        code: i32,
        stdout: String,
        stderr: String,
    },
    Launch,
}

/// Replies to commands by substring match; unmatched commands succeed silently.
///
/// A rule holding several replies hands them out in order and repeats the last.
pub(crate) struct ScriptedRunner {
    rules: RefCell<Vec<(String, VecDeque<Reply>)>>,
    calls: RefCell<Vec<String>>,
}

impl ScriptedRunner {
    pub(crate) fn new() -> Self {
        Self {
            rules: RefCell::new(Vec::new()),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn on(self, pattern: &str, code: i32, stdout: &str, stderr: &str) -> Self {
        self.push(
            pattern,
            Reply::Exit {
                code,
                stdout: stdout.to_string(),
                stderr: stderr.to_string(),
            },
        )
    }

    pub(crate) fn fail_launch(self, pattern: &str) -> Self {
        self.push(pattern, Reply::Launch)
    }

    fn push(self, pattern: &str, reply: Reply) -> Self {
        {
            let mut rules = self.rules.borrow_mut();
            match rules.iter_mut().find(|(p, _)| p == pattern) {
                Some((_, replies)) => replies.push_back(reply),
                None => rules.push((pattern.to_string(), VecDeque::from([reply]))),
            }
        }
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub(crate) fn count(&self, pattern: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.contains(pattern))
            .count()
    }

    pub(crate) fn position(&self, pattern: &str) -> Option<usize> {
        self.calls.borrow().iter().position(|c| c.contains(pattern))
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, command: &[String], _dir: Option<&Path>) -> GitResult<ProcessResult> {
        let line = command.join(" ");
        self.calls.borrow_mut().push(line.clone());

        let reply = {
            let mut rules = self.rules.borrow_mut();
            rules
                .iter_mut()
                .find(|(pattern, _)| line.contains(pattern.as_str()))
                .map(|(_, replies)| {
                    if replies.len() > 1 {
                        replies.pop_front().unwrap()
                    } else {
                        replies.front().cloned().unwrap()
                    }
                })
        };

        match reply {
            None => Ok(ProcessResult::new(command.to_vec(), 0, "", "")),
            Some(Reply::Exit {
                code,
                stdout,
                stderr,
            }) => Ok(ProcessResult::new(command.to_vec(), code, stdout, stderr)),
            Some(Reply::Launch) => Err(GitError::Launch {
                command: line,
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "scripted"),
            }),
        }
    }
}

/// Answers prompts from queues; cancels and declines once they run dry.
#[derive(Default)]
pub(crate) struct ScriptedPrompt {
    entries: VecDeque<PromptOutcome>,
    confirms: VecDeque<bool>,
    pub(crate) credential_prompts: usize,
    pub(crate) confirmations: Vec<String>,
    pub(crate) messages: Vec<String>,
}

impl ScriptedPrompt {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn enter(mut self, credentials: Credentials) -> Self {
        self.entries.push_back(PromptOutcome::Entered(credentials));
        self
    }

    pub(crate) fn cancel(mut self) -> Self {
        self.entries.push_back(PromptOutcome::Cancelled);
        self
    }

    pub(crate) fn confirm(mut self, answer: bool) -> Self {
        self.confirms.push_back(answer);
        self
    }
}

impl CredentialPrompt for ScriptedPrompt {
    fn prompt_credentials(&mut self, _current: &Credentials) -> PromptOutcome {
        self.credential_prompts += 1;
        self.entries.pop_front().unwrap_or(PromptOutcome::Cancelled)
    }

    fn prompt_confirm(&mut self, message: &str) -> bool {
        self.confirmations.push(message.to_string());
        self.confirms.pop_front().unwrap_or(false)
    }

    fn show_message(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }
}
