//! Scripted git runner
//!
//! Every call must match the next expected argument vector exactly, in
//! order. Outputs and failures are canned per expectation.

use mr_stack::error::{Error, Result};
use mr_stack::git::GitRunner;
use std::collections::VecDeque;
use std::sync::Mutex;

#[derive(Debug)]
struct Expectation {
    args: Vec<String>,
    result: std::result::Result<String, (i32, String)>,
}

/// Git runner that replays a fixed script of commands
#[derive(Default)]
pub struct MockGitRunner {
    expected: Mutex<VecDeque<Expectation>>,
    calls: Mutex<Vec<Vec<String>>>,
}

fn to_args(args: &[&str]) -> Vec<String> {
    args.iter().map(ToString::to_string).collect()
}

impl MockGitRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expect `args` next, returning empty output
    pub fn expect(&self, args: &[&str]) -> &Self {
        self.expect_output(args, "")
    }

    /// Expect `args` next, returning `output`
    pub fn expect_output(&self, args: &[&str], output: &str) -> &Self {
        self.expected.lock().unwrap().push_back(Expectation {
            args: to_args(args),
            result: Ok(output.to_string()),
        });
        self
    }

    /// Expect `args` next and fail it with `message`
    pub fn expect_failure(&self, args: &[&str], message: &str) -> &Self {
        self.expect_exit(args, 1, message)
    }

    /// Expect `args` next and fail it with exit status `code`
    pub fn expect_exit(&self, args: &[&str], code: i32, message: &str) -> &Self {
        self.expected.lock().unwrap().push_back(Expectation {
            args: to_args(args),
            result: Err((code, message.to_string())),
        });
        self
    }

    /// Every command run so far
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }

    /// Assert the whole script was consumed
    pub fn assert_done(&self) {
        let left = self.expected.lock().unwrap();
        assert!(
            left.is_empty(),
            "expected git commands never ran: {:?}",
            left.iter().map(|e| e.args.join(" ")).collect::<Vec<_>>()
        );
    }
}

impl GitRunner for MockGitRunner {
    fn git(&self, args: &[&str]) -> Result<String> {
        let args = to_args(args);
        self.calls.lock().unwrap().push(args.clone());

        let next = self
            .expected
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected git command: git {}", args.join(" ")));

        assert_eq!(
            next.args, args,
            "git commands out of order: expected `git {}`, got `git {}`",
            next.args.join(" "),
            args.join(" ")
        );

        next.result.map_err(|(code, message)| Error::Git {
            command: args.join(" "),
            message,
            code: Some(code),
        })
    }
}
