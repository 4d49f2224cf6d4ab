#![allow(dead_code)]

use assert_cmd::Command;
use predicates::prelude::*;

/// Reference box used across the suites; matches layout A.
pub const REFERENCE_BOX: &str = "36°31′ to 37°20′N, 108°52′ to 109°26′E";

/// Test helper for running latlonbox commands with less boilerplate
pub struct LatlonboxTest {
    cmd: Command,
}

pub fn latlonbox_command() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("latlonbox"))
}

impl LatlonboxTest {
    pub fn new() -> Self {
        Self {
            cmd: latlonbox_command(),
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        self.cmd.args(args);
        self
    }

    pub fn arg<S: AsRef<std::ffi::OsStr>>(mut self, arg: S) -> Self {
        self.cmd.arg(arg);
        self
    }

    /// Feed `input` to the process on stdin
    pub fn stdin(mut self, input: &str) -> Self {
        self.cmd.write_stdin(input.to_string());
        self
    }

    pub fn assert_success(mut self) -> assert_cmd::assert::Assert {
        self.cmd.assert().success()
    }

    pub fn assert_success_contains(mut self, text: &str) -> assert_cmd::assert::Assert {
        self.cmd
            .assert()
            .success()
            .stdout(predicate::str::contains(text))
    }

    pub fn assert_failure(mut self) -> assert_cmd::assert::Assert {
        self.cmd.assert().failure()
    }

    pub fn get_output(mut self) -> std::process::Output {
        self.cmd.output().unwrap()
    }

    /// Run and return stdout as a string, asserting success
    pub fn stdout(self) -> String {
        let output = self.assert_success().get_output().stdout.clone();
        String::from_utf8(output).unwrap()
    }
}

/// bbox extraction of `text` in the given format
pub fn bbox_test(format: &str, text: &str) -> LatlonboxTest {
    LatlonboxTest::new().args([&format!("--format={}", format), text, "bbox"])
}

/// points extraction of `text` in the given format
pub fn points_test(format: &str, text: &str) -> LatlonboxTest {
    LatlonboxTest::new().args([&format!("--format={}", format), text, "points"])
}
