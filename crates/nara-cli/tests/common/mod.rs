//! Common test utilities for CLI testing.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::{tempdir, TempDir};

/// A complete operation story for `auth.login`.
pub const COMPLETE_STORY: &str = "\
## ID
story.auth.login

## Type
operation

## Purpose
Sign a user in with email and password.

## Inputs
Email and password.

## Outputs
A session token.

## Behavior
Checks the credentials and issues a token.

## Errors
Invalid credentials are rejected.

## Open Questions
";

/// A manifest carrying every required heading.
pub const MANIFEST: &str = "\
# Demo

## Name
Demo

## Description
A sign-in service.

## Intended Users
Developers.

## Primary Goal
Let users sign in.

## Non-Goals
Billing.

## Project Type
Service

## Key Constraints
None known.

## Success Criteria
Users can sign in.

## Current State
Prototype.

## Maturity
Early.

## Key Decisions
Passwords only.

## Open Questions
- Q1: Should sessions expire?
";

/// Test context with a temporary narrative repository
pub struct TestContext {
    pub temp_dir: TempDir,
}

impl TestContext {
    /// Empty directory with no narrative root.
    pub fn bare() -> Self {
        Self {
            temp_dir: tempdir().expect("Failed to create temp dir"),
        }
    }

    /// Directory marked as a fresh narrative root.
    pub fn new() -> Self {
        let ctx = Self::bare();
        ctx.write("NARA.md", "# Nara\n");
        fs::create_dir_all(ctx.stories()).expect("Failed to create stories dir");
        ctx
    }

    /// Get path to temp directory
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn stories(&self) -> PathBuf {
        self.path().join("specs/stories")
    }

    /// Write a file relative to the repository root
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        fs::write(&path, content).expect("Failed to write file");
        path
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.path().join(relative)).expect("Failed to read file")
    }

    /// Create a command configured for this context
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("nara").expect("Binary not found");
        cmd.current_dir(self.path())
            .env_remove("NARA_ROOT")
            .env_remove("RUST_LOG")
            .env_remove("NARA_LOG_LEVEL")
            .env("NO_COLOR", "1");
        cmd
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// JSON output assertions
pub mod json {
    use serde_json::Value;

    pub fn parse_output(output: &[u8]) -> Value {
        serde_json::from_slice(output).expect("Failed to parse JSON output")
    }
}
