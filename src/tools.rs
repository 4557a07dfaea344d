//! Capability probe and blocking process execution for external tools.
//!
//! Every delegated step (document converter, notebook exporter, site builder,
//! PDF renderer) goes through this module. Call sites decide the policy for a
//! missing tool themselves:
//!
//! * graceful degrade — query [`tool_available`] and fall back locally;
//! * fail fast — call [`require_tool`], which returns
//!   [`DocsError::MissingTool`].
//!
//! Invocations block until the child exits; a non-zero exit becomes
//! [`DocsError::ExternalProcess`] and is never retried.

use crate::error::DocsError;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::debug;

/// Return `true` if `name` resolves to an executable (on `PATH`, or as a path).
pub fn tool_available(name: &str) -> bool {
    which::which(name).is_ok()
}

/// Resolve `name` or fail with [`DocsError::MissingTool`].
///
/// `purpose` completes the sentence "'{tool}' is required to …".
pub fn require_tool(name: &str, purpose: &str) -> Result<PathBuf, DocsError> {
    which::which(name).map_err(|_| DocsError::MissingTool {
        tool: name.to_string(),
        purpose: purpose.to_string(),
    })
}

/// A single invocation of an external tool.
#[derive(Debug, Clone)]
pub struct ExternalCommand {
    program: String,
    args: Vec<OsString>,
    cwd: Option<PathBuf>,
}

impl ExternalCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(ref dir) = self.cwd {
            cmd.current_dir(dir);
        }
        cmd
    }

    /// Run to completion. Stdout is inherited; stderr is captured for the
    /// error message.
    pub fn run(&self) -> Result<(), DocsError> {
        debug!("Running {} {:?}", self.program, self.args);
        let output = self
            .command()
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| DocsError::Spawn {
                tool: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(DocsError::ExternalProcess {
                tool: self.program.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        Ok(())
    }

    /// Run to completion and return stdout as UTF-8 text.
    pub fn capture(&self) -> Result<String, DocsError> {
        debug!("Capturing {} {:?}", self.program, self.args);
        let output = self
            .command()
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| DocsError::Spawn {
                tool: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(DocsError::ExternalProcess {
                tool: self.program.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        String::from_utf8(output.stdout).map_err(|_| DocsError::InvalidOutput {
            tool: self.program.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MISSING: &str = "cookbook-docs-test-tool-that-does-not-exist";

    #[test]
    fn missing_tool_is_not_available() {
        assert!(!tool_available(MISSING));
    }

    #[test]
    fn require_missing_tool_fails() {
        let err = require_tool(MISSING, "run the tests").unwrap_err();
        match err {
            DocsError::MissingTool { tool, purpose } => {
                assert_eq!(tool, MISSING);
                assert_eq!(purpose, "run the tests");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn shell_is_available() {
        assert!(tool_available("sh"));
    }

    #[cfg(unix)]
    #[test]
    fn capture_returns_stdout() {
        let out = ExternalCommand::new("sh")
            .args(["-c", "printf 'hello'"])
            .capture()
            .unwrap();
        assert_eq!(out, "hello");
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_is_external_process_error() {
        let err = ExternalCommand::new("sh")
            .args(["-c", "echo nope >&2; exit 3"])
            .run()
            .unwrap_err();
        match err {
            DocsError::ExternalProcess { tool, status, stderr } => {
                assert_eq!(tool, "sh");
                assert_eq!(status.code(), Some(3));
                assert_eq!(stderr.trim(), "nope");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn current_dir_is_honoured() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("marker"), "x").unwrap();
        let out = ExternalCommand::new("sh")
            .args(["-c", "ls"])
            .current_dir(dir.path())
            .capture()
            .unwrap();
        assert!(out.contains("marker"));
    }

    #[test]
    fn spawn_failure_is_reported() {
        let err = ExternalCommand::new(MISSING).run().unwrap_err();
        assert!(matches!(err, DocsError::Spawn { .. }));
    }
}
