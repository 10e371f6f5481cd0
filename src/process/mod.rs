//! Subprocess capability.
//!
//! Every external program the exporter touches (encoder, shell, mkdir,
//! clipboard helper) goes through [`CommandRunner`], so the export logic
//! can run against a fake in tests.

use std::path::Path;
use std::process::Stdio;
use async_trait::async_trait;
use tokio::process::Command;

/// Error type for subprocess launches
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("Failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },
}

/// Captured result of a finished subprocess
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code; `None` when the process was killed by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Human-readable exit status (`code 1`, `signal`)
    pub fn status_text(&self) -> String {
        match self.code {
            Some(code) => format!("code {}", code),
            None => "signal".to_string(),
        }
    }

    /// Turn a non-zero exit into [`ProcessError::Failed`]
    pub fn check(self, program: &str) -> Result<Self, ProcessError> {
        if self.success() {
            Ok(self)
        } else {
            Err(ProcessError::Failed {
                program: program.to_string(),
                status: self.status_text(),
                stderr: self.stderr.trim().to_string(),
            })
        }
    }
}

/// Runs external programs to completion
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args`, capturing stdout and stderr.
    /// A non-zero exit is a normal `Ok` result; only launch failures are errors.
    async fn run(&self, program: &str, args: &[String]) -> Result<ProcessOutput, ProcessError>;

    /// Whether `program` can be launched: a bare name is looked up on the
    /// search path, anything containing a separator is checked directly.
    fn is_available(&self, program: &str) -> bool;
}

/// [`CommandRunner`] backed by real processes
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, program: &str, args: &[String]) -> Result<ProcessOutput, ProcessError> {
        log::debug!("exec: {} {:?}", program, args);

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| ProcessError::Launch {
                program: program.to_string(),
                source,
            })?;

        Ok(ProcessOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn is_available(&self, program: &str) -> bool {
        if program.contains(std::path::MAIN_SEPARATOR) {
            return is_executable(Path::new(program));
        }

        match std::env::var_os("PATH") {
            Some(paths) => std::env::split_paths(&paths).any(|dir| is_executable(&dir.join(program))),
            None => false,
        }
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file() || path.with_extension("exe").is_file()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_check() {
        let ok = ProcessOutput { code: Some(0), ..Default::default() };
        assert!(ok.clone().check("x").is_ok());

        let failed = ProcessOutput {
            code: Some(2),
            stdout: String::new(),
            stderr: "boom\n".to_string(),
        };
        match failed.check("mkdir") {
            Err(ProcessError::Failed { program, status, stderr }) => {
                assert_eq!(program, "mkdir");
                assert_eq!(status, "code 2");
                assert_eq!(stderr, "boom");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_signal_status() {
        let killed = ProcessOutput { code: None, ..Default::default() };
        assert!(!killed.success());
        assert_eq!(killed.status_text(), "signal");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_system_runner_captures_output() {
        let runner = SystemRunner;
        let out = runner
            .run("/bin/sh", &["-c".to_string(), "echo hi; echo err >&2; exit 3".to_string()])
            .await
            .unwrap();
        assert_eq!(out.code, Some(3));
        assert_eq!(out.stdout.trim(), "hi");
        assert_eq!(out.stderr.trim(), "err");
    }

    #[tokio::test]
    async fn test_system_runner_launch_error() {
        let runner = SystemRunner;
        let err = runner.run("/definitely/not/here", &[]).await.unwrap_err();
        assert!(matches!(err, ProcessError::Launch { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_is_available() {
        let runner = SystemRunner;
        assert!(runner.is_available("/bin/sh"));
        assert!(!runner.is_available("/definitely/not/here"));
        assert!(!runner.is_available("clipmark-no-such-binary"));
    }
}
