//! Output directory resolution.
//!
//! Clips land next to the source file unless the user enabled a custom
//! directory. Custom templates go through the login shell so `~`, `$VARS`
//! and globs expand the way the user expects; any expansion problem falls
//! back to the source directory instead of failing the export.

use std::path::{Path, PathBuf};
use crate::core::ClipRequest;
use crate::prefs::PreferenceSnapshot;
use crate::process::{CommandRunner, ProcessError};

/// Shell used for template expansion
#[cfg(target_os = "macos")]
pub const EXPAND_SHELL: &str = "/bin/zsh";
#[cfg(not(target_os = "macos"))]
pub const EXPAND_SHELL: &str = "/bin/sh";

/// Recursive directory creation helper
pub const MKDIR: &str = "/bin/mkdir";

/// Error type for path operations
#[derive(Debug, thiserror::Error)]
pub enum PathError {
    #[error(transparent)]
    Process(#[from] ProcessError),
    #[error("Template expanded to nothing")]
    EmptyExpansion,
    #[error("Template expanded to a relative path: {0:?}")]
    NotAbsolute(PathBuf),
}

/// Expand a directory template through the shell (`echo <template>`)
pub async fn expand_template(runner: &dyn CommandRunner, template: &str) -> Result<PathBuf, PathError> {
    let args = vec!["-lc".to_string(), format!("echo {}", template.trim())];
    let output = runner.run(EXPAND_SHELL, &args).await?.check(EXPAND_SHELL)?;

    let expanded = output.stdout.trim();
    if expanded.is_empty() {
        return Err(PathError::EmptyExpansion);
    }
    let path = PathBuf::from(expanded);
    if !path.is_absolute() {
        return Err(PathError::NotAbsolute(path));
    }
    Ok(path)
}

/// Directory the clip should be written to
pub async fn resolve_output_dir(
    runner: &dyn CommandRunner,
    request: &ClipRequest,
    prefs: &PreferenceSnapshot,
) -> PathBuf {
    let source_dir = request.source_dir();

    let Some(template) = prefs.custom_dir_template() else {
        return source_dir;
    };

    match expand_template(runner, template).await {
        Ok(dir) => {
            log::debug!("Custom output dir {:?} -> {:?}", template, dir);
            dir
        }
        Err(e) => {
            log::warn!(
                "Could not expand output dir {:?} ({}), using {:?}",
                template,
                e,
                source_dir
            );
            source_dir
        }
    }
}

/// Create `dir` and any missing parents
pub async fn ensure_dir(runner: &dyn CommandRunner, dir: &Path) -> Result<(), PathError> {
    if dir.as_os_str().is_empty() {
        return Ok(());
    }
    let args = vec!["-p".to_string(), dir.to_string_lossy().into_owned()];
    runner.run(MKDIR, &args).await?.check(MKDIR)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::testing::FakeRunner;
    use crate::process::ProcessOutput;

    fn request() -> ClipRequest {
        ClipRequest::new(10.0, 15.0, "/movies/My Clip.mkv", "My Clip.mkv").unwrap()
    }

    fn custom(dir: &str) -> PreferenceSnapshot {
        PreferenceSnapshot {
            use_custom_dir: true,
            custom_dir: dir.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_default_is_source_dir() {
        let runner = FakeRunner::new();
        let dir = resolve_output_dir(&runner, &request(), &PreferenceSnapshot::default()).await;
        assert_eq!(dir, PathBuf::from("/movies"));
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_blank_template_is_ignored() {
        let runner = FakeRunner::new();
        let dir = resolve_output_dir(&runner, &request(), &custom("  ")).await;
        assert_eq!(dir, PathBuf::from("/movies"));
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_custom_dir_expanded() {
        let runner = FakeRunner::new().respond(
            EXPAND_SHELL,
            ProcessOutput { code: Some(0), stdout: "/Users/me/Clips\n".into(), stderr: String::new() },
        );
        let dir = resolve_output_dir(&runner, &request(), &custom(" ~/Clips ")).await;
        assert_eq!(dir, PathBuf::from("/Users/me/Clips"));

        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, EXPAND_SHELL);
        assert_eq!(calls[0].1, vec!["-lc".to_string(), "echo ~/Clips".to_string()]);
    }

    #[tokio::test]
    async fn test_expansion_failures_fall_back() {
        let failing = FakeRunner::new().respond(
            EXPAND_SHELL,
            ProcessOutput { code: Some(1), stdout: String::new(), stderr: "bad substitution".into() },
        );
        assert_eq!(resolve_output_dir(&failing, &request(), &custom("${x")).await, PathBuf::from("/movies"));

        let empty = FakeRunner::new().respond(
            EXPAND_SHELL,
            ProcessOutput { code: Some(0), stdout: "\n".into(), stderr: String::new() },
        );
        assert_eq!(resolve_output_dir(&empty, &request(), &custom("$UNSET")).await, PathBuf::from("/movies"));

        let relative = FakeRunner::new().respond(
            EXPAND_SHELL,
            ProcessOutput { code: Some(0), stdout: "clips\n".into(), stderr: String::new() },
        );
        assert_eq!(resolve_output_dir(&relative, &request(), &custom("clips")).await, PathBuf::from("/movies"));

        let missing_shell = FakeRunner::new().fail_launch(EXPAND_SHELL);
        assert_eq!(resolve_output_dir(&missing_shell, &request(), &custom("~/x")).await, PathBuf::from("/movies"));
    }

    #[tokio::test]
    async fn test_ensure_dir() {
        let runner = FakeRunner::new();
        ensure_dir(&runner, Path::new("/srv/clips/new")).await.unwrap();
        assert_eq!(runner.calls()[0].1, vec!["-p".to_string(), "/srv/clips/new".to_string()]);

        let failing = FakeRunner::new().respond(
            MKDIR,
            ProcessOutput { code: Some(1), stdout: String::new(), stderr: "Permission denied".into() },
        );
        let err = ensure_dir(&failing, Path::new("/root/nope")).await.unwrap_err();
        assert!(err.to_string().contains("Permission denied"));

        let untouched = FakeRunner::new();
        ensure_dir(&untouched, Path::new("")).await.unwrap();
        assert!(untouched.calls().is_empty());
    }
}
