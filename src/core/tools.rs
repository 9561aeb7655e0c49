use crate::types::SynthTool;
use std::{
    env,
    ffi::OsString,
    path::{Path, PathBuf},
};

/// A synthesis tool found on the search path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DetectedTool {
    pub tool: SynthTool,
    pub program: PathBuf,
}

/// Resolves executables against a `PATH`-style list of directories.
#[derive(Clone, Debug, Default)]
pub struct ToolLocator {
    search_path: Option<OsString>,
}

impl ToolLocator {
    pub fn from_env() -> Self {
        Self {
            search_path: env::var_os("PATH"),
        }
    }

    pub fn with_search_path(search_path: impl Into<OsString>) -> Self {
        Self {
            search_path: Some(search_path.into()),
        }
    }

    pub fn locate(&self, tool: &str) -> Option<PathBuf> {
        let path_var = self.search_path.as_ref()?;
        for dir in env::split_paths(path_var) {
            if dir.as_os_str().is_empty() {
                continue;
            }
            let full = dir.join(tool);
            if is_executable(&full) {
                return Some(full);
            }
            #[cfg(windows)]
            {
                let exe = dir.join(format!("{tool}.exe"));
                if is_executable(&exe) {
                    return Some(exe);
                }
            }
        }
        None
    }

    pub fn is_available(&self, tool: &str) -> bool {
        self.locate(tool).is_some()
    }

    /// First tool of [`SynthTool::PRIORITY`] that resolves.
    pub fn detect_synth_tool(&self) -> Option<DetectedTool> {
        SynthTool::PRIORITY.iter().find_map(|&tool| {
            let program = self.locate(tool.binary())?;
            tracing::debug!(tool = %tool, program = %program.display(), "found synthesis tool");
            Some(DetectedTool { tool, program })
        })
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
