#![allow(dead_code)]

use notification_sound::{CommandRunner, CommandStatus, ToolCommand};
use std::{
    fs, io,
    path::Path,
    sync::{Arc, Mutex},
};

/// Records every command and fakes its output file instead of spawning.
#[derive(Clone, Default)]
pub struct RecordingRunner {
    pub calls: Arc<Mutex<Vec<ToolCommand>>>,
    pub fail_at: Option<usize>,
    pub skip_output_at: Option<usize>,
    pub spawn_error: bool,
}

impl RecordingRunner {
    pub fn failing_at(step: usize) -> Self {
        Self {
            fail_at: Some(step),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<ToolCommand> {
        self.calls.lock().unwrap().clone()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, cmd: &ToolCommand) -> io::Result<CommandStatus> {
        if self.spawn_error {
            return Err(io::Error::new(io::ErrorKind::NotFound, "no such program"));
        }
        let mut calls = self.calls.lock().unwrap();
        let idx = calls.len();
        calls.push(cmd.clone());

        if self.fail_at == Some(idx) {
            return Ok(CommandStatus::failed(2, "synthetic failure"));
        }
        if self.skip_output_at != Some(idx) {
            fs::write(&cmd.output, format!("step {idx}"))?;
        }
        Ok(CommandStatus::ok())
    }
}

#[cfg(unix)]
pub fn make_executable(dir: &Path, name: &str) {
    use std::os::unix::fs::PermissionsExt;

    let p = dir.join(name);
    fs::write(&p, "#!/bin/sh\nexit 0\n").unwrap();
    fs::set_permissions(&p, fs::Permissions::from_mode(0o755)).unwrap();
}

pub fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
