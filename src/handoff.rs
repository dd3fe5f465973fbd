//! Handing control to the installed toolchain
//!
//! Where the OS can replace the running process image, the launcher simply
//! becomes the toolchain. Elsewhere it spawns the toolchain, waits for it
//! and mirrors its exit status. Either way the full argument vector,
//! including argv[0], is forwarded untouched.

use crate::error::{LauncherError, LauncherResult};
use std::ffi::OsString;
use std::io;
use std::path::Path;
use std::process::{Command, ExitStatus};
use tracing::debug;

/// How control is transferred to the toolchain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handoff {
    /// Replace the current process image (unix `execv`)
    Replace,
    /// Spawn a child, wait for it and return its exit code
    SpawnAndWait,
}

impl Handoff {
    /// The strategy the current target supports
    pub fn native() -> Self {
        if cfg!(unix) {
            Handoff::Replace
        } else {
            Handoff::SpawnAndWait
        }
    }

    /// Run `program` with `args` (`args[0]` is the original argv[0]).
    ///
    /// `Replace` only returns if the replacement could not be started.
    /// `SpawnAndWait` returns the child's exit code.
    pub fn launch(self, program: &Path, args: &[OsString]) -> LauncherResult<i32> {
        debug!("Handing off to {} via {:?}", program.display(), self);
        match self {
            Handoff::Replace => replace(program, args),
            Handoff::SpawnAndWait => spawn_and_wait(program, args),
        }
    }
}

fn command(program: &Path, args: &[OsString]) -> Command {
    let mut cmd = Command::new(program);
    if let Some((arg0, rest)) = args.split_first() {
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.arg0(arg0);
        }
        #[cfg(not(unix))]
        let _ = arg0;
        cmd.args(rest);
    }
    cmd
}

#[cfg(unix)]
fn replace(program: &Path, args: &[OsString]) -> LauncherResult<i32> {
    use std::os::unix::process::CommandExt;

    let err = command(program, args).exec();
    Err(LauncherError::launch(program, err))
}

#[cfg(not(unix))]
fn replace(program: &Path, args: &[OsString]) -> LauncherResult<i32> {
    spawn_and_wait(program, args)
}

fn spawn_and_wait(program: &Path, args: &[OsString]) -> LauncherResult<i32> {
    let mut child = command(program, args)
        .spawn()
        .map_err(|e| LauncherError::launch(program, e))?;

    let status = loop {
        match child.wait() {
            Ok(status) => break status,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                return Err(LauncherError::AbnormalChildTermination {
                    program: program.to_path_buf(),
                    detail: format!("waiting for child failed: {e}"),
                })
            }
        }
    };

    status
        .code()
        .ok_or_else(|| LauncherError::AbnormalChildTermination {
            program: program.to_path_buf(),
            detail: describe_abnormal(&status),
        })
}

#[cfg(unix)]
fn describe_abnormal(status: &ExitStatus) -> String {
    use std::os::unix::process::ExitStatusExt;

    match status.signal() {
        Some(signal) => format!("killed by signal {signal}"),
        None => status.to_string(),
    }
}

#[cfg(not(unix))]
fn describe_abnormal(status: &ExitStatus) -> String {
    status.to_string()
}
