//! Running build and install commands.
//!
//! Commands are plain shell strings such as `npm ci`, executed through the
//! platform shell inside a working directory. Their output is echoed to the
//! operator's console line by line while it is produced and also captured in
//! the returned [`CommandOutput`]. Nothing in the pipeline parses it.

use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};
use std::thread;

use log::{debug, info};

use crate::error::{Error, Result};

/// Captured output of a finished command.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

/// Trait for command execution - allows mocking in tests
pub trait CommandRunner: Send + Sync {
    /// Runs `command` in `working_dir` and waits for it to finish.
    ///
    /// A non-zero exit is an error.
    fn run(&self, command: &str, working_dir: &Path) -> Result<CommandOutput>;
}

/// Runs commands through `sh -c` (or `cmd /C` on Windows).
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellCommandRunner;

impl ShellCommandRunner {
    fn shell_command(command: &str) -> Command {
        if cfg!(windows) {
            let mut cmd = Command::new("cmd");
            cmd.arg("/C").arg(command);
            cmd
        } else {
            let mut cmd = Command::new("sh");
            cmd.arg("-c").arg(command);
            cmd
        }
    }
}

impl CommandRunner for ShellCommandRunner {
    fn run(&self, command: &str, working_dir: &Path) -> Result<CommandOutput> {
        info!("$ {} (in {})", command, working_dir.display());

        let mut child = Self::shell_command(command)
            .current_dir(working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Error::CommandSpawn {
                command: command.to_string(),
                message: format!("{} (working directory: {})", e, working_dir.display()),
            })?;

        let stdout = child.stdout.take().ok_or_else(|| Error::CommandSpawn {
            command: command.to_string(),
            message: "stdout was not piped".to_string(),
        })?;
        let stderr = child.stderr.take().ok_or_else(|| Error::CommandSpawn {
            command: command.to_string(),
            message: "stderr was not piped".to_string(),
        })?;

        let stdout_handle = thread::spawn(move || tee_lines(stdout, io::stdout()));
        let stderr_handle = thread::spawn(move || tee_lines(stderr, io::stderr()));

        let status = child.wait()?;
        let stdout = join_output(stdout_handle)?;
        let stderr = join_output(stderr_handle)?;

        debug!("`{}` finished with {}", command, status);
        if !status.success() {
            return Err(Error::Build {
                command: command.to_string(),
                working_dir: working_dir.display().to_string(),
                status: status.to_string(),
            });
        }

        Ok(CommandOutput {
            status,
            stdout,
            stderr,
        })
    }
}

/// Copy every line of `reader` to `console` as it arrives and return all of it.
fn tee_lines<R: Read, W: Write>(reader: R, mut console: W) -> io::Result<String> {
    let mut captured = String::new();
    let mut reader = BufReader::new(reader);
    let mut line = Vec::new();

    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            break;
        }
        console.write_all(&line)?;
        console.flush()?;
        captured.push_str(&String::from_utf8_lossy(&line));
    }

    Ok(captured)
}

fn join_output(handle: thread::JoinHandle<io::Result<String>>) -> Result<String> {
    match handle.join() {
        Ok(result) => Ok(result?),
        Err(_) => Err(Error::Io(io::Error::other("output reader thread panicked"))),
    }
}
