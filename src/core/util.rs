use winsys::Result;

use std::os::unix::process::CommandExt;
use std::process::Command;
use std::process::Stdio;

use nix::sys::signal::signal;
use nix::sys::signal::SigHandler;
use nix::sys::signal::Signal;
use nix::unistd::setsid;

pub struct Util;

impl Util {
    /// Launches `argv` detached from the window manager: a new session,
    /// no shared standard input or output, and a default SIGCHLD
    /// disposition. The child is never waited on.
    pub fn spawn(argv: &[&str]) {
        let (program, args) = match argv.split_first() {
            Some(split) => split,
            None => return,
        };

        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit());

        unsafe {
            command.pre_exec(|| {
                drop(signal(Signal::SIGCHLD, SigHandler::SigDfl));
                drop(setsid());
                Ok(())
            });
        }

        match command.spawn() {
            Ok(child) => debug!("spawned {} with pid {}", program, child.id()),
            Err(err) => warn!("unable to spawn {}: {}", program, err),
        }
    }

    /// Lets the kernel reap spawned children so their exit never reaches
    /// the event loop.
    pub fn ignore_child_exit() -> Result<()> {
        unsafe {
            signal(Signal::SIGCHLD, SigHandler::SigIgn)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_command_is_ignored() {
        Util::spawn(&[]);
    }

    #[test]
    fn missing_program_does_not_panic() {
        Util::spawn(&["hest-test-program-that-does-not-exist", "--flag"]);
    }
}
