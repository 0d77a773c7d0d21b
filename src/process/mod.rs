//! Run external programs
//!
//! [`ExternalCommand`] is a small builder around [`std::process::Command`]
//! that redirects stdin and stdout from and to files, runs inside a
//! working directory and turns a failed launch or an unsuccessful exit
//! status into a [`ProcessError`] that carries the captured stderr.
//!
//! ```rust
//! use genechunk::process::ExternalCommand;
//!
//! let output = ExternalCommand::new("echo").arg("hello").output().unwrap();
//! assert_eq!(output, "hello\n");
//!
//! assert!(ExternalCommand::new("false").run().is_err());
//! ```
use std::fmt;
use std::fs::File;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use log::debug;

use crate::utils::errors::ProcessError;

/// A single invocation of an external program
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExternalCommand {
    program: PathBuf,
    args: Vec<String>,
    stdin: Option<PathBuf>,
    stdout: Option<PathBuf>,
    workdir: Option<PathBuf>,
}

impl ExternalCommand {
    pub fn new<P: Into<PathBuf>>(program: P) -> Self {
        ExternalCommand {
            program: program.into(),
            args: Vec::new(),
            stdin: None,
            stdout: None,
            workdir: None,
        }
    }

    pub fn arg<S: Into<String>>(mut self, arg: S) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(|a| a.into()));
        self
    }

    /// Reads stdin of the program from `path`
    pub fn stdin_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.stdin = Some(path.into());
        self
    }

    /// Writes stdout of the program into `path`
    pub fn stdout_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.stdout = Some(path.into());
        self
    }

    pub fn workdir<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.workdir = Some(path.into());
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Runs the program and waits for it to finish
    ///
    /// The output file, if any, only contains valid output if this
    /// method returns `Ok`.
    pub fn run(&self) -> Result<(), ProcessError> {
        self.execute().map(|_| ())
    }

    /// Runs the program and returns its stdout
    ///
    /// Must not be combined with [`stdout_file`](ExternalCommand::stdout_file).
    pub fn output(&self) -> Result<String, ProcessError> {
        if self.stdout.is_some() {
            return Err(ProcessError::new(format!(
                "{}: stdout is redirected to a file",
                self
            )));
        }
        let output = self.execute()?;
        String::from_utf8(output.stdout)
            .map_err(|err| ProcessError::new(format!("{}: invalid UTF-8 output: {}", self, err)))
    }

    fn execute(&self) -> Result<Output, ProcessError> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).stderr(Stdio::piped());
        if let Some(dir) = &self.workdir {
            cmd.current_dir(dir);
        }
        match &self.stdin {
            Some(path) => {
                cmd.stdin(Stdio::from(self.open(path, File::open(path))?));
            }
            None => {
                cmd.stdin(Stdio::null());
            }
        }
        match &self.stdout {
            Some(path) => {
                cmd.stdout(Stdio::from(self.open(path, File::create(path))?));
            }
            None => {
                cmd.stdout(Stdio::piped());
            }
        }

        debug!("running {}", self);
        let output = cmd.output().map_err(|err| {
            if err.kind() == ErrorKind::NotFound {
                ProcessError::new(format!("{}: executable not found", self.program.display()))
            } else {
                ProcessError::new(format!("unable to run {}: {}", self, err))
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ProcessError::new(format!(
                "{} exited with {}: {}",
                self,
                output.status,
                stderr.trim()
            )));
        }
        Ok(output)
    }

    fn open(&self, path: &Path, file: std::io::Result<File>) -> Result<File, ProcessError> {
        file.map_err(|err| {
            ProcessError::new(format!("{}: unable to open {}: {}", self, path.display(), err))
        })
    }
}

impl fmt::Display for ExternalCommand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test_process {
    use super::*;

    #[test]
    fn test_display() {
        let cmd = ExternalCommand::new("augustus").args(["--UTR=1", "genome.fa"]);
        assert_eq!(cmd.to_string(), "augustus --UTR=1 genome.fa");
    }

    #[test]
    fn test_exit_status() {
        assert!(ExternalCommand::new("true").run().is_ok());
        let err = ExternalCommand::new("false").run().unwrap_err();
        assert!(err.message.starts_with("false exited with"));
    }

    #[test]
    fn test_missing_executable() {
        let err = ExternalCommand::new("genechunk-does-not-exist").run().unwrap_err();
        assert!(err.message.contains("not found"));
    }

    #[test]
    fn test_captures_stderr() {
        let err = ExternalCommand::new("sh")
            .args(["-c", "echo broken >&2; exit 3"])
            .run()
            .unwrap_err();
        assert!(err.message.ends_with(": broken"));
    }

    #[test]
    fn test_redirection() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.txt");
        let output = dir.path().join("out.txt");
        std::fs::write(&input, "b\na\n").unwrap();
        ExternalCommand::new("sort")
            .stdin_file(&input)
            .stdout_file(&output)
            .run()
            .unwrap();
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "a\nb\n");
    }

    #[test]
    fn test_workdir() {
        let dir = tempfile::tempdir().unwrap();
        ExternalCommand::new("sh")
            .args(["-c", "echo x > created.txt"])
            .workdir(dir.path())
            .run()
            .unwrap();
        assert!(dir.path().join("created.txt").exists());
    }

    #[test]
    fn test_output_with_redirect_fails() {
        let cmd = ExternalCommand::new("echo").stdout_file("/dev/null");
        assert!(cmd.output().is_err());
    }
}
