//! Where the interface listing comes from
//!
//! The parser only sees lines. [`InterfaceSource`] hides whether those lines
//! come from running `ip a` or from a saved listing on disk.

use std::{
    fs::File,
    io::{self, BufRead, BufReader, Read},
    path::PathBuf,
    process::{Child, ChildStdout, Command, Stdio},
};

use crate::{
    cli::Cli,
    config::{AppConfig, ListingConfig},
    error::{IoContext, PickerError, Result},
    logging::TimingLogger,
    parser::{self, InterfaceRecord},
};

/// Produces the parsed interface table
pub trait InterfaceSource {
    /// Read the whole listing and parse it
    fn interfaces(&self) -> Result<Vec<InterfaceRecord>>;

    /// Human-readable origin of the listing, for messages
    fn describe(&self) -> String;
}

/// Pick the source for this run: `--input` wins over the configured command
pub fn create_source(config: &AppConfig, cli: &Cli) -> Box<dyn InterfaceSource> {
    match &cli.input {
        Some(path) => Box::new(FileSource::new(path.clone())),
        None => Box::new(CommandSource::new(config.listing.clone())),
    }
}

/// Runs the listing command and parses its stdout
pub struct CommandSource {
    listing: ListingConfig,
}

impl CommandSource {
    pub fn new(listing: ListingConfig) -> Self {
        Self { listing }
    }
}

impl InterfaceSource for CommandSource {
    fn interfaces(&self) -> Result<Vec<InterfaceRecord>> {
        let _timer = TimingLogger::start(format!("list interfaces with `{}`", self.describe()));

        let mut output = CommandLines::spawn(&self.listing)?;
        let records = parser::parse_reader(&mut output).with_operation("read command output")?;
        output.finish();

        Ok(records)
    }

    fn describe(&self) -> String {
        self.listing.command_line()
    }
}

/// Parses a listing saved to a file
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl InterfaceSource for FileSource {
    fn interfaces(&self) -> Result<Vec<InterfaceRecord>> {
        let file = File::open(&self.path)
            .map_err(|e| PickerError::command_unavailable(self.describe(), e.to_string()))?;
        tracing::debug!(path = %self.path.display(), "reading listing from file");

        parser::parse_reader(BufReader::new(file)).with_operation("read listing file")
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Stdout of a running listing command.
///
/// Owns the child process. Dropping it before [`CommandLines::finish`] kills
/// the child; either way the child is always waited for, so no zombie is left
/// behind on any exit path.
pub struct CommandLines {
    command: String,
    child: Child,
    stdout: BufReader<ChildStdout>,
}

impl CommandLines {
    pub fn spawn(listing: &ListingConfig) -> Result<Self> {
        let command = listing.command_line();
        tracing::debug!(command = %command, "spawning listing command");

        let mut child = Command::new(&listing.program)
            .args(&listing.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| PickerError::command_unavailable(&command, e.to_string()))?;

        let stdout = match child.stdout.take() {
            Some(stdout) => stdout,
            None => {
                reap(&mut child, true);
                return Err(PickerError::command_unavailable(&command, "stdout was not captured"));
            }
        };

        Ok(Self {
            command,
            child,
            stdout: BufReader::new(stdout),
        })
    }

    /// Wait for the command after its output has been consumed
    pub fn finish(mut self) {
        reap(&mut self.child, false);
        if let Ok(Some(status)) = self.child.try_wait() {
            if !status.success() {
                tracing::warn!(command = %self.command, %status, "listing command exited unsuccessfully");
            }
        }
    }
}

impl Read for CommandLines {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.stdout.read(buf)
    }
}

impl BufRead for CommandLines {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.stdout.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.stdout.consume(amt)
    }
}

impl Drop for CommandLines {
    fn drop(&mut self) {
        reap(&mut self.child, true);
    }
}

/// Wait for `child`, killing it first if `kill` is set and it is still running
fn reap(child: &mut Child, kill: bool) {
    if let Ok(Some(_)) = child.try_wait() {
        return;
    }
    if kill {
        if let Err(e) = child.kill() {
            tracing::debug!(error = %e, "failed to kill listing command");
        }
    }
    if let Err(e) = child.wait() {
        tracing::debug!(error = %e, "failed to wait for listing command");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::NO_ADDRESS;
    use std::io::Write;

    fn shell(script: &str) -> ListingConfig {
        ListingConfig {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), script.to_string()],
        }
    }

    #[test]
    fn test_command_source_parses_stdout() {
        let source = CommandSource::new(shell(
            "printf '1: lo: <LOOPBACK>\\n    inet 127.0.0.1/8 scope host lo\\n2: eth0: <UP>\\n'",
        ));
        let records = source.interfaces().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].address(), "127.0.0.1");
        assert_eq!(records[1].address(), NO_ADDRESS);
    }

    #[test]
    fn test_failing_command_still_yields_its_output() {
        let source = CommandSource::new(shell("printf '3: wlan0: <UP>\\n'; exit 3"));
        let records = source.interfaces().unwrap();
        assert_eq!(records, vec![InterfaceRecord::new("wlan0", None)]);
    }

    #[test]
    fn test_missing_program_is_command_unavailable() {
        let source = CommandSource::new(ListingConfig {
            program: "/nonexistent/ifacepicker-listing".to_string(),
            args: vec![],
        });
        let error = source.interfaces().unwrap_err();
        assert!(matches!(error, PickerError::CommandUnavailable { .. }));
        assert_eq!(error.exit_code(), 1);
    }

    #[test]
    fn test_dropping_unread_output_reaps_child() {
        let lines = CommandLines::spawn(&shell("yes '    link/ether'")).unwrap();
        drop(lines);
    }

    #[test]
    fn test_file_source() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "7: br0: <BROADCAST,UP>").unwrap();
        writeln!(file, "    inet 10.1.2.3/16 brd 10.1.255.255 scope global br0").unwrap();

        let source = FileSource::new(file.path().to_path_buf());
        let records = source.interfaces().unwrap();
        assert_eq!(records, vec![InterfaceRecord::new("br0", Some("10.1.2.3".into()))]);
        assert_eq!(source.describe(), file.path().display().to_string());
    }

    #[test]
    fn test_missing_file_is_command_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileSource::new(dir.path().join("listing.txt"));
        assert!(matches!(
            source.interfaces(),
            Err(PickerError::CommandUnavailable { .. })
        ));
    }
}
