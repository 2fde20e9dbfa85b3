use crate::domain::errors::RefreshError;
use crate::domain::models::RefreshOutcome;
use crossterm::{
    ExecutableCommand,
    style::{Color, ResetColor, SetForegroundColor},
};
use log::{debug, info};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub trait OutputWriter {
    fn write(&self, content: &str) -> anyhow::Result<()>;
}

/// Overwrites a file in place. Every failure is fatal, a missing parent
/// directory included.
pub struct FileWriter {
    path: PathBuf,
}

impl FileWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl OutputWriter for FileWriter {
    fn write(&self, content: &str) -> anyhow::Result<()> {
        debug!("Writing output to file: {}", self.path.display());
        fs::write(&self.path, content).map_err(|source| RefreshError::WriteFailed {
            path: self.path.clone(),
            source,
        })?;
        info!("Output written to file: {}", self.path.display());
        Ok(())
    }
}

pub struct ConsoleWriter;

impl OutputWriter for ConsoleWriter {
    fn write(&self, content: &str) -> anyhow::Result<()> {
        debug!("Writing output to console");
        let mut stdout = io::stdout().lock();
        stdout.write_all(content.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}

pub fn create_writer(output_path: Option<&Path>) -> Box<dyn OutputWriter> {
    match output_path {
        Some(path) => Box::new(FileWriter::new(path)),
        None => Box::new(ConsoleWriter),
    }
}

/// Prints a coloured one-line status after a run.
pub fn print_status(outcome: &RefreshOutcome, readme: &Path) -> anyhow::Result<()> {
    let mut stdout = io::stdout();
    let (color, message) = match outcome {
        RefreshOutcome::Updated { bytes } => (
            Color::Green,
            format!("✓ {} has been updated ({} bytes)", readme.display(), bytes),
        ),
        RefreshOutcome::UpToDate => (
            Color::Cyan,
            format!("✓ {} is already up-to-date", readme.display()),
        ),
    };

    stdout.execute(SetForegroundColor(color))?;
    writeln!(stdout, "{}", message)?;
    stdout.execute(ResetColor)?;
    Ok(())
}
