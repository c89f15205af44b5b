//! HTML → PDF conversion by driving a headless Chrome/Chromium.
//!
//! The browser is invoked once per build with a fixed argument list:
//!
//! ```text
//! <browser> --headless --disable-gpu --print-to-pdf=<pdf> --no-margins file://<html>
//! ```
//!
//! A browser that starts but exits unsuccessfully does not fail the build; the
//! outcome is returned as a [`ConversionReport`] and logged as a warning.

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Serialize;

use crate::error::{BuildError, Result};

/// Browser location on NixOS-style systems, tried before searching `PATH`.
pub const DEFAULT_BROWSER: &str = "/run/current-system/sw/bin/google-chrome-stable";

/// Executable names searched on `PATH`, in order.
pub const BROWSER_CANDIDATES: &[&str] = &[
    "google-chrome-stable",
    "google-chrome",
    "chromium",
    "chromium-browser",
];

/// How the converter process finished.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionReport {
    pub success: bool,
    /// `None` when the process was killed by a signal.
    pub exit_code: Option<i32>,
    pub stderr: String,
}

/// Converts an HTML file on disk into a PDF file.
pub trait Converter {
    fn convert(&self, html: &Path, pdf: &Path) -> Result<ConversionReport>;
}

/// Headless Chrome/Chromium print-to-PDF.
#[derive(Debug, Clone)]
pub struct ChromeConverter {
    binary: PathBuf,
}

impl ChromeConverter {
    /// Use `binary` without any lookup.
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Find a browser: `explicit` (a path or a name on `PATH`) if given,
    /// otherwise [`DEFAULT_BROWSER`], otherwise the first of
    /// [`BROWSER_CANDIDATES`] on `PATH`.
    pub fn locate(explicit: Option<&Path>) -> Result<Self> {
        if let Some(explicit) = explicit {
            return which::which(explicit)
                .map(Self::new)
                .map_err(|_| BuildError::BrowserNotFound(explicit.display().to_string()));
        }

        if Path::new(DEFAULT_BROWSER).is_file() {
            return Ok(Self::new(DEFAULT_BROWSER));
        }

        for name in BROWSER_CANDIDATES {
            if let Ok(path) = which::which(name) {
                log::debug!("using browser {}", path.display());
                return Ok(Self::new(path));
            }
        }

        let mut searched = vec![DEFAULT_BROWSER];
        searched.extend_from_slice(BROWSER_CANDIDATES);
        Err(BuildError::BrowserNotFound(searched.join(", ")))
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Browser arguments for printing `html` to `pdf`.
    pub fn arguments(html: &Path, pdf: &Path) -> Result<Vec<OsString>> {
        let mut print_to = OsString::from("--print-to-pdf=");
        print_to.push(pdf);

        Ok(vec![
            OsString::from("--headless"),
            OsString::from("--disable-gpu"),
            print_to,
            OsString::from("--no-margins"),
            file_url(html)?,
        ])
    }

    /// The full command, ready to spawn.
    pub fn command(&self, html: &Path, pdf: &Path) -> Result<Command> {
        let mut cmd = Command::new(&self.binary);
        cmd.args(Self::arguments(html, pdf)?);
        Ok(cmd)
    }
}

impl Converter for ChromeConverter {
    fn convert(&self, html: &Path, pdf: &Path) -> Result<ConversionReport> {
        log::debug!("converting {} with {}", html.display(), self.binary.display());
        let output = self
            .command(html, pdf)?
            .output()
            .map_err(|source| BuildError::Convert {
                binary: self.binary.clone(),
                source,
            })?;

        let report = ConversionReport {
            success: output.status.success(),
            exit_code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if !report.stderr.is_empty() {
            log::debug!("browser stderr:\n{}", report.stderr.trim_end());
        }
        if !report.success {
            log::warn!(
                "{} exited with {}; {} may be missing or incomplete",
                self.binary.display(),
                output.status,
                pdf.display()
            );
        } else if !pdf.exists() {
            log::warn!("browser reported success but {} was not written", pdf.display());
        } else {
            log::info!("PDF saved to {}", pdf.display());
        }

        Ok(report)
    }
}

/// `file://` URL for `path`, made absolute against the working directory.
fn file_url(path: &Path) -> Result<OsString> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        let cwd = env::current_dir().map_err(|e| BuildError::io(path, e))?;
        cwd.join(path)
    };
    let mut url = OsString::from("file://");
    url.push(absolute);
    Ok(url)
}
