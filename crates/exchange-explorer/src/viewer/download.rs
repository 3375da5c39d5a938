//! Download of the rendered diagram as an SVG file

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::core::Result;

/// MIME type of the downloaded file
pub const SVG_MIME: &str = "image/svg+xml";

/// A file ready to be saved by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvgDownload {
    /// `<exchangeName>.svg`
    pub file_name: String,
    pub mime_type: &'static str,
    pub contents: String,
}

impl SvgDownload {
    pub fn new(exchange: &str, markup: &str) -> Self {
        Self {
            file_name: format!("{}.svg", exchange),
            mime_type: SVG_MIME,
            contents: markup.to_string(),
        }
    }

    /// Write the file into `dir`, returning the full path
    pub fn save_in(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(&self.file_name);
        self.save_as(&path)?;
        Ok(path)
    }

    /// Write the file to an explicit path
    pub fn save_as(&self, path: &Path) -> Result<()> {
        fs::write(path, &self.contents)?;
        info!(path = %path.display(), bytes = self.contents.len(), "Saved SVG download");
        Ok(())
    }
}
