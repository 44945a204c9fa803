use crate::desktop::error::DesktopError;
use crate::desktop::run_tool;
use std::path::{Path, PathBuf};

const GSETTINGS: &str = "gsettings";
const BACKGROUND_SCHEMA: &str = "org.gnome.desktop.background";
const PICTURE_URI_KEY: &str = "picture-uri";
/// gsettings prints the key as a quoted GVariant string: `'file:///path'`.
const URI_PREFIX: &str = "'file://";
const URI_SUFFIX: char = '\'';

pub trait WallpaperManager {
    /// Path of the image currently used as wallpaper.
    fn current(&self) -> Result<PathBuf, DesktopError>;

    /// Makes `path` the wallpaper. Text the tool writes to stderr is an error.
    fn set(&self, path: &Path) -> Result<(), DesktopError>;
}

/// GNOME wallpaper access through `gsettings`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Gsettings;

impl WallpaperManager for Gsettings {
    fn current(&self) -> Result<PathBuf, DesktopError> {
        let output = run_tool(GSETTINGS, &["get", BACKGROUND_SCHEMA, PICTURE_URI_KEY])?;
        if !output.status.success() {
            return Err(DesktopError::ToolFailed {
                tool: GSETTINGS,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        parse_picture_uri(&String::from_utf8_lossy(&output.stdout))
    }

    fn set(&self, path: &Path) -> Result<(), DesktopError> {
        let value = picture_uri_value(path);
        let output = run_tool(GSETTINGS, &["set", BACKGROUND_SCHEMA, PICTURE_URI_KEY, &value])?;
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if !stderr.is_empty() {
            return Err(DesktopError::ToolReported {
                tool: GSETTINGS,
                stderr,
            });
        }
        if !output.status.success() {
            return Err(DesktopError::ToolFailed {
                tool: GSETTINGS,
                status: output.status,
                stderr,
            });
        }
        Ok(())
    }
}

/// Strips the quoted `file://` scheme from a `gsettings get` reply.
pub fn parse_picture_uri(gsettings_output: &str) -> Result<PathBuf, DesktopError> {
    let value = gsettings_output.trim_end_matches(['\n', '\r']);
    value
        .strip_prefix(URI_PREFIX)
        .and_then(|rest| rest.strip_suffix(URI_SUFFIX))
        .map(PathBuf::from)
        .ok_or_else(|| DesktopError::MalformedWallpaperUri(value.to_string()))
}

/// GVariant string literal for `path` as a `file://` URI.
pub fn picture_uri_value(path: &Path) -> String {
    format!("{}{}{}", URI_PREFIX, path.display(), URI_SUFFIX)
}
