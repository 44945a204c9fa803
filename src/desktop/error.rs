use std::process::ExitStatus;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DesktopError {
    #[error("Failed to run '{tool}'")]
    Spawn {
        tool: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("'{tool}' exited with {status}: {stderr}")]
    ToolFailed {
        tool: &'static str,
        status: ExitStatus,
        stderr: String,
    },

    #[error("'{tool}' reported: {stderr}")]
    ToolReported { tool: &'static str, stderr: String },

    #[error("No active display mode in xrandr output")]
    NoActiveMode,

    #[error("Malformed screen resolution '{0}'")]
    MalformedResolution(String),

    #[error("Malformed wallpaper URI '{0}'")]
    MalformedWallpaperUri(String),
}
