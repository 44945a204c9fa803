use crate::desktop::error::DesktopError;
use crate::desktop::run_tool;
use std::fmt;

const XRANDR: &str = "xrandr";
/// xrandr marks the mode currently in use with an asterisk.
const ACTIVE_MODE_MARKER: char = '*';

/// Screen size as reported by the display server, e.g. `1920` × `1080`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenResolution {
    pub width: String,
    pub height: String,
}

impl fmt::Display for ScreenResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

pub trait ScreenQuery {
    fn resolution(&self) -> Result<ScreenResolution, DesktopError>;
}

/// Queries the active mode through `xrandr`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Xrandr;

impl ScreenQuery for Xrandr {
    fn resolution(&self) -> Result<ScreenResolution, DesktopError> {
        let output = run_tool(XRANDR, &[])?;
        if !output.status.success() {
            return Err(DesktopError::ToolFailed {
                tool: XRANDR,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        parse_resolution(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Reads the resolution from the first token of the first line holding the
/// active-mode marker, e.g. `   1920x1080     60.00*+`.
pub fn parse_resolution(xrandr_output: &str) -> Result<ScreenResolution, DesktopError> {
    let token = xrandr_output
        .lines()
        .find(|line| line.contains(ACTIVE_MODE_MARKER))
        .and_then(|line| line.split_whitespace().next())
        .ok_or(DesktopError::NoActiveMode)?;

    match token.split_once('x') {
        Some((width, height)) if !width.is_empty() && !height.is_empty() => {
            Ok(ScreenResolution {
                width: width.to_string(),
                height: height.to_string(),
            })
        }
        _ => Err(DesktopError::MalformedResolution(token.to_string())),
    }
}
