//! Thin wrappers around the desktop tools used to size and set the wallpaper.

pub mod error;
pub mod screen;
pub mod wallpaper;

use crate::desktop::error::DesktopError;
use log::debug;
use std::process::{Command, Output};

/// Runs `tool` with `args` to completion, capturing stdout and stderr.
pub(crate) fn run_tool(tool: &'static str, args: &[&str]) -> Result<Output, DesktopError> {
    debug!("Running {} {}", tool, args.join(" "));
    Command::new(tool)
        .args(args)
        .output()
        .map_err(|source| DesktopError::Spawn { tool, source })
}
