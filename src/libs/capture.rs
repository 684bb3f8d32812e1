//! Screen capture.
//!
//! [`ScreenGrabber`] is the seam between the capture scheduler and the
//! platform: production code uses [`NativeGrabber`], which shells out to the
//! platform screenshot tool, while tests substitute an in-memory grabber.

use crate::libs::messages::Message;
use crate::msg_bail_anyhow;
use anyhow::Result;
use chrono::{Local, NaiveDateTime};
use std::path::Path;
use std::process::Command;

/// One captured frame, PNG-encoded.
#[derive(Debug, Clone)]
pub struct Capture {
    pub image: Vec<u8>,
    pub captured_at: NaiveDateTime,
    /// Whether the OS granted screen-recording permission for this capture.
    pub permission_granted: bool,
}

pub trait ScreenGrabber {
    /// Captures the primary screen as PNG bytes.
    fn grab(&self) -> Result<Capture>;
}

/// Captures via the platform screenshot tool into a temporary file.
pub struct NativeGrabber;

impl NativeGrabber {
    fn read_capture(path: &Path) -> Result<Capture> {
        let image = std::fs::read(path)?;
        if image.is_empty() {
            msg_bail_anyhow!(Message::CaptureEmptyImage);
        }
        Ok(Capture {
            image,
            captured_at: Local::now().naive_local(),
            permission_granted: true,
        })
    }

    #[cfg(target_os = "macos")]
    fn grab_native(path: &Path) -> Result<std::process::ExitStatus> {
        // -x suppresses the shutter sound.
        Ok(Command::new("screencapture").arg("-x").arg(path).status()?)
    }

    #[cfg(target_os = "linux")]
    fn grab_native(path: &Path) -> Result<std::process::ExitStatus> {
        let gnome = Command::new("gnome-screenshot").arg("-f").arg(path).status();
        match gnome {
            Ok(status) if status.success() => Ok(status),
            // ImageMagick as fallback for non-GNOME sessions.
            _ => Ok(Command::new("import").arg("-window").arg("root").arg(path).status()?),
        }
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux")))]
    fn grab_native(_path: &Path) -> Result<std::process::ExitStatus> {
        msg_bail_anyhow!(Message::CaptureUnsupportedPlatform);
    }
}

impl ScreenGrabber for NativeGrabber {
    fn grab(&self) -> Result<Capture> {
        let path = std::env::temp_dir().join(format!(
            "timecap_{}_{}.png",
            std::process::id(),
            Local::now().format("%Y%m%d%H%M%S%3f")
        ));
        let status = Self::grab_native(&path)?;
        if !status.success() {
            let _ = std::fs::remove_file(&path);
            msg_bail_anyhow!(Message::CaptureToolFailed(status.code().unwrap_or(-1)));
        }
        let capture = Self::read_capture(&path);
        let _ = std::fs::remove_file(&path);
        capture
    }
}
