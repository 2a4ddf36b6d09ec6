//! Typed capture, streaming and control library for V4L2 video devices.
//!
//! The entry point is [`Device`]: open a `/dev/video*` node, inspect its [`Info`] snapshot,
//! tune its [`Controls`], and capture frames through a memory-mapped
//! [`CaptureStream`][stream::CaptureStream] — blocking, readiness-gated or via the async
//! readers in [`reader`].

#[macro_use]
mod macros;
mod buf_type;
mod device;
mod error;
mod frame;
mod info;
mod pixel_format;
mod raw;
mod shared;

pub mod config;
pub mod controls;
pub mod events;
pub mod format;
pub mod io;
pub mod reader;
pub mod stream;

use std::fs;
use std::path::{Path, PathBuf};

pub use buf_type::{BufType, BufTypes};
pub use config::ConfigManager;
pub use controls::{Cid, Control, ControlDesc, ControlValue, Controls, CtrlClass};
pub use device::{Device, DeviceGuard};
pub use error::{Error, Result};
pub use events::Event;
pub use format::Format;
pub use frame::{Frame, Timecode};
pub use info::{CropCapability, FrameType, ImageFormat, Info, InputInfo, KernelVersion, Rect};
pub use pixel_format::PixelFormat;
pub use shared::*;

/// Returns the paths of all `/dev/video*` nodes, in sorted order.
pub fn iter_video_files() -> Result<impl Iterator<Item = PathBuf>> {
    let mut paths: Vec<PathBuf> = fs::read_dir("/dev")?
        .filter_map(|entry| {
            let entry = entry.ok()?;
            let name = entry.file_name();
            let name = name.to_str()?;
            let digits = name.strip_prefix("video")?;
            (!digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
                .then(|| entry.path())
        })
        .collect();
    paths.sort();
    Ok(paths.into_iter())
}

/// Returns a closed [`Device`] for every `/dev/video*` node, in sorted order.
pub fn iter_devices() -> Result<impl Iterator<Item = Device>> {
    Ok(iter_video_files()?.map(Device::new))
}

/// Returns the paths of the video nodes that advertise the `VIDEO_CAPTURE` capability.
///
/// Each node is briefly opened to inspect its capabilities; nodes that cannot be opened or
/// probed are skipped with a debug log entry.
pub fn iter_video_capture_files() -> Result<impl Iterator<Item = PathBuf>> {
    Ok(iter_video_files()?.filter(|path| {
        let device = Device::new(path);
        match device.acquire().and_then(|_guard| device.info()) {
            Ok(info) => info
                .device_capabilities
                .contains(CapabilityFlags::VIDEO_CAPTURE),
            Err(e) => {
                log::debug!("skipping {}: {}", path.display(), e);
                false
            }
        }
    }))
}

/// Returns a closed [`Device`] for every capture-capable video node.
pub fn iter_video_capture_devices() -> Result<impl Iterator<Item = Device>> {
    Ok(iter_video_capture_files()?.map(Device::new))
}

/// Extracts the trailing device number from a video node path.
///
/// `/dev/video5` → `Some(5)`; paths without trailing digits → `None`.
pub fn device_number(path: impl AsRef<Path>) -> Option<u32> {
    let name = path.as_ref().file_name()?.to_str()?;
    let digits: String = name
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_digit())
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    digits.parse().ok()
}

/// Turns a zero-padded byte array containing UTF-8 or ASCII data into a `&str`.
pub(crate) fn byte_array_to_str(bytes: &[u8]) -> &str {
    let len = bytes.iter().position(|b| *b == 0).unwrap_or(bytes.len());
    std::str::from_utf8(&bytes[..len]).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_numbers() {
        assert_eq!(device_number("/dev/video0"), Some(0));
        assert_eq!(device_number("/dev/video1"), Some(1));
        assert_eq!(device_number("/dev/video999"), Some(999));
        assert_eq!(device_number("video42"), Some(42));
        assert_eq!(device_number("/dev/video"), None);
        assert_eq!(device_number("/dev/null"), None);
    }

    #[test]
    fn byte_arrays() {
        assert_eq!(byte_array_to_str(b"mock\0\0\0"), "mock");
        assert_eq!(byte_array_to_str(b"no nul"), "no nul");
        assert_eq!(byte_array_to_str(b"\0rest ignored"), "");
    }
}
