//! Device capability and format discovery.
//!
//! [`Info`] is an immutable snapshot taken while the device is open. Reading it repeatedly
//! against an unchanging device produces equal records.

use std::fmt;
use std::mem;
use std::os::unix::prelude::RawFd;

use nix::errno::Errno;

use crate::buf_type::{BufType, BufTypes};
use crate::byte_array_to_str;
use crate::controls::ControlDesc;
use crate::format::{FrameIntervals, FrameSizes, Fract};
use crate::pixel_format::PixelFormat;
use crate::raw;
use crate::shared::*;
use crate::Result;

pub use crate::raw::Rect;

/// Kernel version advertised by the driver, as a `(major, minor, patch)` triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KernelVersion(pub u16, pub u16, pub u16);

impl KernelVersion {
    fn from_raw(version: u32) -> Self {
        Self(
            ((version >> 16) & 0xFF) as u16,
            ((version >> 8) & 0xFF) as u16,
            (version & 0xFF) as u16,
        )
    }
}

impl fmt::Display for KernelVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.0, self.1, self.2)
    }
}

/// An image format supported by one of the device's streams.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFormat {
    pub buf_type: BufType,
    pub description: String,
    pub flags: FmtFlags,
    pub pixel_format: PixelFormat,
}

/// A discrete frame size with the rates the device supports for it.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameType {
    pub buf_type: BufType,
    pub pixel_format: PixelFormat,
    pub width: u32,
    pub height: u32,
    pub min_fps: f64,
    pub max_fps: f64,
    pub step_fps: f64,
}

/// Cropping bounds of a stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CropCapability {
    pub buf_type: BufType,
    pub bounds: Rect,
    pub default: Rect,
    pub pixel_aspect: Fract,
}

/// A video input connector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputInfo {
    pub index: u32,
    pub name: String,
    pub input_type: InputType,
    pub audioset: u32,
    pub tuner: u32,
    pub std: AnalogStd,
    pub status: InputStatus,
    pub capabilities: InputCapabilities,
}

/// Immutable snapshot of everything a device advertises about itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Info {
    /// Identifier of the V4L2 driver providing this device.
    pub driver: String,
    /// The card or device name.
    pub card: String,
    /// Description of where on the system the device is attached.
    pub bus_info: String,
    pub version: KernelVersion,
    /// Capabilities of the physical device as a whole.
    pub capabilities: CapabilityFlags,
    /// Capabilities available through the opened device node.
    pub device_capabilities: CapabilityFlags,
    /// Buffer types derived from the node's capabilities.
    pub buffers: Vec<BufType>,
    pub formats: Vec<ImageFormat>,
    pub frame_types: Vec<FrameType>,
    pub crop: Vec<CropCapability>,
    pub inputs: Vec<InputInfo>,
    /// Descriptors of all enumerable controls, in enumeration order.
    pub controls: Vec<ControlDesc>,
}

impl Info {
    /// Runs the full discovery pass against an open descriptor.
    pub(crate) fn read(fd: RawFd) -> Result<Self> {
        let caps = unsafe {
            let mut caps: raw::Capabilities = mem::zeroed();
            raw::querycap(fd, &mut caps)?;
            caps
        };

        let device_capabilities = if caps.capabilities.contains(CapabilityFlags::DEVICE_CAPS) {
            caps.device_caps
        } else {
            caps.capabilities
        };
        let buffers: Vec<BufType> = BufTypes::from_capabilities(device_capabilities)
            .into_iter()
            .collect();

        let formats = enum_formats(fd, &buffers)?;
        let frame_types = enum_frame_types(fd, &formats)?;
        let crop = crop_capabilities(fd, &buffers);
        let inputs = enum_inputs(fd)?;
        let controls = enum_controls(fd)?;

        Ok(Self {
            driver: byte_array_to_str(&caps.driver).to_string(),
            card: byte_array_to_str(&caps.card).to_string(),
            bus_info: byte_array_to_str(&caps.bus_info).to_string(),
            version: KernelVersion::from_raw(caps.version),
            capabilities: caps.capabilities,
            device_capabilities,
            buffers,
            formats,
            frame_types,
            crop,
            inputs,
            controls,
        })
    }
}

fn enum_formats(fd: RawFd, buffers: &[BufType]) -> Result<Vec<ImageFormat>> {
    let mut formats = Vec::new();
    for &buf_type in BufType::IMAGE_STREAMS {
        if !buffers.contains(&buf_type) {
            continue;
        }

        for index in 0.. {
            let mut desc = raw::FmtDesc {
                index,
                type_: buf_type,
                ..unsafe { mem::zeroed() }
            };
            match unsafe { raw::enum_fmt(fd, &mut desc) } {
                Ok(_) => {}
                Err(Errno::EINVAL) => break,
                Err(e) => return Err(e.into()),
            }

            if !desc.pixel_format.is_known() {
                log::warn!(
                    "unknown pixel format {} ({:?}), skipping",
                    desc.pixel_format,
                    byte_array_to_str(&desc.description),
                );
                continue;
            }

            formats.push(ImageFormat {
                buf_type,
                description: byte_array_to_str(&desc.description).to_string(),
                flags: desc.flags,
                pixel_format: desc.pixel_format,
            });
        }
    }

    Ok(formats)
}

fn enum_frame_types(fd: RawFd, formats: &[ImageFormat]) -> Result<Vec<FrameType>> {
    let mut frame_types = Vec::new();
    for fmt in formats {
        let sizes = match FrameSizes::enumerate(fd, fmt.pixel_format)? {
            FrameSizes::Discrete(sizes) => sizes,
            // Only discrete sizes carry per-size interval enumerations.
            FrameSizes::Stepwise(_) | FrameSizes::Continuous(_) => continue,
        };

        for size in sizes {
            match FrameIntervals::enumerate(fd, fmt.pixel_format, size.width, size.height)? {
                FrameIntervals::Discrete(intervals) => {
                    for interval in intervals {
                        let fps = interval.as_fps();
                        frame_types.push(FrameType {
                            buf_type: fmt.buf_type,
                            pixel_format: fmt.pixel_format,
                            width: size.width,
                            height: size.height,
                            min_fps: fps,
                            max_fps: fps,
                            step_fps: fps,
                        });
                    }
                }
                FrameIntervals::Stepwise(iv) | FrameIntervals::Continuous(iv) => {
                    frame_types.push(FrameType {
                        buf_type: fmt.buf_type,
                        pixel_format: fmt.pixel_format,
                        width: size.width,
                        height: size.height,
                        min_fps: iv.min.as_fps(),
                        max_fps: iv.max.as_fps(),
                        step_fps: iv.step.as_fps(),
                    });
                }
            }
        }
    }

    Ok(frame_types)
}

fn crop_capabilities(fd: RawFd, buffers: &[BufType]) -> Vec<CropCapability> {
    let mut crop = Vec::new();
    for buf_type in [
        BufType::VIDEO_CAPTURE,
        BufType::VIDEO_OUTPUT,
        BufType::VIDEO_OVERLAY,
    ] {
        if !buffers.contains(&buf_type) {
            continue;
        }

        let mut raw = raw::CropCap {
            type_: buf_type,
            ..unsafe { mem::zeroed() }
        };
        // Not every driver implements CROPCAP; a failure just means the entry is absent.
        if unsafe { raw::cropcap(fd, &mut raw) }.is_ok() {
            crop.push(CropCapability {
                buf_type,
                bounds: raw.bounds,
                default: raw.defrect,
                pixel_aspect: raw.pixelaspect,
            });
        }
    }

    crop
}

fn enum_inputs(fd: RawFd) -> Result<Vec<InputInfo>> {
    let mut inputs = Vec::new();
    for index in 0.. {
        let mut raw = raw::Input {
            index,
            ..unsafe { mem::zeroed() }
        };
        match unsafe { raw::enuminput(fd, &mut raw) } {
            Ok(_) => {}
            Err(Errno::EINVAL) => break,
            Err(e) => return Err(e.into()),
        }

        inputs.push(InputInfo {
            index,
            name: byte_array_to_str(&raw.name).to_string(),
            input_type: raw.type_,
            audioset: raw.audioset,
            tuner: raw.tuner,
            std: raw.std,
            status: raw.status,
            capabilities: raw.capabilities,
        });
    }

    Ok(inputs)
}

fn enum_controls(fd: RawFd) -> Result<Vec<ControlDesc>> {
    let mut controls = Vec::new();
    let mut next_id = ControlFlags::NEXT_CTRL.bits() | ControlFlags::NEXT_COMPOUND.bits();

    loop {
        let mut raw = raw::QueryExtCtrl {
            id: next_id,
            ..unsafe { mem::zeroed() }
        };
        match unsafe { raw::query_ext_ctrl(fd, &mut raw) } {
            Ok(_) => {}
            Err(Errno::EINVAL) => break,
            Err(e) => return Err(e.into()),
        }

        next_id =
            raw.id | ControlFlags::NEXT_CTRL.bits() | ControlFlags::NEXT_COMPOUND.bits();

        if raw.flags.contains(ControlFlags::DISABLED) || raw.type_ == CtrlType::CTRL_CLASS {
            continue;
        }

        controls.push(ControlDesc::from_raw(&raw));
    }

    Ok(controls)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_triple() {
        let v = KernelVersion::from_raw(5 << 16 | 4 << 8 | 12);
        assert_eq!(v, KernelVersion(5, 4, 12));
        assert_eq!(v.to_string(), "5.4.12");
    }
}
