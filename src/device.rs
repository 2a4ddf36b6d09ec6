//! The device object: descriptor ownership and command dispatch.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::fs::File;
use std::io::Write;
use std::mem;
use std::ops::Deref;
use std::os::unix::prelude::{AsRawFd, RawFd};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::buf_type::BufType;
use crate::controls::Controls;
use crate::format::{Format, Fract};
use crate::info::{Info, Rect};
use crate::io::{Io, PollIo};
use crate::pixel_format::PixelFormat;
use crate::raw;
use crate::reader::DeviceFrames;
use crate::shared::{CapabilityFlags, Field, Priority, SelectionTarget};
use crate::stream::CaptureStream;
use crate::{Error, Result};

/// A V4L2 device node.
///
/// A `Device` is constructed closed; [`Device::open`] (or a scoped [`Device::acquire`]) attaches
/// the descriptor. All state lives in [`Cell`]/[`RefCell`], which makes the type `!Sync`: a
/// device is driven by one task at a time, though it may be *moved* to another thread (the async
/// readers rely on this).
pub struct Device {
    path: PathBuf,
    io: Box<dyn Io>,
    file: RefCell<Option<File>>,
    opens: Cell<u32>,
    info: RefCell<Option<Arc<Info>>>,
}

impl Device {
    /// Creates a closed device for the node at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_io(path, Box::new(PollIo))
    }

    /// Creates a closed device that manages its descriptor through `io`.
    pub fn with_io(path: impl Into<PathBuf>, io: Box<dyn Io>) -> Self {
        Self {
            path: path.into(),
            io,
            file: RefCell::new(None),
            opens: Cell::new(0),
            info: RefCell::new(None),
        }
    }

    /// Creates a closed device for `/dev/videoN`.
    pub fn from_id(id: u32) -> Self {
        Self::new(format!("/dev/video{}", id))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the device currently holds no descriptor.
    pub fn closed(&self) -> bool {
        self.file.borrow().is_none()
    }

    /// Opens the device node.
    ///
    /// Fails with [`Error::AlreadyOpen`] if a descriptor is already attached. Use
    /// [`Device::acquire`] for a re-entrant variant.
    pub fn open(&self) -> Result<()> {
        if !self.closed() {
            return Err(Error::AlreadyOpen);
        }

        let file = self.io.open(&self.path, true)?;
        log::debug!("opened {} (fd {})", self.path.display(), file.as_raw_fd());
        *self.file.borrow_mut() = Some(file);
        Ok(())
    }

    /// Releases the descriptor.
    ///
    /// Buffers of any active stream must already have been released by their owners. Closing an
    /// already-closed device is a no-op.
    pub fn close(&self) -> Result<()> {
        if let Some(file) = self.file.borrow_mut().take() {
            log::debug!("closed {} (fd {})", self.path.display(), file.as_raw_fd());
        }
        Ok(())
    }

    /// Opens the device if necessary and returns a guard that keeps it open.
    ///
    /// Acquisition nests: inner guards only bump a counter, and the descriptor is closed when
    /// the outermost guard is dropped.
    pub fn acquire(&self) -> Result<DeviceGuard<'_>> {
        if self.closed() {
            self.open()?;
        }
        self.opens.set(self.opens.get() + 1);
        Ok(DeviceGuard { device: self })
    }

    pub(crate) fn fd(&self) -> Result<RawFd> {
        self.file
            .borrow()
            .as_ref()
            .map(|f| f.as_raw_fd())
            .ok_or(Error::Closed)
    }

    pub(crate) fn io(&self) -> &dyn Io {
        &*self.io
    }

    /// The discovery snapshot of this device.
    ///
    /// The snapshot is taken on first access while the device is open and cached for the
    /// lifetime of the handle.
    pub fn info(&self) -> Result<Arc<Info>> {
        if let Some(info) = &*self.info.borrow() {
            return Ok(info.clone());
        }

        let info = Arc::new(Info::read(self.fd()?)?);
        *self.info.borrow_mut() = Some(info.clone());
        Ok(info)
    }

    /// Builds the control registry from the cached control descriptors.
    pub fn controls(&self) -> Result<Controls<'_>> {
        let info = self.info()?;
        Controls::new(self, &info.controls)
    }

    /// Reads the format currently configured for `buf_type`.
    pub fn get_format(&self, buf_type: BufType) -> Result<Format> {
        let fd = self.fd()?;
        unsafe {
            let mut format = raw::Format {
                type_: buf_type,
                ..mem::zeroed()
            };
            raw::g_fmt(fd, &mut format)?;

            match buf_type {
                BufType::VIDEO_CAPTURE | BufType::VIDEO_OUTPUT => Ok(Format::new(
                    format.fmt.pix.width,
                    format.fmt.pix.height,
                    format.fmt.pix.pixel_format,
                )),
                BufType::VIDEO_CAPTURE_MPLANE | BufType::VIDEO_OUTPUT_MPLANE => Ok(Format::new(
                    format.fmt.pix_mp.width,
                    format.fmt.pix_mp.height,
                    format.fmt.pix_mp.pixel_format,
                )),
                other => Err(Error::UnsupportedBufferType(other)),
            }
        }
    }

    /// Requests a stream format.
    ///
    /// The driver is allowed to adjust all values to the closest configuration it supports;
    /// callers must re-read the format with [`Device::get_format`] to observe the result.
    pub fn set_format(
        &self,
        buf_type: BufType,
        width: u32,
        height: u32,
        pixel_format: PixelFormat,
    ) -> Result<()> {
        let fd = self.fd()?;
        unsafe {
            let mut format = raw::Format {
                type_: buf_type,
                ..mem::zeroed()
            };
            match buf_type {
                BufType::VIDEO_CAPTURE | BufType::VIDEO_OUTPUT => {
                    format.fmt.pix.width = width;
                    format.fmt.pix.height = height;
                    format.fmt.pix.pixel_format = pixel_format;
                    format.fmt.pix.field = Field::ANY;
                    format.fmt.pix.bytesperline = 0;
                }
                BufType::VIDEO_CAPTURE_MPLANE | BufType::VIDEO_OUTPUT_MPLANE => {
                    format.fmt.pix_mp.width = width;
                    format.fmt.pix_mp.height = height;
                    format.fmt.pix_mp.pixel_format = pixel_format;
                    format.fmt.pix_mp.field = Field::ANY.0;
                    format.fmt.pix_mp.num_planes = 1;
                }
                other => return Err(Error::UnsupportedBufferType(other)),
            }
            raw::s_fmt(fd, &mut format)?;
        }
        Ok(())
    }

    /// Reads the configured frame rate of a capture or output stream.
    pub fn get_fps(&self, buf_type: BufType) -> Result<f64> {
        let fd = self.fd()?;
        let timeperframe = unsafe {
            let mut parm = raw::StreamParm {
                type_: buf_type,
                ..mem::zeroed()
            };
            raw::g_parm(fd, &mut parm)?;

            if buf_type.is_capture() {
                parm.union.capture.timeperframe
            } else if buf_type.is_output() {
                parm.union.output.timeperframe
            } else {
                return Err(Error::UnsupportedBufferType(buf_type));
            }
        };

        Ok(timeperframe.as_fps())
    }

    /// Requests a frame rate; `timeperframe` is set to `1/fps`.
    ///
    /// Only capture and output streams have a frame rate.
    pub fn set_fps(&self, buf_type: BufType, fps: u32) -> Result<()> {
        let fd = self.fd()?;
        let timeperframe = Fract {
            numerator: 1,
            denominator: fps,
        };
        unsafe {
            let mut parm = raw::StreamParm {
                type_: buf_type,
                ..mem::zeroed()
            };
            if buf_type.is_capture() {
                parm.union.capture.timeperframe = timeperframe;
            } else if buf_type.is_output() {
                parm.union.output.timeperframe = timeperframe;
            } else {
                return Err(Error::UnsupportedBufferType(buf_type));
            }
            raw::s_parm(fd, &mut parm)?;
        }
        Ok(())
    }

    /// Reads a selection rectangle.
    pub fn get_selection(&self, buf_type: BufType, target: SelectionTarget) -> Result<Rect> {
        let fd = self.fd()?;
        unsafe {
            let mut sel = raw::Selection {
                type_: buf_type,
                target,
                ..mem::zeroed()
            };
            raw::g_selection(fd, &mut sel)?;
            Ok(sel.r)
        }
    }

    /// Requests a selection rectangle; returns the (possibly adjusted) rectangle in use.
    pub fn set_selection(
        &self,
        buf_type: BufType,
        target: SelectionTarget,
        rect: Rect,
    ) -> Result<Rect> {
        let fd = self.fd()?;
        unsafe {
            let mut sel = raw::Selection {
                type_: buf_type,
                target,
                r: rect,
                ..mem::zeroed()
            };
            raw::s_selection(fd, &mut sel)?;
            Ok(sel.r)
        }
    }

    pub fn get_priority(&self) -> Result<Priority> {
        let fd = self.fd()?;
        unsafe {
            let mut priority = Priority::UNSET;
            raw::g_priority(fd, &mut priority)?;
            Ok(priority)
        }
    }

    pub fn set_priority(&self, priority: Priority) -> Result<()> {
        let fd = self.fd()?;
        unsafe {
            raw::s_priority(fd, &priority)?;
        }
        Ok(())
    }

    /// Transitions the kernel's stream state for `buf_type` to *on*.
    pub fn stream_on(&self, buf_type: BufType) -> Result<()> {
        let fd = self.fd()?;
        unsafe {
            raw::streamon(fd, &buf_type)?;
        }
        Ok(())
    }

    /// Transitions the kernel's stream state for `buf_type` to *off*.
    ///
    /// This implicitly dequeues all buffers.
    pub fn stream_off(&self, buf_type: BufType) -> Result<()> {
        let fd = self.fd()?;
        unsafe {
            raw::streamoff(fd, &buf_type)?;
        }
        Ok(())
    }

    /// Writes a frame to a read-write output node.
    ///
    /// This only succeeds on devices advertising both `VIDEO_OUTPUT` and `READWRITE`.
    pub fn write(&self, data: &[u8]) -> Result<usize> {
        let info = self.info()?;
        if !info
            .device_capabilities
            .contains(CapabilityFlags::VIDEO_OUTPUT | CapabilityFlags::READWRITE)
        {
            return Err(Error::UnsupportedBufferType(BufType::VIDEO_OUTPUT));
        }

        let mut file = self.file.borrow_mut();
        let file = file.as_mut().ok_or(Error::Closed)?;
        Ok(file.write(data)?)
    }

    /// Prepares a memory-mapped capture stream with `buffer_count` buffers.
    ///
    /// The stream starts out without any buffers allocated; see
    /// [`CaptureStream::create_buffers`] and [`CaptureStream::start`].
    pub fn capture_stream(&self, buffer_count: u32) -> Result<CaptureStream<'_>> {
        CaptureStream::new(self, BufType::VIDEO_CAPTURE, buffer_count)
    }

    /// The default iteration path: acquires the device and yields frames from a video capture
    /// session until dropped.
    pub fn frames(&self) -> Result<DeviceFrames<'_>> {
        DeviceFrames::new(self)
    }
}

impl fmt::Debug for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Device")
            .field("path", &self.path)
            .field("closed", &self.closed())
            .field("io", &self.io)
            .finish()
    }
}

/// Keeps a [`Device`] open for the guard's lifetime.
///
/// Dropping the outermost guard closes the device; nested guards only decrement the counter.
pub struct DeviceGuard<'a> {
    device: &'a Device,
}

impl Deref for DeviceGuard<'_> {
    type Target = Device;

    fn deref(&self) -> &Self::Target {
        self.device
    }
}

impl Drop for DeviceGuard<'_> {
    fn drop(&mut self) {
        let opens = self.device.opens.get() - 1;
        self.device.opens.set(opens);
        if opens == 0 {
            if let Err(e) = self.device.close() {
                log::warn!("failed to close {}: {}", self.device.path.display(), e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // `/dev/null` stands in for a device node: lifecycle management never issues an ioctl.

    #[test]
    fn lifecycle() {
        let device = Device::new("/dev/null");
        assert!(device.closed());

        device.open().unwrap();
        assert!(!device.closed());
        assert!(matches!(device.open(), Err(Error::AlreadyOpen)));

        device.close().unwrap();
        assert!(device.closed());
        // closing twice is fine
        device.close().unwrap();
    }

    #[test]
    fn nested_acquisition_closes_only_at_outermost() {
        let device = Device::new("/dev/null");

        let outer = device.acquire().unwrap();
        assert!(!device.closed());
        {
            let _inner = device.acquire().unwrap();
            assert!(!device.closed());
        }
        assert!(!device.closed());

        drop(outer);
        assert!(device.closed());
    }

    #[test]
    fn operations_on_closed_device_fail() {
        let device = Device::from_id(39);
        assert_eq!(device.path(), Path::new("/dev/video39"));
        assert!(matches!(
            device.get_format(BufType::VIDEO_CAPTURE),
            Err(Error::Closed)
        ));
        assert!(matches!(device.fd(), Err(Error::Closed)));
    }
}
