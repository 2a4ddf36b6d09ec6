//! Captured video frames.

use std::fmt;
use std::ops::Deref;

use crate::buf_type::BufType;
use crate::format::Format;
use crate::raw;
use crate::shared::{BufFlag, Memory, TimecodeFlags, TimecodeType};

/// SMPTE timecode attached to a frame by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timecode {
    pub kind: TimecodeType,
    pub flags: TimecodeFlags,
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
    pub frames: u8,
}

/// A single captured image, detached from the stream that produced it.
///
/// The pixel data is a copy of the kernel buffer's payload, so a `Frame` can be kept, sent to
/// another thread, or outlive its stream.
#[derive(Clone)]
pub struct Frame {
    data: Vec<u8>,
    format: Format,
    index: u32,
    buf_type: BufType,
    memory: Memory,
    flags: BufFlag,
    sequence: u32,
    timestamp_secs: i64,
    timestamp_usecs: i64,
    timecode: Option<Timecode>,
}

impl Frame {
    pub(crate) fn from_buffer(data: Vec<u8>, format: Format, buf: &raw::Buffer) -> Self {
        let timecode = buf.flags.contains(BufFlag::TIMECODE).then(|| Timecode {
            kind: buf.timecode.type_,
            flags: buf.timecode.flags,
            hours: buf.timecode.hours,
            minutes: buf.timecode.minutes,
            seconds: buf.timecode.seconds,
            frames: buf.timecode.frames,
        });

        Self {
            data,
            format,
            index: buf.index,
            buf_type: buf.type_,
            memory: buf.memory,
            flags: buf.flags,
            sequence: buf.sequence,
            timestamp_secs: buf.timestamp.tv_sec,
            timestamp_usecs: buf.timestamp.tv_usec,
            timecode,
        }
    }

    /// The frame's payload, truncated to the driver-reported `bytesused`.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// The stream format this frame was captured with.
    pub fn format(&self) -> Format {
        self.format
    }

    pub fn pixel_format(&self) -> crate::PixelFormat {
        self.format.pixel_format
    }

    pub fn width(&self) -> u32 {
        self.format.width
    }

    pub fn height(&self) -> u32 {
        self.format.height
    }

    /// Index of the kernel buffer that carried this frame.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// The kernel-assigned sequence number ("frame number") of this frame.
    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    pub fn buf_type(&self) -> BufType {
        self.buf_type
    }

    pub fn memory(&self) -> Memory {
        self.memory
    }

    pub fn flags(&self) -> BufFlag {
        self.flags
    }

    /// The capture timestamp in seconds.
    pub fn timestamp(&self) -> f64 {
        self.timestamp_secs as f64 + self.timestamp_usecs as f64 * 1e-6
    }

    /// The capture timestamp as whole seconds and microseconds.
    pub fn timestamp_parts(&self) -> (i64, i64) {
        (self.timestamp_secs, self.timestamp_usecs)
    }

    pub fn timecode(&self) -> Option<Timecode> {
        self.timecode
    }

    /// Returns whether the error flag for this frame's buffer is set.
    ///
    /// If this returns `true`, the application should expect data corruption in the frame data.
    pub fn is_error(&self) -> bool {
        self.flags.contains(BufFlag::ERROR)
    }
}

impl Deref for Frame {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("format", &self.format)
            .field("index", &self.index)
            .field("sequence", &self.sequence)
            .field("timestamp", &self.timestamp())
            .field("len", &self.data.len())
            .field("flags", &self.flags)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PixelFormat;
    use std::mem;

    fn buffer_record() -> raw::Buffer {
        let mut buf: raw::Buffer = unsafe { mem::zeroed() };
        buf.index = 0;
        buf.type_ = BufType::VIDEO_CAPTURE;
        buf.memory = Memory::MMAP;
        buf.sequence = 123;
        buf.bytesused = 4;
        buf.timestamp.tv_sec = 123;
        buf.timestamp.tv_usec = 456_789;
        buf
    }

    #[test]
    fn timestamp_uses_microseconds() {
        let format = Format::new(640, 480, PixelFormat::RGB24);
        let frame = Frame::from_buffer(vec![1; 4], format, &buffer_record());
        assert!((frame.timestamp() - 123.456789).abs() < 1e-9);
        assert_eq!(frame.timestamp_parts(), (123, 456_789));
    }

    #[test]
    fn payload_and_metadata() {
        let format = Format::new(640, 480, PixelFormat::RGB24);
        let frame = Frame::from_buffer(vec![1; 4], format, &buffer_record());
        assert_eq!(frame.data(), &[1, 1, 1, 1]);
        assert_eq!(frame.len(), 4);
        assert_eq!(frame.sequence(), 123);
        assert_eq!(frame.index(), 0);
        assert_eq!(frame.pixel_format(), PixelFormat::RGB24);
        assert_eq!(frame.buf_type(), BufType::VIDEO_CAPTURE);
        assert!(frame.timecode().is_none());
        assert!(!frame.is_error());
    }
}
