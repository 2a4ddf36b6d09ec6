//! Streaming I/O: buffer negotiation, memory mapping and the enqueue/dequeue state machine.

use core::slice;
use std::cell::Cell;
use std::ffi::c_void;
use std::mem;
use std::ops::Deref;
use std::os::unix::prelude::RawFd;
use std::ptr;
use std::time::Duration;

use nix::sys::mman::{mmap, munmap, MapFlags, ProtFlags};

use crate::buf_type::BufType;
use crate::device::Device;
use crate::format::Format;
use crate::frame::Frame;
use crate::io::Wait;
use crate::raw;
use crate::reader::Frames;
use crate::shared::{BufFlag, Memory};
use crate::{Error, Result};

/// Describes one kernel buffer of a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferDescriptor {
    pub index: u32,
    /// Total size of the buffer in bytes (usually the image size rounded up to whole pages).
    pub length: u32,
    /// Offset the kernel assigned for memory-mapping this buffer.
    pub offset: u32,
}

struct MappedBuffer {
    desc: BufferDescriptor,
    /// Pointer in our address space where this buffer is mapped.
    ptr: *mut c_void,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReadMode {
    /// Blocking descriptor; `DQBUF` blocks in the kernel.
    Direct,
    /// Non-blocking descriptor; wait for readiness first.
    Gated,
}

/// A memory-mapped capture session on a [`Device`].
///
/// The session walks the V4L2 queue states: buffers are allocated and mapped with
/// [`CaptureStream::create_buffers`], handed to the kernel with
/// [`CaptureStream::enqueue_buffers`], and filled once [`CaptureStream::stream_on`] was issued.
/// [`CaptureStream::start`] performs all outstanding transitions at once.
///
/// Dropping the session turns the stream off, unmaps all buffers and releases the kernel queue.
pub struct CaptureStream<'a> {
    device: &'a Device,
    buf_type: BufType,
    memory: Memory,
    buffer_count: u32,
    format: Format,
    buffers: Vec<MappedBuffer>,
    queued: bool,
    streaming: bool,
    read_mode: Cell<Option<ReadMode>>,
}

impl<'a> CaptureStream<'a> {
    pub(crate) fn new(device: &'a Device, buf_type: BufType, buffer_count: u32) -> Result<Self> {
        let format = device.get_format(buf_type)?;

        Ok(Self {
            device,
            buf_type,
            memory: Memory::MMAP,
            buffer_count,
            format,
            buffers: Vec::new(),
            queued: false,
            streaming: false,
            read_mode: Cell::new(None),
        })
    }

    /// The format frames of this session are stamped with.
    ///
    /// Read from the device when the buffers are created, which is when the kernel pins the
    /// negotiated format.
    pub fn format(&self) -> Format {
        self.format
    }

    fn fd(&self) -> Result<RawFd> {
        self.device.fd()
    }

    /// Reserves and memory-maps `count` buffers via `REQBUFS`/`QUERYBUF`.
    ///
    /// The kernel may grant fewer buffers than requested; the session adapts to the granted
    /// count, but a count of zero fails with [`Error::OutOfMemory`]. Calling this a second time
    /// without [`CaptureStream::free_buffers`] is an error.
    pub fn create_buffers(&mut self, count: u32) -> Result<Vec<BufferDescriptor>> {
        if !self.buffers.is_empty() {
            return Err(Error::BuffersAlreadyCreated);
        }
        if self.memory != Memory::MMAP {
            return Err(Error::UnsupportedMemory(self.memory));
        }

        let fd = self.fd()?;
        self.format = self.device.get_format(self.buf_type)?;

        let mut req_bufs: raw::RequestBuffers = unsafe { mem::zeroed() };
        req_bufs.count = count;
        req_bufs.type_ = self.buf_type;
        req_bufs.memory = self.memory;

        unsafe {
            raw::reqbufs(fd, &mut req_bufs)?;
        }

        log::debug!("{:?}", req_bufs);

        if req_bufs.count == 0 {
            return Err(Error::OutOfMemory);
        }

        // Query the buffer locations and map them into our process.
        for index in 0..req_bufs.count {
            let mut buf: raw::Buffer = unsafe { mem::zeroed() };
            buf.type_ = self.buf_type;
            buf.memory = self.memory;
            buf.index = index;

            unsafe {
                raw::querybuf(fd, &mut buf)?;
            }

            let offset = unsafe { buf.m.offset };
            let ptr = unsafe {
                mmap(
                    ptr::null_mut(),
                    buf.length as usize,
                    ProtFlags::PROT_READ,
                    MapFlags::MAP_SHARED,
                    fd,
                    offset as libc::off_t,
                )?
            };

            self.buffers.push(MappedBuffer {
                desc: BufferDescriptor {
                    index,
                    length: buf.length,
                    offset,
                },
                ptr,
            });
        }

        Ok(self.buffers.iter().map(|b| b.desc).collect())
    }

    /// Hands all buffers to the kernel via `QBUF`.
    ///
    /// Used once between buffer creation and `STREAMON`.
    pub fn enqueue_buffers(&mut self) -> Result<()> {
        if self.buffers.is_empty() {
            return Err(Error::BuffersNotCreated);
        }

        let fd = self.fd()?;
        for index in 0..self.buffers.len() as u32 {
            let mut buf: raw::Buffer = unsafe { mem::zeroed() };
            buf.type_ = self.buf_type;
            buf.memory = self.memory;
            buf.index = index;

            unsafe {
                raw::qbuf(fd, &mut buf)?;
            }
        }

        self.queued = true;
        Ok(())
    }

    /// Starts streaming.
    ///
    /// This function can potentially block for a noticeable amount of time.
    pub fn stream_on(&mut self) -> Result<()> {
        let fd = self.fd()?;
        unsafe {
            raw::streamon(fd, &self.buf_type)?;
        }
        self.streaming = true;
        Ok(())
    }

    /// Stops streaming. The kernel implicitly dequeues all buffers.
    pub fn stream_off(&mut self) -> Result<()> {
        let fd = self.fd()?;
        unsafe {
            raw::streamoff(fd, &self.buf_type)?;
        }
        self.streaming = false;
        self.queued = false;
        Ok(())
    }

    /// Performs every outstanding transition up to `STREAMING`.
    pub fn start(&mut self) -> Result<()> {
        if self.buffers.is_empty() {
            self.create_buffers(self.buffer_count)?;
        }
        if !self.queued {
            self.enqueue_buffers()?;
        }
        if !self.streaming {
            self.stream_on()?;
        }
        Ok(())
    }

    /// Dequeues one filled buffer.
    ///
    /// The returned guard borrows the buffer's mapped pages, truncated to the payload length,
    /// and re-queues the buffer when dropped, even on unwind. A failed `DQBUF` leaves all
    /// buffer ownership unchanged.
    pub fn raw_grab(&mut self) -> Result<FrameGuard<'_>> {
        if self.buffers.is_empty() {
            return Err(Error::BuffersNotCreated);
        }

        let fd = self.fd()?;
        let mut buf: raw::Buffer = unsafe { mem::zeroed() };
        buf.type_ = self.buf_type;
        buf.memory = self.memory;

        unsafe {
            raw::dqbuf(fd, &mut buf)?;
        }

        let mapped = &self.buffers[buf.index as usize];
        let len = (buf.bytesused as usize).min(mapped.desc.length as usize);
        let data = unsafe { slice::from_raw_parts(mapped.ptr as *const u8, len) };

        Ok(FrameGuard {
            fd,
            format: self.format,
            raw: buf,
            data,
        })
    }

    /// Dequeues one buffer and detaches it as a [`Frame`]; the buffer returns to the kernel
    /// before this function returns.
    pub fn raw_read(&mut self) -> Result<Frame> {
        let guard = self.raw_grab()?;
        Ok(guard.to_frame())
    }

    /// Waits for read-readiness through the device's I/O policy, then dequeues one frame.
    ///
    /// Returns `None` if `timeout` expires before a buffer becomes ready; nothing is dequeued
    /// in that case.
    pub fn wait_read(&mut self, timeout: Option<Duration>) -> Result<Option<Frame>> {
        let fd = self.fd()?;
        if !self.device.io().wait(fd, Wait::Readable, timeout)? {
            return Ok(None);
        }
        self.raw_read().map(Some)
    }

    /// Reads the next frame.
    ///
    /// On the first call this decides, based on the I/O policy's blocking mode, whether reads
    /// dequeue directly or gate on readiness first; the decision is reused for the session's
    /// lifetime.
    pub fn read(&mut self) -> Result<Frame> {
        loop {
            if let Some(frame) = self.read_timeout(None)? {
                return Ok(frame);
            }
        }
    }

    /// Like [`CaptureStream::read`], but gives up after `timeout` and returns `None`.
    pub fn read_timeout(&mut self, timeout: Option<Duration>) -> Result<Option<Frame>> {
        let mode = match self.read_mode.get() {
            Some(mode) => mode,
            None => {
                let mode = if self.device.io().blocking() {
                    ReadMode::Direct
                } else {
                    ReadMode::Gated
                };
                self.read_mode.set(Some(mode));
                mode
            }
        };

        match mode {
            ReadMode::Direct => self.raw_read().map(Some),
            ReadMode::Gated => self.wait_read(timeout),
        }
    }

    /// Iterator over the frames of this session, starting the stream if necessary.
    pub fn frames(&mut self) -> Frames<'_, 'a> {
        Frames::new(self, None)
    }

    /// Like [`CaptureStream::frames`], but each step gives up after `timeout` and ends the
    /// iteration.
    pub fn frames_with_timeout(&mut self, timeout: Duration) -> Frames<'_, 'a> {
        Frames::new(self, Some(timeout))
    }

    /// Tears the session down to the unallocated state.
    ///
    /// A still-streaming queue is stopped first, then all mappings are closed, then the kernel
    /// queue is released with `REQBUFS(0)`. If that final call fails the error is reported, but
    /// the session still considers itself torn down; the kernel reaps the queue when the
    /// descriptor is closed.
    pub fn free_buffers(&mut self) -> Result<()> {
        if self.buffers.is_empty() {
            return Ok(());
        }

        // If the descriptor is already gone the kernel has reaped the queue; only the
        // mappings remain to be cleaned up.
        let fd = self.fd().ok();
        let mut first_error = None;

        if let Some(fd) = fd {
            if self.streaming {
                if let Err(e) = unsafe { raw::streamoff(fd, &self.buf_type) } {
                    first_error = Some(e.into());
                }
            }
        }
        self.streaming = false;
        self.queued = false;

        for buffer in self.buffers.drain(..) {
            unsafe {
                if let Err(e) = munmap(buffer.ptr, buffer.desc.length as usize) {
                    log::warn!("failed to unmap buffer {}: {}", buffer.desc.index, e);
                }
            }
        }

        if let Some(fd) = fd {
            let mut req_bufs: raw::RequestBuffers = unsafe { mem::zeroed() };
            req_bufs.count = 0;
            req_bufs.type_ = self.buf_type;
            req_bufs.memory = self.memory;

            if let Err(e) = unsafe { raw::reqbufs(fd, &mut req_bufs) } {
                first_error.get_or_insert(e.into());
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Drop for CaptureStream<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.free_buffers() {
            log::warn!("failed to tear down capture stream: {}", e);
        }
    }
}

/// Borrowed view of a dequeued (filled) buffer.
///
/// Dereferences to the payload bytes. Dropping the guard re-queues the buffer.
pub struct FrameGuard<'a> {
    fd: RawFd,
    format: Format,
    raw: raw::Buffer,
    data: &'a [u8],
}

impl FrameGuard<'_> {
    /// Index of the dequeued buffer.
    pub fn index(&self) -> u32 {
        self.raw.index
    }

    /// The kernel-assigned sequence number of this buffer's frame.
    pub fn sequence(&self) -> u32 {
        self.raw.sequence
    }

    /// Returns whether the error flag for this buffer is set.
    pub fn is_error(&self) -> bool {
        self.raw.flags.contains(BufFlag::ERROR)
    }

    /// Copies the payload out into an owned [`Frame`].
    pub fn to_frame(&self) -> Frame {
        Frame::from_buffer(self.data.to_vec(), self.format, &self.raw)
    }
}

impl Deref for FrameGuard<'_> {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        self.data
    }
}

impl Drop for FrameGuard<'_> {
    fn drop(&mut self) {
        let mut buf: raw::Buffer = unsafe { mem::zeroed() };
        buf.type_ = self.raw.type_;
        buf.memory = self.raw.memory;
        buf.index = self.raw.index;

        if let Err(e) = unsafe { raw::qbuf(self.fd, &mut buf) } {
            log::warn!("failed to re-queue buffer {}: {}", buf.index, e);
        }
    }
}
