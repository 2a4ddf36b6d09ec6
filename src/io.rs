//! Injectable I/O policy.
//!
//! A [`Device`][crate::Device] performs all descriptor management through an [`Io`]
//! implementation, which decides how the descriptor is opened and how readers wait for it to
//! become ready. The shipped policies are [`PollIo`] (non-blocking descriptor, readiness via
//! `poll(2)`; the default) and [`BlockingIo`] (blocking descriptor, waits happen inside the
//! kernel). Embedders with a cooperative scheduler can provide their own multiplexer by
//! implementing the trait.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io;
use std::os::unix::prelude::{OpenOptionsExt, RawFd};
use std::path::Path;
use std::time::Duration;

use nix::errno::Errno;
use nix::poll::{poll, PollFd, PollFlags};

/// The readiness condition a reader waits for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wait {
    /// A filled buffer can be dequeued (`POLLIN`).
    Readable,
    /// An event is pending (`POLLPRI`).
    Priority,
}

/// How a device's descriptor is opened and waited on.
pub trait Io: fmt::Debug + Send {
    /// Opens the device node, read-write when `rw` is set.
    fn open(&self, path: &Path, rw: bool) -> io::Result<File>;

    /// Waits until `fd` satisfies `wait`, or until `timeout` expires.
    ///
    /// Returns `false` on timeout. A `None` timeout blocks indefinitely.
    fn wait(&self, fd: RawFd, wait: Wait, timeout: Option<Duration>) -> io::Result<bool>;

    /// Whether descriptors returned by [`Io::open`] are in blocking mode.
    ///
    /// Streams use this to decide, once, whether `read` needs a readiness wait before
    /// dequeuing.
    fn blocking(&self) -> bool {
        false
    }
}

fn poll_wait(fd: RawFd, wait: Wait, timeout: Option<Duration>) -> io::Result<bool> {
    let events = match wait {
        Wait::Readable => PollFlags::POLLIN,
        Wait::Priority => PollFlags::POLLPRI,
    };
    let timeout_ms = match timeout {
        Some(t) => i32::try_from(t.as_millis()).unwrap_or(i32::MAX),
        None => -1,
    };

    loop {
        let mut fds = [PollFd::new(fd, events)];
        match poll(&mut fds, timeout_ms) {
            Ok(0) => return Ok(false),
            Ok(_) => return Ok(true),
            Err(Errno::EINTR) => continue,
            Err(e) => return Err(io::Error::from_raw_os_error(e as i32)),
        }
    }
}

/// The default policy: non-blocking descriptors, readiness via `poll(2)`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PollIo;

impl Io for PollIo {
    fn open(&self, path: &Path, rw: bool) -> io::Result<File> {
        OpenOptions::new()
            .read(true)
            .write(rw)
            .custom_flags(libc::O_NONBLOCK)
            .open(path)
    }

    fn wait(&self, fd: RawFd, wait: Wait, timeout: Option<Duration>) -> io::Result<bool> {
        poll_wait(fd, wait, timeout)
    }
}

/// Blocking descriptors; `DQBUF` blocks in the kernel until a buffer is ready.
#[derive(Debug, Default, Clone, Copy)]
pub struct BlockingIo;

impl Io for BlockingIo {
    fn open(&self, path: &Path, rw: bool) -> io::Result<File> {
        OpenOptions::new().read(true).write(rw).open(path)
    }

    fn wait(&self, _fd: RawFd, _wait: Wait, _timeout: Option<Duration>) -> io::Result<bool> {
        // The kernel blocks inside the ioctl instead.
        Ok(true)
    }

    fn blocking(&self) -> bool {
        true
    }
}
