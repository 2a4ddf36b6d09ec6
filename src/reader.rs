//! Frame and event readers.
//!
//! Three read models are supported:
//!
//! - **Blocking**: the descriptor is in blocking mode and `DQBUF` blocks in the kernel
//!   ([`BlockingIo`][crate::io::BlockingIo]).
//! - **Readiness-gated**: the descriptor is non-blocking and each read waits for readiness
//!   through the device's I/O policy first (the default).
//! - **Async**: a dedicated capture thread owns the device, dequeues frames as the descriptor
//!   becomes ready, and publishes them to a bounded queue awaited by async callers.
//!
//! All readers deliver frames in the sequence order assigned by the kernel.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use nix::errno::Errno;
use tokio::sync::Notify;

use crate::device::{Device, DeviceGuard};
use crate::events::Event;
use crate::frame::Frame;
use crate::io::Wait;
use crate::shared::EventType;
use crate::stream::CaptureStream;
use crate::{Error, Result};

/// How long worker threads wait per poll before re-checking for shutdown.
const WORKER_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Iterator over the frames of a [`CaptureStream`].
///
/// The first call performs any outstanding stream transitions (buffer allocation, enqueueing,
/// `STREAMON`). With a timeout configured, a step that times out ends the iteration; without
/// one, each step waits until a frame arrives.
pub struct Frames<'s, 'd> {
    stream: &'s mut CaptureStream<'d>,
    timeout: Option<Duration>,
}

impl<'s, 'd> Frames<'s, 'd> {
    pub(crate) fn new(stream: &'s mut CaptureStream<'d>, timeout: Option<Duration>) -> Self {
        Self { stream, timeout }
    }
}

impl Iterator for Frames<'_, '_> {
    type Item = Result<Frame>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Err(e) = self.stream.start() {
            return Some(Err(e));
        }

        match self.stream.read_timeout(self.timeout) {
            Ok(Some(frame)) => Some(Ok(frame)),
            Ok(None) => None,
            Err(e) => Some(Err(e)),
        }
    }
}

/// The device's default iteration: a self-contained video capture session.
///
/// Holds a [`DeviceGuard`], so dropping the iterator ends the session (issuing `STREAMOFF` and
/// releasing the buffers) and closes the device again if this was the outermost acquisition.
pub struct DeviceFrames<'a> {
    // field order matters: the stream must shut down before the guard may close the device
    stream: CaptureStream<'a>,
    _guard: DeviceGuard<'a>,
}

impl<'a> DeviceFrames<'a> {
    pub(crate) fn new(device: &'a Device) -> Result<Self> {
        let guard = device.acquire()?;
        let stream = device.capture_stream(1)?;
        Ok(Self {
            stream,
            _guard: guard,
        })
    }
}

impl Iterator for DeviceFrames<'_> {
    type Item = Result<Frame>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Err(e) = self.stream.start() {
            return Some(Err(e));
        }

        match self.stream.read_timeout(None) {
            Ok(Some(frame)) => Some(Ok(frame)),
            Ok(None) => None,
            Err(e) => Some(Err(e)),
        }
    }
}

/// Bounded single-producer single-consumer hand-off between a capture thread and async land.
struct SharedQueue<T> {
    state: Mutex<QueueState<T>>,
    notify: Notify,
    capacity: usize,
    label: &'static str,
}

struct QueueState<T> {
    items: VecDeque<T>,
    error: Option<Error>,
    finished: bool,
}

impl<T> SharedQueue<T> {
    fn new(capacity: usize, label: &'static str) -> Self {
        Self {
            state: Mutex::new(QueueState {
                items: VecDeque::with_capacity(capacity),
                error: None,
                finished: false,
            }),
            notify: Notify::new(),
            capacity: capacity.max(1),
            label,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, QueueState<T>> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Publishes an item, dropping the oldest undelivered one on overflow.
    fn push(&self, item: T) {
        let mut state = self.lock();
        if state.items.len() == self.capacity {
            state.items.pop_front();
            log::warn!("missed {}: queue full, dropping oldest", self.label);
        }
        state.items.push_back(item);
        drop(state);
        self.notify.notify_one();
    }

    fn fail(&self, error: Error) {
        let mut state = self.lock();
        state.error = Some(error);
        state.finished = true;
        drop(state);
        self.notify.notify_one();
    }

    fn finish(&self) {
        self.lock().finished = true;
        self.notify.notify_one();
    }

    /// Awaits the next item. Cancellation-safe: a cancelled wait consumes nothing.
    async fn pop(&self) -> Result<T> {
        loop {
            {
                let mut state = self.lock();
                if let Some(item) = state.items.pop_front() {
                    return Ok(item);
                }
                if let Some(error) = state.error.take() {
                    return Err(error);
                }
                if state.finished {
                    return Err(Error::Closed);
                }
            }
            self.notify.notified().await;
        }
    }
}

/// Asynchronous frame reader driven by a dedicated capture thread.
///
/// The thread owns the moved-in [`Device`], waits for read-readiness, dequeues and immediately
/// re-queues each kernel buffer (frames cross the thread boundary as owned copies), and
/// publishes them to a bounded queue. When the queue overflows, the oldest undelivered frame is
/// dropped and a warning is logged.
///
/// Cancelling [`AsyncFrameReader::read`] at its await point consumes nothing; no kernel buffer
/// is ever held across a suspension point. Dropping the reader stops the thread, which tears
/// the stream down (`STREAMOFF`, unmap, release).
pub struct AsyncFrameReader {
    queue: Arc<SharedQueue<Frame>>,
    stop: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl AsyncFrameReader {
    /// Default queue capacity.
    pub const DEFAULT_CAPACITY: usize = 1;

    /// Starts capturing from `device` with `buffer_count` kernel buffers and a queue capacity
    /// of [`AsyncFrameReader::DEFAULT_CAPACITY`].
    pub fn start(device: Device, buffer_count: u32) -> Self {
        Self::with_capacity(device, buffer_count, Self::DEFAULT_CAPACITY)
    }

    /// Starts capturing with an explicit queue capacity.
    pub fn with_capacity(device: Device, buffer_count: u32, capacity: usize) -> Self {
        let queue = Arc::new(SharedQueue::new(capacity, "frame"));
        let stop = Arc::new(AtomicBool::new(false));

        let worker = {
            let queue = queue.clone();
            let stop = stop.clone();
            std::thread::spawn(move || capture_worker(device, buffer_count, &queue, &stop))
        };

        Self {
            queue,
            stop,
            worker: Some(worker),
        }
    }

    /// Awaits the next frame.
    ///
    /// Fails with the capture thread's error if it stopped.
    pub async fn read(&mut self) -> Result<Frame> {
        self.queue.pop().await
    }

    /// Like [`AsyncFrameReader::read`], but returns `None` if no frame arrives within
    /// `timeout`.
    pub async fn read_timeout(&mut self, timeout: Duration) -> Result<Option<Frame>> {
        match tokio::time::timeout(timeout, self.queue.pop()).await {
            Ok(result) => result.map(Some),
            Err(_) => Ok(None),
        }
    }
}

impl Drop for AsyncFrameReader {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::warn!("capture thread panicked");
            }
        }
    }
}

fn capture_worker(
    device: Device,
    buffer_count: u32,
    queue: &SharedQueue<Frame>,
    stop: &AtomicBool,
) {
    let result = (|| -> Result<()> {
        let _guard = device.acquire()?;
        let fd = device.fd()?;
        let mut stream = device.capture_stream(buffer_count)?;
        stream.start()?;

        while !stop.load(Ordering::Relaxed) {
            match device
                .io()
                .wait(fd, Wait::Readable, Some(WORKER_POLL_INTERVAL))
            {
                Ok(false) => continue,
                Ok(true) => {}
                Err(e) => return Err(e.into()),
            }

            match stream.raw_read() {
                Ok(frame) => queue.push(frame),
                // a readiness race lost against nothing; try again
                Err(Error::Sys(Errno::EAGAIN)) => continue,
                Err(e) => return Err(e),
            }
        }

        Ok(())
    })();

    match result {
        Ok(()) => queue.finish(),
        Err(e) => queue.fail(e),
    }
}

/// Asynchronous event reader; the event-channel analogue of [`AsyncFrameReader`].
///
/// The worker thread subscribes the moved-in device to `subscriptions`, polls for priority
/// readiness and dequeues events into a bounded queue (capacity 100 by default, oldest dropped
/// on overflow).
pub struct AsyncEventReader {
    queue: Arc<SharedQueue<Event>>,
    stop: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl AsyncEventReader {
    /// Default queue capacity.
    pub const DEFAULT_CAPACITY: usize = 100;

    pub fn start(device: Device, subscriptions: Vec<EventType>) -> Self {
        Self::with_capacity(device, subscriptions, Self::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(
        device: Device,
        subscriptions: Vec<EventType>,
        capacity: usize,
    ) -> Self {
        let queue = Arc::new(SharedQueue::new(capacity, "event"));
        let stop = Arc::new(AtomicBool::new(false));

        let worker = {
            let queue = queue.clone();
            let stop = stop.clone();
            std::thread::spawn(move || event_worker(device, subscriptions, &queue, &stop))
        };

        Self {
            queue,
            stop,
            worker: Some(worker),
        }
    }

    /// Awaits the next event.
    pub async fn read(&mut self) -> Result<Event> {
        self.queue.pop().await
    }

    /// Like [`AsyncEventReader::read`], but returns `None` if no event arrives within
    /// `timeout`.
    pub async fn read_timeout(&mut self, timeout: Duration) -> Result<Option<Event>> {
        match tokio::time::timeout(timeout, self.queue.pop()).await {
            Ok(result) => result.map(Some),
            Err(_) => Ok(None),
        }
    }
}

impl Drop for AsyncEventReader {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::warn!("event thread panicked");
            }
        }
    }
}

fn event_worker(
    device: Device,
    subscriptions: Vec<EventType>,
    queue: &SharedQueue<Event>,
    stop: &AtomicBool,
) {
    let result = (|| -> Result<()> {
        let _guard = device.acquire()?;
        let fd = device.fd()?;
        for event_type in subscriptions {
            device.subscribe_event(event_type, 0, crate::shared::EventSubFlags::empty())?;
        }

        while !stop.load(Ordering::Relaxed) {
            match device
                .io()
                .wait(fd, Wait::Priority, Some(WORKER_POLL_INTERVAL))
            {
                Ok(false) => continue,
                Ok(true) => {}
                Err(e) => return Err(e.into()),
            }

            match device.deque_event() {
                Ok(event) => queue.push(event),
                Err(Error::Sys(Errno::EAGAIN)) => continue,
                Err(e) => return Err(e),
            }
        }

        Ok(())
    })();

    match result {
        Ok(()) => queue.finish(),
        Err(e) => queue.fail(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_drops_oldest_on_overflow() {
        let queue = SharedQueue::new(2, "frame");
        queue.push(1);
        queue.push(2);
        queue.push(3); // evicts 1

        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();
        rt.block_on(async {
            assert_eq!(queue.pop().await.unwrap(), 2);
            assert_eq!(queue.pop().await.unwrap(), 3);
        });
    }

    #[test]
    fn queue_reports_error_then_closes() {
        let queue: SharedQueue<u32> = SharedQueue::new(1, "frame");
        queue.push(7);
        queue.fail(Error::OutOfMemory);

        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();
        rt.block_on(async {
            assert_eq!(queue.pop().await.unwrap(), 7);
            assert!(matches!(queue.pop().await, Err(Error::OutOfMemory)));
            // after the error is consumed the queue reads as closed
            assert!(matches!(queue.pop().await, Err(Error::Closed)));
        });
    }

    #[test]
    fn queue_capacity_is_at_least_one() {
        let queue = SharedQueue::new(0, "frame");
        queue.push(1);
        assert_eq!(queue.lock().items.len(), 1);
    }
}
