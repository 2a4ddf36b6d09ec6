//! The V4L2 event channel.
//!
//! Events are subscribed per descriptor and dequeued with `DQEVENT`; readiness for pending
//! events is signalled through `POLLPRI` (see [`Wait::Priority`][crate::io::Wait]).

use std::mem;

use crate::device::Device;
use crate::raw;
use crate::shared::{EventSubFlags, EventType};
use crate::Result;

/// A dequeued V4L2 event.
#[derive(Debug, Clone)]
pub struct Event {
    pub event_type: EventType,
    /// Number of events still pending after this one was dequeued.
    pub pending: u32,
    pub sequence: u32,
    /// Id of the object the event belongs to (a control id for `CTRL` events, 0 otherwise).
    pub id: u32,
    timestamp_secs: i64,
    timestamp_nsecs: i64,
    /// Raw event payload; interpretation depends on `event_type`.
    pub data: [u8; 64],
}

impl Event {
    /// The event timestamp in seconds.
    pub fn timestamp(&self) -> f64 {
        self.timestamp_secs as f64 + self.timestamp_nsecs as f64 * 1e-9
    }
}

impl Device {
    /// Subscribes the descriptor to events of `event_type`.
    ///
    /// For control events, `id` selects the control; pass 0 for event types that are not tied
    /// to an object.
    pub fn subscribe_event(
        &self,
        event_type: EventType,
        id: u32,
        flags: EventSubFlags,
    ) -> Result<()> {
        let fd = self.fd()?;
        let sub = raw::EventSubscription {
            type_: event_type,
            id,
            flags,
            reserved: [0; 5],
        };
        unsafe {
            raw::subscribe_event(fd, &sub)?;
        }
        Ok(())
    }

    /// Cancels a subscription made with [`Device::subscribe_event`].
    ///
    /// [`EventType::ALL`] removes every subscription of this descriptor.
    pub fn unsubscribe_event(&self, event_type: EventType, id: u32) -> Result<()> {
        let fd = self.fd()?;
        let sub = raw::EventSubscription {
            type_: event_type,
            id,
            flags: EventSubFlags::empty(),
            reserved: [0; 5],
        };
        unsafe {
            raw::unsubscribe_event(fd, &sub)?;
        }
        Ok(())
    }

    /// Dequeues the next pending event.
    ///
    /// On a non-blocking descriptor this fails with `EAGAIN` when no event is pending; wait for
    /// priority readiness first (or use the async event reader).
    pub fn deque_event(&self) -> Result<Event> {
        let fd = self.fd()?;
        let raw = unsafe {
            let mut raw: raw::Event = mem::zeroed();
            raw::dqevent(fd, &mut raw)?;
            raw
        };

        Ok(Event {
            event_type: raw.type_,
            pending: raw.pending,
            sequence: raw.sequence,
            id: raw.id,
            timestamp_secs: raw.timestamp.tv_sec,
            timestamp_nsecs: raw.timestamp.tv_nsec,
            data: unsafe { raw.u.data },
        })
    }
}
