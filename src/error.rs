use nix::errno::Errno;
use thiserror::Error;

use crate::buf_type::BufType;
use crate::shared::Memory;

/// The error type for interactions with this library.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// An operation that needs an open descriptor was invoked on a closed device.
    #[error("device is not open")]
    Closed,
    /// `open` was called on a device that already holds a descriptor.
    #[error("device is already open")]
    AlreadyOpen,
    /// A buffer queue was requested while one already exists.
    #[error("streaming buffers are already created")]
    BuffersAlreadyCreated,
    /// A streaming operation was invoked before the buffer queue was created.
    #[error("streaming buffers have not been created")]
    BuffersNotCreated,
    /// `REQBUFS` succeeded but the driver allocated no buffers.
    #[error("the driver could not allocate any buffer memory")]
    OutOfMemory,
    /// The kernel returned an error code; the errno is preserved verbatim.
    #[error("{0}")]
    Sys(#[from] Errno),
    /// A value could not be coerced into what the target control expects.
    #[error("cannot interpret {value:?} as a value for control {control:?}")]
    InvalidValue { control: String, value: String },
    /// A numeric control with clipping disabled received an out-of-range value.
    #[error("value {value} is outside of the allowed range [{min}, {max}]")]
    OutOfRange { value: i64, min: i64, max: i64 },
    /// No control matches the given id or name.
    #[error("no control with id or name {0:?}")]
    NotFound(String),
    /// The control's flags make it non-writable.
    #[error("control {0:?} is not writable")]
    NotWritable(String),
    /// The operation does not apply to this buffer type.
    #[error("unsupported buffer type {0:?}")]
    UnsupportedBufferType(BufType),
    /// Only `MMAP` streaming I/O is implemented.
    #[error("unsupported memory class {0:?}")]
    UnsupportedMemory(Memory),
    /// A configuration file is malformed or incomplete.
    #[error("configuration: {0}")]
    Configuration(String),
    /// A configuration file does not belong to this device.
    #[error("configuration does not match device: {0}")]
    Compatibility(String),
    /// The device state diverged from an applied configuration.
    #[error("device state does not match configuration: {0}")]
    DeviceState(String),
    /// An underlying I/O error has occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// The result type for interactions with this library.
pub type Result<T> = std::result::Result<T, Error>;
