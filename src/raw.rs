//! FFI definitions compatible with `videodev2.h`.
//!
//! These types do not provide a "Rusty" API and should not be exposed as public APIs.
//!
//! Every request defined here goes through a wrapper that leaves a `trace`-level log entry with
//! the request symbol and its outcome, so an ioctl-level transcript of a session can be obtained
//! by enabling trace logging for this module.

#![allow(bad_style)]

pub mod controls;

use std::os::raw::c_ulong;
use std::os::unix::prelude::RawFd;

use libc::{timespec, timeval};

use crate::buf_type::BufType;
use crate::pixel_format::PixelFormat;
use crate::shared::*;

pub const VIDEO_MAX_PLANES: usize = 8;

/// Value for `ExtControls::which` selecting the controls' current values.
pub const CTRL_WHICH_CUR_VAL: u32 = 0;

#[repr(C)]
#[derive(Debug)]
pub struct Capabilities {
    pub driver: [u8; 16],
    pub card: [u8; 32],
    pub bus_info: [u8; 32],
    pub version: u32,
    pub capabilities: CapabilityFlags,
    pub device_caps: CapabilityFlags,
    reserved: [u32; 3],
}

#[repr(C)]
pub struct FmtDesc {
    /// Number of the format in the enumeration, set by the application.
    pub index: u32,
    /// Type of the data stream, set by the application.
    pub type_: BufType,
    pub flags: FmtFlags,
    /// Description of the format, a NUL-terminated ASCII string.
    pub description: [u8; 32],
    /// The image format identifier (a packed *fourcc* code).
    pub pixel_format: PixelFormat,
    /// Media bus code restricting the enumerated formats; 0 unless the driver advertises
    /// `IO_MC`.
    pub mbus_code: u32,
    pub reserved: [u32; 3],
}

#[repr(C)]
pub struct Format {
    pub type_: BufType,
    pub fmt: FormatUnion,
}

#[repr(C)]
pub union FormatUnion {
    pub pix: PixFormat,
    pub pix_mp: PixFormatMplane,
    pub win: Window,
    pub raw_data: [u8; 200],
}

#[derive(Clone, Copy)]
#[repr(C)]
pub struct Clip {
    pub c: Rect,
    pub next: *mut Clip,
}

/// `v4l2_window`; carried in [`FormatUnion`] for overlay streams (and for the union's
/// kernel-matching 8-byte alignment).
#[derive(Clone, Copy)]
#[repr(C)]
pub struct Window {
    pub w: Rect,
    pub field: Field,
    pub chromakey: u32,
    pub clips: *mut Clip,
    pub clipcount: u32,
    pub bitmap: *mut std::ffi::c_void,
    pub global_alpha: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(C)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub width: u32,
    pub height: u32,
}

/// `v4l2_fract`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(C)]
pub struct Fract {
    pub numerator: u32,
    pub denominator: u32,
}

/// `v4l2_pix_format`
#[derive(Clone, Copy)]
#[repr(C)]
pub struct PixFormat {
    pub width: u32,
    pub height: u32,
    pub pixel_format: PixelFormat,
    pub field: Field,
    pub bytesperline: u32,
    pub sizeimage: u32,
    pub colorspace: Colorspace,
    pub priv_: u32,
    // Below fields are only valid if `priv_` equals `V4L2_PIX_FMT_PRIV_MAGIC`.
    pub flags: PixFmtFlag,
    pub enc: u32,
    pub quantization: Quantization,
    pub xfer_func: XferFunc,
}

#[derive(Clone, Copy)]
#[repr(C, packed)]
pub struct PlanePixFormat {
    pub sizeimage: u32,
    pub bytesperline: u32,
    pub reserved: [u16; 6],
}

#[derive(Clone, Copy)]
#[repr(C, packed)]
pub struct PixFormatMplane {
    pub width: u32,
    pub height: u32,
    pub pixel_format: PixelFormat,
    pub field: u32,
    pub colorspace: u32,
    pub plane_fmt: [PlanePixFormat; VIDEO_MAX_PLANES],
    pub num_planes: u8,
    pub flags: u8,
    pub enc: u8,
    pub quantization: u8,
    pub xfer_func: u8,
    pub reserved: [u8; 7],
}

#[repr(C)]
pub struct Input {
    pub index: u32,
    pub name: [u8; 32],
    pub type_: InputType,
    /// Associated audio inputs (bitfield).
    pub audioset: u32,
    pub tuner: u32,
    pub std: AnalogStd,
    pub status: InputStatus,
    pub capabilities: InputCapabilities,
    pub reserved: [u32; 3],
}

/// `v4l2_query_ext_ctrl`
#[repr(C)]
pub struct QueryExtCtrl {
    pub id: u32,
    pub type_: CtrlType,
    pub name: [u8; 32],
    pub minimum: i64,
    pub maximum: i64,
    pub step: u64,
    pub default_value: i64,
    pub flags: ControlFlags,
    pub elem_size: u32,
    pub elems: u32,
    pub nr_of_dims: u32,
    pub dims: [u32; 4],
    pub reserved: [u32; 32],
}

#[repr(C, packed)]
pub struct QueryMenu {
    pub id: u32,
    pub index: u32,
    pub name_or_value: QueryMenuUnion,
    pub reserved: u32,
}

#[repr(C)]
pub union QueryMenuUnion {
    pub name: [u8; 32],
    pub value: i64,
}

/// `v4l2_ext_control`
#[repr(C, packed)]
pub struct ExtControl {
    pub id: u32,
    pub size: u32,
    pub reserved2: [u32; 1],
    pub value: ExtControlUnion,
}

#[repr(C)]
pub union ExtControlUnion {
    pub value: i32,
    pub value64: i64,
    pub p_u8: *mut u8,
    pub p_u16: *mut u16,
    pub p_u32: *mut u32,
    pub ptr: *mut std::ffi::c_void,
}

/// `v4l2_ext_controls`
#[repr(C)]
pub struct ExtControls {
    pub which: u32,
    pub count: u32,
    pub error_idx: u32,
    pub request_fd: i32,
    pub reserved: [u32; 1],
    pub controls: *mut ExtControl,
}

#[derive(Debug)]
#[repr(C)]
pub struct RequestBuffers {
    pub count: u32,
    pub type_: BufType,
    pub memory: Memory,
    pub capabilities: BufCap,
    pub reserved: [u32; 1],
}

#[derive(Clone, Copy)]
#[repr(C)]
pub struct Timecode {
    pub type_: TimecodeType,
    pub flags: TimecodeFlags,
    pub frames: u8,
    pub seconds: u8,
    pub minutes: u8,
    pub hours: u8,
    pub userbits: [u8; 4],
}

#[repr(C)]
pub struct Buffer {
    pub index: u32,
    pub type_: BufType,
    pub bytesused: u32,
    pub flags: BufFlag,
    pub field: u32,
    pub timestamp: timeval,
    pub timecode: Timecode,
    pub sequence: u32,
    pub memory: Memory,
    pub m: BufferMemoryUnion,
    pub length: u32,
    pub reserved2: u32,
    pub tail: BufferTailUnion,
}

#[repr(C)]
pub union BufferMemoryUnion {
    pub offset: u32,
    pub userptr: c_ulong,
    pub planes: *mut Plane,
    pub fd: i32,
}

#[repr(C)]
pub union BufferTailUnion {
    pub request_fd: i32,
    pub reserved: u32,
}

#[repr(C)]
pub struct Plane {
    pub bytesused: u32,
    pub length: u32,
    pub m: PlaneMemoryUnion,
    pub data_offset: u32,
    pub reserved: [u32; 11],
}

#[repr(C)]
pub union PlaneMemoryUnion {
    pub mem_offset: u32,
    pub userptr: c_ulong,
    pub fd: i32,
}

#[repr(C)]
pub struct FrmSizeEnum {
    pub index: u32,
    pub pixel_format: PixelFormat,
    pub type_: FrmSizeType,
    pub union: FrmSizeUnion,
    pub reserved: [u32; 2],
}

#[repr(C)]
pub union FrmSizeUnion {
    pub discrete: FrmSizeDiscrete,
    pub stepwise: FrmSizeStepwise,
}

#[derive(Clone, Copy)]
#[repr(C)]
pub struct FrmSizeDiscrete {
    pub width: u32,
    pub height: u32,
}

#[derive(Clone, Copy)]
#[repr(C)]
pub struct FrmSizeStepwise {
    pub min_width: u32,
    pub max_width: u32,
    pub step_width: u32,
    pub min_height: u32,
    pub max_height: u32,
    pub step_height: u32,
}

#[repr(C)]
pub struct FrmIvalEnum {
    pub index: u32,
    pub pixel_format: PixelFormat,
    pub width: u32,
    pub height: u32,
    pub type_: FrmIvalType,
    pub union: FrmIvalUnion,
    pub reserved: [u32; 2],
}

#[repr(C)]
pub union FrmIvalUnion {
    pub discrete: Fract,
    pub stepwise: FrmIvalStepwise,
}

#[derive(Clone, Copy)]
#[repr(C)]
pub struct FrmIvalStepwise {
    pub min: Fract,
    pub max: Fract,
    pub step: Fract,
}

#[repr(C)]
pub struct StreamParm {
    pub type_: BufType,
    pub union: StreamParmUnion,
}

#[repr(C)]
pub union StreamParmUnion {
    pub capture: CaptureParm,
    pub output: OutputParm,
    pub raw_data: [u8; 200],
}

#[derive(Clone, Copy)]
#[repr(C)]
pub struct CaptureParm {
    pub capability: StreamParamCaps,
    pub capturemode: CaptureParamFlags,
    pub timeperframe: Fract,
    pub extendedmode: u32,
    pub readbuffers: u32,
    pub reserved: [u32; 4],
}

#[derive(Clone, Copy)]
#[repr(C)]
pub struct OutputParm {
    pub capability: StreamParamCaps,
    pub outputmode: u32,
    pub timeperframe: Fract,
    pub extendedmode: u32,
    pub writebuffers: u32,
    pub reserved: [u32; 4],
}

#[repr(C)]
pub struct CropCap {
    pub type_: BufType,
    pub bounds: Rect,
    pub defrect: Rect,
    pub pixelaspect: Fract,
}

#[repr(C)]
pub struct Selection {
    pub type_: BufType,
    pub target: SelectionTarget,
    pub flags: u32,
    pub r: Rect,
    pub reserved: [u32; 9],
}

#[repr(C)]
pub struct EventSubscription {
    pub type_: EventType,
    pub id: u32,
    pub flags: EventSubFlags,
    pub reserved: [u32; 5],
}

#[repr(C)]
pub struct Event {
    pub type_: EventType,
    pub u: EventDataUnion,
    pub pending: u32,
    pub sequence: u32,
    pub timestamp: timespec,
    pub id: u32,
    pub reserved: [u32; 8],
}

/// The event payload; 64 bytes, 8-aligned like the kernel's union (whose `ctrl` member
/// contains an `__s64`).
#[repr(C)]
pub union EventDataUnion {
    pub data: [u8; 64],
    align: [u64; 8],
}

/// Declares the `VIDIOC_*` requests used by this library.
///
/// Each request is generated via the matching `nix` ioctl macro and wrapped so that calls emit a
/// `trace` log line with the request symbol and result.
macro_rules! vidioc {
    ( $( $kind:ident $name:ident = $nr:expr => $ty:ty; )+ ) => {
        mod ffi {
            use super::*;
            $( vidioc!(@def $kind $name, $nr, $ty); )+
        }

        $(
            pub unsafe fn $name(fd: RawFd, arg: vidioc!(@arg $kind $ty)) -> nix::Result<libc::c_int> {
                let res = ffi::$name(fd, arg);
                log::trace!("VIDIOC_{} fd={} -> {:?}", stringify!($name).to_uppercase(), fd, res);
                res
            }
        )+
    };

    (@def read $name:ident, $nr:expr, $ty:ty) => { nix::ioctl_read!($name, 'V', $nr, $ty); };
    (@def readwrite $name:ident, $nr:expr, $ty:ty) => { nix::ioctl_readwrite!($name, 'V', $nr, $ty); };
    (@def write_ptr $name:ident, $nr:expr, $ty:ty) => { nix::ioctl_write_ptr!($name, 'V', $nr, $ty); };

    (@arg read $ty:ty) => { *mut $ty };
    (@arg readwrite $ty:ty) => { *mut $ty };
    (@arg write_ptr $ty:ty) => { *const $ty };
}

vidioc! {
    read      querycap            = 0   => Capabilities;
    readwrite enum_fmt            = 2   => FmtDesc;
    readwrite g_fmt               = 4   => Format;
    readwrite s_fmt               = 5   => Format;
    readwrite reqbufs             = 8   => RequestBuffers;
    readwrite querybuf            = 9   => Buffer;
    readwrite qbuf                = 15  => Buffer;
    readwrite dqbuf               = 17  => Buffer;
    write_ptr streamon            = 18  => BufType;
    write_ptr streamoff           = 19  => BufType;
    readwrite g_parm              = 21  => StreamParm;
    readwrite s_parm              = 22  => StreamParm;
    readwrite enuminput           = 26  => Input;
    readwrite g_ctrl              = 27  => controls::Control;
    readwrite s_ctrl              = 28  => controls::Control;
    readwrite querymenu           = 37  => QueryMenu;
    readwrite cropcap             = 58  => CropCap;
    read      g_priority          = 67  => Priority;
    write_ptr s_priority          = 68  => Priority;
    readwrite g_ext_ctrls         = 71  => ExtControls;
    readwrite s_ext_ctrls         = 72  => ExtControls;
    readwrite enum_framesizes     = 74  => FrmSizeEnum;
    readwrite enum_frameintervals = 75  => FrmIvalEnum;
    read      dqevent             = 89  => Event;
    write_ptr subscribe_event     = 90  => EventSubscription;
    write_ptr unsubscribe_event   = 91  => EventSubscription;
    readwrite g_selection         = 94  => Selection;
    readwrite s_selection         = 95  => Selection;
    readwrite query_ext_ctrl      = 103 => QueryExtCtrl;
}
