//! FFI-compatible types that may also be exposed to Rust code.

use bitflags::bitflags;

ffi_enum! {
    pub enum InputType: u32 {
        TUNER = 1,
        CAMERA = 2,
        TOUCH = 3,
    }
}

ffi_enum! {
    pub enum Colorspace: u32 {
        DEFAULT        = 0,
        SMPTE170M      = 1,
        SMPTE240M      = 2,
        REC709         = 3,
        BT878          = 4,
        _470_SYSTEM_M  = 5,
        _470_SYSTEM_BG = 6,
        JPEG           = 7,
        SRGB           = 8,
        OPRGB          = 9,
        BT2020         = 10,
        RAW            = 11,
        DCI_P3         = 12,
    }
}

ffi_enum! {
    pub enum Quantization: u32 {
        DEFAULT    = 0,
        FULL_RANGE = 1,
        LIM_RANGE  = 2,
    }
}

ffi_enum! {
    pub enum XferFunc: u32 {
        DEFAULT   = 0,
        _709      = 1,
        SRGB      = 2,
        OPRGB     = 3,
        SMPTE240M = 4,
        NONE      = 5,
        DCI_P3    = 6,
        SMPTE2084 = 7,
    }
}

ffi_enum! {
    pub enum Field: u32 {
        /// Lets the driver choose.
        ANY           = 0,
        /// Don't use fields.
        NONE          = 1,
        TOP           = 2,
        BOTTOM        = 3,
        INTERLACED    = 4,
        SEQ_TB        = 5,
        SEQ_BT        = 6,
        ALTERNATE     = 7,
        INTERLACED_TB = 8,
        INTERLACED_BT = 9,
    }
}

ffi_enum! {
    /// The value type of a device control.
    pub enum CtrlType: u32 {
        INTEGER      = 1,
        BOOLEAN      = 2,
        MENU         = 3,
        BUTTON       = 4,
        INTEGER64    = 5,
        CTRL_CLASS   = 6,
        STRING       = 7,
        BITMASK      = 8,
        INTEGER_MENU = 9,

        U8           = 0x0100,
        U16          = 0x0101,
        U32          = 0x0102,
        AREA         = 0x0106,
    }
}

ffi_enum! {
    /// How the pages of a streaming buffer are exchanged with the kernel.
    ///
    /// Only [`Memory::MMAP`] is implemented by this library.
    pub enum Memory: u32 {
        MMAP    = 1,
        USERPTR = 2,
        OVERLAY = 3,
        DMABUF  = 4,
    }
}

ffi_enum! {
    pub enum TimecodeType: u32 {
        T_24FPS = 1,
        T_25FPS = 2,
        T_30FPS = 3,
        T_50FPS = 4,
        T_60FPS = 5,
    }
}

ffi_enum! {
    /// How a frame size enumeration describes its sizes.
    pub enum FrmSizeType: u32 {
        DISCRETE   = 1,
        CONTINUOUS = 2,
        STEPWISE   = 3,
    }
}

ffi_enum! {
    /// How a frame interval enumeration describes its intervals.
    pub enum FrmIvalType: u32 {
        DISCRETE   = 1,
        CONTINUOUS = 2,
        STEPWISE   = 3,
    }
}

ffi_enum! {
    /// Scheduling priority of an opened device handle.
    pub enum Priority: u32 {
        UNSET       = 0,
        BACKGROUND  = 1,
        INTERACTIVE = 2,
        RECORD      = 3,
    }
}

ffi_enum! {
    /// Selection rectangle targets for `get_selection`/`set_selection`.
    pub enum SelectionTarget: u32 {
        CROP           = 0x0000,
        CROP_DEFAULT   = 0x0001,
        CROP_BOUNDS    = 0x0002,
        NATIVE_SIZE    = 0x0003,
        COMPOSE        = 0x0100,
        COMPOSE_DEFAULT = 0x0101,
        COMPOSE_BOUNDS = 0x0102,
        COMPOSE_PADDED = 0x0103,
    }
}

ffi_enum! {
    /// Kind of a V4L2 event.
    pub enum EventType: u32 {
        ALL           = 0,
        VSYNC         = 1,
        EOS           = 2,
        CTRL          = 3,
        FRAME_SYNC    = 4,
        SOURCE_CHANGE = 5,
        MOTION_DET    = 6,
    }
}

bitflags! {
    /// Flags attached to a control descriptor.
    #[repr(transparent)]
    pub struct ControlFlags: u32 {
        const DISABLED         = 0x0001;
        const GRABBED          = 0x0002;
        const READ_ONLY        = 0x0004;
        const UPDATE           = 0x0008;
        const INACTIVE         = 0x0010;
        const SLIDER           = 0x0020;
        const WRITE_ONLY       = 0x0040;
        const VOLATILE         = 0x0080;
        const HAS_PAYLOAD      = 0x0100;
        const EXECUTE_ON_WRITE = 0x0200;
        const MODIFY_LAYOUT    = 0x0400;

        const NEXT_CTRL        = 0x80000000;
        const NEXT_COMPOUND    = 0x40000000;
    }
}

bitflags! {
    #[repr(transparent)]
    pub struct FmtFlags: u32 {
        /// This is a compressed format.
        const COMPRESSED             = 0x0001;
        /// This format is not native to the device but emulated through software.
        const EMULATED               = 0x0002;
        const CONTINUOUS_BYTESTREAM  = 0x0004;
        const DYN_RESOLUTION         = 0x0008;
        const ENC_CAP_FRAME_INTERVAL = 0x0010;
        const CSC_COLORSPACE         = 0x0020;
        const CSC_XFER_FUNC          = 0x0040;
        const CSC_YCBCR_ENC          = 0x0080;
        const CSC_HSV_ENC            = Self::CSC_YCBCR_ENC.bits;
        const CSC_QUANTIZATION       = 0x0100;
    }
}

bitflags! {
    #[repr(transparent)]
    pub struct AnalogStd: u64 { // NB: this is v4l2_std_id
        const PAL_B       = 0x0000001;
        const PAL_B1      = 0x0000002;
        const PAL_G       = 0x0000004;
        const PAL_H       = 0x0000008;
        const PAL_I       = 0x0000010;
        const PAL_D       = 0x0000020;
        const PAL_D1      = 0x0000040;
        const PAL_K       = 0x0000080;

        const PAL_M       = 0x0000100;
        const PAL_N       = 0x0000200;
        const PAL_NC      = 0x0000400;
        const PAL_60      = 0x0000800;

        const NTSC_M      = 0x00001000;
        const NTSC_M_JP   = 0x00002000;
        const NTSC_443    = 0x00004000;
        const NTSC_M_KR   = 0x00008000;

        const SECAM_B     = 0x00010000;
        const SECAM_D     = 0x00020000;
        const SECAM_G     = 0x00040000;
        const SECAM_H     = 0x00080000;
        const SECAM_K     = 0x00100000;
        const SECAM_K1    = 0x00200000;
        const SECAM_L     = 0x00400000;
        const SECAM_LC    = 0x00800000;

        const ATSC_8_VSB  = 0x01000000;
        const ATSC_16_VSB = 0x02000000;
    }
}

bitflags! {
    #[repr(transparent)]
    pub struct InputCapabilities: u32 {
        /// This input supports setting video timings by using VIDIOC_S_DV_TIMINGS.
        const DV_TIMINGS     = 0x00000002;
        const CUSTOM_TIMINGS = Self::DV_TIMINGS.bits;
        /// This input supports setting the TV standard by using VIDIOC_S_STD.
        const STD            = 0x00000004;
        /// This input supports setting the native size via the NATIVE_SIZE selection target.
        const NATIVE_SIZE    = 0x00000008;
    }
}

bitflags! {
    /// Device capabilities.
    #[repr(transparent)]
    pub struct CapabilityFlags: u32 {
        /// The device supports the single-planar API through the Video Capture interface.
        const VIDEO_CAPTURE        = 0x00000001;
        /// The device supports the single-planar API through the Video Output interface.
        const VIDEO_OUTPUT         = 0x00000002;
        /// The device supports the Video Overlay interface.
        const VIDEO_OVERLAY        = 0x00000004;
        /// The device supports the Raw VBI Capture interface.
        const VBI_CAPTURE          = 0x00000010;
        /// The device supports the Raw VBI Output interface.
        const VBI_OUTPUT           = 0x00000020;
        /// The device supports the Sliced VBI Capture interface.
        const SLICED_VBI_CAPTURE   = 0x00000040;
        /// The device supports the Sliced VBI Output interface.
        const SLICED_VBI_OUTPUT    = 0x00000080;
        /// The device supports the Radio Data System capture interface.
        const RDS_CAPTURE          = 0x00000100;
        /// The device supports the Video Output Overlay (OSD) interface.
        const VIDEO_OUTPUT_OVERLAY = 0x00000200;
        /// The device supports the VIDIOC_S_HW_FREQ_SEEK ioctl for hardware frequency seeking.
        const HW_FREQ_SEEK         = 0x00000400;
        /// The device supports the RDS output interface.
        const RDS_OUTPUT           = 0x00000800;

        /// The device supports the multi-planar API through the Video Capture interface.
        const VIDEO_CAPTURE_MPLANE = 0x00001000;
        /// The device supports the multi-planar API through the Video Output interface.
        const VIDEO_OUTPUT_MPLANE  = 0x00002000;
        /// The device supports the multi-planar API through the Video Memory-To-Memory interface.
        const VIDEO_M2M_MPLANE     = 0x00004000;
        /// The device supports the single-planar API through the Video Memory-To-Memory interface.
        const VIDEO_M2M            = 0x00008000;

        /// The device has some sort of tuner to receive RF-modulated video signals.
        const TUNER                = 0x00010000;
        /// The device has audio inputs or outputs.
        const AUDIO                = 0x00020000;
        /// This is a radio receiver.
        const RADIO                = 0x00040000;
        /// The device has some sort of modulator to emit RF-modulated video/audio signals.
        const MODULATOR            = 0x00080000;

        /// The device supports the SDR Capture interface.
        const SDR_CAPTURE          = 0x00100000;
        /// The device supports the struct v4l2_pix_format extended fields.
        const EXT_PIX_FORMAT       = 0x00200000;
        /// The device supports the SDR Output interface.
        const SDR_OUTPUT           = 0x00400000;
        /// The device supports the Metadata Interface capture interface.
        const META_CAPTURE         = 0x00800000;

        /// The device supports the `read()` and/or `write()` I/O methods.
        const READWRITE            = 0x01000000;
        /// The device supports the asynchronous I/O methods.
        const ASYNCIO              = 0x02000000;
        /// The device supports (some of) the streaming I/O methods.
        const STREAMING            = 0x04000000;
        /// The device supports the Metadata Interface output interface.
        const META_OUTPUT          = 0x08000000;

        /// This is a touch device.
        const TOUCH                = 0x10000000;
        /// There is only one input and/or output seen from userspace.
        const IO_MC                = 0x20000000;
        /// The driver fills the `device_caps` field.
        const DEVICE_CAPS          = 0x80000000;
    }
}

bitflags! {
    #[repr(transparent)]
    pub struct InputStatus: u32 {
        const NO_POWER   = 0x00000001;
        const NO_SIGNAL  = 0x00000002;
        const NO_COLOR   = 0x00000004;

        const HFLIP      = 0x00000010;
        const VFLIP      = 0x00000020;

        const NO_H_LOCK   = 0x00000100;
        const COLOR_KILL  = 0x00000200;
        const NO_V_LOCK   = 0x00000400;
        const NO_STD_LOCK = 0x00000800;

        const NO_SYNC     = 0x00010000;
        const NO_EQU      = 0x00020000;
        const NO_CARRIER  = 0x00040000;

        const MACROVISION = 0x01000000;
        const NO_ACCESS   = 0x02000000;
        const VTR         = 0x04000000;
    }
}

bitflags! {
    #[repr(transparent)]
    pub struct PixFmtFlag: u32 {
        const PREMUL_ALPHA = 0x00000001;
        const SET_CSC      = 0x00000002;
    }
}

bitflags! {
    #[repr(transparent)]
    pub struct BufCap: u32 {
        const SUPPORTS_MMAP                 = 1 << 0;
        const SUPPORTS_USERPTR              = 1 << 1;
        const SUPPORTS_DMABUF               = 1 << 2;
        const SUPPORTS_REQUESTS             = 1 << 3;
        const SUPPORTS_ORPHANED_BUFS        = 1 << 4;
        const SUPPORTS_M2M_HOLD_CAPTURE_BUF = 1 << 5;
        const SUPPORTS_MMAP_CACHE_HINTS     = 1 << 6;
    }
}

bitflags! {
    /// Flags describing the state of a streaming buffer.
    #[repr(transparent)]
    pub struct BufFlag: u32 {
        const MAPPED               = 0x00000001;
        const QUEUED               = 0x00000002;
        const DONE                 = 0x00000004;
        const KEYFRAME             = 0x00000008;
        const PFRAME               = 0x00000010;
        const BFRAME               = 0x00000020;
        const ERROR                = 0x00000040;
        const IN_REQUEST           = 0x00000080;
        const TIMECODE             = 0x00000100;
        const M2M_HOLD_CAPTURE_BUF = 0x00000200;
        const PREPARED             = 0x00000400;
        const NO_CACHE_INVALIDATE  = 0x00000800;
        const NO_CACHE_CLEAN       = 0x00001000;
        const TIMESTAMP_MASK       = 0x0000e000;
        const TIMESTAMP_UNKNOWN    = 0x00000000;
        const TIMESTAMP_MONOTONIC  = 0x00002000;
        const TIMESTAMP_COPY       = 0x00004000;
        const TIMESTAMP_SRC_MASK   = 0x00070000;
        const TIMESTAMP_SRC_EOF    = 0x00000000;
        const TIMESTAMP_SRC_SOE    = 0x00010000;
        const LAST                 = 0x00100000;
        const REQUEST_FD           = 0x00800000;
    }
}

bitflags! {
    #[repr(transparent)]
    pub struct TimecodeFlags: u32 {
        const DROPFRAME            = 0x0001;
        const COLORFRAME           = 0x0002;
        const USERBITS_MASK        = 0x000C;
        const USERBITS_USERDEFINED = 0x0000;
        const USERBITS_8BITCHARS   = 0x0008;
    }
}

bitflags! {
    #[repr(transparent)]
    pub struct StreamParamCaps: u32 {
        const TIMEPERFRAME = 0x1000;
    }
}

bitflags! {
    #[repr(transparent)]
    pub struct CaptureParamFlags: u32 {
        const HIGHQUALITY = 0x0001;
    }
}

bitflags! {
    #[repr(transparent)]
    pub struct EventSubFlags: u32 {
        const SEND_INITIAL    = 1 << 0;
        const ALLOW_FEEDBACK  = 1 << 1;
    }
}
