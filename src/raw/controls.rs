ffi_enum! {
    /// The V4L2 grouping used to organise tunable device parameters.
    pub enum CtrlClass: u32 {
        USER            = 0x00980000,
        CODEC           = 0x00990000,
        CAMERA          = 0x009a0000,
        FM_TX           = 0x009b0000,
        FLASH           = 0x009c0000,
        JPEG            = 0x009d0000,
        IMAGE_SOURCE    = 0x009e0000,
        IMAGE_PROC      = 0x009f0000,
        DV              = 0x00a00000,
        FM_RX           = 0x00a10000,
        RF_TUNER        = 0x00a20000,
        DETECT          = 0x00a30000,
        CODEC_STATELESS = 0x00a40000,
        COLORIMETRY     = 0x00a50000,
    }
}

impl CtrlClass {
    /// Extracts the control class from a control id.
    pub fn from_cid(cid: Cid) -> Self {
        Self(cid.0 & 0x0fff_0000)
    }
}

ffi_enum! {
    /// Identifies a device control.
    ///
    /// This type has associated constants to refer to standard controls with predefined meanings,
    /// but drivers can add their own driver-specific controls as well.
    pub enum Cid: u32 {
        BRIGHTNESS                = Self::BASE.0 + 0, // comes first so it shows up in debug output
        /// User-class control base ID.
        BASE                      = CtrlClass::USER.0 | 0x900,
        CONTRAST                  = Self::BASE.0 + 1,
        SATURATION                = Self::BASE.0 + 2,
        HUE                       = Self::BASE.0 + 3,
        AUDIO_VOLUME              = Self::BASE.0 + 5,
        AUDIO_MUTE                = Self::BASE.0 + 9,
        AUTO_WHITE_BALANCE        = Self::BASE.0 + 12,
        DO_WHITE_BALANCE          = Self::BASE.0 + 13,
        RED_BALANCE               = Self::BASE.0 + 14,
        BLUE_BALANCE              = Self::BASE.0 + 15,
        GAMMA                     = Self::BASE.0 + 16,
        EXPOSURE                  = Self::BASE.0 + 17,
        AUTOGAIN                  = Self::BASE.0 + 18,
        GAIN                      = Self::BASE.0 + 19,
        HFLIP                     = Self::BASE.0 + 20,
        VFLIP                     = Self::BASE.0 + 21,
        POWER_LINE_FREQUENCY      = Self::BASE.0 + 24,
        HUE_AUTO                  = Self::BASE.0 + 25,
        WHITE_BALANCE_TEMPERATURE = Self::BASE.0 + 26,
        SHARPNESS                 = Self::BASE.0 + 27,
        BACKLIGHT_COMPENSATION    = Self::BASE.0 + 28,
        COLORFX                   = Self::BASE.0 + 31,
        AUTOBRIGHTNESS            = Self::BASE.0 + 32,
        ROTATE                    = Self::BASE.0 + 34,
        ALPHA_COMPONENT           = Self::BASE.0 + 41,

        /// Camera-class control base ID.
        CAMERA_CLASS_BASE         = CtrlClass::CAMERA.0 | 0x900,
        EXPOSURE_AUTO             = Self::CAMERA_CLASS_BASE.0 + 1,
        EXPOSURE_ABSOLUTE         = Self::CAMERA_CLASS_BASE.0 + 2,
        EXPOSURE_AUTO_PRIORITY    = Self::CAMERA_CLASS_BASE.0 + 3,
        PAN_RELATIVE              = Self::CAMERA_CLASS_BASE.0 + 4,
        TILT_RELATIVE             = Self::CAMERA_CLASS_BASE.0 + 5,
        PAN_RESET                 = Self::CAMERA_CLASS_BASE.0 + 6,
        TILT_RESET                = Self::CAMERA_CLASS_BASE.0 + 7,
        PAN_ABSOLUTE              = Self::CAMERA_CLASS_BASE.0 + 8,
        TILT_ABSOLUTE             = Self::CAMERA_CLASS_BASE.0 + 9,
        FOCUS_ABSOLUTE            = Self::CAMERA_CLASS_BASE.0 + 10,
        FOCUS_RELATIVE            = Self::CAMERA_CLASS_BASE.0 + 11,
        FOCUS_AUTO                = Self::CAMERA_CLASS_BASE.0 + 12,
        ZOOM_ABSOLUTE             = Self::CAMERA_CLASS_BASE.0 + 13,
        ZOOM_RELATIVE             = Self::CAMERA_CLASS_BASE.0 + 14,
        ZOOM_CONTINUOUS           = Self::CAMERA_CLASS_BASE.0 + 15,
        PRIVACY                   = Self::CAMERA_CLASS_BASE.0 + 16,
        PAN_SPEED                 = Self::CAMERA_CLASS_BASE.0 + 32,
        TILT_SPEED                = Self::CAMERA_CLASS_BASE.0 + 33,
        CAMERA_ORIENTATION        = Self::CAMERA_CLASS_BASE.0 + 34,
        CAMERA_SENSOR_ROTATION    = Self::CAMERA_CLASS_BASE.0 + 35,
    }
}

/// `v4l2_control`: value exchange for controls that fit in an `i32`.
#[repr(C)]
pub struct Control {
    pub id: Cid,
    pub value: i32,
}
