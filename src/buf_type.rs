use bitflags::bitflags;

use crate::shared::CapabilityFlags;

macro_rules! buf_types {
    (
        $( $(#[$($attr:tt)+])* $name:ident = $value:literal, )+
    ) => {
        ffi_enum! {
            /// A buffer or stream type.
            pub enum BufType: u32 { // more of a "stream type", really
                $( $(#[$($attr)+])* $name = $value, )+
            }
        }

        impl BufType {
            pub(crate) const ALL: &'static [Self] = &[
                $( Self::$name, )+
            ];
        }

        bitflags! {
            /// Bitflags of supported buffer types.
            pub struct BufTypes: u32 {
                $( $(#[$($attr)+])* const $name = 1 << $value; )+
            }
        }

        impl BufTypes {
            const CAPS: &'static [CapabilityFlags] = &[
                $( CapabilityFlags::$name, )+
            ];
        }
    };
}

buf_types! {
    /// Single-plane video capture.
    VIDEO_CAPTURE = 1,
    /// Single-plane video output.
    VIDEO_OUTPUT = 2,
    VIDEO_OVERLAY = 3,
    VBI_CAPTURE = 4,
    VBI_OUTPUT = 5,
    SLICED_VBI_CAPTURE = 6,
    SLICED_VBI_OUTPUT = 7,
    VIDEO_OUTPUT_OVERLAY = 8,
    VIDEO_CAPTURE_MPLANE = 9,
    VIDEO_OUTPUT_MPLANE = 10,
    SDR_CAPTURE = 11,
    SDR_OUTPUT = 12,
    /// Metadata capture.
    META_CAPTURE = 13,
    /// Metadata output.
    META_OUTPUT = 14,
}

impl BufType {
    /// The stream types that carry image formats and can be enumerated via `ENUM_FMT`.
    pub(crate) const IMAGE_STREAMS: &'static [Self] = &[
        Self::VIDEO_CAPTURE,
        Self::VIDEO_CAPTURE_MPLANE,
        Self::VIDEO_OUTPUT,
        Self::VIDEO_OUTPUT_MPLANE,
        Self::VIDEO_OVERLAY,
    ];

    /// Whether this is one of the capture stream types.
    pub fn is_capture(self) -> bool {
        matches!(
            self,
            Self::VIDEO_CAPTURE
                | Self::VIDEO_CAPTURE_MPLANE
                | Self::VBI_CAPTURE
                | Self::SLICED_VBI_CAPTURE
                | Self::SDR_CAPTURE
                | Self::META_CAPTURE
        )
    }

    /// Whether this is one of the output stream types.
    pub fn is_output(self) -> bool {
        matches!(
            self,
            Self::VIDEO_OUTPUT
                | Self::VIDEO_OUTPUT_MPLANE
                | Self::VBI_OUTPUT
                | Self::SLICED_VBI_OUTPUT
                | Self::SDR_OUTPUT
                | Self::META_OUTPUT
        )
    }
}

impl BufTypes {
    /// Derives the set of supported buffer types from a device's capabilities.
    pub fn from_capabilities(caps: CapabilityFlags) -> Self {
        let mut buf_types = BufTypes::empty();
        for (i, cap) in Self::CAPS.iter().enumerate() {
            if caps.contains(*cap) {
                buf_types |= BufTypes::from_bits(1 << (i + 1)).unwrap();
            }
        }

        buf_types
    }
}

impl IntoIterator for BufTypes {
    type Item = BufType;
    type IntoIter = BufTypesIter;

    fn into_iter(self) -> Self::IntoIter {
        BufTypesIter {
            buf_types: self,
            index: 0,
        }
    }
}

/// Iterator over the [`BufType`]s stored in a [`BufTypes`] value.
pub struct BufTypesIter {
    buf_types: BufTypes,
    index: u32,
}

impl Iterator for BufTypesIter {
    type Item = BufType;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.index += 1;

            if self
                .buf_types
                .contains(BufTypes::from_bits(1 << self.index)?)
            {
                return Some(BufType::ALL[self.index as usize - 1]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buf_types_from_capabilities() {
        let caps = CapabilityFlags::VIDEO_CAPTURE
            | CapabilityFlags::META_CAPTURE
            | CapabilityFlags::STREAMING;
        let types = BufTypes::from_capabilities(caps);
        assert_eq!(types, BufTypes::VIDEO_CAPTURE | BufTypes::META_CAPTURE);
        assert_eq!(
            types.into_iter().collect::<Vec<_>>(),
            &[BufType::VIDEO_CAPTURE, BufType::META_CAPTURE],
        );
    }

    #[test]
    fn capture_output_split() {
        assert!(BufType::VIDEO_CAPTURE.is_capture());
        assert!(!BufType::VIDEO_CAPTURE.is_output());
        assert!(BufType::VIDEO_OUTPUT.is_output());
        assert!(!BufType::VIDEO_OVERLAY.is_capture());
        assert!(!BufType::VIDEO_OVERLAY.is_output());
    }
}
