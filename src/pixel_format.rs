use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Four character code (fourcc) defining the encoding of pixel data in an image buffer.
///
/// fourcc codes are documented on <https://www.fourcc.org/>.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct PixelFormat(u32);

impl PixelFormat {
    /// Creates a [`PixelFormat`] from a *fourcc* code.
    pub const fn from_fourcc(fourcc: [u8; 4]) -> Self {
        Self(u32::from_le_bytes(fourcc))
    }

    /// Returns the *fourcc* code represented by `self`.
    pub const fn as_fourcc(self) -> [u8; 4] {
        self.0.to_le_bytes()
    }

    /// Returns the packed 32-bit value of the *fourcc* code.
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Whether this library models the format.
    ///
    /// Enumeration of device formats warns about and skips codes for which this returns `false`.
    pub fn is_known(self) -> bool {
        Self::KNOWN.contains(&self)
    }
}

// Just a shorthand for `PixelFormat::from_fourcc`.
const fn f(fourcc: &[u8; 4]) -> PixelFormat {
    PixelFormat::from_fourcc(*fourcc)
}

/// Pixel format constants.
impl PixelFormat {
    /// **`RGB3`** `rrrrrrrr gggggggg bbbbbbbb`
    pub const RGB24: Self = f(b"RGB3");

    /// **`BGR3`** `bbbbbbbb gggggggg rrrrrrrr`
    pub const BGR24: Self = f(b"BGR3");

    /// **`RGBP`**: 16-bit RGB 5-6-5.
    pub const RGB565: Self = f(b"RGBP");

    /// **`RGBO`**: 16-bit RGB 5-5-5.
    pub const RGB555: Self = f(b"RGBO");

    /// **`AR24`**: `bbbbbbbb gggggggg rrrrrrrr aaaaaaaa`
    pub const ABGR32: Self = f(b"AR24");

    /// **`XR24`**: `bbbbbbbb gggggggg rrrrrrrr xxxxxxxx`
    ///
    /// The `xxxxxxxx` channel data is ignored.
    pub const XBGR32: Self = f(b"XR24");

    /// **`BA24`**: `aaaaaaaa rrrrrrrr gggggggg bbbbbbbb`
    pub const ARGB32: Self = f(b"BA24");

    /// **`BX24`**: `xxxxxxxx rrrrrrrr gggggggg bbbbbbbb`
    pub const XRGB32: Self = f(b"BX24");

    /// **`BGR4`**: `bbbbbbbb gggggggg rrrrrrrr ????????` **DEPRECATED**
    ///
    /// The meaning of the last channel is ill-defined; prefer [`Self::XBGR32`] or
    /// [`Self::ABGR32`].
    pub const BGR32: Self = f(b"BGR4");

    /// **`RGB4`**: `???????? rrrrrrrr gggggggg bbbbbbbb` **DEPRECATED**
    ///
    /// The meaning of the first channel is ill-defined; prefer [`Self::XRGB32`] or
    /// [`Self::ARGB32`].
    pub const RGB32: Self = f(b"RGB4");

    /// **`GREY`**: 8-bit greyscale.
    pub const GREY: Self = f(b"GREY");

    /// **`Y10 `**: 10-bit greyscale.
    pub const Y10: Self = f(b"Y10 ");

    /// **`Y12 `**: 12-bit greyscale.
    pub const Y12: Self = f(b"Y12 ");

    /// **`Y16 `**: 16-bit greyscale.
    pub const Y16: Self = f(b"Y16 ");

    /// **`YUYV`**: `yyyyyyyy uuuuuuuu YYYYYYYY vvvvvvvv`
    ///
    /// Packed YUV/YCbCr data with 4:2:2 chroma subsampling.
    pub const YUYV: Self = f(b"YUYV");

    /// **`YVYU`**: like [`Self::YUYV`] with swapped chroma samples.
    pub const YVYU: Self = f(b"YVYU");

    /// **`UYVY`**: like [`Self::YUYV`] with luma and chroma swapped.
    pub const UYVY: Self = f(b"UYVY");

    /// **`VYUY`**: like [`Self::UYVY`] with swapped chroma samples.
    pub const VYUY: Self = f(b"VYUY");

    /// **`422P`**: planar YUV 4:2:2.
    pub const YUV422P: Self = f(b"422P");

    /// **`YU12`**: planar YUV 4:2:0.
    pub const YUV420: Self = f(b"YU12");

    /// **`YV12`**: planar YVU 4:2:0.
    pub const YVU420: Self = f(b"YV12");

    /// **`NV12`**: Y plane followed by interleaved CbCr plane.
    pub const NV12: Self = f(b"NV12");

    /// **`NV21`**: Y plane followed by interleaved CrCb plane.
    pub const NV21: Self = f(b"NV21");

    /// **`NV16`**: like [`Self::NV12`] with 4:2:2 subsampling.
    pub const NV16: Self = f(b"NV16");

    /// **`NV61`**: like [`Self::NV21`] with 4:2:2 subsampling.
    pub const NV61: Self = f(b"NV61");

    /// **`BA81`**: 8-bit Bayer BGGR.
    pub const SBGGR8: Self = f(b"BA81");

    /// **`GBRG`**: 8-bit Bayer GBRG.
    pub const SGBRG8: Self = f(b"GBRG");

    /// **`GRBG`**: 8-bit Bayer GRBG.
    pub const SGRBG8: Self = f(b"GRBG");

    /// **`RGGB`**: 8-bit Bayer RGGB.
    pub const SRGGB8: Self = f(b"RGGB");

    /// **`MJPG`**: Motion JPEG, a sequence of JPEG images with omitted huffman tables.
    ///
    /// The transmitted JPEG images lack the "DHT" frame (Define Huffman Table), and instead use a
    /// predefined one. Most common JPEG decoders will handle this fine and don't need any extra
    /// preprocessing.
    pub const MJPG: Self = f(b"MJPG");

    /// **`JPEG`**: Data is a sequence of regular JFIF JPEG still images.
    pub const JPEG: Self = f(b"JPEG");

    /// **`MPEG`**: An MPEG multiplexed stream, as configured by codec controls.
    pub const MPEG: Self = f(b"MPEG");

    /// **`MPG1`**: MPEG-1 video elementary stream.
    pub const MPEG1: Self = f(b"MPG1");

    /// **`MPG2`**: MPEG-2 video elementary stream.
    pub const MPEG2: Self = f(b"MPG2");

    /// **`MPG4`**: MPEG-4 part 2 video elementary stream.
    pub const MPEG4: Self = f(b"MPG4");

    /// **`H264`**: H.264 Annex B byte stream.
    pub const H264: Self = f(b"H264");

    /// **`H265`**: HEVC byte stream.
    pub const HEVC: Self = f(b"H265");

    /// **`VP80`**: VP8 compressed video.
    pub const VP8: Self = f(b"VP80");

    /// **`VP90`**: VP9 compressed video.
    pub const VP9: Self = f(b"VP90");

    /// **`UVCH`**: UVC payload header metadata.
    pub const UVC: Self = f(b"UVCH");

    const KNOWN: &'static [Self] = &[
        Self::RGB24,
        Self::BGR24,
        Self::RGB565,
        Self::RGB555,
        Self::ABGR32,
        Self::XBGR32,
        Self::ARGB32,
        Self::XRGB32,
        Self::BGR32,
        Self::RGB32,
        Self::GREY,
        Self::Y10,
        Self::Y12,
        Self::Y16,
        Self::YUYV,
        Self::YVYU,
        Self::UYVY,
        Self::VYUY,
        Self::YUV422P,
        Self::YUV420,
        Self::YVU420,
        Self::NV12,
        Self::NV21,
        Self::NV16,
        Self::NV61,
        Self::SBGGR8,
        Self::SGBRG8,
        Self::SGRBG8,
        Self::SRGGB8,
        Self::MJPG,
        Self::JPEG,
        Self::MPEG,
        Self::MPEG1,
        Self::MPEG2,
        Self::MPEG4,
        Self::H264,
        Self::HEVC,
        Self::VP8,
        Self::VP9,
        Self::UVC,
    ];
}

/// Prints the 4 characters of the *fourcc* code.
///
/// Non-printable bytes are rendered as `.`, so this inverts [`FromStr`] for every valid code.
impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.as_fourcc() {
            if (b' '..=b'~').contains(&b) {
                fmt::Write::write_char(f, b.into())?;
            } else {
                fmt::Write::write_char(f, '.')?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PixelFormat({})", self)
    }
}

impl FromStr for PixelFormat {
    type Err = Error;

    /// Parses a 4-character *fourcc* string such as `"MJPG"`.
    ///
    /// Strings shorter than 4 characters are padded with spaces (`"Y10"` parses as `"Y10 "`).
    fn from_str(s: &str) -> Result<Self> {
        if !s.is_ascii() || s.is_empty() || s.len() > 4 {
            return Err(Error::InvalidValue {
                control: "pixel format".into(),
                value: s.into(),
            });
        }

        let mut fourcc = [b' '; 4];
        fourcc[..s.len()].copy_from_slice(s.as_bytes());
        Ok(Self::from_fourcc(fourcc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fourcc_packing() {
        assert_eq!(PixelFormat::MJPG.as_u32(), 0x47504A4D);
        assert_eq!(PixelFormat::from_fourcc(*b"MJPG"), PixelFormat::MJPG);
        assert_eq!(PixelFormat::MJPG.as_fourcc(), *b"MJPG");
    }

    #[test]
    fn display_inverts_parse() {
        for s in ["MJPG", "YUYV", "RGB3", "Y16 "] {
            assert_eq!(s.parse::<PixelFormat>().unwrap().to_string(), s);
        }
        // short codes are space-padded
        assert_eq!("Y10".parse::<PixelFormat>().unwrap(), PixelFormat::Y10);
    }

    #[test]
    fn known_set() {
        assert!(PixelFormat::YUYV.is_known());
        assert!(!PixelFormat::from_fourcc(*b"ZZZZ").is_known());
    }

    #[test]
    fn rejects_garbage() {
        assert!("".parse::<PixelFormat>().is_err());
        assert!("TOOLONG".parse::<PixelFormat>().is_err());
    }
}
