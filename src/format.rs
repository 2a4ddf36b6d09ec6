//! Image formats, frame sizes and frame intervals.

use std::{fmt, mem};

use nix::errno::Errno;

use crate::pixel_format::PixelFormat;
use crate::raw;
use crate::shared::{FrmIvalType, FrmSizeType};
use crate::Result;

pub use crate::raw::Fract;

/// The negotiated image format of a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Format {
    pub width: u32,
    pub height: u32,
    pub pixel_format: PixelFormat,
}

impl Format {
    pub fn new(width: u32, height: u32, pixel_format: PixelFormat) -> Self {
        Self {
            width,
            height,
            pixel_format,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{} {}", self.width, self.height, self.pixel_format)
    }
}

impl Fract {
    /// Interprets `self` as a time-per-frame fraction and returns the equivalent rate in frames
    /// per second.
    ///
    /// A numerator of zero is normalised to a rate of zero.
    pub fn as_fps(&self) -> f64 {
        if self.numerator == 0 {
            0.0
        } else {
            f64::from(self.denominator) / f64::from(self.numerator)
        }
    }
}

impl fmt::Display for Fract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// The frame sizes a device supports for some pixel format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameSizes {
    Discrete(Vec<DiscreteFrameSize>),
    Stepwise(StepwiseFrameSizes),
    Continuous(StepwiseFrameSizes),
}

/// A discrete width/height pair supported by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscreteFrameSize {
    pub index: u32,
    pub width: u32,
    pub height: u32,
}

/// A (min, max, step) range of frame dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepwiseFrameSizes {
    pub min_width: u32,
    pub max_width: u32,
    pub step_width: u32,
    pub min_height: u32,
    pub max_height: u32,
    pub step_height: u32,
}

impl FrameSizes {
    /// Enumerates the frame sizes supported for `pixel_format`.
    ///
    /// An `EINVAL` answer for the first index means the driver has nothing to report and yields
    /// an empty discrete list.
    pub(crate) fn enumerate(fd: std::os::unix::prelude::RawFd, pixel_format: PixelFormat) -> Result<Self> {
        unsafe {
            let mut desc = raw::FrmSizeEnum {
                index: 0,
                pixel_format,
                ..mem::zeroed()
            };
            match raw::enum_framesizes(fd, &mut desc) {
                Ok(_) => {}
                Err(Errno::EINVAL) => return Ok(FrameSizes::Discrete(Vec::new())),
                Err(e) => return Err(e.into()),
            }

            match FrmSizeType::from_raw(desc.type_.0) {
                Some(FrmSizeType::DISCRETE) => {
                    let mut sizes = vec![DiscreteFrameSize {
                        index: 0,
                        width: desc.union.discrete.width,
                        height: desc.union.discrete.height,
                    }];
                    for index in 1.. {
                        let mut desc = raw::FrmSizeEnum {
                            index,
                            pixel_format,
                            ..mem::zeroed()
                        };
                        match raw::enum_framesizes(fd, &mut desc) {
                            Ok(_) => sizes.push(DiscreteFrameSize {
                                index,
                                width: desc.union.discrete.width,
                                height: desc.union.discrete.height,
                            }),
                            Err(Errno::EINVAL) => break,
                            Err(e) => return Err(e.into()),
                        }
                    }

                    Ok(FrameSizes::Discrete(sizes))
                }
                Some(FrmSizeType::CONTINUOUS) => Ok(FrameSizes::Continuous(
                    StepwiseFrameSizes::from_raw(desc.union.stepwise),
                )),
                Some(FrmSizeType::STEPWISE) => Ok(FrameSizes::Stepwise(
                    StepwiseFrameSizes::from_raw(desc.union.stepwise),
                )),
                _ => {
                    log::warn!("unknown frame size type {:?}, skipping", desc.type_);
                    Ok(FrameSizes::Discrete(Vec::new()))
                }
            }
        }
    }
}

impl StepwiseFrameSizes {
    fn from_raw(raw: raw::FrmSizeStepwise) -> Self {
        Self {
            min_width: raw.min_width,
            max_width: raw.max_width,
            step_width: raw.step_width,
            min_height: raw.min_height,
            max_height: raw.max_height,
            step_height: raw.step_height,
        }
    }
}

/// The frame intervals a device supports for some pixel format and frame size.
///
/// Stepwise and continuous enumerations expose their `(min, max, step)` fractions; a discrete
/// enumeration lists each supported interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameIntervals {
    Discrete(Vec<Fract>),
    Stepwise(StepwiseFrameIntervals),
    Continuous(StepwiseFrameIntervals),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepwiseFrameIntervals {
    pub min: Fract,
    pub max: Fract,
    pub step: Fract,
}

impl FrameIntervals {
    pub(crate) fn enumerate(
        fd: std::os::unix::prelude::RawFd,
        pixel_format: PixelFormat,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        unsafe {
            let mut desc = raw::FrmIvalEnum {
                index: 0,
                pixel_format,
                width,
                height,
                ..mem::zeroed()
            };
            match raw::enum_frameintervals(fd, &mut desc) {
                Ok(_) => {}
                Err(Errno::EINVAL) => return Ok(FrameIntervals::Discrete(Vec::new())),
                Err(e) => return Err(e.into()),
            }

            match FrmIvalType::from_raw(desc.type_.0) {
                Some(FrmIvalType::DISCRETE) => {
                    let mut intervals = vec![desc.union.discrete];
                    for index in 1.. {
                        let mut desc = raw::FrmIvalEnum {
                            index,
                            pixel_format,
                            width,
                            height,
                            ..mem::zeroed()
                        };
                        match raw::enum_frameintervals(fd, &mut desc) {
                            Ok(_) => intervals.push(desc.union.discrete),
                            Err(Errno::EINVAL) => break,
                            Err(e) => return Err(e.into()),
                        }
                    }

                    Ok(FrameIntervals::Discrete(intervals))
                }
                Some(FrmIvalType::CONTINUOUS) => {
                    Ok(FrameIntervals::Continuous(StepwiseFrameIntervals {
                        min: desc.union.stepwise.min,
                        max: desc.union.stepwise.max,
                        step: desc.union.stepwise.step,
                    }))
                }
                Some(FrmIvalType::STEPWISE) => {
                    Ok(FrameIntervals::Stepwise(StepwiseFrameIntervals {
                        min: desc.union.stepwise.min,
                        max: desc.union.stepwise.max,
                        step: desc.union.stepwise.step,
                    }))
                }
                _ => {
                    log::warn!("unknown frame interval type {:?}, skipping", desc.type_);
                    Ok(FrameIntervals::Discrete(Vec::new()))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fps_from_fraction() {
        let f = Fract {
            numerator: 1,
            denominator: 30,
        };
        assert_eq!(f.as_fps(), 30.0);

        let half = Fract {
            numerator: 2,
            denominator: 1,
        };
        assert_eq!(half.as_fps(), 0.5);

        // a zero numerator normalises to a zero rate instead of dividing by zero
        let zero = Fract {
            numerator: 0,
            denominator: 30,
        };
        assert_eq!(zero.as_fps(), 0.0);
    }
}
