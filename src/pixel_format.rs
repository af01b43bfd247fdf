// Copyright 2019 Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

// Permission is hereby granted, free of charge, to any person obtaining a copy of this
// software and associated documentation files (the "Software"), to deal in the Software
// without restriction, including without limitation the rights to use, copy, modify,
// merge, publish, distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so.

// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED,
// INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A
// PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT
// HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION WITH THE
// SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.
use core::fmt;

/// An enumeration of supported pixel formats.
///
/// The first five variants are the RGB family, the remaining ones the YUV family.
/// YUV layouts follow the V4L2 naming.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(C)]
pub enum PixelFormat {
    /// Reverse RGB packed into 24 bits without padding (B, G, R).
    ///
    /// This is the canonical pixel format used between normalization and
    /// color conversion.
    ///
    /// 24 bits per pixel
    Rgb888,
    /// RGB packed in a little endian 16 bit word: 5 bits red, 6 bits green, 5 bits blue.
    ///
    /// 16 bits per pixel
    Rgb565,
    /// RGB packed in a little endian 16 bit word: 5 bits for each channel, top bit unused.
    ///
    /// 16 bits per pixel
    Rgb555,
    /// RGB with 4 bits per channel. Three bytes hold two pixels.
    ///
    /// 12 bits per pixel
    Rgb444,
    /// Reverse RGB padded to 32 bits. The fourth byte is ignored.
    ///
    /// 32 bits per pixel
    Rgb888x,
    /// YUV with one luma plane Y then one plane with U and V values interleaved.
    /// Chroma planes are not sub-sampled.
    ///
    /// 24 bits per pixel
    Nv24,
    /// Same as `Nv24`, with V and U swapped in the chroma plane.
    ///
    /// 24 bits per pixel
    Nv42,
    /// Packed YUV 4:2:2, byte order Y0 U Y1 V.
    ///
    /// 16 bits per pixel
    Yuy2,
    /// Packed YUV 4:2:2, byte order Y0 V Y1 U.
    ///
    /// 16 bits per pixel
    Yvyu,
    /// Packed YUV 4:2:2, byte order U Y0 V Y1.
    ///
    /// 16 bits per pixel
    Uyvy,
    /// Packed YUV 4:2:2, byte order V Y0 U Y1.
    ///
    /// 16 bits per pixel
    Vyuy,
    /// YUV with one luma plane Y then U chroma plane and last the V chroma plane.
    /// Chroma planes are sub-sampled in the horizontal dimension, by a factor of 2.
    ///
    /// 16 bits per pixel
    Yuv422p,
    /// YUV with one luma plane Y then V chroma plane and last the U chroma plane.
    /// The two chroma planes are sub-sampled in both the horizontal and vertical dimensions by a factor of 2.
    ///
    /// 12 bits per pixel
    Yv12,
    /// YUV with one luma plane Y then U chroma plane and last the V chroma plane.
    /// The two chroma planes are sub-sampled in both the horizontal and vertical dimensions by a factor of 2.
    ///
    /// 12 bits per pixel
    Yu12,
    /// YUV with one luma plane Y then one plane with U and V values interleaved.
    /// Chroma planes are subsampled in both the horizontal and vertical dimensions by a factor of 2.
    ///
    /// 12 bits per pixel
    Nv12,
    /// Same as `Nv12`, with V and U swapped in the chroma plane.
    ///
    /// 12 bits per pixel
    Nv21,
    /// Packed YUV 4:1:1. Eight pixels are stored in a 12 byte macro-block:
    /// U0 Y0 V0 Y1 U1 Y2 V1 Y3 Y4 Y5 Y6 Y7.
    ///
    /// 12 bits per pixel
    Y41p,
    /// YUV with one luma plane Y then U chroma plane and last the V chroma plane.
    /// Chroma planes are sub-sampled in the horizontal dimension, by a factor of 4.
    ///
    /// 12 bits per pixel
    Yuv411p,
    /// YUV with one luma plane Y then V chroma plane and last the U chroma plane.
    /// Chroma planes are sub-sampled in both dimensions by a factor of 4.
    ///
    /// 9 bits per pixel
    Yvu9,
    /// YUV with one luma plane Y then U chroma plane and last the V chroma plane.
    /// Chroma planes are sub-sampled in both dimensions by a factor of 4.
    ///
    /// 9 bits per pixel
    Yuv9,
}

/// The scalar channel a byte position holds.
///
/// The discriminant indexes the color conversion matrix.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(C)]
pub enum PlaneType {
    /// Luma
    Y,
    /// Blue-difference chroma (Cb)
    U,
    /// Red-difference chroma (Cr)
    V,
    /// Red
    R,
    /// Green
    G,
    /// Blue
    B,
}

pub const PIXEL_FORMAT_COUNT: usize = PixelFormat::Yuv9 as usize + 1;

impl PixelFormat {
    /// Alias of [`PixelFormat::Yuy2`]
    pub const YUYV: PixelFormat = PixelFormat::Yuy2;
    /// Alias of [`PixelFormat::Yu12`]
    pub const I420: PixelFormat = PixelFormat::Yu12;
    /// Alias of [`PixelFormat::Y41p`]
    pub const Y411: PixelFormat = PixelFormat::Y41p;

    /// All the supported pixel formats, in declaration order.
    pub const ALL: [PixelFormat; PIXEL_FORMAT_COUNT] = [
        PixelFormat::Rgb888,
        PixelFormat::Rgb565,
        PixelFormat::Rgb555,
        PixelFormat::Rgb444,
        PixelFormat::Rgb888x,
        PixelFormat::Nv24,
        PixelFormat::Nv42,
        PixelFormat::Yuy2,
        PixelFormat::Yvyu,
        PixelFormat::Uyvy,
        PixelFormat::Vyuy,
        PixelFormat::Yuv422p,
        PixelFormat::Yv12,
        PixelFormat::Yu12,
        PixelFormat::Nv12,
        PixelFormat::Nv21,
        PixelFormat::Y41p,
        PixelFormat::Yuv411p,
        PixelFormat::Yvu9,
        PixelFormat::Yuv9,
    ];

    /// Returns true if the pixel format belongs to the RGB family.
    pub const fn is_rgb(self) -> bool {
        (self as u32) <= (PixelFormat::Rgb888x as u32)
    }

    /// Returns true if the pixel format belongs to the YUV family.
    pub const fn is_yuv(self) -> bool {
        !self.is_rgb()
    }
}

impl fmt::Display for PixelFormat {
    #[cfg_attr(coverage_nightly, coverage(off))]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PixelFormat::Rgb888 => write!(f, "rgb888"),
            PixelFormat::Rgb565 => write!(f, "rgb565"),
            PixelFormat::Rgb555 => write!(f, "rgb555"),
            PixelFormat::Rgb444 => write!(f, "rgb444"),
            PixelFormat::Rgb888x => write!(f, "rgb888x"),
            PixelFormat::Nv24 => write!(f, "nv24"),
            PixelFormat::Nv42 => write!(f, "nv42"),
            PixelFormat::Yuy2 => write!(f, "yuy2"),
            PixelFormat::Yvyu => write!(f, "yvyu"),
            PixelFormat::Uyvy => write!(f, "uyvy"),
            PixelFormat::Vyuy => write!(f, "vyuy"),
            PixelFormat::Yuv422p => write!(f, "422p"),
            PixelFormat::Yv12 => write!(f, "yv12"),
            PixelFormat::Yu12 => write!(f, "yu12"),
            PixelFormat::Nv12 => write!(f, "nv12"),
            PixelFormat::Nv21 => write!(f, "nv21"),
            PixelFormat::Y41p => write!(f, "y41p"),
            PixelFormat::Yuv411p => write!(f, "411p"),
            PixelFormat::Yvu9 => write!(f, "yvu9"),
            PixelFormat::Yuv9 => write!(f, "yuv9"),
        }
    }
}

impl TryFrom<i32> for PixelFormat {
    type Error = ();

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        usize::try_from(value)
            .ok()
            .and_then(|index| PixelFormat::ALL.get(index).copied())
            .ok_or(())
    }
}

/// Chroma subsampling of a YUV layout, as log2 of the group size
/// in each dimension.
///
/// A zero vertical shift means chroma groups are taken along the flat
/// pixel sequence, regardless of row boundaries.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Subsampling {
    pub log2_width: u32,
    pub log2_height: u32,
}

impl Subsampling {
    pub const fn group_width(self) -> usize {
        1 << self.log2_width
    }

    pub const fn group_height(self) -> usize {
        1 << self.log2_height
    }

    /// Number of pixels averaged into one chroma sample
    pub const fn group_len(self) -> usize {
        1 << (self.log2_width + self.log2_height)
    }
}

const S444: Subsampling = Subsampling {
    log2_width: 0,
    log2_height: 0,
};
const S422: Subsampling = Subsampling {
    log2_width: 1,
    log2_height: 0,
};
const S420: Subsampling = Subsampling {
    log2_width: 1,
    log2_height: 1,
};
const S411: Subsampling = Subsampling {
    log2_width: 2,
    log2_height: 0,
};
const S410: Subsampling = Subsampling {
    log2_width: 2,
    log2_height: 2,
};

/// Returns the chroma subsampling of a YUV pixel format, `None` for RGB formats.
pub const fn subsampling(pixel_format: PixelFormat) -> Option<Subsampling> {
    match pixel_format {
        PixelFormat::Rgb888
        | PixelFormat::Rgb565
        | PixelFormat::Rgb555
        | PixelFormat::Rgb444
        | PixelFormat::Rgb888x => None,
        PixelFormat::Nv24 | PixelFormat::Nv42 => Some(S444),
        PixelFormat::Yuy2
        | PixelFormat::Yvyu
        | PixelFormat::Uyvy
        | PixelFormat::Vyuy
        | PixelFormat::Yuv422p => Some(S422),
        PixelFormat::Yv12 | PixelFormat::Yu12 | PixelFormat::Nv12 | PixelFormat::Nv21 => {
            Some(S420)
        }
        PixelFormat::Y41p | PixelFormat::Yuv411p => Some(S411),
        PixelFormat::Yvu9 | PixelFormat::Yuv9 => Some(S410),
    }
}

/// Where the chroma samples of a planar or semi-planar layout live.
///
/// Chroma sample `i` is stored at `u + i * step` and `v + i * step`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ChromaPlanes {
    pub u: usize,
    pub v: usize,
    pub step: usize,
}

/// Computes the chroma plane offsets of a planar or semi-planar pixel format.
/// The luma plane always starts at byte 0.
///
/// Returns `None` for RGB and packed formats.
pub fn chroma_planes(pixel_format: PixelFormat, width: u32, height: u32) -> Option<ChromaPlanes> {
    let s = (width as usize) * (height as usize);
    let (u, v, step) = match pixel_format {
        PixelFormat::Nv24 | PixelFormat::Nv12 => (s, s + 1, 2),
        PixelFormat::Nv42 | PixelFormat::Nv21 => (s + 1, s, 2),
        PixelFormat::Yuv422p => (s, s + (s >> 1), 1),
        PixelFormat::Yu12 | PixelFormat::Yuv411p => (s, s + (s >> 2), 1),
        PixelFormat::Yv12 => (s + (s >> 2), s, 1),
        PixelFormat::Yuv9 => (s, s + (s >> 4), 1),
        PixelFormat::Yvu9 => (s + (s >> 4), s, 1),
        _ => return None,
    };

    Some(ChromaPlanes { u, v, step })
}

/// Mask of the pixel count that must be zero for the format to be representable
const fn pixel_count_mask(pixel_format: PixelFormat) -> usize {
    match pixel_format {
        PixelFormat::Yuy2
        | PixelFormat::Yvyu
        | PixelFormat::Uyvy
        | PixelFormat::Vyuy
        | PixelFormat::Yuv422p => 1,
        PixelFormat::Yv12
        | PixelFormat::Yu12
        | PixelFormat::Nv12
        | PixelFormat::Nv21
        | PixelFormat::Yuv411p => 3,
        PixelFormat::Y41p => 7,
        PixelFormat::Yvu9 | PixelFormat::Yuv9 => 15,
        _ => 0,
    }
}

/// Number of bytes taken by `pixels` pixels, `None` if it does not fit a `usize`
fn byte_size(pixel_format: PixelFormat, pixels: usize) -> Option<usize> {
    match pixel_format {
        PixelFormat::Rgb888 | PixelFormat::Nv24 | PixelFormat::Nv42 => pixels.checked_mul(3),
        PixelFormat::Rgb888x => pixels.checked_mul(4),
        PixelFormat::Rgb565
        | PixelFormat::Rgb555
        | PixelFormat::Yuy2
        | PixelFormat::Yvyu
        | PixelFormat::Uyvy
        | PixelFormat::Vyuy
        | PixelFormat::Yuv422p => pixels.checked_mul(2),
        PixelFormat::Rgb444 => pixels
            .checked_mul(3)
            .and_then(|size| size.checked_add(1))
            .map(|size| size >> 1),
        PixelFormat::Yv12
        | PixelFormat::Yu12
        | PixelFormat::Nv12
        | PixelFormat::Nv21
        | PixelFormat::Y41p
        | PixelFormat::Yuv411p => pixels.checked_add(pixels >> 1),
        PixelFormat::Yvu9 | PixelFormat::Yuv9 => pixels.checked_add(pixels >> 3),
    }
}

/// Number of bytes needed to store an image of the given format and size.
///
/// The pixel count must satisfy the divisibility rule of the format
/// (see [`is_compatible`]). This is only checked in debug builds.
/// Sizes that do not fit a `usize` saturate to `usize::MAX`.
pub fn required_bytes(pixel_format: PixelFormat, width: u32, height: u32) -> usize {
    let Some(pixels) = (width as usize).checked_mul(height as usize) else {
        return usize::MAX;
    };

    debug_assert_eq!(pixels & pixel_count_mask(pixel_format), 0);
    byte_size(pixel_format, pixels).unwrap_or(usize::MAX)
}

/// Returns true if an image of the given size can be stored in the pixel format.
///
/// Layouts averaging chroma over two dimensional blocks additionally
/// need whole blocks in both directions. The byte size must fit a `usize`.
pub fn is_compatible(pixel_format: PixelFormat, width: u32, height: u32) -> bool {
    let width = width as usize;
    let height = height as usize;
    let Some(pixels) = width.checked_mul(height) else {
        return false;
    };

    if pixels & pixel_count_mask(pixel_format) != 0 || byte_size(pixel_format, pixels).is_none()
    {
        return false;
    }

    match subsampling(pixel_format) {
        Some(sampling) if sampling.log2_height > 0 => {
            (width & (sampling.group_width() - 1)) == 0
                && (height & (sampling.group_height() - 1)) == 0
        }
        _ => true,
    }
}

/// Byte layout of one macro-block of a packed YUV format.
///
/// A macro-block stores `pixels` luma samples and one chroma pair for every
/// `1 << log2_chroma` consecutive pixels. Offsets are in bytes from the start
/// of the macro-block.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PackedLayout {
    pub pixels: usize,
    pub bytes: usize,
    pub log2_chroma: u32,
    pub y: &'static [usize],
    pub u: &'static [usize],
    pub v: &'static [usize],
}

const YUY2_LAYOUT: PackedLayout = PackedLayout {
    pixels: 2,
    bytes: 4,
    log2_chroma: 1,
    y: &[0, 2],
    u: &[1],
    v: &[3],
};

const YVYU_LAYOUT: PackedLayout = PackedLayout {
    u: &[3],
    v: &[1],
    ..YUY2_LAYOUT
};

const UYVY_LAYOUT: PackedLayout = PackedLayout {
    y: &[1, 3],
    u: &[0],
    v: &[2],
    ..YUY2_LAYOUT
};

const VYUY_LAYOUT: PackedLayout = PackedLayout {
    y: &[1, 3],
    u: &[2],
    v: &[0],
    ..YUY2_LAYOUT
};

// U0 Y0 V0 Y1 U1 Y2 V1 Y3 Y4 Y5 Y6 Y7
const Y41P_LAYOUT: PackedLayout = PackedLayout {
    pixels: 8,
    bytes: 12,
    log2_chroma: 2,
    y: &[1, 3, 5, 7, 8, 9, 10, 11],
    u: &[0, 4],
    v: &[2, 6],
};

/// Returns the macro-block layout of a packed YUV format, `None` otherwise.
pub const fn packed_layout(pixel_format: PixelFormat) -> Option<&'static PackedLayout> {
    match pixel_format {
        PixelFormat::Yuy2 => Some(&YUY2_LAYOUT),
        PixelFormat::Yvyu => Some(&YVYU_LAYOUT),
        PixelFormat::Uyvy => Some(&UYVY_LAYOUT),
        PixelFormat::Vyuy => Some(&VYUY_LAYOUT),
        PixelFormat::Y41p => Some(&Y41P_LAYOUT),
        _ => None,
    }
}
