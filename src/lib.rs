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
#![warn(missing_docs)]
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]
#![deny(unsafe_code)]
#![deny(unstable_features)]
#![deny(unused_import_braces)]
#![deny(
    clippy::complexity,
    clippy::correctness,
    clippy::perf,
    clippy::style,
    clippy::pedantic
)]
#![allow(
    clippy::inline_always,
    clippy::module_name_repetitions,
    // Yield false positives
    clippy::must_use_candidate,
)]

//! rgb2yuv converts raw raster buffers from RGB pixel encodings to
//! YUV (YCbCr) layouts, using the ITU-R Recommendation BT.601 matrix in
//! 8.8 fixed point.
//!
//! It is able to convert the following pixel formats:
//!
//! | Source pixel format                      | Destination pixel formats          |
//! | ---------------------------------------- | ---------------------------------- |
//! | RGB888, RGB565, RGB555, RGB444, RGB888X  | any YUV format, RGB888             |
//! | any YUV format                           | RGB888                             |
//!
//! Supported YUV layouts:
//!
//! pixel format           | subsampling | layout       | pixel count multiple of | w   | h
//! -----------------------|:-----------:|--------------|:-----------------------:|:---:|:---:
//! `PixelFormat::Nv24`    | 4:4:4       | semi-planar  |                         |     |
//! `PixelFormat::Nv42`    | 4:4:4       | semi-planar  |                         |     |
//! `PixelFormat::Yuy2`    | 4:2:2       | packed       | 2                       |     |
//! `PixelFormat::Yvyu`    | 4:2:2       | packed       | 2                       |     |
//! `PixelFormat::Uyvy`    | 4:2:2       | packed       | 2                       |     |
//! `PixelFormat::Vyuy`    | 4:2:2       | packed       | 2                       |     |
//! `PixelFormat::Yuv422p` | 4:2:2       | planar       | 2                       |     |
//! `PixelFormat::Yv12`    | 4:2:0       | planar       | 4                       | 2   | 2
//! `PixelFormat::Yu12`    | 4:2:0       | planar       | 4                       | 2   | 2
//! `PixelFormat::Nv12`    | 4:2:0       | semi-planar  | 4                       | 2   | 2
//! `PixelFormat::Nv21`    | 4:2:0       | semi-planar  | 4                       | 2   | 2
//! `PixelFormat::Y41p`    | 4:1:1       | packed       | 8                       |     |
//! `PixelFormat::Yuv411p` | 4:1:1       | planar       | 4                       |     |
//! `PixelFormat::Yvu9`    | 4:1:0       | planar       | 16                      | 4   | 4
//! `PixelFormat::Yuv9`    | 4:1:0       | planar       | 16                      | 4   | 4
//!
//! Chroma of subsampled layouts is the truncated average of the samples in
//! each group. Layouts without vertical subsampling group consecutive pixels
//! of the flat pixel sequence.
//!
//! # Examples
//!
//! Convert an image from rgb565 to nv12:
//! ```
//! use rgb2yuv::{convert_image, required_bytes, PixelFormat};
//!
//! fn convert() {
//!     const WIDTH: u32 = 640;
//!     const HEIGHT: u32 = 480;
//!
//!     let src_data = vec![0u8; required_bytes(WIDTH, HEIGHT, PixelFormat::Rgb565)];
//!     let mut dst_data = vec![0u8; required_bytes(WIDTH, HEIGHT, PixelFormat::Nv12)];
//!
//!     convert_image(
//!         WIDTH,
//!         HEIGHT,
//!         PixelFormat::Rgb565,
//!         &src_data,
//!         PixelFormat::Nv12,
//!         &mut dst_data,
//!     );
//! }
//! ```
//!
//! Handle conversion errors:
//! ```
//! use rgb2yuv::{convert_image, PixelFormat};
//! use std::error;
//!
//! fn convert() -> Result<(), Box<dyn error::Error>> {
//!     const WIDTH: u32 = 640;
//!     const HEIGHT: u32 = 480;
//!
//!     let src_data = vec![0u8; 4 * (WIDTH as usize) * (HEIGHT as usize)];
//!     let mut dst_data = vec![0u8; 2 * (WIDTH as usize) * (HEIGHT as usize)];
//!
//!     convert_image(
//!         WIDTH,
//!         HEIGHT,
//!         PixelFormat::Rgb888x,
//!         &src_data,
//!         PixelFormat::Yuy2,
//!         &mut dst_data,
//!     )?;
//!
//!     Ok(())
//! }
//! ```
//!
//! Let the library allocate the destination buffer:
//! ```
//! use rgb2yuv::{allocate_buffer, convert_image, PixelFormat};
//! use std::error;
//!
//! fn convert() -> Result<(), Box<dyn error::Error>> {
//!     const WIDTH: u32 = 64;
//!     const HEIGHT: u32 = 48;
//!
//!     let src_data = vec![0u8; 3 * (WIDTH as usize) * (HEIGHT as usize)];
//!     let mut dst = allocate_buffer(WIDTH, HEIGHT, PixelFormat::Yvu9);
//!     if let Some(dst_data) = dst.as_mut_slice() {
//!         convert_image(
//!             WIDTH,
//!             HEIGHT,
//!             PixelFormat::Rgb888,
//!             &src_data,
//!             PixelFormat::Yvu9,
//!             dst_data,
//!         )?;
//!     }
//!
//!     let _frame: Option<Vec<u8>> = dst.release();
//!     Ok(())
//! }
//! ```
mod block;
mod color_space;
mod convert_image;
mod dispatcher;
mod pixel_format;
mod static_assert;

use dispatcher::Context;
use tracing::{debug, trace};

pub use block::Block;
pub use color_space::clamp;
pub use convert_image::common::RgbPixel;
pub use pixel_format::{PixelFormat, PlaneType};

/// Reasons a conversion can be rejected.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[repr(C)]
pub enum ErrorKind {
    /// Image dimensions do not fit a pixel format, or a buffer is larger than expected
    #[error("Image size or buffer size is not legal for the pixel format")]
    InvalidValue,
    /// No conversion exists between the requested pixel formats
    #[error("The requested conversion is not available")]
    InvalidOperation,
    /// A buffer is shorter than the size the image needs
    #[error("Not enough data provided")]
    NotEnoughData,
    /// Memory for an intermediate buffer could not be allocated
    #[error("Unable to allocate memory")]
    OutOfMemory,
}

/// Compute number of bytes required to store an image given its format and dimensions
///
/// The pixel count `width * height` must satisfy the divisibility rule of the
/// pixel format; violating it is a programming error, only detected in debug builds.
/// Use [`is_compatible`] to check it beforehand. A size that does not fit a `usize`
/// saturates to `usize::MAX`.
///
/// # Examples
/// ```
/// use rgb2yuv::{required_bytes, PixelFormat};
///
/// assert_eq!(required_bytes(640, 480, PixelFormat::Yu12), 460_800);
/// assert_eq!(required_bytes(640, 480, PixelFormat::Rgb444), 460_800);
/// ```
pub fn required_bytes(width: u32, height: u32, pixel_format: PixelFormat) -> usize {
    pixel_format::required_bytes(pixel_format, width, height)
}

/// Returns true if an image of the given dimensions can be stored in the pixel format
///
/// Besides the pixel count rule reported by [`required_bytes`], 4:2:0 layouts require
/// even width and height, and 4:1:0 layouts require width and height multiple of 4.
/// Images whose byte size overflows a `usize` are never compatible.
pub fn is_compatible(width: u32, height: u32, pixel_format: PixelFormat) -> bool {
    pixel_format::is_compatible(pixel_format, width, height)
}

/// Allocates a zeroed buffer of exactly [`required_bytes`] bytes
///
/// If the allocation fails, the returned block is empty: it is not owned, holds
/// no elements and its pointer is null.
pub fn allocate_buffer(width: u32, height: u32, pixel_format: PixelFormat) -> Block<'static, u8> {
    Block::acquire(required_bytes(width, height, pixel_format))
}

/// Computes one channel of a pixel through the BT.601 fixed point matrix
///
/// For [`PlaneType::Y`], [`PlaneType::U`] and [`PlaneType::V`] the input is
/// `[r, g, b]`; for [`PlaneType::R`], [`PlaneType::G`] and [`PlaneType::B`] the
/// input is `[y, u, v]`.
///
/// # Examples
/// ```
/// use rgb2yuv::{convert_pixel, PlaneType};
///
/// assert_eq!(convert_pixel(PlaneType::Y, [255, 0, 0]), 82);
/// assert_eq!(convert_pixel(PlaneType::U, [255, 0, 0]), 90);
/// assert_eq!(convert_pixel(PlaneType::V, [255, 0, 0]), 240);
/// ```
pub fn convert_pixel(plane: PlaneType, channels: [u8; 3]) -> u8 {
    color_space::convert(plane, channels)
}

/// Reduces a RGB image to canonical 24 bit pixels
///
/// When the source is already [`PixelFormat::Rgb888`] the returned block borrows
/// the source buffer and nothing is copied. Otherwise the returned block owns a
/// new array of `width * height` pixels.
///
/// # Errors
///
/// * [`InvalidOperation`] if `pixel_format` is not a RGB pixel format
///
/// * [`NotEnoughData`] if the source buffer is shorter than [`required_bytes`]
///
/// * [`OutOfMemory`] if the canonical array could not be allocated
///
/// [`InvalidOperation`]: ./enum.ErrorKind.html#variant.InvalidOperation
/// [`NotEnoughData`]: ./enum.ErrorKind.html#variant.NotEnoughData
/// [`OutOfMemory`]: ./enum.ErrorKind.html#variant.OutOfMemory
pub fn normalize_rgb(
    width: u32,
    height: u32,
    pixel_format: PixelFormat,
    src_buffer: &[u8],
) -> Result<Block<'_, RgbPixel>, ErrorKind> {
    if !pixel_format.is_rgb() {
        return Err(ErrorKind::InvalidOperation);
    }

    let src_size = required_bytes(width, height, pixel_format);
    if src_buffer.len() < src_size {
        return Err(ErrorKind::NotEnoughData);
    }

    let src_buffer = &src_buffer[..src_size];
    let normalizer = match Context::global().normalizer(pixel_format) {
        Some(normalizer) => normalizer,
        None => return Ok(Block::wrap(bytemuck::cast_slice(src_buffer))),
    };

    let pixels = (width as usize) * (height as usize);
    let mut block = Block::<RgbPixel>::acquire(pixels);
    match block.as_mut_slice() {
        Some(rgb) if rgb.len() == pixels => normalizer(src_buffer, rgb),
        _ => return Err(ErrorKind::OutOfMemory),
    }

    Ok(block)
}

/// Converts an image from a pixel format to another one, applying chroma
/// downsampling or upsampling to match the destination format.
///
/// # Arguments
/// * `width` - Width of the image to convert in pixels
/// * `height` - Height of the image to convert in pixels
/// * `src_format` - Source pixel format
/// * `src_buffer` - Source image data, tightly packed
/// * `dst_format` - Destination pixel format
/// * `dst_buffer` - Destination image data, exactly [`required_bytes`] long
///
/// # Errors
///
/// * [`InvalidValue`] if `width` or `height` violate the size constraints
///   of the source or destination pixel format (see [`is_compatible`])
///
/// * [`InvalidValue`] if the destination buffer is longer than [`required_bytes`]
///
/// * [`InvalidOperation`] if there is no available method to convert the image with the
///   source pixel format to the image with the destination pixel format.
///
///   The list of available conversions is specified here:
///
///   Source image pixel format       | Supported destination image pixel formats
///   --------------------------------|------------------------------------------
///   any RGB pixel format            | any YUV pixel format [`1`]
///   any RGB pixel format            | `PixelFormat::Rgb888` [`2`]
///   any YUV pixel format            | `PixelFormat::Rgb888` [`3`]
///
/// * [`NotEnoughData`] if the source or destination buffer is shorter than [`required_bytes`]
///
/// * [`OutOfMemory`] if an intermediate buffer could not be allocated
///
/// # Algorithm 1
/// The source is first reduced to canonical 24 bit pixels, then each pixel is converted
/// with the following formula, in 8.8 fixed point:
/// ```text
/// y  = (( 66 * r + 129 * g +  25 * b + 128) >> 8) + 16
/// cb = ((-38 * r -  74 * g + 112 * b + 128) >> 8) + 128
/// cr = ((112 * r -  94 * g -  18 * b + 128) >> 8) + 128
/// ```
///
/// Chroma samples of a subsampling group are summed and divided by the group size,
/// truncating.
///
/// # Algorithm 2
/// Conversion to canonical 24 bit pixels. 16 bit formats are read as little endian words,
/// and channels narrower than 8 bits are shifted to the top bits, zero-filling the rest.
///
/// # Algorithm 3
/// Conversion from ycbcr model to RGB model, with nearest neighbour chroma upsampling:
/// ```text
/// r = (298 * y           + 409 * cr - 56992) >> 8
/// g = (298 * y - 100 * cb - 208 * cr + 34784) >> 8
/// b = (298 * y + 516 * cb            - 70688) >> 8
/// ```
///
/// [`InvalidValue`]: ./enum.ErrorKind.html#variant.InvalidValue
/// [`InvalidOperation`]: ./enum.ErrorKind.html#variant.InvalidOperation
/// [`NotEnoughData`]: ./enum.ErrorKind.html#variant.NotEnoughData
/// [`OutOfMemory`]: ./enum.ErrorKind.html#variant.OutOfMemory
/// [`1`]: ./fn.convert_image.html#algorithm-1
/// [`2`]: ./fn.convert_image.html#algorithm-2
/// [`3`]: ./fn.convert_image.html#algorithm-3
pub fn convert_image(
    width: u32,
    height: u32,
    src_format: PixelFormat,
    src_buffer: &[u8],
    dst_format: PixelFormat,
    dst_buffer: &mut [u8],
) -> Result<(), ErrorKind> {
    trace!(%src_format, %dst_format, width, height, "converting image");

    if !is_compatible(width, height, src_format) || !is_compatible(width, height, dst_format) {
        debug!(%src_format, %dst_format, width, height, "image size not supported");
        return Err(ErrorKind::InvalidValue);
    }

    let context = Context::global();
    let writer = match (src_format.is_rgb(), dst_format) {
        (true, PixelFormat::Rgb888) => None,
        (true, _) => match context.writer(dst_format) {
            Some(writer) => Some(writer),
            None => return Err(unsupported(src_format, dst_format)),
        },
        (false, PixelFormat::Rgb888) => {
            return read_image(context, width, height, src_format, src_buffer, dst_buffer);
        }
        (false, _) => return Err(unsupported(src_format, dst_format)),
    };

    check_buffers(width, height, src_format, src_buffer, dst_format, dst_buffer)?;
    let rgb = normalize_rgb(width, height, src_format, src_buffer)?;
    match writer {
        None => {
            dst_buffer.copy_from_slice(rgb.as_bytes());
            Ok(())
        }
        Some(writer) => {
            if writer(width, height, &rgb, dst_buffer) {
                Ok(())
            } else {
                Err(ErrorKind::OutOfMemory)
            }
        }
    }
}

fn unsupported(src_format: PixelFormat, dst_format: PixelFormat) -> ErrorKind {
    debug!(%src_format, %dst_format, "no conversion available");
    ErrorKind::InvalidOperation
}

fn check_buffers(
    width: u32,
    height: u32,
    src_format: PixelFormat,
    src_buffer: &[u8],
    dst_format: PixelFormat,
    dst_buffer: &[u8],
) -> Result<(), ErrorKind> {
    let src_size = required_bytes(width, height, src_format);
    let dst_size = required_bytes(width, height, dst_format);
    if src_buffer.len() < src_size || dst_buffer.len() < dst_size {
        return Err(ErrorKind::NotEnoughData);
    }

    if dst_buffer.len() > dst_size {
        return Err(ErrorKind::InvalidValue);
    }

    Ok(())
}

fn read_image(
    context: &Context,
    width: u32,
    height: u32,
    src_format: PixelFormat,
    src_buffer: &[u8],
    dst_buffer: &mut [u8],
) -> Result<(), ErrorKind> {
    let reader = match context.reader(src_format) {
        Some(reader) => reader,
        None => return Err(unsupported(src_format, PixelFormat::Rgb888)),
    };

    check_buffers(
        width,
        height,
        src_format,
        src_buffer,
        PixelFormat::Rgb888,
        dst_buffer,
    )?;

    let src_size = required_bytes(width, height, src_format);
    let rgb: &mut [RgbPixel] = bytemuck::cast_slice_mut(dst_buffer);
    reader(width, height, &src_buffer[..src_size], rgb);
    Ok(())
}
