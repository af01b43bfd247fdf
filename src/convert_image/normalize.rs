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
use crate::convert_image::common::RgbPixel;

/// Unpacks little endian 16 bit pixels
#[inline(always)]
fn unpack_u16(src: &[u8], dst: &mut [RgbPixel], unpack: impl Fn(u16) -> RgbPixel) {
    debug_assert!(src.len() >= 2 * dst.len());
    for (pixel, word) in dst.iter_mut().zip(src.chunks_exact(2)) {
        *pixel = unpack(u16::from_le_bytes([word[0], word[1]]));
    }
}

#[allow(clippy::cast_possible_truncation)]
pub fn rgb565_to_rgb888(src: &[u8], dst: &mut [RgbPixel]) {
    unpack_u16(src, dst, |p| RgbPixel {
        b: ((p & 0x001F) << 3) as u8,
        g: ((p & 0x07E0) >> 3) as u8,
        r: ((p & 0xF800) >> 8) as u8,
    });
}

#[allow(clippy::cast_possible_truncation)]
pub fn rgb555_to_rgb888(src: &[u8], dst: &mut [RgbPixel]) {
    unpack_u16(src, dst, |p| RgbPixel {
        b: ((p & 0x001F) << 3) as u8,
        g: ((p & 0x03E0) >> 2) as u8,
        r: ((p & 0x7C00) >> 7) as u8,
    });
}

/// Three bytes hold two pixels:
///
/// ```text
/// byte 0: g0 (high nibble) b0 (low nibble)
/// byte 1: b1 (high nibble) r0 (low nibble)
/// byte 2: r1 (high nibble) g1 (low nibble)
/// ```
///
/// With an odd pixel count the last pixel is stored in two trailing bytes.
pub fn rgb444_to_rgb888(src: &[u8], dst: &mut [RgbPixel]) {
    let mut pairs = dst.chunks_exact_mut(2);
    let mut groups = src.chunks_exact(3);
    for (pair, group) in (&mut pairs).zip(&mut groups) {
        let (b0, b1, b2) = (group[0], group[1], group[2]);
        pair[0] = RgbPixel {
            b: (b0 & 0x0F) << 4,
            g: b0 & 0xF0,
            r: (b1 & 0x0F) << 4,
        };
        pair[1] = RgbPixel {
            b: b1 & 0xF0,
            g: (b2 & 0x0F) << 4,
            r: b2 & 0xF0,
        };
    }

    if let ([pixel], [b0, b1, ..]) = (pairs.into_remainder(), groups.remainder()) {
        *pixel = RgbPixel {
            b: (b0 & 0x0F) << 4,
            g: b0 & 0xF0,
            r: (b1 & 0x0F) << 4,
        };
    }
}

/// The padding byte is discarded, the byte order is kept
pub fn rgb888x_to_rgb888(src: &[u8], dst: &mut [RgbPixel]) {
    debug_assert!(src.len() >= 4 * dst.len());
    for (pixel, quad) in dst.iter_mut().zip(src.chunks_exact(4)) {
        *pixel = RgbPixel {
            b: quad[0],
            g: quad[1],
            r: quad[2],
        };
    }
}
