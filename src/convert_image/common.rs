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
use crate::color_space::convert;
use crate::pixel_format::PlaneType;
use bytemuck::{Pod, Zeroable};

/// Canonical 24 bit pixel, stored as blue, green, red.
///
/// Every RGB source format is reduced to an array of these before
/// color conversion takes place.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct RgbPixel {
    /// Blue
    pub b: u8,
    /// Green
    pub g: u8,
    /// Red
    pub r: u8,
}

impl RgbPixel {
    /// Builds a pixel from its red, green and blue channels
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { b, g, r }
    }

    /// Builds a pixel from luma and chroma samples
    #[inline(always)]
    pub fn from_yuv(y: u8, u: u8, v: u8) -> Self {
        Self {
            b: convert(PlaneType::B, [y, u, v]),
            g: convert(PlaneType::G, [y, u, v]),
            r: convert(PlaneType::R, [y, u, v]),
        }
    }

    /// Luma of the pixel
    #[inline(always)]
    pub fn y(self) -> u8 {
        convert(PlaneType::Y, [self.r, self.g, self.b])
    }

    /// Blue-difference chroma of the pixel
    #[inline(always)]
    pub fn u(self) -> u8 {
        convert(PlaneType::U, [self.r, self.g, self.b])
    }

    /// Red-difference chroma of the pixel
    #[inline(always)]
    pub fn v(self) -> u8 {
        convert(PlaneType::V, [self.r, self.g, self.b])
    }
}

/// Running sum of the chroma samples of one subsampling group.
///
/// Sixteen 8 bit samples at most are accumulated, so 16 bits are enough.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct ChromaSum {
    pub u: u16,
    pub v: u16,
}

impl ChromaSum {
    #[inline(always)]
    pub fn seed(pixel: RgbPixel) -> Self {
        Self {
            u: u16::from(pixel.u()),
            v: u16::from(pixel.v()),
        }
    }

    #[inline(always)]
    pub fn add(&mut self, pixel: RgbPixel) {
        self.u += u16::from(pixel.u());
        self.v += u16::from(pixel.v());
    }

    /// Sum of the chroma samples of consecutive pixels
    #[inline(always)]
    pub fn of(pixels: &[RgbPixel]) -> Self {
        pixels.iter().fold(Self::default(), |mut sum, pixel| {
            sum.add(*pixel);
            sum
        })
    }

    /// Divides both sums by `1 << log2_count`, truncating
    #[inline(always)]
    pub fn average(self, log2_count: u32) -> (u8, u8) {
        #[allow(clippy::cast_possible_truncation)]
        ((self.u >> log2_count) as u8, (self.v >> log2_count) as u8)
    }
}
