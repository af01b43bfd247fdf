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
use crate::pixel_format::PlaneType;

/// One row of the fixed point color conversion matrix.
///
/// The output channel is computed as `clamp(((a * c1 + b * c2 + c * c3 + d) >> 8) + e)`,
/// where `(c1, c2, c3)` is `(r, g, b)` when producing a YUV channel and
/// `(y, u, v)` when producing a RGB channel.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MatrixRow {
    pub a: i32,
    pub b: i32,
    pub c: i32,
    pub d: i32,
    pub e: i32,
}

impl MatrixRow {
    const fn new(a: i32, b: i32, c: i32, d: i32, e: i32) -> Self {
        Self { a, b, c, d, e }
    }

    #[inline(always)]
    pub fn apply(&self, c1: u8, c2: u8, c3: u8) -> u8 {
        let sum = self.a * i32::from(c1) + self.b * i32::from(c2) + self.c * i32::from(c3) + self.d;
        clamp((sum >> 8) + self.e)
    }
}

/// ITU-R Recommendation BT.601, standard range, 8.8 fixed point.
/// Rows are indexed by [`PlaneType`].
///
/// ```text
/// y  =  0.257 * r + 0.504 * g + 0.098 * b + 16
/// cb = -0.148 * r - 0.291 * g + 0.439 * b + 128
/// cr =  0.439 * r - 0.368 * g - 0.071 * b + 128
///
/// r = 1.164 * (y - 16) + 1.596 * (cr - 128)
/// g = 1.164 * (y - 16) - 0.813 * (cr - 128) - 0.391 * (cb - 128)
/// b = 1.164 * (y - 16) + 2.018 * (cb - 128)
/// ```
pub const FACTOR_MATRIX: [MatrixRow; 6] = [
    MatrixRow::new(66, 129, 25, 128, 16),
    MatrixRow::new(-38, -74, 112, 128, 128),
    MatrixRow::new(112, -94, -18, 128, 128),
    MatrixRow::new(298, 0, 409, -56992, 0),
    MatrixRow::new(298, -100, -208, 34784, 0),
    MatrixRow::new(298, 516, 0, -70688, 0),
];

/// Saturates a signed value to the `[0, 255]` range
#[inline(always)]
pub fn clamp(value: i32) -> u8 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    {
        value.clamp(0, 255) as u8
    }
}

/// Computes one output channel from three input channels.
///
/// For Y, U and V the input is `[r, g, b]`; for R, G and B the input is `[y, u, v]`.
#[inline(always)]
pub fn convert(plane: PlaneType, [c1, c2, c3]: [u8; 3]) -> u8 {
    FACTOR_MATRIX[plane as usize].apply(c1, c2, c3)
}
