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
use crate::convert_image;
use crate::convert_image::common::RgbPixel;
use crate::pixel_format::{PixelFormat, PIXEL_FORMAT_COUNT};
use crate::static_assert::static_assert;
use paste::paste;
use std::sync::OnceLock;

/// Reduces a RGB source to canonical pixels
pub type Normalizer = fn(&[u8], &mut [RgbPixel]);

/// Writes canonical pixels into a YUV layout. Returns false if scratch memory
/// could not be allocated.
pub type Writer = fn(u32, u32, &[RgbPixel], &mut [u8]) -> bool;

/// Reads a YUV layout back into canonical pixels
pub type Reader = fn(u32, u32, &[u8], &mut [RgbPixel]);

static_assert!(PIXEL_FORMAT_COUNT == PixelFormat::ALL.len());
static_assert!(PixelFormat::Rgb888x as usize + 1 == PixelFormat::Nv24 as usize);
static_assert!(PixelFormat::Rgb888.is_rgb() && PixelFormat::Rgb888x.is_rgb());
static_assert!(PixelFormat::Nv24.is_yuv() && PixelFormat::Yuv9.is_yuv());

macro_rules! normalizer {
    ($ctx:expr, $pf:ident) => {
        paste! {
            $ctx.normalizers[PixelFormat::$pf as usize] =
                Some(convert_image::normalize::[<$pf:lower _to_rgb888>])
        }
    };
}

macro_rules! yuv {
    ($ctx:expr, $set:ident, $pf:ident) => {
        paste! {
            $ctx.writers[PixelFormat::$pf as usize] =
                Some(convert_image::$set::[<rgb888_ $pf:lower>]);
            $ctx.readers[PixelFormat::$pf as usize] =
                Some(convert_image::$set::[<$pf:lower _rgb888>]);
        }
    };
}

macro_rules! set_dispatch_table {
    ($ctx:expr) => {
        normalizer!($ctx, Rgb565);
        normalizer!($ctx, Rgb555);
        normalizer!($ctx, Rgb444);
        normalizer!($ctx, Rgb888x);
        yuv!($ctx, planar, Nv24);
        yuv!($ctx, planar, Nv42);
        yuv!($ctx, packed, Yuy2);
        yuv!($ctx, packed, Yvyu);
        yuv!($ctx, packed, Uyvy);
        yuv!($ctx, packed, Vyuy);
        yuv!($ctx, planar, Yuv422p);
        yuv!($ctx, planar, Yv12);
        yuv!($ctx, planar, Yu12);
        yuv!($ctx, planar, Nv12);
        yuv!($ctx, planar, Nv21);
        yuv!($ctx, packed, Y41p);
        yuv!($ctx, planar, Yuv411p);
        yuv!($ctx, planar, Yvu9);
        yuv!($ctx, planar, Yuv9);
    };
}

/// Per-format conversion routines, indexed by pixel format.
///
/// Built once; the canonical format has no normalizer because it is used in place.
pub struct Context {
    normalizers: [Option<Normalizer>; PIXEL_FORMAT_COUNT],
    writers: [Option<Writer>; PIXEL_FORMAT_COUNT],
    readers: [Option<Reader>; PIXEL_FORMAT_COUNT],
}

impl Context {
    pub fn global() -> &'static Context {
        static INSTANCE: OnceLock<Context> = OnceLock::new();
        INSTANCE.get_or_init(Context::new)
    }

    fn new() -> Self {
        let mut context = Context {
            normalizers: [None; PIXEL_FORMAT_COUNT],
            writers: [None; PIXEL_FORMAT_COUNT],
            readers: [None; PIXEL_FORMAT_COUNT],
        };

        set_dispatch_table!(context);
        context
    }

    pub fn normalizer(&self, pixel_format: PixelFormat) -> Option<Normalizer> {
        self.normalizers[pixel_format as usize]
    }

    pub fn writer(&self, pixel_format: PixelFormat) -> Option<Writer> {
        self.writers[pixel_format as usize]
    }

    pub fn reader(&self, pixel_format: PixelFormat) -> Option<Reader> {
        self.readers[pixel_format as usize]
    }
}
