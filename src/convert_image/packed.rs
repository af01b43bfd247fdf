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
use crate::convert_image::common::{ChromaSum, RgbPixel};
use crate::pixel_format::{packed_layout, PackedLayout, PixelFormat};
use paste::paste;

fn layout(pixel_format: PixelFormat) -> &'static PackedLayout {
    match packed_layout(pixel_format) {
        Some(layout) => layout,
        None => unreachable!("{} is not a packed format", pixel_format),
    }
}

#[inline(always)]
fn write_groups(
    width: u32,
    height: u32,
    src_buffer: &[RgbPixel],
    dst_buffer: &mut [u8],
    pixel_format: PixelFormat,
) -> bool {
    let layout = layout(pixel_format);
    let pixels = (width as usize) * (height as usize);
    let chroma_group = 1 << layout.log2_chroma;
    debug_assert_eq!(pixels % layout.pixels, 0);
    debug_assert!(dst_buffer.len() >= (pixels / layout.pixels) * layout.bytes);

    for (pixel_group, macro_block) in src_buffer[..pixels]
        .chunks_exact(layout.pixels)
        .zip(dst_buffer.chunks_exact_mut(layout.bytes))
    {
        for (pixel, &offset) in pixel_group.iter().zip(layout.y) {
            macro_block[offset] = pixel.y();
        }

        for ((chroma_pixels, &u_offset), &v_offset) in pixel_group
            .chunks_exact(chroma_group)
            .zip(layout.u)
            .zip(layout.v)
        {
            let (u, v) = ChromaSum::of(chroma_pixels).average(layout.log2_chroma);
            macro_block[u_offset] = u;
            macro_block[v_offset] = v;
        }
    }

    true
}

#[inline(always)]
fn read_groups(
    width: u32,
    height: u32,
    src_buffer: &[u8],
    dst_buffer: &mut [RgbPixel],
    pixel_format: PixelFormat,
) {
    let layout = layout(pixel_format);
    let pixels = (width as usize) * (height as usize);
    let chroma_group = 1 << layout.log2_chroma;
    debug_assert_eq!(pixels % layout.pixels, 0);

    for (pixel_group, macro_block) in dst_buffer[..pixels]
        .chunks_exact_mut(layout.pixels)
        .zip(src_buffer.chunks_exact(layout.bytes))
    {
        let mut luma = layout.y.iter().map(|&offset| macro_block[offset]);
        for ((chroma_pixels, &u_offset), &v_offset) in pixel_group
            .chunks_exact_mut(chroma_group)
            .zip(layout.u)
            .zip(layout.v)
        {
            let (u, v) = (macro_block[u_offset], macro_block[v_offset]);
            for (pixel, y) in chroma_pixels.iter_mut().zip(&mut luma) {
                *pixel = RgbPixel::from_yuv(y, u, v);
            }
        }
    }
}

macro_rules! packed {
    ($pf:ident) => {
        paste! {
            pub fn [<rgb888_ $pf:lower>](
                width: u32,
                height: u32,
                src_buffer: &[RgbPixel],
                dst_buffer: &mut [u8],
            ) -> bool {
                write_groups(width, height, src_buffer, dst_buffer, PixelFormat::$pf)
            }

            pub fn [<$pf:lower _rgb888>](
                width: u32,
                height: u32,
                src_buffer: &[u8],
                dst_buffer: &mut [RgbPixel],
            ) {
                read_groups(width, height, src_buffer, dst_buffer, PixelFormat::$pf)
            }
        }
    };
}

packed!(Yuy2);
packed!(Yvyu);
packed!(Uyvy);
packed!(Vyuy);
packed!(Y41p);
