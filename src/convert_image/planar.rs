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
use crate::block::Block;
use crate::convert_image::common::{ChromaSum, RgbPixel};
use crate::pixel_format::{chroma_planes, subsampling, ChromaPlanes, PixelFormat, Subsampling};
use paste::paste;

// Planar and semi-planar layouts.
//
// Luma comes first, one byte per pixel. Chroma is averaged over a subsampling
// group and stored at the offsets given by `chroma_planes`. Layouts without
// vertical subsampling group the flat pixel sequence (`write_lines`), the others
// average rectangular blocks (`write_blocks`).

/// Splits a buffer into its luma plane and the chroma area that follows,
/// with chroma offsets made relative to the latter.
fn split_planes(
    buffer_len: usize,
    pixel_format: PixelFormat,
    width: u32,
    height: u32,
) -> (usize, Subsampling, ChromaPlanes) {
    let pixels = (width as usize) * (height as usize);
    match (
        subsampling(pixel_format),
        chroma_planes(pixel_format, width, height),
    ) {
        (Some(sampling), Some(planes)) => {
            debug_assert!(buffer_len >= pixels);
            let planes = ChromaPlanes {
                u: planes.u - pixels,
                v: planes.v - pixels,
                step: planes.step,
            };

            (pixels, sampling, planes)
        }
        _ => unreachable!("{} is not a planar format", pixel_format),
    }
}

#[inline(always)]
fn store(chroma: &mut [u8], planes: &ChromaPlanes, index: usize, (u, v): (u8, u8)) {
    chroma[planes.u + index * planes.step] = u;
    chroma[planes.v + index * planes.step] = v;
}

#[inline(always)]
fn load(chroma: &[u8], planes: &ChromaPlanes, index: usize) -> (u8, u8) {
    (
        chroma[planes.u + index * planes.step],
        chroma[planes.v + index * planes.step],
    )
}

#[inline(always)]
fn write_lines(
    width: u32,
    height: u32,
    src_buffer: &[RgbPixel],
    dst_buffer: &mut [u8],
    pixel_format: PixelFormat,
) -> bool {
    let (pixels, sampling, planes) = split_planes(dst_buffer.len(), pixel_format, width, height);
    let group = sampling.group_len();
    debug_assert_eq!(pixels % group, 0);

    let (luma_plane, chroma) = dst_buffer.split_at_mut(pixels);
    for (index, (pixel_group, luma)) in src_buffer[..pixels]
        .chunks_exact(group)
        .zip(luma_plane.chunks_exact_mut(group))
        .enumerate()
    {
        for (y, pixel) in luma.iter_mut().zip(pixel_group) {
            *y = pixel.y();
        }

        let average = ChromaSum::of(pixel_group).average(sampling.log2_width);
        store(chroma, &planes, index, average);
    }

    true
}

#[inline(always)]
fn write_blocks(
    width: u32,
    height: u32,
    src_buffer: &[RgbPixel],
    dst_buffer: &mut [u8],
    pixel_format: PixelFormat,
) -> bool {
    let (pixels, sampling, planes) = split_planes(dst_buffer.len(), pixel_format, width, height);
    if pixels == 0 {
        return true;
    }

    let col_count = width as usize;
    let col_mask = sampling.group_width() - 1;
    let row_mask = sampling.group_height() - 1;
    debug_assert_eq!(col_count & col_mask, 0);
    debug_assert_eq!((height as usize) & row_mask, 0);

    // One running sum per block column, reused by every row of blocks
    let chroma_width = col_count >> sampling.log2_width;
    let mut block = Block::<ChromaSum>::acquire(chroma_width);
    let sums = match block.as_mut_slice() {
        Some(sums) if sums.len() == chroma_width => sums,
        _ => return false,
    };

    let (luma_plane, chroma) = dst_buffer.split_at_mut(pixels);
    for (row, (line, luma)) in src_buffer[..pixels]
        .chunks_exact(col_count)
        .zip(luma_plane.chunks_exact_mut(col_count))
        .enumerate()
    {
        let row_phase = row & row_mask;
        for (col, (pixel, y)) in line.iter().zip(luma.iter_mut()).enumerate() {
            *y = pixel.y();

            let sum = &mut sums[col >> sampling.log2_width];
            if row_phase == 0 && (col & col_mask) == 0 {
                *sum = ChromaSum::seed(*pixel);
            } else {
                sum.add(*pixel);
            }
        }

        if row_phase == row_mask {
            let first = (row >> sampling.log2_height) * chroma_width;
            let log2_count = sampling.log2_width + sampling.log2_height;
            for (k, sum) in sums.iter().enumerate() {
                store(chroma, &planes, first + k, sum.average(log2_count));
            }
        }
    }

    true
}

#[inline(always)]
fn read_lines(
    width: u32,
    height: u32,
    src_buffer: &[u8],
    dst_buffer: &mut [RgbPixel],
    pixel_format: PixelFormat,
) {
    let (pixels, sampling, planes) = split_planes(src_buffer.len(), pixel_format, width, height);
    let group = sampling.group_len();
    debug_assert_eq!(pixels % group, 0);

    let (luma_plane, chroma) = src_buffer.split_at(pixels);
    for (index, (pixel_group, luma)) in dst_buffer[..pixels]
        .chunks_exact_mut(group)
        .zip(luma_plane.chunks_exact(group))
        .enumerate()
    {
        let (u, v) = load(chroma, &planes, index);
        for (pixel, &y) in pixel_group.iter_mut().zip(luma) {
            *pixel = RgbPixel::from_yuv(y, u, v);
        }
    }
}

#[inline(always)]
fn read_blocks(
    width: u32,
    height: u32,
    src_buffer: &[u8],
    dst_buffer: &mut [RgbPixel],
    pixel_format: PixelFormat,
) {
    let (pixels, sampling, planes) = split_planes(src_buffer.len(), pixel_format, width, height);
    if pixels == 0 {
        return;
    }

    let col_count = width as usize;
    let chroma_width = col_count >> sampling.log2_width;
    let (luma_plane, chroma) = src_buffer.split_at(pixels);
    for (row, (line, luma)) in dst_buffer[..pixels]
        .chunks_exact_mut(col_count)
        .zip(luma_plane.chunks_exact(col_count))
        .enumerate()
    {
        let first = (row >> sampling.log2_height) * chroma_width;
        for (col, (pixel, &y)) in line.iter_mut().zip(luma).enumerate() {
            let (u, v) = load(chroma, &planes, first + (col >> sampling.log2_width));
            *pixel = RgbPixel::from_yuv(y, u, v);
        }
    }
}

macro_rules! planar {
    ($pf:ident, $write:ident, $read:ident) => {
        paste! {
            pub fn [<rgb888_ $pf:lower>](
                width: u32,
                height: u32,
                src_buffer: &[RgbPixel],
                dst_buffer: &mut [u8],
            ) -> bool {
                $write(width, height, src_buffer, dst_buffer, PixelFormat::$pf)
            }

            pub fn [<$pf:lower _rgb888>](
                width: u32,
                height: u32,
                src_buffer: &[u8],
                dst_buffer: &mut [RgbPixel],
            ) {
                $read(width, height, src_buffer, dst_buffer, PixelFormat::$pf)
            }
        }
    };
}

planar!(Nv24, write_lines, read_lines);
planar!(Nv42, write_lines, read_lines);
planar!(Yuv422p, write_lines, read_lines);
planar!(Yuv411p, write_lines, read_lines);
planar!(Yv12, write_blocks, read_blocks);
planar!(Yu12, write_blocks, read_blocks);
planar!(Nv12, write_blocks, read_blocks);
planar!(Nv21, write_blocks, read_blocks);
planar!(Yvu9, write_blocks, read_blocks);
planar!(Yuv9, write_blocks, read_blocks);
