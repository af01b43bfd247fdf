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
#![allow(dead_code)]

use rgb2yuv::PixelFormat;

pub const RGB_FORMATS: &[PixelFormat; 5] = &[
    PixelFormat::Rgb888,
    PixelFormat::Rgb565,
    PixelFormat::Rgb555,
    PixelFormat::Rgb444,
    PixelFormat::Rgb888x,
];

pub const YUV_FORMATS: &[PixelFormat; 15] = &[
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

/// Image sizes every format accepts
pub const SIZES: &[(u32, u32); 6] = &[(0, 0), (4, 4), (8, 4), (4, 8), (20, 8), (36, 16)];

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn saturate(value: i32) -> u8 {
    value.clamp(0, 255) as u8
}

pub fn rgb_to_y([r, g, b]: [u8; 3]) -> u8 {
    let (r, g, b) = (i32::from(r), i32::from(g), i32::from(b));
    saturate(((66 * r + 129 * g + 25 * b + 128) >> 8) + 16)
}

pub fn rgb_to_u([r, g, b]: [u8; 3]) -> u8 {
    let (r, g, b) = (i32::from(r), i32::from(g), i32::from(b));
    saturate(((-38 * r - 74 * g + 112 * b + 128) >> 8) + 128)
}

pub fn rgb_to_v([r, g, b]: [u8; 3]) -> u8 {
    let (r, g, b) = (i32::from(r), i32::from(g), i32::from(b));
    saturate(((112 * r - 94 * g - 18 * b + 128) >> 8) + 128)
}

/// Returns `[r, g, b]`
pub fn yuv_to_rgb(y: u8, u: u8, v: u8) -> [u8; 3] {
    let (y, u, v) = (i32::from(y), i32::from(u), i32::from(v));
    [
        saturate((298 * y + 409 * v - 56992) >> 8),
        saturate((298 * y - 100 * u - 208 * v + 34784) >> 8),
        saturate((298 * y + 516 * u - 70688) >> 8),
    ]
}

/// Log2 of the chroma group size, horizontally and vertically
pub fn chroma_shift(pixel_format: PixelFormat) -> (u32, u32) {
    match pixel_format {
        PixelFormat::Nv24 | PixelFormat::Nv42 => (0, 0),
        PixelFormat::Yuy2
        | PixelFormat::Yvyu
        | PixelFormat::Uyvy
        | PixelFormat::Vyuy
        | PixelFormat::Yuv422p => (1, 0),
        PixelFormat::Yv12 | PixelFormat::Yu12 | PixelFormat::Nv12 | PixelFormat::Nv21 => (1, 1),
        PixelFormat::Y41p | PixelFormat::Yuv411p => (2, 0),
        PixelFormat::Yvu9 | PixelFormat::Yuv9 => (2, 2),
        _ => unreachable!(),
    }
}

/// Index of the chroma sample covering pixel `(x, y)`
pub fn chroma_index(pixel_format: PixelFormat, width: usize, x: usize, y: usize) -> usize {
    let (lw, lh) = chroma_shift(pixel_format);
    if lh == 0 {
        (y * width + x) >> lw
    } else {
        (y >> lh) * (width >> lw) + (x >> lw)
    }
}

/// Decodes a RGB buffer into `[r, g, b]` triplets
pub fn decode_rgb(pixel_format: PixelFormat, src: &[u8], pixels: usize) -> Vec<[u8; 3]> {
    let word = |i: usize| u16::from_le_bytes([src[2 * i], src[2 * i + 1]]);
    let nibble = |i: usize| {
        let byte = src[i >> 1];
        if i & 1 == 0 {
            byte & 0x0F
        } else {
            byte >> 4
        }
    };

    #[allow(clippy::cast_possible_truncation)]
    (0..pixels)
        .map(|i| match pixel_format {
            PixelFormat::Rgb888 => [src[3 * i + 2], src[3 * i + 1], src[3 * i]],
            PixelFormat::Rgb888x => [src[4 * i + 2], src[4 * i + 1], src[4 * i]],
            PixelFormat::Rgb565 => {
                let w = word(i);
                [
                    ((w >> 11) << 3) as u8,
                    (((w >> 5) & 0x3F) << 2) as u8,
                    ((w & 0x1F) << 3) as u8,
                ]
            }
            PixelFormat::Rgb555 => {
                let w = word(i);
                [
                    (((w >> 10) & 0x1F) << 3) as u8,
                    (((w >> 5) & 0x1F) << 3) as u8,
                    ((w & 0x1F) << 3) as u8,
                ]
            }
            // Nibbles in memory order: b, g, r for every pixel
            PixelFormat::Rgb444 => [
                nibble(3 * i + 2) << 4,
                nibble(3 * i + 1) << 4,
                nibble(3 * i) << 4,
            ],
            _ => unreachable!(),
        })
        .collect()
}

/// Luma and chroma samples of an image, in raster order
pub fn compute_planes(
    pixel_format: PixelFormat,
    width: usize,
    height: usize,
    rgb: &[[u8; 3]],
) -> (Vec<u8>, Vec<u8>, Vec<u8>) {
    let (lw, lh) = chroma_shift(pixel_format);
    let pixels = width * height;
    let chroma_count = pixels >> (lw + lh);
    let luma = rgb.iter().map(|&p| rgb_to_y(p)).collect();

    let mut sum_u = vec![0_u32; chroma_count];
    let mut sum_v = vec![0_u32; chroma_count];
    for y in 0..height {
        for x in 0..width {
            let pixel = rgb[y * width + x];
            let k = chroma_index(pixel_format, width, x, y);
            sum_u[k] += u32::from(rgb_to_u(pixel));
            sum_v[k] += u32::from(rgb_to_v(pixel));
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    let average = |sums: Vec<u32>| -> Vec<u8> {
        sums.into_iter()
            .map(|sum| (sum >> (lw + lh)) as u8)
            .collect()
    };

    (luma, average(sum_u), average(sum_v))
}

fn interleave(first: &[u8], second: &[u8]) -> Vec<u8> {
    first
        .iter()
        .zip(second)
        .flat_map(|(&a, &b)| [a, b])
        .collect()
}

/// Lays out luma and chroma samples in the byte order of a YUV format
pub fn pack(pixel_format: PixelFormat, luma: &[u8], u: &[u8], v: &[u8]) -> Vec<u8> {
    let concat = |parts: &[&[u8]]| parts.concat();

    match pixel_format {
        PixelFormat::Yuy2 | PixelFormat::Yvyu | PixelFormat::Uyvy | PixelFormat::Vyuy => luma
            .chunks_exact(2)
            .enumerate()
            .flat_map(|(k, l)| match pixel_format {
                PixelFormat::Yuy2 => [l[0], u[k], l[1], v[k]],
                PixelFormat::Yvyu => [l[0], v[k], l[1], u[k]],
                PixelFormat::Uyvy => [u[k], l[0], v[k], l[1]],
                _ => [v[k], l[0], u[k], l[1]],
            })
            .collect(),
        PixelFormat::Y41p => luma
            .chunks_exact(8)
            .enumerate()
            .flat_map(|(k, l)| {
                [
                    u[2 * k],
                    l[0],
                    v[2 * k],
                    l[1],
                    u[2 * k + 1],
                    l[2],
                    v[2 * k + 1],
                    l[3],
                    l[4],
                    l[5],
                    l[6],
                    l[7],
                ]
            })
            .collect(),
        PixelFormat::Nv24 | PixelFormat::Nv12 => concat(&[luma, interleave(u, v).as_slice()]),
        PixelFormat::Nv42 | PixelFormat::Nv21 => concat(&[luma, interleave(v, u).as_slice()]),
        PixelFormat::Yv12 | PixelFormat::Yvu9 => concat(&[luma, v, u]),
        _ => concat(&[luma, u, v]),
    }
}

/// Inverse of [`pack`]
pub fn unpack(pixel_format: PixelFormat, pixels: usize, src: &[u8]) -> (Vec<u8>, Vec<u8>, Vec<u8>) {
    let (lw, lh) = chroma_shift(pixel_format);
    let chroma_count = pixels >> (lw + lh);
    let pick = |offsets: &[usize], block: usize| -> Vec<u8> {
        src.chunks_exact(block)
            .flat_map(|chunk| offsets.iter().map(move |&o| chunk[o]))
            .collect()
    };

    match pixel_format {
        PixelFormat::Yuy2 => (pick(&[0, 2], 4), pick(&[1], 4), pick(&[3], 4)),
        PixelFormat::Yvyu => (pick(&[0, 2], 4), pick(&[3], 4), pick(&[1], 4)),
        PixelFormat::Uyvy => (pick(&[1, 3], 4), pick(&[0], 4), pick(&[2], 4)),
        PixelFormat::Vyuy => (pick(&[1, 3], 4), pick(&[2], 4), pick(&[0], 4)),
        PixelFormat::Y41p => (
            pick(&[1, 3, 5, 7, 8, 9, 10, 11], 12),
            pick(&[0, 4], 12),
            pick(&[2, 6], 12),
        ),
        _ => {
            let (luma, chroma) = src.split_at(pixels);
            let (first, second): (Vec<u8>, Vec<u8>) = match pixel_format {
                PixelFormat::Nv24 | PixelFormat::Nv42 | PixelFormat::Nv12 | PixelFormat::Nv21 => {
                    chroma[..2 * chroma_count]
                        .chunks_exact(2)
                        .map(|pair| (pair[0], pair[1]))
                        .unzip()
                }
                _ => (
                    chroma[..chroma_count].to_vec(),
                    chroma[chroma_count..2 * chroma_count].to_vec(),
                ),
            };

            let swapped = matches!(
                pixel_format,
                PixelFormat::Nv42 | PixelFormat::Nv21 | PixelFormat::Yv12 | PixelFormat::Yvu9
            );
            if swapped {
                (luma.to_vec(), second, first)
            } else {
                (luma.to_vec(), first, second)
            }
        }
    }
}

/// Encodes a `[r, g, b]` image into a YUV format
pub fn encode_yuv(
    pixel_format: PixelFormat,
    width: usize,
    height: usize,
    rgb: &[[u8; 3]],
) -> Vec<u8> {
    let (luma, u, v) = compute_planes(pixel_format, width, height, rgb);
    pack(pixel_format, &luma, &u, &v)
}

/// Decodes a YUV image to canonical 24 bit bytes (blue, green, red),
/// replicating every chroma sample over its group
pub fn decode_yuv(pixel_format: PixelFormat, width: usize, height: usize, src: &[u8]) -> Vec<u8> {
    let (luma, u, v) = unpack(pixel_format, width * height, src);
    let mut bgr = Vec::with_capacity(3 * width * height);
    for y in 0..height {
        for x in 0..width {
            let k = chroma_index(pixel_format, width, x, y);
            let [r, g, b] = yuv_to_rgb(luma[y * width + x], u[k], v[k]);
            bgr.extend_from_slice(&[b, g, r]);
        }
    }

    bgr
}
