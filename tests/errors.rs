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
#![warn(unused)]
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

use r2y::{convert_image, is_compatible, normalize_rgb, required_bytes, ErrorKind, PixelFormat};

use itertools::iproduct;
use rgb2yuv as r2y;

const WIDTH: u32 = 8;
const HEIGHT: u32 = 4;

fn check_err(result: Result<(), ErrorKind>, err: ErrorKind) {
    assert_eq!(result, Err(err));
}

fn is_valid_pair(src_format: PixelFormat, dst_format: PixelFormat) -> bool {
    (src_format.is_rgb() && (dst_format.is_yuv() || dst_format == PixelFormat::Rgb888))
        || (src_format.is_yuv() && dst_format == PixelFormat::Rgb888)
}

fn conversion_errors(src_format: PixelFormat, dst_format: PixelFormat) {
    let src_size = required_bytes(WIDTH, HEIGHT, src_format);
    let dst_size = required_bytes(WIDTH, HEIGHT, dst_format);
    let src = vec![0_u8; src_size + 1];
    let mut dst = vec![0_u8; dst_size + 1];

    if !is_valid_pair(src_format, dst_format) {
        check_err(
            convert_image(
                WIDTH,
                HEIGHT,
                src_format,
                &src,
                dst_format,
                &mut dst[..dst_size],
            ),
            ErrorKind::InvalidOperation,
        );
        return;
    }

    // Exact sizes, extra source bytes are ignored
    assert!(convert_image(
        WIDTH,
        HEIGHT,
        src_format,
        &src[..src_size],
        dst_format,
        &mut dst[..dst_size]
    )
    .is_ok());
    assert!(convert_image(WIDTH, HEIGHT, src_format, &src, dst_format, &mut dst[..dst_size]).is_ok());

    check_err(
        convert_image(
            WIDTH,
            HEIGHT,
            src_format,
            &src[..src_size - 1],
            dst_format,
            &mut dst[..dst_size],
        ),
        ErrorKind::NotEnoughData,
    );
    check_err(
        convert_image(
            WIDTH,
            HEIGHT,
            src_format,
            &src,
            dst_format,
            &mut dst[..dst_size - 1],
        ),
        ErrorKind::NotEnoughData,
    );
    check_err(
        convert_image(WIDTH, HEIGHT, src_format, &src, dst_format, &mut dst),
        ErrorKind::InvalidValue,
    );
}

#[cfg(test)]
mod errors {
    use super::*;
    #[cfg(target_arch = "wasm32")]
    use wasm_bindgen_test::wasm_bindgen_test as test;

    #[test]
    fn buffer_sizes() {
        for (&src_format, &dst_format) in iproduct!(&PixelFormat::ALL, &PixelFormat::ALL) {
            conversion_errors(src_format, dst_format);
        }
    }

    #[test]
    fn image_sizes() {
        let cases = [
            (3, 1, PixelFormat::Yuy2),
            (3, 2, PixelFormat::Yu12),
            (2, 1, PixelFormat::Nv12),
            (4, 1, PixelFormat::Y41p),
            (6, 1, PixelFormat::Yuv411p),
            (4, 2, PixelFormat::Yuv9),
            (8, 2, PixelFormat::Yvu9),
        ];

        for (width, height, pixel_format) in cases {
            assert!(!is_compatible(width, height, pixel_format));

            let src = vec![0_u8; 3 * (width as usize) * (height as usize)];
            let mut dst = vec![0_u8; 4 * (width as usize) * (height as usize)];
            check_err(
                convert_image(
                    width,
                    height,
                    PixelFormat::Rgb888,
                    &src,
                    pixel_format,
                    &mut dst,
                ),
                ErrorKind::InvalidValue,
            );
            check_err(
                convert_image(
                    width,
                    height,
                    pixel_format,
                    &dst,
                    PixelFormat::Rgb888,
                    &mut [],
                ),
                ErrorKind::InvalidValue,
            );
        }
    }

    #[test]
    fn size_checked_before_operation() {
        // Even an unsupported pair reports the image size first
        let mut dst = [0_u8; 16];
        check_err(
            convert_image(3, 2, PixelFormat::Nv12, &[], PixelFormat::Yuy2, &mut dst),
            ErrorKind::InvalidValue,
        );

        // Then the operation, before looking at buffers
        check_err(
            convert_image(2, 2, PixelFormat::Nv12, &[], PixelFormat::Yuy2, &mut []),
            ErrorKind::InvalidOperation,
        );
    }

    #[test]
    fn normalize() {
        assert_eq!(
            normalize_rgb(2, 2, PixelFormat::Nv12, &[0; 6]).err(),
            Some(ErrorKind::InvalidOperation)
        );
        assert_eq!(
            normalize_rgb(2, 2, PixelFormat::Rgb565, &[0; 7]).err(),
            Some(ErrorKind::NotEnoughData)
        );
        assert_eq!(
            normalize_rgb(2, 2, PixelFormat::Rgb888, &[0; 11]).err(),
            Some(ErrorKind::NotEnoughData)
        );
    }

    #[test]
    fn messages() {
        for err in [
            ErrorKind::InvalidValue,
            ErrorKind::InvalidOperation,
            ErrorKind::NotEnoughData,
            ErrorKind::OutOfMemory,
        ] {
            assert!(!err.to_string().is_empty());
        }
    }
}
