//! Minimal 24-bit uncompressed BMP reader/writer.
//!
//! Rows are stored bottom-up, pixels in B, G, R byte order. Unlike a
//! real Windows BMP, rows are NOT padded to a 4-byte boundary: this
//! matches the simplified bitmap format this module was modeled on,
//! not the full BMP specification. Only `BI_RGB` (uncompressed) images
//! are accepted.

use std::io::{Read, Write};

use crate::color::RgbImage;
use crate::error::{CodecError, Result};

const FILE_HEADER_SIZE: u32 = 14;
const INFO_HEADER_SIZE: u32 = 40;
const BI_RGB: u32 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitmapFileHeader {
    pub file_size: u32,
    pub reserved1: u16,
    pub reserved2: u16,
    pub off_bits: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitmapInfoHeader {
    pub width: i32,
    pub height: i32,
    pub planes: u16,
    pub bit_count: u16,
    pub compression: u32,
    pub size_image: u32,
    pub x_pels_per_meter: i32,
    pub y_pels_per_meter: i32,
    pub clr_used: u32,
    pub clr_important: u32,
}

/// A decoded bitmap together with the header fields it was read with, so
/// a later [`write_bmp`] can reproduce the source file rather than
/// synthesizing fresh header values.
#[derive(Debug, Clone, PartialEq)]
pub struct BmpImage {
    pub image: RgbImage,
    pub file_header: BitmapFileHeader,
    pub info_header: BitmapInfoHeader,
}

impl BmpImage {
    /// Wraps a freshly produced image with canonical header values, for
    /// callers with no original BMP to preserve metadata from.
    pub fn from_image(image: RgbImage) -> Self {
        let stride = row_stride(image.width);
        let size_image = (stride * image.height) as u32;
        let off_bits = FILE_HEADER_SIZE + INFO_HEADER_SIZE;
        let file_header = BitmapFileHeader {
            file_size: off_bits + size_image,
            reserved1: 0,
            reserved2: 0,
            off_bits,
        };
        let info_header = BitmapInfoHeader {
            width: image.width as i32,
            height: image.height as i32,
            planes: 1,
            bit_count: 24,
            compression: BI_RGB,
            size_image,
            x_pels_per_meter: 0,
            y_pels_per_meter: 0,
            clr_used: 0,
            clr_important: 0,
        };
        BmpImage {
            image,
            file_header,
            info_header,
        }
    }
}

fn row_stride(width: usize) -> usize {
    width * 3
}

/// Reads a 24-bit, uncompressed BMP from `reader` into a [`BmpImage`].
pub fn read_bmp<R: Read>(reader: &mut R) -> Result<BmpImage> {
    let mut magic = [0u8; 2];
    reader.read_exact(&mut magic)?;
    if &magic != b"BM" {
        return Err(CodecError::BadBitmapMagic);
    }

    let mut buf4 = [0u8; 4];
    let mut buf2 = [0u8; 2];

    reader.read_exact(&mut buf4)?;
    let file_size = u32::from_le_bytes(buf4);
    reader.read_exact(&mut buf2)?;
    let reserved1 = u16::from_le_bytes(buf2);
    reader.read_exact(&mut buf2)?;
    let reserved2 = u16::from_le_bytes(buf2);
    reader.read_exact(&mut buf4)?;
    let off_bits = u32::from_le_bytes(buf4);

    reader.read_exact(&mut buf4)?;
    let _header_size = u32::from_le_bytes(buf4);
    reader.read_exact(&mut buf4)?;
    let width = i32::from_le_bytes(buf4);
    reader.read_exact(&mut buf4)?;
    let height = i32::from_le_bytes(buf4);
    reader.read_exact(&mut buf2)?;
    let planes = u16::from_le_bytes(buf2);
    reader.read_exact(&mut buf2)?;
    let bit_count = u16::from_le_bytes(buf2);
    reader.read_exact(&mut buf4)?;
    let compression = u32::from_le_bytes(buf4);
    reader.read_exact(&mut buf4)?;
    let size_image = u32::from_le_bytes(buf4);
    reader.read_exact(&mut buf4)?;
    let x_pels_per_meter = i32::from_le_bytes(buf4);
    reader.read_exact(&mut buf4)?;
    let y_pels_per_meter = i32::from_le_bytes(buf4);
    reader.read_exact(&mut buf4)?;
    let clr_used = u32::from_le_bytes(buf4);
    reader.read_exact(&mut buf4)?;
    let clr_important = u32::from_le_bytes(buf4);

    if compression != BI_RGB {
        return Err(CodecError::UnsupportedBitmap(compression));
    }
    if bit_count != 24 {
        return Err(CodecError::UnsupportedBitDepth(bit_count));
    }
    if width <= 0 || height == 0 {
        return Err(CodecError::InvalidDimensions);
    }

    let width_abs = width as usize;
    let height_abs = height.unsigned_abs() as usize;
    let top_down = height < 0;

    let header_consumed = FILE_HEADER_SIZE + INFO_HEADER_SIZE;
    if off_bits > header_consumed {
        let mut skip = vec![0u8; (off_bits - header_consumed) as usize];
        reader.read_exact(&mut skip)?;
    }

    let stride = row_stride(width_abs);
    let mut pixels = vec![0u8; stride * height_abs];
    reader.read_exact(&mut pixels)?;

    let mut image = RgbImage::new(width_abs, height_abs);
    for row in 0..height_abs {
        let src_row = if top_down { row } else { height_abs - 1 - row };
        let row_start = src_row * stride;
        for x in 0..width_abs {
            let px = row_start + x * 3;
            let dst = row * width_abs + x;
            image.b[dst] = pixels[px];
            image.g[dst] = pixels[px + 1];
            image.r[dst] = pixels[px + 2];
        }
    }

    Ok(BmpImage {
        image,
        file_header: BitmapFileHeader {
            file_size,
            reserved1,
            reserved2,
            off_bits,
        },
        info_header: BitmapInfoHeader {
            width,
            height,
            planes,
            bit_count,
            compression,
            size_image,
            x_pels_per_meter,
            y_pels_per_meter,
            clr_used,
            clr_important,
        },
    })
}

/// Writes `bmp` as a bottom-up, 24-bit, uncompressed BMP with unpadded
/// rows, reproducing its header fields verbatim.
pub fn write_bmp<W: Write>(writer: &mut W, bmp: &BmpImage) -> Result<()> {
    let fh = &bmp.file_header;
    let ih = &bmp.info_header;

    writer.write_all(b"BM")?;
    writer.write_all(&fh.file_size.to_le_bytes())?;
    writer.write_all(&fh.reserved1.to_le_bytes())?;
    writer.write_all(&fh.reserved2.to_le_bytes())?;
    writer.write_all(&fh.off_bits.to_le_bytes())?;

    writer.write_all(&INFO_HEADER_SIZE.to_le_bytes())?;
    writer.write_all(&ih.width.to_le_bytes())?;
    writer.write_all(&ih.height.to_le_bytes())?;
    writer.write_all(&ih.planes.to_le_bytes())?;
    writer.write_all(&ih.bit_count.to_le_bytes())?;
    writer.write_all(&ih.compression.to_le_bytes())?;
    writer.write_all(&ih.size_image.to_le_bytes())?;
    writer.write_all(&ih.x_pels_per_meter.to_le_bytes())?;
    writer.write_all(&ih.y_pels_per_meter.to_le_bytes())?;
    writer.write_all(&ih.clr_used.to_le_bytes())?;
    writer.write_all(&ih.clr_important.to_le_bytes())?;

    let image = &bmp.image;
    for row in 0..image.height {
        let src_row = image.height - 1 - row;
        for x in 0..image.width {
            let i = src_row * image.width + x;
            writer.write_all(&[image.b[i], image.g[i], image.r[i]])?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn sample_image() -> RgbImage {
        let mut img = RgbImage::new(5, 3);
        for i in 0..15 {
            img.r[i] = (i * 7) as u8;
            img.g[i] = (i * 11) as u8;
            img.b[i] = (i * 13) as u8;
        }
        img
    }

    #[test]
    fn roundtrip_is_lossless() {
        let bmp = BmpImage::from_image(sample_image());
        let mut buf = Vec::new();
        write_bmp(&mut buf, &bmp).unwrap();
        let decoded = read_bmp(&mut Cursor::new(buf)).unwrap();
        assert_eq!(decoded, bmp);
    }

    #[test]
    fn roundtrip_preserves_nondefault_header_fields_verbatim() {
        let mut bmp = BmpImage::from_image(sample_image());
        bmp.file_header.reserved1 = 0xBEEF;
        bmp.file_header.reserved2 = 0xCAFE;
        bmp.info_header.planes = 7;
        bmp.info_header.size_image = 999;
        bmp.info_header.x_pels_per_meter = 2835;
        bmp.info_header.y_pels_per_meter = 2835;
        bmp.info_header.clr_used = 12;
        bmp.info_header.clr_important = 3;

        let mut buf = Vec::new();
        write_bmp(&mut buf, &bmp).unwrap();
        let decoded = read_bmp(&mut Cursor::new(buf)).unwrap();
        assert_eq!(decoded, bmp);
    }

    #[test]
    fn bad_magic_is_rejected() {
        let mut buf = vec![0u8; 54];
        buf[0] = b'X';
        buf[1] = b'X';
        let err = read_bmp(&mut Cursor::new(buf)).unwrap_err();
        assert!(matches!(err, CodecError::BadBitmapMagic));
    }

    #[test]
    fn nonzero_compression_is_rejected() {
        let bmp = BmpImage::from_image(sample_image());
        let mut buf = Vec::new();
        write_bmp(&mut buf, &bmp).unwrap();
        buf[30] = 1; // compression field
        let err = read_bmp(&mut Cursor::new(buf)).unwrap_err();
        assert!(matches!(err, CodecError::UnsupportedBitmap(1)));
    }

    #[test]
    fn rows_are_not_padded_to_four_bytes() {
        // 5 columns * 3 bytes = 15, which a real BMP would pad to 16.
        assert_eq!(row_stride(5), 15);
    }
}
