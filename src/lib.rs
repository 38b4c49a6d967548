/*!
# jcodec

A small, pure Rust lossy image codec: RGB BMP in, 4:2:0 chroma
subsampled, 8x8 block DCT, quantized and Huffman entropy coded out.

The entropy stream is intentionally not JFIF-compatible: blocks are
coded in two phases (all luma first, then interleaved chroma) rather
than interleaved per MCU, and the stream carries no marker segments.

## Modules
- `bitstream` - MSB-first bit reader/writer
- `huffman` - canonical DC/AC prefix tables and category helpers
- `dct` - 8x8 forward/inverse DCT via matrix multiplication
- `quantization` - fixed quantization tables and quality scaling
- `zigzag` - zig-zag scan order
- `color` - RGB/YCbCr transform and chroma subsampling
- `block` - plane <-> 8x8 block grid partitioning
- `coding` - DC/AC entropy coding of one block
- `codec` - end-to-end encode/decode driver
- `bmp` - 24-bit BMP file I/O
- `error` - shared error type
*/

pub mod bitstream;
pub mod block;
pub mod bmp;
pub mod codec;
pub mod coding;
pub mod color;
pub mod dct;
pub mod error;
pub mod huffman;
pub mod quantization;
pub mod zigzag;

pub use codec::{decode, encode, EncodedImage};
pub use color::RgbImage;
pub use error::{CodecError, Result};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_api_roundtrips() {
        let mut img = RgbImage::new(8, 8);
        img.r.fill(120);
        img.g.fill(130);
        img.b.fill(140);
        let quality_factor = quantization::quality_factor(90);
        let encoded = encode(&img, quality_factor);
        let decoded = decode(&encoded, quality_factor).unwrap();
        assert_eq!(decoded.width, 8);
        assert_eq!(decoded.height, 8);
    }
}
