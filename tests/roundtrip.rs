use jcodec::bmp::BmpImage;
use jcodec::color::RgbImage;
use jcodec::{bmp, codec, quantization};
use std::io::Cursor;

fn gradient_image(width: usize, height: usize) -> RgbImage {
    let mut img = RgbImage::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let i = y * width + x;
            img.r[i] = ((x * 255) / width.max(1)) as u8;
            img.g[i] = ((y * 255) / height.max(1)) as u8;
            img.b[i] = 128;
        }
    }
    img
}

#[test]
fn bmp_roundtrip_is_lossless() {
    let img = gradient_image(20, 15);
    let bmp = BmpImage::from_image(img);
    let mut buf = Vec::new();
    bmp::write_bmp(&mut buf, &bmp).unwrap();
    let decoded = bmp::read_bmp(&mut Cursor::new(buf)).unwrap();
    assert_eq!(decoded, bmp);
}

#[test]
fn bmp_to_codec_to_bmp_pipeline_preserves_dimensions() {
    let img = gradient_image(33, 17);
    let bmp = BmpImage::from_image(img.clone());
    let mut bmp_bytes = Vec::new();
    bmp::write_bmp(&mut bmp_bytes, &bmp).unwrap();

    let reloaded = bmp::read_bmp(&mut Cursor::new(bmp_bytes)).unwrap();
    let quality_factor = quantization::quality_factor(80);
    let encoded = codec::encode(&reloaded.image, quality_factor);
    let decoded = codec::decode(&encoded, quality_factor).unwrap();

    assert_eq!(decoded.width, img.width);
    assert_eq!(decoded.height, img.height);

    let mut out_bmp = Vec::new();
    bmp::write_bmp(&mut out_bmp, &BmpImage::from_image(decoded)).unwrap();
    let final_img = bmp::read_bmp(&mut Cursor::new(out_bmp)).unwrap();
    assert_eq!(final_img.image.width, img.width);
    assert_eq!(final_img.image.height, img.height);
}

#[test]
fn higher_quality_factor_yields_lower_average_error() {
    let img = gradient_image(24, 24);
    let low_q = quantization::quality_factor(10);
    let high_q = quantization::quality_factor(95);

    let low_encoded = codec::encode(&img, low_q);
    let low_decoded = codec::decode(&low_encoded, low_q).unwrap();
    let high_encoded = codec::encode(&img, high_q);
    let high_decoded = codec::decode(&high_encoded, high_q).unwrap();

    let error = |decoded: &RgbImage| -> i64 {
        let mut total = 0i64;
        for i in 0..img.r.len() {
            total += (decoded.r[i] as i64 - img.r[i] as i64).abs();
            total += (decoded.g[i] as i64 - img.g[i] as i64).abs();
            total += (decoded.b[i] as i64 - img.b[i] as i64).abs();
        }
        total
    };

    assert!(error(&high_decoded) <= error(&low_decoded));
}
