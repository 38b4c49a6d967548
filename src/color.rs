//! RGB <-> YCbCr color transform and 4:2:0 chroma subsampling.

/// Planar 8-bit RGB image, rows stored top-down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbImage {
    pub width: usize,
    pub height: usize,
    pub r: Vec<u8>,
    pub g: Vec<u8>,
    pub b: Vec<u8>,
}

impl RgbImage {
    pub fn new(width: usize, height: usize) -> Self {
        let n = width * height;
        Self {
            width,
            height,
            r: vec![0; n],
            g: vec![0; n],
            b: vec![0; n],
        }
    }
}

/// Full-resolution YCbCr image, one sample per channel per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YCbCrImage {
    pub width: usize,
    pub height: usize,
    pub y: Vec<u8>,
    pub cb: Vec<u8>,
    pub cr: Vec<u8>,
}

/// Chroma-subsampled 4:2:0 image: luma at full resolution, chroma
/// planes at half resolution in each dimension, padded up to a
/// multiple of 8 by edge replication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YCbCrImage420 {
    pub width: usize,
    pub height: usize,
    pub chroma_width: usize,
    pub chroma_height: usize,
    pub y: Vec<u8>,
    pub cb: Vec<u8>,
    pub cr: Vec<u8>,
}

fn clamp_u8(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

pub fn rgb_to_ycbcr(img: &RgbImage) -> YCbCrImage {
    let n = img.width * img.height;
    let mut y = vec![0u8; n];
    let mut cb = vec![0u8; n];
    let mut cr = vec![0u8; n];
    for i in 0..n {
        let (r, g, b) = (img.r[i] as f64, img.g[i] as f64, img.b[i] as f64);
        y[i] = clamp_u8(0.299 * r + 0.587 * g + 0.114 * b);
        cb[i] = clamp_u8(-0.168736 * r - 0.331264 * g + 0.5 * b + 128.0);
        cr[i] = clamp_u8(0.5 * r - 0.418688 * g - 0.081312 * b + 128.0);
    }
    YCbCrImage {
        width: img.width,
        height: img.height,
        y,
        cb,
        cr,
    }
}

pub fn ycbcr_to_rgb(img: &YCbCrImage) -> RgbImage {
    let n = img.width * img.height;
    let mut r = vec![0u8; n];
    let mut g = vec![0u8; n];
    let mut b = vec![0u8; n];
    for i in 0..n {
        let (y, cb, cr) = (
            img.y[i] as f64,
            img.cb[i] as f64 - 128.0,
            img.cr[i] as f64 - 128.0,
        );
        r[i] = clamp_u8(y + 1.402 * cr);
        g[i] = clamp_u8(y - 0.344136 * cb - 0.714136 * cr);
        b[i] = clamp_u8(y + 1.772 * cb);
    }
    RgbImage {
        width: img.width,
        height: img.height,
        r,
        g,
        b,
    }
}

fn round_up_to_multiple_of_8(v: usize) -> usize {
    (v + 7) / 8 * 8
}

/// Luma plane is copied through unchanged. Chroma planes are averaged
/// over each 2x2 cell with a truncating (not rounding) right shift by
/// two, matching the reference subsampler, then edge-replicated out to
/// a multiple of 8 in each dimension.
pub fn subsample_420(img: &YCbCrImage) -> YCbCrImage420 {
    let (width, height) = (img.width, img.height);
    let half_w = width.div_ceil(2);
    let half_h = height.div_ceil(2);
    let chroma_width = round_up_to_multiple_of_8(half_w);
    let chroma_height = round_up_to_multiple_of_8(half_h);

    let sample = |plane: &[u8], x: usize, y: usize| -> u8 {
        let cx = x.min(width - 1);
        let cy = y.min(height - 1);
        plane[cy * width + cx]
    };

    let mut cb = vec![0u8; chroma_width * chroma_height];
    let mut cr = vec![0u8; chroma_width * chroma_height];
    for cy in 0..half_h {
        for cx in 0..half_w {
            let x0 = cx * 2;
            let y0 = cy * 2;
            let sum_cb = sample(&img.cb, x0, y0) as u32
                + sample(&img.cb, x0 + 1, y0) as u32
                + sample(&img.cb, x0, y0 + 1) as u32
                + sample(&img.cb, x0 + 1, y0 + 1) as u32;
            let sum_cr = sample(&img.cr, x0, y0) as u32
                + sample(&img.cr, x0 + 1, y0) as u32
                + sample(&img.cr, x0, y0 + 1) as u32
                + sample(&img.cr, x0 + 1, y0 + 1) as u32;
            cb[cy * chroma_width + cx] = (sum_cb >> 2) as u8;
            cr[cy * chroma_width + cx] = (sum_cr >> 2) as u8;
        }
    }

    // Edge-replicate the last real column and row out to the padded extent.
    for cy in 0..chroma_height {
        let src_y = cy.min(half_h - 1);
        for cx in half_w..chroma_width {
            let src_x = half_w - 1;
            cb[cy * chroma_width + cx] = cb[src_y * chroma_width + src_x];
            cr[cy * chroma_width + cx] = cr[src_y * chroma_width + src_x];
        }
    }
    for cy in half_h..chroma_height {
        let src_y = half_h - 1;
        for cx in 0..chroma_width {
            cb[cy * chroma_width + cx] = cb[src_y * chroma_width + cx];
            cr[cy * chroma_width + cx] = cr[src_y * chroma_width + cx];
        }
    }

    YCbCrImage420 {
        width,
        height,
        chroma_width,
        chroma_height,
        y: img.y.clone(),
        cb,
        cr,
    }
}

/// Nearest-neighbor 2x2 replication back to full resolution.
pub fn upsample_420(img: &YCbCrImage420) -> YCbCrImage {
    let (width, height) = (img.width, img.height);
    let mut cb = vec![0u8; width * height];
    let mut cr = vec![0u8; width * height];
    for y in 0..height {
        let cy = y / 2;
        for x in 0..width {
            let cx = x / 2;
            cb[y * width + x] = img.cb[cy * img.chroma_width + cx];
            cr[y * width + x] = img.cr[cy * img.chroma_width + cx];
        }
    }
    YCbCrImage {
        width,
        height,
        y: img.y.clone(),
        cb,
        cr,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_ycbcr_roundtrip_within_rounding_tolerance() {
        let mut img = RgbImage::new(2, 2);
        img.r = vec![10, 200, 0, 255];
        img.g = vec![20, 100, 128, 255];
        img.b = vec![30, 50, 255, 0];
        let ycbcr = rgb_to_ycbcr(&img);
        let back = ycbcr_to_rgb(&ycbcr);
        for i in 0..4 {
            assert!((back.r[i] as i32 - img.r[i] as i32).abs() <= 2);
            assert!((back.g[i] as i32 - img.g[i] as i32).abs() <= 2);
            assert!((back.b[i] as i32 - img.b[i] as i32).abs() <= 2);
        }
    }

    #[test]
    fn constant_image_subsamples_to_constant_chroma() {
        let mut img = RgbImage::new(8, 8);
        img.r.fill(128);
        img.g.fill(64);
        img.b.fill(200);
        let ycbcr = rgb_to_ycbcr(&img);
        let sub = subsample_420(&ycbcr);
        let expected_cb = ycbcr.cb[0];
        let expected_cr = ycbcr.cr[0];
        assert!(sub.cb.iter().all(|&v| v == expected_cb));
        assert!(sub.cr.iter().all(|&v| v == expected_cr));
    }

    #[test]
    fn subsample_pads_to_multiple_of_eight() {
        let img = YCbCrImage {
            width: 18,
            height: 18,
            y: vec![0; 18 * 18],
            cb: vec![0; 18 * 18],
            cr: vec![0; 18 * 18],
        };
        let sub = subsample_420(&img);
        // half extents are 9x9, rounded up to 16x16.
        assert_eq!(sub.chroma_width, 16);
        assert_eq!(sub.chroma_height, 16);
    }

    #[test]
    fn subsample_upsample_roundtrip_on_flat_plane() {
        let mut img = YCbCrImage {
            width: 18,
            height: 18,
            y: vec![0; 18 * 18],
            cb: vec![77; 18 * 18],
            cr: vec![33; 18 * 18],
        };
        for (i, v) in img.y.iter_mut().enumerate() {
            *v = (i % 256) as u8;
        }
        let sub = subsample_420(&img);
        let restored = upsample_420(&sub);
        assert_eq!(restored.cb, vec![77; 18 * 18]);
        assert_eq!(restored.cr, vec![33; 18 * 18]);
        assert_eq!(restored.y, img.y);
    }

    #[test]
    fn averaging_truncates_rather_than_rounds() {
        let img = YCbCrImage {
            width: 2,
            height: 2,
            y: vec![0; 4],
            cb: vec![1, 1, 1, 0],
            cr: vec![0; 4],
        };
        let sub = subsample_420(&img);
        // sum = 3, 3 >> 2 == 0, a rounding average would give 1.
        assert_eq!(sub.cb[0], 0);
    }
}
