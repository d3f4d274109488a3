/// Straight-alpha RGBA8 pixel.
pub type Rgba8 = [u8; 4];

/// Source-over of a straight-alpha pixel onto an opaque matte colour.
pub fn over_matte(matte: [u8; 3], src: Rgba8) -> [u8; 3] {
    let sa = u16::from(src[3]);
    if sa == 255 {
        return [src[0], src[1], src[2]];
    }
    if sa == 0 {
        return matte;
    }
    let inv = 255u16 - sa;
    let mut out = [0u8; 3];
    for i in 0..3 {
        let sc = mul_div255(u16::from(src[i]), sa);
        let dc = mul_div255(u16::from(matte[i]), inv);
        out[i] = sc.saturating_add(dc);
    }
    out
}

/// Flatten an RGBA image onto `matte`, dropping the alpha channel.
pub fn flatten_onto(img: &image::RgbaImage, matte: [u8; 3]) -> image::RgbImage {
    let (w, h) = img.dimensions();
    let mut out = image::RgbImage::new(w, h);
    for (dst, src) in out.pixels_mut().zip(img.pixels()) {
        dst.0 = over_matte(matte, src.0);
    }
    out
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/compose/blend.rs"]
mod tests;
