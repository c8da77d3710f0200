// Pixel format conversions and compositing.
//
// Two packed formats live in this crate:
// - mask layer: premultiplied ARGB32, one u32 per pixel laid out 0xAARRGGBB
//   (A bits 24..31, R 16..23, G 8..15, B 0..7), rows `stride` pixels apart;
// - window: 0x00RRGGBB, what minifb expects.
// Everything else is straight-alpha `image::Rgba<u8>`.

use image::{Rgba, RgbaImage};

use crate::error::PixelFormatError;

/// (a * b) / 255 with rounding, for 8-bit channel math.
#[inline]
fn mul_div255(a: u32, b: u32) -> u32 {
    (a * b + 127) / 255
}

#[inline]
fn channels(p: u32) -> [u32; 4] {
    [(p >> 24) & 0xFF, (p >> 16) & 0xFF, (p >> 8) & 0xFF, p & 0xFF]
}

#[inline]
fn pack_argb(a: u32, r: u32, g: u32, b: u32) -> u32 {
    (a << 24) | (r << 16) | (g << 8) | b
}

/// Straight RGBA -> premultiplied 0xAARRGGBB.
pub fn premultiply(color: Rgba<u8>) -> u32 {
    let [r, g, b, a] = color.0.map(u32::from);
    pack_argb(a, mul_div255(r, a), mul_div255(g, a), mul_div255(b, a))
}

/// Premultiplied 0xAARRGGBB -> straight RGBA. Fully transparent is (0,0,0,0).
pub fn unpremultiply(p: u32) -> Rgba<u8> {
    let [a, r, g, b] = channels(p);
    if a == 0 {
        return Rgba([0, 0, 0, 0]);
    }
    let un = |c: u32| ((c * 255 + a / 2) / a).min(255) as u8;
    Rgba([un(r), un(g), un(b), a as u8])
}

/// Source-over on premultiplied pixels: out = src + dst * (1 - src_alpha).
pub fn blend_premultiplied(dst: u32, src: u32) -> u32 {
    let s = channels(src);
    let d = channels(dst);
    let inv = 255 - s[0];
    let o: [u32; 4] = std::array::from_fn(|i| (s[i] + mul_div255(d[i], inv)).min(255));
    pack_argb(o[0], o[1], o[2], o[3])
}

/// Source-over on straight-alpha pixels, in place.
pub fn blend_straight(dst: &mut Rgba<u8>, src: Rgba<u8>) {
    let [sr, sg, sb, sa] = src.0.map(u32::from);
    if sa == 0 {
        return;
    }
    if sa == 255 {
        *dst = src;
        return;
    }
    let [dr, dg, db, da] = dst.0.map(u32::from);
    // dst contribution that survives under the source
    let dw = mul_div255(da, 255 - sa);
    let out_a = sa + dw;
    if out_a == 0 {
        *dst = Rgba([0, 0, 0, 0]);
        return;
    }
    let mix = |s: u32, d: u32| ((s * sa + d * dw + out_a / 2) / out_a).min(255) as u8;
    *dst = Rgba([mix(sr, dr), mix(sg, dg), mix(sb, db), out_a.min(255) as u8]);
}

/// Straight RGBA -> 0x00RRGGBB for the window (alpha dropped).
#[inline]
pub fn pack_xrgb(color: Rgba<u8>) -> u32 {
    let [r, g, b, _] = color.0.map(u32::from);
    (r << 16) | (g << 8) | b
}

/// Decode a premultiplied ARGB32 buffer into a straight RGBA image.
///
/// `stride` is the distance between row starts, in pixels. Padding pixels
/// past `width` in each row are ignored. The last row only needs `width`
/// pixels, so a buffer of `stride * (height - 1) + width` is enough.
pub fn unpack_premultiplied_argb32(
    data: &[u32],
    width: usize,
    height: usize,
    stride: usize,
) -> Result<RgbaImage, PixelFormatError> {
    if stride < width {
        return Err(PixelFormatError::StrideTooSmall { stride, width });
    }
    let needed = if height == 0 || width == 0 { 0 } else { stride * (height - 1) + width };
    if data.len() < needed {
        return Err(PixelFormatError::BufferTooShort { len: data.len(), needed });
    }

    Ok(RgbaImage::from_fn(width as u32, height as u32, |x, y| {
        unpremultiply(data[y as usize * stride + x as usize])
    }))
}
