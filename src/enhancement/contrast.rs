use image::{GrayImage, Luma, Rgb, RgbImage};

/// Normalize local contrast without shifting color balance.
///
/// The image is converted to 8-bit CIE Lab (D65 white point, OpenCV-style
/// scaling: L * 255/100, a + 128, b + 128), CLAHE is applied to the L plane
/// only, and the untouched a/b planes are recombined before converting back
/// to RGB.
pub fn equalize_luminance(img: &RgbImage, clip_limit: f32, tile_grid: u32) -> RgbImage {
    let (width, height) = img.dimensions();
    let n = (width * height) as usize;

    let mut l_plane = GrayImage::new(width, height);
    let mut a_plane = vec![0u8; n];
    let mut b_plane = vec![0u8; n];

    for (x, y, px) in img.enumerate_pixels() {
        let (l, a, b) = srgb_to_lab(px[0], px[1], px[2]);
        l_plane.put_pixel(x, y, Luma([l]));
        let i = (y * width + x) as usize;
        a_plane[i] = a;
        b_plane[i] = b;
    }

    let l_eq = clahe(&l_plane, clip_limit, tile_grid);

    let mut out = RgbImage::new(width, height);
    for (x, y, px) in out.enumerate_pixels_mut() {
        let i = (y * width + x) as usize;
        let (r, g, b) = lab_to_srgb(l_eq.get_pixel(x, y)[0], a_plane[i], b_plane[i]);
        *px = Rgb([r, g, b]);
    }
    out
}

/// Contrast-limited adaptive histogram equalization on a gray plane.
///
/// The plane is divided into a `tile_grid` x `tile_grid` grid (shrunk so
/// every tile holds at least one pixel), each tile gets a clipped-histogram
/// equalization mapping, and pixels are remapped by bilinear interpolation
/// between the four surrounding tile mappings. Clipped histogram excess is
/// redistributed uniformly across all bins.
pub fn clahe(plane: &GrayImage, clip_limit: f32, tile_grid: u32) -> GrayImage {
    let (width, height) = plane.dimensions();
    if width == 0 || height == 0 {
        return plane.clone();
    }
    let tiles_x = tile_grid.clamp(1, width) as usize;
    let tiles_y = tile_grid.clamp(1, height) as usize;

    let xb = tile_bounds(width, tiles_x);
    let yb = tile_bounds(height, tiles_y);

    // one 256-entry remapping per tile
    let mut luts = vec![[0u8; 256]; tiles_x * tiles_y];
    for (ty, &(y0, y1)) in yb.iter().enumerate() {
        for (tx, &(x0, x1)) in xb.iter().enumerate() {
            let mut hist = [0u32; 256];
            for y in y0..y1 {
                for x in x0..x1 {
                    hist[plane.get_pixel(x, y)[0] as usize] += 1;
                }
            }
            let area = (y1 - y0) * (x1 - x0);

            // clip bins at clip_limit times the uniform level and hand the
            // excess back uniformly
            let limit = ((clip_limit * area as f32 / 256.0).max(1.0)) as u32;
            let mut excess = 0u32;
            for bin in hist.iter_mut() {
                if *bin > limit {
                    excess += *bin - limit;
                    *bin = limit;
                }
            }
            let bonus = excess / 256;
            let residual = (excess % 256) as usize;
            for (i, bin) in hist.iter_mut().enumerate() {
                *bin += bonus + u32::from(i < residual);
            }

            let lut = &mut luts[ty * tiles_x + tx];
            let scale = 255.0 / area as f64;
            let mut cum = 0u64;
            for v in 0..256 {
                cum += hist[v] as u64;
                lut[v] = (cum as f64 * scale).round().min(255.0) as u8;
            }
        }
    }

    let centers_x: Vec<f32> = xb.iter().map(|&(a, b)| (a + b) as f32 / 2.0).collect();
    let centers_y: Vec<f32> = yb.iter().map(|&(a, b)| (a + b) as f32 / 2.0).collect();

    let mut out = GrayImage::new(width, height);
    for y in 0..height {
        let (ty0, ty1, fy) = bracket(&centers_y, y as f32 + 0.5);
        for x in 0..width {
            let (tx0, tx1, fx) = bracket(&centers_x, x as f32 + 0.5);
            let v = plane.get_pixel(x, y)[0] as usize;

            let v00 = luts[ty0 * tiles_x + tx0][v] as f32;
            let v01 = luts[ty0 * tiles_x + tx1][v] as f32;
            let v10 = luts[ty1 * tiles_x + tx0][v] as f32;
            let v11 = luts[ty1 * tiles_x + tx1][v] as f32;

            let top = v00 + (v01 - v00) * fx;
            let bottom = v10 + (v11 - v10) * fx;
            let val = top + (bottom - top) * fy;
            out.put_pixel(x, y, Luma([val.round().clamp(0.0, 255.0) as u8]));
        }
    }
    out
}

/// Split `len` pixels into `tiles` contiguous ranges; the first `len % tiles`
/// ranges are one pixel wider.
fn tile_bounds(len: u32, tiles: usize) -> Vec<(u32, u32)> {
    let base = len / tiles as u32;
    let rem = len as usize % tiles;
    let mut out = Vec::with_capacity(tiles);
    let mut start = 0;
    for i in 0..tiles {
        let size = base + u32::from(i < rem);
        out.push((start, start + size));
        start += size;
    }
    out
}

/// Find the two tile centers bracketing `pos` and the interpolation
/// fraction between them. Pixels outside the outermost centers snap to the
/// nearest tile mapping.
fn bracket(centers: &[f32], pos: f32) -> (usize, usize, f32) {
    if pos <= centers[0] {
        return (0, 0, 0.0);
    }
    let last = centers.len() - 1;
    if pos >= centers[last] {
        return (last, last, 0.0);
    }
    let mut i = 0;
    while centers[i + 1] < pos {
        i += 1;
    }
    let span = centers[i + 1] - centers[i];
    (i, i + 1, (pos - centers[i]) / span)
}

fn srgb_to_lab(r: u8, g: u8, b: u8) -> (u8, u8, u8) {
    let lin = |v: u8| {
        let v = v as f32 / 255.0;
        if v <= 0.04045 { v / 12.92 } else { ((v + 0.055) / 1.055).powf(2.4) }
    };
    let (r, g, b) = (lin(r), lin(g), lin(b));

    // D65 reference white
    let x = (0.412_453 * r + 0.357_580 * g + 0.180_423 * b) / 0.950_456;
    let y = 0.212_671 * r + 0.715_160 * g + 0.072_169 * b;
    let z = (0.019_334 * r + 0.119_193 * g + 0.950_227 * b) / 1.088_754;

    let f = |t: f32| {
        if t > 0.008_856 {
            t.cbrt()
        } else {
            7.787 * t + 16.0 / 116.0
        }
    };
    let (fx, fy, fz) = (f(x), f(y), f(z));

    let l = if y > 0.008_856 {
        116.0 * y.cbrt() - 16.0
    } else {
        903.3 * y
    };
    let a = 500.0 * (fx - fy) + 128.0;
    let b = 200.0 * (fy - fz) + 128.0;

    (
        (l * 255.0 / 100.0).round().clamp(0.0, 255.0) as u8,
        a.round().clamp(0.0, 255.0) as u8,
        b.round().clamp(0.0, 255.0) as u8,
    )
}

fn lab_to_srgb(l: u8, a: u8, b: u8) -> (u8, u8, u8) {
    let l = l as f32 * 100.0 / 255.0;
    let a = a as f32 - 128.0;
    let b = b as f32 - 128.0;

    let fy = (l + 16.0) / 116.0;
    let fx = fy + a / 500.0;
    let fz = fy - b / 200.0;

    let finv = |t: f32| {
        let t3 = t * t * t;
        if t3 > 0.008_856 {
            t3
        } else {
            (t - 16.0 / 116.0) / 7.787
        }
    };

    let x = finv(fx) * 0.950_456;
    let y = if l > 8.0 { fy * fy * fy } else { l / 903.3 };
    let z = finv(fz) * 1.088_754;

    let rl = 3.240_479 * x - 1.537_150 * y - 0.498_535 * z;
    let gl = -0.969_256 * x + 1.875_992 * y + 0.041_556 * z;
    let bl = 0.055_648 * x - 0.204_043 * y + 1.057_311 * z;

    let gam = |v: f32| {
        let v = v.clamp(0.0, 1.0);
        let v = if v <= 0.003_130_8 {
            12.92 * v
        } else {
            1.055 * v.powf(1.0 / 2.4) - 0.055
        };
        (v * 255.0).round() as u8
    };

    (gam(rl), gam(gl), gam(bl))
}
