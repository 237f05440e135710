use image::RgbImage;

/// Non-local-means denoise over all three channels jointly.
///
/// `strength` is the filter strength (`h` in the literature),
/// `template_radius` 3 means 7x7 patches and `search_radius` 10 means a
/// 21x21 search window. Borders are handled by coordinate clamping, which
/// replicates edge pixels.
///
/// Implemented with the shifted-difference formulation: for every offset in
/// the search window, the squared pixel-difference plane is box-filtered
/// through an integral image, giving the patch distance for every pixel at
/// that offset in O(width * height) instead of O(width * height * patch).
pub fn nl_means(img: &RgbImage, strength: f32, template_radius: u32, search_radius: u32) -> RgbImage {
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return img.clone();
    }
    let w = width as usize;
    let h = height as usize;
    let tr = template_radius as i64;
    let sr = search_radius as i64;
    let h2 = strength * strength;

    let clamp_x = |x: i64| x.clamp(0, w as i64 - 1) as u32;
    let clamp_y = |y: i64| y.clamp(0, h as i64 - 1) as u32;

    let mut acc = vec![[0f32; 3]; w * h];
    let mut wsum = vec![0f32; w * h];

    // scratch planes reused across offsets
    let mut diff = vec![0u32; w * h];
    let mut integral = vec![0u64; (w + 1) * (h + 1)];

    for dy in -sr..=sr {
        for dx in -sr..=sr {
            // squared difference between the image and its shifted copy,
            // summed over channels
            for y in 0..h {
                let sy = clamp_y(y as i64 + dy);
                for x in 0..w {
                    let sx = clamp_x(x as i64 + dx);
                    let p = img.get_pixel(x as u32, y as u32).0;
                    let q = img.get_pixel(sx, sy).0;
                    let mut d = 0u32;
                    for c in 0..3 {
                        let e = p[c] as i32 - q[c] as i32;
                        d += (e * e) as u32;
                    }
                    diff[y * w + x] = d;
                }
            }

            // integral image of the difference plane
            for y in 0..h {
                let mut row = 0u64;
                for x in 0..w {
                    row += diff[y * w + x] as u64;
                    integral[(y + 1) * (w + 1) + (x + 1)] = integral[y * (w + 1) + (x + 1)] + row;
                }
            }

            // weight each shifted pixel by its mean squared patch distance
            for y in 0..h {
                let y0 = (y as i64 - tr).max(0) as usize;
                let y1 = ((y as i64 + tr).min(h as i64 - 1) + 1) as usize;
                let sy = clamp_y(y as i64 + dy);
                for x in 0..w {
                    let x0 = (x as i64 - tr).max(0) as usize;
                    let x1 = ((x as i64 + tr).min(w as i64 - 1) + 1) as usize;

                    let sum = integral[y1 * (w + 1) + x1] + integral[y0 * (w + 1) + x0]
                        - integral[y0 * (w + 1) + x1]
                        - integral[y1 * (w + 1) + x0];
                    let area = ((y1 - y0) * (x1 - x0) * 3) as f32;
                    let d2 = sum as f32 / area;
                    let weight = (-d2 / h2).exp();

                    let q = img.get_pixel(clamp_x(x as i64 + dx), sy).0;
                    let cell = &mut acc[y * w + x];
                    for c in 0..3 {
                        cell[c] += weight * q[c] as f32;
                    }
                    wsum[y * w + x] += weight;
                }
            }
        }
    }

    // the zero offset always contributes weight 1.0, so wsum >= 1
    let mut out = RgbImage::new(width, height);
    for y in 0..h {
        for x in 0..w {
            let cell = acc[y * w + x];
            let norm = wsum[y * w + x];
            let px = out.get_pixel_mut(x as u32, y as u32);
            for c in 0..3 {
                px.0[c] = (cell[c] / norm).round().clamp(0.0, 255.0) as u8;
            }
        }
    }
    out
}
