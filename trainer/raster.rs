//! Image I/O for the trainer: turns a picture into (coordinate -> color)
//! samples and renders a network's prediction back into a picture.

use std::path::Path;

use anyhow::{Context, Result};
use image::imageops::FilterType;
use image::{Rgb, RgbImage};

use braincell::{Dataset, Matrix, Network};

/// Decodes the image at `path`, resizes it to `resolution × resolution` and
/// builds one sample per pixel: input `[(x+1)/w, (y+1)/h]`, target the pixel's
/// RGB normalized to [0, 1].
pub fn load_dataset(path: &Path, resolution: u32) -> Result<Dataset> {
    let img = image::open(path).with_context(|| format!("failed to read image {}", path.display()))?;
    let rgb = img.resize_exact(resolution, resolution, FilterType::Triangle).to_rgb8();

    let side = resolution as f64;
    let rows = rgb
        .enumerate_pixels()
        .map(|(x, y, pixel)| {
            let [r, g, b] = pixel.0;
            vec![
                (x + 1) as f64 / side,
                (y + 1) as f64 / side,
                r as f64 / 255.0,
                g as f64 / 255.0,
                b as f64 / 255.0,
            ]
        })
        .collect();

    Ok(Dataset::split_columns(&Matrix::from_data(rows)?, 2)?)
}

/// Maps a network output in [0, 1] to a color byte.
pub fn to_byte(value: f64) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0) as u8
}

/// Evaluates `network` once per pixel of a `size × size` grid over the unit
/// square and writes the result as an image.
pub fn render(network: &Network, size: u32, path: &Path) -> Result<()> {
    let mut img = RgbImage::new(size, size);
    let mut scratch = network.scratch();
    let side = size as f64;

    for y in 0..size {
        for x in 0..size {
            let input = Matrix::row_vector(vec![x as f64 / side, y as f64 / side]);
            let out = &network.forward(&input, &mut scratch)?.data[0];
            let channel = |i: usize| out.get(i).copied().map_or(0, to_byte);
            img.put_pixel(x, y, Rgb([channel(0), channel(1), channel(2)]));
        }
    }

    img.save(path).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
