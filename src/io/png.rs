//! Palette image of the padded grid.

use std::path::Path;

use image::{Rgb, RgbImage};
use tracing::info;

use crate::error::Result;
use crate::grid::Grid;

/// 0 black, 1 green, 2 blue, 3 red; anything else black.
pub fn palette(value: u32) -> Rgb<u8> {
    match value {
        1 => Rgb([0, 255, 0]),
        2 => Rgb([0, 0, 255]),
        3 => Rgb([255, 0, 0]),
        _ => Rgb([0, 0, 0]),
    }
}

/// One pixel per padded cell, border included; x is the column, y the row.
pub fn render(grid: &Grid) -> RgbImage {
    let stride = grid.stride();
    let cells = grid.current();
    RgbImage::from_fn(stride as u32, grid.padded_rows() as u32, |x, y| {
        palette(cells[y as usize * stride + x as usize])
    })
}

pub fn write_png(grid: &Grid, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    render(grid).save_with_format(path, image::ImageFormat::Png)?;
    info!(path = %path.display(), "wrote image");
    Ok(())
}
