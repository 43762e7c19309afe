//! Plate description decoding.
//!
//! A plate description is an animated GIF: one frame per layer, in the same
//! order as the config's layer list. A pixel with non-zero alpha marks a grid
//! coordinate as occupied. Occupied pixels that touch an occupied neighbour
//! become channel links; isolated ones become pins.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use image::AnimationDecoder;
use image::RgbaImage;
use image::codecs::gif::GifDecoder;

use crate::config::Config;
use crate::errors::DecodeError;
use crate::layer::Layer;
use crate::log::{debug, warn};
use crate::types::{Coordinate2, Vector2};

/// Decode a description GIF into one layer per configured stack entry.
///
/// Frame order is layer order. Extra frames at the end are ignored; too few
/// frames is a [`DecodeError::MissingLayers`].
pub fn load_gif(path: impl AsRef<Path>, config: &Config) -> Result<Vec<Layer>, DecodeError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| DecodeError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let decoder = GifDecoder::new(BufReader::new(file))?;
    let frames = decoder.into_frames().collect_frames()?;

    if frames.len() < config.layers.len() {
        return Err(DecodeError::MissingLayers {
            frames: frames.len(),
            layers: config.layers.len(),
        });
    }
    if frames.len() > config.layers.len() {
        warn!(
            "description has {} frames but only {} configured layers; ignoring the rest",
            frames.len(),
            config.layers.len(),
        );
    }

    let mut layers = Vec::with_capacity(config.layers.len());
    for (frame, layer_config) in frames.iter().zip(&config.layers) {
        let mut layer = Layer::new(
            &layer_config.name,
            &layer_config.material,
            layer_config.thickness,
            config.grid,
            frame.buffer().width(),
            frame.buffer().height(),
        );
        if let Some(radius) = layer_config.pin_radius {
            layer.pin_radius = radius;
        }

        decode_frame(frame.buffer(), &mut layer)?;
        debug!(
            "decoded layer {}: {} links, {} pins",
            layer.name,
            layer.links().count(),
            layer.pins().count(),
        );
        layers.push(layer);
    }

    Ok(layers)
}

fn decode_frame(buffer: &RgbaImage, layer: &mut Layer) -> Result<(), DecodeError> {
    let (width, height) = buffer.dimensions();
    let occupied = |x: u32, y: u32| buffer.get_pixel(x, y).0[3] != 0;

    for (x, y, pixel) in buffer.enumerate_pixels() {
        if pixel.0[3] == 0 {
            continue;
        }
        // Tracing moves outlines half a unit past the occupied coordinate,
        // so features need clearance from the frame border.
        if x < 2 || y < 2 || x + 2 > width || y + 2 > height {
            return Err(DecodeError::OutOfBounds { x, y });
        }

        let position = Coordinate2::new(x as i32, y as i32);

        // Canonical storage makes the right/below pair sufficient: the
        // left/above links were added when those pixels were visited.
        let mut linked = occupied(x - 1, y) || occupied(x, y - 1);
        if occupied(x + 1, y) {
            layer.add_link(position, position + Vector2::new(1, 0))?;
            linked = true;
        }
        if occupied(x, y + 1) {
            layer.add_link(position, position + Vector2::new(0, 1))?;
            linked = true;
        }

        if !linked {
            layer.add_pin(position, None);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn frame(width: u32, height: u32, occupied: &[(u32, u32)]) -> RgbaImage {
        let mut buffer = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0]));
        for &(x, y) in occupied {
            buffer.put_pixel(x, y, Rgba([0, 0, 0, 255]));
        }
        buffer
    }

    fn decoded(buffer: &RgbaImage) -> Result<Layer, DecodeError> {
        let mut layer = Layer::new("test", "acrylic", 2.0, 3.0, buffer.width(), buffer.height());
        decode_frame(buffer, &mut layer)?;
        Ok(layer)
    }

    #[test]
    fn adjacent_pixels_become_links() {
        let layer = decoded(&frame(16, 16, &[(4, 4), (5, 4), (6, 4)])).unwrap();
        let links: Vec<_> = layer.links().collect();
        assert_eq!(
            links,
            vec![
                (Coordinate2::new(4, 4), Coordinate2::new(5, 4)),
                (Coordinate2::new(5, 4), Coordinate2::new(6, 4)),
            ],
        );
        assert_eq!(layer.pins().count(), 0);
    }

    #[test]
    fn vertical_runs_link_too() {
        let layer = decoded(&frame(16, 16, &[(4, 4), (4, 5)])).unwrap();
        assert_eq!(
            layer.links().collect::<Vec<_>>(),
            vec![(Coordinate2::new(4, 4), Coordinate2::new(4, 5))],
        );
    }

    #[test]
    fn isolated_pixel_becomes_pin() {
        let layer = decoded(&frame(16, 16, &[(8, 8)])).unwrap();
        assert_eq!(layer.links().count(), 0);
        assert_eq!(
            layer.pins().collect::<Vec<_>>(),
            vec![(Coordinate2::new(8, 8), None)],
        );
    }

    #[test]
    fn diagonal_pixels_stay_separate_pins() {
        let layer = decoded(&frame(16, 16, &[(4, 4), (5, 5)])).unwrap();
        assert_eq!(layer.links().count(), 0);
        assert_eq!(layer.pins().count(), 2);
    }

    #[test]
    fn border_margin_is_enforced() {
        assert!(matches!(
            decoded(&frame(16, 16, &[(1, 8)])),
            Err(DecodeError::OutOfBounds { x: 1, y: 8 }),
        ));
        assert!(matches!(
            decoded(&frame(16, 16, &[(8, 1)])),
            Err(DecodeError::OutOfBounds { .. }),
        ));
        assert!(matches!(
            decoded(&frame(16, 16, &[(15, 8)])),
            Err(DecodeError::OutOfBounds { .. }),
        ));
        assert!(matches!(
            decoded(&frame(16, 16, &[(8, 15)])),
            Err(DecodeError::OutOfBounds { .. }),
        ));
    }

    #[test]
    fn margin_boundary_coordinates_are_allowed() {
        assert!(decoded(&frame(16, 16, &[(2, 2)])).is_ok());
        assert!(decoded(&frame(16, 16, &[(14, 14)])).is_ok());
    }
}
