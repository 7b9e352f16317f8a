use std::{fs::File, io::Read, path::Path};

use anyhow::{bail, Context, Result};
use egui::ColorImage;
use png::{BitDepth, ColorType};

/// Decodes 8-bit RGBA or RGB PNG data
pub fn decode_png<R: Read>(reader: R) -> Result<ColorImage> {
    let decoder = png::Decoder::new(reader);
    let mut reader = decoder.read_info()?;
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf)?;

    if info.bit_depth != BitDepth::Eight {
        bail!("Bit depth must be 8, got {:?}", info.bit_depth);
    }

    buf.truncate(info.buffer_size());

    let rgba = match info.color_type {
        ColorType::Rgba => buf,
        ColorType::Rgb => buf
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], u8::MAX])
            .collect(),
        other => bail!("Color type must be RGBA or RGB, got {:?}", other),
    };

    Ok(ColorImage::from_rgba_unmultiplied(
        [info.width as usize, info.height as usize],
        &rgba,
    ))
}

pub fn load_png(path: impl AsRef<Path>) -> Result<ColorImage> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    decode_png(file).with_context(|| format!("Failed to decode {}", path.display()))
}
