use std::fs;
use std::io::Cursor;
use std::path::Path;

use anyhow::{Context, Result};
use exif::{In, Reader, Tag, Value};
use raylib::prelude::*;
use tracing::warn;

// --- Load Image, Apply EXIF Rotation, Create Texture ---
pub fn load_slide_texture(
    rl: &mut RaylibHandle,
    thread: &RaylibThread,
    image_path: &Path,
) -> Result<Texture2D> {
    let file_bytes =
        fs::read(image_path).with_context(|| format!("failed to read {image_path:?}"))?;

    let extension = image_path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase();

    // EXIF orientation is only reliable for JPEG; anything else renders as-is.
    let mut orientation = 1;
    if extension == "jpg" || extension == "jpeg" {
        match Reader::new().read_from_container(&mut Cursor::new(&file_bytes)) {
            Ok(exif) => {
                if let Some(field) = exif.get_field(Tag::Orientation, In::PRIMARY) {
                    if let Value::Short(values) = &field.value {
                        if let Some(value) = values.first() {
                            orientation = *value;
                        }
                    }
                }
            }
            Err(e) => {
                warn!("could not read EXIF data for {image_path:?}: {e}");
            }
        }
    }

    let mut image = Image::load_image_from_mem(&format!(".{extension}"), &file_bytes)
        .map_err(|e| anyhow::anyhow!("failed to decode image {image_path:?}: {e}"))?;

    // 1 = normal, 3 = 180 deg, 6 = 90 deg CW, 8 = 90 deg CCW.
    // Flipped orientations are ignored.
    match orientation {
        3 => {
            image.rotate_cw();
            image.rotate_cw();
        }
        6 => {
            image.rotate_cw();
        }
        8 => {
            image.rotate_ccw();
        }
        _ => {}
    }

    let texture = rl
        .load_texture_from_image(thread, &image)
        .map_err(|e| anyhow::anyhow!("failed to create texture for {image_path:?}: {e}"))?;

    Ok(texture)
}
