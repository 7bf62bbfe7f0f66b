use anyhow::{Context, Result};
use eframe::egui;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Node images, decoded once and uploaded as egui textures.
///
/// Keys are node image file names resolved against the image directory.
/// Failed loads are remembered so a missing file is reported once.
pub struct ImageCache {
    base: Option<PathBuf>,
    textures: HashMap<String, Option<egui::TextureHandle>>,
}

impl ImageCache {
    pub fn new(base: Option<PathBuf>) -> Self {
        Self {
            base,
            textures: HashMap::new(),
        }
    }

    fn resolve(&self, key: &str) -> PathBuf {
        let path = Path::new(key);
        match &self.base {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    pub fn texture(&mut self, ctx: &egui::Context, key: &str) -> Option<&egui::TextureHandle> {
        if !self.textures.contains_key(key) {
            let path = self.resolve(key);
            let texture = match load_image(&path) {
                Ok(image) => Some(ctx.load_texture(key, image, egui::TextureOptions::LINEAR)),
                Err(e) => {
                    tracing::warn!("Image {}: {:#}", key, e);
                    None
                }
            };
            self.textures.insert(key.to_string(), texture);
        }
        self.textures.get(key).and_then(Option::as_ref)
    }

    pub fn size(&mut self, ctx: &egui::Context, key: &str) -> Option<(f64, f64)> {
        self.texture(ctx, key).map(|t| {
            let [w, h] = t.size();
            (w as f64, h as f64)
        })
    }
}

pub fn load_image(path: &Path) -> Result<egui::ColorImage> {
    let image = image::open(path)
        .with_context(|| format!("Failed to decode {}", path.display()))?
        .to_rgba8();
    let size = [image.width() as usize, image.height() as usize];
    Ok(egui::ColorImage::from_rgba_unmultiplied(size, image.as_raw()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_image_reads_pixels() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dot.png");
        image::RgbaImage::from_pixel(3, 2, image::Rgba([10, 20, 30, 255]))
            .save(&path)
            .unwrap();
        let loaded = load_image(&path).unwrap();
        assert_eq!(loaded.size, [3, 2]);
        assert_eq!(loaded.pixels[0], egui::Color32::from_rgb(10, 20, 30));
    }

    #[test]
    fn test_missing_image_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(load_image(&dir.path().join("none.png")).is_err());
    }

    #[test]
    fn test_relative_keys_resolve_against_base() {
        let cache = ImageCache::new(Some(PathBuf::from("/images")));
        assert_eq!(cache.resolve("a.png"), PathBuf::from("/images/a.png"));
        assert_eq!(cache.resolve("/abs/b.png"), PathBuf::from("/abs/b.png"));
    }
}
