use std::io::Cursor;

use egui::{ColorImage, TextureOptions};
use image::{ImageFormat, ImageReader, RgbaImage};

use crate::{AssetTable, EngineError, Rect, Result, SpriteSheetTable};

/// GPU texture owned by a sprite sheet.
///
/// Wraps an egui texture handle: the pixels reach the GPU when the egui-wgpu
/// renderer processes the next frame's texture delta, and the GPU texture is
/// freed once this value is dropped.
pub struct Texture2D {
    handle: egui::TextureHandle,
    pub width: u32,
    pub height: u32,
}

impl std::fmt::Debug for Texture2D {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Texture2D")
            .field("id", &self.handle.id())
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

impl Texture2D {
    /// Decodes image bytes (format sniffed from the data, falling back to the
    /// extension of `path`) and uploads them through `uploader`. The CPU-side
    /// bitmap is dropped as soon as the upload is queued.
    pub fn from_bytes(uploader: &dyn TextureUploader, path: &str, bytes: &[u8]) -> Result<Self> {
        let bitmap = decode_bitmap(path, bytes)?;
        Ok(uploader.upload(path, &bitmap))
    }

    pub fn id(&self) -> egui::TextureId {
        self.handle.id()
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Normalized UV rectangle of a pixel-space source rectangle.
    pub fn uv_rect(&self, src: Rect) -> Rect {
        if self.width == 0 || self.height == 0 {
            return Rect::default();
        }
        let (w, h) = (self.width as f32, self.height as f32);
        Rect::new(src.x / w, src.y / h, src.w / w, src.h / h)
    }
}

/// Turns a decoded bitmap into a GPU texture.
pub trait TextureUploader {
    fn upload(&self, name: &str, bitmap: &RgbaImage) -> Texture2D;
}

impl TextureUploader for egui::Context {
    fn upload(&self, name: &str, bitmap: &RgbaImage) -> Texture2D {
        let (width, height) = bitmap.dimensions();
        let image =
            ColorImage::from_rgba_unmultiplied([width as usize, height as usize], bitmap.as_raw());
        let handle = self.load_texture(name, image, TextureOptions::NEAREST);
        Texture2D {
            handle,
            width,
            height,
        }
    }
}

fn decode_bitmap(path: &str, bytes: &[u8]) -> Result<RgbaImage> {
    let decode_err = |source: image::ImageError| EngineError::ImageDecode {
        path: path.to_string(),
        source,
    };

    let mut reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| decode_err(image::ImageError::IoError(e)))?;
    if reader.format().is_none() {
        if let Ok(format) = ImageFormat::from_path(path) {
            reader.set_format(format);
        }
    }

    Ok(reader.decode().map_err(decode_err)?.to_rgba8())
}

/// Outcome of one materialization pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MaterializeReport {
    pub uploaded: usize,
    /// Descriptor paths whose image is missing from the asset table.
    pub unresolved: Vec<String>,
    /// Descriptor paths whose image bytes could not be decoded.
    pub failed: Vec<String>,
}

/// Resolves every sheet's image against the asset table and installs a
/// texture for each one that decodes. Sheets that cannot be resolved keep no
/// texture and are reported; nothing here aborts the pass.
pub fn materialize(
    sheets: &mut SpriteSheetTable,
    assets: &AssetTable,
    uploader: &dyn TextureUploader,
) -> MaterializeReport {
    let mut report = MaterializeReport::default();

    for sheet in sheets.iter_mut() {
        let (image_path, bytes) = match resolve_image(sheet.image_path.as_deref(), assets) {
            Some(Ok(found)) => found,
            Some(Err(err)) => {
                log::warn!("sprite sheet {:?}: {}", sheet.descriptor_path, err);
                report.unresolved.push(sheet.descriptor_path.clone());
                continue;
            }
            None => {
                // Already warned about when the descriptor was decoded.
                log::debug!("sprite sheet {:?} has no image_path", sheet.descriptor_path);
                report.unresolved.push(sheet.descriptor_path.clone());
                continue;
            }
        };

        match Texture2D::from_bytes(uploader, image_path, bytes) {
            Ok(texture) => {
                log::debug!(
                    "uploaded {} for {} ({}x{})",
                    image_path,
                    sheet.descriptor_path,
                    texture.width,
                    texture.height
                );
                sheet.install_texture(texture);
                report.uploaded += 1;
            }
            Err(e) => {
                log::warn!("sprite sheet {:?}: {}", sheet.descriptor_path, e);
                report.failed.push(sheet.descriptor_path.clone());
            }
        }
    }

    report.unresolved.sort();
    report.failed.sort();
    report
}

/// Looks up a sheet's image bytes. `None` when the sheet names no image.
fn resolve_image<'a>(
    image_path: Option<&'a str>,
    assets: &'a AssetTable,
) -> Option<Result<(&'a str, &'a [u8])>> {
    let path = image_path?;
    Some(
        assets
            .bytes(path)
            .map(|bytes| (path, bytes))
            .ok_or_else(|| EngineError::UnresolvedAsset(path.to_string())),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AssetRecord, SpriteSheet, test_util::png_bytes};

    fn allocated(ctx: &egui::Context) -> usize {
        ctx.tex_manager().read().num_allocated()
    }

    fn sheet(path: &str, image: &str) -> SpriteSheet {
        SpriteSheet::decode(path, format!("image_path = \"{image}\"").as_bytes()).unwrap()
    }

    #[test]
    fn uploads_decoded_images() {
        let ctx = egui::Context::default();
        let mut assets = AssetTable::new();
        assets.insert(AssetRecord::new("hero.png", png_bytes(32, 16)));
        let mut sheets = SpriteSheetTable::new();
        sheets.insert(sheet("hero.toml", "hero.png"));

        let report = materialize(&mut sheets, &assets, &ctx);

        assert_eq!(report.uploaded, 1);
        let texture = sheets.find("hero.toml").unwrap().texture().unwrap();
        assert_eq!(texture.size(), (32, 16));
    }

    #[test]
    fn unresolved_and_undecodable_images_leave_no_texture() {
        let ctx = egui::Context::default();
        let mut assets = AssetTable::new();
        assets.insert(AssetRecord::new("garbage.png", vec![1, 2, 3, 4]));
        let mut sheets = SpriteSheetTable::new();
        sheets.insert(sheet("ghost.toml", "missing.png"));
        sheets.insert(sheet("broken.toml", "garbage.png"));
        sheets.insert(SpriteSheet::decode("nameless.toml", b"width = 8").unwrap());

        let report = materialize(&mut sheets, &assets, &ctx);

        assert_eq!(report.uploaded, 0);
        assert_eq!(report.unresolved, ["ghost.toml", "nameless.toml"]);
        assert_eq!(report.failed, ["broken.toml"]);
        assert_eq!(sheets.textured_count(), 0);
    }

    #[test]
    fn resolve_image_tells_missing_path_from_missing_asset() {
        let mut assets = AssetTable::new();
        assets.insert(AssetRecord::new("hero.png", vec![1]));

        assert!(resolve_image(None, &assets).is_none());
        assert!(matches!(
            resolve_image(Some("missing.png"), &assets),
            Some(Err(EngineError::UnresolvedAsset(path))) if path == "missing.png"
        ));
        assert!(matches!(
            resolve_image(Some("hero.png"), &assets),
            Some(Ok(("hero.png", [1])))
        ));
    }

    #[test]
    fn reinstalling_releases_the_previous_texture() {
        let ctx = egui::Context::default();
        let mut assets = AssetTable::new();
        assets.insert(AssetRecord::new("hero.png", png_bytes(8, 8)));
        let mut sheets = SpriteSheetTable::new();
        sheets.insert(sheet("hero.toml", "hero.png"));

        let before = allocated(&ctx);
        materialize(&mut sheets, &assets, &ctx);
        assert_eq!(allocated(&ctx), before + 1);

        materialize(&mut sheets, &assets, &ctx);
        assert_eq!(allocated(&ctx), before + 1);

        assert_eq!(sheets.release_textures(), 1);
        assert_eq!(allocated(&ctx), before);
        assert_eq!(sheets.release_textures(), 0);
    }

    #[test]
    fn uv_rect_normalizes_source_rectangles() {
        let ctx = egui::Context::default();
        let texture = Texture2D::from_bytes(&ctx, "hero.png", &png_bytes(32, 16)).unwrap();

        assert_eq!(
            texture.uv_rect(Rect::new(16.0, 0.0, 16.0, 16.0)),
            Rect::new(0.5, 0.0, 0.5, 1.0)
        );
    }
}
