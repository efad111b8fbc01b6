use egui::{Align2, Color32, CornerRadius, FontId, Painter, Pos2};

use crate::{Animator, Color, Letterbox, Rect, SpriteSheetTable, Texture2D, Vec2};

/// 2D drawing surface handed to the game each frame. Coordinates are in the
/// canvas' own space (the virtual resolution for the game canvas).
pub trait Canvas {
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Draws the `src` pixel rectangle of `texture` into `dst`.
    fn draw_texture_region(&mut self, texture: &Texture2D, src: Rect, dst: Rect);

    /// Draws `text` with its top-left corner at `pos`.
    fn text(&mut self, pos: Vec2, text: &str, size: f32, color: Color);

    /// Width of `text` at `size`.
    fn measure_text(&self, text: &str, size: f32) -> f32;
}

/// Why a sprite could not be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    NoSheet,
    NoTexture,
    NoFrame,
}

/// What `draw_sprite_or_placeholder` ended up drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteDraw {
    Sprite,
    Placeholder(Placeholder),
}

/// Draws the animator's current frame of sheet `name` into `dst`, or a solid
/// `fallback` rectangle when the sheet is missing, has no texture, or its
/// state has no frames. Never fails.
pub fn draw_sprite_or_placeholder(
    canvas: &mut dyn Canvas,
    sheets: &SpriteSheetTable,
    name: &str,
    animator: &Animator,
    dst: Rect,
    fallback: Color,
) -> SpriteDraw {
    let outcome = match sheets.find(name) {
        None => Err(Placeholder::NoSheet),
        Some(sheet) => match (sheet.texture(), animator.current_frame(sheet)) {
            (None, _) => Err(Placeholder::NoTexture),
            (Some(_), None) => Err(Placeholder::NoFrame),
            (Some(texture), Some(frame)) => {
                canvas.draw_texture_region(texture, sheet.frame_rect(frame), dst);
                Ok(())
            }
        },
    };

    match outcome {
        Ok(()) => SpriteDraw::Sprite,
        Err(reason) => {
            canvas.fill_rect(dst, fallback);
            SpriteDraw::Placeholder(reason)
        }
    }
}

fn color32(color: Color) -> Color32 {
    let [r, g, b, a] = color.0;
    Color32::from_rgba_unmultiplied(r, g, b, a)
}

fn egui_rect(rect: Rect) -> egui::Rect {
    egui::Rect::from_min_size(Pos2::new(rect.x, rect.y), egui::vec2(rect.w, rect.h))
}

/// `Canvas` over an egui painter. Everything drawn is mapped through a
/// letterbox, so the game can draw at its virtual resolution.
pub struct EguiCanvas {
    painter: Painter,
    letterbox: Letterbox,
}

impl EguiCanvas {
    pub fn new(painter: Painter, letterbox: Letterbox) -> Self {
        Self { painter, letterbox }
    }

    /// Canvas in screen points, with no scaling.
    pub fn screen(painter: Painter) -> Self {
        Self::new(
            painter,
            Letterbox {
                scale: 1.0,
                offset: Vec2::zeros(),
            },
        )
    }

    fn to_screen(&self, rect: Rect) -> egui::Rect {
        egui_rect(self.letterbox.rect_to_screen(rect))
    }
}

impl Canvas for EguiCanvas {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        if !self.letterbox.is_visible() {
            return;
        }
        self.painter
            .rect_filled(self.to_screen(rect), CornerRadius::ZERO, color32(color));
    }

    fn draw_texture_region(&mut self, texture: &Texture2D, src: Rect, dst: Rect) {
        if !self.letterbox.is_visible() {
            return;
        }
        let uv = texture.uv_rect(src);
        self.painter.image(
            texture.id(),
            self.to_screen(dst),
            egui::Rect::from_min_size(Pos2::new(uv.x, uv.y), egui::vec2(uv.w, uv.h)),
            Color32::WHITE,
        );
    }

    fn text(&mut self, pos: Vec2, text: &str, size: f32, color: Color) {
        if !self.letterbox.is_visible() {
            return;
        }
        let at = self.letterbox.to_screen(pos);
        self.painter.text(
            Pos2::new(at.x, at.y),
            Align2::LEFT_TOP,
            text,
            FontId::proportional(size * self.letterbox.scale),
            color32(color),
        );
    }

    fn measure_text(&self, text: &str, size: f32) -> f32 {
        // Measured at virtual size so callers can centre in virtual space.
        self.painter
            .layout_no_wrap(text.to_string(), FontId::proportional(size), Color32::WHITE)
            .size()
            .x
    }
}


#[cfg(test)]
mod tests {
    use super::recording::{DrawCall, RecordingCanvas};
    use super::*;
    use crate::{AssetRecord, AssetTable, SpriteSheet, materialize, test_util::png_bytes};

    const DST: Rect = Rect::new(50.0, 50.0, 50.0, 50.0);

    fn table(descriptor: &str, with_image: bool) -> SpriteSheetTable {
        let mut sheets = SpriteSheetTable::new();
        sheets.insert(SpriteSheet::decode("player.toml", descriptor.as_bytes()).unwrap());
        let mut assets = AssetTable::new();
        if with_image {
            assets.insert(AssetRecord::new("player.png", png_bytes(64, 32)));
        }
        materialize(&mut sheets, &assets, &egui::Context::default());
        sheets
    }

    const PLAYER: &str = r#"
        image_path = "player.png"
        width = 16
        height = 32
        [states.idle]
        frames = [[16, 0], [32, 0]]
    "#;

    #[test]
    fn draws_the_first_frame_of_the_first_state() {
        let sheets = table(PLAYER, true);
        let mut canvas = RecordingCanvas::default();

        let drawn = draw_sprite_or_placeholder(
            &mut canvas,
            &sheets,
            "player.toml",
            &Animator::default(),
            DST,
            Color::RED,
        );

        assert_eq!(drawn, SpriteDraw::Sprite);
        assert_eq!(
            canvas.calls,
            [DrawCall::Texture {
                src: Rect::new(16.0, 0.0, 16.0, 32.0),
                dst: DST
            }]
        );
    }

    #[test]
    fn falls_back_to_a_placeholder() {
        let cases = [
            (table(PLAYER, true), "enemy.toml", Placeholder::NoSheet),
            (table(PLAYER, false), "player.toml", Placeholder::NoTexture),
            (
                table("image_path = \"player.png\"\n[states.idle]\nframes = [[1, \"y\"]]", true),
                "player.toml",
                Placeholder::NoFrame,
            ),
            (
                table("image_path = \"player.png\"", true),
                "player.toml",
                Placeholder::NoFrame,
            ),
        ];

        for (sheets, name, reason) in cases {
            let mut canvas = RecordingCanvas::default();
            let drawn = draw_sprite_or_placeholder(
                &mut canvas,
                &sheets,
                name,
                &Animator::new("walk_down"),
                DST,
                Color::RED,
            );
            assert_eq!(drawn, SpriteDraw::Placeholder(reason));
            assert_eq!(canvas.calls, [DrawCall::Fill(DST, Color::RED)]);
        }
    }
}
