pub type Vec2 = nalgebra::Vector2<f32>;

/// Axis-aligned rectangle, top-left origin, y pointing down.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.w, self.h)
    }
}

/// RGBA colour, 8 bits per channel, not premultiplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub [u8; 4]);

impl Color {
    pub const WHITE: Color = Color([255, 255, 255, 255]);
    pub const RED: Color = Color([230, 41, 55, 255]);
    pub const PINK: Color = Color([255, 109, 194, 255]);
}

/// Scale and offset that fit a virtual resolution inside the screen while
/// keeping its aspect ratio. Unused screen space is split evenly on both sides.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Letterbox {
    pub scale: f32,
    pub offset: Vec2,
}

impl Letterbox {
    pub fn fit(screen: Vec2, virtual_size: Vec2) -> Self {
        if screen.x <= 0.0 || screen.y <= 0.0 || virtual_size.x <= 0.0 || virtual_size.y <= 0.0 {
            return Self {
                scale: 0.0,
                offset: Vec2::zeros(),
            };
        }

        let scale = (screen.x / virtual_size.x).min(screen.y / virtual_size.y);
        let scaled = virtual_size * scale;
        Self {
            scale,
            offset: Vec2::new(
                ((screen.x - scaled.x) / 2.0).floor(),
                ((screen.y - scaled.y) / 2.0).floor(),
            ),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.scale > 0.0
    }

    pub fn to_screen(&self, p: Vec2) -> Vec2 {
        self.offset + p * self.scale
    }

    pub fn rect_to_screen(&self, r: Rect) -> Rect {
        Rect::from_pos_size(self.to_screen(r.min()), r.size() * self.scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letterbox_pillarboxes_wide_screens() {
        let lb = Letterbox::fit(Vec2::new(2400.0, 900.0), Vec2::new(1200.0, 900.0));
        assert_eq!(lb.scale, 1.0);
        assert_eq!(lb.offset, Vec2::new(600.0, 0.0));
    }

    #[test]
    fn letterbox_bars_tall_screens() {
        let lb = Letterbox::fit(Vec2::new(600.0, 900.0), Vec2::new(1200.0, 900.0));
        assert_eq!(lb.scale, 0.5);
        assert_eq!(lb.offset, Vec2::new(0.0, 225.0));
        assert_eq!(
            lb.rect_to_screen(Rect::new(100.0, 100.0, 50.0, 50.0)),
            Rect::new(50.0, 275.0, 25.0, 25.0)
        );
    }

    #[test]
    fn letterbox_of_a_minimized_window_draws_nothing() {
        let lb = Letterbox::fit(Vec2::new(0.0, 0.0), Vec2::new(1200.0, 900.0));
        assert!(!lb.is_visible());
    }
}
