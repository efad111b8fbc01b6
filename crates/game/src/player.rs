use engine::{
    Animator, Canvas, Color, Direction, EngineState, Frame, Game, Rect, SheetKind, Vec2,
    draw_sprite_or_placeholder,
};

/// The player-controlled character.
pub struct Player {
    position: Vec2,
    facing: Direction,
    moving: bool,
    animator: Animator,
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Player {
    pub const SHEET: &'static str = "player.toml";
    pub const SIZE: f32 = 50.0;
    /// Pixels per frame.
    pub const SPEED: f32 = 5.0;
    pub const DIAGONAL_FACTOR: f32 = 0.8;

    pub fn new() -> Self {
        Self {
            position: Vec2::new(50.0, 50.0),
            facing: Direction::Down,
            moving: false,
            animator: Animator::new("idle_down"),
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn facing(&self) -> Direction {
        self.facing
    }

    pub fn animator(&self) -> &Animator {
        &self.animator
    }

    fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.position, Vec2::new(Self::SIZE, Self::SIZE))
    }
}

impl Game for Player {
    fn update(&mut self, frame: &Frame, state: &EngineState) {
        let keys = &frame.config.bindings;
        let dx = frame.input.axis(keys.left, keys.right);
        let dy = frame.input.axis(keys.up, keys.down);

        let mut speed = Self::SPEED;
        if dx != 0 && dy != 0 {
            speed *= Self::DIAGONAL_FACTOR;
        }
        self.position += Vec2::new(dx as f32, dy as f32) * speed;

        match Direction::from_axes(dx, dy) {
            Some(direction) => {
                self.facing = direction;
                self.moving = true;
            }
            None => self.moving = false,
        }

        let sheet = state.sheets.find(Self::SHEET);
        let kind = sheet.map(|s| s.kind).unwrap_or(SheetKind::None);
        let action = if self.moving { "walk" } else { "idle" };
        self.animator
            .set_state(&format!("{}_{}", action, self.facing.suffix(kind)));

        if let Some(sheet) = sheet {
            self.animator.advance(frame.dt, sheet);
        }
    }

    fn draw(&self, canvas: &mut dyn Canvas, state: &EngineState) {
        draw_sprite_or_placeholder(
            canvas,
            &state.sheets,
            Self::SHEET,
            &self.animator,
            self.bounds(),
            Color::RED,
        );
    }
}
