use crate::SheetKind;

/// Eight-way facing, clockwise from `Up`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    Up,
    UpRight,
    Right,
    DownRight,
    #[default]
    Down,
    DownLeft,
    Left,
    UpLeft,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::Up,
        Direction::UpRight,
        Direction::Right,
        Direction::DownRight,
        Direction::Down,
        Direction::DownLeft,
        Direction::Left,
        Direction::UpLeft,
    ];

    fn index(self) -> usize {
        self as usize
    }

    pub fn rotate_cw_45(self) -> Self {
        Self::ALL[(self.index() + 1) % 8]
    }

    pub fn rotate_ccw_45(self) -> Self {
        Self::ALL[(self.index() + 7) % 8]
    }

    /// Direction of an input axis pair (y pointing down). `None` when both are zero.
    pub fn from_axes(dx: i32, dy: i32) -> Option<Self> {
        Some(match (dx.signum(), dy.signum()) {
            (0, -1) => Direction::Up,
            (1, -1) => Direction::UpRight,
            (1, 0) => Direction::Right,
            (1, 1) => Direction::DownRight,
            (0, 1) => Direction::Down,
            (-1, 1) => Direction::DownLeft,
            (-1, 0) => Direction::Left,
            (-1, -1) => Direction::UpLeft,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::UpRight => "up_right",
            Direction::Right => "right",
            Direction::DownRight => "down_right",
            Direction::Down => "down",
            Direction::DownLeft => "down_left",
            Direction::Left => "left",
            Direction::UpLeft => "up_left",
        }
    }

    /// Suffix used in animation state names for a sheet of the given kind.
    /// Four-direction sheets only carry the cardinal directions, so diagonals
    /// fall back to their vertical component.
    pub fn suffix(self, kind: SheetKind) -> &'static str {
        match (kind, self) {
            (SheetKind::FourDir, Direction::UpLeft | Direction::UpRight) => Direction::Up.name(),
            (SheetKind::FourDir, Direction::DownLeft | Direction::DownRight) => {
                Direction::Down.name()
            }
            _ => self.name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_wraps_around() {
        assert_eq!(Direction::UpLeft.rotate_cw_45(), Direction::Up);
        assert_eq!(Direction::Up.rotate_ccw_45(), Direction::UpLeft);
        assert_eq!(Direction::Right.rotate_cw_45(), Direction::DownRight);

        let mut dir = Direction::Left;
        for _ in 0..8 {
            dir = dir.rotate_ccw_45();
        }
        assert_eq!(dir, Direction::Left);
    }

    #[test]
    fn axes_map_to_directions() {
        assert_eq!(Direction::from_axes(0, 0), None);
        assert_eq!(Direction::from_axes(1, 1), Some(Direction::DownRight));
        assert_eq!(Direction::from_axes(-5, 0), Some(Direction::Left));
        assert_eq!(Direction::from_axes(0, -1), Some(Direction::Up));
    }

    #[test]
    fn four_direction_sheets_collapse_diagonals() {
        assert_eq!(Direction::UpRight.suffix(SheetKind::FourDir), "up");
        assert_eq!(Direction::DownLeft.suffix(SheetKind::FourDir), "down");
        assert_eq!(Direction::Left.suffix(SheetKind::FourDir), "left");
        assert_eq!(Direction::DownLeft.suffix(SheetKind::EightDir), "down_left");
    }
}
