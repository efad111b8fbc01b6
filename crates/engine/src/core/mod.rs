mod direction;
mod math;

pub use direction::*;
pub use math::*;
