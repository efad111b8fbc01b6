mod gui;
mod traits;
mod window_state;

pub use gui::*;
pub use traits::*;
pub use window_state::*;
