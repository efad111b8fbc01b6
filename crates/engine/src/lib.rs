mod animation;
mod archive;
mod assets;
mod canvas;
mod config;
mod core;
mod delta_timer;
mod document;
mod engine;
mod error;
mod input;
mod overlay;
mod runtime;
mod sprite;
mod texture;
mod window;

#[cfg(test)]
mod test_util;

pub use animation::*;
pub use archive::*;
pub use assets::*;
pub use canvas::*;
pub use config::*;
pub use self::core::*;
pub use delta_timer::*;
pub use document::*;
pub use engine::*;
pub use error::*;
pub use input::*;
pub use overlay::*;
pub use runtime::*;
pub use sprite::*;
pub use texture::*;
pub use window::*;
