use winit::keyboard::KeyCode;

use crate::{Document, Result, Vec2};

/// Well-known archive entry holding the project manifest.
pub const PROJECT_MANIFEST: &str = "project.toml";

/// Project-level settings read from `project.toml`. Every field is optional;
/// absent ones leave the engine defaults untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProjectManifest {
    pub window_title: Option<String>,
    pub window_width: Option<u32>,
    pub window_height: Option<u32>,
    pub target_fps: Option<u32>,
}

impl ProjectManifest {
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let doc = Document::decode(bytes)?;
        let positive = |key: &str| {
            doc.get_int(key)
                .and_then(|v| u32::try_from(v).ok())
                .filter(|v| *v > 0)
        };

        Ok(Self {
            window_title: doc.get_str("window_title").map(str::to_string),
            window_width: positive("window_width"),
            window_height: positive("window_height"),
            target_fps: positive("target_fps"),
        })
    }
}

/// Keys the game reads for movement and menus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputBindings {
    pub up: KeyCode,
    pub down: KeyCode,
    pub left: KeyCode,
    pub right: KeyCode,
    pub accept: KeyCode,
    pub back: KeyCode,
    pub option: KeyCode,
}

impl Default for InputBindings {
    fn default() -> Self {
        Self {
            up: KeyCode::ArrowUp,
            down: KeyCode::ArrowDown,
            left: KeyCode::ArrowLeft,
            right: KeyCode::ArrowRight,
            accept: KeyCode::KeyZ,
            back: KeyCode::KeyX,
            option: KeyCode::KeyC,
        }
    }
}

/// Engine-wide settings, built once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Virtual resolution the game draws at; letterboxed into the window.
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub target_fps: u32,
    pub debug: bool,
    pub debug_key: KeyCode,
    pub bindings: InputBindings,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 900,
            title: "test game".to_string(),
            target_fps: 60,
            debug: false,
            debug_key: KeyCode::Backquote,
            bindings: InputBindings::default(),
        }
    }
}

impl EngineConfig {
    pub fn apply_manifest(&mut self, manifest: &ProjectManifest) {
        if let Some(title) = &manifest.window_title {
            self.title = title.clone();
        }
        if let Some(width) = manifest.window_width {
            self.width = width;
        }
        if let Some(height) = manifest.window_height {
            self.height = height;
        }
        if let Some(fps) = manifest.target_fps {
            self.target_fps = fps;
        }
    }

    pub fn virtual_size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// Time budget of one frame, or `None` for an unlimited frame rate.
    pub fn frame_duration(&self) -> Option<std::time::Duration> {
        (self.target_fps > 0).then(|| std::time::Duration::from_secs_f64(1.0 / self.target_fps as f64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_overrides_defaults() {
        let manifest = ProjectManifest::decode(
            b"window_title = \"Demo\"\nwindow_width = 640\ntarget_fps = 30",
        )
        .unwrap();
        let mut config = EngineConfig::default();
        config.apply_manifest(&manifest);

        assert_eq!(config.title, "Demo");
        assert_eq!(config.width, 640);
        assert_eq!(config.height, 900);
        assert_eq!(config.target_fps, 30);
    }

    #[test]
    fn invalid_manifest_values_are_ignored() {
        let manifest =
            ProjectManifest::decode(b"window_title = 3\nwindow_width = -1\nwindow_height = \"big\"")
                .unwrap();
        assert_eq!(manifest, ProjectManifest::default());
    }

    #[test]
    fn frame_duration_follows_target_fps() {
        let mut config = EngineConfig::default();
        assert_eq!(
            config.frame_duration(),
            Some(std::time::Duration::from_secs_f64(1.0 / 60.0))
        );
        config.target_fps = 0;
        assert_eq!(config.frame_duration(), None);
    }
}
