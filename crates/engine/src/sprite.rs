use std::collections::{BTreeMap, HashMap};

use crate::{ArchiveSource, Array, Document, EntryInfo, Node, Rect, Result, Table, Texture2D};

/// Archive prefix of sprite-sheet descriptors.
pub const SPRITESHEETS_PREFIX: &str = "spritesheets/";

/// Default frame edge length, in pixels.
pub const TILE_SIZE: u32 = 8;

/// Playback rate of a state that does not declare one.
pub const DEFAULT_FPS: u32 = 6;

/// Top-left pixel offset of one frame inside the sheet's image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpriteFrame {
    pub x: i32,
    pub y: i32,
}

impl SpriteFrame {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Named, ordered sequence of frames with a playback rate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationState {
    pub name: String,
    pub fps: u32,
    pub frames: Vec<SpriteFrame>,
}

/// Layout family of a sheet, which decides how facing maps to state names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SheetKind {
    #[default]
    None,
    FourDir,
    EightDir,
}

impl SheetKind {
    /// Unknown names resolve to `None`.
    pub fn parse(name: &str) -> Self {
        match name {
            "four_dir" => SheetKind::FourDir,
            "eight_dir" => SheetKind::EightDir,
            _ => SheetKind::None,
        }
    }
}

/// One source image, its frame geometry and its animation states.
///
/// `image_path` is a key into the asset table, resolved when textures are
/// materialized. `texture()` stays `None` until that succeeds.
#[derive(Debug)]
pub struct SpriteSheet {
    pub descriptor_path: String,
    pub image_path: Option<String>,
    pub frame_width: u32,
    pub frame_height: u32,
    pub kind: SheetKind,
    pub states: BTreeMap<String, AnimationState>,
    image: Option<Texture2D>,
}

impl SpriteSheet {
    /// Decodes a descriptor. Only a malformed document is an error; missing
    /// or mistyped fields fall back to their defaults and bad frames are
    /// dropped one by one.
    pub fn decode(descriptor_path: &str, bytes: &[u8]) -> Result<Self> {
        let doc = Document::decode(bytes)?;
        Ok(Self::from_document(descriptor_path, &doc))
    }

    pub fn from_document(descriptor_path: &str, doc: &Document) -> Self {
        let image_path = doc.get_str("image_path").map(str::to_string);
        if image_path.is_none() {
            log::warn!("sprite sheet {:?} has no image_path", descriptor_path);
        }

        let states = doc
            .get_table("states")
            .map(|states| decode_states(descriptor_path, states))
            .unwrap_or_default();

        SpriteSheet {
            descriptor_path: descriptor_path.to_string(),
            image_path,
            frame_width: dimension(doc, "width"),
            frame_height: dimension(doc, "height"),
            kind: doc.get_str("type").map(SheetKind::parse).unwrap_or_default(),
            states,
            image: None,
        }
    }

    pub fn state(&self, name: &str) -> Option<&AnimationState> {
        self.states.get(name)
    }

    /// First state by name, used when no state is tracked explicitly.
    pub fn first_state(&self) -> Option<&AnimationState> {
        self.states.values().next()
    }

    /// Source rectangle of `frame` inside the sheet's image, in pixels.
    pub fn frame_rect(&self, frame: SpriteFrame) -> Rect {
        Rect::new(
            frame.x as f32,
            frame.y as f32,
            self.frame_width as f32,
            self.frame_height as f32,
        )
    }

    pub fn texture(&self) -> Option<&Texture2D> {
        self.image.as_ref()
    }

    pub fn has_texture(&self) -> bool {
        self.image.is_some()
    }

    /// Installs a freshly uploaded texture. A previously installed one is
    /// released first.
    pub fn install_texture(&mut self, texture: Texture2D) {
        if let Some(old) = self.image.take() {
            log::debug!("releasing texture of {:?} before reinstall", self.descriptor_path);
            drop(old);
        }
        self.image = Some(texture);
    }

    /// Releases the texture, if any. Returns whether one was installed.
    pub fn release_texture(&mut self) -> bool {
        self.image.take().is_some()
    }
}

/// Positive integer field, `TILE_SIZE` otherwise.
fn dimension(doc: &Document, key: &str) -> u32 {
    doc.get_int(key)
        .and_then(|v| u32::try_from(v).ok())
        .filter(|v| *v > 0)
        .unwrap_or(TILE_SIZE)
}

fn decode_states(descriptor_path: &str, states: Table<'_>) -> BTreeMap<String, AnimationState> {
    let mut out = BTreeMap::new();

    for (name, node) in states.entries() {
        let Some(state) = node.as_table() else {
            log::warn!(
                "{}: state {:?} is not a table, skipping",
                descriptor_path,
                name
            );
            continue;
        };

        let fps = state
            .get_int("fps")
            .and_then(|v| u32::try_from(v).ok())
            .unwrap_or(DEFAULT_FPS);
        let frames = state
            .get_array("frames")
            .map(|frames| decode_frames(descriptor_path, name, frames))
            .unwrap_or_default();

        out.insert(
            name.to_string(),
            AnimationState {
                name: name.to_string(),
                fps,
                frames,
            },
        );
    }

    out
}

fn decode_frames(descriptor_path: &str, state: &str, frames: Array<'_>) -> Vec<SpriteFrame> {
    frames
        .iter()
        .enumerate()
        .filter_map(|(i, node)| {
            let frame = decode_frame(node);
            if frame.is_none() {
                log::warn!(
                    "{}: state {:?} frame #{} is not an [x, y] integer pair, dropping it",
                    descriptor_path,
                    state,
                    i
                );
            }
            frame
        })
        .collect()
}

fn decode_frame(node: Node<'_>) -> Option<SpriteFrame> {
    let pair = node.as_array()?;
    if pair.len() != 2 {
        return None;
    }
    let mut coords = pair
        .iter()
        .map(|n| n.as_int().and_then(|v| i32::try_from(v).ok()));
    let x = coords.next()??;
    let y = coords.next()??;
    Some(SpriteFrame { x, y })
}

/// Every sprite sheet of the current archive load, keyed by descriptor path
/// below `spritesheets/`.
#[derive(Debug, Default)]
pub struct SpriteSheetTable {
    sheets: HashMap<String, SpriteSheet>,
}

impl SpriteSheetTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes every file entry under `spritesheets/`. Entries that cannot be
    /// read or parsed are logged and left out; the rest load normally.
    pub fn build(source: &mut dyn ArchiveSource, entries: &[EntryInfo]) -> Self {
        let mut table = Self::new();

        for entry in entries {
            let Some(path) = entry.file_under(SPRITESHEETS_PREFIX) else {
                continue;
            };
            let sheet = source
                .read(entry)
                .and_then(|bytes| SpriteSheet::decode(path, &bytes));
            match sheet {
                Ok(sheet) => {
                    log::debug!(
                        "sprite sheet {} ({} states, {}x{} frames)",
                        path,
                        sheet.states.len(),
                        sheet.frame_width,
                        sheet.frame_height
                    );
                    table.insert(sheet);
                }
                Err(e) => log::warn!("{}: skipping sprite sheet {:?}: {}", source.name(), path, e),
            }
        }

        table
    }

    pub fn insert(&mut self, sheet: SpriteSheet) -> Option<SpriteSheet> {
        self.sheets.insert(sheet.descriptor_path.clone(), sheet)
    }

    pub fn find(&self, path: &str) -> Option<&SpriteSheet> {
        self.sheets.get(path)
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpriteSheet> {
        self.sheets.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut SpriteSheet> {
        self.sheets.values_mut()
    }

    /// Number of sheets holding a valid texture.
    pub fn textured_count(&self) -> usize {
        self.iter().filter(|s| s.has_texture()).count()
    }

    /// Releases every texture. Returns how many were released.
    pub fn release_textures(&mut self) -> usize {
        let mut released = 0;
        for sheet in self.iter_mut() {
            if sheet.release_texture() {
                released += 1;
            }
        }
        released
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EngineError, ZipSource, test_util::ZipBuilder};

    const HERO: &str = r#"
        image_path = "hero.png"
        width = 16
        height = 24
        type = "four_dir"

        [states.idle]
        fps = 4
        frames = [[0, 0], [16, 0]]

        [states.walk_down]
        frames = [[0, 24], [3, "x"], [32, 24], [1, 2, 3], 7]
    "#;

    #[test]
    fn decodes_a_full_descriptor() {
        let sheet = SpriteSheet::decode("hero.toml", HERO.as_bytes()).unwrap();

        assert_eq!(sheet.descriptor_path, "hero.toml");
        assert_eq!(sheet.image_path.as_deref(), Some("hero.png"));
        assert_eq!((sheet.frame_width, sheet.frame_height), (16, 24));
        assert_eq!(sheet.kind, SheetKind::FourDir);
        assert!(!sheet.has_texture());

        let idle = sheet.state("idle").unwrap();
        assert_eq!(idle.name, "idle");
        assert_eq!(idle.fps, 4);
        assert_eq!(idle.frames, [SpriteFrame::new(0, 0), SpriteFrame::new(16, 0)]);
    }

    #[test]
    fn malformed_frames_are_dropped_individually() {
        let sheet = SpriteSheet::decode("hero.toml", HERO.as_bytes()).unwrap();

        let walk = sheet.state("walk_down").unwrap();
        assert_eq!(walk.fps, DEFAULT_FPS);
        assert_eq!(
            walk.frames,
            [SpriteFrame::new(0, 24), SpriteFrame::new(32, 24)]
        );
    }

    #[test]
    fn missing_fields_use_defaults() {
        let sheet = SpriteSheet::decode("bare.toml", b"").unwrap();

        assert_eq!(sheet.image_path, None);
        assert_eq!((sheet.frame_width, sheet.frame_height), (TILE_SIZE, TILE_SIZE));
        assert_eq!(sheet.kind, SheetKind::None);
        assert!(sheet.states.is_empty());
        assert!(sheet.first_state().is_none());
    }

    #[test]
    fn mistyped_fields_use_defaults() {
        let sheet = SpriteSheet::decode(
            "odd.toml",
            br#"
            image_path = 12
            width = "wide"
            height = -4
            type = "hexagonal"
            states = { idle = { fps = "fast" }, broken = 3 }
            "#,
        )
        .unwrap();

        assert_eq!(sheet.image_path, None);
        assert_eq!((sheet.frame_width, sheet.frame_height), (TILE_SIZE, TILE_SIZE));
        assert_eq!(sheet.kind, SheetKind::None);
        assert_eq!(sheet.states.len(), 1);
        let idle = sheet.state("idle").unwrap();
        assert_eq!(idle.fps, DEFAULT_FPS);
        assert!(idle.frames.is_empty());
    }

    #[test]
    fn decoding_is_deterministic() {
        let a = SpriteSheet::decode("hero.toml", HERO.as_bytes()).unwrap();
        let b = SpriteSheet::decode("hero.toml", HERO.as_bytes()).unwrap();

        assert_eq!(a.descriptor_path, b.descriptor_path);
        assert_eq!(a.image_path, b.image_path);
        assert_eq!(a.frame_width, b.frame_width);
        assert_eq!(a.frame_height, b.frame_height);
        assert_eq!(a.kind, b.kind);
        assert_eq!(a.states, b.states);
    }

    #[test]
    fn invalid_toml_is_rejected() {
        let err = SpriteSheet::decode("bad.toml", b"image_path = = \"x\"").unwrap_err();
        assert!(matches!(err, EngineError::DocumentParse(_)));
    }

    #[test]
    fn first_state_is_ordered_by_name() {
        let sheet = SpriteSheet::decode(
            "s.toml",
            b"[states.walk]\nframes = [[8, 0]]\n[states.attack]\nframes = [[0, 8]]",
        )
        .unwrap();
        assert_eq!(sheet.first_state().unwrap().name, "attack");
    }

    #[test]
    fn frame_rect_uses_sheet_geometry() {
        let sheet = SpriteSheet::decode("hero.toml", HERO.as_bytes()).unwrap();
        assert_eq!(
            sheet.frame_rect(SpriteFrame::new(16, 0)),
            Rect::new(16.0, 0.0, 16.0, 24.0)
        );
    }

    #[test]
    fn table_skips_broken_descriptors() {
        let bytes = ZipBuilder::new()
            .dir("spritesheets/")
            .file("spritesheets/hero.toml", HERO)
            .file("spritesheets/bad.toml", "image_path = [unclosed")
            .file("spritesheets/empty.toml", "image_path = \"empty.png\"")
            .file("assets/hero.png", [0u8; 4])
            .finish();
        let mut source = ZipSource::from_bytes(bytes).unwrap();
        let entries = source.entries().unwrap();

        let table = SpriteSheetTable::build(&mut source, &entries);

        assert_eq!(table.len(), 2);
        assert!(table.find("hero.toml").is_some());
        assert!(table.find("bad.toml").is_none());
        let empty = table.find("empty.toml").unwrap();
        assert!(empty.states.is_empty());
        assert_eq!(table.textured_count(), 0);
    }

    #[test]
    fn nested_descriptor_paths_keep_their_directories() {
        let bytes = ZipBuilder::new()
            .file("spritesheets/enemies/slime.toml", "image_path = \"slime.png\"")
            .finish();
        let mut source = ZipSource::from_bytes(bytes).unwrap();
        let entries = source.entries().unwrap();

        let table = SpriteSheetTable::build(&mut source, &entries);
        assert!(table.find("enemies/slime.toml").is_some());
    }
}
