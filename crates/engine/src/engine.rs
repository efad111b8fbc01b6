use std::path::{Path, PathBuf};

use crate::{
    ArchiveSource, AssetTable, EngineError, MaterializeReport, PROJECT_MANIFEST, ProjectManifest,
    Result, SpriteSheetTable, TextureUploader, materialize, open_source,
};

/// Everything loaded from one archive: the manifest, the raw assets and the
/// sprite sheets.
///
/// Loading happens in two stages. `load` reads and decodes the archive and can
/// run before a window exists; `materialize` turns sheet images into textures
/// and needs the window's egui context. Both run once, before the first frame.
#[derive(Debug)]
pub struct EngineState {
    pub path: Option<PathBuf>,
    pub manifest: ProjectManifest,
    pub assets: AssetTable,
    pub sheets: SpriteSheetTable,
}

impl EngineState {
    pub const NAME: &'static str = "Arpg Engine";
    pub const VERSION: &'static str = env!("CARGO_PKG_VERSION");

    /// Opens `path` (a packaged archive or a project directory) and loads it.
    /// Only failing to open the source is an error; broken entries are
    /// skipped.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::info!("Loading game data from {:?}...", path);

        let mut source = open_source(path)?;
        let mut state = Self::load_from(source.as_mut());
        state.path = Some(path.to_path_buf());
        Ok(state)
    }

    pub fn load_from(source: &mut dyn ArchiveSource) -> Self {
        let entries = source.entries().unwrap_or_else(|e| {
            log::warn!("{}: cannot list entries: {}", source.name(), e);
            Vec::new()
        });

        let manifest = match entries
            .iter()
            .find(|e| !e.is_dir && e.name == PROJECT_MANIFEST)
        {
            Some(entry) => source
                .read(entry)
                .and_then(|bytes| ProjectManifest::decode(&bytes))
                .unwrap_or_else(|e| {
                    log::warn!("{}: ignoring {}: {}", source.name(), PROJECT_MANIFEST, e);
                    ProjectManifest::default()
                }),
            None => {
                log::warn!("{}: no {} found", source.name(), PROJECT_MANIFEST);
                ProjectManifest::default()
            }
        };

        let assets = AssetTable::build(source, &entries);
        let sheets = SpriteSheetTable::build(source, &entries);

        log::info!(
            "{}: {} assets ({} bytes), {} sprite sheets",
            source.name(),
            assets.len(),
            assets.total_size(),
            sheets.len()
        );

        Self {
            path: None,
            manifest,
            assets,
            sheets,
        }
    }

    /// Uploads the image of every sprite sheet.
    pub fn materialize(&mut self, uploader: &dyn TextureUploader) -> MaterializeReport {
        let report = materialize(&mut self.sheets, &self.assets, uploader);
        log::info!(
            "Materialized {} of {} sprite sheet textures",
            report.uploaded,
            self.sheets.len()
        );
        report
    }

    /// Reloads from the same path and rematerializes. The current textures
    /// are released before the new ones are installed. On failure the current
    /// state is kept.
    pub fn reload(&mut self, uploader: &dyn TextureUploader) -> Result<MaterializeReport> {
        let path = self.path.clone().ok_or_else(|| EngineError::ArchiveOpen {
            path: PathBuf::new(),
            reason: "game data was not loaded from a path".to_string(),
        })?;
        let fresh = Self::load(&path)?;

        let released = self.sheets.release_textures();
        log::debug!("released {} textures before reload", released);
        *self = fresh;
        Ok(self.materialize(uploader))
    }
}

/// Result of trying to load the game data at startup.
#[derive(Debug)]
pub enum LoadState {
    Loaded(EngineState),
    /// The archive could not be opened; the engine keeps running and shows a
    /// "data not found" screen.
    Missing { path: PathBuf, reason: String },
}

impl LoadState {
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match EngineState::load(path) {
            Ok(state) => LoadState::Loaded(state),
            Err(e) => {
                log::error!("Game data unavailable: {}", e);
                LoadState::Missing {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                }
            }
        }
    }

    pub fn state(&self) -> Option<&EngineState> {
        match self {
            LoadState::Loaded(state) => Some(state),
            LoadState::Missing { .. } => None,
        }
    }

    pub fn state_mut(&mut self) -> Option<&mut EngineState> {
        match self {
            LoadState::Loaded(state) => Some(state),
            LoadState::Missing { .. } => None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadState::Loaded(_))
    }

    pub fn manifest(&self) -> Option<&ProjectManifest> {
        self.state().map(|s| &s.manifest)
    }
}
