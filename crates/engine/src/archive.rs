use std::{
    fs::File,
    io::{Cursor, Read, Seek},
    path::{Path, PathBuf},
};

use walkdir::WalkDir;
use zip::{CompressionMethod, ZipArchive, ZipWriter, write::SimpleFileOptions};

use crate::{EngineError, Result};

/// Default name of the packaged game data.
pub const DEFAULT_ARCHIVE: &str = "data.arpg";

/// Largest buffer reserved up front for one entry.
const MAX_PREALLOC: u64 = 1 << 20;

/// Metadata of one archive entry. Reading the contents goes through the
/// source the entry was listed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    pub index: usize,
    /// `/`-separated path inside the archive. Directories end with `/`.
    pub name: String,
    pub size: u64,
    pub is_dir: bool,
}

impl EntryInfo {
    /// Returns the name below `prefix` for files under it, `None` otherwise.
    pub fn file_under<'a>(&'a self, prefix: &str) -> Option<&'a str> {
        if self.is_dir {
            return None;
        }
        self.name
            .strip_prefix(prefix)
            .filter(|rest| !rest.is_empty())
    }
}

/// Something game data can be read from: the packaged zip archive or an
/// unpacked project directory.
pub trait ArchiveSource {
    /// Name (for logging).
    fn name(&self) -> &str;

    /// Lists every entry in the source's native order. Entries whose
    /// metadata cannot be read are skipped.
    fn entries(&mut self) -> Result<Vec<EntryInfo>>;

    /// Reads the full contents of `entry`: exactly `entry.size` bytes.
    fn read(&mut self, entry: &EntryInfo) -> Result<Vec<u8>>;

    /// Reads the first file entry named exactly `name`.
    fn read_by_name(&mut self, name: &str) -> Result<Vec<u8>> {
        let entry = self
            .entries()?
            .into_iter()
            .find(|e| !e.is_dir && e.name == name)
            .ok_or_else(|| EngineError::MissingEntry(name.to_string()))?;
        self.read(&entry)
    }
}

/// Zip-backed source. The underlying reader is closed when the source is dropped.
pub struct ZipSource<R: Read + Seek> {
    archive: ZipArchive<R>,
    name: String,
}

impl<R: Read + Seek> std::fmt::Debug for ZipSource<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZipSource")
            .field("name", &self.name)
            .field("entries", &self.archive.len())
            .finish()
    }
}

impl ZipSource<File> {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| EngineError::ArchiveOpen {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::new(file, path.display().to_string()).map_err(|e| match e {
            EngineError::ArchiveOpen { reason, .. } => EngineError::ArchiveOpen {
                path: path.to_path_buf(),
                reason,
            },
            other => other,
        })
    }
}

impl ZipSource<Cursor<Vec<u8>>> {
    /// Wraps an archive already held in memory.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        Self::new(Cursor::new(bytes), "<memory>")
    }
}

impl<R: Read + Seek> ZipSource<R> {
    pub fn new(reader: R, name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let archive = ZipArchive::new(reader).map_err(|e| EngineError::ArchiveOpen {
            path: PathBuf::from(&name),
            reason: e.to_string(),
        })?;
        Ok(Self { archive, name })
    }
}

impl<R: Read + Seek> ArchiveSource for ZipSource<R> {
    fn name(&self) -> &str {
        &self.name
    }

    fn entries(&mut self) -> Result<Vec<EntryInfo>> {
        let mut entries = Vec::with_capacity(self.archive.len());
        for index in 0..self.archive.len() {
            match self.archive.by_index_raw(index) {
                Ok(file) => entries.push(EntryInfo {
                    index,
                    name: file.name().to_string(),
                    size: file.size(),
                    is_dir: file.is_dir(),
                }),
                Err(e) => log::warn!("{}: skipping unreadable entry #{}: {}", self.name, index, e),
            }
        }
        Ok(entries)
    }

    fn read(&mut self, entry: &EntryInfo) -> Result<Vec<u8>> {
        let read_err = |reason: String| EngineError::EntryRead {
            name: entry.name.clone(),
            reason,
        };

        let file = self
            .archive
            .by_index(entry.index)
            .map_err(|e| read_err(e.to_string()))?;
        // The declared size comes from the archive and may be corrupt.
        let mut bytes = Vec::with_capacity(entry.size.min(MAX_PREALLOC) as usize);
        file.take(entry.size)
            .read_to_end(&mut bytes)
            .map_err(|e| read_err(e.to_string()))?;

        if bytes.len() as u64 != entry.size {
            return Err(read_err(format!(
                "expected {} bytes, got {}",
                entry.size,
                bytes.len()
            )));
        }
        Ok(bytes)
    }
}

/// Unpacked project directory, read straight from the OS filesystem.
pub struct DirSource {
    root: PathBuf,
    name: String,
    paths: Vec<PathBuf>,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(EngineError::ArchiveOpen {
                path: root,
                reason: "not a directory".to_string(),
            });
        }
        let name = root.display().to_string();
        Ok(Self {
            root,
            name,
            paths: Vec::new(),
        })
    }
}

/// Archive-style name of `path` below `root`: `/`-separated, directories
/// suffixed with `/`.
fn relative_name(root: &Path, path: &Path, is_dir: bool) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let mut name = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    if name.is_empty() {
        return None;
    }
    if is_dir {
        name.push('/');
    }
    Some(name)
}

impl ArchiveSource for DirSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn entries(&mut self) -> Result<Vec<EntryInfo>> {
        self.paths.clear();
        let mut entries = Vec::new();

        for item in WalkDir::new(&self.root).min_depth(1).sort_by_file_name() {
            let item = match item {
                Ok(item) => item,
                Err(e) => {
                    log::warn!("{}: skipping unreadable path: {}", self.name, e);
                    continue;
                }
            };
            let is_dir = item.file_type().is_dir();
            let Some(name) = relative_name(&self.root, item.path(), is_dir) else {
                continue;
            };
            let size = if is_dir {
                0
            } else {
                match item.metadata() {
                    Ok(meta) => meta.len(),
                    Err(e) => {
                        log::warn!("{}: skipping {:?}: {}", self.name, name, e);
                        continue;
                    }
                }
            };

            entries.push(EntryInfo {
                index: self.paths.len(),
                name,
                size,
                is_dir,
            });
            self.paths.push(item.into_path());
        }

        Ok(entries)
    }

    fn read(&mut self, entry: &EntryInfo) -> Result<Vec<u8>> {
        let path = self
            .paths
            .get(entry.index)
            .ok_or_else(|| EngineError::EntryRead {
                name: entry.name.clone(),
                reason: "entry was not listed by this source".to_string(),
            })?;
        std::fs::read(path).map_err(|e| EngineError::EntryRead {
            name: entry.name.clone(),
            reason: e.to_string(),
        })
    }
}

/// Opens `path` as a project directory if it is one, as a zip archive otherwise.
pub fn open_source(path: impl AsRef<Path>) -> Result<Box<dyn ArchiveSource>> {
    let path = path.as_ref();
    if path.is_dir() {
        Ok(Box::new(DirSource::new(path)?))
    } else {
        Ok(Box::new(ZipSource::open(path)?))
    }
}

/// Packs every file below `project_dir` into a zip archive at `out`.
/// Returns the number of files written.
pub fn pack_directory(project_dir: impl AsRef<Path>, out: impl AsRef<Path>) -> Result<usize> {
    let project_dir = project_dir.as_ref();
    let out = out.as_ref();
    let pack_err = |reason: String| EngineError::Pack {
        path: out.to_path_buf(),
        reason,
    };

    let mut source = DirSource::new(project_dir)?;
    let entries = source.entries()?;
    // The output may live inside the project directory.
    let out_abs = std::path::absolute(out)?;

    let mut writer = ZipWriter::new(File::create(out)?);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut written = 0;

    for entry in &entries {
        if entry.is_dir {
            writer
                .add_directory(entry.name.as_str(), options)
                .map_err(|e| pack_err(e.to_string()))?;
            continue;
        }
        let entry_path = project_dir.join(&entry.name);
        if std::path::absolute(&entry_path)? == out_abs {
            continue;
        }

        let bytes = source.read(entry)?;
        writer
            .start_file(entry.name.as_str(), options)
            .map_err(|e| pack_err(e.to_string()))?;
        std::io::Write::write_all(&mut writer, &bytes)?;
        written += 1;
        log::debug!("packed {} ({} bytes)", entry.name, bytes.len());
    }

    writer.finish().map_err(|e| pack_err(e.to_string()))?;
    log::info!("packed {} files into {:?}", written, out);
    Ok(written)
}
