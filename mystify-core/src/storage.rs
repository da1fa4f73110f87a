use crate::config::ResolvedPaths;
use anyhow::{anyhow, Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

/// Storage abstraction for the chapter tree on either side of the conversion
pub trait ChapterStorage {
    /// Chapter names in processing order (lexicographic by file name)
    fn list_chapters(&self) -> Result<Vec<String>>;
    fn read_chapter(&self, name: &str) -> Result<String>;

    /// Output A: converted chapter under the same name
    fn store_converted(&self, name: &str, content: &str) -> Result<()>;
    /// Output B: raw concatenation of every chapter
    fn store_combined(&self, content: &str) -> Result<()>;

    /// Where the combined document goes, for reporting
    fn combined_location(&self) -> Option<PathBuf> {
        None
    }

    /// Where converted chapters go, for reporting
    fn converted_location(&self) -> Option<PathBuf> {
        None
    }
}

/// File-based storage over the project's chapters and output directories
pub struct FileStorage {
    chapters_dir: PathBuf,
    output_dir: PathBuf,
    readme_path: PathBuf,
    chapter_extension: Option<String>,
}

impl FileStorage {
    pub fn new(paths: &ResolvedPaths) -> Self {
        Self {
            chapters_dir: paths.chapters_dir.clone(),
            output_dir: paths.output_dir.clone(),
            readme_path: paths.readme_path.clone(),
            chapter_extension: paths.chapter_extension.clone(),
        }
    }

    fn chapter_path(&self, name: &str) -> PathBuf {
        self.chapters_dir.join(name)
    }

    fn converted_path(&self, name: &str) -> PathBuf {
        self.output_dir.join(name)
    }

    fn is_chapter(&self, path: &Path) -> bool {
        match &self.chapter_extension {
            Some(wanted) => path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext == wanted),
            None => true,
        }
    }
}

/// Write `content` to `path`, creating missing parent directories.
fn write_creating_parents(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

impl ChapterStorage for FileStorage {
    fn list_chapters(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.chapters_dir).with_context(|| {
            format!(
                "Failed to list chapters directory {}",
                self.chapters_dir.display()
            )
        })?;

        let mut chapters = Vec::new();
        for entry in entries {
            let entry = entry.with_context(|| {
                format!("Failed to read entry in {}", self.chapters_dir.display())
            })?;
            let path = entry.path();
            if !path.is_file() || !self.is_chapter(&path) {
                continue;
            }
            let name = entry
                .file_name()
                .into_string()
                .map_err(|raw| anyhow!("Chapter file name is not valid UTF-8: {:?}", raw))?;
            chapters.push(name);
        }

        chapters.sort();
        Ok(chapters)
    }

    fn read_chapter(&self, name: &str) -> Result<String> {
        let path = self.chapter_path(name);
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read chapter {}", path.display()))
    }

    fn store_converted(&self, name: &str, content: &str) -> Result<()> {
        write_creating_parents(&self.converted_path(name), content)
    }

    fn store_combined(&self, content: &str) -> Result<()> {
        write_creating_parents(&self.readme_path, content)
    }

    fn combined_location(&self) -> Option<PathBuf> {
        Some(self.readme_path.clone())
    }

    fn converted_location(&self) -> Option<PathBuf> {
        Some(self.output_dir.clone())
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    chapters: BTreeMap<String, String>,
    converted: BTreeMap<String, String>,
    combined: Option<String>,
}

/// In-memory storage for tests and embedding; clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chapters<I, K, V>(chapters: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let state = MemoryState {
            chapters: chapters
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            ..MemoryState::default()
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|_| anyhow!("Memory storage lock poisoned"))
    }

    pub fn converted(&self, name: &str) -> Option<String> {
        self.lock().ok()?.converted.get(name).cloned()
    }

    pub fn converted_names(&self) -> Vec<String> {
        self.lock()
            .map(|state| state.converted.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn combined(&self) -> Option<String> {
        self.lock().ok()?.combined.clone()
    }
}

impl ChapterStorage for MemoryStorage {
    fn list_chapters(&self) -> Result<Vec<String>> {
        // BTreeMap keys are already sorted
        Ok(self.lock()?.chapters.keys().cloned().collect())
    }

    fn read_chapter(&self, name: &str) -> Result<String> {
        self.lock()?
            .chapters
            .get(name)
            .cloned()
            .ok_or_else(|| anyhow!("No such chapter: {}", name))
    }

    fn store_converted(&self, name: &str, content: &str) -> Result<()> {
        self.lock()?
            .converted
            .insert(name.to_string(), content.to_string());
        Ok(())
    }

    fn store_combined(&self, content: &str) -> Result<()> {
        self.lock()?.combined = Some(content.to_string());
        Ok(())
    }
}
