use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;

use super::{base_name, Image};

/// Raster extensions accepted by the startup scan, compared case-insensitively.
const SUPPORTED_EXTENSIONS: [&str; 11] = [
    "jpg", "jpeg", "png", "bmp", "gif", "tga", "psd", "hdr", "pic", "ppm", "pgm",
];

/// Filename-keyed store of GPU images, loaded once at startup from the
/// resource directory.
///
/// Keys are file base names with path components discarded; a later duplicate
/// base name in a subdirectory overwrites the earlier entry (reported at warn
/// level).
pub struct ImageCache {
    root: PathBuf,
    images: HashMap<String, Image>,
}

impl ImageCache {
    /// Cache rooted at `res/` under the process working directory.
    pub fn new() -> Self {
        Self::with_root("res")
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            images: HashMap::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Scans the resource directory and loads every supported image.
    ///
    /// A missing directory is created first; failure to create it is the one
    /// fatal error here. Files that fail to decode or negotiate a format are
    /// reported and skipped.
    pub fn load_all(&mut self, device: &wgpu::Device, queue: &wgpu::Queue) -> Result<()> {
        ensure_resource_dir(&self.root)?;

        for path in collect_image_files(&self.root) {
            match Image::from_path(&path, device, queue) {
                Ok(image) => self.insert(image),
                Err(e) => log::error!("skipping image {}: {e:#}", path.display()),
            }
        }

        log::info!(
            "loaded {} image(s) from {}",
            self.images.len(),
            self.root.display()
        );
        Ok(())
    }

    /// Inserts `image` under its name, overwriting any previous entry.
    pub fn insert(&mut self, image: Image) {
        let name = image.name().to_string();
        if let Some(old) = self.images.insert(name, image) {
            log::warn!(
                "image name collision: '{}' replaces an earlier entry{}",
                old.name(),
                old.path()
                    .map(|p| format!(" ({})", p.display()))
                    .unwrap_or_default()
            );
        }
    }

    /// Exact-name lookup; `None` for unknown names, never an error.
    pub fn get(&self, name: &str) -> Option<&Image> {
        self.images.get(name)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

impl Default for ImageCache {
    fn default() -> Self {
        Self::new()
    }
}

fn ensure_resource_dir(root: &Path) -> Result<()> {
    if root.is_dir() {
        return Ok(());
    }

    fs::create_dir_all(root)
        .with_context(|| format!("failed to create resource directory {}", root.display()))
}

/// All regular files under `root` with a supported extension, in a
/// deterministic order so duplicate-name overwrites are reproducible.
pub(crate) fn collect_image_files(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(e) => {
                log::debug!("resource scan: {e}");
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| has_supported_extension(p))
        .collect()
}

pub(crate) fn has_supported_extension(path: &Path) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };

    SUPPORTED_EXTENSIONS
        .iter()
        .any(|s| ext.eq_ignore_ascii_case(s))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"").unwrap();
    }

    // ── extension filter ──────────────────────────────────────────────────

    #[test]
    fn extension_filter_is_case_insensitive() {
        assert!(has_supported_extension(Path::new("a/fav.PNG")));
        assert!(has_supported_extension(Path::new("photo.JpEg")));
        assert!(has_supported_extension(Path::new("sky.hdr")));
    }

    #[test]
    fn unsupported_and_missing_extensions_are_rejected() {
        assert!(!has_supported_extension(Path::new("notes.txt")));
        assert!(!has_supported_extension(Path::new("archive.png.zip")));
        assert!(!has_supported_extension(Path::new("Makefile")));
    }

    // ── directory scan ────────────────────────────────────────────────────

    #[test]
    fn scan_walks_subdirectories_and_keeps_only_images() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();

        touch(&root.join("logo.png"));
        touch(&root.join("icons/fav.PNG"));
        touch(&root.join("icons/deep/back.tga"));
        touch(&root.join("readme.md"));
        fs::create_dir_all(root.join("empty")).unwrap();

        let mut names: Vec<String> = collect_image_files(root)
            .iter()
            .map(|p| base_name(p).unwrap())
            .collect();
        names.sort();

        assert_eq!(names, vec!["back.tga", "fav.PNG", "logo.png"]);
    }

    #[test]
    fn scan_key_preserves_original_case() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("icons/fav.PNG"));

        let files = collect_image_files(root);
        assert_eq!(files.len(), 1);
        assert_eq!(base_name(&files[0]).unwrap(), "fav.PNG");
    }

    // ── resource directory ────────────────────────────────────────────────

    #[test]
    fn missing_resource_dir_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("res");

        ensure_resource_dir(&root).unwrap();
        assert!(root.is_dir());
    }

    #[test]
    fn existing_resource_dir_is_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        ensure_resource_dir(dir.path()).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn impossible_creation_fails_and_names_the_path() {
        // A regular file where the directory should go makes creation fail.
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("res");
        fs::write(&blocker, b"").unwrap();

        let err = ensure_resource_dir(&blocker).unwrap_err();
        assert!(format!("{err:#}").contains("res"));
    }
}
