use crate::zspr::{ContainerError, SpriteContainer};
use std::{
    borrow::Cow,
    io,
    path::{Path, PathBuf},
};

pub const SPRITE_EXTENSION: &str = "zspr";

#[derive(Debug, Default)]
pub struct FileFilters {
    pub includes: Vec<String>,
    pub excludes: Vec<String>,
}

impl FileFilters {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.includes.is_empty() && self.excludes.is_empty()
    }
    pub fn matches(&self, s: &str) -> bool {
        if !self.includes.is_empty() && !self.includes.iter().any(|f| glob_match::glob_match(f, s))
        {
            return false;
        }
        !self.excludes.iter().any(|f| glob_match::glob_match(f, s))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("Error reading `{}`: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Invalid sprite `{}`: {source}", .path.display())]
    Container {
        path: PathBuf,
        #[source]
        source: ContainerError,
    },
}

/// Something that yields a decoded sprite container.
pub trait SpriteSource {
    fn label(&self) -> Cow<'_, str>;
    fn load(&self) -> Result<SpriteContainer, AssetError>;
}

impl SpriteSource for Path {
    fn label(&self) -> Cow<'_, str> {
        self.to_string_lossy()
    }
    fn load(&self) -> Result<SpriteContainer, AssetError> {
        read_sprite(self)
    }
}

impl SpriteSource for PathBuf {
    #[inline]
    fn label(&self) -> Cow<'_, str> {
        self.as_path().label()
    }
    #[inline]
    fn load(&self) -> Result<SpriteContainer, AssetError> {
        read_sprite(self)
    }
}

impl SpriteSource for SpriteContainer {
    #[inline]
    fn label(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.sprite_name)
    }
    #[inline]
    fn load(&self) -> Result<SpriteContainer, AssetError> {
        Ok(self.clone())
    }
}

pub fn read_sprite(path: impl AsRef<Path>) -> Result<SpriteContainer, AssetError> {
    let path = path.as_ref();
    log::debug!("Reading `{}`", path.display());
    let data = std::fs::read(path).map_err(|source| AssetError::Io {
        path: path.to_owned(),
        source,
    })?;
    SpriteContainer::parse(&data).map_err(|source| AssetError::Container {
        path: path.to_owned(),
        source,
    })
}

#[inline]
fn is_sprite_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(SPRITE_EXTENSION))
        .unwrap_or(false)
}

fn collect_sprites(
    path: &Path,
    filters: &FileFilters,
    found: &mut Vec<PathBuf>,
) -> io::Result<()> {
    let meta = std::fs::metadata(path)?;
    if meta.is_file() {
        if !is_sprite_file(path) {
            return Ok(());
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        if filters.matches(&name) {
            found.push(path.to_owned());
        } else {
            log::debug!("Skipping file `{}`", path.display());
        }
    } else if meta.is_dir() {
        for entry in std::fs::read_dir(path)?.flatten() {
            collect_sprites(&entry.path(), filters, found)?;
        }
    }
    Ok(())
}

/// Recursively finds `.zspr` files under `dir`, sorted by path.
pub fn discover_sprites(dir: impl AsRef<Path>, filters: &FileFilters) -> io::Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let mut found = Vec::new();
    collect_sprites(dir, filters, &mut found)?;
    found.sort();
    log::debug!("Found {} sprites in `{}`", found.len(), dir.display());
    Ok(found)
}
