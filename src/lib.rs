pub mod assets;
pub mod color;
pub mod export;
pub mod inspect;
pub mod patch;
pub mod profile;
pub mod rom;
pub mod shuffle;
pub mod zspr;

pub use assets::{discover_sprites, read_sprite, AssetError, FileFilters, SpriteSource};
pub use rom::{apply_random_sprite_on_event, PatchError, PatchReport, TriggerEvents};
pub use shuffle::{shuffle_palette, ShuffleError};
pub use zspr::{ContainerError, SpriteContainer};

use rand::{rngs::StdRng, SeedableRng};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Error accessing `{}`: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error(transparent)]
    Container(#[from] ContainerError),
    #[error(transparent)]
    Patch(#[from] PatchError),
    #[error(transparent)]
    Shuffle(#[from] ShuffleError),
}

#[inline]
fn io_error(path: impl AsRef<Path>) -> impl FnOnce(std::io::Error) -> Error {
    let path = path.as_ref().to_owned();
    move |source| Error::Io { path, source }
}

/// Sprite discovery options shared by the subcommands.
#[derive(clap::Args, Debug)]
pub struct SpriteArgs {
    /// Directory searched recursively for .zspr files
    #[arg(short, long, default_value = "sprites")]
    pub sprites: PathBuf,
    /// Glob patterns to include sprite file names
    #[arg(short, long)]
    pub include: Vec<String>,
    /// Glob patterns to exclude sprite file names
    #[arg(short = 'x', long)]
    pub exclude: Vec<String>,
}

impl SpriteArgs {
    pub fn discover(&self) -> Result<Vec<PathBuf>, Error> {
        let filters = FileFilters {
            includes: self.include.clone(),
            excludes: self.exclude.clone(),
        };
        discover_sprites(&self.sprites, &filters).map_err(io_error(&self.sprites))
    }
}

/// Seeds the generator for a run, drawing a fresh seed when none is given.
/// The seed is logged so the run can be repeated.
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    let seed = seed.unwrap_or_else(rand::random);
    log::info!("Using seed {seed}");
    StdRng::seed_from_u64(seed)
}

fn convert_error<I: std::ops::Deref<Target = [u8]>>(
    input: I,
    e: nom::Err<nom::error::VerboseError<I>>,
) -> String {
    use std::fmt::Write;

    let e = match e {
        nom::Err::Incomplete(nom::Needed::Unknown) => return "Incomplete".into(),
        nom::Err::Incomplete(nom::Needed::Size(n)) => return format!("Need {n} more bytes"),
        nom::Err::Error(e) | nom::Err::Failure(e) => e,
    };
    let mut result = String::new();
    for (i, (substring, kind)) in e.errors.iter().enumerate() {
        let offset = nom::Offset::offset(&*input, substring);

        let _ = if i == 0 {
            write!(&mut result, "Parse error at position 0x{offset:x}")
        } else {
            write!(&mut result, ", 0x{offset:x}")
        };

        let _ = match kind {
            nom::error::VerboseErrorKind::Char(_) => unreachable!(),
            nom::error::VerboseErrorKind::Context(context) => write!(&mut result, " in {context}"),
            nom::error::VerboseErrorKind::Nom(err) => write!(&mut result, " ({err:?})"),
        };
    }
    result
}

#[inline]
fn is_log_level(lvl: log::LevelFilter) -> bool {
    lvl <= log::STATIC_MAX_LEVEL && lvl <= log::max_level()
}
