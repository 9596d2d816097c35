use crate::{
    assets::read_sprite,
    io_error,
    rom::PatchError,
    shuffle::{checked_profile, recolor_or_keep},
    Error, SpriteArgs, SpriteContainer,
};
use rand::Rng;
use std::path::{Path, PathBuf};

#[derive(clap::Args)]
pub struct Args {
    /// Number of recolored sprites to write
    #[arg(short = 'n', long, default_value_t = 200)]
    count: usize,
    /// Directory to write sprites into [default: output]
    #[arg(short, long)]
    outdir: Option<PathBuf>,
    /// Seed for reproducible recoloring
    #[arg(long)]
    seed: Option<u64>,
    #[command(flatten)]
    sprites: SpriteArgs,
}

/// Writes `count` recolored copies of `sprite` to `outdir` as
/// `Mailpaletteshuffled.<i>.<file_name>` and returns their paths.
pub fn write_variants(
    sprite: &SpriteContainer,
    file_name: &str,
    outdir: &Path,
    count: usize,
    rng: &mut impl Rng,
) -> Result<Vec<PathBuf>, Error> {
    let profile = checked_profile(&sprite.palette, &sprite.sprite_name)?;
    std::fs::create_dir_all(outdir).map_err(io_error(outdir))?;
    let mut written = Vec::with_capacity(count);
    for i in 0..count {
        let palette = recolor_or_keep(&sprite.palette, profile, rng)?;
        let data = sprite.with_palette(palette).to_vec()?;
        let path = outdir.join(format!("Mailpaletteshuffled.{i}.{file_name}"));
        log::debug!("Writing `{}`", path.display());
        std::fs::write(&path, data).map_err(io_error(&path))?;
        written.push(path);
    }
    Ok(written)
}

pub fn export(args: Args) -> Result<(), Error> {
    let Args {
        count,
        outdir,
        seed,
        sprites,
    } = args;
    let outdir = outdir.unwrap_or_else(|| PathBuf::from("output"));
    let paths = sprites.discover()?;
    let path = paths.first().ok_or(PatchError::NoAssetsFound)?;
    let sprite = read_sprite(path)?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    let mut rng = crate::seeded_rng(seed);
    let written = write_variants(&sprite, &file_name, &outdir, count, &mut rng)?;
    log::info!(
        "Wrote {} variants of `{}` to `{}`",
        written.len(),
        sprite.sprite_name,
        outdir.display()
    );
    Ok(())
}
