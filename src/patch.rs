use crate::{
    io_error,
    rom::{apply_random_sprite_on_event, PatchReport, TriggerEvents},
    Error, SpriteArgs,
};
use rand::Rng;
use std::path::{Path, PathBuf};

#[derive(clap::Args)]
pub struct Args {
    /// ROM file to patch
    rom: PathBuf,
    /// Path to write the patched ROM to [default: patched_<ROM> next to the input]
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Events that swap in a random sprite [default: all]
    #[arg(short, long, value_enum)]
    events: Vec<Event>,
    /// Seed for reproducible recoloring
    #[arg(long)]
    seed: Option<u64>,
    #[command(flatten)]
    sprites: SpriteArgs,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, clap::ValueEnum)]
enum Event {
    Hit,
    Enter,
    Exit,
    Slash,
    Item,
    Bonk,
}

impl From<Event> for TriggerEvents {
    fn from(event: Event) -> Self {
        match event {
            Event::Hit => Self::HIT,
            Event::Enter => Self::ENTER,
            Event::Exit => Self::EXIT,
            Event::Slash => Self::SLASH,
            Event::Item => Self::ITEM,
            Event::Bonk => Self::BONK,
        }
    }
}

fn trigger_events(events: &[Event]) -> TriggerEvents {
    if events.is_empty() {
        return TriggerEvents::default();
    }
    events
        .iter()
        .fold(TriggerEvents::empty(), |acc, e| acc | TriggerEvents::from(*e))
}

/// `patched_<name>` in the same directory as `rom`.
pub fn patched_path(rom: &Path) -> PathBuf {
    let name = rom
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    rom.with_file_name(format!("patched_{name}"))
}

/// Reads `rom`, patches in the sprites at `sprites` and writes the result to
/// `output`. The input file is never modified.
pub fn patch_file(
    rom: &Path,
    output: &Path,
    sprites: &[PathBuf],
    events: TriggerEvents,
    rng: &mut impl Rng,
) -> Result<PatchReport, Error> {
    log::info!("Reading `{}`", rom.display());
    let mut data = std::fs::read(rom).map_err(io_error(rom))?;
    let report = apply_random_sprite_on_event(&mut data, sprites, events, rng)?;
    log::info!(
        "Writing `{}` with `{}` as default and {} extended sprites",
        output.display(),
        report.default_sprite,
        report.extended.len(),
    );
    std::fs::write(output, &data).map_err(io_error(output))?;
    Ok(report)
}

pub fn patch(args: Args) -> Result<(), Error> {
    let Args {
        rom,
        output,
        events,
        seed,
        sprites,
    } = args;
    let output = output.unwrap_or_else(|| patched_path(&rom));
    let paths = sprites.discover()?;
    let mut rng = crate::seeded_rng(seed);
    patch_file(&rom, &output, &paths, trigger_events(&events), &mut rng)?;
    log::info!("Done!");
    Ok(())
}
