use crate::{
    assets::{AssetError, SpriteSource},
    profile::SpriteProfile,
    shuffle::{checked_profile, recolor_or_keep, ShuffleError},
    zspr::{SpriteContainer, GLOVE_LEN, PALETTE_LEN, PIXEL_LEN},
};
use rand::{seq::SliceRandom, Rng};

/// Cleared to turn on random sprite swaps.
pub const RANDOM_SPRITE_DISABLE_ADDR: usize = 0x186381;
/// Two bytes of [`TriggerEvents`], little-endian.
pub const TRIGGER_EVENTS_ADDR: usize = 0x18637F;
pub const MAX_EXTENDED_SLOTS: usize = 32;
const EXTENDED_SLOT_STRIDE: usize = 0x8000;

bitflags::bitflags! {
    /// Events that swap in a random sprite.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct TriggerEvents: u16 {
        const HIT = 0b00000001;
        const ENTER = 0b00000010;
        const EXIT = 0b00000100;
        const SLASH = 0b00001000;
        const ITEM = 0b00010000;
        const BONK = 0b00100000;
    }
}

impl Default for TriggerEvents {
    /// Every bit set, including the ones without a name.
    fn default() -> Self {
        Self::from_bits_retain(0xffff)
    }
}

/// ROM addresses of one sprite's pixel sheet, mail palettes and glove colors.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SpriteSlot {
    pub pixels: usize,
    pub palette: usize,
    pub glove: usize,
}

impl SpriteSlot {
    pub const DEFAULT: Self = Self {
        pixels: 0x80000,
        palette: 0xDD308,
        glove: 0xDEDF5,
    };

    /// Extended slot `index`, counted from 0.
    pub const fn extended(index: usize) -> Self {
        let base = index * EXTENDED_SLOT_STRIDE;
        Self {
            pixels: 0x300000 + base,
            palette: 0x307000 + base,
            glove: 0x307078 + base,
        }
    }

    /// One past the last byte the slot occupies.
    pub fn end(&self) -> usize {
        (self.pixels + PIXEL_LEN)
            .max(self.palette + PALETTE_LEN)
            .max(self.glove + GLOVE_LEN)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PatchError {
    #[error("Couldn't find sprites for patching")]
    NoAssetsFound,
    #[error("ROM is 0x{len:x} bytes, patching needs at least 0x{needed:x}")]
    RomTooSmall { len: usize, needed: usize },
    #[error("`{name}`: {what} is {len} bytes, expected at least {needed}")]
    BlockTooShort {
        name: String,
        what: &'static str,
        len: usize,
        needed: usize,
    },
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error("Failed to recolor `{name}`: {source}")]
    Shuffle {
        name: String,
        #[source]
        source: ShuffleError,
    },
}

/// Which sprites ended up where after a patch run.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PatchReport {
    pub default_sprite: String,
    /// Sprite name per extended slot, in slot order.
    pub extended: Vec<String>,
}

fn leading<'a>(
    sprite: &SpriteContainer,
    what: &'static str,
    data: &'a [u8],
    needed: usize,
) -> Result<&'a [u8], PatchError> {
    data.get(..needed).ok_or_else(|| PatchError::BlockTooShort {
        name: sprite.sprite_name.clone(),
        what,
        len: data.len(),
        needed,
    })
}

/// Copies a sprite's pixel sheet, the first 120 palette bytes and the glove
/// colors into `slot`. Nothing is written unless every block fits.
pub fn write_sprite(
    rom: &mut [u8],
    sprite: &SpriteContainer,
    palette: &[u8],
    slot: SpriteSlot,
) -> Result<(), PatchError> {
    let pixels = leading(sprite, "pixel data", &sprite.pixels, PIXEL_LEN)?;
    let palette = leading(sprite, "palette", palette, PALETTE_LEN)?;
    let needed = slot.end();
    if rom.len() < needed {
        return Err(PatchError::RomTooSmall {
            len: rom.len(),
            needed,
        });
    }
    log::trace!("Writing `{}` to {slot:x?}", sprite.sprite_name);
    rom[slot.pixels..slot.pixels + PIXEL_LEN].copy_from_slice(pixels);
    rom[slot.palette..slot.palette + PALETTE_LEN].copy_from_slice(palette);
    rom[slot.glove..slot.glove + GLOVE_LEN].copy_from_slice(&sprite.glove);
    Ok(())
}

/// Checks that `sprite` fits a slot and its profile fits its palette.
fn prepare(sprite: &SpriteContainer) -> Result<Option<&'static SpriteProfile>, PatchError> {
    leading(sprite, "pixel data", &sprite.pixels, PIXEL_LEN)?;
    leading(sprite, "palette", &sprite.palette, PALETTE_LEN)?;
    checked_profile(&sprite.palette, &sprite.sprite_name).map_err(|source| PatchError::Shuffle {
        name: sprite.sprite_name.clone(),
        source,
    })
}

fn recolor(
    sprite: &SpriteContainer,
    profile: Option<&SpriteProfile>,
    rng: &mut impl Rng,
) -> Result<Vec<u8>, PatchError> {
    recolor_or_keep(&sprite.palette, profile, rng).map_err(|source| PatchError::Shuffle {
        name: sprite.sprite_name.clone(),
        source,
    })
}

/// Fills the default sprite slot and up to 32 extended slots with recolored
/// copies of `assets` and enables random sprite swaps on `events`.
///
/// Each asset gets `32 / assets.len()` extended slots; leftover slots stay
/// untouched. All assets are loaded and checked, and the ROM size is checked,
/// before the first byte is written.
pub fn apply_random_sprite_on_event<S: SpriteSource>(
    rom: &mut [u8],
    assets: &[S],
    events: TriggerEvents,
    rng: &mut impl Rng,
) -> Result<PatchReport, PatchError> {
    if assets.is_empty() {
        return Err(PatchError::NoAssetsFound);
    }
    let mut order: Vec<&S> = assets.iter().collect();
    order.shuffle(rng);
    let sprites = order
        .into_iter()
        .map(|asset| {
            log::debug!("Loading `{}`", asset.label());
            asset.load()
        })
        .collect::<Result<Vec<_>, _>>()?;
    let profiles = sprites
        .iter()
        .map(prepare)
        .collect::<Result<Vec<_>, _>>()?;

    let copies = MAX_EXTENDED_SLOTS / sprites.len();
    let slot_count = (copies * sprites.len()).min(MAX_EXTENDED_SLOTS);
    let needed = slot_count
        .checked_sub(1)
        .map(|last| SpriteSlot::extended(last).end())
        .unwrap_or(0)
        .max(SpriteSlot::DEFAULT.end())
        .max(TRIGGER_EVENTS_ADDR + 2)
        .max(RANDOM_SPRITE_DISABLE_ADDR + 1);
    if rom.len() < needed {
        return Err(PatchError::RomTooSmall {
            len: rom.len(),
            needed,
        });
    }

    log::info!(
        "Rainbowifying {} sprites, {copies} copies each",
        sprites.len()
    );
    rom[RANDOM_SPRITE_DISABLE_ADDR] = 0x00;
    rom[TRIGGER_EVENTS_ADDR..TRIGGER_EVENTS_ADDR + 2].copy_from_slice(&events.bits().to_le_bytes());

    let mut report = PatchReport::default();
    for (index, (sprite, &profile)) in sprites.iter().zip(&profiles).enumerate() {
        if index == 0 {
            let palette = recolor(sprite, profile, rng)?;
            write_sprite(rom, sprite, &palette, SpriteSlot::DEFAULT)?;
            log::debug!("Default slot: `{}`", sprite.sprite_name);
            report.default_sprite = sprite.sprite_name.clone();
        }
        for _ in 0..copies {
            if report.extended.len() >= MAX_EXTENDED_SLOTS {
                return Ok(report);
            }
            let slot = report.extended.len();
            let palette = recolor(sprite, profile, rng)?;
            write_sprite(rom, sprite, &palette, SpriteSlot::extended(slot))?;
            log::debug!("Extended slot {slot}: `{}`", sprite.sprite_name);
            report.extended.push(sprite.sprite_name.clone());
        }
    }
    Ok(report)
}
