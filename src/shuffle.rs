use crate::{
    color::{complementary_color, random_color, Color15, CHANNEL_MAX},
    profile::{profile_for, SpriteProfile},
};
use rand::Rng;
use std::ops::RangeInclusive;

pub const MAIL_COUNT: usize = 3;
/// Byte distance between consecutive mail palettes in the palette block.
pub const MAIL_STRIDE: usize = 30;
pub const MAX_GROUPS: usize = 3;
pub const MAX_SHADES: usize = 5;

const SATURATION: RangeInclusive<f64> = 0.5..=0.9;
const MIN_VALUE: f64 = 0.45;
// indexed by shade count - 1; more shades leave less headroom for the ramp
const MAX_VALUE: [f64; MAX_SHADES] = [0.9, 0.84, 0.7, 0.6, 0.55];

#[derive(Debug, thiserror::Error)]
pub enum ShuffleError {
    #[error("no recolor profile for sprite `{0}`")]
    UnknownProfile(String),
    #[error("profile has {0} hue groups, at most {MAX_GROUPS} are supported")]
    TooManyGroups(usize),
    #[error("hue group {group} has {shades} shades, at most {MAX_SHADES} are supported")]
    TooManyShades { group: usize, shades: usize },
    #[error("hue group {0} is empty")]
    EmptyGroup(usize),
    #[error("hue bounds {min}°/{max}° leave no room for {groups} groups")]
    InvalidHueBounds { min: u16, max: u16, groups: usize },
    #[error("palette block is {len} bytes, cell {cell} needs {needed}")]
    PaletteTooShort { len: usize, cell: u8, needed: usize },
}

/// Recolors a copy of `palette` using the profile registered for `name`.
///
/// An unknown name is reported as [`ShuffleError::UnknownProfile`]; callers
/// usually fall back to the untouched palette in that case.
pub fn shuffle_palette(
    palette: &[u8],
    name: &str,
    rng: &mut impl Rng,
) -> Result<Vec<u8>, ShuffleError> {
    let profile = profile_for(name).ok_or_else(|| ShuffleError::UnknownProfile(name.into()))?;
    shuffle_with_profile(palette, profile, rng)
}

/// Looks up and validates the profile for `name` against `palette` once per
/// sprite. A sprite without a profile gets `None` and keeps its palette.
pub fn checked_profile(
    palette: &[u8],
    name: &str,
) -> Result<Option<&'static SpriteProfile>, ShuffleError> {
    match profile_for(name) {
        Some(profile) => {
            validate(palette, profile)?;
            Ok(Some(profile))
        }
        None => {
            log::warn!("Unknown sprite `{name}`, palette left unchanged");
            Ok(None)
        }
    }
}

/// Recolors `palette` with `profile`, or copies it when there is none.
pub fn recolor_or_keep(
    palette: &[u8],
    profile: Option<&SpriteProfile>,
    rng: &mut impl Rng,
) -> Result<Vec<u8>, ShuffleError> {
    match profile {
        Some(profile) => shuffle_with_profile(palette, profile, rng),
        None => Ok(palette.to_vec()),
    }
}

pub fn shuffle_with_profile(
    palette: &[u8],
    profile: &SpriteProfile,
    rng: &mut impl Rng,
) -> Result<Vec<u8>, ShuffleError> {
    validate(palette, profile)?;
    let mut out = palette.to_vec();
    for mail in 0..MAIL_COUNT {
        let angles = hue_angles(
            rng,
            profile.groups.len(),
            profile.min_hue_angle,
            profile.max_hue_variance,
        )?;
        log::trace!("mail {mail} hue angles {angles:?}");
        let mut first = Color15::default();
        for (index, (group, angle)) in profile.groups.iter().zip(angles).enumerate() {
            let base = if index == 0 {
                let value = MIN_VALUE..=MAX_VALUE[group.len() - 1];
                first = random_color(rng, SATURATION, value);
                first
            } else {
                complementary_color(first, angle as f64)
            };
            for (cell, color) in group.iter().zip(shade_ramp(base, group.len())) {
                let offset = mail * MAIL_STRIDE + *cell as usize * 2;
                color.write(&mut out[offset..offset + 2]);
            }
        }
    }
    Ok(out)
}

fn validate(palette: &[u8], profile: &SpriteProfile) -> Result<(), ShuffleError> {
    let groups = profile.groups.len();
    if groups > MAX_GROUPS {
        return Err(ShuffleError::TooManyGroups(groups));
    }
    let (min, max) = (profile.min_hue_angle, profile.max_hue_variance);
    if groups >= 2 && (min == 0 || u32::from(max) < 4 * u32::from(min)) {
        return Err(ShuffleError::InvalidHueBounds { min, max, groups });
    }
    for (index, group) in profile.groups.iter().enumerate() {
        if group.is_empty() {
            return Err(ShuffleError::EmptyGroup(index));
        }
        if group.len() > MAX_SHADES {
            return Err(ShuffleError::TooManyShades {
                group: index,
                shades: group.len(),
            });
        }
        for &cell in group.iter() {
            let needed = (MAIL_COUNT - 1) * MAIL_STRIDE + cell as usize * 2 + 2;
            if needed > palette.len() {
                return Err(ShuffleError::PaletteTooShort {
                    len: palette.len(),
                    cell,
                    needed,
                });
            }
        }
    }
    Ok(())
}

/// Picks one hue rotation per group, in degrees, relative to group 0.
///
/// Every pair of angles is at least `min` apart, and with `max == 360` that
/// also holds around the wrap.
pub fn hue_angles(
    rng: &mut impl Rng,
    groups: usize,
    min: u16,
    max: u16,
) -> Result<Vec<u16>, ShuffleError> {
    let bad_bounds = || ShuffleError::InvalidHueBounds { min, max, groups };
    match groups {
        0 => Ok(Vec::new()),
        1 => Ok(vec![0]),
        2 => {
            let double = min.saturating_mul(2);
            let range = non_empty(double, max.checked_sub(double)).ok_or_else(bad_bounds)?;
            Ok(vec![0, rng.gen_range(range)])
        }
        3 => {
            let range = non_empty(min, max.checked_sub(min)).ok_or_else(bad_bounds)?;
            let first = rng.gen_range(range);
            let below = non_empty(min, first.checked_sub(min));
            let above = non_empty(first + min, max.checked_sub(min));
            let (try_first, fallback) = match rng.gen::<bool>() {
                true => (below, above),
                false => (above, below),
            };
            let range = try_first.or(fallback).ok_or_else(bad_bounds)?;
            Ok(vec![0, first, rng.gen_range(range)])
        }
        n => Err(ShuffleError::TooManyGroups(n)),
    }
}

#[inline]
fn non_empty(start: u16, end: Option<u16>) -> Option<RangeInclusive<u16>> {
    end.filter(|end| start <= *end).map(|end| start..=end)
}

/// Lightens `base` in `shades` even steps, darkest first.
///
/// The largest result is `c + (k - 1) * floor((31 - c) / k)`, which never
/// exceeds 31 for any channel `c`.
pub fn shade_ramp(base: Color15, shades: usize) -> impl Iterator<Item = Color15> {
    let k = shades.max(1) as u8;
    let step = |c: u8| (CHANNEL_MAX - c.min(CHANNEL_MAX)) / k;
    let (sr, sg, sb) = (step(base.r), step(base.g), step(base.b));
    (0..k).map(move |i| Color15::new(base.r + i * sr, base.g + i * sg, base.b + i * sb))
}
