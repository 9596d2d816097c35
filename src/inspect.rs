use crate::{
    color::Color15,
    io_error,
    profile::profile_for,
    shuffle::{MAIL_COUNT, MAIL_STRIDE},
    zspr::{checksum, SpriteContainer},
    Error,
};
use itertools::Itertools;
use std::path::PathBuf;

#[derive(clap::Args)]
pub struct Args {
    /// ZSPR file to inspect
    input: PathBuf,
}

fn display_colors(data: &[u8]) -> String {
    data.chunks_exact(2)
        .map(|c| {
            let c = Color15::read(c);
            format!("{:02}/{:02}/{:02}", c.r, c.g, c.b)
        })
        .join(" ")
}

pub fn inspect(args: Args) -> Result<(), Error> {
    let Args { input } = args;
    let verbose = crate::is_log_level(log::LevelFilter::Debug);
    log::info!("Reading `{}`", input.display());
    let data = std::fs::read(&input).map_err(io_error(&input))?;
    let sprite = SpriteContainer::parse(&data)?;

    log::info!("Sprite:  {}", sprite.sprite_name);
    log::info!("Author:  {} ({})", sprite.author_name, sprite.author_short_name);
    log::info!("Type:    {}", sprite.sprite_type);
    let stored = [data[5], data[6], data[7], data[8]];
    let (sum, complement) = checksum(&data);
    let ok = stored[..2] == sum.to_le_bytes() && stored[2..] == complement.to_le_bytes();
    log::info!(
        "Checksum: 0x{:02x}{:02x} {}",
        stored[1],
        stored[0],
        if ok { "✓" } else { "FAIL" }
    );
    log::info!("  BLOCK    SIZE       HASH");
    for (name, block) in [
        ("pixels", sprite.pixels.as_slice()),
        ("palette", sprite.palette.as_slice()),
        ("glove", sprite.glove.as_slice()),
    ] {
        let hash = blake3::hash(block);
        log::info!("  {name: <8} 0x{: <8x} 0x{hash}", block.len());
    }

    match profile_for(&sprite.sprite_name) {
        Some(profile) => {
            log::info!(
                "Profile: {} hue groups, min angle {}°, max variance {}°",
                profile.groups.len(),
                profile.min_hue_angle,
                profile.max_hue_variance,
            );
            for (index, group) in profile.groups.iter().enumerate() {
                log::info!("  GROUP {index}: cells {group:?}");
            }
        }
        None => log::info!("Profile: none, palette will not be recolored"),
    }

    if verbose {
        for (mail, cells) in sprite
            .palette
            .chunks(MAIL_STRIDE)
            .take(MAIL_COUNT)
            .enumerate()
        {
            log::debug!("  MAIL {mail}: {}", display_colors(cells));
        }
        log::debug!("  GLOVE:  {}", display_colors(&sprite.glove));
    }
    Ok(())
}
