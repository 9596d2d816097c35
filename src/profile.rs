/// Cell indices of one hue group, ordered darkest to lightest.
pub type HueGroup = &'static [u8];

pub const DEFAULT_MIN_HUE_ANGLE: u16 = 30;
pub const DEFAULT_MAX_HUE_VARIANCE: u16 = 360;

/// Which cells of a mail palette get recolored together. The same grouping
/// applies to all three mails.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SpriteProfile {
    pub groups: &'static [HueGroup],
    /// Minimum distance between group hues on the color wheel, in degrees.
    pub min_hue_angle: u16,
    /// Upper bound for hue rotations, in degrees.
    pub max_hue_variance: u16,
}

impl SpriteProfile {
    pub const fn new(groups: &'static [HueGroup]) -> Self {
        Self {
            groups,
            min_hue_angle: DEFAULT_MIN_HUE_ANGLE,
            max_hue_variance: DEFAULT_MAX_HUE_VARIANCE,
        }
    }
    pub const fn with_hue_bounds(self, min_hue_angle: u16, max_hue_variance: u16) -> Self {
        Self {
            groups: self.groups,
            min_hue_angle,
            max_hue_variance,
        }
    }
}

// sprite display name => groups, as stored in the container's name field
static PROFILES: phf::Map<&'static str, SpriteProfile> = phf::phf_map! {
    // belly/stripes, body, hair
    "Renoko" => SpriteProfile::new(&[&[1], &[8, 9], &[2, 10]]),
    // mail, sleeves
    "Bel" => SpriteProfile::new(&[&[8, 9], &[11]]),
    "Fox Link" => SpriteProfile::new(&[&[8, 9]]),
    // body, horn
    "Sobble" => SpriteProfile::new(&[&[6, 14, 7, 13], &[9, 1]]),
    // body, frill
    "Vaporeon" => SpriteProfile::new(&[&[1, 2, 3, 5], &[7, 6]]).with_hue_bounds(10, 120),
    // body, shoes
    "Yoshi" => SpriteProfile::new(&[&[8, 9, 11], &[13, 10]]),
    // eyes
    "Khloe" => SpriteProfile::new(&[&[8, 9]]),
    // wings
    "Zaruvyen" => SpriteProfile::new(&[&[14, 6, 13]]),
    // body, belly, eye/wing
    "Dragonite" => SpriteProfile::new(&[&[10, 7, 5], &[9, 8], &[11]]),
    // body, chest
    "Lapras" => SpriteProfile::new(&[&[7, 6, 5], &[3, 2]]),
    // body/hands, belly
    "Drake The Dragon" => SpriteProfile::new(&[&[10, 11, 12], &[8, 9]]),
    // body, orbs
    "Dragonair" => SpriteProfile::new(&[&[9, 10, 8, 7], &[5, 13]]),
    "Leafeon" => SpriteProfile::new(&[&[6, 5, 14, 3]]),
    // body, belly, wings
    "Charizard" => SpriteProfile::new(&[&[9, 10, 11], &[7, 13], &[8]]),
    // wings, horns/tail/body
    "Spyro the Dragon" => SpriteProfile::new(&[&[5, 13], &[3, 6, 11, 1, 14]]),
    // belly, beak, back
    "Archen" => SpriteProfile::new(&[&[1, 2, 3], &[5, 4], &[9, 10]]),
    "Garnet" => SpriteProfile::new(&[&[8, 9], &[11, 10], &[6, 5]]).with_hue_bounds(10, 120),
    // nose/pom, wings
    "Mog" => SpriteProfile::new(&[&[7], &[9, 8]]),
    // baba, word background, keke and flag
    "Baba" => SpriteProfile::new(&[&[0], &[1], &[5, 11]]),
    // tunic, scarf
    "Tunic" => SpriteProfile::new(&[&[10, 8, 9], &[7]]),
    // case
    "The Robot" => SpriteProfile::new(&[&[8, 9]]),
};

/// Looks up the recolor profile for a sprite by its exact display name.
#[inline]
pub fn profile_for(name: &str) -> Option<&'static SpriteProfile> {
    PROFILES.get(name)
}

pub fn profile_names() -> impl Iterator<Item = &'static str> {
    PROFILES.keys().copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_exact() {
        assert!(profile_for("Dragonite").is_some());
        assert!(profile_for("dragonite").is_none());
        assert!(profile_for("Link").is_none());
    }

    #[test]
    fn custom_hue_bounds() {
        let p = profile_for("Garnet").unwrap();
        assert_eq!((p.min_hue_angle, p.max_hue_variance), (10, 120));
        let p = profile_for("Charizard").unwrap();
        assert_eq!(
            (p.min_hue_angle, p.max_hue_variance),
            (DEFAULT_MIN_HUE_ANGLE, DEFAULT_MAX_HUE_VARIANCE)
        );
    }

    #[test]
    fn table_is_well_formed() {
        assert_eq!(profile_names().count(), 21);
        for name in profile_names() {
            let p = profile_for(name).unwrap();
            assert!((1..=3).contains(&p.groups.len()), "{name}");
            for group in p.groups {
                assert!((1..=5).contains(&group.len()), "{name}");
                // a mail has 15 addressable cells
                assert!(group.iter().all(|&i| i < 15), "{name}");
            }
        }
    }
}
