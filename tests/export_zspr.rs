mod common;

use common::{sprite, write_sprite_file};
use rainbowsprite::{
    export::write_variants, read_sprite, zspr::checksum, Error, ShuffleError, SpriteContainer,
};
use rand::{rngs::StdRng, SeedableRng};

#[test]
fn exported_variants_decode_with_fresh_palettes() {
    let dir = tempfile::tempdir().unwrap();
    let original = sprite("Charizard", 0x40);
    let path = write_sprite_file(dir.path(), "charizard.zspr", &original);
    let loaded = read_sprite(&path).unwrap();
    assert_eq!(loaded, original);

    let outdir = dir.path().join("output");
    let mut rng = StdRng::seed_from_u64(5);
    let written = write_variants(&loaded, "charizard.zspr", &outdir, 4, &mut rng).unwrap();
    assert_eq!(written.len(), 4);
    assert_eq!(
        written[3].file_name().unwrap(),
        "Mailpaletteshuffled.3.charizard.zspr"
    );

    let mut palettes = Vec::new();
    for path in &written {
        let data = std::fs::read(path).unwrap();
        let (sum, complement) = checksum(&data);
        assert_eq!(data[5..9], [sum.to_le_bytes(), complement.to_le_bytes()].concat());
        let variant = SpriteContainer::parse(&data).unwrap();
        assert_eq!(variant.sprite_name, original.sprite_name);
        assert_eq!(variant.author_name, original.author_name);
        assert_eq!(variant.pixels, original.pixels);
        assert_eq!(variant.glove, original.glove);
        assert_eq!(variant.palette.len(), original.palette.len());
        assert_ne!(variant.palette, original.palette);
        palettes.push(variant.palette);
    }
    palettes.dedup();
    assert_eq!(palettes.len(), 4);
}

#[test]
fn unknown_sprites_export_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let original = sprite("Link", 0);
    let bytes = original.to_vec().unwrap();
    let mut rng = StdRng::seed_from_u64(6);
    let written = write_variants(&original, "link.zspr", dir.path(), 2, &mut rng).unwrap();
    for path in written {
        assert_eq!(std::fs::read(path).unwrap(), bytes);
    }
}

#[test]
fn short_palette_fails_before_writing_anything() {
    let dir = tempfile::tempdir().unwrap();
    let mut short = sprite("Sobble", 0x11);
    short.palette.truncate(60);
    let outdir = dir.path().join("output");
    let mut rng = StdRng::seed_from_u64(7);
    let res = write_variants(&short, "sobble.zspr", &outdir, 3, &mut rng);
    assert!(matches!(
        res,
        Err(Error::Shuffle(ShuffleError::PaletteTooShort { len: 60, .. }))
    ));
    assert!(!outdir.exists());
}

#[test]
fn decoded_files_re_encode_identically() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_sprite_file(dir.path(), "tunic.zspr", &sprite("Tunic", 0x7f));
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(read_sprite(&path).unwrap().to_vec().unwrap(), bytes);
}
