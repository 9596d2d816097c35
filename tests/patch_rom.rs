mod common;

use common::{sprite, write_sprite_file, ROM_SIZE};
use rainbowsprite::{
    discover_sprites,
    patch::{patch_file, patched_path},
    rom::{SpriteSlot, MAX_EXTENDED_SLOTS},
    zspr::PIXEL_LEN,
    Error, FileFilters, PatchError, TriggerEvents,
};
use rand::{rngs::StdRng, SeedableRng};

#[test]
fn patches_rom_from_sprite_directory() {
    let dir = tempfile::tempdir().unwrap();
    let sprites = dir.path().join("sprites");
    std::fs::create_dir_all(sprites.join("nested")).unwrap();
    write_sprite_file(&sprites, "dragonite.zspr", &sprite("Dragonite", 0x11));
    write_sprite_file(&sprites.join("nested"), "mog.zspr", &sprite("Mog", 0x22));
    std::fs::write(sprites.join("readme.txt"), b"not a sprite").unwrap();

    let rom = dir.path().join("game.sfc");
    std::fs::write(&rom, vec![0u8; ROM_SIZE]).unwrap();
    let output = patched_path(&rom);

    let paths = discover_sprites(&sprites, &FileFilters::default()).unwrap();
    assert_eq!(paths.len(), 2);
    let mut rng = StdRng::seed_from_u64(11);
    let report = patch_file(&rom, &output, &paths, TriggerEvents::default(), &mut rng).unwrap();

    assert_eq!(report.extended.len(), MAX_EXTENDED_SLOTS);
    assert_eq!(report.extended.iter().filter(|n| *n == "Mog").count(), 16);

    let patched = std::fs::read(&output).unwrap();
    assert_eq!(patched.len(), ROM_SIZE);
    assert_eq!(patched[0x18637F..=0x186381], [0xff, 0xff, 0x00]);
    for (slot, name) in report.extended.iter().enumerate() {
        let fill = if name == "Mog" { 0x22 } else { 0x11 };
        let addr = SpriteSlot::extended(slot).pixels;
        assert!(patched[addr..addr + PIXEL_LEN].iter().all(|b| *b == fill));
    }
    // the input ROM is left alone
    assert!(std::fs::read(&rom).unwrap().iter().all(|b| *b == 0));
}

#[test]
fn filters_limit_the_sprite_pool() {
    let dir = tempfile::tempdir().unwrap();
    write_sprite_file(dir.path(), "bel.zspr", &sprite("Bel", 1));
    write_sprite_file(dir.path(), "yoshi.zspr", &sprite("Yoshi", 2));
    let filters = FileFilters {
        includes: vec!["y*".into()],
        excludes: Vec::new(),
    };
    let paths = discover_sprites(dir.path(), &filters).unwrap();
    assert_eq!(paths, vec![dir.path().join("yoshi.zspr")]);
}

#[test]
fn empty_sprite_directory_fails_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let rom = dir.path().join("game.sfc");
    std::fs::write(&rom, vec![0u8; ROM_SIZE]).unwrap();
    let output = patched_path(&rom);
    let mut rng = StdRng::seed_from_u64(0);
    let res = patch_file(&rom, &output, &[], TriggerEvents::default(), &mut rng);
    assert!(matches!(res, Err(Error::Patch(PatchError::NoAssetsFound))));
    assert!(!output.exists());
}

#[test]
fn corrupt_sprite_aborts_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let good = write_sprite_file(dir.path(), "bel.zspr", &sprite("Bel", 1));
    let bad = dir.path().join("bad.zspr");
    let mut data = sprite("Mog", 2).to_vec().unwrap();
    data[4] = 2;
    std::fs::write(&bad, data).unwrap();
    let rom = dir.path().join("game.sfc");
    std::fs::write(&rom, vec![0u8; ROM_SIZE]).unwrap();
    let output = patched_path(&rom);
    let mut rng = StdRng::seed_from_u64(0);
    let res = patch_file(&rom, &output, &[good, bad], TriggerEvents::default(), &mut rng);
    let err = res.unwrap_err();
    assert!(err.to_string().contains("bad.zspr"), "{err}");
    assert!(!output.exists());
}
