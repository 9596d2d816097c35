#![allow(dead_code)]

use rainbowsprite::{
    zspr::{GLOVE_LEN, PALETTE_LEN, PIXEL_LEN, SPRITE_TYPE_PLAYER},
    SpriteContainer,
};
use std::path::{Path, PathBuf};

pub const ROM_SIZE: usize = 0x400000;

pub fn sprite(name: &str, fill: u8) -> SpriteContainer {
    SpriteContainer {
        sprite_name: name.into(),
        author_name: "Tester".into(),
        author_short_name: "T".into(),
        sprite_type: SPRITE_TYPE_PLAYER,
        pixels: vec![fill; PIXEL_LEN],
        palette: (0..PALETTE_LEN).map(|i| i as u8 ^ fill).collect(),
        glove: [fill; GLOVE_LEN],
    }
}

pub fn write_sprite_file(dir: &Path, file_name: &str, sprite: &SpriteContainer) -> PathBuf {
    let path = dir.join(file_name);
    std::fs::write(&path, sprite.to_vec().unwrap()).unwrap();
    path
}
