use crate::convert_error;
use nom::{
    bytes::complete::{tag, take, take_till},
    error::{context, ParseError, VerboseError},
    number::complete::{le_u16, le_u32},
};

pub const MAGIC: &[u8; 4] = b"ZSPR";
pub const VERSION: u8 = 1;
pub const SPRITE_TYPE_PLAYER: u16 = 1;
pub const PIXEL_LEN: usize = 0x7000;
/// Three mail palettes, 30 bytes of cells each.
pub const PALETTE_LEN: usize = 120;
pub const GLOVE_LEN: usize = 4;

const HEADER_LEN: usize = 29;
const CHECKSUM_OFFSET: usize = 5;
const PIXEL_POINTER_OFFSET: usize = 9;
const PALETTE_POINTER_OFFSET: usize = 15;
const CHECKSUM_BIAS: u32 = 0xff + 0xff;

#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    #[error("invalid magic {0:02x?}, expected `ZSPR`")]
    InvalidMagic(Vec<u8>),
    #[error("unsupported ZSPR version {0}")]
    UnsupportedVersion(u8),
    #[error("corrupt offsets: {0}")]
    CorruptOffsets(String),
    #[error("{0}")]
    Parse(String),
    #[error("invalid {0} string")]
    InvalidString(&'static str),
    #[error("{0} too large for a ZSPR container")]
    TooLarge(&'static str),
}

/// A decoded `.zspr` player sprite.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SpriteContainer {
    pub sprite_name: String,
    pub author_name: String,
    pub author_short_name: String,
    pub sprite_type: u16,
    /// Always [`PIXEL_LEN`] bytes.
    pub pixels: Vec<u8>,
    /// Mail palettes, the palette region minus the trailing glove colors.
    pub palette: Vec<u8>,
    pub glove: [u8; GLOVE_LEN],
}

#[derive(Debug)]
struct Header {
    checksum: u16,
    complement: u16,
    pixel_offset: u32,
    pixel_len: u16,
    palette_offset: u32,
    palette_len: u16,
    sprite_type: u16,
}

impl Header {
    fn parse<'a, E: ParseError<&'a [u8]>>(data: &'a [u8]) -> nom::IResult<&'a [u8], Self, E> {
        let (data, _) = tag(MAGIC.as_slice())(data)?;
        let (data, _) = tag([VERSION].as_slice())(data)?;
        let (data, checksum) = le_u16(data)?;
        let (data, complement) = le_u16(data)?;
        let (data, pixel_offset) = le_u32(data)?;
        let (data, pixel_len) = le_u16(data)?;
        let (data, palette_offset) = le_u32(data)?;
        let (data, palette_len) = le_u16(data)?;
        let (data, sprite_type) = le_u16(data)?;
        let (data, _reserved) = take(6usize)(data)?;
        Ok((
            data,
            Self {
                checksum,
                complement,
                pixel_offset,
                pixel_len,
                palette_offset,
                palette_len,
                sprite_type,
            },
        ))
    }
}

/// UTF-16LE code units up to a two-byte null.
fn utf16z<'a, E: ParseError<&'a [u8]>>(data: &'a [u8]) -> nom::IResult<&'a [u8], Vec<u16>, E> {
    let mut units = Vec::new();
    let mut data = data;
    loop {
        let (rest, unit) = le_u16(data)?;
        data = rest;
        if unit == 0 {
            return Ok((data, units));
        }
        units.push(unit);
    }
}

fn asciiz<'a, E: ParseError<&'a [u8]>>(data: &'a [u8]) -> nom::IResult<&'a [u8], &'a [u8], E> {
    let (data, s) = take_till(|b| b == 0)(data)?;
    let (data, _) = tag([0u8].as_slice())(data)?;
    Ok((data, s))
}

type Strings<'a> = (Vec<u16>, Vec<u16>, &'a [u8]);

fn strings<'a, E: ParseError<&'a [u8]>>(data: &'a [u8]) -> nom::IResult<&'a [u8], Strings<'a>, E> {
    let (data, sprite_name) = utf16z(data)?;
    let (data, author_name) = utf16z(data)?;
    let (data, author_short_name) = asciiz(data)?;
    Ok((data, (sprite_name, author_name, author_short_name)))
}

/// Returns the checksum and its complement for an encoded container. The
/// checksum field itself is not summed.
pub fn checksum(data: &[u8]) -> (u16, u16) {
    let field = CHECKSUM_OFFSET..CHECKSUM_OFFSET + 4;
    let sum = data
        .iter()
        .enumerate()
        .filter(|(i, _)| !field.contains(i))
        .fold(CHECKSUM_BIAS, |sum, (_, b)| sum.wrapping_add(*b as u32));
    let checksum = sum as u16;
    (checksum, 0xffff - checksum)
}

#[inline]
fn corrupt(args: impl std::fmt::Display) -> ContainerError {
    ContainerError::CorruptOffsets(args.to_string())
}

impl SpriteContainer {
    pub fn parse(data: &[u8]) -> Result<Self, ContainerError> {
        let magic = &data[..data.len().min(MAGIC.len())];
        if magic != MAGIC {
            return Err(ContainerError::InvalidMagic(magic.to_vec()));
        }
        match data.get(MAGIC.len()) {
            Some(&VERSION) => {}
            Some(&v) => return Err(ContainerError::UnsupportedVersion(v)),
            None => return Err(ContainerError::Parse("missing version byte".into())),
        }
        let (_, header) = context("ZSPR Header", Header::parse::<VerboseError<_>>)(data)
            .map_err(|e| ContainerError::Parse(convert_error(data, e)))?;
        log::trace!("{header:?}");

        let len = data.len();
        let pixel_offset = header.pixel_offset as usize;
        let palette_offset = header.palette_offset as usize;
        let palette_len = header.palette_len as usize;
        if pixel_offset == 0 || palette_offset == 0 {
            return Err(corrupt("null data pointer"));
        }
        if pixel_offset + PIXEL_LEN > palette_offset {
            return Err(corrupt(format_args!(
                "pixel data at 0x{pixel_offset:x} overlaps palette at 0x{palette_offset:x}"
            )));
        }
        if pixel_offset + PIXEL_LEN > len {
            return Err(corrupt(format_args!(
                "pixel data at 0x{pixel_offset:x} runs past end of file (0x{len:x})"
            )));
        }
        if palette_offset + PALETTE_LEN + GLOVE_LEN > len {
            return Err(corrupt(format_args!(
                "palette at 0x{palette_offset:x} runs past end of file (0x{len:x})"
            )));
        }
        if header.pixel_len as usize != PIXEL_LEN {
            return Err(corrupt(format_args!(
                "pixel data length 0x{:x}, expected 0x{PIXEL_LEN:x}",
                header.pixel_len
            )));
        }
        if palette_len < GLOVE_LEN || palette_offset + palette_len > len {
            return Err(corrupt(format_args!(
                "palette length 0x{palette_len:x} at 0x{palette_offset:x} does not fit in 0x{len:x}"
            )));
        }

        let (sprite_name, author_name, author_short_name) =
            context("ZSPR Strings", strings::<VerboseError<_>>)(&data[HEADER_LEN..])
                .map_err(|e| ContainerError::Parse(convert_error(data, e)))?
                .1;
        let sprite_name =
            String::from_utf16(&sprite_name).map_err(|_| ContainerError::InvalidString("sprite name"))?;
        let author_name =
            String::from_utf16(&author_name).map_err(|_| ContainerError::InvalidString("author name"))?;
        if !author_short_name.is_ascii() {
            return Err(ContainerError::InvalidString("author short name"));
        }
        let author_short_name = String::from_utf8_lossy(author_short_name).into_owned();

        let (checksum, complement) = checksum(data);
        if (header.checksum, header.complement) != (checksum, complement) {
            log::warn!(
                "`{sprite_name}`: checksum 0x{:04x}/0x{:04x} does not match computed 0x{checksum:04x}/0x{complement:04x}",
                header.checksum,
                header.complement,
            );
        }

        let palette_end = palette_offset + palette_len;
        let glove_start = palette_end - GLOVE_LEN;
        let mut glove = [0u8; GLOVE_LEN];
        glove.copy_from_slice(&data[glove_start..palette_end]);
        Ok(Self {
            sprite_name,
            author_name,
            author_short_name,
            sprite_type: header.sprite_type,
            pixels: data[pixel_offset..pixel_offset + PIXEL_LEN].to_vec(),
            palette: data[palette_offset..glove_start].to_vec(),
            glove,
        })
    }

    /// Encodes the container, laying out header, strings, pixels and palette
    /// back to back.
    pub fn to_vec(&self) -> Result<Vec<u8>, ContainerError> {
        if self.sprite_name.contains('\0') {
            return Err(ContainerError::InvalidString("sprite name"));
        }
        if self.author_name.contains('\0') {
            return Err(ContainerError::InvalidString("author name"));
        }
        if !self.author_short_name.is_ascii() || self.author_short_name.contains('\0') {
            return Err(ContainerError::InvalidString("author short name"));
        }
        let pixel_len =
            u16::try_from(self.pixels.len()).map_err(|_| ContainerError::TooLarge("pixel data"))?;
        let palette_len = u16::try_from(self.palette.len() + GLOVE_LEN)
            .map_err(|_| ContainerError::TooLarge("palette"))?;

        let mut buf = Vec::with_capacity(
            HEADER_LEN
                + (self.sprite_name.len() + self.author_name.len() + 2) * 2
                + self.author_short_name.len()
                + 1
                + self.pixels.len()
                + self.palette.len()
                + GLOVE_LEN,
        );
        buf.extend_from_slice(MAGIC);
        buf.push(VERSION);
        buf.extend_from_slice(&[0; 4]);
        buf.extend_from_slice(&0u32.to_le_bytes());
        buf.extend_from_slice(&pixel_len.to_le_bytes());
        buf.extend_from_slice(&0u32.to_le_bytes());
        buf.extend_from_slice(&palette_len.to_le_bytes());
        buf.extend_from_slice(&self.sprite_type.to_le_bytes());
        buf.extend_from_slice(&[0; 6]);
        for s in [&self.sprite_name, &self.author_name] {
            for unit in s.encode_utf16() {
                buf.extend_from_slice(&unit.to_le_bytes());
            }
            buf.extend_from_slice(&[0; 2]);
        }
        buf.extend_from_slice(self.author_short_name.as_bytes());
        buf.push(0);

        let pixel_offset = u32::try_from(buf.len()).map_err(|_| ContainerError::TooLarge("header"))?;
        buf[PIXEL_POINTER_OFFSET..PIXEL_POINTER_OFFSET + 4].copy_from_slice(&pixel_offset.to_le_bytes());
        buf.extend_from_slice(&self.pixels);

        let palette_offset =
            u32::try_from(buf.len()).map_err(|_| ContainerError::TooLarge("pixel data"))?;
        buf[PALETTE_POINTER_OFFSET..PALETTE_POINTER_OFFSET + 4]
            .copy_from_slice(&palette_offset.to_le_bytes());
        buf.extend_from_slice(&self.palette);
        buf.extend_from_slice(&self.glove);

        let (checksum, complement) = checksum(&buf);
        buf[CHECKSUM_OFFSET..CHECKSUM_OFFSET + 2].copy_from_slice(&checksum.to_le_bytes());
        buf[CHECKSUM_OFFSET + 2..CHECKSUM_OFFSET + 4].copy_from_slice(&complement.to_le_bytes());
        Ok(buf)
    }

    /// Same container with a different mail palette block.
    pub fn with_palette(&self, palette: Vec<u8>) -> Self {
        Self {
            palette,
            ..self.clone()
        }
    }
}
