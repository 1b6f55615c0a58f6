//! Codec-free PNG writer.
//!
//! Pixels come from a fixed procedural rule (an "X" across the glyph box),
//! and the file is put together chunk by chunk. With [`Framing::Legacy`] the
//! IDAT chunk holds raw RGBA and the checksums are placeholders, so decoders
//! will not accept the output. [`Framing::Conforming`] adds scanline filter
//! bytes, zlib and real CRCs.

use crate::{backend::IconEncoder, config::Framing, crc::chunk_crc};
use anyhow::{anyhow, Context, Result};
use miniz_oxide::deflate::compress_to_vec_zlib;
use nom::{
    bytes::complete::{tag, take},
    combinator::map,
    number::complete::be_u32,
    sequence::tuple,
    IResult,
};

pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

pub const IHDR: [u8; 4] = *b"IHDR";
pub const IDAT: [u8; 4] = *b"IDAT";
pub const IEND: [u8; 4] = *b"IEND";

/// Placeholder written in place of the IHDR checksum by the legacy framing
pub const LEGACY_HEADER_CRC: u32 = 0x0d0a1a0a;
/// Checksum of an empty IEND chunk
pub const IEND_CRC: u32 = 0xae426082;

pub const BIT_DEPTH: u8 = 8;
pub const COLOR_TYPE_RGBA: u8 = 6;

const BYTES_PER_PIXEL: usize = 4;
const ON_GLYPH: [u8; 4] = [255, 255, 255, 255];
const TRANSPARENT: [u8; 4] = [0, 0, 0, 0];

/// Whether pixel `(x, y)` of a `size` x `size` icon belongs to the glyph.
///
/// The glyph box spans `size / 4` to `size - size / 4` on both axes. Inside
/// it, a pixel is on the glyph when it is closer than `max(1, size / 16)`
/// to either diagonal, measured along the x axis.
pub fn is_on_glyph(x: u32, y: u32, size: u32) -> bool {
    let (x, y, size) = (i64::from(x), i64::from(y), i64::from(size));
    let margin = size / 4;
    let far = size - margin;
    let thickness = (size / 16).max(1);

    if x < margin || x > far || y < margin || y > far {
        return false;
    }

    let falling = ((x - margin) - (y - margin)).abs() < thickness;
    let rising = ((x - far) + (y - margin)).abs() < thickness;
    falling || rising
}

/// Row-major RGBA bytes of the procedural glyph
pub fn glyph_pixels(size: u32) -> Vec<u8> {
    let mut pixels = Vec::with_capacity(size as usize * size as usize * BYTES_PER_PIXEL);
    for y in 0..size {
        for x in 0..size {
            let pixel = if is_on_glyph(x, y, size) {
                ON_GLYPH
            } else {
                TRANSPARENT
            };
            pixels.extend_from_slice(&pixel);
        }
    }
    pixels
}

/// IHDR payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub width: u32,
    pub height: u32,
    pub bit_depth: u8,
    pub color_type: u8,
    pub compression_method: u8,
    pub filter_method: u8,
    pub interlace_method: u8,
}

impl Header {
    pub const LENGTH: usize = 13;

    /// Square, 8-bit, non-interlaced RGBA
    pub fn rgba8(size: u32) -> Self {
        Self {
            width: size,
            height: size,
            bit_depth: BIT_DEPTH,
            color_type: COLOR_TYPE_RGBA,
            compression_method: 0,
            filter_method: 0,
            interlace_method: 0,
        }
    }

    pub fn to_bytes(&self) -> [u8; Self::LENGTH] {
        let mut bytes = [0; Self::LENGTH];
        bytes[0..4].copy_from_slice(&self.width.to_be_bytes());
        bytes[4..8].copy_from_slice(&self.height.to_be_bytes());
        bytes[8..].copy_from_slice(&[
            self.bit_depth,
            self.color_type,
            self.compression_method,
            self.filter_method,
            self.interlace_method,
        ]);
        bytes
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let parsed: IResult<&[u8], (u32, u32, &[u8])> =
            tuple((be_u32, be_u32, take(5usize)))(data);
        let (_, (width, height, fields)) =
            parsed.map_err(|_| anyhow!("IHDR payload too short: {} bytes", data.len()))?;
        Ok(Self {
            width,
            height,
            bit_depth: fields[0],
            color_type: fields[1],
            compression_method: fields[2],
            filter_method: fields[3],
            interlace_method: fields[4],
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Checksum {
    /// CRC-32 over tag and payload
    Computed,
    /// Written as-is, whatever the payload
    Fixed(u32),
}

/// A chunk ready to be serialised. The length field is taken from `data`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub tag: [u8; 4],
    pub data: Vec<u8>,
    pub checksum: Checksum,
}

impl Chunk {
    pub fn new(tag: [u8; 4], data: Vec<u8>, checksum: Checksum) -> Self {
        Self {
            tag,
            data,
            checksum,
        }
    }

    pub fn crc(&self) -> u32 {
        match self.checksum {
            Checksum::Computed => chunk_crc(&self.tag, &self.data),
            Checksum::Fixed(value) => value,
        }
    }

    pub fn write_to(&self, out: &mut Vec<u8>) -> Result<()> {
        let length = u32::try_from(self.data.len()).with_context(|| {
            format!(
                "{} payload of {} bytes does not fit a chunk",
                String::from_utf8_lossy(&self.tag),
                self.data.len()
            )
        })?;
        out.reserve(self.data.len() + 12);
        out.extend_from_slice(&length.to_be_bytes());
        out.extend_from_slice(&self.tag);
        out.extend_from_slice(&self.data);
        out.extend_from_slice(&self.crc().to_be_bytes());
        Ok(())
    }
}

/// The chunk sequence for a `size` x `size` glyph icon
pub fn build_chunks(size: u32, framing: Framing) -> Result<[Chunk; 3]> {
    let payload_len = u64::from(size) * u64::from(size) * BYTES_PER_PIXEL as u64;
    if payload_len > u64::from(u32::MAX) {
        anyhow::bail!("Icon size {size} is too large for a single IDAT chunk");
    }

    let header = Header::rgba8(size).to_bytes().to_vec();
    let pixels = glyph_pixels(size);

    let chunks = match framing {
        Framing::Legacy => [
            Chunk::new(IHDR, header, Checksum::Fixed(LEGACY_HEADER_CRC)),
            Chunk::new(IDAT, pixels, Checksum::Fixed(0)),
            Chunk::new(IEND, Vec::new(), Checksum::Fixed(IEND_CRC)),
        ],
        Framing::Conforming => [
            Chunk::new(IHDR, header, Checksum::Computed),
            Chunk::new(IDAT, compress_scanlines(&pixels, size), Checksum::Computed),
            Chunk::new(IEND, Vec::new(), Checksum::Computed),
        ],
    };
    Ok(chunks)
}

/// Full file contents: signature followed by IHDR, IDAT and IEND
pub fn assemble(size: u32, framing: Framing) -> Result<Vec<u8>> {
    let chunks = build_chunks(size, framing)?;
    let mut out = PNG_SIGNATURE.to_vec();
    for chunk in &chunks {
        chunk.write_to(&mut out)?;
    }
    Ok(out)
}

// Filter type 0 (None) in front of every scanline, then zlib
fn compress_scanlines(pixels: &[u8], size: u32) -> Vec<u8> {
    let stride = size as usize * BYTES_PER_PIXEL;
    let mut filtered = Vec::with_capacity(pixels.len() + size as usize);
    for row in pixels.chunks(stride) {
        filtered.push(0);
        filtered.extend_from_slice(row);
    }
    compress_to_vec_zlib(&filtered, 9)
}

/// Raw strategy behind the [`IconEncoder`] seam
#[derive(Debug, Clone, Copy)]
pub struct RawEncoder {
    framing: Framing,
}

impl RawEncoder {
    pub fn new(framing: Framing) -> Self {
        Self { framing }
    }
}

impl IconEncoder for RawEncoder {
    fn name(&self) -> &'static str {
        "raw"
    }

    fn encode(&self, size: u32) -> Result<Vec<u8>> {
        assemble(size, self.framing)
    }
}

/// A chunk as found in an existing file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkRef<'a> {
    pub tag: [u8; 4],
    pub data: &'a [u8],
    pub stored_crc: u32,
}

impl ChunkRef<'_> {
    pub fn tag_name(&self) -> String {
        String::from_utf8_lossy(&self.tag).into_owned()
    }

    pub fn crc_matches(&self) -> bool {
        chunk_crc(&self.tag, self.data) == self.stored_crc
    }
}

/// Split a PNG file into its chunks, stopping after IEND.
///
/// Checksums are reported, not enforced, so legacy output can be read back.
pub fn read_chunks(bytes: &[u8]) -> Result<Vec<ChunkRef<'_>>> {
    let (mut rest, _) =
        signature(bytes).map_err(|_| anyhow!("Input doesn't start with the PNG signature"))?;

    let mut chunks = Vec::new();
    loop {
        let (next, chunk) = chunk_ref(rest)
            .map_err(|_| anyhow!("Truncated chunk after {} complete chunks", chunks.len()))?;
        rest = next;
        let finished = chunk.tag == IEND;
        chunks.push(chunk);
        if finished {
            break;
        }
    }

    if !rest.is_empty() {
        log::debug!("Ignoring {} bytes after IEND", rest.len());
    }
    Ok(chunks)
}

fn signature(input: &[u8]) -> IResult<&[u8], &[u8]> {
    tag(&PNG_SIGNATURE[..])(input)
}

fn chunk_ref(input: &[u8]) -> IResult<&[u8], ChunkRef<'_>> {
    let (input, length) = be_u32(input)?;
    let (input, chunk_tag) = map(take(4usize), |v: &[u8]| [v[0], v[1], v[2], v[3]])(input)?;
    let (input, data) = take(length as usize)(input)?;
    let (input, stored_crc) = be_u32(input)?;
    Ok((
        input,
        ChunkRef {
            tag: chunk_tag,
            data,
            stored_crc,
        },
    ))
}
