//! Compact per-tile encoding for transport.
//!
//! Every field fits in a byte: category indices come from one table per category
//! (shared by encode and decode) and continuous fields are quantized to 8 bits.

use serde::{Deserialize, Serialize};

use crate::biomes::Biome;
use crate::chunk::{Chunk, Tile, CHUNK_SIZE};
use crate::error::{DecodeError, EncodingError};
use crate::rivers::RiverSegment;

const KIND_OCEAN: u8 = 0;
const KIND_LAND: u8 = 1;

/// Index 0 of the river column means "no river"
const NO_RIVER: u8 = 0;

/// One tile in compact form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompactTile {
    /// 0 ocean, 1 land
    pub kind: u8,
    pub elevation: u8,
    pub temperature: u8,
    pub moisture: u8,
    /// Index into `Biome::ALL`
    pub biome: u8,
    /// 0 for none, else 1 + index into `RiverSegment::ALL`
    pub river: u8,
    /// 0 or 1
    pub lake: u8,
}

/// A chunk in compact form, rows top to bottom.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompactChunk {
    pub chunk_x: i32,
    pub chunk_y: i32,
    pub seed: i64,
    pub tiles: Vec<Vec<CompactTile>>,
}

/// Tile fields recovered from compact form. Continuous values are within 1/255 of
/// the originals.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DecodedTile {
    pub land: bool,
    pub elevation: f64,
    pub temperature: f64,
    pub moisture: f64,
    pub biome: Biome,
    pub river_segment: Option<RiverSegment>,
    pub lake: bool,
}

/// `round(value * 255)` for a value in `[0, 1]`.
pub fn quantize(value: f64) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

pub fn dequantize(value: u8) -> f64 {
    f64::from(value) / 255.0
}

fn biome_index(biome: Biome) -> Result<u8, EncodingError> {
    Biome::ALL
        .iter()
        .position(|&b| b == biome)
        .map(|i| i as u8)
        .ok_or_else(|| EncodingError::UnknownBiome(format!("{biome:?}")))
}

fn river_index(segment: Option<RiverSegment>) -> Result<u8, EncodingError> {
    let Some(segment) = segment else {
        return Ok(NO_RIVER);
    };
    RiverSegment::ALL
        .iter()
        .position(|&s| s == segment)
        .map(|i| i as u8 + 1)
        .ok_or_else(|| EncodingError::UnknownRiverSegment(format!("{segment:?}")))
}

pub fn encode_tile(tile: &Tile) -> Result<CompactTile, EncodingError> {
    Ok(CompactTile {
        kind: if tile.is_ocean() { KIND_OCEAN } else { KIND_LAND },
        elevation: quantize(tile.elevation),
        temperature: quantize(tile.temperature),
        moisture: quantize(tile.moisture),
        biome: biome_index(tile.biome)?,
        river: river_index(tile.river_segment)?,
        lake: u8::from(tile.lake),
    })
}

pub fn decode_tile(tile: &CompactTile) -> Result<DecodedTile, DecodeError> {
    let land = match tile.kind {
        KIND_OCEAN => false,
        KIND_LAND => true,
        other => return Err(DecodeError::UnknownKind(other)),
    };
    let biome = *Biome::ALL
        .get(usize::from(tile.biome))
        .ok_or(DecodeError::UnknownBiome(tile.biome))?;
    let river_segment = match tile.river {
        NO_RIVER => None,
        index => Some(
            *RiverSegment::ALL
                .get(usize::from(index) - 1)
                .ok_or(DecodeError::UnknownRiverSegment(index))?,
        ),
    };
    let lake = match tile.lake {
        0 => false,
        1 => true,
        other => return Err(DecodeError::InvalidLakeFlag(other)),
    };

    Ok(DecodedTile {
        land,
        elevation: dequantize(tile.elevation),
        temperature: dequantize(tile.temperature),
        moisture: dequantize(tile.moisture),
        biome,
        river_segment,
        lake,
    })
}

pub fn encode_chunk(chunk: &Chunk) -> Result<CompactChunk, EncodingError> {
    let tiles = chunk
        .tiles
        .rows()
        .map(|row| row.iter().map(encode_tile).collect::<Result<Vec<_>, _>>())
        .collect::<Result<Vec<_>, _>>()?;
    Ok(CompactChunk {
        chunk_x: chunk.chunk_x,
        chunk_y: chunk.chunk_y,
        seed: chunk.seed,
        tiles,
    })
}

/// Decode every tile of a compact chunk in row-major order.
pub fn decode_chunk(chunk: &CompactChunk) -> Result<Vec<DecodedTile>, DecodeError> {
    let expected = CHUNK_SIZE * CHUNK_SIZE;
    let found: usize = chunk.tiles.iter().map(Vec::len).sum();
    if found != expected || chunk.tiles.len() != CHUNK_SIZE {
        return Err(DecodeError::WrongTileCount { found, expected });
    }
    chunk.tiles.iter().flatten().map(decode_tile).collect()
}
