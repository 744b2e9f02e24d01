//! Chunked planet surface generation library
//!
//! Generates an unbounded tile world in 16x16 chunks. Every tile is a pure function
//! of (seed, coordinate), so chunks can be requested in any order, independently or
//! concurrently, and always agree with their neighbors.

pub mod ascii;
pub mod biomes;
pub mod cache;
pub mod chunk;
pub mod climate;
pub mod config;
pub mod continent;
pub mod encoding;
pub mod error;
pub mod heightmap;
pub mod noise_field;
pub mod request;
pub mod rivers;
pub mod seeds;
pub mod sequence;
pub mod terrain;
pub mod tilemap;
pub mod world;

pub use biomes::{Biome, ElevationCategory};
pub use chunk::{Chunk, Tile, CHUNK_SIZE};
pub use config::WorldConfig;
pub use rivers::RiverSegment;
pub use world::{clear_caches, generate_chunk, WorldGenerator};
