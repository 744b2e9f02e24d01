//! Chunk request validation.
//!
//! Requests arrive with a raw seed string and chunk coordinates. Both are checked
//! here, before any generation work starts.

use serde::{Deserialize, Serialize};

use crate::config::BoundsConfig;
use crate::error::{RequestError, RequestResult};
use crate::seeds::normalize_seed;

/// A chunk request as received from a caller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkRequest {
    pub chunk_x: i32,
    pub chunk_y: i32,
    pub seed: String,
}

/// A request that passed validation; the seed is normalized to an integer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub chunk_x: i32,
    pub chunk_y: i32,
    pub seed: i64,
}

impl ChunkRequest {
    pub fn new(chunk_x: i32, chunk_y: i32, seed: impl Into<String>) -> Self {
        Self { chunk_x, chunk_y, seed: seed.into() }
    }

    pub fn validate(&self, bounds: &BoundsConfig) -> RequestResult<ValidatedRequest> {
        check_bounds(self.chunk_x, self.chunk_y, bounds)?;
        let seed = normalize_seed(&self.seed)?;
        Ok(ValidatedRequest { chunk_x: self.chunk_x, chunk_y: self.chunk_y, seed })
    }
}

/// Reject chunk coordinates outside `[min_chunk, max_chunk]` on either axis.
pub fn check_bounds(chunk_x: i32, chunk_y: i32, bounds: &BoundsConfig) -> RequestResult<()> {
    let range = bounds.min_chunk..=bounds.max_chunk;
    if range.contains(&chunk_x) && range.contains(&chunk_y) {
        Ok(())
    } else {
        Err(RequestError::ChunkOutOfBounds {
            chunk_x,
            chunk_y,
            min: bounds.min_chunk,
            max: bounds.max_chunk,
        })
    }
}
