//! Composite pipelines chaining two or three codecs
//!
//! Encoding runs the stages in order; decoding runs their inverses in
//! reverse order. The named pipelines all start with delta-of-delta, whose
//! stream is a head `[first:8B][varint(delta1)]` followed by one varint
//! residual per further value. The residual stages keep the head verbatim
//! and work on the residuals as integers:
//! - residual packing zigzags every residual and bit-packs them at the width
//!   of the largest, so bit-packing only ever sees non-negative values
//! - residual run-length turns runs of equal residuals into
//!   `varint(value) varint(count)` pairs, which is again a residual stream

use crate::compression::{pack, unpack, varint, Codec, DeltaOfDeltaCodec, RunLengthCodec};
use crate::config::RLE_MAX_RUN;
use crate::{CodecError, Result};
use tracing::trace;

const FIRST_VALUE_LEN: usize = 8;

/// Split a residual stream into its verbatim head and the remaining bytes
fn split_head(data: &[u8]) -> Result<(&[u8], &[u8])> {
    if data.len() < FIRST_VALUE_LEN {
        return Err(CodecError::truncated("first value"));
    }

    let mut head_len = FIRST_VALUE_LEN;
    if data.len() > head_len {
        let (_, used) = varint::decode(data, head_len)?;
        head_len += used;
    }
    Ok(data.split_at(head_len))
}

/// Head plus decoded residuals
fn split_residuals(data: &[u8]) -> Result<(&[u8], Vec<i64>)> {
    let (head, body) = split_head(data)?;

    let mut residuals = Vec::with_capacity(body.len());
    let mut offset = 0;
    while offset < body.len() {
        let (residual, used) = varint::decode(body, offset)?;
        residuals.push(residual);
        offset += used;
    }
    Ok((head, residuals))
}

fn join_residuals(head: &[u8], residuals: &[i64]) -> Vec<u8> {
    let mut out = Vec::with_capacity(head.len() + residuals.len());
    out.extend_from_slice(head);
    for &residual in residuals {
        varint::encode_into(residual, &mut out);
    }
    out
}

/// Bit-packs zigzagged residuals behind the verbatim head
///
/// Stream: `[head]` then, when there are residuals, a bit-packing block.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResidualPackCodec;

impl Codec for ResidualPackCodec {
    fn name(&self) -> &str {
        "RESIDUAL_PACKING"
    }

    fn encode(&self, input: &[u8]) -> Result<Vec<u8>> {
        let (head, residuals) = split_residuals(input)?;
        let mut out = head.to_vec();
        if !residuals.is_empty() {
            let zigzagged: Vec<u64> = residuals
                .iter()
                .map(|&r| varint::zigzag_encode(r))
                .collect();
            out.extend(pack(&zigzagged)?);
        }
        Ok(out)
    }

    fn decode(&self, encoded: &[u8]) -> Result<Vec<u8>> {
        let (head, body) = split_head(encoded)?;
        let residuals: Vec<i64> = if body.is_empty() {
            Vec::new()
        } else {
            unpack(body)?.into_iter().map(varint::zigzag_decode).collect()
        };
        Ok(join_residuals(head, &residuals))
    }
}

/// Run-length encodes residuals behind the verbatim head
///
/// Stream: `[head]{varint(value) varint(count)}*` with counts in `1..=255`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResidualRunLengthCodec;

impl Codec for ResidualRunLengthCodec {
    fn name(&self) -> &str {
        "RESIDUAL_RLE"
    }

    fn encode(&self, input: &[u8]) -> Result<Vec<u8>> {
        let (head, residuals) = split_residuals(input)?;

        let mut runs = Vec::new();
        let mut rest = residuals.as_slice();
        while let Some(&value) = rest.first() {
            let run = rest
                .iter()
                .take(RLE_MAX_RUN)
                .take_while(|&&r| r == value)
                .count();
            runs.push(value);
            runs.push(run as i64);
            rest = &rest[run..];
        }
        Ok(join_residuals(head, &runs))
    }

    fn decode(&self, encoded: &[u8]) -> Result<Vec<u8>> {
        let (head, runs) = split_residuals(encoded)?;
        if runs.len() % 2 != 0 {
            return Err(CodecError::TruncatedStream(format!(
                "{} run-length residuals end mid-pair",
                runs.len()
            )));
        }

        let mut residuals = Vec::with_capacity(runs.len());
        for pair in runs.chunks_exact(2) {
            let (value, count) = (pair[0], pair[1]);
            if !(1..=RLE_MAX_RUN as i64).contains(&count) {
                return Err(CodecError::InvalidFormat(format!(
                    "residual run of {} repeats of {}",
                    count, value
                )));
            }
            residuals.resize(residuals.len() + count as usize, value);
        }
        Ok(join_residuals(head, &residuals))
    }
}

/// A named, fixed chain of codecs
pub struct Pipeline {
    name: &'static str,
    stages: Vec<Box<dyn Codec>>,
}

impl Pipeline {
    /// Build a pipeline; a chain must have two or three stages
    pub fn new(name: &'static str, stages: Vec<Box<dyn Codec>>) -> Result<Self> {
        if !(2..=3).contains(&stages.len()) {
            return Err(CodecError::InvalidConfig(format!(
                "pipeline {} has {} stages, expected 2 or 3",
                name,
                stages.len()
            )));
        }
        Ok(Self { name, stages })
    }

    /// Delta-of-delta, then residual bit-packing, then run-length (SPRINTZ)
    pub fn sprintz() -> Self {
        Self {
            name: "SPRINTZ",
            stages: vec![
                Box::new(DeltaOfDeltaCodec),
                Box::new(ResidualPackCodec),
                Box::new(RunLengthCodec),
            ],
        }
    }

    /// Delta-of-delta, then residual run-length, then residual bit-packing (RLBE)
    pub fn rlbe() -> Self {
        Self {
            name: "RLBE",
            stages: vec![
                Box::new(DeltaOfDeltaCodec),
                Box::new(ResidualRunLengthCodec),
                Box::new(ResidualPackCodec),
            ],
        }
    }

    /// Delta-of-delta, then residual bit-packing (RAKE)
    pub fn rake() -> Self {
        Self {
            name: "RAKE",
            stages: vec![Box::new(DeltaOfDeltaCodec), Box::new(ResidualPackCodec)],
        }
    }

    /// Stage names in encode order
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name()).collect()
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("name", &self.name)
            .field("stages", &self.stage_names())
            .finish()
    }
}

impl Codec for Pipeline {
    fn name(&self) -> &str {
        self.name
    }

    fn encode(&self, input: &[u8]) -> Result<Vec<u8>> {
        if input.is_empty() {
            return Ok(Vec::new());
        }

        let mut data = input.to_vec();
        for stage in &self.stages {
            let before = data.len();
            data = stage.encode(&data)?;
            trace!(
                pipeline = self.name,
                stage = stage.name(),
                before,
                after = data.len(),
                "pipeline stage encoded"
            );
        }
        Ok(data)
    }

    fn decode(&self, encoded: &[u8]) -> Result<Vec<u8>> {
        if encoded.is_empty() {
            return Ok(Vec::new());
        }

        let mut data = encoded.to_vec();
        for stage in self.stages.iter().rev() {
            data = stage.decode(&data)?;
        }
        Ok(data)
    }
}
