//! Argon2id (RFC 9106, version 0x13) without secret or associated data.
//!
//! Lanes are filled one after another inside each slice. Blocks in a slice
//! only ever reference other lanes' earlier slices, so the result is the
//! same as filling the lanes in parallel.
//!
//! Unlike most library implementations this accepts salts of any length,
//! including salts shorter than eight bytes.

mod block;

use base64::Engine;
use base64::engine::general_purpose::STANDARD_NO_PAD;
use blake2::Blake2bVar;
use blake2::digest::{Update, VariableOutput};

use self::block::{BLOCK_BYTES, Block, compress};

pub const VERSION: u32 = 0x13;

const ARGON2ID: u32 = 2;
const SYNC_POINTS: u32 = 4;
const ADDRESSES_PER_BLOCK: u32 = (BLOCK_BYTES / 8) as u32;
const DIGEST_LEN: usize = 64;

pub const MIN_OUTPUT_LEN: u32 = 4;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParamError {
    #[error("{name} {value} is out of range (0..={max})")]
    OutOfRange {
        name: &'static str,
        value: i64,
        max: u64,
    },

    #[error("time cost must be at least 1")]
    TooFewPasses,

    #[error("threads must be at least 1")]
    TooFewLanes,

    #[error("memory must be at least {0}KB for the requested threads")]
    MemoryTooSmall(u32),

    #[error("length must be at least {} bytes", MIN_OUTPUT_LEN)]
    OutputTooShort,
}

#[derive(Debug, thiserror::Error)]
pub enum HashError {
    #[error("unable to allocate {bytes} bytes")]
    Allocation { bytes: usize },

    #[error("password is longer than {} bytes", u32::MAX)]
    PasswordTooLong,

    #[error("salt is longer than {} bytes", u32::MAX)]
    SaltTooLong,

    #[error("blake2b rejected the requested digest size")]
    Digest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Params {
    t_cost: u32,
    m_cost: u32,
    p_cost: u8,
    output_len: u32,
}

impl Params {
    pub fn new(t_cost: u32, m_cost: u32, p_cost: u8, output_len: u32) -> Result<Self, ParamError> {
        if t_cost < 1 {
            Err(ParamError::TooFewPasses)
        } else if p_cost < 1 {
            Err(ParamError::TooFewLanes)
        } else if m_cost < 8 * u32::from(p_cost) {
            Err(ParamError::MemoryTooSmall(8 * u32::from(p_cost)))
        } else if output_len < MIN_OUTPUT_LEN {
            Err(ParamError::OutputTooShort)
        } else {
            Ok(Self {
                t_cost,
                m_cost,
                p_cost,
                output_len,
            })
        }
    }

    pub fn t_cost(&self) -> u32 {
        self.t_cost
    }

    pub fn m_cost(&self) -> u32 {
        self.m_cost
    }

    pub fn p_cost(&self) -> u8 {
        self.p_cost
    }

    pub fn output_len(&self) -> u32 {
        self.output_len
    }
}

// Shape of the memory matrix derived from a set of parameters.
struct Geometry {
    lanes: u32,
    lane_length: u32,
    segment_length: u32,
    blocks: u32,
}

impl Geometry {
    fn of(params: &Params) -> Self {
        let lanes = u32::from(params.p_cost);
        let segment_length = params.m_cost / (SYNC_POINTS * lanes);
        let lane_length = segment_length * SYNC_POINTS;
        Self {
            lanes,
            lane_length,
            segment_length,
            blocks: lane_length * lanes,
        }
    }
}

pub struct Argon2id {
    params: Params,
}

impl Argon2id {
    pub fn new(params: Params) -> Self {
        Self { params }
    }

    /// Hashes `password` and returns the PHC-style encoding
    /// `$argon2id$v=19$m=..,t=..,p=..$<salt>$<hash>`.
    pub fn hash_encoded(&self, password: &[u8], salt: &[u8]) -> Result<String, HashError> {
        let tag = self.hash_raw(password, salt)?;
        Ok(format!(
            "$argon2id$v={VERSION}$m={},t={},p={}${}${}",
            self.params.m_cost,
            self.params.t_cost,
            self.params.p_cost,
            STANDARD_NO_PAD.encode(salt),
            STANDARD_NO_PAD.encode(&tag),
        ))
    }

    /// Hashes `password` and returns the raw tag of `output_len` bytes.
    pub fn hash_raw(&self, password: &[u8], salt: &[u8]) -> Result<Vec<u8>, HashError> {
        let geometry = Geometry::of(&self.params);
        let h0 = self.initial_hash(password, salt)?;

        let block_count = geometry.blocks as usize;
        let mut memory = Vec::new();
        memory
            .try_reserve_exact(block_count)
            .map_err(|_| HashError::Allocation {
                bytes: block_count.saturating_mul(BLOCK_BYTES),
            })?;
        memory.resize(block_count, Block::ZERO);

        let mut seed = [0u8; BLOCK_BYTES];
        for lane in 0..geometry.lanes {
            for column in 0..2u32 {
                blake2b_long(
                    &mut seed,
                    &[&h0, &column.to_le_bytes(), &lane.to_le_bytes()],
                )?;
                let idx = (lane * geometry.lane_length + column) as usize;
                memory[idx] = Block::from_bytes(&seed);
            }
        }

        for pass in 0..self.params.t_cost {
            for slice in 0..SYNC_POINTS {
                for lane in 0..geometry.lanes {
                    self.fill_segment(&mut memory, &geometry, pass, lane, slice);
                }
            }
        }

        let last_column = geometry.lane_length - 1;
        let mut last = memory[last_column as usize];
        for lane in 1..geometry.lanes {
            last ^= &memory[(lane * geometry.lane_length + last_column) as usize];
        }

        let mut tag = Vec::new();
        let output_len = self.params.output_len as usize;
        tag.try_reserve_exact(output_len)
            .map_err(|_| HashError::Allocation { bytes: output_len })?;
        tag.resize(output_len, 0);
        blake2b_long(&mut tag, &[&last.to_bytes()])?;
        Ok(tag)
    }

    fn initial_hash(&self, password: &[u8], salt: &[u8]) -> Result<[u8; DIGEST_LEN], HashError> {
        let password_len =
            u32::try_from(password.len()).map_err(|_| HashError::PasswordTooLong)?;
        let salt_len = u32::try_from(salt.len()).map_err(|_| HashError::SaltTooLong)?;

        let mut hasher = Blake2bVar::new(DIGEST_LEN).map_err(|_| HashError::Digest)?;
        for word in [
            u32::from(self.params.p_cost),
            self.params.output_len,
            self.params.m_cost,
            self.params.t_cost,
            VERSION,
            ARGON2ID,
        ] {
            hasher.update(&word.to_le_bytes());
        }
        hasher.update(&password_len.to_le_bytes());
        hasher.update(password);
        hasher.update(&salt_len.to_le_bytes());
        hasher.update(salt);
        // empty secret and associated data
        hasher.update(&0u32.to_le_bytes());
        hasher.update(&0u32.to_le_bytes());

        let mut h0 = [0u8; DIGEST_LEN];
        hasher
            .finalize_variable(&mut h0)
            .map_err(|_| HashError::Digest)?;
        Ok(h0)
    }

    fn fill_segment(&self, memory: &mut [Block], g: &Geometry, pass: u32, lane: u32, slice: u32) {
        let data_independent = pass == 0 && slice < SYNC_POINTS / 2;

        let mut input = Block::ZERO;
        let mut addresses = Block::ZERO;
        if data_independent {
            input[0] = u64::from(pass);
            input[1] = u64::from(lane);
            input[2] = u64::from(slice);
            input[3] = u64::from(g.blocks);
            input[4] = u64::from(self.params.t_cost);
            input[5] = u64::from(ARGON2ID);
        }

        // the first two columns were seeded from H0
        let starting_index = if pass == 0 && slice == 0 {
            if data_independent {
                next_addresses(&mut addresses, &mut input);
            }
            2
        } else {
            0
        };

        let mut curr = (lane * g.lane_length + slice * g.segment_length + starting_index) as usize;
        let lane_length = g.lane_length as usize;
        let mut prev = if curr % lane_length == 0 {
            curr + lane_length - 1
        } else {
            curr - 1
        };

        for index in starting_index..g.segment_length {
            if curr % lane_length == 1 {
                prev = curr - 1;
            }

            let pseudo_rand = if data_independent {
                if index % ADDRESSES_PER_BLOCK == 0 {
                    next_addresses(&mut addresses, &mut input);
                }
                addresses[(index % ADDRESSES_PER_BLOCK) as usize]
            } else {
                memory[prev][0]
            };

            let ref_lane = if pass == 0 && slice == 0 {
                lane
            } else {
                ((pseudo_rand >> 32) % u64::from(g.lanes)) as u32
            };
            let ref_index = reference_index(
                g,
                pass,
                slice,
                index,
                pseudo_rand as u32,
                ref_lane == lane,
            );
            let reference = (ref_lane * g.lane_length + ref_index) as usize;

            let mut next = compress(&memory[prev], &memory[reference]);
            if pass > 0 {
                next ^= &memory[curr];
            }
            memory[curr] = next;

            curr += 1;
            prev += 1;
        }
    }
}

fn next_addresses(addresses: &mut Block, input: &mut Block) {
    input[6] += 1;
    *addresses = compress(&Block::ZERO, &compress(&Block::ZERO, input));
}

// Maps the low half of the pseudo-random word onto the window of blocks that
// may be referenced from `index`.
fn reference_index(
    g: &Geometry,
    pass: u32,
    slice: u32,
    index: u32,
    j1: u32,
    same_lane: bool,
) -> u32 {
    let seg = g.segment_length;
    let area = if pass == 0 {
        if slice == 0 || same_lane {
            slice * seg + index - 1
        } else if index == 0 {
            slice * seg - 1
        } else {
            slice * seg
        }
    } else if same_lane {
        g.lane_length - seg + index - 1
    } else if index == 0 {
        g.lane_length - seg - 1
    } else {
        g.lane_length - seg
    };

    let area = u64::from(area);
    let x = (u64::from(j1) * u64::from(j1)) >> 32;
    let relative = area - 1 - ((area * x) >> 32);

    let start = if pass == 0 || slice == SYNC_POINTS - 1 {
        0
    } else {
        u64::from((slice + 1) * seg)
    };

    ((start + relative) % u64::from(g.lane_length)) as u32
}

fn blake2b(out: &mut [u8], inputs: &[&[u8]]) -> Result<(), HashError> {
    let mut hasher = Blake2bVar::new(out.len()).map_err(|_| HashError::Digest)?;
    for input in inputs {
        hasher.update(input);
    }
    hasher.finalize_variable(out).map_err(|_| HashError::Digest)
}

// H': BLAKE2b stretched to any output length.
fn blake2b_long(out: &mut [u8], inputs: &[&[u8]]) -> Result<(), HashError> {
    let prefix = (out.len() as u32).to_le_bytes();
    let mut parts: Vec<&[u8]> = Vec::with_capacity(inputs.len() + 1);
    parts.push(&prefix);
    parts.extend_from_slice(inputs);

    if out.len() <= DIGEST_LEN {
        return blake2b(out, &parts);
    }

    let half = DIGEST_LEN / 2;
    let mut v = [0u8; DIGEST_LEN];
    blake2b(&mut v, &parts)?;
    out[..half].copy_from_slice(&v[..half]);

    let mut pos = half;
    while out.len() - pos > DIGEST_LEN {
        let prev = v;
        blake2b(&mut v, &[&prev])?;
        out[pos..pos + half].copy_from_slice(&v[..half]);
        pos += half;
    }

    blake2b(&mut out[pos..], &[&v])
}
