use std::ops::{BitXor, BitXorAssign, Index, IndexMut};

pub const BLOCK_BYTES: usize = 1024;

const WORDS: usize = BLOCK_BYTES / 8;

/// One 1 KiB cell of the Argon2 memory matrix, held as little-endian words.
#[derive(Clone, Copy)]
pub struct Block([u64; WORDS]);

impl Block {
    pub const ZERO: Block = Block([0; WORDS]);

    pub fn from_bytes(bytes: &[u8; BLOCK_BYTES]) -> Self {
        let mut words = [0u64; WORDS];
        for (word, chunk) in words.iter_mut().zip(bytes.chunks_exact(8)) {
            let mut le = [0u8; 8];
            le.copy_from_slice(chunk);
            *word = u64::from_le_bytes(le);
        }
        Block(words)
    }

    pub fn to_bytes(&self) -> [u8; BLOCK_BYTES] {
        let mut bytes = [0u8; BLOCK_BYTES];
        for (chunk, word) in bytes.chunks_exact_mut(8).zip(self.0.iter()) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }
        bytes
    }
}

impl<'a> BitXorAssign<&'a Block> for Block {
    fn bitxor_assign(&mut self, rhs: &Block) {
        for (d, r) in self.0.iter_mut().zip(rhs.0.iter()) {
            *d ^= *r;
        }
    }
}

impl<'a> BitXor<&'a Block> for Block {
    type Output = Block;

    fn bitxor(mut self, rhs: &Block) -> Block {
        self ^= rhs;
        self
    }
}

impl Index<usize> for Block {
    type Output = u64;

    fn index(&self, idx: usize) -> &u64 {
        &self.0[idx]
    }
}

impl IndexMut<usize> for Block {
    fn index_mut(&mut self, idx: usize) -> &mut u64 {
        &mut self.0[idx]
    }
}

/// The compression function G: `P(X ^ Y) ^ X ^ Y`, where P is applied to
/// each row of sixteen words and then to each column of 2-word pairs.
pub fn compress(x: &Block, y: &Block) -> Block {
    let r = *x ^ y;
    let mut q = r;

    for row in 0..8 {
        permute(&mut q, std::array::from_fn(|k| 16 * row + k));
    }
    for col in 0..8 {
        permute(&mut q, std::array::from_fn(|k| 2 * col + 16 * (k / 2) + k % 2));
    }

    q ^ &r
}

fn permute(b: &mut Block, v: [usize; 16]) {
    mix(b, v[0], v[4], v[8], v[12]);
    mix(b, v[1], v[5], v[9], v[13]);
    mix(b, v[2], v[6], v[10], v[14]);
    mix(b, v[3], v[7], v[11], v[15]);

    mix(b, v[0], v[5], v[10], v[15]);
    mix(b, v[1], v[6], v[11], v[12]);
    mix(b, v[2], v[7], v[8], v[13]);
    mix(b, v[3], v[4], v[9], v[14]);
}

// BLAKE2b's G with the additions replaced by BlaMka.
fn mix(b: &mut Block, a: usize, bi: usize, c: usize, d: usize) {
    b[a] = blamka(b[a], b[bi]);
    b[d] = (b[d] ^ b[a]).rotate_right(32);
    b[c] = blamka(b[c], b[d]);
    b[bi] = (b[bi] ^ b[c]).rotate_right(24);
    b[a] = blamka(b[a], b[bi]);
    b[d] = (b[d] ^ b[a]).rotate_right(16);
    b[c] = blamka(b[c], b[d]);
    b[bi] = (b[bi] ^ b[c]).rotate_right(63);
}

fn blamka(x: u64, y: u64) -> u64 {
    let low = (x & 0xffff_ffff).wrapping_mul(y & 0xffff_ffff);
    x.wrapping_add(y).wrapping_add(low.wrapping_mul(2))
}
