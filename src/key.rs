//! Strategies turning usernames and notebook titles into numeric ids.

use serde::Deserialize;

pub trait KeyStrategy {
    fn derive(&self, input: &str) -> u32;
}

/// Sums each byte's offset from `'@'` scaled by a power of ten for its position,
/// so `"AB"` becomes `1 * 10 + 2`. Arithmetic wraps, and different strings collide easily.
#[derive(Debug, Clone, Copy, Default)]
pub struct Positional;

impl KeyStrategy for Positional {
    fn derive(&self, input: &str) -> u32 {
        let len = input.len();
        input.bytes().enumerate().fold(0u32, |id, (i, byte)| {
            let digit = (byte as i64 - 64) as u32;
            let scale = 10u32.wrapping_pow((len - i - 1) as u32);
            id.wrapping_add(digit.wrapping_mul(scale))
        })
    }
}

/// 32-bit FNV-1a.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fnv1a;

impl KeyStrategy for Fnv1a {
    fn derive(&self, input: &str) -> u32 {
        const OFFSET_BASIS: u32 = 0x811c_9dc5;
        const PRIME: u32 = 0x0100_0193;

        input.bytes().fold(OFFSET_BASIS, |hash, byte| {
            (hash ^ byte as u32).wrapping_mul(PRIME)
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyStrategyKind {
    #[default]
    Positional,
    Fnv1a,
}

impl KeyStrategyKind {
    pub fn build(self) -> Box<dyn KeyStrategy> {
        match self {
            KeyStrategyKind::Positional => Box::new(Positional),
            KeyStrategyKind::Fnv1a => Box::new(Fnv1a),
        }
    }
}
