use crate::error::TradeIntervalError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fixed-length bit string encoding one candidate parameter set.
///
/// Chromosomes are values: crossover and mutation build new ones instead of
/// editing a parent in place. The textual form is the familiar `"0110100111"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Chromosome {
    bits: Vec<bool>,
}

impl Chromosome {
    pub fn from_bits(bits: Vec<bool>) -> Self {
        Self { bits }
    }

    /// Uniform draw over `{0,1}^length`
    pub fn random<R: Rng>(length: usize, rng: &mut R) -> Self {
        Self {
            bits: (0..length).map(|_| rng.gen_bool(0.5)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    /// Unsigned big-endian value of `width` bits starting at `start`
    pub fn field_value(&self, start: usize, width: usize) -> Option<u32> {
        let field = self.bits.get(start..start.checked_add(width)?)?;
        Some(
            field
                .iter()
                .fold(0u32, |acc, &bit| (acc << 1) | u32::from(bit)),
        )
    }

    /// New chromosome with the bit at `position` inverted
    pub fn with_flipped(&self, position: usize) -> Self {
        let mut bits = self.bits.clone();
        if let Some(bit) = bits.get_mut(position) {
            *bit = !*bit;
        }
        Self { bits }
    }

    /// Number of positions at which two equal-length chromosomes differ
    pub fn hamming_distance(&self, other: &Chromosome) -> usize {
        self.bits
            .iter()
            .zip(&other.bits)
            .filter(|(a, b)| a != b)
            .count()
            + self.bits.len().abs_diff(other.bits.len())
    }
}

impl fmt::Display for Chromosome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.bits {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl FromStr for Chromosome {
    type Err = TradeIntervalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bits = s
            .chars()
            .map(|c| match c {
                '0' => Ok(false),
                '1' => Ok(true),
                other => Err(TradeIntervalError::InvalidParameters(format!(
                    "Invalid chromosome character '{}' in \"{}\"",
                    other, s
                ))),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { bits })
    }
}

impl From<Chromosome> for String {
    fn from(chromosome: Chromosome) -> Self {
        chromosome.to_string()
    }
}

impl TryFrom<String> for Chromosome {
    type Error = TradeIntervalError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
