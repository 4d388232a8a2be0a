use crate::engines::generation::genome::Chromosome;
use crate::error::{Result, TradeIntervalError};
use crate::types::AnalysisParameters;

/// Number of parameter fields packed into a chromosome
pub const FIELD_COUNT: usize = 4;

/// Affine map from a raw field value to a parameter value: `base + raw * step`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldEncoding {
    pub base: f64,
    pub step: f64,
}

impl FieldEncoding {
    pub const fn new(base: f64, step: f64) -> Self {
        Self { base, step }
    }

    pub fn decode(&self, raw: u32) -> f64 {
        self.base + f64::from(raw) * self.step
    }

    /// Nearest raw value for `value`, saturating at `[0, max_raw]`
    pub fn encode(&self, value: f64, max_raw: u32) -> u32 {
        let raw = ((value - self.base) / self.step).round();
        if raw.is_nan() || raw <= 0.0 {
            0
        } else {
            (raw as u64).min(u64::from(max_raw)) as u32
        }
    }
}

/// Field order inside the chromosome
pub const NUM_INTERVALS_FIELD: FieldEncoding = FieldEncoding::new(3.0, 1.0);
pub const HOLDING_PERIOD_FIELD: FieldEncoding = FieldEncoding::new(5.0, 5.0);
pub const TARGET_PROFIT_RATIO_FIELD: FieldEncoding = FieldEncoding::new(0.5, 0.2);
pub const CONFIDENCE_THRESHOLD_FIELD: FieldEncoding = FieldEncoding::new(0.3, 0.1);

/// Bidirectional mapping between chromosomes and [`AnalysisParameters`].
///
/// The chromosome holds [`FIELD_COUNT`] contiguous groups of `field_width` bits, read
/// big-endian. Bits past the last group (the default 10-bit chromosome carries two)
/// still take part in crossover and mutation but are never decoded. Decoded values are
/// clamped to each field's domain, so wider fields saturate instead of overflowing it.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterCodec {
    field_width: usize,
    fields: [FieldEncoding; FIELD_COUNT],
}

impl Default for ParameterCodec {
    fn default() -> Self {
        Self {
            field_width: 2,
            fields: [
                NUM_INTERVALS_FIELD,
                HOLDING_PERIOD_FIELD,
                TARGET_PROFIT_RATIO_FIELD,
                CONFIDENCE_THRESHOLD_FIELD,
            ],
        }
    }
}

impl ParameterCodec {
    pub fn new(field_width: usize) -> Result<Self> {
        if field_width == 0 || field_width > 16 {
            return Err(TradeIntervalError::Configuration(format!(
                "Field width must be between 1 and 16 bits, got {}",
                field_width
            )));
        }
        Ok(Self {
            field_width,
            ..Default::default()
        })
    }

    pub fn field_width(&self) -> usize {
        self.field_width
    }

    /// Minimum chromosome length this codec can decode
    pub fn required_length(&self) -> usize {
        FIELD_COUNT * self.field_width
    }

    fn max_raw(&self) -> u32 {
        (1u32 << self.field_width) - 1
    }

    pub fn decode(&self, chromosome: &Chromosome) -> Result<AnalysisParameters> {
        if chromosome.len() < self.required_length() {
            return Err(TradeIntervalError::Configuration(format!(
                "Chromosome of {} bits is shorter than the {} bits the codec reads",
                chromosome.len(),
                self.required_length()
            )));
        }

        let mut values = [0.0; FIELD_COUNT];
        for (i, (value, encoding)) in values.iter_mut().zip(&self.fields).enumerate() {
            let raw = chromosome
                .field_value(i * self.field_width, self.field_width)
                .ok_or_else(|| {
                    TradeIntervalError::Configuration(format!("Field {} out of bounds", i))
                })?;
            *value = encoding.decode(raw);
        }

        Ok(AnalysisParameters {
            num_intervals: values[0].round() as usize,
            holding_period: values[1].round() as usize,
            target_profit_ratio: values[2],
            confidence_threshold: values[3],
        }
        .clamped())
    }

    /// Nearest chromosome (of [`required_length`](Self::required_length) bits) for `params`
    pub fn encode(&self, params: &AnalysisParameters) -> Chromosome {
        let values = [
            params.num_intervals as f64,
            params.holding_period as f64,
            params.target_profit_ratio,
            params.confidence_threshold,
        ];

        let mut bits = Vec::with_capacity(self.required_length());
        for (value, encoding) in values.iter().zip(&self.fields) {
            let raw = encoding.encode(*value, self.max_raw());
            for shift in (0..self.field_width).rev() {
                bits.push((raw >> shift) & 1 == 1);
            }
        }
        Chromosome::from_bits(bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_decode_all_zero() {
        let codec = ParameterCodec::default();
        let params = codec.decode(&"0000000000".parse().unwrap()).unwrap();
        assert_eq!(params.num_intervals, 3);
        assert_eq!(params.holding_period, 5);
        assert!(approx(params.target_profit_ratio, 0.5));
        assert!(approx(params.confidence_threshold, 0.3));
    }

    #[test]
    fn test_decode_mixed_fields() {
        let codec = ParameterCodec::default();
        // 11 | 01 | 10 | 11 | (padding 00)
        let params = codec.decode(&"1101101100".parse().unwrap()).unwrap();
        assert_eq!(params.num_intervals, 6);
        assert_eq!(params.holding_period, 10);
        assert!(approx(params.target_profit_ratio, 0.9));
        assert!(approx(params.confidence_threshold, 0.6));
    }

    #[test]
    fn test_padding_bits_are_ignored() {
        let codec = ParameterCodec::default();
        let a = codec.decode(&"0110110000".parse().unwrap()).unwrap();
        let b = codec.decode(&"0110110011".parse().unwrap()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_short_chromosome_fails_fast() {
        let codec = ParameterCodec::default();
        let err = codec.decode(&"0101".parse().unwrap()).unwrap_err();
        assert!(matches!(err, TradeIntervalError::Configuration(_)));
    }

    #[test]
    fn test_wide_fields_saturate() {
        let codec = ParameterCodec::new(3).unwrap();
        let params = codec.decode(&"111111111111".parse().unwrap()).unwrap();
        assert_eq!(params.num_intervals, 6);
        assert_eq!(params.holding_period, 25);
        assert!(approx(params.target_profit_ratio, 1.3));
        assert!(approx(params.confidence_threshold, 0.7));
    }

    #[test]
    fn test_encode_then_decode_recovers_grid_point() {
        let codec = ParameterCodec::default();
        let params = AnalysisParameters::new(4, 15, 0.7, 0.5).unwrap();
        let chromosome = codec.encode(&params);
        assert_eq!(chromosome.to_string(), "01100110");
        let decoded = codec.decode(&chromosome).unwrap();
        assert_eq!(decoded.num_intervals, 4);
        assert_eq!(decoded.holding_period, 15);
        assert!(approx(decoded.target_profit_ratio, 0.7));
        assert!(approx(decoded.confidence_threshold, 0.5));
    }

    #[test]
    fn test_zero_width_rejected() {
        assert!(ParameterCodec::new(0).is_err());
        assert!(ParameterCodec::new(17).is_err());
    }
}
