use quickcheck_macros::quickcheck;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tradeinterval::engines::generation::operators::{crossover_at, mutate};
use tradeinterval::engines::generation::{Chromosome, FitnessEvaluator, ParameterCodec};
use tradeinterval::types::{
    CONFIDENCE_THRESHOLD_RANGE, HOLDING_PERIOD_RANGE, NUM_INTERVALS_RANGE,
    TARGET_PROFIT_RATIO_RANGE,
};
use tradeinterval::PriceBar;

fn padded(mut bits: Vec<bool>, min_len: usize) -> Chromosome {
    while bits.len() < min_len {
        bits.push(false);
    }
    Chromosome::from_bits(bits)
}

#[quickcheck]
fn decode_stays_in_parameter_ranges(bits: Vec<bool>, width: u8) -> bool {
    let width = (width % 8) as usize + 1;
    let codec = ParameterCodec::new(width).unwrap();
    let chromosome = padded(bits, codec.required_length());

    let Ok(params) = codec.decode(&chromosome) else {
        return false;
    };
    let again = codec.decode(&chromosome).unwrap();

    params == again
        && NUM_INTERVALS_RANGE.contains(&params.num_intervals)
        && HOLDING_PERIOD_RANGE.contains(&params.holding_period)
        && TARGET_PROFIT_RATIO_RANGE.contains(&params.target_profit_ratio)
        && CONFIDENCE_THRESHOLD_RANGE.contains(&params.confidence_threshold)
}

#[quickcheck]
fn crossover_keeps_length_and_splices(a: Vec<bool>, b: Vec<bool>, point: usize) -> bool {
    let len = a.len().max(b.len()).max(2);
    let parent1 = padded(a, len);
    let parent2 = padded(b, len);
    let point = point % len;

    let (child1, child2) = crossover_at(&parent1, &parent2, point);

    child1.len() == len
        && child2.len() == len
        && child1.bits()[..point] == parent1.bits()[..point]
        && child1.bits()[point..] == parent2.bits()[point..]
        && child2.bits()[..point] == parent2.bits()[..point]
        && child2.bits()[point..] == parent1.bits()[point..]
}

#[quickcheck]
fn mutation_flips_at_most_one_bit(bits: Vec<bool>, seed: u64, rate: u8) -> bool {
    let chromosome = padded(bits, 1);
    let mut rng = StdRng::seed_from_u64(seed);
    let rate = rate as f64 / u8::MAX as f64;

    let mutated = mutate(&chromosome, rate, &mut rng);

    mutated.len() == chromosome.len() && mutated.hamming_distance(&chromosome) <= 1
}

#[quickcheck]
fn fitness_is_finite_or_rejected(closes: Vec<u16>, bits: Vec<bool>) -> bool {
    let series: Vec<PriceBar> = closes
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            let close = 10.0 + c as f64;
            PriceBar::new(i, close + 1.0, close - 1.0, close)
        })
        .collect();
    let codec = ParameterCodec::default();
    let chromosome = padded(bits, 10);
    let evaluator = FitnessEvaluator::new(&series, codec);

    let value = evaluator.evaluate(&chromosome);
    !value.is_nan() && value != f64::INFINITY
}
