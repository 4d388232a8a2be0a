use crate::engines::generation::genome::Chromosome;
use rand::seq::index;
use rand::seq::SliceRandom;
use rand::Rng;

/// Floor added to normalized fitness so every valid candidate can be drawn
pub const SELECTION_EPSILON: f64 = 1e-6;

/// Which branch of parent selection produced the pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPath {
    /// Fewer than two finite fitness values: uniform over the whole population
    UniformPopulation,
    /// All finite fitness values are equal: uniform over the valid candidates
    UniformValid,
    /// Fitness-proportionate draw without replacement
    Roulette,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParentSelection {
    pub first: usize,
    pub second: usize,
    pub path: SelectionPath,
}

/// Draw `size` chromosomes uniformly over `{0,1}^length`
pub fn initialize_population<R: Rng>(size: usize, length: usize, rng: &mut R) -> Vec<Chromosome> {
    (0..size).map(|_| Chromosome::random(length, rng)).collect()
}

/// Roulette-wheel selection of two distinct population indices.
///
/// Non-finite fitness values are excluded from the wheel. Valid values are min-max
/// normalized to `[0, 1]` plus [`SELECTION_EPSILON`]. Degenerate landscapes fall back
/// to uniform draws (see [`SelectionPath`]). Returns `None` only when the population
/// holds fewer than two chromosomes.
pub fn select_parents<R: Rng>(fitness: &[f64], rng: &mut R) -> Option<ParentSelection> {
    if fitness.len() < 2 {
        return None;
    }

    let valid: Vec<usize> = (0..fitness.len())
        .filter(|&i| fitness[i].is_finite())
        .collect();

    if valid.len() < 2 {
        let picked = index::sample(rng, fitness.len(), 2);
        return Some(ParentSelection {
            first: picked.index(0),
            second: picked.index(1),
            path: SelectionPath::UniformPopulation,
        });
    }

    let (min_fitness, max_fitness) = valid.iter().fold(
        (f64::INFINITY, f64::NEG_INFINITY),
        |(lo, hi), &i| (lo.min(fitness[i]), hi.max(fitness[i])),
    );
    let span = max_fitness - min_fitness;

    if span <= 0.0 || !span.is_finite() {
        return Some(uniform_among(&valid, rng, SelectionPath::UniformValid));
    }

    let weight = |&i: &usize| (fitness[i] - min_fitness) / span + SELECTION_EPSILON;
    match valid.choose_multiple_weighted(rng, 2, weight) {
        Ok(chosen) => {
            let chosen: Vec<usize> = chosen.copied().collect();
            Some(ParentSelection {
                first: chosen[0],
                second: chosen[1],
                path: SelectionPath::Roulette,
            })
        }
        Err(e) => {
            log::warn!("Weighted selection failed ({}), drawing uniformly", e);
            Some(uniform_among(&valid, rng, SelectionPath::UniformValid))
        }
    }
}

fn uniform_among<R: Rng>(candidates: &[usize], rng: &mut R, path: SelectionPath) -> ParentSelection {
    let picked = index::sample(rng, candidates.len(), 2);
    ParentSelection {
        first: candidates[picked.index(0)],
        second: candidates[picked.index(1)],
        path,
    }
}

/// Single-point crossover applied with probability `crossover_rate`;
/// otherwise the children are copies of the parents.
pub fn crossover<R: Rng>(
    parent1: &Chromosome,
    parent2: &Chromosome,
    crossover_rate: f64,
    rng: &mut R,
) -> (Chromosome, Chromosome) {
    if rng.gen::<f64>() >= crossover_rate {
        return (parent1.clone(), parent2.clone());
    }

    let len = parent1.len().min(parent2.len());
    if len <= 1 {
        return (parent1.clone(), parent2.clone());
    }

    let point = rng.gen_range(1..len);
    crossover_at(parent1, parent2, point)
}

/// Swap tails at `point`: `child1 = parent1[..point] + parent2[point..]`, `child2` mirrors it
pub fn crossover_at(
    parent1: &Chromosome,
    parent2: &Chromosome,
    point: usize,
) -> (Chromosome, Chromosome) {
    let point = point.min(parent1.len()).min(parent2.len());
    let (head1, tail1) = parent1.bits().split_at(point);
    let (head2, tail2) = parent2.bits().split_at(point);

    let child1 = Chromosome::from_bits([head1, tail2].concat());
    let child2 = Chromosome::from_bits([head2, tail1].concat());
    (child1, child2)
}

/// With probability `mutation_rate`, flip exactly one randomly chosen bit
pub fn mutate<R: Rng>(chromosome: &Chromosome, mutation_rate: f64, rng: &mut R) -> Chromosome {
    if chromosome.is_empty() || rng.gen::<f64>() >= mutation_rate {
        return chromosome.clone();
    }
    let point = rng.gen_range(0..chromosome.len());
    chromosome.with_flipped(point)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn chromosome(s: &str) -> Chromosome {
        s.parse().unwrap()
    }

    #[test]
    fn test_crossover_at_swaps_tails() {
        let (c1, c2) = crossover_at(&chromosome("0000000000"), &chromosome("1111111111"), 3);
        assert_eq!(c1.to_string(), "0001111111");
        assert_eq!(c2.to_string(), "1110000000");
    }

    #[test]
    fn test_crossover_rate_zero_copies_parents() {
        let mut rng = StdRng::seed_from_u64(1);
        let p1 = chromosome("0101010101");
        let p2 = chromosome("1100110011");
        let (c1, c2) = crossover(&p1, &p2, 0.0, &mut rng);
        assert_eq!(c1, p1);
        assert_eq!(c2, p2);
    }

    #[test]
    fn test_crossover_rate_one_cuts_inside() {
        let mut rng = StdRng::seed_from_u64(9);
        let p1 = chromosome("0000000000");
        let p2 = chromosome("1111111111");
        for _ in 0..50 {
            let (c1, c2) = crossover(&p1, &p2, 1.0, &mut rng);
            // a cut in [1, len-1] keeps the first bit of each parent and takes the last from the other
            assert!(!c1.bits()[0] && c1.bits()[9]);
            assert!(c2.bits()[0] && !c2.bits()[9]);
        }
    }

    #[test]
    fn test_mutate_rate_bounds() {
        let mut rng = StdRng::seed_from_u64(5);
        let original = chromosome("0110011001");
        assert_eq!(mutate(&original, 0.0, &mut rng), original);
        let mutated = mutate(&original, 1.0, &mut rng);
        assert_eq!(original.hamming_distance(&mutated), 1);
    }

    #[test]
    fn test_select_parents_all_negative_infinity() {
        let mut rng = StdRng::seed_from_u64(11);
        let fitness = vec![f64::NEG_INFINITY; 4];
        let selection = select_parents(&fitness, &mut rng).unwrap();
        assert_ne!(selection.first, selection.second);
        assert_eq!(selection.path, SelectionPath::UniformPopulation);
    }

    #[test]
    fn test_select_parents_equal_fitness() {
        let mut rng = StdRng::seed_from_u64(11);
        let fitness = vec![2.0, f64::NAN, 2.0, 2.0];
        let selection = select_parents(&fitness, &mut rng).unwrap();
        assert_ne!(selection.first, selection.second);
        assert_ne!(selection.first, 1);
        assert_ne!(selection.second, 1);
        assert_eq!(selection.path, SelectionPath::UniformValid);
    }

    #[test]
    fn test_select_parents_skips_invalid_in_roulette() {
        let mut rng = StdRng::seed_from_u64(2);
        let fitness = vec![f64::NEG_INFINITY, 1.0, f64::INFINITY, 3.0, f64::NAN];
        for _ in 0..100 {
            let selection = select_parents(&fitness, &mut rng).unwrap();
            assert_eq!(selection.path, SelectionPath::Roulette);
            let mut pair = [selection.first, selection.second];
            pair.sort_unstable();
            assert_eq!(pair, [1, 3]);
        }
    }

    #[test]
    fn test_select_parents_favours_fitter() {
        let mut rng = StdRng::seed_from_u64(21);
        let fitness = vec![0.0, 0.0, 0.0, 100.0];
        let hits = (0..500)
            .filter_map(|_| select_parents(&fitness, &mut rng))
            .filter(|s| s.first == 3 || s.second == 3)
            .count();
        // the best candidate is in practically every pair
        assert!(hits > 490);
    }

    #[test]
    fn test_select_parents_needs_two() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(select_parents(&[1.0], &mut rng).is_none());
    }
}
