use melody_genetics::{
    Crossover, EvolutionError, Genome, Mutation, Populate,
    algorithms::{
        crossover::{SinglePointCrossover, single_point_crossover},
        mutation::{BitFlipMutation, mutation},
    },
    genome::{RandomPopulation, generate_genome, generate_population, genome_to_string},
};
use rand::SeedableRng;
use rand_pcg::Pcg64;

fn genome(bits: &str) -> Genome {
    bits.replace(' ', "").parse().expect("valid bit string")
}

// ============================================================================
// Genome primitives
// ============================================================================

#[test]
fn test_generate_genome_has_requested_length() {
    let mut rng = Pcg64::seed_from_u64(42);
    assert_eq!(generate_genome(37, &mut rng).len(), 37);
    assert!(generate_genome(0, &mut rng).is_empty());
}

#[test]
fn test_generate_genome_bits_are_roughly_balanced() {
    let mut rng = Pcg64::seed_from_u64(42);
    let g = generate_genome(10_000, &mut rng);
    let ones = g.count_ones();
    assert!(
        (4_500..=5_500).contains(&ones),
        "expected about half ones, got {ones} of 10000"
    );
}

#[test]
fn test_generate_population_shape() {
    let mut rng = Pcg64::seed_from_u64(7);
    let population = generate_population(10, 16, &mut rng);
    assert_eq!(population.len(), 10);
    assert!(population.iter().all(|g| g.len() == 16));

    let mut populate = RandomPopulation::new(4, 3);
    let population = populate.populate(&mut rng);
    assert_eq!(population.len(), 4);
    assert!(population.iter().all(|g| g.len() == 3));
}

#[test]
fn test_genome_to_string_round_trips_through_parse() {
    let g = Genome::new(vec![true, false, false, true, true]);
    assert_eq!(genome_to_string(&g), "10011");
    assert_eq!(g.to_string().parse::<Genome>().unwrap(), g);
    assert_eq!(genome_to_string(&Genome::default()), "");
}

#[test]
fn test_genome_parse_rejects_other_characters() {
    let err = "0120".parse::<Genome>().unwrap_err();
    assert_eq!(err.found, '2');
    assert_eq!(err.position, 2);
}

#[test]
fn test_genome_serializes_as_bool_list() {
    let g = genome("101");
    let json = serde_json::to_string(&g).unwrap();
    assert_eq!(json, "[true,false,true]");
    assert_eq!(serde_json::from_str::<Genome>(&json).unwrap(), g);
}

// ============================================================================
// Single-point crossover
// ============================================================================

#[test]
fn test_crossover_children_recombine_parent_bits() {
    let mut rng = Pcg64::seed_from_u64(42);
    let a = genome("0000000000");
    let b = genome("1111111111");

    for _ in 0..200 {
        let (c1, c2) = single_point_crossover(&a, &b, &mut rng).unwrap();
        assert_eq!(c1.len(), 10);
        assert_eq!(c2.len(), 10);

        // c1 = a[..p] ++ b[p..], so its zeros are exactly the prefix.
        let p = 10 - c1.count_ones();
        assert!((1..=9).contains(&p), "cut point {p} outside [1, 9]");
        assert!(c1.bits()[..p].iter().all(|&bit| !bit));
        assert!(c1.bits()[p..].iter().all(|&bit| bit));
        assert!(c2.bits()[..p].iter().all(|&bit| bit));
        assert!(c2.bits()[p..].iter().all(|&bit| !bit));
    }
}

#[test]
fn test_crossover_uses_every_interior_cut_point() {
    let mut rng = Pcg64::seed_from_u64(3);
    let a = genome("00000");
    let b = genome("11111");
    let mut seen = [false; 6];
    for _ in 0..2_000 {
        let (c1, _) = single_point_crossover(&a, &b, &mut rng).unwrap();
        seen[5 - c1.count_ones()] = true;
    }
    assert_eq!(seen, [false, true, true, true, true, false]);
}

#[test]
fn test_crossover_on_mixed_parents_keeps_positions() {
    let mut rng = Pcg64::seed_from_u64(11);
    let a = genome("1100 1010");
    let b = genome("0011 0101");
    for _ in 0..100 {
        let (c1, c2) = single_point_crossover(&a, &b, &mut rng).unwrap();
        for i in 0..a.len() {
            let parents = [a.get(i), b.get(i)];
            assert!(parents.contains(&c1.get(i)));
            assert!(parents.contains(&c2.get(i)));
            // Each position is split between the two children.
            assert_ne!(c1.get(i), c2.get(i));
        }
    }
}

#[test]
fn test_crossover_short_genomes_returned_unchanged() {
    let mut rng = Pcg64::seed_from_u64(0);
    let (a, b) = (genome("1"), genome("0"));
    assert_eq!(single_point_crossover(&a, &b, &mut rng).unwrap(), (a, b));

    let (a, b) = (Genome::default(), Genome::default());
    assert_eq!(
        single_point_crossover(&a, &b, &mut rng).unwrap(),
        (a.clone(), b.clone())
    );
}

#[test]
fn test_crossover_rejects_length_mismatch() {
    let mut rng = Pcg64::seed_from_u64(0);
    let err = SinglePointCrossover
        .crossover(&genome("101"), &genome("10"), &mut rng)
        .unwrap_err();
    assert_eq!(err, EvolutionError::InvalidGenomeLength { left: 3, right: 2 });
}

#[test]
fn test_crossover_does_not_touch_parents() {
    let mut rng = Pcg64::seed_from_u64(5);
    let a = genome("110011");
    let b = genome("001100");
    let (a_before, b_before) = (a.clone(), b.clone());
    let _ = single_point_crossover(&a, &b, &mut rng).unwrap();
    assert_eq!(a, a_before);
    assert_eq!(b, b_before);
}

// ============================================================================
// Bit-flip mutation
// ============================================================================

#[test]
fn test_mutation_with_zero_probability_is_identity() {
    let mut rng = Pcg64::seed_from_u64(42);
    let g = genome("10110");
    assert_eq!(mutation(g.clone(), 50, 0.0, &mut rng).unwrap(), g);
}

#[test]
fn test_mutation_single_certain_trial_flips_one_bit() {
    let mut rng = Pcg64::seed_from_u64(42);
    for _ in 0..50 {
        let mutated = mutation(Genome::zeros(8), 1, 1.0, &mut rng).unwrap();
        assert_eq!(mutated.count_ones(), 1);
    }
}

#[test]
fn test_mutation_samples_indices_with_replacement() {
    let mut rng = Pcg64::seed_from_u64(42);
    // A one-bit genome is hit by every trial: an even number of certain
    // flips restores it.
    assert_eq!(mutation(genome("0"), 2, 1.0, &mut rng).unwrap(), genome("0"));
    assert_eq!(mutation(genome("0"), 3, 1.0, &mut rng).unwrap(), genome("1"));
}

#[test]
fn test_mutation_flip_rate_tracks_probability() {
    let mut rng = Pcg64::seed_from_u64(9);
    let mutated = mutation(Genome::zeros(10_000), 1_000, 0.5, &mut rng).unwrap();
    // ~500 successful trials, minus a handful of repeated indices.
    let ones = mutated.count_ones();
    assert!(
        (400..=600).contains(&ones),
        "expected roughly 500 flipped bits, got {ones}"
    );
}

#[test]
fn test_mutation_preserves_length() {
    let mut rng = Pcg64::seed_from_u64(1);
    let mut m = BitFlipMutation::new(4, 0.7);
    let g = generate_genome(33, &mut rng);
    assert_eq!(m.mutate(g, &mut rng).unwrap().len(), 33);
}

#[test]
fn test_mutation_of_empty_genome_is_degenerate() {
    let mut rng = Pcg64::seed_from_u64(1);
    assert_eq!(
        mutation(Genome::default(), 1, 0.5, &mut rng).unwrap_err(),
        EvolutionError::DegenerateGenome
    );
    // No trials, nothing to index.
    assert!(mutation(Genome::default(), 0, 0.5, &mut rng).is_ok());
}

#[test]
fn test_mutation_rejects_invalid_probability() {
    let mut rng = Pcg64::seed_from_u64(1);
    assert_eq!(
        mutation(genome("01"), 1, 1.5, &mut rng).unwrap_err(),
        EvolutionError::InvalidProbability(1.5)
    );
    assert!(matches!(
        mutation(genome("01"), 1, f64::NAN, &mut rng),
        Err(EvolutionError::InvalidProbability(_))
    ));
}
