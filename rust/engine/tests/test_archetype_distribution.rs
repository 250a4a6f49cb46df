mod helpers;

use std::collections::HashMap;

use draftsim_engine::archetype::{ArchetypeChoice, ArchetypeMode, WeightedArchetypes};
use draftsim_engine::errors::DistributionError;
use draftsim_engine::simulator::{DraftSimulator, SimulationConfig};
use helpers::balanced_catalog;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

#[test]
fn weighted_draws_track_their_probabilities() {
    let dist = WeightedArchetypes::parse("WU=0.5,UB=0.3,BR=0.2").unwrap();
    let mut rng = ChaCha20Rng::seed_from_u64(2024);
    let draws = 10_000;
    let mut counts: HashMap<ArchetypeChoice, usize> = HashMap::new();
    for _ in 0..draws {
        *counts.entry(dist.draw(&mut rng)).or_insert(0) += 1;
    }
    for (choice, p) in dist.entries() {
        let observed = counts.get(choice).copied().unwrap_or(0) as f64 / draws as f64;
        assert!(
            (observed - p).abs() < 0.03,
            "{choice}: observed {observed}, expected {p}"
        );
    }
}

#[test]
fn even_split_holds_across_a_full_run() {
    let catalog = balanced_catalog();
    let dist = WeightedArchetypes::parse("WU=0.5,UB=0.5").unwrap();
    let config = SimulationConfig {
        trials: 10_000,
        seed: Some(42),
        archetype_mode: ArchetypeMode::Weighted(dist),
        ..SimulationConfig::default()
    };
    let outcome = DraftSimulator::new(config).run(&catalog).unwrap();
    assert_eq!(outcome.trials.len(), 10_000);

    let wu = outcome
        .trials
        .iter()
        .filter(|t| t.archetype.tag() == "WU")
        .count();
    let ub = outcome.trials.len() - wu;
    assert!(outcome.trials.iter().all(|t| matches!(t.archetype.tag(), "WU" | "UB")));
    for (tag, n) in [("WU", wu), ("UB", ub)] {
        let share = n as f64 / 10_000.0;
        assert!((share - 0.5).abs() < 0.03, "{tag}: observed {share}");
    }
}

#[test]
fn zero_weight_entries_are_never_drawn() {
    let dist = WeightedArchetypes::parse("WU=1.0,RG=0.0").unwrap();
    let mut rng = ChaCha20Rng::seed_from_u64(1);
    for _ in 0..1_000 {
        assert_eq!(dist.draw(&mut rng).to_string(), "WU");
    }
}

#[test]
fn malformed_distributions_are_rejected() {
    assert_eq!(WeightedArchetypes::new(vec![]), Err(DistributionError::Empty));

    let wu = ArchetypeChoice::Archetype("WU".parse().unwrap());
    assert!(matches!(
        WeightedArchetypes::new(vec![(wu, 0.5), (wu, 0.5)]),
        Err(DistributionError::Duplicate { .. })
    ));
    assert!(matches!(
        WeightedArchetypes::new(vec![(wu, 0.7)]),
        Err(DistributionError::BadSum { .. })
    ));
    assert!(matches!(
        WeightedArchetypes::new(vec![(wu, -0.5), (ArchetypeChoice::Auto, 1.5)]),
        Err(DistributionError::InvalidWeight { .. })
    ));
    assert!(WeightedArchetypes::parse("WU=abc").is_err());
    assert!(WeightedArchetypes::parse("XY=1.0").is_err());
}
