//! End-to-end runs through the public API.

use cdeepso::prelude::*;
use cdeepso::trials::Trial;
use tempfile::TempDir;

fn sphere_evaluator() -> impl FitnessEvaluator {
    |positions: &Matrix, flags: &[bool], fitness: &mut [f64]| {
        for (i, row) in positions.rows().enumerate() {
            if flags[i] {
                fitness[i] = row.iter().map(|x| x * x).sum();
            }
        }
    }
}

#[test]
fn test_small_sphere_converges() {
    let config = OptimizerConfig::new()
        .with_dims(2)
        .with_population_size(4)
        .with_strategy(DeStrategy::Best)
        .with_candidate_source(CandidateSource::PosMem)
        .with_max_generations(200)
        .with_max_evaluations(1_000_000)
        .with_log_every(0)
        .with_seed(42);

    let mut optimizer = Cdeepso::new(config).unwrap();
    let result = optimizer.optimize(&mut sphere_evaluator(), None);

    assert_eq!(result.termination, TerminationReason::MaxGenerations);
    assert!(
        result.best_fitness < 1e-6,
        "best fitness {} after {} generations",
        result.best_fitness,
        result.generations
    );
}

#[test]
fn test_identical_seeds_identical_runs() {
    let config = OptimizerConfig::new()
        .with_dims(5)
        .with_population_size(12)
        .with_strategy(DeStrategy::Rand)
        .with_candidate_source(CandidateSource::PosMem)
        .with_max_generations(60)
        .with_log_every(0)
        .with_seed(2024);

    let trace = |config: OptimizerConfig| {
        let mut bests = Vec::new();
        let mut observer = |_: usize, s: &RunSnapshot<'_>| bests.push(s.global_best.fitness.to_bits());
        let mut optimizer = Cdeepso::new(config).unwrap();
        let result = optimizer.optimize(&mut Objective::Griewank, Some(&mut observer));
        (bests, result)
    };

    let (bests_a, a) = trace(config.clone());
    let (bests_b, b) = trace(config);

    assert_eq!(bests_a, bests_b);
    assert_eq!(a, b);
}

#[test]
fn test_different_seeds_diverge() {
    let base = OptimizerConfig::new()
        .with_dims(5)
        .with_population_size(8)
        .with_max_generations(20)
        .with_log_every(0);

    let a = Cdeepso::new(base.clone().with_seed(1))
        .unwrap()
        .optimize(&mut Objective::Rastrigin, None);
    let b = Cdeepso::new(base.with_seed(2))
        .unwrap()
        .optimize(&mut Objective::Rastrigin, None);

    assert_ne!(a.best_position, b.best_position);
}

#[test]
fn test_every_option_combination_runs() {
    for strategy in [DeStrategy::Rand, DeStrategy::Best] {
        for source in [CandidateSource::Pos, CandidateSource::Mem, CandidateSource::PosMem] {
            for policy in [MergePolicy::CarryFitness, MergePolicy::KeepIncumbentFitness] {
                let config = OptimizerConfig::new()
                    .with_dims(3)
                    .with_population_size(10)
                    .with_strategy(strategy)
                    .with_candidate_source(source)
                    .with_merge_policy(policy)
                    .with_max_generations(30)
                    .with_log_every(0)
                    .with_seed(9);

                let result = Cdeepso::new(config)
                    .unwrap()
                    .optimize(&mut Objective::Sphere, None);

                assert_eq!(result.generations, 30);
                assert!(result.best_fitness.is_finite());
                assert!(result.best_fitness <= result.history[0]);
            }
        }
    }
}

#[test]
fn test_nan_fitness_never_becomes_best() {
    let config = OptimizerConfig::new()
        .with_dims(2)
        .with_population_size(6)
        .with_max_generations(20)
        .with_log_every(0)
        .with_seed(3);

    // Left half-plane is undefined.
    let mut evaluator = Pointwise(|x: &[f64]| {
        if x[0] < 0.0 {
            f64::NAN
        } else {
            x[0] * x[0] + x[1] * x[1]
        }
    });
    let result = Cdeepso::new(config).unwrap().optimize(&mut evaluator, None);

    if result.best_fitness.is_finite() {
        assert!(result.best_position[0] >= 0.0);
    }
    for pair in result.history.windows(2) {
        assert!(!(pair[1] > pair[0]));
    }
}

#[test]
fn test_zero_capacity_archive_runs() {
    let config = OptimizerConfig::new()
        .with_dims(3)
        .with_population_size(8)
        .with_archive_size(0)
        .with_candidate_source(CandidateSource::Mem)
        .with_max_generations(25)
        .with_log_every(0)
        .with_seed(5);

    let mut archive_lengths = Vec::new();
    let mut observer = |_: usize, s: &RunSnapshot<'_>| archive_lengths.push(s.archive.len());
    let result = Cdeepso::new(config)
        .unwrap()
        .optimize(&mut Objective::Ackley, Some(&mut observer));

    assert_eq!(result.generations, 25);
    assert!(archive_lengths.iter().all(|&len| len == 0));
}

#[test]
fn test_config_file_drives_run() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("run.json");

    let config = OptimizerConfig::new()
        .with_dims(4)
        .with_population_size(6)
        .with_strategy(DeStrategy::Rand)
        .with_max_generations(10)
        .with_log_every(0)
        .with_seed(77);
    config.save(&path).unwrap();

    let loaded = OptimizerConfig::load(&path).unwrap();
    assert_eq!(loaded, config);

    let a = Cdeepso::new(config).unwrap().optimize(&mut Objective::Sphere, None);
    let b = Cdeepso::new(loaded).unwrap().optimize(&mut Objective::Sphere, None);
    assert_eq!(a, b);
}

#[test]
fn test_trial_report_serializes() {
    let config = OptimizerConfig::new()
        .with_dims(2)
        .with_population_size(5)
        .with_max_generations(10)
        .with_log_every(0)
        .with_seed(11);

    let report = run_trials(&config, Objective::Rosenbrock, 3, 0).unwrap();
    let json = serde_json::to_string(&report).unwrap();
    let back: TrialReport = serde_json::from_str(&json).unwrap();

    assert_eq!(back.trials.len(), 3);
    assert_eq!(back.objective, Objective::Rosenbrock);
    assert_eq!(back.config, config);
    assert!(json.contains("\"ros\""));
}

#[test]
fn test_undefined_objective_report_round_trips() {
    let config = OptimizerConfig::new()
        .with_dims(2)
        .with_population_size(4)
        .with_max_generations(5)
        .with_log_every(0)
        .with_seed(13);

    let result = Cdeepso::new(config.clone())
        .unwrap()
        .optimize(&mut Pointwise(|_: &[f64]| f64::NAN), None);
    assert_eq!(result.best_fitness, f64::INFINITY);

    let report = TrialReport {
        objective: Objective::Sphere,
        config,
        fitness: Summary::of(&[result.best_fitness]),
        elapsed_ms: Summary::of(&[1.0]),
        total_ms: 1.0,
        trials: vec![Trial {
            run: 0,
            seed: Some(13),
            elapsed_ms: 1.0,
            result,
        }],
    };

    let json = serde_json::to_string(&report).unwrap();
    assert!(json.contains("\"best_fitness\":null"));
    let back: TrialReport = serde_json::from_str(&json).unwrap();
    assert_eq!(back, report);
}
