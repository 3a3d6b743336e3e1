use acs_instance::travelling_salesman::{Challenge, Difficulty, Solution};
use acs_solver::{
    solve, solve_challenge, AcsError, DistanceModel, PheromoneField, ReplaySource, Solver,
    SolverConfig, Tour, TourBuilder,
};
use proptest::prelude::*;
use rand::{rngs::SmallRng, SeedableRng};
use serde_json::json;
use std::cell::RefCell;

fn square() -> DistanceModel {
    DistanceModel::from_points(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]).unwrap()
}

fn is_permutation(order: &[usize], num_nodes: usize) -> bool {
    let mut sorted = order.to_vec();
    sorted.sort();
    sorted == (0..num_nodes).collect::<Vec<_>>()
}

/// Same cycle up to rotation and direction.
fn same_cycle(a: &[usize], b: &[usize]) -> bool {
    let n = b.len();
    if a.len() != n {
        return false;
    }
    let reversed: Vec<usize> = b.iter().rev().cloned().collect();
    (0..n).any(|shift| {
        (0..n).all(|i| a[i] == b[(i + shift) % n]) || (0..n).all(|i| a[i] == reversed[(i + shift) % n])
    })
}

#[test]
fn test_square_converges_to_perimeter() {
    let distances = square();
    let config = SolverConfig {
        n_ants: 5,
        iterations: 20,
        decay: 0.9,
        alpha: 1.0,
        beta: 3.0,
        q0: 0.9,
    };
    let mut rng = SmallRng::seed_from_u64(2024);
    let result = solve(&distances, config, &mut rng).unwrap();
    assert_eq!(result.best_length, 40.0);
    assert_eq!(result.best_tour.length(), 40.0);
    assert!(same_cycle(result.best_tour.order(), &[0, 1, 2, 3]));
    assert_eq!(result.best_length_history.len(), 20);
}

#[test]
fn test_two_nodes_always_double_the_edge() {
    let distances = DistanceModel::from_matrix(vec![vec![0.0, 3.25], vec![3.25, 0.0]]).unwrap();
    for iterations in [1, 2, 17] {
        let config = SolverConfig {
            iterations,
            ..Default::default()
        };
        let mut rng = SmallRng::seed_from_u64(iterations as u64);
        let result = solve(&distances, config, &mut rng).unwrap();
        assert_eq!(result.best_length, 6.5);
        assert!(is_permutation(result.best_tour.order(), 2));
    }
}

#[test]
fn test_best_length_never_increases() {
    let challenge =
        Challenge::generate_instance(&[17u8; 32], &Difficulty { num_nodes: 40 }).unwrap();
    let config = SolverConfig {
        n_ants: 4,
        iterations: 60,
        q0: 0.5,
        ..Default::default()
    };
    let mut rng = SmallRng::seed_from_u64(8);
    let result = solve(&challenge.distance_matrix, config, &mut rng).unwrap();
    assert!(result
        .best_length_history
        .windows(2)
        .all(|w| w[1] <= w[0]));
    assert_eq!(*result.best_length_history.last().unwrap(), result.best_length);
    assert_eq!(
        result.best_length_history[result.improved_at],
        result.best_length
    );
    assert!(result.improved_at == 0 || result.best_length_history[result.improved_at - 1] > result.best_length);
}

#[test]
fn test_single_generation_pheromone_update() {
    let distances = square();
    let tour = Tour::new(vec![3, 2, 1, 0], &distances).unwrap();
    let length = tour.length();
    let initial = PheromoneField::initial_level(4);

    let mut field = PheromoneField::new(4);
    field.update(0.95, std::slice::from_ref(&tour));
    for (from, to) in tour.edges() {
        assert_eq!(field.get(from, to), initial * 0.95 + 1.0 / length);
    }
    assert_eq!(field.get(0, 1), initial * 0.95);

    let mut untouched = PheromoneField::new(4);
    untouched.update(0.95, &[]);
    assert!(untouched.row(1).iter().all(|&t| t == initial * 0.95));
}

#[test]
fn test_greedy_construction_is_independent_of_randomness() {
    let challenge =
        Challenge::generate_instance(&[4u8; 32], &Difficulty { num_nodes: 15 }).unwrap();
    let distances = &challenge.distance_matrix;
    let mut field = PheromoneField::new(15);
    let baseline = Tour::new(challenge.baseline_route.clone(), distances).unwrap();
    field.update(0.7, &[baseline]);

    let config = SolverConfig {
        q0: 1.0,
        ..Default::default()
    };
    let builder = TourBuilder::new(distances, &field, &config);
    for start in [0, 7, 14] {
        let a = builder
            .build_from(start, &mut SmallRng::seed_from_u64(1))
            .unwrap();
        let b = builder
            .build_from(start, &mut SmallRng::seed_from_u64(2))
            .unwrap();
        let c = builder
            .build_from(start, &mut ReplaySource::new(vec![0.99, 0.01]))
            .unwrap();
        assert_eq!(a, b);
        assert_eq!(a, c);
    }
}

#[test]
fn test_invalid_config_rejected_before_running() {
    let distances = square();
    let config = SolverConfig {
        decay: 1.0,
        ..Default::default()
    };
    assert!(matches!(
        Solver::new(&distances, config),
        Err(AcsError::InvalidInput(_))
    ));
}

#[test]
fn test_seeded_runs_repeat() {
    let challenge =
        Challenge::generate_instance(&[2u8; 32], &Difficulty { num_nodes: 20 }).unwrap();
    let config = SolverConfig {
        iterations: 10,
        ..Default::default()
    };
    let run = |parallel: bool| {
        let mut solver = Solver::new(&challenge.distance_matrix, config).unwrap();
        let mut rng = SmallRng::seed_from_u64(99);
        if parallel {
            solver.run_parallel(&mut rng).unwrap()
        } else {
            solver.run(&mut rng).unwrap()
        }
    };
    assert_eq!(run(false), run(false));
    assert_eq!(run(true), run(true));
    assert!(is_permutation(run(true).best_tour.order(), 20));
}

#[test]
fn test_huge_distances_rejected_or_solved() {
    let overflowing = vec![vec![0.0, 1e308], vec![1e308, 0.0]];
    assert!(matches!(
        DistanceModel::from_matrix(overflowing),
        Err(AcsError::InvalidInput(_))
    ));

    let huge = vec![
        vec![0.0, 3e307, 2e307],
        vec![3e307, 0.0, 1e307],
        vec![2e307, 1e307, 0.0],
    ];
    let distances = DistanceModel::from_matrix(huge).unwrap();
    let config = SolverConfig {
        iterations: 3,
        ..Default::default()
    };
    let result = solve(&distances, config, &mut SmallRng::seed_from_u64(1)).unwrap();
    assert!((result.best_length - 6e307).abs() < 1e295);
    assert_eq!(result.improved_at, 0);
}

#[test]
fn test_solve_challenge_saves_every_improvement() {
    let challenge =
        Challenge::generate_instance(&[6u8; 32], &Difficulty { num_nodes: 25 }).unwrap();
    let saved: RefCell<Vec<Solution>> = RefCell::new(Vec::new());
    let save_solution = |solution: &Solution| -> anyhow::Result<()> {
        saved.borrow_mut().push(solution.clone());
        Ok(())
    };
    let hyperparameters = json!({"n_ants": 4, "iterations": 15}).as_object().cloned();
    solve_challenge(&challenge, &save_solution, &hyperparameters).unwrap();

    let saved = saved.into_inner();
    assert!(!saved.is_empty());
    let lengths: Vec<f64> = saved
        .iter()
        .map(|s| challenge.verify_solution(s).unwrap().total_distance)
        .collect();
    assert!(lengths.windows(2).all(|w| w[1] < w[0]));
}

#[test]
fn test_solve_challenge_rejects_bad_hyperparameters() {
    let challenge =
        Challenge::generate_instance(&[6u8; 32], &Difficulty { num_nodes: 5 }).unwrap();
    let hyperparameters = json!({"q0": 2.0}).as_object().cloned();
    assert!(solve_challenge(&challenge, &|_| Ok(()), &hyperparameters).is_err());
}

fn symmetric_matrix() -> impl Strategy<Value = Vec<Vec<f64>>> {
    (2usize..10).prop_flat_map(|n| {
        prop::collection::vec(0.5f64..100.0, n * n).prop_map(move |values| {
            let mut matrix = vec![vec![0.0; n]; n];
            for i in 0..n {
                for j in (i + 1)..n {
                    matrix[i][j] = values[i * n + j];
                    matrix[j][i] = values[i * n + j];
                }
            }
            matrix
        })
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_returned_tour_is_a_permutation(
        matrix in symmetric_matrix(),
        seed in any::<u64>(),
        q0 in 0.0f64..=1.0,
        parallel in any::<bool>(),
    ) {
        let num_nodes = matrix.len();
        let distances = DistanceModel::from_matrix(matrix).unwrap();
        let config = SolverConfig { n_ants: 3, iterations: 4, q0, ..Default::default() };
        let mut solver = Solver::new(&distances, config).unwrap();
        let mut rng = SmallRng::seed_from_u64(seed);
        let result = if parallel {
            solver.run_parallel(&mut rng).unwrap()
        } else {
            solver.run(&mut rng).unwrap()
        };
        prop_assert!(is_permutation(result.best_tour.order(), num_nodes));
        let recomputed = Tour::new(result.best_tour.order().to_vec(), &distances).unwrap();
        prop_assert_eq!(recomputed.length(), result.best_length);
        prop_assert!(result.best_length_history.windows(2).all(|w| w[1] <= w[0]));
        prop_assert!(solver.pheromones().row(0).iter().all(|&t| t >= 0.0));
    }
}
