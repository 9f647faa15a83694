use std::sync::Arc;

use approx::assert_abs_diff_eq;
use blackbox_benchmarks::{BaseFunction, DataStore, Transform, TransformedFunction};
use blackbox_optimizers::*;
use ndarray::Array1;

#[test]
fn test_options_json_file() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("options.json");
    let options = Options::builder()
        .max_function_evaluations(5000)
        .seed(2022)
        .saving_fitness(100)
        .early_stopping(1000, 1e-10)
        .build()
        .unwrap();
    options.to_json_file(&path).unwrap();
    assert_eq!(Options::from_json_file(&path).unwrap(), options);

    // missing fields take their defaults
    std::fs::write(&path, r#"{"max_runtime": 2.5}"#).unwrap();
    let partial = Options::from_json_file(&path).unwrap();
    assert_eq!(partial.max_runtime, Some(2.5));
    assert_eq!(partial.max_function_evaluations, None);
    assert!(!partial.parallel);

    // no way to stop
    std::fs::write(&path, r#"{"seed": 1}"#).unwrap();
    assert!(matches!(Options::from_json_file(&path), Err(OptError::NoTermination)));
}

#[test]
fn test_results_json_keeps_history() {
    let tmp = tempfile::tempdir().unwrap();
    let p = Problem::with_uniform_bounds(|x: &Array1<f64>| x.dot(x), 3, -5.0, 5.0)
        .unwrap()
        .name("sphere-3d");
    let o = Options::builder().max_function_evaluations(1000).saving_fitness(200).seed(9).build().unwrap();
    let r = run_algorithm(Algorithm::Dcem, p, o, None).unwrap();
    let evaluations: Vec<usize> = r.fitness.iter().map(|f| f.0).collect();
    assert_eq!(evaluations, vec![1, 200, 400, 600, 800, 1000]);
    assert!(r.fitness.windows(2).all(|w| w[1].1 <= w[0].1));

    let path = tmp.path().join("runs").join("dcem.json");
    r.to_json_file(&path).unwrap();
    let loaded = OptimizationResults::from_json_file(&path).unwrap();
    assert_eq!(loaded.optimizer, "DCEM");
    assert_eq!(loaded.problem, "sphere-3d");
    assert_eq!(loaded.fitness, r.fitness);
    assert_eq!(loaded.termination_signal, TerminationSignal::MaxFunctionEvaluations);
    assert_eq!(loaded.best_so_far_x, r.best_so_far_x);
}

#[test]
fn test_recorder_follows_a_run() {
    let tmp = tempfile::tempdir().unwrap();
    let recorder = OptimizationRecorder::new("spsol_sphere");
    let p = Problem::with_uniform_bounds(|x: &Array1<f64>| x.dot(x), 2, -5.0, 5.0).unwrap();
    let o = Options::builder().max_function_evaluations(400).seed(3).build().unwrap();
    let r = run_algorithm(Algorithm::Spsol, p, o, Some(recorder.create_callback())).unwrap();

    // 20 particles: the initial batch plus 19 full generations
    assert_eq!(r.n_generations, 19);
    assert_eq!(recorder.num_generations(), 19);
    let records = recorder.get_records();
    assert!(records.windows(2).all(|w| w[1].best_result <= w[0].best_result));
    let (x, y) = recorder.get_best_solution().unwrap();
    assert_eq!(y, r.best_so_far_y);
    assert_eq!(x, r.best_so_far_x.to_vec());

    let path = recorder.save_to_csv(tmp.path()).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    let mut lines = text.lines();
    assert_eq!(
        lines.next().unwrap(),
        "generation,n_function_evaluations,x0,x1,best_result,runtime,is_improvement"
    );
    assert_eq!(lines.count(), 19);
}

#[test]
fn test_shifted_rotated_sphere_finds_the_shift() {
    let tmp = tempfile::tempdir().unwrap();
    let store = Arc::new(DataStore::new(tmp.path()));
    let shift = store.shift_or_generate("sphere", 5, -5.0, 5.0, 11).unwrap();
    store.rotation_or_generate("sphere", 5, 11).unwrap();
    let f = TransformedFunction::new(BaseFunction::Sphere, Transform::ShiftedRotated, store)
        .prepare(5)
        .unwrap();

    let p = Problem::with_uniform_bounds(f.as_fn(), 5, -10.0, 10.0).unwrap().name("shifted_rotated_sphere");
    let o = Options::builder().max_function_evaluations(20_000).seed(0).build().unwrap();
    let c = ScemConfig::default().n_individuals(100).n_parents(20);
    let r = Scem::new(p, o, c).unwrap().optimize().unwrap();
    println!("{}", r.summary());
    assert!(r.best_so_far_y < 1e-4, "best {}", r.best_so_far_y);
    for (x, s) in r.best_so_far_x.iter().zip(shift.iter()) {
        assert_abs_diff_eq!(*x, *s, epsilon = 1e-2);
    }
}

#[test]
fn test_unknown_algorithm_name() {
    let err = "cma-es-plus".parse::<Algorithm>().unwrap_err();
    assert!(matches!(err, OptError::UnknownAlgorithm(_)));
}
