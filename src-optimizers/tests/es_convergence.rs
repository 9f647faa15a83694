use blackbox_benchmarks::{rosenbrock, sphere};
use blackbox_optimizers::*;
use ndarray::Array1;

#[test]
fn test_vdcma_rosenbrock_2d() {
    let p = Problem::with_uniform_bounds(rosenbrock, 2, -5.0, 5.0).unwrap().name("rosenbrock");
    let o = Options::builder().max_function_evaluations(5000).seed(2022).build().unwrap();
    let c = VdcmaConfig::default().mean(Array1::from_elem(2, 3.0)).sigma(3.0);
    let r = Vdcma::new(p, o, c).unwrap().optimize().unwrap();
    println!("{}", r.summary());
    assert_eq!(r.n_function_evaluations, 5000);
    assert!(r.best_so_far_y < 1.0, "best {}", r.best_so_far_y);
}

#[test]
fn test_vdcma_fitness_threshold() {
    let p = Problem::with_uniform_bounds(sphere, 8, -5.0, 5.0).unwrap();
    let o = Options::builder()
        .max_function_evaluations(100_000)
        .fitness_threshold(1e-8)
        .seed(5)
        .build()
        .unwrap();
    let r = Vdcma::new(p, o, VdcmaConfig::default()).unwrap().optimize().unwrap();
    assert_eq!(r.termination_signal, TerminationSignal::FitnessThreshold);
    assert!(r.best_so_far_y <= 1e-8);
    assert!(r.n_function_evaluations < 100_000);
}

#[test]
fn test_vdcma_rejects_wrong_mean_length() {
    let p = Problem::with_uniform_bounds(sphere, 4, -5.0, 5.0).unwrap();
    let o = Options::builder().max_function_evaluations(100).build().unwrap();
    let err = Vdcma::new(p, o, VdcmaConfig::default().mean(Array1::zeros(3)))
        .err()
        .unwrap();
    assert!(err.is_config_error());
}
