use approx::assert_relative_eq;
use blackbox_benchmarks::*;
use ndarray::Array1;

#[test]
fn test_every_function_is_finite_on_random_points() {
    let points = [
        vec![0.3, -1.7, 2.2, 0.05],
        vec![-3.0, 3.0, -3.0, 3.0],
        vec![10.0, 20.0, -30.0, 0.5],
    ];
    for f in BaseFunction::all() {
        for p in &points {
            let v = f.try_evaluate(&Array1::from_vec(p.clone())).unwrap();
            assert!(v.is_finite(), "{} not finite at {:?}", f, p);
        }
    }
}

#[test]
fn test_minima_are_minimal_nearby() {
    // small perturbations around the known optimum never go lower
    let metadata = get_function_metadata();
    for f in BaseFunction::all() {
        let meta = &metadata[f.name()];
        let (location, value) = &meta.global_minima[0];
        if matches!(f, BaseFunction::Michalewicz | BaseFunction::Shubert) {
            continue;
        }
        for delta in [1e-3, -1e-3] {
            let mut x = Array1::from_vec(location.clone());
            x[0] += delta;
            assert!(f.evaluate(&x) >= *value - 1e-12, "{} below its minimum", f);
        }
    }
}

#[test]
fn test_known_values() {
    let x = Array1::from_vec(vec![1.0, 2.0]);
    assert_relative_eq!(sphere(&x), 5.0);
    assert_relative_eq!(cigar(&x), 1.0 + 4e6);
    assert_relative_eq!(discus(&x), 1e6 + 4.0);
    assert_relative_eq!(ellipsoid(&x), 1.0 + 4e6);
    assert_relative_eq!(different_powers(&x), 1.0 + 64.0);
    assert_relative_eq!(rosenbrock(&x), 100.0);
    assert_relative_eq!(schwefel12(&x), 1.0 + 9.0);
    assert_relative_eq!(step(&x), 5.0);
    // ackley is about 5.42 at (1, 2)
    assert_relative_eq!(ackley(&x), 5.422131717799509, epsilon = 1e-9);
}

#[test]
fn test_rotation_invariance_of_sphere() {
    let tmp = tempfile::tempdir().unwrap();
    let r = generate_rotation_matrix("sphere", 6, 42, tmp.path()).unwrap();
    let x = Array1::from_vec(vec![0.5, -1.0, 2.0, 0.0, 3.5, -0.25]);
    assert_relative_eq!(sphere(&r.dot(&x)), sphere(&x), epsilon = 1e-10);
}

#[test]
fn test_checked_errors() {
    let err = BaseFunction::Schaffer.try_evaluate(&Array1::from_vec(vec![1.0])).unwrap_err();
    assert!(err.is_dimension_error());
    println!("{}", err);
    assert!("not_a_function".parse::<BaseFunction>().is_err());
}
