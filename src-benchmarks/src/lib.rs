//! Benchmark test functions for black-box optimization
//!
//! This library provides the classic synthetic landscapes used to compare
//! black-box optimizers, plus rotated and shifted variants of each of them:
//!
//! - **Unimodal**: sphere, ill-conditioned quadratics (cigar, discus,
//!   ellipsoid, ...), rosenbrock, schwefel's problems
//! - **Multimodal**: ackley, rastrigin and its scaled/skewed forms, griewank,
//!   michalewicz, shubert, ...
//! - **Transforms**: `f(R x)`, `f(x - s)` and `f(R (x - s))` with rotation
//!   matrices and shift vectors generated once and persisted to text files
//!
//! # Example
//!
//! ```rust
//! use ndarray::Array1;
//! use blackbox_benchmarks::*;
//!
//! let x = Array1::from_vec(vec![0.0, 0.0]);
//! assert_eq!(sphere(&x), 0.0);
//!
//! // Get function metadata
//! let metadata = get_function_metadata();
//! let bounds = get_function_bounds("sphere");
//! assert!(metadata.contains_key("ellipsoid"));
//! assert_eq!(bounds, Some((-10.0, 10.0)));
//! ```

use ndarray::Array2;
use std::collections::HashMap;

pub mod base;
pub mod error;
pub mod functions;
pub mod generate;
pub mod matrix_io;
pub mod rotation;
pub mod shift;
pub mod store;
pub mod transformed;

pub use base::{BaseFunction, ObjectiveFn, check_input};
pub use error::{BenchmarkError, Result};
pub use functions::*;
pub use generate::{GenerateConfig, generate_transform_data};
pub use rotation::{generate_rotation_matrix, load_rotation_matrix};
pub use shift::{generate_shift_vector, load_shift_vector};
pub use store::DataStore;
pub use transformed::{PreparedFunction, Transform, TransformedFunction};

/// Metadata for a test function: search box, known optima, and properties
#[derive(Debug, Clone)]
pub struct FunctionMetadata {
    /// Function name
    pub name: String,
    /// Bounds for each dimension (min, max)
    pub bounds: Vec<(f64, f64)>,
    /// Global minima locations and values
    pub global_minima: Vec<(Vec<f64>, f64)>,
    /// Description of the function
    pub description: String,
    /// Whether the function is multimodal
    pub multimodal: bool,
    /// Typical dimension(s) for the function
    pub dimensions: Vec<usize>,
}

/// Create bounds matrix for optimization (2 x n matrix)
/// bounds[[0, i]] = lower bound, bounds[[1, i]] = upper bound
pub fn create_bounds(n: usize, lower: f64, upper: f64) -> Array2<f64> {
    Array2::from_shape_fn((2, n), |(i, _)| if i == 0 { lower } else { upper })
}

fn insert(
    metadata: &mut HashMap<String, FunctionMetadata>,
    function: BaseFunction,
    bound: (f64, f64),
    minima: Vec<(Vec<f64>, f64)>,
    description: &str,
) {
    metadata.insert(
        function.name().to_string(),
        FunctionMetadata {
            name: function.name().to_string(),
            bounds: vec![bound; 2], // Default 2D, but can be N-dimensional
            global_minima: minima,
            description: description.to_string(),
            multimodal: function.is_multimodal(),
            dimensions: vec![2, 10, 100],
        },
    );
}

/// Get metadata for all available test functions
pub fn get_function_metadata() -> HashMap<String, FunctionMetadata> {
    use BaseFunction::*;

    let mut metadata = HashMap::new();
    let origin = |value: f64| vec![(vec![0.0, 0.0], value)];

    insert(&mut metadata, Sphere, (-10.0, 10.0), origin(0.0), "N-dimensional quadratic function");
    insert(&mut metadata, Cigar, (-10.0, 10.0), origin(0.0), "quadratic with one short axis");
    insert(&mut metadata, Discus, (-10.0, 10.0), origin(0.0), "quadratic with one long axis");
    insert(
        &mut metadata,
        CigarDiscus,
        (-10.0, 10.0),
        origin(0.0),
        "quadratic mixing cigar and discus conditioning",
    );
    insert(
        &mut metadata,
        Ellipsoid,
        (-10.0, 10.0),
        origin(0.0),
        "ill-conditioned quadratic, condition number 1e6",
    );
    insert(
        &mut metadata,
        DifferentPowers,
        (-10.0, 10.0),
        origin(0.0),
        "sum of powers from 2 to 6",
    );
    insert(&mut metadata, Schwefel221, (-100.0, 100.0), origin(0.0), "max-norm, non-smooth");
    insert(&mut metadata, Step, (-100.0, 100.0), origin(0.0), "plateaus, discontinuous");
    insert(
        &mut metadata,
        Schwefel222,
        (-10.0, 10.0),
        origin(0.0),
        "sum plus product of absolute values",
    );
    insert(
        &mut metadata,
        Rosenbrock,
        (-5.0, 10.0),
        vec![(vec![1.0, 1.0], 0.0)],
        "N-dimensional banana function",
    );
    insert(
        &mut metadata,
        Schwefel12,
        (-100.0, 100.0),
        origin(0.0),
        "squared partial sums, fully non-separable",
    );
    insert(&mut metadata, Exponential, (-1.0, 1.0), origin(-1.0), "negated gaussian bell");
    insert(&mut metadata, Griewank, (-600.0, 600.0), origin(0.0), "N-dimensional multimodal function");
    insert(
        &mut metadata,
        Bohachevsky,
        (-100.0, 100.0),
        origin(0.0),
        "chained bowl with cosine ripples",
    );
    insert(
        &mut metadata,
        Ackley,
        (-32.768, 32.768),
        origin(0.0),
        "N-dimensional multimodal function",
    );
    insert(
        &mut metadata,
        Rastrigin,
        (-5.12, 5.12),
        origin(0.0),
        "N-dimensional highly multimodal function",
    );
    insert(
        &mut metadata,
        ScaledRastrigin,
        (-5.12, 5.12),
        origin(0.0),
        "rastrigin with axes scaled from 1 to 10",
    );
    insert(
        &mut metadata,
        SkewRastrigin,
        (-5.12, 5.12),
        origin(0.0),
        "rastrigin stretched on the positive side",
    );
    insert(
        &mut metadata,
        LevyMontalvo,
        (-10.0, 10.0),
        vec![(vec![-1.0, -1.0], 0.0)],
        "multimodal function with a sine-modulated valley",
    );
    insert(
        &mut metadata,
        Michalewicz,
        (0.0, std::f64::consts::PI),
        vec![(vec![2.202906, 1.570796], -1.8013034)],
        "steep ridges and valleys, m = 10",
    );
    insert(&mut metadata, Salomon, (-100.0, 100.0), origin(0.0), "concentric ripples");
    insert(
        &mut metadata,
        Shubert,
        (-10.0, 10.0),
        vec![(vec![-7.0835, 4.8580], -186.7309), (vec![4.8580, -7.0835], -186.7309)],
        "2D multimodal function with 18 global minima",
    );
    insert(
        &mut metadata,
        Schaffer,
        (-100.0, 100.0),
        origin(0.0),
        "chained schaffer F7, rings of local minima",
    );

    metadata
}

/// Get function bounds as a simple (min, max) tuple for the first dimension
pub fn get_function_bounds(function_name: &str) -> Option<(f64, f64)> {
    let metadata = get_function_metadata();
    metadata
        .get(function_name)
        .and_then(|meta| meta.bounds.first().copied())
}

/// Get bounds for all `n` dimensions, falling back to `default_bounds`
pub fn get_function_bounds_vec(
    function_name: &str,
    default_bounds: (f64, f64),
    n: usize,
) -> Vec<(f64, f64)> {
    let bound = get_function_bounds(function_name).unwrap_or(default_bounds);
    vec![bound; n]
}

/// Get the bounds as a 2 x n matrix, falling back to `default_bounds`
pub fn get_function_bounds_2d(
    function_name: &str,
    default_bounds: (f64, f64),
    n: usize,
) -> Array2<f64> {
    let (lower, upper) = get_function_bounds(function_name).unwrap_or(default_bounds);
    create_bounds(n, lower, upper)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array1;

    #[test]
    fn test_all_function_minima() {
        let metadata = get_function_metadata();
        let tolerance = 1e-6;
        let loose_tolerance = 1e-3;

        for function in BaseFunction::all() {
            let meta = &metadata[function.name()];
            for (location, expected) in &meta.global_minima {
                let x = Array1::from_vec(location.clone());
                let actual = function.evaluate(&x);
                let error = (actual - expected).abs();
                // optima of michalewicz and shubert are only known to a few digits
                let test_tolerance = match function {
                    BaseFunction::Michalewicz | BaseFunction::Shubert => loose_tolerance,
                    _ => tolerance,
                };
                println!(
                    "  {} at {:?}: expected {:.6}, got {:.6}, error {:.2e}",
                    function, location, expected, actual, error
                );
                assert!(
                    error <= test_tolerance,
                    "Function {} failed: at {:?}, expected {:.10}, got {:.10}",
                    function,
                    location,
                    expected,
                    actual
                );
            }
        }
    }

    #[test]
    fn test_function_metadata_completeness() {
        let metadata = get_function_metadata();
        assert_eq!(metadata.len(), BaseFunction::all().len());

        for (name, meta) in metadata.iter() {
            assert_eq!(name, &meta.name);
            assert!(!meta.bounds.is_empty(), "Function {} has no bounds", name);
            assert!(!meta.global_minima.is_empty(), "Function {} has no global minima", name);
            assert!(!meta.description.is_empty(), "Function {} has no description", name);
            for (lower, upper) in &meta.bounds {
                assert!(lower < upper, "Function {} has invalid bounds", name);
            }
            let parsed: BaseFunction = name.parse().unwrap();
            assert_eq!(parsed.is_multimodal(), meta.multimodal);
        }
    }

    #[test]
    fn test_bounds_helpers() {
        assert_eq!(get_function_bounds("ackley"), Some((-32.768, 32.768)));
        assert_eq!(get_function_bounds("unknown"), None);
        assert_eq!(get_function_bounds_vec("unknown", (-1.0, 1.0), 3), vec![(-1.0, 1.0); 3]);

        let b = get_function_bounds_2d("rastrigin", (0.0, 1.0), 4);
        assert_eq!(b.dim(), (2, 4));
        assert_eq!(b[[0, 3]], -5.12);
        assert_eq!(b[[1, 0]], 5.12);
    }
}
