//! Directory names and environment variables shared by the workspace crates

/// Environment variable pointing to the directory holding rotation matrices
/// and shift vectors
pub const DATA_DIR_ENV: &str = "BLACKBOX_DATA_DIR";

/// Environment variable pointing to the directory receiving optimization records
pub const RECORDS_DIR_ENV: &str = "BLACKBOX_RECORDS_DIR";

/// Default benchmark input data directory, relative to the working directory
pub const DEFAULT_DATA_DIR: &str = "benchmarks_input_data";

/// Default records directory, relative to the working directory
pub const DEFAULT_RECORDS_DIR: &str = "data_generated/records";
