//! Plain-text persistence of matrices and vectors
//!
//! One row per line, values written as `%.18e` (18 fractional digits, signed
//! exponent with at least two digits) separated by a single space. Vectors
//! are written one value per line. The format is what `numpy.savetxt` emits
//! by default, so files can be exchanged with Python tooling.

use std::fs::{self, File};
use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};
use ndarray::{Array1, Array2};

use crate::error::{BenchmarkError, Result};

/// Format a value in `%.18e` style
pub fn format_scientific(v: f64) -> String {
    if v.is_nan() {
        return "nan".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "inf".to_string() } else { "-inf".to_string() };
    }
    let s = format!("{:.18e}", v);
    match s.split_once('e') {
        Some((mantissa, exp)) => {
            let exp: i32 = exp.parse().unwrap_or(0);
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{}e{}{:02}", mantissa, sign, exp.abs())
        }
        None => s,
    }
}

/// Write a matrix, one row per line
pub fn save_matrix(path: &Path, m: &Array2<f64>) -> Result<()> {
    write_rows(path, m.rows().into_iter().map(|row| row.iter().map(|&v| format_scientific(v)).collect()))
}

/// Write a vector, one value per line
pub fn save_vector(path: &Path, v: &Array1<f64>) -> Result<()> {
    write_rows(path, v.iter().map(|&x| vec![format_scientific(x)]))
}

fn write_rows(path: &Path, rows: impl Iterator<Item = Vec<String>>) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| BenchmarkError::io(parent, e))?;
    }
    let file = File::create(path).map_err(|e| BenchmarkError::io(path, e))?;
    let mut writer = WriterBuilder::new().delimiter(b' ').has_headers(false).from_writer(file);
    for row in rows {
        writer.write_record(&row).map_err(|e| csv_err(path, e))?;
    }
    writer.flush().map_err(|e| BenchmarkError::io(path, e))
}

/// Read a matrix; a file holding a single value yields a 1x1 matrix
pub fn load_matrix(path: &Path) -> Result<Array2<f64>> {
    let file = File::open(path).map_err(|e| BenchmarkError::io(path, e))?;
    parse_matrix(file, path)
}

/// Read a vector, accepting either one value per line or a single row
pub fn load_vector(path: &Path) -> Result<Array1<f64>> {
    let m = load_matrix(path)?;
    let (rows, cols) = m.dim();
    if rows != 1 && cols != 1 {
        return Err(BenchmarkError::Parse {
            path: path.to_path_buf(),
            line: 1,
            message: format!("expected a vector, found a {}x{} matrix", rows, cols),
        });
    }
    Ok(Array1::from_iter(m.into_iter()))
}

fn csv_err(path: &Path, e: csv::Error) -> BenchmarkError {
    BenchmarkError::Parse {
        path: path.to_path_buf(),
        line: e.position().map_or(1, |p| p.line() as usize),
        message: e.to_string(),
    }
}

/// Parse single-space separated rows; blank lines and `#` comments are skipped
pub(crate) fn parse_matrix<R: std::io::Read>(source: R, path: &Path) -> Result<Array2<f64>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b' ')
        .has_headers(false)
        .flexible(false)
        .comment(Some(b'#'))
        .from_reader(source);

    let mut values = Vec::new();
    let mut ncols = 0usize;
    let mut nrows = 0usize;
    for result in reader.records() {
        let record = result.map_err(|e| csv_err(path, e))?;
        let line = record.position().map_or(nrows + 1, |p| p.line() as usize);
        for token in record.iter() {
            let v: f64 = token.trim().parse().map_err(|_| BenchmarkError::Parse {
                path: path.to_path_buf(),
                line,
                message: format!("invalid number '{}'", token),
            })?;
            values.push(v);
        }
        ncols = record.len();
        nrows += 1;
    }

    if nrows == 0 {
        return Err(BenchmarkError::Parse {
            path: path.to_path_buf(),
            line: 1,
            message: "file holds no data".to_string(),
        });
    }
    Array2::from_shape_vec((nrows, ncols), values).map_err(|e| BenchmarkError::Parse {
        path: path.to_path_buf(),
        line: 1,
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_format_matches_numpy() {
        assert_eq!(format_scientific(1.0), "1.000000000000000000e+00");
        assert_eq!(format_scientific(-0.25), "-2.500000000000000000e-01");
        assert_eq!(format_scientific(12345.0), "1.234500000000000000e+04");
        assert_eq!(format_scientific(1e-123), "1.000000000000000000e-123");
        assert_eq!(format_scientific(0.0), "0.000000000000000000e+00");
    }

    #[test]
    fn test_parse_single_value_is_1x1() {
        let m = parse_matrix("4.2e+00\n".as_bytes(), &PathBuf::from("x.txt")).unwrap();
        assert_eq!(m.dim(), (1, 1));
        assert_eq!(m[[0, 0]], 4.2);
    }

    #[test]
    fn test_parse_ragged_rows_fail() {
        let err = parse_matrix("1 2\n3\n".as_bytes(), &PathBuf::from("x.txt")).unwrap_err();
        assert!(matches!(err, BenchmarkError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_parse_garbage_fails() {
        let err = parse_matrix("1 abc\n".as_bytes(), &PathBuf::from("x.txt")).unwrap_err();
        assert!(err.to_string().contains("abc"));
        assert!(parse_matrix("\n\n".as_bytes(), &PathBuf::from("x.txt")).is_err());
    }

    #[test]
    fn test_comments_and_blank_lines_skipped() {
        let m = parse_matrix("# rotation\n1 2\n\n3 4\n".as_bytes(), &PathBuf::from("x.txt")).unwrap();
        assert_eq!(m, Array2::from_shape_vec((2, 2), vec![1.0, 2.0, 3.0, 4.0]).unwrap());
    }

    #[test]
    fn test_written_lines_are_single_space_separated() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("m.txt");
        let m = Array2::from_shape_vec((1, 2), vec![1.0, -0.5]).unwrap();
        save_matrix(&path, &m).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "1.000000000000000000e+00 -5.000000000000000000e-01\n");
    }

    #[test]
    fn test_save_load_matrix_exact() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("m.txt");
        let m = Array2::from_shape_vec((2, 3), vec![0.1, -2.0, 1.0 / 3.0, 1e-300, 7.5e12, -0.0])
            .unwrap();
        save_matrix(&path, &m).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert_eq!(load_matrix(&path).unwrap(), m);
    }

    #[test]
    fn test_vector_layouts() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("v.txt");
        let v = Array1::from_vec(vec![1.5, -3.0, 2.25]);
        save_vector(&path, &v).unwrap();
        assert_eq!(load_vector(&path).unwrap(), v);

        std::fs::write(&path, "1 2 3\n").unwrap();
        assert_eq!(load_vector(&path).unwrap(), Array1::from_vec(vec![1.0, 2.0, 3.0]));

        std::fs::write(&path, "1 2\n3 4\n").unwrap();
        assert!(load_vector(&path).is_err());
    }
}
