//! Coded values
//!
//! A coded value is a numeric array or matrix packed as raw little-endian
//! `int32`, `float32` or `float64` elements and base64 encoded. Matrices are
//! flattened row-major; their row and column counts travel next to the
//! payload, never inside it.

use crate::value::Matrix;
use crate::{Error, Result};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use std::fmt;
use std::str::FromStr;

/// How an array or matrix payload is packed on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum CodedValueType {
    /// Explicit element lists
    #[default]
    None,
    Int32,
    Float32,
    Float64,
}

impl CodedValueType {
    /// Wire name, `None` has no wire representation
    #[must_use]
    pub fn name(self) -> Option<&'static str> {
        match self {
            CodedValueType::None => None,
            CodedValueType::Int32 => Some("int32"),
            CodedValueType::Float32 => Some("float32"),
            CodedValueType::Float64 => Some("float64"),
        }
    }

    #[must_use]
    pub fn is_coded(self) -> bool {
        self != CodedValueType::None
    }
}

impl fmt::Display for CodedValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name().unwrap_or("none"))
    }
}

impl FromStr for CodedValueType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "int32" => Ok(CodedValueType::Int32),
            "float32" => Ok(CodedValueType::Float32),
            "float64" => Ok(CodedValueType::Float64),
            other => Err(Error::coding(format!("unknown coding type '{other}'"))),
        }
    }
}

/// Element types that can be packed into a coded payload
pub trait Packed: Copy {
    const SIZE: usize;

    fn write_le(self, out: &mut Vec<u8>);

    /// `bytes` is exactly [`Self::SIZE`] long
    fn read_le(bytes: &[u8]) -> Self;
}

macro_rules! packed {
    ($t:ty) => {
        impl Packed for $t {
            const SIZE: usize = std::mem::size_of::<$t>();

            fn write_le(self, out: &mut Vec<u8>) {
                out.extend_from_slice(&self.to_le_bytes());
            }

            fn read_le(bytes: &[u8]) -> Self {
                let mut raw = [0u8; std::mem::size_of::<$t>()];
                raw.copy_from_slice(bytes);
                <$t>::from_le_bytes(raw)
            }
        }
    };
}

packed!(i32);
packed!(f32);
packed!(f64);

/// Pack a slice into a base64 string
#[must_use]
pub fn encode<T: Packed>(values: &[T]) -> String {
    let mut bytes = Vec::with_capacity(values.len() * T::SIZE);
    for value in values {
        value.write_le(&mut bytes);
    }
    STANDARD.encode(bytes)
}

/// Unpack a base64 string.
///
/// Trailing bytes that do not fill a whole element are ignored, so an
/// undersized payload yields a truncated or empty result.
///
/// # Errors
///
/// Returns [`Error::Coding`] when the payload is not valid base64.
pub fn decode<T: Packed>(payload: &str) -> Result<Vec<T>> {
    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| Error::coding(format!("invalid base64 payload: {e}")))?;
    Ok(bytes.chunks_exact(T::SIZE).map(T::read_le).collect())
}

/// Encode an integer array as `int32`.
///
/// # Errors
///
/// Returns [`Error::Coding`] for any coding other than `int32` or an element outside the `int32` range.
pub fn encode_integers(values: &[i64], coding: CodedValueType) -> Result<String> {
    if coding != CodedValueType::Int32 {
        return Err(Error::coding(format!(
            "integer arrays cannot be coded as {coding}"
        )));
    }
    let packed = values
        .iter()
        .map(|&v| {
            i32::try_from(v).map_err(|_| Error::coding(format!("{v} does not fit into int32")))
        })
        .collect::<Result<Vec<i32>>>()?;
    Ok(encode(&packed))
}

/// Decode an `int32` payload into integers
///
/// # Errors
///
/// Returns [`Error::Coding`] for a coding other than `int32` or invalid base64.
pub fn decode_integers(payload: &str, coding: CodedValueType) -> Result<Vec<i64>> {
    match coding {
        CodedValueType::Int32 => Ok(decode::<i32>(payload)?
            .into_iter()
            .map(i64::from)
            .collect()),
        other => Err(Error::coding(format!(
            "integer arrays cannot be decoded from {other}"
        ))),
    }
}

/// Encode a float array as `float32` or `float64`
///
/// # Errors
///
/// Returns [`Error::Coding`] for a coding other than `float32` / `float64`.
pub fn encode_floats(values: &[f64], coding: CodedValueType) -> Result<String> {
    match coding {
        #[allow(clippy::cast_possible_truncation)]
        CodedValueType::Float32 => Ok(encode(
            &values.iter().map(|&v| v as f32).collect::<Vec<f32>>(),
        )),
        CodedValueType::Float64 => Ok(encode(values)),
        other => Err(Error::coding(format!(
            "floating point arrays cannot be coded as {other}"
        ))),
    }
}

/// Decode a `float32` or `float64` payload into floats
///
/// # Errors
///
/// Returns [`Error::Coding`] for a coding other than `float32` / `float64` or invalid base64.
pub fn decode_floats(payload: &str, coding: CodedValueType) -> Result<Vec<f64>> {
    match coding {
        CodedValueType::Float32 => Ok(decode::<f32>(payload)?
            .into_iter()
            .map(f64::from)
            .collect()),
        CodedValueType::Float64 => decode::<f64>(payload),
        other => Err(Error::coding(format!(
            "floating point arrays cannot be decoded from {other}"
        ))),
    }
}

/// Encode a float matrix row-major
///
/// # Errors
///
/// Returns [`Error::Coding`] for a coding other than `float32` / `float64`.
pub fn encode_matrix(matrix: &Matrix<f64>, coding: CodedValueType) -> Result<String> {
    let flat: Vec<f64> = matrix.iter().copied().collect();
    encode_floats(&flat, coding)
}

/// Decode a row-major float matrix.
///
/// # Errors
///
/// Returns [`Error::Coding`] for a bad coding, invalid base64, or a payload
/// whose element count is not `rows * columns`.
pub fn decode_matrix(
    payload: &str,
    coding: CodedValueType,
    rows: usize,
    columns: usize,
) -> Result<Matrix<f64>> {
    let flat = decode_floats(payload, coding)?;
    let count = flat.len();
    Matrix::from_flat(flat, rows, columns).ok_or_else(|| {
        Error::coding(format!(
            "matrix payload has {count} elements, expected {rows}x{columns}"
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int32_round_trip() {
        let values = vec![1_i64, -2, 0, i64::from(i32::MAX), i64::from(i32::MIN)];
        let payload = encode_integers(&values, CodedValueType::Int32).unwrap();
        assert_eq!(decode_integers(&payload, CodedValueType::Int32).unwrap(), values);
    }

    #[test]
    fn test_float64_round_trip_is_exact() {
        let values = vec![1.0, 2.0, 3.0, 0.1, -1.0e-300, f64::MAX];
        let payload = encode_floats(&values, CodedValueType::Float64).unwrap();
        assert_eq!(decode_floats(&payload, CodedValueType::Float64).unwrap(), values);
    }

    #[test]
    fn test_float32_round_trip_is_approximate() {
        let values = vec![1.0, 2.5, 0.1, 1234.5678];
        let payload = encode_floats(&values, CodedValueType::Float32).unwrap();
        let decoded = decode_floats(&payload, CodedValueType::Float32).unwrap();
        assert_eq!(decoded.len(), values.len());
        for (a, b) in decoded.iter().zip(&values) {
            assert!((a - b).abs() <= b.abs() * 1.0e-6, "{a} != {b}");
        }
    }

    #[test]
    fn test_little_endian_layout() {
        // 1i32 == 01 00 00 00
        assert_eq!(encode(&[1_i32]), "AQAAAA==");
        // 1.0f64 == 00 00 00 00 00 00 f0 3f
        assert_eq!(encode(&[1.0_f64]), "AAAAAAAA8D8=");
        assert_eq!(decode::<f64>("AAAAAAAA8D8=").unwrap(), vec![1.0]);
    }

    #[test]
    fn test_undersized_payload_truncates() {
        // three bytes cannot hold an int32
        assert!(decode::<i32>("AQID").unwrap().is_empty());
        // five bytes hold one int32 plus a dangling byte
        assert_eq!(decode::<i32>("AQAAAAI=").unwrap(), vec![1]);
    }

    #[test]
    fn test_invalid_base64() {
        assert!(matches!(decode::<i32>("not*base64"), Err(Error::Coding(_))));
    }

    #[test]
    fn test_whitespace_in_payload_is_ignored() {
        assert_eq!(decode::<i32>(" AQAA\n  AA== ").unwrap(), vec![1]);
    }

    #[test]
    fn test_unknown_coding_name() {
        assert!("int32".parse::<CodedValueType>().is_ok());
        assert!(matches!("int64".parse::<CodedValueType>(), Err(Error::Coding(_))));
        assert!(matches!("none".parse::<CodedValueType>(), Err(Error::Coding(_))));
    }

    #[test]
    fn test_coding_mismatch() {
        assert!(encode_integers(&[1], CodedValueType::Float64).is_err());
        assert!(encode_floats(&[1.0], CodedValueType::Int32).is_err());
        assert!(encode_integers(&[i64::MAX], CodedValueType::Int32).is_err());
    }

    #[test]
    fn test_matrix_round_trip() {
        let matrix = Matrix::new(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
        let payload = encode_matrix(&matrix, CodedValueType::Float64).unwrap();
        let decoded = decode_matrix(&payload, CodedValueType::Float64, 2, 3).unwrap();
        assert_eq!(decoded, matrix);
    }

    #[test]
    fn test_matrix_dimension_mismatch() {
        let payload = encode_floats(&[1.0, 2.0, 3.0], CodedValueType::Float64).unwrap();
        assert!(decode_matrix(&payload, CodedValueType::Float64, 2, 2).is_err());
    }
}
