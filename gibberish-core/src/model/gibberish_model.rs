use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{GibberishError, Result};
use crate::io::write_atomic;
use super::transition_matrix::TransitionMatrix;

/// Magic bytes opening every model file.
pub const MODEL_MAGIC: [u8; 4] = *b"GBRM";

/// Current model file schema version.
pub const MODEL_VERSION: u16 = 1;

/// A trained gibberish classifier: bigram log-probabilities plus the score
/// threshold separating natural text from gibberish.
///
/// Built once by the trainer (or loaded from disk) and read-only afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct GibberishModel {
	matrix: TransitionMatrix,
	threshold: f64,
}

/// On-disk layout of a model, encoded with `postcard`.
///
/// The matrix is stored as nested sequences rather than fixed arrays so that
/// readers in other languages only need a varint-prefixed sequence decoder.
#[derive(Serialize, Deserialize, Debug)]
struct ModelFile {
	magic: [u8; 4],
	version: u16,
	threshold: f64,
	matrix: Vec<Vec<f64>>,
}

impl GibberishModel {
	pub(crate) fn new(matrix: TransitionMatrix, threshold: f64) -> Self {
		Self { matrix, threshold }
	}

	/// Returns the transition log-probability matrix.
	pub fn matrix(&self) -> &TransitionMatrix {
		&self.matrix
	}

	/// Returns the decision threshold. Scores at or below it are gibberish.
	pub fn threshold(&self) -> f64 {
		self.threshold
	}

	/// Encodes the model into the versioned binary schema.
	pub fn to_bytes(&self) -> std::result::Result<Vec<u8>, postcard::Error> {
		let file = ModelFile {
			magic: MODEL_MAGIC,
			version: MODEL_VERSION,
			threshold: self.threshold,
			matrix: self.matrix.to_rows(),
		};
		postcard::to_stdvec(&file)
	}

	/// Decodes and validates a model produced by [`GibberishModel::to_bytes`].
	///
	/// # Errors
	/// Returns a description of the problem if the bytes cannot be decoded,
	/// carry the wrong magic or version, or hold an invalid matrix/threshold.
	pub fn from_bytes(bytes: &[u8]) -> std::result::Result<Self, String> {
		let file: ModelFile = postcard::from_bytes(bytes).map_err(|e| format!("undecodable model: {e}"))?;

		if file.magic != MODEL_MAGIC {
			return Err("not a gibberish model file (bad magic)".to_owned());
		}
		if file.version != MODEL_VERSION {
			return Err(format!(
				"unsupported model version {} (expected {MODEL_VERSION})",
				file.version
			));
		}
		if !file.threshold.is_finite() {
			return Err(format!("threshold is not finite: {}", file.threshold));
		}

		let matrix = TransitionMatrix::from_rows(&file.matrix)?;
		Ok(Self::new(matrix, file.threshold))
	}

	/// Writes the model to `path` atomically.
	///
	/// # Errors
	/// Returns [`GibberishError::Io`] if encoding or writing fails.
	pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
		let path = path.as_ref();
		let bytes = self.to_bytes().map_err(|e| GibberishError::Io {
			path: path.to_path_buf(),
			source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
		})?;

		write_atomic(path, &bytes).map_err(|source| GibberishError::Io {
			path: path.to_path_buf(),
			source,
		})?;

		debug!(path = %path.display(), bytes = bytes.len(), "model saved");
		Ok(())
	}

	/// Reads and validates a model from `path`.
	///
	/// # Errors
	/// Returns [`GibberishError::CorruptModel`] if the file is missing,
	/// unreadable, or does not hold a valid model.
	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
		let path = path.as_ref();
		let corrupt = |reason: String| GibberishError::CorruptModel {
			path: path.to_path_buf(),
			reason,
		};

		let bytes = std::fs::read(path).map_err(|e| corrupt(format!("cannot read model file: {e}")))?;
		let model = Self::from_bytes(&bytes).map_err(corrupt)?;

		debug!(path = %path.display(), threshold = model.threshold, "model loaded");
		Ok(model)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::transition_matrix::TransitionCounts;

	fn sample_model() -> GibberishModel {
		let mut counts = TransitionCounts::new();
		counts.add_line("a small sample of ordinary words");
		GibberishModel::new(counts.to_log_probabilities(10.0).unwrap(), 0.0421)
	}

	#[test]
	fn bytes_round_trip() {
		let model = sample_model();
		let bytes = model.to_bytes().unwrap();
		assert_eq!(&bytes[..4], &MODEL_MAGIC);
		assert_eq!(GibberishModel::from_bytes(&bytes).unwrap(), model);
	}

	#[test]
	fn rejects_foreign_headers() {
		let model = sample_model();

		let mut bytes = model.to_bytes().unwrap();
		bytes[0] = b'X';
		assert!(GibberishModel::from_bytes(&bytes).unwrap_err().contains("magic"));

		let future = ModelFile {
			magic: MODEL_MAGIC,
			version: MODEL_VERSION + 1,
			threshold: model.threshold(),
			matrix: model.matrix().to_rows(),
		};
		let bytes = postcard::to_stdvec(&future).unwrap();
		assert!(GibberishModel::from_bytes(&bytes).unwrap_err().contains("version"));
	}

	#[test]
	fn rejects_truncated_or_malformed_content() {
		let model = sample_model();
		let bytes = model.to_bytes().unwrap();
		assert!(GibberishModel::from_bytes(&bytes[..bytes.len() / 2]).is_err());
		assert!(GibberishModel::from_bytes(&[]).is_err());

		let no_matrix = ModelFile {
			magic: MODEL_MAGIC,
			version: MODEL_VERSION,
			threshold: 0.1,
			matrix: Vec::new(),
		};
		let bytes = postcard::to_stdvec(&no_matrix).unwrap();
		assert!(GibberishModel::from_bytes(&bytes).unwrap_err().contains("rows"));

		let bad_threshold = ModelFile {
			magic: MODEL_MAGIC,
			version: MODEL_VERSION,
			threshold: f64::NAN,
			matrix: model.matrix().to_rows(),
		};
		let bytes = postcard::to_stdvec(&bad_threshold).unwrap();
		assert!(GibberishModel::from_bytes(&bytes).unwrap_err().contains("threshold"));
	}

	#[test]
	fn save_then_load() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("model.gbm");
		let model = sample_model();

		model.save(&path).unwrap();
		assert_eq!(GibberishModel::load(&path).unwrap(), model);
	}

	#[test]
	fn load_missing_file_is_corrupt_model() {
		let dir = tempfile::tempdir().unwrap();
		let err = GibberishModel::load(dir.path().join("absent.gbm")).unwrap_err();
		assert!(matches!(err, GibberishError::CorruptModel { .. }));
	}
}
