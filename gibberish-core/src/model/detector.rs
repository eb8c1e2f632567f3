use std::path::Path;

use tracing::debug;

use crate::error::Result;
use super::gibberish_model::GibberishModel;
use super::scorer::average_transition_probability;

/// Result of a detection request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Verdict {
	/// `true` if the text scored at or below the model threshold.
	Gibberish(bool),
	/// Raw score, returned when the caller asked for it.
	Score(f64),
}

impl Verdict {
	/// Returns the classification, or `None` for a raw score.
	pub fn is_gibberish(&self) -> Option<bool> {
		match self {
			Verdict::Gibberish(flag) => Some(*flag),
			Verdict::Score(_) => None,
		}
	}

	/// Returns the raw score, or `None` for a classification.
	pub fn score(&self) -> Option<f64> {
		match self {
			Verdict::Score(score) => Some(*score),
			Verdict::Gibberish(_) => None,
		}
	}
}

/// Classifies text with a trained model.
///
/// A `Detector` can only be built from a model that passed validation, so
/// every call afterwards is infallible.
#[derive(Debug, Clone)]
pub struct Detector {
	model: GibberishModel,
}

impl Detector {
	/// Wraps an already trained model.
	pub fn new(model: GibberishModel) -> Self {
		Self { model }
	}

	/// Loads a model file.
	///
	/// # Errors
	/// Returns [`crate::GibberishError::CorruptModel`] if the file is missing,
	/// unreadable or invalid.
	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
		Ok(Self::new(GibberishModel::load(path)?))
	}

	/// Returns the underlying model.
	pub fn model(&self) -> &GibberishModel {
		&self.model
	}

	/// Scores `text` against the model's transition matrix.
	pub fn score(&self, text: &str) -> f64 {
		average_transition_probability(text, self.model.matrix())
	}

	/// Returns `true` if `text` scores at or below the threshold.
	pub fn is_gibberish(&self, text: &str) -> bool {
		self.score(text) <= self.model.threshold()
	}

	/// Scores `text` and returns either the raw score (`raw`) or the
	/// classification.
	pub fn detect(&self, text: &str, raw: bool) -> Verdict {
		let score = self.score(text);
		debug!(score, threshold = self.model.threshold(), "text scored");
		if raw {
			Verdict::Score(score)
		} else {
			Verdict::Gibberish(score <= self.model.threshold())
		}
	}
}

/// Loads the model at `model_path` and applies it to `text`.
///
/// Convenience for one-off checks; load a [`Detector`] once to classify many
/// strings.
///
/// # Errors
/// Returns [`crate::GibberishError::CorruptModel`] if the model cannot be loaded.
pub fn test<P: AsRef<Path>>(text: &str, model_path: P, raw: bool) -> Result<Verdict> {
	Ok(Detector::load(model_path)?.detect(text, raw))
}
