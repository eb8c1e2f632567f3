use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Which of the three training inputs a file plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorpusRole {
	/// Large general corpus used to count transitions.
	Corpus,
	/// Known natural-language example lines.
	Good,
	/// Known gibberish example lines.
	Bad,
}

impl fmt::Display for CorpusRole {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			CorpusRole::Corpus => "training corpus",
			CorpusRole::Good => "good examples",
			CorpusRole::Bad => "bad examples",
		};
		f.write_str(name)
	}
}

/// Errors raised while training, saving, loading or applying a model.
#[derive(Error, Debug)]
pub enum GibberishError {
	/// A training input does not exist, cannot be opened, or is not a regular file.
	#[error("missing {role} file {}: {source}", .path.display())]
	MissingInput {
		role: CorpusRole,
		path: PathBuf,
		#[source]
		source: io::Error,
	},

	/// A model file is missing, unreadable, or does not hold a valid model.
	#[error("corrupt model {}: {reason}", .path.display())]
	CorruptModel { path: PathBuf, reason: String },

	/// The lowest good score does not exceed the highest bad score.
	#[error(
		"insufficient discriminative power: lowest good score {min_good} <= highest bad score {max_bad}"
	)]
	InseparableTraining { min_good: f64, max_bad: f64 },

	/// The good or bad example set has no lines to calibrate on.
	#[error("{role} file contains no lines")]
	EmptyExamples { role: CorpusRole },

	/// A training parameter was rejected.
	#[error("invalid configuration: {0}")]
	InvalidConfig(String),

	/// A thread counting corpus transitions panicked.
	#[error("corpus counting worker panicked")]
	WorkerPanicked,

	/// Reading an input or writing the model failed after the file was opened.
	#[error("I/O error on {}: {source}", .path.display())]
	Io {
		path: PathBuf,
		#[source]
		source: io::Error,
	},
}

pub type Result<T> = std::result::Result<T, GibberishError>;
