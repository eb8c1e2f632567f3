use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "gibberish", version, about = "Character-bigram gibberish detector")]
pub struct Args {
	#[command(subcommand)]
	pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
	/// Train a model from a corpus and labeled example lines
	Train {
		/// Large general text corpus, one line per sentence
		corpus: PathBuf,
		/// Lines that must be classified as natural text
		good: PathBuf,
		/// Lines that must be classified as gibberish
		bad: PathBuf,
		/// Where to write the trained model
		output: PathBuf,
		/// Pseudo-count added to every transition before normalization
		#[arg(long, default_value_t = gibberish_core::model::training_input::DEFAULT_PRIOR)]
		prior: f64,
		/// Counting threads (1 streams the corpus, 0 uses every CPU)
		#[arg(long, env = "GIBBERISH_WORKERS", default_value_t = 1)]
		workers: usize,
	},
	/// Classify text with a trained model
	Test {
		/// Model file produced by `train`
		#[arg(long, short, env = "GIBBERISH_MODEL")]
		model: PathBuf,
		/// Print the raw score instead of the classification
		#[arg(long, default_value_t = false)]
		raw: bool,
		/// Text to classify; each argument is scored separately
		#[arg(required = true)]
		text: Vec<String>,
	},
}
