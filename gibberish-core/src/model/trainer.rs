use std::path::Path;
use std::thread;

use tracing::{debug, info};

use crate::error::{CorpusRole, GibberishError, Result};
use crate::io::{self, LineReader};
use super::gibberish_model::GibberishModel;
use super::scorer::average_transition_probability;
use super::training_input::TrainingInput;
use super::transition_matrix::{TransitionCounts, TransitionMatrix};

/// Trains a model from three text files with the default [`TrainingInput`]
/// and writes it to `output`.
///
/// See [`train_with`].
pub fn train<PC, PG, PB, PO>(corpus: PC, good: PG, bad: PB, output: PO) -> Result<GibberishModel>
where
	PC: AsRef<Path>,
	PG: AsRef<Path>,
	PB: AsRef<Path>,
	PO: AsRef<Path>,
{
	train_with(&TrainingInput::default(), corpus, good, bad, output)
}

/// Trains a model from three text files and writes it to `output`.
///
/// # Parameters
/// - `corpus`: large general text, one sentence (or any line) per line.
/// - `good`: lines that must be classified as natural text.
/// - `bad`: lines that must be classified as gibberish.
/// - `output`: destination of the model file.
///
/// # Behavior
/// - Opens all three inputs before doing any work.
/// - Counts corpus transitions, streaming or split across workers.
/// - Calibrates the threshold on the good/bad lines.
/// - Writes the model only if calibration succeeded.
///
/// # Errors
/// - [`GibberishError::MissingInput`] naming the first input that is missing or not a regular file.
/// - [`GibberishError::InvalidConfig`] if the prior cannot produce a valid matrix.
/// - [`GibberishError::EmptyExamples`] if the good or bad file has no lines.
/// - [`GibberishError::InseparableTraining`] if the classes overlap; nothing is written.
/// - [`GibberishError::Io`] on read or write failures.
pub fn train_with<PC, PG, PB, PO>(
	input: &TrainingInput,
	corpus: PC,
	good: PG,
	bad: PB,
	output: PO,
) -> Result<GibberishModel>
where
	PC: AsRef<Path>,
	PG: AsRef<Path>,
	PB: AsRef<Path>,
	PO: AsRef<Path>,
{
	let corpus = corpus.as_ref();
	let good = good.as_ref();
	let bad = bad.as_ref();
	let output = output.as_ref();

	let corpus_lines = open_input(corpus, CorpusRole::Corpus)?;
	let good_lines = open_input(good, CorpusRole::Good)?;
	let bad_lines = open_input(bad, CorpusRole::Bad)?;

	let counts = count_corpus(file_lines(corpus_lines, corpus), input.effective_workers())?;
	let model = fit(
		input,
		&counts,
		|matrix| score_all(file_lines(good_lines, good), matrix),
		|matrix| score_all(file_lines(bad_lines, bad), matrix),
	)?;

	model.save(output)?;
	info!(corpus = %corpus.display(), output = %output.display(), threshold = model.threshold(), "model trained");
	Ok(model)
}

/// Trains a model from in-memory lines, without touching the filesystem.
///
/// Same pipeline as [`train_with`], including the worker count of `input`.
///
/// # Errors
/// - [`GibberishError::InvalidConfig`] if the prior cannot produce a valid matrix.
/// - [`GibberishError::EmptyExamples`] if `good` or `bad` is empty.
/// - [`GibberishError::InseparableTraining`] if the classes overlap.
pub fn train_from_lines<C, G, B>(input: &TrainingInput, corpus: C, good: G, bad: B) -> Result<GibberishModel>
where
	C: IntoIterator,
	C::Item: AsRef<str>,
	G: IntoIterator,
	G::Item: AsRef<str>,
	B: IntoIterator,
	B::Item: AsRef<str>,
{
	let counts = count_corpus(corpus.into_iter().map(Ok), input.effective_workers())?;
	fit(
		input,
		&counts,
		|matrix| score_all(good.into_iter().map(Ok), matrix),
		|matrix| score_all(bad.into_iter().map(Ok), matrix),
	)
}

/// Counts transitions of `lines` using up to `workers` threads.
///
/// # Behavior
/// - Splits the lines into chunks (workers * factor), moving them out of `lines`.
/// - Spawns a thread per chunk building partial counts.
/// - Joins every thread and merges the partial counts.
///
/// # Errors
/// Returns [`GibberishError::WorkerPanicked`] if a counting thread panicked.
///
/// # Notes
/// - Integer counts make the result identical to a sequential pass.
pub fn count_lines_parallel(lines: Vec<String>, workers: usize) -> Result<TransitionCounts> {
	let mut final_counts = TransitionCounts::new();
	if lines.is_empty() {
		return Ok(final_counts);
	}

	let factor = 8;
	let chunks = workers.max(1) * factor;
	let chunk_size = lines.len().div_ceil(chunks);

	let mut handles = Vec::with_capacity(chunks);
	let mut remaining = lines.into_iter();
	loop {
		let chunk: Vec<String> = remaining.by_ref().take(chunk_size).collect();
		if chunk.is_empty() {
			break;
		}

		handles.push(thread::spawn(move || {
			let mut partial = TransitionCounts::new();
			for line in &chunk {
				partial.add_line(line);
			}
			partial
		}));
	}

	let spawned = handles.len();
	for handle in handles {
		let partial = handle.join().map_err(|_| GibberishError::WorkerPanicked)?;
		final_counts.merge(&partial);
	}
	debug!(chunks = spawned, chunk_size, "partial counts merged");

	Ok(final_counts)
}

/// Places the decision threshold between the two example classes.
///
/// Returns the midpoint between the lowest good score and the highest bad
/// score.
///
/// # Errors
/// - [`GibberishError::EmptyExamples`] if either slice is empty.
/// - [`GibberishError::InseparableTraining`] if `min(good) <= max(bad)`.
pub fn calibrate(good_scores: &[f64], bad_scores: &[f64]) -> Result<f64> {
	let min_good = good_scores
		.iter()
		.copied()
		.reduce(f64::min)
		.ok_or(GibberishError::EmptyExamples { role: CorpusRole::Good })?;
	let max_bad = bad_scores
		.iter()
		.copied()
		.reduce(f64::max)
		.ok_or(GibberishError::EmptyExamples { role: CorpusRole::Bad })?;

	if min_good <= max_bad {
		return Err(GibberishError::InseparableTraining { min_good, max_bad });
	}

	let threshold = (min_good + max_bad) / 2.0;
	info!(good = good_scores.len(), bad = bad_scores.len(), min_good, max_bad, threshold, "threshold calibrated");
	Ok(threshold)
}

/// Smooths `counts` into a matrix, scores both example sets against it and
/// calibrates the threshold.
fn fit<G, B>(input: &TrainingInput, counts: &TransitionCounts, score_good: G, score_bad: B) -> Result<GibberishModel>
where
	G: FnOnce(&TransitionMatrix) -> Result<Vec<f64>>,
	B: FnOnce(&TransitionMatrix) -> Result<Vec<f64>>,
{
	let matrix = counts.to_log_probabilities(input.prior()).map_err(|reason| {
		GibberishError::InvalidConfig(format!("prior {} does not yield a valid model: {reason}", input.prior()))
	})?;

	let good_scores = score_good(&matrix)?;
	let bad_scores = score_bad(&matrix)?;
	let threshold = calibrate(&good_scores, &bad_scores)?;
	Ok(GibberishModel::new(matrix, threshold))
}

/// Counts corpus transitions, streaming with one worker or splitting the
/// collected lines across several.
fn count_corpus<I, S>(lines: I, workers: usize) -> Result<TransitionCounts>
where
	I: Iterator<Item = Result<S>>,
	S: AsRef<str>,
{
	let counts = if workers > 1 {
		let lines = lines
			.map(|line| line.map(|line| line.as_ref().to_owned()))
			.collect::<Result<Vec<String>>>()?;
		count_lines_parallel(lines, workers)?
	} else {
		let mut counts = TransitionCounts::new();
		for line in lines {
			counts.add_line(line?.as_ref());
		}
		counts
	};

	info!(transitions = counts.total(), workers, "corpus counted");
	Ok(counts)
}

fn score_all<I, S>(lines: I, matrix: &TransitionMatrix) -> Result<Vec<f64>>
where
	I: Iterator<Item = Result<S>>,
	S: AsRef<str>,
{
	lines
		.map(|line| line.map(|line| average_transition_probability(line.as_ref(), matrix)))
		.collect()
}

fn open_input(path: &Path, role: CorpusRole) -> Result<LineReader> {
	io::read_lines(path).map_err(|source| GibberishError::MissingInput {
		role,
		path: path.to_path_buf(),
		source,
	})
}

fn file_lines<'a>(lines: LineReader, path: &'a Path) -> impl Iterator<Item = Result<String>> + 'a {
	lines.map(move |line| line.map_err(|source| GibberishError::Io { path: path.to_path_buf(), source }))
}

#[cfg(test)]
mod tests {
	use super::*;

	const CORPUS: [&str; 6] = [
		"the quick brown fox jumps over the lazy dog",
		"this is a normal sentence about ordinary things",
		"she sells sea shells by the sea shore",
		"there were many people waiting at the station",
		"he wanted to read another book before dinner",
		"we are going to the market this morning",
	];

	#[test]
	fn calibrate_picks_midpoint() {
		let threshold = calibrate(&[0.08, 0.06, 0.07], &[0.01, 0.02]).unwrap();
		assert!((threshold - 0.04).abs() < 1e-12);
	}

	#[test]
	fn calibrate_rejects_overlap_and_ties() {
		let err = calibrate(&[0.05, 0.02], &[0.03]).unwrap_err();
		assert!(matches!(err, GibberishError::InseparableTraining { min_good, max_bad } if min_good == 0.02 && max_bad == 0.03));

		assert!(matches!(
			calibrate(&[0.03], &[0.03]),
			Err(GibberishError::InseparableTraining { .. })
		));
	}

	#[test]
	fn calibrate_requires_both_classes() {
		assert!(matches!(
			calibrate(&[], &[0.1]),
			Err(GibberishError::EmptyExamples { role: CorpusRole::Good })
		));
		assert!(matches!(
			calibrate(&[0.1], &[]),
			Err(GibberishError::EmptyExamples { role: CorpusRole::Bad })
		));
	}

	#[test]
	fn in_memory_training_separates_examples() {
		let good = ["this is a normal sentence"];
		let bad = ["qweasd qwa as"];
		let model = train_from_lines(&TrainingInput::default(), CORPUS, good, bad).unwrap();

		for line in good {
			assert!(average_transition_probability(line, model.matrix()) > model.threshold());
		}
		for line in bad {
			assert!(average_transition_probability(line, model.matrix()) <= model.threshold());
		}
	}

	#[test]
	fn parallel_counts_match_sequential() {
		let lines: Vec<String> = CORPUS.iter().cycle().take(500).map(|s| s.to_string()).collect();

		let mut sequential = TransitionCounts::new();
		for line in &lines {
			sequential.add_line(line);
		}

		assert_eq!(count_lines_parallel(lines.clone(), 4).unwrap(), sequential);
		assert_eq!(count_lines_parallel(lines, 1).unwrap(), sequential);
		assert_eq!(count_lines_parallel(Vec::new(), 4).unwrap(), TransitionCounts::new());
	}

	#[test]
	fn in_memory_training_honors_workers() {
		let corpus: Vec<&str> = CORPUS.iter().copied().cycle().take(300).collect();
		let good = ["this is a normal sentence"];
		let bad = ["qweasd qwa as"];

		let mut parallel = TrainingInput::default();
		parallel.workers = 3;
		let streamed = train_from_lines(&TrainingInput::default(), &corpus, good, bad).unwrap();
		let split = train_from_lines(&parallel, &corpus, good, bad).unwrap();
		assert_eq!(streamed, split);
	}

	#[test]
	fn underflowing_prior_is_invalid_config() {
		let mut input = TrainingInput::default();
		input.set_prior(5e-324).unwrap();

		let err = train_from_lines(&input, CORPUS, ["this is a normal sentence"], ["qweasd qwa as"]).unwrap_err();
		assert!(matches!(err, GibberishError::InvalidConfig(_)));
	}
}
