use super::alphabet;
use super::transition_matrix::TransitionMatrix;

/// Starting value of the log-probability accumulator.
///
/// Scores and every threshold calibrated from them depend on this value, so it
/// must stay identical between training and detection.
pub const LOG_PROB_SEED: f64 = 1.0;

/// Scores `text` against a log-probability transition matrix.
///
/// Sums the log-probability of every consecutive symbol pair of the normalized
/// text, starting from [`LOG_PROB_SEED`], divides by the number of
/// transitions (at least 1), and returns the exponential of that average.
///
/// Text with fewer than two symbols has no transitions and scores
/// `exp(LOG_PROB_SEED)`.
pub fn average_transition_probability(text: &str, matrix: &TransitionMatrix) -> f64 {
	let mut log_prob = LOG_PROB_SEED;
	let mut transition_count: usize = 0;

	for (from, to) in alphabet::transitions(text) {
		log_prob += matrix.get(from, to);
		transition_count += 1;
	}

	(log_prob / transition_count.max(1) as f64).exp()
}
