use super::alphabet::{self, ALPHABET_SIZE};

/// Raw bigram observation counts gathered from a corpus.
///
/// Conceptually the edges of a Markov chain over the alphabet, weighted by
/// how many times each transition was seen.
///
/// ## Responsibilities:
/// - Accumulate transition occurrences during learning
/// - Merge with counts gathered elsewhere (parallel learning)
/// - Turn into a smoothed log-probability [`TransitionMatrix`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransitionCounts {
	counts: [[u64; ALPHABET_SIZE]; ALPHABET_SIZE],
}

impl Default for TransitionCounts {
	fn default() -> Self {
		Self { counts: [[0; ALPHABET_SIZE]; ALPHABET_SIZE] }
	}
}

impl TransitionCounts {
	/// Creates an empty set of counts.
	pub fn new() -> Self {
		Self::default()
	}

	/// Records every consecutive symbol pair of the normalized `line`.
	pub fn add_line(&mut self, line: &str) {
		for (from, to) in alphabet::transitions(line) {
			self.counts[from][to] += 1;
		}
	}

	/// Number of times `from -> to` was observed.
	pub fn get(&self, from: usize, to: usize) -> u64 {
		self.counts[from][to]
	}

	/// Total number of observed transitions.
	pub fn total(&self) -> u64 {
		self.counts.iter().flatten().sum()
	}

	/// Adds the counts of `other` into this one.
	///
	/// Counts are integers, so the merge order never changes the result.
	pub fn merge(&mut self, other: &Self) {
		for (row, other_row) in self.counts.iter_mut().zip(other.counts.iter()) {
			for (cell, other_cell) in row.iter_mut().zip(other_row.iter()) {
				*cell += *other_cell;
			}
		}
	}

	/// Smooths the counts with `prior` pseudo-observations per cell, then
	/// log-normalizes each row.
	///
	/// Every cell becomes `ln((count + prior) / row_sum)`, so each row is a
	/// probability distribution in log space and no transition is ever
	/// impossible.
	///
	/// # Errors
	/// Returns a description of the problem if the result is not a valid
	/// matrix, e.g. a prior so small that `prior / row_sum` underflows to 0.
	pub fn to_log_probabilities(&self, prior: f64) -> Result<TransitionMatrix, String> {
		let mut cells = [[0.0; ALPHABET_SIZE]; ALPHABET_SIZE];

		for (row, counts) in cells.iter_mut().zip(self.counts.iter()) {
			for (cell, count) in row.iter_mut().zip(counts.iter()) {
				*cell = prior + *count as f64;
			}
			let total: f64 = row.iter().sum();
			for cell in row.iter_mut() {
				*cell = (*cell / total).ln();
			}
		}

		let matrix = TransitionMatrix { cells };
		matrix.validate()?;
		Ok(matrix)
	}
}

/// Square table of bigram log-probabilities, indexed `[from][to]`.
///
/// # Invariants
/// - For a matrix built by [`TransitionCounts::to_log_probabilities`] or
///   accepted by [`TransitionMatrix::from_rows`], every row satisfies
///   `sum(exp(row)) ≈ 1`.
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionMatrix {
	cells: [[f64; ALPHABET_SIZE]; ALPHABET_SIZE],
}

impl TransitionMatrix {
	/// Tolerance accepted on row sums when a matrix is built or loaded.
	pub const ROW_SUM_TOLERANCE: f64 = 1e-6;

	/// Log-probability of moving from symbol index `from` to `to`.
	///
	/// Panics if an index is outside `0..ALPHABET_SIZE`.
	pub fn get(&self, from: usize, to: usize) -> f64 {
		self.cells[from][to]
	}

	/// Rows of the matrix, in alphabet order.
	pub fn rows(&self) -> impl Iterator<Item = &[f64; ALPHABET_SIZE]> {
		self.cells.iter()
	}

	/// `sum_j exp(matrix[row][j])`, which is 1 for a normalized row.
	pub fn row_probability_sum(&self, row: usize) -> f64 {
		self.cells[row].iter().map(|v| v.exp()).sum()
	}

	/// Rebuilds a matrix from nested rows, validating its structure.
	///
	/// # Errors
	/// Returns a description of the problem if the shape is not
	/// `ALPHABET_SIZE x ALPHABET_SIZE`, a value is not a finite log-probability,
	/// or a row does not sum to 1 in probability space.
	pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, String> {
		if rows.len() != ALPHABET_SIZE {
			return Err(format!("expected {ALPHABET_SIZE} rows, got {}", rows.len()));
		}

		let mut cells = [[0.0; ALPHABET_SIZE]; ALPHABET_SIZE];
		for (i, (row, source)) in cells.iter_mut().zip(rows.iter()).enumerate() {
			if source.len() != ALPHABET_SIZE {
				return Err(format!("row {i} has {} columns, expected {ALPHABET_SIZE}", source.len()));
			}
			row.copy_from_slice(source);
		}

		let matrix = Self { cells };
		matrix.validate()?;
		Ok(matrix)
	}

	/// Checks that every cell is a finite log-probability and every row sums
	/// to 1 in probability space.
	fn validate(&self) -> Result<(), String> {
		for (i, row) in self.cells.iter().enumerate() {
			for (j, value) in row.iter().enumerate() {
				if !value.is_finite() || *value > 0.0 {
					return Err(format!("cell [{i}][{j}] is not a log-probability: {value}"));
				}
			}
			let sum = self.row_probability_sum(i);
			if (sum - 1.0).abs() > Self::ROW_SUM_TOLERANCE {
				return Err(format!("row {i} sums to {sum} in probability space"));
			}
		}
		Ok(())
	}

	/// Copies the matrix into nested rows, the shape stored in model files.
	pub fn to_rows(&self) -> Vec<Vec<f64>> {
		self.cells.iter().map(|row| row.to_vec()).collect()
	}
}
