use crate::error::{GibberishError, Result};

/// Default number of pseudo-observations added to every transition.
pub const DEFAULT_PRIOR: f64 = 10.0;

/// Parameters controlling how a model is trained.
///
/// # Responsibilities
/// - Hold the smoothing prior applied to every transition count
/// - Hold the number of workers used to count corpus transitions
///
/// # Invariants
/// - `prior` is finite and strictly positive
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingInput {
	/// Pseudo-count added to every cell before log-normalization.
	prior: f64,

	/// Number of counting threads. `1` streams the corpus line by line,
	/// `0` uses one thread per CPU.
	pub workers: usize,
}

impl Default for TrainingInput {
	fn default() -> Self {
		Self { prior: DEFAULT_PRIOR, workers: 1 }
	}
}

impl TrainingInput {
	/// Returns the smoothing prior.
	pub fn prior(&self) -> f64 {
		self.prior
	}

	/// Sets the smoothing prior.
	///
	/// # Errors
	/// Returns an error if `prior` is not finite or not strictly positive.
	pub fn set_prior(&mut self, prior: f64) -> Result<()> {
		if !prior.is_finite() || prior <= 0.0 {
			return Err(GibberishError::InvalidConfig(format!(
				"prior must be a positive finite number, got {prior}"
			)));
		}
		self.prior = prior;
		Ok(())
	}

	/// Number of threads that will actually be used for counting.
	pub fn effective_workers(&self) -> usize {
		match self.workers {
			0 => num_cpus::get().max(1),
			n => n,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults() {
		let input = TrainingInput::default();
		assert_eq!(input.prior(), DEFAULT_PRIOR);
		assert_eq!(input.effective_workers(), 1);
	}

	#[test]
	fn rejects_invalid_prior() {
		let mut input = TrainingInput::default();
		for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
			assert!(matches!(input.set_prior(bad), Err(GibberishError::InvalidConfig(_))));
		}
		assert_eq!(input.prior(), DEFAULT_PRIOR);

		input.set_prior(0.5).unwrap();
		assert_eq!(input.prior(), 0.5);
	}

	#[test]
	fn zero_workers_means_all_cpus() {
		let input = TrainingInput { workers: 0, ..TrainingInput::default() };
		assert!(input.effective_workers() >= 1);
	}
}
