//! Character-bigram gibberish detection library.
//!
//! This crate provides a small Markov-chain classifier including:
//! - Text normalization onto a fixed 27-symbol alphabet
//! - Bigram transition counting with additive smoothing
//! - Threshold calibration from known good and bad examples
//! - A versioned binary model file
//! - Classification of new text against a trained model
//!
//! ```no_run
//! use gibberish_core::{train, Detector};
//!
//! train("big.txt", "good.txt", "bad.txt", "gib_model.gbm")?;
//! let detector = Detector::load("gib_model.gbm")?;
//! assert!(detector.is_gibberish("qweasd qwa as"));
//! # Ok::<(), gibberish_core::GibberishError>(())
//! ```

/// Core bigram model, training and detection logic.
pub mod model;

/// Error types shared by training and detection.
pub mod error;

/// I/O utilities (streaming line reader, atomic writes).
///
/// Not exposed
pub(crate) mod io;

pub use error::{CorpusRole, GibberishError, Result};
pub use model::alphabet::normalize;
pub use model::detector::{test, Detector, Verdict};
pub use model::gibberish_model::GibberishModel;
pub use model::scorer::average_transition_probability;
pub use model::trainer::{train, train_from_lines, train_with};
pub use model::training_input::TrainingInput;
