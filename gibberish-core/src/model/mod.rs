//! Top-level module for the bigram gibberish detector.
//!
//! This module provides:
//! - The fixed symbol alphabet and text normalization (`alphabet`)
//! - Transition counting and log-probability matrices (`transition_matrix`)
//! - Scoring of text against a matrix (`scorer`)
//! - Corpus training and threshold calibration (`trainer`)
//! - The persisted model and its file schema (`gibberish_model`)
//! - Classification of new text (`detector`)

/// Fixed 27-symbol alphabet (`a`-`z` and space) and the normalizer that maps
/// raw text onto it.
pub mod alphabet;

/// Bigram transition counts and the smoothed log-probability matrix built
/// from them.
///
/// Counts are mergeable, which supports parallel corpus counting.
pub mod transition_matrix;

/// Average transition probability of a text under a matrix.
pub mod scorer;

/// Training parameters (smoothing prior, worker count).
pub mod training_input;

/// Corpus training, example scoring, and threshold calibration.
pub mod trainer;

/// Trained model and its versioned on-disk schema.
pub mod gibberish_model;

/// High-level classification interface over a loaded model.
pub mod detector;
