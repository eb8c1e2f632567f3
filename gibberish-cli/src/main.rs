use anyhow::{Context, Result};
use clap::Parser;
use gibberish_core::{train_with, Detector, TrainingInput, Verdict};

mod cli;
use cli::{Args, Command};

fn main() -> Result<()> {
	tracing_subscriber::fmt()
		.with_env_filter(std::env::var("GIBBERISH_LOG").unwrap_or_else(|_| "gibberish_core=info".into()))
		.with_writer(std::io::stderr)
		.init();

	let args = Args::parse();

	match args.command {
		Command::Train { corpus, good, bad, output, prior, workers } => {
			let mut input = TrainingInput::default();
			input.workers = workers;
			input.set_prior(prior)?;

			let model = train_with(&input, &corpus, &good, &bad, &output)
				.with_context(|| format!("training failed, no model written to {}", output.display()))?;
			println!("threshold: {}", model.threshold());
		}
		Command::Test { model, raw, text } => {
			let detector = Detector::load(&model)?;
			for line in &text {
				match detector.detect(line, raw) {
					Verdict::Score(score) => println!("{score}\t{line}"),
					Verdict::Gibberish(flag) => println!("{flag}\t{line}"),
				}
			}
		}
	}

	Ok(())
}
