use std::path::PathBuf;

use clap::Parser;

use rs_suggest_core::ModelConfig;

#[derive(Parser, Debug)]
#[command(name = "rs-suggest-server", about = "N-gram next-word suggestion server")]
pub struct Cli {
	/// Address to bind
	#[arg(long, default_value = "127.0.0.1")]
	pub host: String,

	/// Port to listen on
	#[arg(long, default_value = "8000")]
	pub port: u16,

	/// SQLite database holding the persisted n-grams
	#[arg(long, default_value = "ngram.sqlite3")]
	pub database: PathBuf,

	/// Model order (context length + 1)
	#[arg(long, default_value = "2")]
	pub order: usize,

	/// Dataset used when a request does not name one
	#[arg(long, default_value = "fa")]
	pub default_dataset: String,

	/// Suggestions returned when a request does not ask for a count
	#[arg(long, default_value = "5")]
	pub top_k: usize,

	/// Keep trained entries in memory until a persist instead of upserting them
	/// right away. Reloads before each suggestion then reset unpersisted counts.
	#[arg(long)]
	pub no_write_through: bool,
}

impl Cli {
	pub fn model_config(&self) -> ModelConfig {
		ModelConfig {
			order: self.order,
			default_k: self.top_k,
			write_through: !self.no_write_through,
			..ModelConfig::default()
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn server_defaults_write_through() {
		let cli = Cli::parse_from(["rs-suggest-server"]);
		assert_eq!(cli.port, 8000);
		assert_eq!(cli.default_dataset, "fa");
		assert_eq!(
			cli.model_config(),
			ModelConfig { write_through: true, ..ModelConfig::default() }
		);
	}

	#[test]
	fn flags_reach_the_model_config() {
		let cli = Cli::parse_from(["rs-suggest-server", "--order", "3", "--top-k", "10", "--no-write-through"]);
		let config = cli.model_config();
		assert_eq!(config.order, 3);
		assert_eq!(config.default_k, 10);
		assert!(!config.write_through);
	}
}
