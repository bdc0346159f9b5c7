use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use relunet::config::Config;
use relunet::dataset::{Dataset, DatasetOptions, Sample};
use relunet::trainer::{Logging, StopCondition, Trainer};

/// Train a ReLU feedforward network on labelled, delimited data.
#[derive(Parser, Debug)]
#[command(name = "train")]
struct Cli {
    /// JSON file describing the network and training run
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Delimited training data, one sample per row with the class label last
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Number of classes in the data (defaults to the output width)
    #[arg(long)]
    classes: Option<usize>,

    /// Skip the first row of the data file
    #[arg(long)]
    header: bool,

    /// Field delimiter in the data file
    #[arg(long, default_value_t = ',')]
    delimiter: char,

    /// Override the configured learning rate
    #[arg(short, long)]
    learning_rate: Option<f32>,

    /// Override the configured number of epochs
    #[arg(short, long)]
    epochs: Option<usize>,

    /// Override the configured initialization seed
    #[arg(long)]
    seed: Option<u64>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// The single sample trained on when no data file is given.
fn demo_samples(config: &Config) -> Result<Vec<Sample>> {
    let target = vec![0.5, 0.8, 0.2, 0.4];
    if config.output_width != target.len() {
        bail!(
            "the demo sample needs an output width of {}, not {}",
            target.len(),
            config.output_width
        );
    }
    Ok(vec![Sample::new(vec![0.0; config.input_width], target)])
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_level))
        .context("invalid log filter")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = match &cli.config {
        Some(path) => Config::from_path(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(rate) = cli.learning_rate {
        config.learning_rate = rate;
    }
    if let Some(epochs) = cli.epochs {
        config.epochs = epochs;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    config.validate()?;

    let samples = match &cli.data {
        Some(path) => {
            if !cli.delimiter.is_ascii() {
                bail!("delimiter {:?} is not a single ASCII character", cli.delimiter);
            }
            let options = DatasetOptions::new(cli.classes.unwrap_or(config.output_width))
                .delimiter(cli.delimiter as u8)
                .has_header(cli.header);
            let dataset = Dataset::from_path(path, &options)
                .with_context(|| format!("failed to read {}", path.display()))?;
            info!(samples = dataset.len(), path = %path.display(), "loaded dataset");
            dataset.samples().to_vec()
        }
        None => demo_samples(&config)?,
    };

    let network = config.build_network()?;
    info!(layers = ?config.layer_sizes(), rate = config.learning_rate, "training");
    let (network, summary) = Trainer::new(network)
        .learning_rate(config.learning_rate)
        .logging(Logging::Steps)
        .stop_condition(StopCondition::Iterations(config.epochs))
        .train(&samples)?;

    println!(
        "Ran {} epochs in {:.3} seconds.",
        summary.epochs,
        summary.elapsed.as_secs_f64()
    );
    println!("Final loss: {}", summary.final_loss);
    if let Some(sample) = samples.first() {
        println!("Output for first sample: {:?}", network.run(&sample.input));
    }
    Ok(())
}
