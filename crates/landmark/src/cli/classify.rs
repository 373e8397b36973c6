//! The `landmark classify` command: the HTTP contract, offline.

use std::path::{Path, PathBuf};

use clap::Args;
use landmark_core::LabelPreset;

/// Arguments for the `classify` command.
#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Image file to classify
    pub image: PathBuf,

    /// CLIP model to load
    #[arg(short, long, env = "LANDMARK_MODEL")]
    pub model: Option<String>,

    /// Built-in label preset to classify against
    #[arg(long, env = "LANDMARK_LABELS")]
    pub labels: Option<LabelPreset>,

    /// Print compact JSON on one line
    #[arg(long)]
    pub compact: bool,
}

/// Execute the classify command.
pub async fn execute(args: ClassifyArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    if !args.image.exists() {
        anyhow::bail!(
            "Input path does not exist: {:?}\n\n  Hint: Check the file path and try again.",
            args.image
        );
    }

    let mut config = super::load_config(config_path)?;
    if let Some(model) = &args.model {
        config.classifier.model = model.clone();
    }
    if let Some(preset) = args.labels {
        config.labels.preset = preset;
    }
    config.validate()?;

    let service = super::serve::build_service(&config).await?;
    let bytes = tokio::fs::read(&args.image).await?;

    // Same error text a client of /classify would see.
    let result = service
        .classify(bytes)
        .await
        .map_err(|e| anyhow::anyhow!("{}: {e}", args.image.display()))?;

    let json = if args.compact {
        serde_json::to_string(&result)?
    } else {
        serde_json::to_string_pretty(&result)?
    };
    println!("{json}");
    Ok(())
}
