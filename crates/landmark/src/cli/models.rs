//! The `landmark models` command for managing CLIP models.

use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use landmark_core::classifier::clip::{
    TEXT_MODEL_FILENAME, TOKENIZER_FILENAME, VISUAL_MODEL_FILENAME,
};
use landmark_core::classifier::{ModelPaths, ModelVariant, MODEL_VARIANTS};
use landmark_core::Config;

/// Arguments for the `models` command.
#[derive(Args, Debug)]
pub struct ModelsArgs {
    #[command(subcommand)]
    pub command: ModelsCommand,
}

/// Subcommands for model management.
#[derive(Subcommand, Debug)]
pub enum ModelsCommand {
    /// Download a CLIP model (vision encoder + text encoder + tokenizer)
    Download {
        /// Model to download; defaults to `classifier.model` from the config
        #[arg(short, long)]
        model: Option<String>,
    },

    /// List known models and whether they are installed
    List,

    /// Show model directory path
    Path,
}

/// One file to fetch: where it lives remotely and where it goes locally.
#[derive(Debug, PartialEq, Eq)]
struct DownloadItem {
    what: &'static str,
    url: String,
    dest: PathBuf,
}

/// Resolve a model name against the known variants.
fn resolve_variant(name: &str) -> anyhow::Result<&'static ModelVariant> {
    ModelVariant::find(name).ok_or_else(|| {
        let known: Vec<&str> = MODEL_VARIANTS.iter().map(|v| v.name).collect();
        anyhow::anyhow!(
            "Unknown model {name:?}. Known models: {}",
            known.join(", ")
        )
    })
}

/// Every file a variant needs, in download order.
fn download_plan(variant: &ModelVariant, model_dir: &Path) -> Vec<DownloadItem> {
    let paths = ModelPaths::new(model_dir, variant.name);
    vec![
        DownloadItem {
            what: "vision encoder",
            url: variant.url(variant.vision_remote),
            dest: paths.visual,
        },
        DownloadItem {
            what: "text encoder",
            url: variant.url(variant.text_remote),
            dest: paths.text,
        },
        DownloadItem {
            what: "tokenizer",
            url: variant.url(variant.tokenizer_remote),
            dest: paths.tokenizer,
        },
    ]
}

/// Execute the models command.
pub async fn execute(args: ModelsArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = super::load_config(config_path)?;

    match args.command {
        ModelsCommand::Download { model } => {
            let name = model.unwrap_or_else(|| config.classifier.model.clone());
            let variant = resolve_variant(&name)?;
            download_variant(variant, &config).await?;
            tracing::info!("All downloads complete.");
        }

        ModelsCommand::List => list_models(&config),

        ModelsCommand::Path => {
            println!("{}", config.model_dir().display());
        }
    }

    Ok(())
}

/// Download every missing file of one variant. Existing files are kept.
async fn download_variant(variant: &ModelVariant, config: &Config) -> anyhow::Result<()> {
    let client = reqwest::Client::new();
    let model_dir = config.model_dir();

    tracing::info!("Downloading {} ({})", variant.label, variant.repo);

    for item in download_plan(variant, &model_dir) {
        if item.dest.exists() {
            tracing::info!("{} already exists at {:?}", item.what, item.dest);
            continue;
        }
        if let Some(parent) = item.dest.parent() {
            std::fs::create_dir_all(parent)?;
        }

        tracing::info!("Downloading {}...", item.what);
        tracing::debug!("  Source: {}", item.url);
        tracing::debug!("  Destination: {:?}", item.dest);

        download_file(&client, &item.url, &item.dest).await?;

        let file_size = std::fs::metadata(&item.dest)?.len();
        tracing::info!(
            "  {} complete ({:.1} MB)",
            item.what,
            file_size as f64 / (1024.0 * 1024.0)
        );
    }

    Ok(())
}

fn list_models(config: &Config) {
    let model_dir = config.model_dir();

    println!("Models:");
    println!("  Directory: {}\n", model_dir.display());

    for variant in MODEL_VARIANTS {
        let paths = ModelPaths::new(&model_dir, variant.name);
        let missing = paths.missing().len();
        let status = match missing {
            0 => "ready",
            3 => "not installed",
            _ => "incomplete",
        };
        let default_marker = if variant.name == config.classifier.model {
            "  (configured)"
        } else {
            ""
        };
        println!(
            "  - {:26} {:16} {:14}{}",
            variant.name, variant.label, status, default_marker
        );
    }

    println!(
        "\n  Files per model: {VISUAL_MODEL_FILENAME}, {TEXT_MODEL_FILENAME}, {TOKENIZER_FILENAME}"
    );
}

/// Stream a URL to disk with a progress bar.
///
/// Data goes to a `.part` file first and is renamed on success, so an
/// interrupted download never looks installed.
async fn download_file(client: &reqwest::Client, url: &str, dest: &Path) -> anyhow::Result<()> {
    use futures_util::StreamExt;
    use tokio::io::AsyncWriteExt;

    let response = client
        .get(url)
        .send()
        .await?
        .error_for_status()
        .map_err(|e| anyhow::anyhow!("Download failed: {e}"))?;

    let progress = create_progress_bar(response.content_length());
    let partial = partial_path(dest);

    let mut file = tokio::fs::File::create(&partial).await?;
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(e) => {
                progress.abandon();
                drop(file);
                let _ = tokio::fs::remove_file(&partial).await;
                return Err(e.into());
            }
        };
        file.write_all(&chunk).await?;
        progress.inc(chunk.len() as u64);
    }

    file.flush().await?;
    drop(file);
    tokio::fs::rename(&partial, dest).await?;
    progress.finish_and_clear();

    Ok(())
}

fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    dest.with_file_name(name)
}

/// Byte progress bar, or a spinner when the server sends no length.
fn create_progress_bar(total: Option<u64>) -> indicatif::ProgressBar {
    use indicatif::{ProgressBar, ProgressStyle};

    match total {
        Some(total) => {
            let pb = ProgressBar::new(total);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template(
                        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec})",
                    )
                    .unwrap()
                    .progress_chars("##-"),
            );
            pb
        }
        None => {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} [{elapsed_precise}] {bytes} ({bytes_per_sec})")
                    .unwrap(),
            );
            pb
        }
    }
}
