//! The `landmark serve` command.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::Args;
use landmark_core::classifier::ModelVariant;
use landmark_core::{
    create_app, serve, AppState, ClassificationService, ClipClassifier, Config, LabelPreset,
    LabelSet,
};
use tokio::net::TcpListener;

/// Arguments for the `serve` command.
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Interface to bind
    #[arg(long, env = "LANDMARK_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "LANDMARK_PORT")]
    pub port: Option<u16>,

    /// CLIP model to load (see `landmark models list`)
    #[arg(short, long, env = "LANDMARK_MODEL")]
    pub model: Option<String>,

    /// Built-in label preset to classify against
    #[arg(long, env = "LANDMARK_LABELS")]
    pub labels: Option<LabelPreset>,

    /// Maximum number of inferences running at once
    #[arg(long, env = "LANDMARK_MAX_CONCURRENT")]
    pub max_concurrent: Option<usize>,
}

impl ServeArgs {
    /// Apply command-line overrides on top of the loaded config.
    fn apply(&self, config: &mut Config) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(model) = &self.model {
            config.classifier.model = model.clone();
            if let Some(variant) = ModelVariant::find(model) {
                config.classifier.image_size = variant.image_size;
            }
        }
        if let Some(preset) = self.labels {
            config.labels.preset = preset;
        }
        if let Some(n) = self.max_concurrent {
            config.server.max_concurrent_inferences = n;
        }
    }
}

/// Execute the serve command.
pub async fn execute(args: ServeArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let mut config = super::load_config(config_path)?;
    args.apply(&mut config);
    config.validate()?;

    let service = build_service(&config).await?;

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    serve(listener, create_app(AppState::new(service))).await?;
    tracing::info!("Server stopped");
    Ok(())
}

/// Load the classifier and wrap it in a service.
///
/// Model loading blocks for several seconds, so it runs on the blocking pool.
pub async fn build_service(config: &Config) -> anyhow::Result<ClassificationService> {
    let labels = LabelSet::from_config(&config.labels)?;
    let model_dir = config.model_dir();

    if !ClipClassifier::model_exists(&config.classifier, &model_dir) {
        let paths = ClipClassifier::model_paths(&config.classifier, &model_dir);
        anyhow::bail!(
            "Model {:?} is not installed (missing {:?}).\n\n  \
             Hint: Run `landmark models download --model {}` first.",
            config.classifier.model,
            paths.missing(),
            config.classifier.model
        );
    }

    tracing::info!(
        "Loading classifier {} with {} labels (preset: {})",
        config.classifier.model,
        labels.len(),
        config.labels.preset
    );
    let start = Instant::now();

    let classifier_config = config.classifier.clone();
    let candidates = labels.candidates().clone();
    let classifier = tokio::task::spawn_blocking(move || {
        ClipClassifier::load(&classifier_config, &model_dir, &candidates)
    })
    .await
    .context("Model loading task panicked")??;

    tracing::info!("Classifier ready in {:.1}s", start.elapsed().as_secs_f64());

    Ok(ClassificationService::new(
        Arc::new(classifier),
        labels,
        config,
    ))
}
