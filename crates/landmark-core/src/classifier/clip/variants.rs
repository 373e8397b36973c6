//! Known CLIP exports and where to fetch them.

/// A CLIP model exported to ONNX on the Hugging Face hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelVariant {
    /// Local directory name and `classifier.model` value
    pub name: &'static str,
    /// Human-readable label
    pub label: &'static str,
    /// Hugging Face repository
    pub repo: &'static str,
    /// Vision encoder path within the repository
    pub vision_remote: &'static str,
    /// Text encoder path within the repository
    pub text_remote: &'static str,
    /// Tokenizer path within the repository
    pub tokenizer_remote: &'static str,
    /// Square input size of the vision encoder
    pub image_size: u32,
}

impl ModelVariant {
    /// Look up a variant by its model name.
    pub fn find(name: &str) -> Option<&'static ModelVariant> {
        MODEL_VARIANTS.iter().find(|v| v.name == name)
    }

    /// Download URL for a file in this variant's repository.
    pub fn url(&self, remote_path: &str) -> String {
        format!(
            "https://huggingface.co/{}/resolve/main/{}",
            self.repo, remote_path
        )
    }
}

pub const MODEL_VARIANTS: &[ModelVariant] = &[
    ModelVariant {
        name: "clip-vit-base-patch32",
        label: "CLIP ViT-B/32",
        repo: "Xenova/clip-vit-base-patch32",
        vision_remote: "onnx/vision_model.onnx",
        text_remote: "onnx/text_model.onnx",
        tokenizer_remote: "tokenizer.json",
        image_size: 224,
    },
    ModelVariant {
        name: "clip-vit-base-patch16",
        label: "CLIP ViT-B/16",
        repo: "Xenova/clip-vit-base-patch16",
        vision_remote: "onnx/vision_model.onnx",
        text_remote: "onnx/text_model.onnx",
        tokenizer_remote: "tokenizer.json",
        image_size: 224,
    },
];
