//! CLIP text encoder for embedding candidate label prompts.
//!
//! Loads the CLIP text ONNX model and its tokenizer, and encodes prompts to
//! vectors aligned with the vision encoder's space.

use std::path::Path;
use std::sync::Mutex;

use ort::session::Session;
use ort::value::Value;

use crate::error::{ClassifyError, LandmarkError};

/// Output holding the projected text embedding.
const TEXT_EMBEDS_OUTPUT: &str = "text_embeds";

/// CLIP end-of-text token, also used for padding.
const END_OF_TEXT: &str = "<|endoftext|>";
const DEFAULT_PAD_ID: u32 = 49407;

/// CLIP text encoder wrapper.
///
/// Uses the same `Mutex<Session>` pattern as the vision encoder.
pub struct ClipTextEncoder {
    session: Mutex<Session>,
    tokenizer: tokenizers::Tokenizer,
    max_length: usize,
    pad_id: u32,
    /// Some exports take `attention_mask` alongside `input_ids`.
    uses_attention_mask: bool,
}

impl ClipTextEncoder {
    /// Load the text encoder and tokenizer from explicit paths.
    pub fn load(
        model_path: &Path,
        tokenizer_path: &Path,
        max_length: usize,
    ) -> Result<Self, LandmarkError> {
        let session = Session::builder()
            .map_err(|e| LandmarkError::Model {
                message: format!("Failed to create ONNX session builder: {e}"),
            })?
            .commit_from_file(model_path)
            .map_err(|e| LandmarkError::Model {
                message: format!("Failed to load text model {model_path:?}: {e}"),
            })?;

        let mut tokenizer =
            tokenizers::Tokenizer::from_file(tokenizer_path).map_err(|e| LandmarkError::Model {
                message: format!("Failed to load tokenizer {tokenizer_path:?}: {e}"),
            })?;

        let pad_id = tokenizer
            .get_padding()
            .map(|p| p.pad_id)
            .or_else(|| tokenizer.token_to_id(END_OF_TEXT))
            .unwrap_or(DEFAULT_PAD_ID);
        // Length checks and padding happen in `tokenize`; a tokenizer that
        // truncates on its own would cut the end-of-text token silently.
        tokenizer
            .with_truncation(None)
            .map_err(|e| LandmarkError::Model {
                message: format!("Failed to configure tokenizer: {e}"),
            })?;
        tokenizer.with_padding(None);

        let uses_attention_mask = session
            .inputs()
            .iter()
            .any(|i| i.name() == "attention_mask");

        tracing::debug!(
            "Loaded CLIP text encoder (inputs: {:?}, outputs: {:?}, pad_id: {})",
            session
                .inputs()
                .iter()
                .map(|i| i.name())
                .collect::<Vec<_>>(),
            session
                .outputs()
                .iter()
                .map(|o| o.name())
                .collect::<Vec<_>>(),
            pad_id
        );

        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
            max_length,
            pad_id,
            uses_attention_mask,
        })
    }

    /// Encode a batch of prompts to normalized embeddings.
    ///
    /// Prompts are padded to the longest one in the batch. A prompt longer
    /// than `max_length` tokens is an error.
    pub fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ClassifyError> {
        let batch_size = texts.len();
        if batch_size == 0 {
            return Ok(vec![]);
        }

        let batch = tokenize(&self.tokenizer, texts, self.max_length, self.pad_id)?;
        let shape = vec![batch_size as i64, batch.seq_len as i64];
        let input_ids_value = Value::from_array((shape.clone(), batch.input_ids))
            .map_err(|e| ClassifyError::Inference(format!("Failed to create input tensor: {e}")))?;
        let attention_mask = batch.attention_mask;

        let mut session = self
            .session
            .lock()
            .map_err(|e| ClassifyError::Inference(format!("Text encoder lock poisoned: {e}")))?;

        let outputs = if self.uses_attention_mask {
            let mask_value = Value::from_array((shape, attention_mask)).map_err(|e| {
                ClassifyError::Inference(format!("Failed to create attention mask: {e}"))
            })?;
            session.run(ort::inputs![
                "input_ids" => input_ids_value,
                "attention_mask" => mask_value
            ])
        } else {
            session.run(ort::inputs!["input_ids" => input_ids_value])
        }
        .map_err(|e| ClassifyError::Inference(format!("Text encoder inference failed: {e}")))?;

        let text_embeds = outputs
            .iter()
            .find(|(name, _)| *name == TEXT_EMBEDS_OUTPUT)
            .ok_or_else(|| {
                ClassifyError::Inference(format!(
                    "Text encoder did not produce {TEXT_EMBEDS_OUTPUT}"
                ))
            })?;

        let (out_shape, data) = text_embeds.1.try_extract_tensor::<f32>().map_err(|e| {
            ClassifyError::Inference(format!("Failed to extract {TEXT_EMBEDS_OUTPUT}: {e}"))
        })?;

        let embedding_dim = match out_shape.len() {
            2 => out_shape[1] as usize,
            _ => data.len() / batch_size,
        };
        if embedding_dim == 0 {
            return Err(ClassifyError::Inference(format!(
                "Unexpected {TEXT_EMBEDS_OUTPUT} shape: {:?}",
                out_shape
            )));
        }

        Ok(data
            .chunks(embedding_dim)
            .take(batch_size)
            .map(crate::math::l2_normalize)
            .collect())
    }
}

/// Padded `[batch, seq_len]` token tensors, row-major.
#[derive(Debug, PartialEq, Eq)]
struct TokenBatch {
    input_ids: Vec<i64>,
    attention_mask: Vec<i64>,
    seq_len: usize,
}

/// Tokenize prompts and right-pad them to the longest one.
///
/// CLIP pools the text embedding at the end-of-text token, so a prompt that
/// doesn't fit in `max_length` is rejected rather than truncated.
fn tokenize(
    tokenizer: &tokenizers::Tokenizer,
    texts: &[String],
    max_length: usize,
    pad_id: u32,
) -> Result<TokenBatch, ClassifyError> {
    let encodings = tokenizer
        .encode_batch(texts.to_vec(), true)
        .map_err(|e| ClassifyError::Inference(format!("Tokenization failed: {e}")))?;

    for (text, encoding) in texts.iter().zip(&encodings) {
        let len = encoding.get_ids().len();
        if len > max_length {
            return Err(ClassifyError::Inference(format!(
                "Label {text:?} is {len} tokens long; the text encoder accepts at most {max_length}"
            )));
        }
    }

    let seq_len = encodings
        .iter()
        .map(|e| e.get_ids().len())
        .max()
        .unwrap_or(0)
        .max(1);

    let mut input_ids = vec![pad_id as i64; texts.len() * seq_len];
    let mut attention_mask = vec![0i64; texts.len() * seq_len];

    for (i, encoding) in encodings.iter().enumerate() {
        let row = i * seq_len;
        for (j, (&id, &mask)) in encoding
            .get_ids()
            .iter()
            .zip(encoding.get_attention_mask())
            .enumerate()
        {
            input_ids[row + j] = id as i64;
            attention_mask[row + j] = mask as i64;
        }
    }

    Ok(TokenBatch {
        input_ids,
        attention_mask,
        seq_len,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    const PAD: u32 = 9;

    /// Word-level tokenizer over a handful of words, split on whitespace.
    fn word_tokenizer() -> tokenizers::Tokenizer {
        let json = r#"{
            "version": "1.0",
            "truncation": null,
            "padding": null,
            "added_tokens": [],
            "normalizer": null,
            "pre_tokenizer": {"type": "Whitespace"},
            "post_processor": null,
            "decoder": null,
            "model": {
                "type": "WordLevel",
                "vocab": {"<unk>": 0, "a": 1, "photo": 2, "of": 3, "hue": 4, "citadel": 5, "in": 6, "vietnam": 7},
                "unk_token": "<unk>"
            }
        }"#;
        tokenizers::Tokenizer::from_str(json).unwrap()
    }

    #[test]
    fn test_tokenize_pads_to_longest() {
        let texts = vec!["a photo of hue citadel".to_string(), "vietnam".to_string()];
        let batch = tokenize(&word_tokenizer(), &texts, 8, PAD).unwrap();

        assert_eq!(batch.seq_len, 5);
        assert_eq!(batch.input_ids, vec![1, 2, 3, 4, 5, 7, 9, 9, 9, 9]);
        assert_eq!(batch.attention_mask, vec![1, 1, 1, 1, 1, 1, 0, 0, 0, 0]);
    }

    #[test]
    fn test_tokenize_rejects_prompt_over_max_length() {
        let texts = vec![
            "vietnam".to_string(),
            "a photo of hue citadel in vietnam".to_string(),
        ];
        let err = tokenize(&word_tokenizer(), &texts, 4, PAD).unwrap_err();

        let message = err.to_string();
        assert!(message.contains("a photo of hue citadel in vietnam"), "{message}");
        assert!(message.contains("7 tokens"), "{message}");
    }

    #[test]
    fn test_tokenize_accepts_prompt_at_max_length() {
        let texts = vec!["a photo of hue".to_string()];
        let batch = tokenize(&word_tokenizer(), &texts, 4, PAD).unwrap();
        assert_eq!(batch.input_ids, vec![1, 2, 3, 4]);
    }
}
