//! Upload handling stages that run before inference.
//!
//! - **validate**: size and magic-byte checks on the raw upload
//! - **decode**: format sniffing, dimension limits, RGB conversion

pub mod decode;
pub mod validate;

pub use decode::{format_to_string, DecodedImage, ImageDecoder};
pub use validate::Validator;
