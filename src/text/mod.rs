//! Text preprocessing: word segmentation and stop-word removal.

pub mod stopwords;
pub mod tokenizer;

pub use stopwords::StopWords;
pub use tokenizer::{Segmenter, VietnameseSegmenter};
