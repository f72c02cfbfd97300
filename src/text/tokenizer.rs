//! Vietnamese word segmentation.
//!
//! Vietnamese writes one syllable per whitespace-separated unit, while many
//! words span several syllables ("sản phẩm", "giao hàng"). The segmenter joins
//! the syllables of known compounds with `_`, so "giao hàng nhanh" becomes
//! `["giao_hàng", "nhanh"]`.

use crate::error::Result;
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;

/// Splits text into an ordered sequence of word tokens.
pub trait Segmenter: Send + Sync {
    fn segment(&self, text: &str) -> Vec<String>;
}

/// Common multi-syllable words in product reviews.
const BUILTIN_COMPOUNDS: &[&str] = &[
    "sản phẩm", "giao hàng", "chất lượng", "đóng gói", "hài lòng", "thất vọng",
    "tuyệt vời", "bình thường", "nhân viên", "cửa hàng", "khách hàng", "giá cả",
    "sử dụng", "hiệu quả", "mùi hương", "thơm mát", "dịu nhẹ", "kích ứng",
    "nổi mụn", "dưỡng ẩm", "làn da", "da dầu", "da khô", "da nhạy cảm",
    "nhạy cảm", "kem chống nắng", "chống nắng", "sữa rửa mặt", "nước tẩy trang",
    "tẩy trang", "mỹ phẩm", "chính hãng", "hàng giả", "hạn sử dụng", "bao bì",
    "ủng hộ", "tiếp tục", "lần sau", "nhanh chóng", "cẩn thận", "chu đáo",
    "nhiệt tình", "tư vấn", "dịch vụ", "khuyến mãi", "giảm giá", "đáng tiền",
    "hợp lý", "rẻ hơn", "tạm được", "không thích", "rất thích", "yêu thích",
    "thoải mái", "dễ chịu", "khó chịu", "mỏng nhẹ", "thấm nhanh", "bết dính",
    "hơi dính", "đặt hàng", "nhận hàng", "đổi trả", "chai lọ",
];

/// Dictionary-based greedy longest-match segmenter.
pub struct VietnameseSegmenter {
    compounds: HashSet<String>,
    max_syllables: usize,
    cleaner: Regex,
}

impl VietnameseSegmenter {
    /// Create a segmenter seeded with the built-in compound list.
    ///
    /// `max_syllables` bounds the longest compound considered (at least 1).
    pub fn new(max_syllables: usize) -> Result<Self> {
        // Keep letters, combining marks, digits, whitespace and the join character.
        let cleaner = Regex::new(r"[^\p{L}\p{M}\p{N}\s_]+")?;
        let mut segmenter = VietnameseSegmenter {
            compounds: HashSet::new(),
            max_syllables: max_syllables.max(1),
            cleaner,
        };
        for compound in BUILTIN_COMPOUNDS {
            segmenter.add_compound(compound);
        }
        Ok(segmenter)
    }

    /// Register a compound word. Syllables may be separated by spaces or `_`.
    pub fn add_compound(&mut self, compound: &str) {
        let syllables: Vec<String> = compound
            .split(|c: char| c.is_whitespace() || c == '_')
            .filter(|s| !s.is_empty())
            .map(|s| s.to_lowercase())
            .collect();
        if syllables.len() >= 2 {
            self.compounds.insert(syllables.join(" "));
        }
    }

    /// Extend the dictionary from a file with one compound per line.
    pub fn load_dictionary(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let content = std::fs::read_to_string(path)?;
        let before = self.compounds.len();
        for line in content.lines() {
            self.add_compound(line.trim());
        }
        Ok(self.compounds.len() - before)
    }

    pub fn dictionary_size(&self) -> usize {
        self.compounds.len()
    }
}

impl Segmenter for VietnameseSegmenter {
    fn segment(&self, text: &str) -> Vec<String> {
        let cleaned = self.cleaner.replace_all(text, " ");
        let syllables: Vec<&str> = cleaned
            .split(|c: char| c.is_whitespace() || c == '_')
            .filter(|s| !s.is_empty())
            .collect();

        let mut tokens = Vec::with_capacity(syllables.len());
        let mut i = 0;
        while i < syllables.len() {
            let longest = self.max_syllables.min(syllables.len() - i);
            let matched = (2..=longest)
                .rev()
                .find(|&len| self.compounds.contains(&syllables[i..i + len].join(" ")));

            match matched {
                Some(len) => {
                    tokens.push(syllables[i..i + len].join("_"));
                    i += len;
                }
                None => {
                    tokens.push(syllables[i].to_string());
                    i += 1;
                }
            }
        }
        tokens
    }
}
