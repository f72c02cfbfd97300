/// Simple example of using the vn-sentiment library
///
/// Fits the feature pipeline on a handful of reviews, trains naive Bayes and
/// classifies new comments.
///
/// Run with:
/// ```
/// cargo run --example simple
/// ```
use vn_sentiment::classifiers::{Model, NaiveBayes};
use vn_sentiment::text::{StopWords, VietnameseSegmenter};
use vn_sentiment::{clean, label_reviews, FeaturePipeline, Review};

fn main() -> vn_sentiment::Result<()> {
    println!("vn-sentiment - Simple Example\n");

    let corpus = [
        ("Sản phẩm tuyệt vời, giao hàng nhanh", 5),
        ("Chất lượng tốt, rất hài lòng", 5),
        ("Đóng gói cẩn thận, sẽ ủng hộ lần sau", 4),
        ("Thất vọng, hàng giả", 1),
        ("Dùng bị kích ứng, nổi mụn", 2),
        ("Giao hàng chậm, sản phẩm lỗi", 1),
        ("Bình thường, tạm được", 3),
        ("Cũng được, giá cả hợp lý", 3),
    ];
    let reviews = corpus
        .iter()
        .map(|&(text, star_rating)| Review {
            text: text.to_string(),
            star_rating,
        })
        .collect();
    let (records, _) = clean(label_reviews(reviews)?, 1);

    let stop_words: StopWords = ["rất", "sẽ", "bị", "cũng"].into_iter().collect();
    let pipeline = FeaturePipeline::new(VietnameseSegmenter::new(4)?, stop_words);
    let fitted = pipeline.fit(&records)?;
    let table = fitted.transform(&records)?;
    println!("Vocabulary: {} terms\n", fitted.dim());

    let model = NaiveBayes::default().train(&table)?;

    let examples = [
        "Giao hàng nhanh, sản phẩm tuyệt vời",
        "Hàng giả, thất vọng quá",
        "Tạm được",
    ];

    println!("{}", "=".repeat(70));
    for text in examples {
        let features = fitted.transform_text(text)?;
        let label = model.predict(&features);
        println!("\nText: \"{}\"", text);
        println!("Tokens: {:?}", fitted.tokenize(text));
        println!("Predicted: {}", fitted.labels()[label]);
    }
    println!("{}", "-".repeat(70));

    Ok(())
}
