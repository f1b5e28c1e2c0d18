//! Lexicon-based sentiment scoring.

use hearsay_core::SentimentLabel;

/// Word-polarity weights, AFINN-style.
///
/// Keys are lowercase single words; positive values signal positive
/// sentiment, negative values negative. The score of a text is the
/// plain sum over its words, with the label derived strictly from the
/// sign of that sum.
const LEXICON: &[(&str, i32)] = &[
    // Positive signals
    ("amazing", 4),
    ("awesome", 4),
    ("best", 3),
    ("brilliant", 4),
    ("excellent", 3),
    ("fantastic", 4),
    ("good", 3),
    ("great", 3),
    ("happy", 3),
    ("impressive", 3),
    ("like", 2),
    ("liked", 2),
    ("love", 3),
    ("loved", 3),
    ("nice", 3),
    ("perfect", 3),
    ("recommend", 2),
    ("recommended", 2),
    ("reliable", 2),
    ("solid", 2),
    ("smooth", 2),
    ("useful", 2),
    ("win", 4),
    ("wonderful", 4),
    ("works", 2),
    // Negative signals
    ("awful", -3),
    ("bad", -3),
    ("breaks", -2),
    ("broken", -2),
    ("bug", -2),
    ("buggy", -3),
    ("crash", -2),
    ("crashes", -2),
    ("disappointed", -2),
    ("disappointing", -2),
    ("fail", -2),
    ("failed", -2),
    ("failure", -2),
    ("fraud", -4),
    ("hate", -3),
    ("horrible", -3),
    ("issue", -1),
    ("issues", -1),
    ("poor", -2),
    ("problem", -2),
    ("problems", -2),
    ("scam", -4),
    ("slow", -1),
    ("terrible", -3),
    ("unusable", -3),
    ("useless", -2),
    ("waste", -2),
    ("worst", -3),
    ("worthless", -2),
    ("wrong", -2),
];

/// Sentiment of a piece of text: word-polarity sum plus sign label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sentiment {
    pub score: f64,
    pub label: SentimentLabel,
}

/// Score a text with the lexicon.
///
/// Splits on whitespace, strips non-alphabetic edges, lowercases, and
/// sums matching word weights. Deterministic, no I/O; empty or unknown
/// text scores `0.0`/neutral.
#[must_use]
pub fn analyze(text: &str) -> Sentiment {
    let mut score = 0i64;
    for word in text.split_whitespace() {
        let w = word
            .trim_matches(|c: char| !c.is_alphabetic())
            .to_lowercase();
        if w.is_empty() {
            continue;
        }
        for &(lex_word, weight) in LEXICON {
            if w == lex_word {
                score += i64::from(weight);
                break;
            }
        }
    }

    #[allow(clippy::cast_precision_loss)]
    let score = score as f64;
    let label = if score > 0.0 {
        SentimentLabel::Positive
    } else if score < 0.0 {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    };

    Sentiment { score, label }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_is_neutral() {
        let s = analyze("");
        assert_eq!(s.score, 0.0);
        assert_eq!(s.label, SentimentLabel::Neutral);
    }

    #[test]
    fn unknown_text_is_neutral() {
        let s = analyze("the quick brown fox jumps over the lazy dog");
        assert_eq!(s.score, 0.0);
        assert_eq!(s.label, SentimentLabel::Neutral);
    }

    #[test]
    fn positive_words_yield_positive_label() {
        let s = analyze("this tool is great and I love it");
        assert!(s.score > 0.0, "expected positive score, got {}", s.score);
        assert_eq!(s.label, SentimentLabel::Positive);
    }

    #[test]
    fn negative_words_yield_negative_label() {
        let s = analyze("terrible release, crashes constantly");
        assert!(s.score < 0.0, "expected negative score, got {}", s.score);
        assert_eq!(s.label, SentimentLabel::Negative);
    }

    #[test]
    fn mixed_text_cancels_to_neutral() {
        // good (+3) and bad (-3) cancel exactly.
        let s = analyze("good parts, bad parts");
        assert_eq!(s.score, 0.0);
        assert_eq!(s.label, SentimentLabel::Neutral);
    }

    #[test]
    fn punctuation_is_stripped_from_words() {
        let s = analyze("great!");
        assert!(s.score > 0.0, "expected 'great!' to match 'great'");
    }

    #[test]
    fn label_always_agrees_with_score_sign() {
        let samples = [
            "love it",
            "hate it",
            "nothing to report",
            "great but slow and buggy",
            "works, recommended, no issues found",
        ];
        for text in samples {
            let s = analyze(text);
            match s.label {
                SentimentLabel::Positive => assert!(s.score > 0.0, "{text}"),
                SentimentLabel::Negative => assert!(s.score < 0.0, "{text}"),
                SentimentLabel::Neutral => assert!(s.score == 0.0, "{text}"),
            }
        }
    }
}
