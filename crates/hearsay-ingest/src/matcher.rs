//! Keyword matching with word-boundary semantics.

use regex::Regex;

/// Returns the first keyword (in the supplied order) that occurs in
/// `content` as a whole word, case-insensitively.
///
/// Word-boundary matching prevents substring false positives: the
/// keyword `AI` does not match inside `again`. Keyword special
/// characters are escaped, so keywords are always treated literally.
/// Empty content or an empty keyword list yields no match.
#[must_use]
pub fn match_keyword<'a>(content: &str, keywords: &'a [String]) -> Option<&'a str> {
    if content.trim().is_empty() {
        return None;
    }

    for keyword in keywords {
        if keyword.trim().is_empty() {
            continue;
        }
        let pattern = format!(r"(?i)\b{}\b", regex::escape(keyword));
        // Escaped literals always compile; skip the keyword if not.
        let Ok(re) = Regex::new(&pattern) else {
            continue;
        };
        if re.is_match(content) {
            return Some(keyword.as_str());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keywords(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn matches_whole_word() {
        assert_eq!(match_keyword("I like AI", &keywords(&["AI"])), Some("AI"));
    }

    #[test]
    fn does_not_match_inside_other_words() {
        assert_eq!(match_keyword("I like again", &keywords(&["AI"])), None);
        assert_eq!(match_keyword("maintain the system", &keywords(&["AI"])), None);
    }

    #[test]
    fn is_case_insensitive() {
        assert_eq!(
            match_keyword("we tried ACME yesterday", &keywords(&["acme"])),
            Some("acme")
        );
    }

    #[test]
    fn returns_first_match_in_list_order() {
        let kws = keywords(&["widget", "acme"]);
        assert_eq!(
            match_keyword("acme makes a widget", &kws),
            Some("widget"),
            "list order decides, not position in the text"
        );
    }

    #[test]
    fn escapes_keyword_special_characters() {
        assert_eq!(match_keyword("version a.b here", &keywords(&["a.b"])), Some("a.b"));
        assert_eq!(
            match_keyword("version axb here", &keywords(&["a.b"])),
            None,
            "dot must not act as a regex wildcard"
        );
    }

    #[test]
    fn multi_word_keywords_match() {
        assert_eq!(
            match_keyword("the acme labs launch", &keywords(&["acme labs"])),
            Some("acme labs")
        );
    }

    #[test]
    fn empty_inputs_yield_no_match() {
        assert_eq!(match_keyword("", &keywords(&["acme"])), None);
        assert_eq!(match_keyword("   ", &keywords(&["acme"])), None);
        assert_eq!(match_keyword("some text", &[]), None);
        assert_eq!(match_keyword("some text", &keywords(&[""])), None);
    }
}
