//! Channel-specific message rendering.
//!
//! Snippets carry `**…**` emphasis markers around the matched keyword;
//! each renderer converts those into its channel's markup.

use hearsay_db::PendingMentionRow;

/// Subject and plain-text body for a transactional email.
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub subject: String,
    pub body: String,
}

fn platform_label(platform: &str) -> &str {
    match platform {
        "reddit" => "Reddit",
        "hackernews" => "Hacker News",
        other => other,
    }
}

/// Converts `**…**` emphasis pairs into channel markup. Unbalanced
/// markers are stripped instead of leaving a dangling tag.
fn convert_emphasis(text: &str, open: &str, close: &str) -> String {
    if text.matches("**").count() % 2 != 0 {
        return text.replace("**", "");
    }
    let mut out = String::with_capacity(text.len());
    for (i, part) in text.split("**").enumerate() {
        if i > 0 {
            out.push_str(if i % 2 == 1 { open } else { close });
        }
        out.push_str(part);
    }
    out
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[must_use]
pub fn render_email(mention: &PendingMentionRow) -> EmailMessage {
    let platform = platform_label(&mention.platform);
    let subject = format!(
        "New {platform} mention of {}: \"{}\"",
        mention.brand_name, mention.keyword_matched
    );

    let mut body = String::new();
    if let Some(title) = &mention.title {
        body.push_str(title);
        body.push_str("\n\n");
    }
    body.push_str(&convert_emphasis(&mention.snippet, "", ""));
    body.push_str(&format!(
        "\n\nPlatform: {platform} ({})\nKeyword: {}\nSentiment: {}\nLink: {}\n",
        mention.item_type, mention.keyword_matched, mention.sentiment_label, mention.url
    ));

    EmailMessage { subject, body }
}

/// Slack mrkdwn payload text (`*bold*` emphasis).
#[must_use]
pub fn render_slack(mention: &PendingMentionRow) -> String {
    let platform = platform_label(&mention.platform);
    format!(
        "*New {platform} mention of {}*\n>{}\nKeyword: *{}* | Sentiment: {}\n<{}|View on {platform}>",
        mention.brand_name,
        convert_emphasis(&mention.snippet, "*", "*"),
        mention.keyword_matched,
        mention.sentiment_label,
        mention.url
    )
}

/// Telegram HTML message (parse mode `HTML`, text fields escaped).
#[must_use]
pub fn render_telegram(mention: &PendingMentionRow) -> String {
    let platform = platform_label(&mention.platform);
    let snippet = convert_emphasis(&escape_html(&mention.snippet), "<b>", "</b>");
    format!(
        "<b>New {platform} mention of {}</b>\n{snippet}\nKeyword: <b>{}</b> | Sentiment: {}\n<a href=\"{}\">View on {platform}</a>",
        escape_html(&mention.brand_name),
        escape_html(&mention.keyword_matched),
        mention.sentiment_label,
        mention.url
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mention() -> PendingMentionRow {
        PendingMentionRow {
            id: 1,
            brand_id: 7,
            brand_name: "Acme".to_string(),
            destination: "ops@acme.example".to_string(),
            platform: "hackernews".to_string(),
            item_type: "story".to_string(),
            keyword_matched: "Acme".to_string(),
            title: Some("Acme launches".to_string()),
            snippet: "**Acme** launches a new <product>".to_string(),
            sentiment_label: "positive".to_string(),
            url: "https://news.ycombinator.com/item?id=123".to_string(),
        }
    }

    #[test]
    fn email_includes_keyword_sentiment_and_link() {
        let msg = render_email(&mention());
        assert!(msg.subject.contains("Hacker News"));
        assert!(msg.subject.contains("Acme"));
        assert!(msg.body.contains("Sentiment: positive"));
        assert!(msg.body.contains("https://news.ycombinator.com/item?id=123"));
        assert!(!msg.body.contains("**"), "markers are stripped for plain text");
    }

    #[test]
    fn slack_converts_emphasis_to_mrkdwn() {
        let text = render_slack(&mention());
        assert!(text.contains("*Acme* launches"));
        assert!(text.contains("<https://news.ycombinator.com/item?id=123|View on Hacker News>"));
    }

    #[test]
    fn telegram_escapes_html_and_bolds_the_keyword() {
        let text = render_telegram(&mention());
        assert!(text.contains("<b>Acme</b> launches a new &lt;product&gt;"));
        assert!(text.contains("<a href=\"https://news.ycombinator.com/item?id=123\">"));
    }

    #[test]
    fn unbalanced_markers_are_stripped() {
        assert_eq!(convert_emphasis("odd ** marker", "<b>", "</b>"), "odd  marker");
        assert_eq!(convert_emphasis("**two** pairs **ok**", "*", "*"), "*two* pairs *ok*");
    }
}
