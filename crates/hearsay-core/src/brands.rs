use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// A keyword tracked for a brand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordConfig {
    pub name: String,
    #[serde(default = "default_keyword_kind")]
    pub kind: String,
}

fn default_keyword_kind() -> String {
    "brand".to_string()
}

/// Per-channel notification settings for one brand.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChannelConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Email address, Slack webhook URL, or Telegram chat id.
    #[serde(default)]
    pub destination: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default)]
    pub email: ChannelConfig,
    #[serde(default)]
    pub slack: ChannelConfig,
    #[serde(default)]
    pub telegram: ChannelConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandConfig {
    pub name: String,
    pub keywords: Vec<KeywordConfig>,
    #[serde(default)]
    pub notifications: NotificationsConfig,
}

impl BrandConfig {
    /// Generate a URL-safe slug from the brand name.
    #[must_use]
    pub fn slug(&self) -> String {
        self.name
            .to_lowercase()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' {
                    c
                } else if c == ' ' {
                    '-'
                } else {
                    '\0'
                }
            })
            .filter(|&c| c != '\0')
            .collect::<String>()
            .split('-')
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("-")
    }
}

#[derive(Debug, Deserialize)]
pub struct BrandsFile {
    pub brands: Vec<BrandConfig>,
}

/// Load and validate the brands configuration from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_brands(path: &Path) -> Result<BrandsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::BrandsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let brands_file: BrandsFile =
        serde_yaml::from_str(&content).map_err(ConfigError::BrandsFileParse)?;

    validate_brands(&brands_file)?;

    Ok(brands_file)
}

fn validate_brands(brands_file: &BrandsFile) -> Result<(), ConfigError> {
    let mut seen_slugs = HashSet::new();

    for brand in &brands_file.brands {
        if brand.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "brand name must be non-empty".to_string(),
            ));
        }

        let slug = brand.slug();
        if !seen_slugs.insert(slug.clone()) {
            return Err(ConfigError::Validation(format!(
                "duplicate brand slug: '{}' (from brand '{}')",
                slug, brand.name
            )));
        }

        if brand.keywords.is_empty() {
            return Err(ConfigError::Validation(format!(
                "brand '{}' has no keywords",
                brand.name
            )));
        }

        let mut seen_keywords = HashSet::new();
        for keyword in &brand.keywords {
            if keyword.name.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "brand '{}' has an empty keyword",
                    brand.name
                )));
            }
            if !seen_keywords.insert(keyword.name.to_lowercase()) {
                return Err(ConfigError::Validation(format!(
                    "brand '{}' has duplicate keyword '{}'",
                    brand.name, keyword.name
                )));
            }
        }

        let channels = [
            ("email", &brand.notifications.email),
            ("slack", &brand.notifications.slack),
            ("telegram", &brand.notifications.telegram),
        ];
        for (channel, config) in channels {
            let destination_empty = config
                .destination
                .as_deref()
                .is_none_or(|d| d.trim().is_empty());
            if config.enabled && destination_empty {
                return Err(ConfigError::Validation(format!(
                    "brand '{}' enables {channel} notifications without a destination",
                    brand.name
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brand(name: &str) -> BrandConfig {
        BrandConfig {
            name: name.to_string(),
            keywords: vec![KeywordConfig {
                name: name.to_string(),
                kind: "brand".to_string(),
            }],
            notifications: NotificationsConfig::default(),
        }
    }

    #[test]
    fn slug_simple_name() {
        assert_eq!(brand("Acme Labs").slug(), "acme-labs");
    }

    #[test]
    fn slug_special_characters() {
        assert_eq!(brand("Uncle Arnie's").slug(), "uncle-arnies");
    }

    #[test]
    fn slug_collapses_repeated_separators() {
        assert_eq!(brand("Acme  --  Labs").slug(), "acme-labs");
    }

    #[test]
    fn validate_rejects_empty_name() {
        let file = BrandsFile {
            brands: vec![brand("  ")],
        };
        assert!(matches!(
            validate_brands(&file),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn validate_rejects_duplicate_slugs() {
        let file = BrandsFile {
            brands: vec![brand("Acme Labs"), brand("acme labs")],
        };
        assert!(matches!(
            validate_brands(&file),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn validate_rejects_brand_without_keywords() {
        let mut b = brand("Acme");
        b.keywords.clear();
        let file = BrandsFile { brands: vec![b] };
        assert!(matches!(
            validate_brands(&file),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn validate_rejects_duplicate_keywords_case_insensitive() {
        let mut b = brand("Acme");
        b.keywords.push(KeywordConfig {
            name: "ACME".to_string(),
            kind: "brand".to_string(),
        });
        let file = BrandsFile { brands: vec![b] };
        assert!(matches!(
            validate_brands(&file),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn validate_rejects_enabled_channel_without_destination() {
        let mut b = brand("Acme");
        b.notifications.slack.enabled = true;
        let file = BrandsFile { brands: vec![b] };
        assert!(matches!(
            validate_brands(&file),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn validate_accepts_enabled_channel_with_destination() {
        let mut b = brand("Acme");
        b.notifications.telegram.enabled = true;
        b.notifications.telegram.destination = Some("-1001234567890".to_string());
        let file = BrandsFile { brands: vec![b] };
        assert!(validate_brands(&file).is_ok());
    }

    #[test]
    fn parses_yaml_with_defaults() {
        let yaml = r"
brands:
  - name: Acme Labs
    keywords:
      - name: Acme
      - name: acmelabs
        kind: product
    notifications:
      slack:
        enabled: true
        destination: https://hooks.slack.com/services/T000/B000/XXX
";
        let file: BrandsFile = serde_yaml::from_str(yaml).unwrap();
        assert!(validate_brands(&file).is_ok());
        let b = &file.brands[0];
        assert_eq!(b.keywords[0].kind, "brand");
        assert_eq!(b.keywords[1].kind, "product");
        assert!(b.notifications.slack.enabled);
        assert!(!b.notifications.email.enabled);
    }
}
