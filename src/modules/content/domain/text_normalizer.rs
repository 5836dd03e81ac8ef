use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

use crate::shared::config::TfidfConfig;

/// Transformation applied to a document before tokenization
pub trait TextTransformation: Send + Sync {
    fn transform(&self, text: &str) -> String;
    fn name(&self) -> &'static str;
}

#[derive(Debug, Clone)]
pub struct LowercaseTransform;

impl TextTransformation for LowercaseTransform {
    fn transform(&self, text: &str) -> String {
        text.to_lowercase()
    }

    fn name(&self) -> &'static str {
        "Lowercase"
    }
}

/// Compatibility decomposition with combining marks removed
#[derive(Debug, Clone)]
pub struct StripAccentsTransform;

impl TextTransformation for StripAccentsTransform {
    fn transform(&self, text: &str) -> String {
        text.nfkd().filter(|c| !is_combining_mark(*c)).collect()
    }

    fn name(&self) -> &'static str {
        "StripAccents"
    }
}

/// Collapses runs of whitespace and trims
#[derive(Debug, Clone)]
pub struct NormalizeWhitespaceTransform;

impl TextTransformation for NormalizeWhitespaceTransform {
    fn transform(&self, text: &str) -> String {
        text.split_whitespace().collect::<Vec<&str>>().join(" ")
    }

    fn name(&self) -> &'static str {
        "NormalizeWhitespace"
    }
}

/// Ordered chain of text transformations
pub struct TextNormalizer {
    transformations: Vec<Box<dyn TextTransformation>>,
}

impl TextNormalizer {
    pub fn new(transformations: Vec<Box<dyn TextTransformation>>) -> Self {
        Self { transformations }
    }

    /// Pipeline matching the vectorizer configuration
    pub fn from_config(config: &TfidfConfig) -> Self {
        let mut transformations: Vec<Box<dyn TextTransformation>> = Vec::new();
        if config.strip_accents {
            transformations.push(Box::new(StripAccentsTransform));
        }
        transformations.push(Box::new(LowercaseTransform));
        transformations.push(Box::new(NormalizeWhitespaceTransform));
        Self::new(transformations)
    }

    pub fn normalize(&self, text: &str) -> String {
        self.transformations
            .iter()
            .fold(text.to_string(), |acc, t| t.transform(&acc))
    }

    pub fn transformation_names(&self) -> Vec<&'static str> {
        self.transformations.iter().map(|t| t.name()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_accents() {
        assert_eq!(StripAccentsTransform.transform("Pokémon Café"), "Pokemon Cafe");
        assert_eq!(StripAccentsTransform.transform("plain"), "plain");
    }

    #[test]
    fn test_default_pipeline() {
        let normalizer = TextNormalizer::from_config(&TfidfConfig::default());
        assert_eq!(
            normalizer.normalize("  Slice  of Life,   Comédie "),
            "slice of life, comedie"
        );
        assert_eq!(
            normalizer.transformation_names(),
            vec!["StripAccents", "Lowercase", "NormalizeWhitespace"]
        );
    }

    #[test]
    fn test_accents_kept_when_disabled() {
        let config = TfidfConfig {
            strip_accents: false,
            ..TfidfConfig::default()
        };
        let normalizer = TextNormalizer::from_config(&config);
        assert_eq!(normalizer.normalize("Comédie"), "comédie");
    }
}
