/*! Identification type

Holds a normalized BCP47 language tag and the model's confidence.
!*/
use fasttext::Prediction;
use oxilangtag::{LanguageTag, LanguageTagParseError};

#[derive(Debug, Clone, PartialEq)]
pub struct Identification {
    label: LanguageTag<String>,
    prob: f32,
}

impl Identification {
    pub fn new(label: LanguageTag<String>, prob: f32) -> Self {
        Self { label, prob }
    }

    /// Get a reference to the identification's label.
    pub fn label(&self) -> &LanguageTag<String> {
        &self.label
    }

    /// Get a reference to the identification's prob.
    pub fn prob(&self) -> &f32 {
        &self.prob
    }

    /// Primary language subtag, lowercased (`"zh"` for `zh-Hant`).
    ///
    /// This is what gets compared against configured language codes.
    pub fn language(&self) -> String {
        self.label.primary_language().to_lowercase()
    }
}

/// for fasttext predictions
impl TryFrom<Prediction> for Identification {
    type Error = LanguageTagParseError;
    fn try_from(prediction: Prediction) -> Result<Self, LanguageTagParseError> {
        // skip __label__
        let label = prediction
            .label
            .strip_prefix("__label__")
            .unwrap_or(&prediction.label);

        //convert to valid bcp47
        let label = label.replace('_', "-");

        Ok(Self::new(
            LanguageTag::parse_and_normalize(&label)?,
            prediction.prob,
        ))
    }
}

#[cfg(test)]
mod tests {
    use fasttext::Prediction;

    use super::Identification;

    #[test]
    fn test_from_pred() {
        let prob = 1.0f32;
        let label = "__label__en".to_string();
        let p = Prediction { prob, label };

        let id = Identification::try_from(p.clone()).unwrap();
        assert_eq!(&id.label().to_string(), &"en");
        assert_eq!(id.language(), "en");
        assert_eq!(id.prob(), &p.prob);
    }

    #[test]
    fn test_script_subtag() {
        let p = Prediction {
            prob: 0.9,
            label: "__label__zho_Hant".to_string(),
        };
        let id = Identification::try_from(p).unwrap();
        assert_eq!(id.language(), "zho");
    }

    // Uses language tags from fasttext's lid.176.bin
    #[test]
    fn test_bcp47() {
        let model_codes = [
            "en", "ru", "de", "fr", "it", "ja", "es", "ceb", "tr", "pt", "uk", "eo", "pl", "sv",
            "nl", "he", "zh", "hu", "ar", "ca", "fi", "cs", "fa", "sr", "el", "vi", "bg", "ko",
            "sw", "yo", "am", "ha", "zu", "xh", "so", "ig", "rw", "wuu", "yue", "als", "arz",
        ];

        for code in model_codes {
            let pred = Prediction {
                label: "__label__".to_string() + code,
                prob: 1.0f32,
            };

            let id = Identification::try_from(pred);
            assert!(id.is_ok());
            assert_eq!(id.unwrap().language(), code);
        }
    }
}
