//! Language classification for incoming questions.
//!
//! The advisor never fails: any classifier error collapses to English so a
//! turn is never rejected because its language could not be identified.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

use crate::types::RESPONSE_FORMAT_SUFFIX;

/// Short language tag, ISO 639-1 where one exists.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LanguageTag(String);

impl LanguageTag {
    pub const ENGLISH: &'static str = "en";

    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn english() -> Self {
        Self::new(Self::ENGLISH)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_english(&self) -> bool {
        self.0 == Self::ENGLISH
    }
}

impl Display for LanguageTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LanguageTag {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifierErrorKind {
    EmptyInput,
    NoAlphabeticText,
    Undetermined,
    Unreliable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifierError {
    pub kind: ClassifierErrorKind,
    pub message: String,
}

impl ClassifierError {
    pub fn new(kind: ClassifierErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl Display for ClassifierError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for ClassifierError {}

pub trait LanguageClassifier: Send + Sync {
    fn classify(&self, text: &str) -> Result<LanguageTag, ClassifierError>;
}

/// Languages the default classifier chooses between.
///
/// Short questions score poorly against close relatives (Spanish against
/// Catalan, Dutch against Afrikaans), so the candidate set is kept to widely
/// spoken languages.
pub const DEFAULT_CANDIDATE_LANGUAGES: &[whatlang::Lang] = &[
    whatlang::Lang::Eng,
    whatlang::Lang::Spa,
    whatlang::Lang::Fra,
    whatlang::Lang::Deu,
    whatlang::Lang::Por,
    whatlang::Lang::Ita,
    whatlang::Lang::Nld,
    whatlang::Lang::Pol,
    whatlang::Lang::Ron,
    whatlang::Lang::Swe,
    whatlang::Lang::Tur,
    whatlang::Lang::Vie,
    whatlang::Lang::Ind,
    whatlang::Lang::Tgl,
    whatlang::Lang::Rus,
    whatlang::Lang::Ukr,
    whatlang::Lang::Ell,
    whatlang::Lang::Heb,
    whatlang::Lang::Ara,
    whatlang::Lang::Pes,
    whatlang::Lang::Hin,
    whatlang::Lang::Tha,
    whatlang::Lang::Cmn,
    whatlang::Lang::Jpn,
    whatlang::Lang::Kor,
];

/// Minimum confidence of a non-English guess measured against English alone.
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.7;

/// Trigram classifier backed by `whatlang`.
///
/// A non-English winner is re-scored against English only, and the guess
/// stands only if that head-to-head confidence reaches `min_confidence`.
/// Phrases registered with [`WhatlangClassifier::ignoring`] are removed before
/// scoring.
#[derive(Debug, Clone)]
pub struct WhatlangClassifier {
    candidates: Vec<whatlang::Lang>,
    min_confidence: f64,
    ignored: Vec<String>,
}

impl Default for WhatlangClassifier {
    fn default() -> Self {
        Self {
            candidates: DEFAULT_CANDIDATE_LANGUAGES.to_vec(),
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            ignored: Vec::new(),
        }
    }
}

impl WhatlangClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts detection to `candidates`. English is always kept.
    pub fn with_candidates(mut self, candidates: impl IntoIterator<Item = whatlang::Lang>) -> Self {
        let mut candidates: Vec<_> = candidates.into_iter().collect();
        if !candidates.contains(&whatlang::Lang::Eng) {
            candidates.push(whatlang::Lang::Eng);
        }
        self.candidates = candidates;
        self
    }

    pub fn with_min_confidence(mut self, min_confidence: f64) -> Self {
        self.min_confidence = min_confidence.clamp(0.0, 1.0);
        self
    }

    /// Removes `phrase` from the text before scoring.
    pub fn ignoring(mut self, phrase: impl Into<String>) -> Self {
        let phrase = phrase.into();
        if !phrase.trim().is_empty() {
            self.ignored.push(phrase);
        }
        self
    }

    fn strip_ignored(&self, text: &str) -> String {
        self.ignored
            .iter()
            .fold(text.to_string(), |text, phrase| text.replace(phrase.as_str(), " "))
    }
}

impl LanguageClassifier for WhatlangClassifier {
    fn classify(&self, text: &str) -> Result<LanguageTag, ClassifierError> {
        let text = self.strip_ignored(text);

        if text.trim().is_empty() {
            return Err(ClassifierError::new(
                ClassifierErrorKind::EmptyInput,
                "text is empty",
            ));
        }

        if !text.chars().any(char::is_alphabetic) {
            return Err(ClassifierError::new(
                ClassifierErrorKind::NoAlphabeticText,
                "text has no alphabetic characters",
            ));
        }

        let undetermined =
            || ClassifierError::new(ClassifierErrorKind::Undetermined, "no language detected");

        let best = whatlang::Detector::with_allowlist(self.candidates.clone())
            .detect(&text)
            .ok_or_else(undetermined)?;
        if best.lang() == whatlang::Lang::Eng {
            return Ok(LanguageTag::english());
        }

        let against_english =
            whatlang::Detector::with_allowlist(vec![best.lang(), whatlang::Lang::Eng])
                .detect(&text)
                .ok_or_else(undetermined)?;
        if against_english.lang() == whatlang::Lang::Eng {
            return Ok(LanguageTag::english());
        }

        if against_english.confidence() < self.min_confidence {
            return Err(ClassifierError::new(
                ClassifierErrorKind::Unreliable,
                format!(
                    "'{}' over english has confidence {:.2}, below {:.2}",
                    against_english.lang().code(),
                    against_english.confidence(),
                    self.min_confidence
                ),
            ));
        }

        Ok(LanguageTag::new(short_code(against_english.lang().code())))
    }
}

// whatlang reports ISO 639-3; directives use the two-letter form.
fn short_code(code: &'static str) -> &'static str {
    match code {
        "afr" => "af",
        "aka" => "ak",
        "amh" => "am",
        "ara" => "ar",
        "aze" => "az",
        "bel" => "be",
        "ben" => "bn",
        "bul" => "bg",
        "cat" => "ca",
        "ces" => "cs",
        "cmn" => "zh",
        "dan" => "da",
        "deu" => "de",
        "ell" => "el",
        "eng" => "en",
        "epo" => "eo",
        "est" => "et",
        "fin" => "fi",
        "fra" => "fr",
        "guj" => "gu",
        "heb" => "he",
        "hin" => "hi",
        "hrv" => "hr",
        "hun" => "hu",
        "hye" => "hy",
        "ind" => "id",
        "ita" => "it",
        "jav" => "jv",
        "jpn" => "ja",
        "kan" => "kn",
        "kat" => "ka",
        "khm" => "km",
        "kor" => "ko",
        "lat" => "la",
        "lav" => "lv",
        "lit" => "lt",
        "mal" => "ml",
        "mar" => "mr",
        "mkd" => "mk",
        "mya" => "my",
        "nep" => "ne",
        "nld" => "nl",
        "nob" => "no",
        "ori" => "or",
        "pan" => "pa",
        "pes" => "fa",
        "pol" => "pl",
        "por" => "pt",
        "ron" => "ro",
        "rus" => "ru",
        "sin" => "si",
        "slk" => "sk",
        "slv" => "sl",
        "sna" => "sn",
        "spa" => "es",
        "srp" => "sr",
        "swe" => "sv",
        "tam" => "ta",
        "tel" => "te",
        "tgl" => "tl",
        "tha" => "th",
        "tuk" => "tk",
        "tur" => "tr",
        "ukr" => "uk",
        "urd" => "ur",
        "uzb" => "uz",
        "vie" => "vi",
        "yid" => "yi",
        "zul" => "zu",
        other => other,
    }
}

#[derive(Clone)]
pub struct LanguageAdvisor {
    classifier: Arc<dyn LanguageClassifier>,
}

impl LanguageAdvisor {
    pub fn new(classifier: Arc<dyn LanguageClassifier>) -> Self {
        Self { classifier }
    }

    /// Best-effort tag for `text`; `"en"` whenever classification fails.
    pub fn detect(&self, text: &str) -> LanguageTag {
        match self.classifier.classify(text) {
            Ok(tag) => tag,
            Err(error) => {
                tracing::debug!(
                    kind = ?error.kind,
                    message = %error.message,
                    "language classification failed; defaulting to english"
                );
                LanguageTag::english()
            }
        }
    }
}

/// Whatlang with the response format suffix ignored, so detection sees only
/// the user's own words.
impl Default for LanguageAdvisor {
    fn default() -> Self {
        Self::new(Arc::new(
            WhatlangClassifier::new().ignoring(RESPONSE_FORMAT_SUFFIX),
        ))
    }
}

impl std::fmt::Debug for LanguageAdvisor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LanguageAdvisor").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    struct AlwaysFails;

    impl LanguageClassifier for AlwaysFails {
        fn classify(&self, _text: &str) -> Result<LanguageTag, ClassifierError> {
            Err(ClassifierError::new(
                ClassifierErrorKind::Undetermined,
                "no features",
            ))
        }
    }

    #[test]
    fn whatlang_classifier_reports_two_letter_codes() {
        let classifier = WhatlangClassifier::new();

        let spanish = classifier
            .classify("¿Cuáles son los gastos de cierre al comprar una casa en la ciudad?")
            .expect("spanish should classify");
        let english = classifier
            .classify("What are the typical closing costs when buying a house in the city?")
            .expect("english should classify");

        assert_eq!(spanish.as_str(), "es");
        assert!(english.is_english());
    }

    #[test]
    fn whatlang_classifier_rejects_text_without_letters() {
        let classifier = WhatlangClassifier::new().ignoring(RESPONSE_FORMAT_SUFFIX);

        assert_eq!(
            classifier.classify("   ").map_err(|error| error.kind),
            Err(ClassifierErrorKind::EmptyInput)
        );
        assert_eq!(
            classifier.classify("12345 ?!").map_err(|error| error.kind),
            Err(ClassifierErrorKind::NoAlphabeticText)
        );
        assert_eq!(
            classifier
                .classify(RESPONSE_FORMAT_SUFFIX)
                .map_err(|error| error.kind),
            Err(ClassifierErrorKind::EmptyInput)
        );
    }

    #[test]
    fn short_spanish_question_is_not_mistaken_for_catalan() {
        let tag = WhatlangClassifier::new()
            .classify("Hola, qué es una hipoteca?")
            .expect("spanish should classify");

        assert_eq!(tag.as_str(), "es");
    }

    #[test]
    fn ignored_suffix_does_not_outweigh_short_question() {
        let question = "Hola, qué es una hipoteca?";
        let augmented = format!("{question}{RESPONSE_FORMAT_SUFFIX}");

        let plain = WhatlangClassifier::new();
        assert!(
            plain
                .classify(&augmented)
                .expect("augmented text should classify")
                .is_english()
        );

        let ignoring = WhatlangClassifier::new().ignoring(RESPONSE_FORMAT_SUFFIX);
        assert_eq!(
            ignoring
                .classify(&augmented)
                .expect("augmented text should classify")
                .as_str(),
            "es"
        );
    }

    #[test]
    fn weak_non_english_guess_is_unreliable() {
        // Italian beats English here, but only narrowly.
        let text = "Come funziona un mutuo a tasso fisso?";

        let strict = WhatlangClassifier::new().with_min_confidence(0.95);
        assert_eq!(
            strict.classify(text).map_err(|error| error.kind),
            Err(ClassifierErrorKind::Unreliable)
        );

        let lenient = WhatlangClassifier::new().with_min_confidence(0.0);
        assert_eq!(lenient.classify(text).expect("italian should classify").as_str(), "it");
    }

    #[test]
    fn short_english_questions_stay_english() {
        let advisor = LanguageAdvisor::default();

        for question in [
            "What is escrow?",
            "What is a lien?",
            "Help me understand points",
            "Tell me about FHA loans",
            "How do appraisals work?",
            "Can I negotiate the price?",
        ] {
            let augmented = format!("{question}{RESPONSE_FORMAT_SUFFIX}");
            assert!(advisor.detect(&augmented).is_english(), "{question}");
        }
    }

    #[test]
    fn candidates_always_include_english() {
        let classifier = WhatlangClassifier::new().with_candidates([whatlang::Lang::Fra]);
        let english = classifier
            .classify("What are the typical closing costs when buying a house in the city?")
            .expect("english should classify");

        assert!(english.is_english());
    }

    #[test]
    fn advisor_collapses_failures_to_english() {
        let advisor = LanguageAdvisor::new(Arc::new(AlwaysFails));
        assert_eq!(advisor.detect("anything"), LanguageTag::english());

        let default_advisor = LanguageAdvisor::default();
        assert!(default_advisor.detect("12345").is_english());
        assert!(default_advisor.detect("").is_english());
    }

    #[test]
    fn short_code_passes_unknown_codes_through() {
        assert_eq!(short_code("spa"), "es");
        assert_eq!(short_code("xyz"), "xyz");
    }
}
