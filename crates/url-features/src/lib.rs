//! URL Feature Engineering
//!
//! Turns raw, untrusted URL strings into a fixed-width numeric vector for
//! phishing classification. Extraction is total: any input yields exactly
//! [`FEATURE_DIMENSION`] finite values.

mod features;
mod lexical;
mod parse;

pub use features::{
    extract, feature_index, FeatureExtractor, FeatureVector, FEATURE_DIMENSION,
    SUSPICIOUS_KEYWORDS,
};
pub use lexical::CharProfile;
pub use parse::{normalize, UrlParseError, UrlParts, UrlSplitter};
