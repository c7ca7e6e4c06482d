//! Candidate URL generation for stored-object references.

use portal_core::{AppError, AppResult};
use url::Url;

use super::ObjectStoreConfig;

/// Upper bound on iterative percent-decoding passes.
///
/// Double-encoded references are the worst case seen in practice; the bound
/// keeps a pathological `%2525...` chain from looping.
const MAX_DECODE_PASSES: usize = 3;

/// Normalization strategies, in probe preference order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateStrategy {
    /// Minimal touch: rebase onto the public endpoint and let URL parsing
    /// encode only what it must (bare spaces and the like).
    AsIs,
    /// Aggressive: fully decode the path, then re-encode every segment once,
    /// including characters lax encoders leave bare such as parentheses.
    Reencoded,
}

/// Strategies in the order candidates are probed.
const CANDIDATE_PREFERENCE: [CandidateStrategy; 2] =
    [CandidateStrategy::AsIs, CandidateStrategy::Reencoded];

impl CandidateStrategy {
    /// Derives this strategy's candidate URL from a stored reference.
    pub fn derive(self, reference: &str, config: &ObjectStoreConfig) -> AppResult<String> {
        let public_form = to_public_form(reference, config)?;
        match self {
            Self::AsIs => Ok(public_form.into()),
            Self::Reencoded => Ok(reencode(&public_form)),
        }
    }
}

/// Generates deduplicated candidate URLs in probe preference order.
pub fn candidate_urls(reference: &str, config: &ObjectStoreConfig) -> AppResult<Vec<String>> {
    let mut urls = Vec::with_capacity(CANDIDATE_PREFERENCE.len());
    for strategy in CANDIDATE_PREFERENCE {
        let candidate = strategy.derive(reference, config)?;
        if !urls.contains(&candidate) {
            urls.push(candidate);
        }
    }
    Ok(urls)
}

/// Rebases upload-endpoint references onto the public read endpoint and
/// strips a leading bucket-name path segment either way.
fn to_public_form(reference: &str, config: &ObjectStoreConfig) -> AppResult<Url> {
    let parsed = Url::parse(reference.trim()).map_err(|error| {
        AppError::Validation(format!("invalid object reference '{reference}': {error}"))
    })?;

    let path = strip_bucket(parsed.path().trim_start_matches('/'), config.bucket_name());

    if parsed.host_str() == Some(config.upload_host()) {
        let rebased = format!("{}/{}", config.public_base(), path);
        return Url::parse(&rebased).map_err(|error| {
            AppError::Internal(format!("rebased object url '{rebased}' is invalid: {error}"))
        });
    }

    if path != parsed.path().trim_start_matches('/') {
        let rebuilt = format!("{}/{}", origin(&parsed), path);
        return Url::parse(&rebuilt).map_err(|error| {
            AppError::Internal(format!("rebuilt object url '{rebuilt}' is invalid: {error}"))
        });
    }

    Ok(parsed)
}

/// Decodes the path to its plain-text form, then re-encodes each segment
/// exactly once.
fn reencode(public_form: &Url) -> String {
    let mut path = public_form.path().trim_start_matches('/').to_owned();

    for _ in 0..MAX_DECODE_PASSES {
        if !path.contains('%') {
            break;
        }
        match urlencoding::decode(&path) {
            Ok(decoded) if decoded != path => path = decoded.into_owned(),
            // Stable or malformed: stop with what we have.
            _ => break,
        }
    }

    let segments: Vec<String> = path
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect();

    format!("{}/{}", origin(public_form), segments.join("/"))
}

fn origin(url: &Url) -> String {
    url.origin().ascii_serialization()
}

fn strip_bucket<'a>(path: &'a str, bucket: &str) -> &'a str {
    match path.strip_prefix(bucket) {
        Some(rest) if rest.starts_with('/') => rest.trim_start_matches('/'),
        _ => path,
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::super::ObjectStoreConfig;
    use super::{CandidateStrategy, candidate_urls};

    fn config() -> ObjectStoreConfig {
        match ObjectStoreConfig::new(
            "https://pub-9f8e7d6c.r2.dev",
            "https://a1b2c3.r2.cloudflarestorage.com",
            "woreda-documents",
        ) {
            Ok(config) => config,
            Err(error) => unreachable!("test config is valid: {error}"),
        }
    }

    fn urls_for(reference: &str) -> Vec<String> {
        match candidate_urls(reference, &config()) {
            Ok(urls) => urls,
            Err(error) => panic!("candidate generation failed for '{reference}': {error}"),
        }
    }

    fn derived(strategy: CandidateStrategy, reference: &str) -> String {
        match strategy.derive(reference, &config()) {
            Ok(url) => url,
            Err(error) => panic!("derivation failed for '{reference}': {error}"),
        }
    }

    #[test]
    fn upload_endpoint_references_are_rebased_onto_the_public_host() {
        let reference = "https://a1b2c3.r2.cloudflarestorage.com/woreda-documents/woreda-01/finance/BUD/2016/report.pdf";

        let urls = urls_for(reference);

        assert_eq!(
            urls,
            vec!["https://pub-9f8e7d6c.r2.dev/woreda-01/finance/BUD/2016/report.pdf".to_owned()]
        );
    }

    #[test]
    fn bucket_prefix_is_stripped_from_public_references_too() {
        let reference =
            "https://pub-9f8e7d6c.r2.dev/woreda-documents/woreda-01/finance/BUD/2016/report.pdf";

        let urls = urls_for(reference);

        assert_eq!(
            urls,
            vec!["https://pub-9f8e7d6c.r2.dev/woreda-01/finance/BUD/2016/report.pdf".to_owned()]
        );
    }

    #[test]
    fn a_path_segment_that_merely_starts_with_the_bucket_name_is_kept() {
        let reference = "https://pub-9f8e7d6c.r2.dev/woreda-documents-archive/report.pdf";

        let urls = urls_for(reference);

        assert_eq!(
            urls,
            vec!["https://pub-9f8e7d6c.r2.dev/woreda-documents-archive/report.pdf".to_owned()]
        );
    }

    #[test]
    fn double_encoded_and_plain_references_normalize_to_the_same_url() {
        let double_encoded = "https://pub-9f8e7d6c.r2.dev/woreda-01/finance/BUD/2016/Annual%2520Report%2520%25282016%2529.pdf";
        let plain =
            "https://pub-9f8e7d6c.r2.dev/woreda-01/finance/BUD/2016/Annual Report (2016).pdf";
        let expected =
            "https://pub-9f8e7d6c.r2.dev/woreda-01/finance/BUD/2016/Annual%20Report%20%282016%29.pdf";

        let from_double = derived(CandidateStrategy::Reencoded, double_encoded);
        let from_plain = derived(CandidateStrategy::Reencoded, plain);

        assert_eq!(from_double, expected);
        assert_eq!(from_plain, expected);
    }

    #[test]
    fn candidates_are_ordered_minimal_first_and_deduplicated() {
        let encoded_once =
            "https://pub-9f8e7d6c.r2.dev/woreda-01/finance/BUD/2016/Annual%20Report%20(2016).pdf";

        let urls = urls_for(encoded_once);

        assert_eq!(
            urls,
            vec![
                "https://pub-9f8e7d6c.r2.dev/woreda-01/finance/BUD/2016/Annual%20Report%20(2016).pdf"
                    .to_owned(),
                "https://pub-9f8e7d6c.r2.dev/woreda-01/finance/BUD/2016/Annual%20Report%20%282016%29.pdf"
                    .to_owned(),
            ]
        );

        let already_canonical = "https://pub-9f8e7d6c.r2.dev/woreda-01/finance/BUD/2016/report.pdf";
        let urls = urls_for(already_canonical);
        assert_eq!(urls.len(), 1);
    }

    #[test]
    fn garbage_references_are_rejected_as_validation_errors() {
        let result = candidate_urls("not a url at all", &config());
        assert!(matches!(
            result,
            Err(portal_core::AppError::Validation(_))
        ));
    }

    proptest! {
        /// Re-encoding is idempotent: feeding a normalized URL back through
        /// the aggressive strategy reproduces it exactly.
        #[test]
        fn reencoding_is_idempotent(
            segments in proptest::collection::vec("[A-Za-z0-9]([A-Za-z0-9 ()._-]{0,18}[A-Za-z0-9)])?", 1..5)
        ) {
            let reference = format!(
                "https://pub-9f8e7d6c.r2.dev/{}",
                segments.join("/")
            );

            let once = derived(CandidateStrategy::Reencoded, &reference);
            let twice = derived(CandidateStrategy::Reencoded, &once);

            prop_assert_eq!(once, twice);
        }
    }
}
