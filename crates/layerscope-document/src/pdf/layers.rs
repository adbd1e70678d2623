// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Optional-content (layer) detection.
//
// Three tiers run in a fixed order and the first positive wins:
//
//   1. catalog:      /OCProperties with a non-empty /OCGs array
//   2. resources:    page /Properties or an /ExtGState entry carrying /OC
//   3. raw content:  optional-content tokens anywhere in the file bytes
//
// A tier that cannot parse what it needs is inconclusive, never an error.
// Tier 3 also runs when the document did not parse at all, so damaged files
// still get a (lower-confidence) answer.

use std::sync::LazyLock;

use layerscope_core::error::LayerscopeError;
use layerscope_core::types::LayerEvidence;
use regex::bytes::RegexSet;
use tracing::{debug, instrument};

use super::reader::PdfReader;

/// Result of a single detection tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierOutcome {
    Positive(LayerEvidence),
    Inconclusive,
}

/// What every tier gets to look at.
struct DetectionInput<'a> {
    data: &'a [u8],
    parsed: Option<&'a PdfReader>,
}

type Tier = fn(&DetectionInput<'_>) -> TierOutcome;

/// Evaluation order.
const TIERS: [(&str, Tier); 3] = [
    ("catalog", catalog_tier),
    ("page resources", resources_tier),
    ("raw content", raw_content_tier),
];

/// Raw-byte tokens, matched in a single pass over the file:
/// 0 = an optional-content marker, 1 = begin-marked-content, 2 = `OC`.
static RAW_TOKENS: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new([r"/OCProperties|/OCGs|/OC ", r"BDC", r"OC"])
        .expect("raw optional-content tokens should compile")
});

/// Decides whether a document exposes optional-content groups.
pub struct LayerDetector;

impl LayerDetector {
    /// Run the tier chain over `data`. `parsed` is the already-loaded
    /// document, or `None` when `data` did not parse.
    ///
    /// Returns which tier found layers, or `None` when every tier was
    /// inconclusive.
    #[instrument(skip_all, fields(bytes_len = data.len(), parsed = parsed.is_some()))]
    pub fn detect(data: &[u8], parsed: Option<&PdfReader>) -> Option<LayerEvidence> {
        let input = DetectionInput { data, parsed };

        TIERS.iter().find_map(|(name, tier)| match tier(&input) {
            TierOutcome::Positive(evidence) => {
                debug!(tier = name, ?evidence, "Layers detected");
                Some(evidence)
            }
            TierOutcome::Inconclusive => {
                debug!(tier = name, "Tier inconclusive");
                None
            }
        })
    }
}

fn catalog_tier(input: &DetectionInput<'_>) -> TierOutcome {
    let Some(reader) = input.parsed else {
        return TierOutcome::Inconclusive;
    };
    conclude(
        catalog_declares_groups(reader),
        LayerEvidence::CatalogOcProperties,
    )
}

fn resources_tier(input: &DetectionInput<'_>) -> TierOutcome {
    let Some(reader) = input.parsed else {
        return TierOutcome::Inconclusive;
    };
    conclude(
        pages_reference_optional_content(reader),
        LayerEvidence::PageResources,
    )
}

fn raw_content_tier(input: &DetectionInput<'_>) -> TierOutcome {
    let found = RAW_TOKENS.matches(input.data);
    let marker_found = found.matched(0);
    let marked_optional_content = found.matched(1) && found.matched(2);

    if marker_found || marked_optional_content {
        TierOutcome::Positive(LayerEvidence::RawContentHeuristic)
    } else {
        TierOutcome::Inconclusive
    }
}

/// Map a structural check onto a tier outcome, swallowing parse failures.
fn conclude(check: Result<bool, LayerscopeError>, evidence: LayerEvidence) -> TierOutcome {
    match check {
        Ok(true) => TierOutcome::Positive(evidence),
        Ok(false) => TierOutcome::Inconclusive,
        Err(err) => {
            debug!(%err, "Structural check failed; treating as inconclusive");
            TierOutcome::Inconclusive
        }
    }
}

fn catalog_declares_groups(reader: &PdfReader) -> Result<bool, LayerscopeError> {
    let catalog = reader.catalog()?;
    let Ok(oc_properties) = catalog.get(b"OCProperties") else {
        return Ok(false);
    };
    let oc_properties = reader.resolve_dict(oc_properties)?;
    let Ok(groups) = oc_properties.get(b"OCGs") else {
        return Ok(false);
    };
    let groups = reader
        .resolve(groups)?
        .as_array()
        .map_err(|err| LayerscopeError::Pdf(format!("/OCGs is not an array: {}", err)))?;
    Ok(!groups.is_empty())
}

fn pages_reference_optional_content(reader: &PdfReader) -> Result<bool, LayerscopeError> {
    for (page_number, page_id) in reader.pages() {
        let Some(resources) = reader.page_resources(page_id)? else {
            continue;
        };

        if let Ok(properties) = resources.get(b"Properties") {
            if !reader.resolve_dict(properties)?.is_empty() {
                debug!(page_number, "Page resources carry marked-content properties");
                return Ok(true);
            }
        }

        if let Ok(states) = resources.get(b"ExtGState") {
            for (_, state) in reader.resolve_dict(states)?.iter() {
                let carries_oc = reader
                    .resolve_dict(state)
                    .map(|dict| dict.has(b"OC"))
                    .unwrap_or(false);
                if carries_oc {
                    debug!(page_number, "Graphics state references optional content");
                    return Ok(true);
                }
            }
        }
    }
    Ok(false)
}
