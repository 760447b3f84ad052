//! Document identifiers of a staged work
//!
//! The same list populates the target document and drives the check for
//! documents already present in the docserver, so its order is fixed:
//! DOI, OpenAlex, PMID, PMCID, MAG.

use anyhow::Result;
use docimport_docserver::{DocumentIdentifier, DocumentIdentifierSystem, IdentifierLookup};

use crate::schema::{WorkRecord, non_empty};

pub const OPENALEX_PREFIX: &str = "https://openalex.org/";
pub const DOI_PREFIX: &str = "https://doi.org/";
pub const PMID_PREFIX: &str = "https://pubmed.ncbi.nlm.nih.gov/";
pub const PMCID_PREFIX: &str = "https://www.ncbi.nlm.nih.gov/pmc/articles/";
pub const ORCID_PREFIX: &str = "https://orcid.org/";
pub const ROR_PREFIX: &str = "https://ror.org/";

/// Strip a known URL prefix; values without it pass through unchanged
pub fn strip_url_prefix<'a>(value: &'a str, prefix: &str) -> &'a str {
    value.strip_prefix(prefix).unwrap_or(value)
}

/// "https://openalex.org/W123" -> "W123"
pub fn openalex_short_id(url: &str) -> &str {
    strip_url_prefix(url, OPENALEX_PREFIX)
}

/// "https://doi.org/10.1/abc" -> "10.1/ABC"
pub fn normalize_doi(doi: &str) -> String {
    strip_url_prefix(doi, DOI_PREFIX).to_uppercase()
}

/// Identifiers of `work` in lookup order
pub fn extract_document_identifiers(work: &WorkRecord) -> Vec<DocumentIdentifier> {
    use DocumentIdentifierSystem as Sys;

    let mut ids = Vec::with_capacity(5);

    if let Some(doi) = non_empty(&work.doi) {
        ids.push(DocumentIdentifier::new(Sys::Doi, normalize_doi(doi)));
    }
    if !work.id.is_empty() {
        ids.push(DocumentIdentifier::new(
            Sys::Openalex,
            openalex_short_id(&work.id),
        ));
    }
    if let Some(pmid) = work.pmid() {
        ids.push(DocumentIdentifier::new(
            Sys::Pmid,
            strip_url_prefix(pmid, PMID_PREFIX),
        ));
    }
    if let Some(pmcid) = work.pmcid() {
        ids.push(DocumentIdentifier::new(
            Sys::Pmcid,
            strip_url_prefix(pmcid, PMCID_PREFIX),
        ));
    }
    if let Some(mag) = work.mag() {
        ids.push(DocumentIdentifier::new(Sys::Mag, mag));
    }

    ids
}

/// First identifier of `work` already known to `store`, if any.
///
/// One match anywhere is enough for the work to count as present. Against a
/// `TargetStore` this checks the primary and versions collections (and a
/// separate output collection when configured).
pub fn find_existing(
    work: &WorkRecord,
    store: &impl IdentifierLookup,
) -> Result<Option<DocumentIdentifier>> {
    for id in extract_document_identifiers(work) {
        if store.exists_by_identifier(id.system, &id.value)? {
            return Ok(Some(id));
        }
    }
    Ok(None)
}
