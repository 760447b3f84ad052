//! Staged OpenAlex work -> docserver document
//!
//! `map_work` is a pure function of one record. Per-record state (the
//! affiliation set and the author map) lives only for the duration of the
//! call.

use chrono::{Datelike, NaiveDate};
use docimport_docserver::{
    Abstract, Access, AccessKind, Author, AuthorIdentifier, AuthorIdentifierSystem, AuthorRole,
    Document, DocumentContent, DocumentIdentifier, DocumentIdentifierSystem, DocumentSource, Issn,
    IssnKind, Language, Link, LinkAccess, LinkKind, Pages, PublicationDate, PublicationPhase,
    Publisher, Reference, SourceIdentifier, SourceIdentifierSystem, SourceType, Title,
    VersionSourceIdentifier, VersionSourceSystem, VolumeIssue,
};
use indexmap::IndexMap;

use crate::abstract_decode::decode_inverted_index;
use crate::affiliations::AffiliationSet;
use crate::classify::{classify_document_type, classify_source_type};
use crate::error::{ConversionError, MapError};
use crate::identifiers::{
    ORCID_PREFIX, extract_document_identifiers, openalex_short_id, strip_url_prefix,
};
use crate::schema::{Authorship, Source, WorkRecord, non_empty};

/// Title of works OpenAlex has no title for
pub const UNTITLED: &str = "Sin título en OpenAlex";
/// Display name OpenAlex gives to authors it could not resolve
pub const NULL_AUTHOR_SENTINEL: &str = "NULL AUTHOR_ID";
pub const UNKNOWN_LITERAL: &str = "Sin literal";
pub const UNKNOWN_NAME: &str = "Sin nombre";

/// Map one work to document content.
///
/// `Ok(None)` when the work has no type: it cannot be represented in the
/// docserver but is not an error either.
pub fn map_work(work: &WorkRecord) -> Result<Option<DocumentContent>, MapError> {
    let Some(document_type) = classify_document_type(work.work_type.as_deref())? else {
        return Ok(None);
    };
    let venue = work
        .primary_source()
        .ok_or(ConversionError::MissingField("primary_location.source"))?;
    let source_type = classify_source_type(venue.source_type.as_deref())?;

    let affiliations = AffiliationSet::from_authorships(&work.authorships);
    let authors = map_authors(&work.authorships, &affiliations)?;
    let language = non_empty(&work.language).map(Language::of);

    let content = DocumentContent {
        document_type,
        source: map_source(work, venue, source_type)?,
        title: map_title(work),
        abstracts: map_abstracts(work),
        language,
        authors,
        affiliations: affiliations.into_affiliations(),
        identifiers: extract_document_identifiers(work),
        links: map_links(work),
        references: map_references(work),
        keywords: map_keywords(work),
        access: map_access(work),
        phase: PublicationPhase::Definitive,
    };
    log::debug!(
        "mapped {} ({} authors, {} affiliations)",
        work.id,
        content.authors.len(),
        content.affiliations.len()
    );
    Ok(Some(content))
}

/// [`map_work`] wrapped with the version metadata the store keys on
pub fn map_document(work: &WorkRecord) -> Result<Option<Document>, MapError> {
    if work.id.is_empty() {
        return Err(ConversionError::MissingField("id").into());
    }
    let Some(content) = map_work(work)? else {
        return Ok(None);
    };
    let short_id = openalex_short_id(&work.id);
    Ok(Some(Document {
        version_id: short_id.to_string(),
        initial_source: VersionSourceIdentifier {
            system: VersionSourceSystem::Openalex,
            value: short_id.to_string(),
        },
        content,
    }))
}

/// Authors keyed by OpenAlex author id. A repeated id keeps its first
/// position and its last mapping.
fn map_authors(
    authorships: &[Authorship],
    affiliations: &AffiliationSet,
) -> Result<Vec<Author>, ConversionError> {
    let mut authors: IndexMap<String, Author> = IndexMap::with_capacity(authorships.len());
    for authorship in authorships {
        if let Some((id, author)) = map_keyed_author(authorship, affiliations)? {
            authors.insert(id, author);
        }
    }
    Ok(authors.into_values().collect())
}

/// Map one authorship. `Ok(None)` for unresolved authors with nothing to
/// print as their name.
pub fn map_author(
    authorship: &Authorship,
    affiliations: &AffiliationSet,
) -> Result<Option<Author>, ConversionError> {
    Ok(map_keyed_author(authorship, affiliations)?.map(|(_, author)| author))
}

fn map_keyed_author(
    authorship: &Authorship,
    affiliations: &AffiliationSet,
) -> Result<Option<(String, Author)>, ConversionError> {
    let author_ref = authorship
        .author
        .as_ref()
        .ok_or(ConversionError::MissingField("authorship.author"))?;
    let raw_name = non_empty(&authorship.raw_author_name);
    let display_name = non_empty(&author_ref.display_name);

    let unresolved =
        display_name.is_some_and(|name| name.eq_ignore_ascii_case(NULL_AUTHOR_SENTINEL));
    if unresolved && raw_name.is_none() {
        log::debug!("skipping unresolved author {:?}", author_ref.id);
        return Ok(None);
    }

    let id = non_empty(&author_ref.id)
        .map(openalex_short_id)
        .ok_or(ConversionError::MissingField("authorship.author.id"))?;

    let mut identifiers = vec![AuthorIdentifier {
        system: AuthorIdentifierSystem::Openalex,
        value: id.to_string(),
    }];
    if let Some(orcid) = non_empty(&author_ref.orcid) {
        identifiers.push(AuthorIdentifier {
            system: AuthorIdentifierSystem::Orcid,
            value: strip_url_prefix(orcid, ORCID_PREFIX).to_string(),
        });
    }

    let author = Author {
        literal: raw_name.or(display_name).unwrap_or(UNKNOWN_LITERAL).to_string(),
        name: display_name.unwrap_or(UNKNOWN_NAME).to_string(),
        role: AuthorRole::Author,
        affiliations: affiliations.author_affiliations(id).to_vec(),
        identifiers,
    };
    Ok(Some((id.to_string(), author)))
}

fn map_title(work: &WorkRecord) -> Title {
    match non_empty(&work.title) {
        Some(text) => Title {
            text: text.to_string(),
            language: non_empty(&work.language).map(Language::of),
        },
        None => Title {
            text: UNTITLED.to_string(),
            language: None,
        },
    }
}

fn map_abstracts(work: &WorkRecord) -> Vec<Abstract> {
    work.abstract_inverted_index
        .as_ref()
        .and_then(decode_inverted_index)
        .map(|text| Abstract {
            text,
            language: non_empty(&work.language).map(Language::of),
        })
        .into_iter()
        .collect()
}

fn map_links(work: &WorkRecord) -> Vec<Link> {
    work.locations
        .iter()
        .filter_map(|loc| {
            let url = non_empty(&loc.landing_page_url)?;
            Some(Link {
                url: url.to_string(),
                kind: LinkKind::LandingPage,
                access: if loc.is_oa {
                    LinkAccess::Open
                } else {
                    LinkAccess::Restricted
                },
            })
        })
        .collect()
}

fn map_references(work: &WorkRecord) -> Vec<Reference> {
    work.referenced_works
        .iter()
        .filter(|id| !id.is_empty())
        .map(|id| Reference {
            identifiers: vec![DocumentIdentifier::new(
                DocumentIdentifierSystem::Openalex,
                openalex_short_id(id),
            )],
        })
        .collect()
}

fn map_keywords(work: &WorkRecord) -> Vec<String> {
    work.keywords
        .iter()
        .filter_map(|k| non_empty(&k.display_name).map(str::to_string))
        .collect()
}

fn map_access(work: &WorkRecord) -> Option<Access> {
    work.open_access.as_ref().map(|oa| Access {
        kind: if oa.is_oa {
            AccessKind::OpenAccess
        } else {
            AccessKind::ClosedAccess
        },
    })
}

fn map_source(
    work: &WorkRecord,
    venue: &Source,
    source_type: SourceType,
) -> Result<DocumentSource, ConversionError> {
    let date = work
        .publication_date
        .as_deref()
        .ok_or(ConversionError::MissingField("publication_date"))?;

    Ok(DocumentSource {
        source_type,
        title: non_empty(&venue.display_name).map(str::to_string),
        issns: venue
            .issn
            .iter()
            .filter(|v| !v.is_empty())
            .map(|value| Issn {
                kind: IssnKind::Unknown,
                value: value.clone(),
            })
            .collect(),
        publication_year: work.publication_year,
        volume_issue: VolumeIssue {
            volume: work.biblio_field(|b| &b.volume),
            issue: work.biblio_field(|b| &b.issue),
        },
        pages: Pages {
            first: work.biblio_field(|b| &b.first_page),
            last: work.biblio_field(|b| &b.last_page),
        },
        publication_date: parse_publication_date(date)?,
        publishers: non_empty(&venue.host_organization_name)
            .map(|name| Publisher {
                name: name.to_string(),
            })
            .into_iter()
            .collect(),
        identifiers: non_empty(&venue.id)
            .map(|id| SourceIdentifier {
                system: SourceIdentifierSystem::Openalex,
                value: openalex_short_id(id).to_string(),
            })
            .into_iter()
            .collect(),
    })
}

/// Strict `YYYY-MM-DD`; chrono alone would also accept `2018-2-3`, signs
/// and leading blanks in the year
pub fn parse_publication_date(value: &str) -> Result<PublicationDate, ConversionError> {
    let invalid = |reason: &str| ConversionError::InvalidDate {
        value: value.to_string(),
        reason: reason.to_string(),
    };
    let shape_ok = value.len() == 10
        && value.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shape_ok {
        return Err(invalid("expected YYYY-MM-DD"));
    }
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|e| invalid(&e.to_string()))?;
    Ok(PublicationDate {
        year: date.year(),
        month: date.month(),
        day: date.day(),
    })
}
