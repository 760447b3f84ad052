//! Canonical docserver document model
//!
//! Everything an importer writes into the docserver store. Enum values
//! serialize in SCREAMING_SNAKE_CASE, the vocabulary the store already
//! holds (`DOI`, `BOOK_CHAPTER`, `OPEN_ACCESS`, ...).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Document type vocabulary of the docserver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentType {
    Dissertation,
    Article,
    Report,
    Book,
    BookChapter,
    Editorial,
    Erratum,
    Letter,
    Review,
}

/// Venue type vocabulary of the docserver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceType {
    Journal,
    ConferenceProceeding,
    BookSeries,
}

/// Publication phase.
///
/// Importers without a revision-status signal always write `Definitive`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PublicationPhase {
    Definitive,
}

/// Language code as delivered by the source (e.g. "en")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Language(pub String);

impl Language {
    pub fn of(code: impl Into<String>) -> Self {
        Self(code.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Title {
    pub text: String,
    pub language: Option<Language>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Abstract {
    pub text: String,
    pub language: Option<Language>,
}

// === Identifiers ===

/// Identifier schemes a document can be looked up by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentIdentifierSystem {
    Doi,
    Openalex,
    Pmid,
    Pmcid,
    Mag,
}

impl DocumentIdentifierSystem {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Doi => "DOI",
            Self::Openalex => "OPENALEX",
            Self::Pmid => "PMID",
            Self::Pmcid => "PMCID",
            Self::Mag => "MAG",
        }
    }
}

impl fmt::Display for DocumentIdentifierSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentIdentifier {
    pub system: DocumentIdentifierSystem,
    pub value: String,
}

impl DocumentIdentifier {
    pub fn new(system: DocumentIdentifierSystem, value: impl Into<String>) -> Self {
        Self {
            system,
            value: value.into(),
        }
    }
}

impl fmt::Display for DocumentIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.system, self.value)
    }
}

// === Affiliations ===

/// Record-local affiliation key (`af1`, `af2`, ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AffiliationId(pub String);

impl AffiliationId {
    /// Key for the `n`-th affiliation of a record (1-based)
    pub fn nth(n: usize) -> Self {
        Self(format!("af{n}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AffiliationIdentifierSystem {
    Openalex,
    Ror,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffiliationIdentifier {
    pub system: AffiliationIdentifierSystem,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Affiliation {
    pub id: AffiliationId,
    pub literal: String,
    pub identifiers: Vec<AffiliationIdentifier>,
}

// === Authors ===

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthorRole {
    #[serde(rename = "AUT")]
    Author,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthorIdentifierSystem {
    Openalex,
    Orcid,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorIdentifier {
    pub system: AuthorIdentifierSystem,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Name as printed on the work
    pub literal: String,
    /// Name from the authority record
    pub name: String,
    pub role: AuthorRole,
    pub affiliations: Vec<AffiliationId>,
    pub identifiers: Vec<AuthorIdentifier>,
}

// === Links, references, access ===

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LinkKind {
    LandingPage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LinkAccess {
    Open,
    Restricted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub url: String,
    pub kind: LinkKind,
    pub access: LinkAccess,
}

/// Cited work, known only by its identifiers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub identifiers: Vec<DocumentIdentifier>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccessKind {
    OpenAccess,
    ClosedAccess,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Access {
    pub kind: AccessKind,
}

// === Source (venue) ===

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssnKind {
    /// Print/electronic not distinguished by the source
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issn {
    pub kind: IssnKind,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceIdentifierSystem {
    Openalex,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceIdentifier {
    pub system: SourceIdentifierSystem,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicationDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VolumeIssue {
    pub volume: String,
    pub issue: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Pages {
    pub first: String,
    pub last: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publisher {
    pub name: String,
}

/// Venue the document was published in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSource {
    pub source_type: SourceType,
    pub title: Option<String>,
    pub issns: Vec<Issn>,
    pub publication_year: Option<i32>,
    pub volume_issue: VolumeIssue,
    pub pages: Pages,
    pub publication_date: PublicationDate,
    pub publishers: Vec<Publisher>,
    pub identifiers: Vec<SourceIdentifier>,
}

// === Document ===

/// Canonical content of one docserver document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentContent {
    pub document_type: DocumentType,
    pub source: DocumentSource,
    pub title: Title,
    pub language: Option<Language>,
    pub authors: Vec<Author>,
    pub affiliations: Vec<Affiliation>,
    pub abstracts: Vec<Abstract>,
    pub identifiers: Vec<DocumentIdentifier>,
    pub links: Vec<Link>,
    pub references: Vec<Reference>,
    pub keywords: Vec<String>,
    pub access: Option<Access>,
    pub phase: PublicationPhase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VersionSourceSystem {
    Openalex,
}

/// Where the first version of a document came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionSourceIdentifier {
    pub system: VersionSourceSystem,
    pub value: String,
}

/// Unit written to a collection: content plus version bookkeeping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub version_id: String,
    pub initial_source: VersionSourceIdentifier,
    pub content: DocumentContent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_system_wire_names() {
        let json = serde_json::to_string(&DocumentIdentifier::new(
            DocumentIdentifierSystem::Pmcid,
            "PMC1",
        ))
        .unwrap();
        assert_eq!(json, r#"{"system":"PMCID","value":"PMC1"}"#);
        assert_eq!(DocumentIdentifierSystem::Openalex.to_string(), "OPENALEX");
    }

    #[test]
    fn enum_wire_names() {
        assert_eq!(
            serde_json::to_string(&DocumentType::BookChapter).unwrap(),
            r#""BOOK_CHAPTER""#
        );
        assert_eq!(
            serde_json::to_string(&SourceType::ConferenceProceeding).unwrap(),
            r#""CONFERENCE_PROCEEDING""#
        );
        assert_eq!(serde_json::to_string(&AuthorRole::Author).unwrap(), r#""AUT""#);
        assert_eq!(
            serde_json::to_string(&AccessKind::ClosedAccess).unwrap(),
            r#""CLOSED_ACCESS""#
        );
    }

    #[test]
    fn affiliation_id_nth() {
        assert_eq!(AffiliationId::nth(1).as_str(), "af1");
        assert_eq!(AffiliationId::nth(12).as_str(), "af12");
        assert_eq!(serde_json::to_string(&AffiliationId::nth(3)).unwrap(), r#""af3""#);
    }

    #[test]
    fn identifier_display() {
        let id = DocumentIdentifier::new(DocumentIdentifierSystem::Doi, "10.1/ABC");
        assert_eq!(id.to_string(), "DOI:10.1/ABC");
    }
}
