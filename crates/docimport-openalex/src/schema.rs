//! Staged OpenAlex work records
//!
//! Mirrors the subset of the OpenAlex work JSON the importer reads. Every
//! field may be missing or `null` on the wire: scalars deserialize to
//! `None`, lists to empty.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer};

/// Abstract as delivered by OpenAlex: word -> positions
pub type InvertedIndex = HashMap<String, Vec<usize>>;

/// Treat an explicit `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// MAG ids show up both as strings and as bare numbers
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Num(u64),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Str(s) => s,
        Raw::Num(n) => n.to_string(),
    }))
}

/// OpenAlex Work JSON structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkRecord {
    /// OpenAlex ID (e.g., "https://openalex.org/W2741809807")
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,

    /// DOI URL (e.g., "https://doi.org/10.1038/...")
    #[serde(default)]
    pub doi: Option<String>,

    #[serde(default)]
    pub title: Option<String>,

    /// Language (ISO 639-1)
    #[serde(default)]
    pub language: Option<String>,

    /// Work type (article, book-chapter, ...)
    #[serde(rename = "type", default)]
    pub work_type: Option<String>,

    /// Publication date, `YYYY-MM-DD`
    #[serde(default)]
    pub publication_date: Option<String>,

    #[serde(default)]
    pub publication_year: Option<i32>,

    /// IDs from other systems
    #[serde(default)]
    pub ids: Option<ExternalIds>,

    #[serde(default)]
    pub abstract_inverted_index: Option<InvertedIndex>,

    /// Primary location (venue info)
    #[serde(default)]
    pub primary_location: Option<Location>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub locations: Vec<Location>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub authorships: Vec<Authorship>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub keywords: Vec<Keyword>,

    #[serde(default)]
    pub open_access: Option<OpenAccess>,

    #[serde(default)]
    pub biblio: Option<Biblio>,

    /// OpenAlex IDs of cited works
    #[serde(default, deserialize_with = "null_as_default")]
    pub referenced_works: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExternalIds {
    #[serde(default)]
    pub pmid: Option<String>,
    #[serde(default)]
    pub pmcid: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub mag: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub landing_page_url: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_oa: bool,
    #[serde(default)]
    pub source: Option<Source>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Source {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    /// Venue type (journal, conference, book series, repository, ...)
    #[serde(rename = "type", default)]
    pub source_type: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub issn: Vec<String>,
    #[serde(default)]
    pub host_organization_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Authorship {
    #[serde(default)]
    pub author: Option<AuthorRef>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub institutions: Vec<Institution>,
    /// Name as printed on the work
    #[serde(default)]
    pub raw_author_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthorRef {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub orcid: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Institution {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub ror: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Keyword {
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OpenAccess {
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_oa: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Biblio {
    #[serde(default)]
    pub volume: Option<String>,
    #[serde(default)]
    pub issue: Option<String>,
    #[serde(default)]
    pub first_page: Option<String>,
    #[serde(default)]
    pub last_page: Option<String>,
}

/// Non-empty string content of an optional field
pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

impl WorkRecord {
    /// Parse one staged JSON line
    pub fn from_json(line: &str) -> sonic_rs::Result<Self> {
        sonic_rs::from_str(line)
    }

    /// Source (venue) of the primary location
    pub fn primary_source(&self) -> Option<&Source> {
        self.primary_location
            .as_ref()
            .and_then(|loc| loc.source.as_ref())
    }

    pub fn pmid(&self) -> Option<&str> {
        self.ids.as_ref().and_then(|ids| non_empty(&ids.pmid))
    }

    pub fn pmcid(&self) -> Option<&str> {
        self.ids.as_ref().and_then(|ids| non_empty(&ids.pmcid))
    }

    pub fn mag(&self) -> Option<&str> {
        self.ids.as_ref().and_then(|ids| non_empty(&ids.mag))
    }

    /// Biblio field or `""` when the biblio object or the field is missing
    pub fn biblio_field(&self, field: impl Fn(&Biblio) -> &Option<String>) -> String {
        self.biblio
            .as_ref()
            .and_then(|b| field(b).clone())
            .unwrap_or_default()
    }
}
