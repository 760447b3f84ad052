//! Per-work affiliation set
//!
//! Built in one pass over all authorships before any author is mapped, so
//! author -> affiliation links always point at deduplicated keys.
//! Institutions are deduplicated by case-insensitive exact match on their
//! display name; two institutions sharing a name become one affiliation.

use docimport_docserver::{
    Affiliation, AffiliationId, AffiliationIdentifier, AffiliationIdentifierSystem,
};
use rustc_hash::FxHashMap;

use crate::identifiers::{ROR_PREFIX, openalex_short_id, strip_url_prefix};
use crate::schema::{Authorship, Institution, non_empty};

#[derive(Debug, Default)]
pub struct AffiliationSet {
    affiliations: Vec<Affiliation>,
    /// Lowercased display name -> index into `affiliations`
    by_name: FxHashMap<String, usize>,
    /// Author short id -> affiliation keys, in first-link order
    by_author: FxHashMap<String, Vec<AffiliationId>>,
}

impl AffiliationSet {
    pub fn from_authorships(authorships: &[Authorship]) -> Self {
        let mut set = Self::default();
        for authorship in authorships {
            set.add(authorship);
        }
        set
    }

    fn add(&mut self, authorship: &Authorship) {
        let author_id = authorship
            .author
            .as_ref()
            .and_then(|a| non_empty(&a.id))
            .map(openalex_short_id);

        for institution in &authorship.institutions {
            // Nothing to match on without a name
            let Some(name) = non_empty(&institution.display_name) else {
                log::debug!(
                    "skipping institution {:?} without display name",
                    institution.id
                );
                continue;
            };

            let key = self.resolve(name, institution);
            if let Some(author_id) = author_id {
                // Two same-named institutions on one author link the key twice
                self.by_author
                    .entry(author_id.to_string())
                    .or_default()
                    .push(key);
            }
        }
    }

    /// Key of the affiliation named `name`, creating it on first sight
    fn resolve(&mut self, name: &str, institution: &Institution) -> AffiliationId {
        let folded = fold_case(name);
        if let Some(&idx) = self.by_name.get(&folded) {
            return self.affiliations[idx].id.clone();
        }

        let id = AffiliationId::nth(self.affiliations.len() + 1);
        self.affiliations.push(Affiliation {
            id: id.clone(),
            literal: name.to_string(),
            identifiers: institution_identifiers(institution),
        });
        self.by_name.insert(folded, self.affiliations.len() - 1);
        id
    }

    /// Affiliation keys linked to an author (short OpenAlex id)
    pub fn author_affiliations(&self, author_id: &str) -> &[AffiliationId] {
        self.by_author
            .get(author_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn into_affiliations(self) -> Vec<Affiliation> {
        self.affiliations
    }

    pub fn len(&self) -> usize {
        self.affiliations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.affiliations.is_empty()
    }
}

/// Per-character case fold. Multi-character mappings (`ß` -> `SS`) are
/// left alone, and so is the final-sigma context rule.
fn fold_case(name: &str) -> String {
    name.chars()
        .map(|c| {
            let mut upper = c.to_uppercase();
            let c = match (upper.next(), upper.next()) {
                (Some(u), None) => u,
                _ => c,
            };
            let mut lower = c.to_lowercase();
            match (lower.next(), lower.next()) {
                (Some(l), None) => l,
                _ => c,
            }
        })
        .collect()
}

fn institution_identifiers(institution: &Institution) -> Vec<AffiliationIdentifier> {
    let mut ids = Vec::with_capacity(2);
    if let Some(id) = non_empty(&institution.id) {
        ids.push(AffiliationIdentifier {
            system: AffiliationIdentifierSystem::Openalex,
            value: openalex_short_id(id).to_string(),
        });
    }
    if let Some(ror) = non_empty(&institution.ror) {
        ids.push(AffiliationIdentifier {
            system: AffiliationIdentifierSystem::Ror,
            value: strip_url_prefix(ror, ROR_PREFIX).to_string(),
        });
    }
    ids
}
