//! OpenAlex type codes -> docserver vocabularies
//!
//! Both tables are exact-match. A code outside a table is an error for the
//! record; only a missing work type is "not representable" (`Ok(None)`).

use docimport_docserver::{DocumentType, SourceType};

use crate::error::{ClassifyError, TypeField};

const DOCUMENT_TYPES: &[(&str, DocumentType)] = &[
    ("dissertation", DocumentType::Dissertation),
    ("article", DocumentType::Article),
    ("report", DocumentType::Report),
    ("book", DocumentType::Book),
    ("book-chapter", DocumentType::BookChapter),
    ("editorial", DocumentType::Editorial),
    ("erratum", DocumentType::Erratum),
    ("letter", DocumentType::Letter),
    ("review", DocumentType::Review),
];

// ebook platforms and repositories have no docserver counterpart
const SOURCE_TYPES: &[(&str, SourceType)] = &[
    ("journal", SourceType::Journal),
    ("conference", SourceType::ConferenceProceeding),
    ("book series", SourceType::BookSeries),
];

fn lookup<T: Copy>(table: &[(&str, T)], code: &str) -> Option<T> {
    table.iter().find(|(c, _)| *c == code).map(|(_, t)| *t)
}

fn unsupported(field: TypeField, code: &str) -> ClassifyError {
    log::error!("{field} '{code}' has no docserver counterpart");
    ClassifyError::UnsupportedType {
        field,
        code: code.to_string(),
    }
}

/// Map an OpenAlex work type.
///
/// `None` in, `None` out: the work cannot be represented but that is not
/// an error.
pub fn classify_document_type(code: Option<&str>) -> Result<Option<DocumentType>, ClassifyError> {
    let Some(code) = code else {
        return Ok(None);
    };
    lookup(DOCUMENT_TYPES, code)
        .map(Some)
        .ok_or_else(|| unsupported(TypeField::Document, code))
}

/// Map an OpenAlex venue type. Missing or empty codes are errors.
pub fn classify_source_type(code: Option<&str>) -> Result<SourceType, ClassifyError> {
    let code = match code {
        Some(c) if !c.is_empty() => c,
        _ => {
            log::error!("source type is missing");
            return Err(ClassifyError::MissingType {
                field: TypeField::Source,
            });
        }
    };
    lookup(SOURCE_TYPES, code).ok_or_else(|| unsupported(TypeField::Source, code))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_known_document_type() {
        let expected = [
            ("dissertation", DocumentType::Dissertation),
            ("article", DocumentType::Article),
            ("report", DocumentType::Report),
            ("book", DocumentType::Book),
            ("book-chapter", DocumentType::BookChapter),
            ("editorial", DocumentType::Editorial),
            ("erratum", DocumentType::Erratum),
            ("letter", DocumentType::Letter),
            ("review", DocumentType::Review),
        ];
        for (code, ty) in expected {
            assert_eq!(classify_document_type(Some(code)), Ok(Some(ty)), "{code}");
        }
    }

    #[test]
    fn null_document_type_is_not_an_error() {
        assert_eq!(classify_document_type(None), Ok(None));
    }

    #[test]
    fn unknown_document_types_fail() {
        for code in ["preprint", "paratext", "Article", "", "dataset"] {
            assert_eq!(
                classify_document_type(Some(code)),
                Err(ClassifyError::UnsupportedType {
                    field: TypeField::Document,
                    code: code.to_string(),
                }),
                "{code}"
            );
        }
    }

    #[test]
    fn known_source_types() {
        assert_eq!(classify_source_type(Some("journal")), Ok(SourceType::Journal));
        assert_eq!(
            classify_source_type(Some("conference")),
            Ok(SourceType::ConferenceProceeding)
        );
        assert_eq!(
            classify_source_type(Some("book series")),
            Ok(SourceType::BookSeries)
        );
    }

    #[test]
    fn unknown_source_types_fail() {
        for code in ["repository", "ebook platform", "other", "Journal"] {
            assert!(
                matches!(
                    classify_source_type(Some(code)),
                    Err(ClassifyError::UnsupportedType { field: TypeField::Source, .. })
                ),
                "{code}"
            );
        }
    }

    #[test]
    fn missing_source_type_fails() {
        let missing = Err(ClassifyError::MissingType {
            field: TypeField::Source,
        });
        assert_eq!(classify_source_type(None), missing);
        assert_eq!(classify_source_type(Some("")), missing);
    }
}
