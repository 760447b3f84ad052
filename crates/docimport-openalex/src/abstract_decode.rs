//! Rebuild abstract text from an OpenAlex inverted index
//!
//! OpenAlex ships abstracts as `word -> [positions]`:
//! ```json
//! {"Despite": [0], "growing": [1], "interest": [2, 50]}
//! ```

use crate::schema::InvertedIndex;

/// Words joined by single spaces in position order.
///
/// Ties on a position (malformed indexes) are broken by the word itself so
/// the output does not depend on map iteration order. Returns `None` when
/// nothing is left to join.
///
/// # Example
/// ```
/// use docimport_openalex::abstract_decode::decode_inverted_index;
/// use docimport_openalex::schema::InvertedIndex;
///
/// let index = InvertedIndex::from([
///     ("world".to_string(), vec![1]),
///     ("Hello".to_string(), vec![0]),
/// ]);
/// assert_eq!(decode_inverted_index(&index).as_deref(), Some("Hello world"));
/// ```
pub fn decode_inverted_index(index: &InvertedIndex) -> Option<String> {
    let mut pairs: Vec<(usize, &str)> = index
        .iter()
        .flat_map(|(word, positions)| positions.iter().map(move |&p| (p, word.as_str())))
        .collect();
    if pairs.is_empty() {
        return None;
    }
    pairs.sort_unstable();

    let text = pairs
        .into_iter()
        .map(|(_, w)| w)
        .collect::<Vec<_>>()
        .join(" ");
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}
