//! Citation markers for completed answers.
//!
//! Markers are `[n]`, where `n` is the 1-based position of a reference in
//! the answer's reference list. They are placed either at the offsets given
//! by index-based citation records, or, when the stream never carried any
//! citation records, spread over the answer's paragraphs.

use std::ops::Range;

use crate::types::{Citation, Reference};

/// Adds citation markers to a finished answer.
///
/// `citations` is `None` when no citation list was ever received, which
/// selects the paragraph fallback. Returns the text unchanged when it is
/// empty, when there are no references, or when it already carries markers.
pub fn inject_citations(text: &str, citations: Option<&[Citation]>, references: &[Reference]) -> String {
    if text.is_empty() || references.is_empty() {
        return text.to_string();
    }

    if has_citation_markers(text) {
        tracing::debug!("Answer already contains citation markers, skipping injection");
        return text.to_string();
    }

    match citations {
        Some(citations) => inject_at_indices(text, citations),
        None => inject_by_paragraph(text, references.len()),
    }
}

/// Returns true if `text` contains `[` + one or more ASCII digits + `]`.
pub fn has_citation_markers(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.iter().enumerate().any(|(i, &b)| {
        if b != b'[' {
            return false;
        }
        let digits = bytes[i + 1..].iter().take_while(|c| c.is_ascii_digit()).count();
        digits > 0 && bytes.get(i + 1 + digits) == Some(&b']')
    })
}

fn markers<I>(numbers: I) -> String
where
    I: IntoIterator<Item = usize>,
{
    numbers.into_iter().map(|n| format!("[{n}]")).collect()
}

fn inject_at_indices(text: &str, citations: &[Citation]) -> String {
    let mut insertions: Vec<(usize, String)> = citations
        .iter()
        .filter_map(|citation| {
            let end = citation.end_index?;
            let mut numbers: Vec<usize> = citation
                .sources
                .iter()
                .filter_map(|source| source.reference_id.as_deref()?.trim().parse::<usize>().ok())
                .filter_map(|id| id.checked_add(1))
                .collect();
            numbers.sort_unstable();
            numbers.dedup();

            if numbers.is_empty() {
                return None;
            }
            Some((end, markers(numbers)))
        })
        .collect();

    // Splice from the end so pending offsets stay valid.
    insertions.sort_by(|a, b| b.0.cmp(&a.0));

    let mut annotated = text.to_string();
    for (offset, marker) in insertions {
        match byte_offset(&annotated, offset) {
            Some(at) => annotated.insert_str(at, &marker),
            None => tracing::debug!(offset, "Citation offset beyond answer text, skipping"),
        }
    }
    annotated
}

/// Converts a character offset into a byte offset; `None` past the end.
fn byte_offset(text: &str, chars: usize) -> Option<usize> {
    text.char_indices()
        .map(|(at, _)| at)
        .chain(std::iter::once(text.len()))
        .nth(chars)
}

fn inject_by_paragraph(text: &str, reference_count: usize) -> String {
    let breaks = paragraph_breaks(text);
    let mut segments = Vec::with_capacity(breaks.len() + 1);
    let mut from = 0;
    for separator in &breaks {
        segments.push(&text[from..separator.start]);
        from = separator.end;
    }
    segments.push(&text[from..]);

    let paragraphs: Vec<usize> = segments
        .iter()
        .enumerate()
        .filter(|(_, segment)| !segment.trim().is_empty())
        .map(|(i, _)| i)
        .collect();

    if paragraphs.len() <= 1 {
        return append_before_trailing_whitespace(text, &markers(1..=reference_count));
    }

    let assigned = distribute(reference_count, paragraphs.len());

    let mut annotated: Vec<String> = segments.iter().map(|s| (*s).to_string()).collect();
    for (slot, numbers) in paragraphs.iter().zip(assigned) {
        if !numbers.is_empty() {
            annotated[*slot] = append_before_trailing_whitespace(segments[*slot], &markers(numbers));
        }
    }

    let mut joined = String::with_capacity(text.len() + reference_count * 4);
    for (i, segment) in annotated.iter().enumerate() {
        joined.push_str(segment);
        if let Some(separator) = breaks.get(i) {
            joined.push_str(&text[separator.clone()]);
        }
    }
    joined
}

/// Byte ranges of blank lines: whitespace runs holding two or more `\n`.
fn paragraph_breaks(text: &str) -> Vec<Range<usize>> {
    let mut breaks = Vec::new();
    let mut run: Option<(usize, usize)> = None;

    for (at, c) in text.char_indices() {
        if c.is_whitespace() {
            let (start, newlines) = run.unwrap_or((at, 0));
            run = Some((start, newlines + usize::from(c == '\n')));
        } else if let Some((start, newlines)) = run.take() {
            if newlines >= 2 {
                breaks.push(start..at);
            }
        }
    }
    if let Some((start, newlines)) = run {
        if newlines >= 2 {
            breaks.push(start..text.len());
        }
    }
    breaks
}

/// Splits reference numbers `1..=count` over `paragraphs` slots.
///
/// Each paragraph takes `max(1, count / paragraphs)` references in order
/// until they run out; references left over after every paragraph has
/// taken its share go to the last paragraph.
fn distribute(count: usize, paragraphs: usize) -> Vec<Vec<usize>> {
    let per_paragraph = (count / paragraphs).max(1);
    let mut assigned = vec![Vec::new(); paragraphs];
    let mut next = 1;

    for slot in &mut assigned {
        if next > count {
            break;
        }
        let end = (next + per_paragraph - 1).min(count);
        slot.extend(next..=end);
        next = end + 1;
    }

    if next <= count {
        if let Some(last) = assigned.last_mut() {
            last.extend(next..=count);
        }
    }
    assigned
}

fn append_before_trailing_whitespace(segment: &str, marker: &str) -> String {
    let content = segment.trim_end();
    format!("{content}{marker}{}", &segment[content.len()..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn references(n: usize) -> Vec<Reference> {
        (0..n)
            .map(|i| Reference {
                title: Some(format!("Doc {i}")),
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn test_marker_detection() {
        assert!(has_citation_markers("Boiling point [1]."));
        assert!(has_citation_markers("[12]"));
        assert!(!has_citation_markers("Arrays like [] and [a1]"));
        assert!(!has_citation_markers("unterminated [3"));
        assert!(!has_citation_markers(""));
    }

    #[test]
    fn test_index_injection() {
        let text = "Water boils at 100C and freezes at 0C.";
        let citations = vec![Citation::new(19, ["0"])];

        assert_eq!(
            inject_citations(text, Some(citations.as_slice()), &references(1)),
            "Water boils at 100C[1] and freezes at 0C."
        );
    }

    #[test]
    fn test_index_injection_multiple_sources_dedup_sorted() {
        let text = "Caffeine is bitter.";
        let citations = vec![Citation::new(18, ["2", "0", "2"])];

        assert_eq!(
            inject_citations(text, Some(citations.as_slice()), &references(3)),
            "Caffeine is bitter[1][3]."
        );
    }

    #[test]
    fn test_index_injection_descending_application() {
        let text = "A is one. B is two.";
        let citations = vec![Citation::new(9, ["0"]), Citation::new(19, ["1"])];

        assert_eq!(
            inject_citations(text, Some(citations.as_slice()), &references(2)),
            "A is one.[1] B is two.[2]"
        );
    }

    #[test]
    fn test_index_injection_skips_out_of_bounds() {
        let text = "Short.";
        let citations = vec![Citation::new(400, ["0"]), Citation::new(6, ["1"])];

        assert_eq!(inject_citations(text, Some(citations.as_slice()), &references(2)), "Short.[2]");
    }

    #[test]
    fn test_index_injection_counts_characters() {
        let text = "Café au lait.";
        let citations = vec![Citation::new(4, ["0"])];

        assert_eq!(inject_citations(text, Some(citations.as_slice()), &references(1)), "Café[1] au lait.");
    }

    #[test]
    fn test_citations_without_sources_are_ignored() {
        let text = "Nothing to cite.";
        let citations = vec![
            Citation { end_index: Some(7), ..Default::default() },
            Citation::new(3, ["not-a-number"]),
        ];

        assert_eq!(inject_citations(text, Some(citations.as_slice()), &references(1)), text);
    }

    #[test]
    fn test_reference_id_at_usize_max_is_ignored() {
        let text = "abcdef";
        let max = usize::MAX.to_string();
        let citations = vec![Citation::new(3, [max.as_str()]), Citation::new(6, ["0"])];

        assert_eq!(inject_citations(text, Some(citations.as_slice()), &references(1)), "abcdef[1]");
    }

    #[test]
    fn test_empty_citation_list_disables_fallback() {
        let text = "First.\n\nSecond.";
        assert_eq!(inject_citations(text, Some(&[][..]), &references(2)), text);
    }

    #[test]
    fn test_paragraph_fallback_even_split() {
        let text = "First paragraph.\n\nSecond paragraph.";

        assert_eq!(
            inject_citations(text, None, &references(4)),
            "First paragraph.[1][2]\n\nSecond paragraph.[3][4]"
        );
    }

    #[test]
    fn test_paragraph_fallback_remainder_goes_last() {
        let text = "One.\n\nTwo.";

        assert_eq!(inject_citations(text, None, &references(5)), "One.[1][2]\n\nTwo.[3][4][5]");
    }

    #[test]
    fn test_paragraph_fallback_fewer_references_than_paragraphs() {
        let text = "One.\n\nTwo.\n\nThree.";

        assert_eq!(inject_citations(text, None, &references(2)), "One.[1]\n\nTwo.[2]\n\nThree.");
    }

    #[test]
    fn test_paragraph_fallback_crlf_and_whitespace_blank_lines() {
        assert_eq!(
            inject_citations("One.\r\n\r\nTwo.", None, &references(2)),
            "One.[1]\r\n\r\nTwo.[2]"
        );
        assert_eq!(
            inject_citations("One. \n \t\nTwo.\n\n\nThree.", None, &references(3)),
            "One.[1] \n \t\nTwo.[2]\n\n\nThree.[3]"
        );
    }

    #[test]
    fn test_paragraph_breaks() {
        assert_eq!(paragraph_breaks("a\n\nb"), vec![1..3]);
        assert_eq!(paragraph_breaks("a\nb c"), Vec::<Range<usize>>::new());
        assert_eq!(paragraph_breaks("a\n\n"), vec![1..3]);
    }

    #[test]
    fn test_single_paragraph_fallback() {
        let text = "Only one paragraph here.\n";

        assert_eq!(
            inject_citations(text, None, &references(3)),
            "Only one paragraph here.[1][2][3]\n"
        );
    }

    #[test]
    fn test_existing_markers_are_left_alone() {
        let text = "Already cited [2].\n\nSecond.";
        assert_eq!(inject_citations(text, None, &references(4)), text);
        assert_eq!(inject_citations(text, Some(&[Citation::new(0, ["0"])][..]), &references(4)), text);
    }

    #[test]
    fn test_no_references_or_text() {
        assert_eq!(inject_citations("Text.", None, &[]), "Text.");
        assert_eq!(inject_citations("", None, &references(2)), "");
    }

    #[test]
    fn test_distribute() {
        assert_eq!(distribute(4, 2), vec![vec![1, 2], vec![3, 4]]);
        assert_eq!(distribute(7, 3), vec![vec![1, 2], vec![3, 4], vec![5, 6, 7]]);
        assert_eq!(distribute(1, 3), vec![vec![1], vec![], vec![]]);
    }
}
