//! Nucleotide sequence utilities

/// Reverse complement a DNA sequence
///
/// - A <-> T, G <-> C
/// - Case is preserved
/// - Non-ATGC characters pass through unchanged
///
/// # Examples
///
/// ```
/// use ferro_annotate::sequence::reverse_complement;
///
/// assert_eq!(reverse_complement("ATGC"), "GCAT");
/// assert_eq!(reverse_complement("ATGN"), "NCAT");
/// ```
pub fn reverse_complement(seq: &str) -> String {
    seq.chars()
        .rev()
        .map(|c| match c {
            'A' => 'T',
            'T' => 'A',
            'G' => 'C',
            'C' => 'G',
            'a' => 't',
            't' => 'a',
            'g' => 'c',
            'c' => 'g',
            _ => c,
        })
        .collect()
}

/// Whether every character is an upper-case `A`, `C`, `G`, `T` or `N`
pub fn is_valid_dna(seq: &str) -> bool {
    seq.bytes()
        .all(|b| matches!(b, b'A' | b'C' | b'G' | b'T' | b'N'))
}

/// Upper-case an allele, mapping the empty-allele markers `-` and `.` to ""
pub fn normalize_allele(allele: &str) -> String {
    match allele.trim() {
        "-" | "." => String::new(),
        s => s.to_ascii_uppercase(),
    }
}
