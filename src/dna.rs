//! DNA alphabet predicates and strand arithmetic.

use crate::error::{Result, ScreedError};

/// True iff every character of `s` is in `{A, C, G, T, N}` after upper-casing.
pub fn is_dna(s: &str) -> bool {
    first_non_dna(s).is_none()
}

/// Complement of a single base. Case is preserved; characters without a
/// complement are returned unchanged.
pub fn complement_base(c: char) -> char {
    match c {
        'A' => 'T',
        'T' => 'A',
        'C' => 'G',
        'G' => 'C',
        'a' => 't',
        't' => 'a',
        'c' => 'g',
        'g' => 'c',
        other => other,
    }
}

/// Character-wise complement. Non-`{A,C,G,T}` characters pass through.
pub fn complement(s: &str) -> String {
    s.chars().map(complement_base).collect()
}

/// Character-wise complement that fails on the first character outside the
/// DNA alphabet instead of passing it through.
pub fn complement_strict(s: &str) -> Result<String> {
    match first_non_dna(s) {
        Some(c) => Err(ScreedError::Alphabet(c)),
        None => Ok(complement(s)),
    }
}

/// Lexical reversal.
pub fn reverse(s: &str) -> String {
    s.chars().rev().collect()
}

/// Reverse complement of a DNA sequence.
///
/// # Errors
///
/// Fails with [`ScreedError::Alphabet`] if `s` contains any character
/// outside `{A, C, G, T, N}` (case-insensitive).
pub fn reverse_complement(s: &str) -> Result<String> {
    match first_non_dna(s) {
        Some(c) => Err(ScreedError::Alphabet(c)),
        None => Ok(s.chars().rev().map(complement_base).collect()),
    }
}

fn first_non_dna(s: &str) -> Option<char> {
    s.chars()
        .find(|c| !matches!(c.to_ascii_uppercase(), 'A' | 'C' | 'G' | 'T' | 'N'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dna_predicate() {
        assert!(is_dna("ACGT"));
        assert!(is_dna("acgtn"));
        assert!(!is_dna("ACGU"));
        assert!(is_dna(""));
    }

    #[test]
    fn complement_preserves_unknown() {
        assert_eq!(complement("ACGTN-"), "TGCAN-");
        assert_eq!(complement("acgt"), "tgca");
    }

    #[test]
    fn strict_complement_rejects_unknown() {
        assert!(complement_strict("ACGTN").is_ok());
        let err = complement_strict("ACG-T").unwrap_err();
        assert!(matches!(err, ScreedError::Alphabet('-')));
    }

    #[test]
    fn reverse_complement_of_dna() {
        assert_eq!(reverse_complement("AACGTT").unwrap(), "AACGTT");
        assert_eq!(reverse_complement("ACCGT").unwrap(), "ACGGT");
        assert!(reverse_complement("ACGU").is_err());
    }

    #[test]
    fn involution_laws() {
        let s = "ATTCGGGAN";
        assert_eq!(reverse(&reverse(s)), s);
        assert_eq!(complement(&complement(s)), s);
        let rc = reverse_complement(s).unwrap();
        assert_eq!(reverse_complement(&rc).unwrap(), s);
    }
}
