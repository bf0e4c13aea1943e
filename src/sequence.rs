//! DNA sequence utilities

/// Reverse complement a DNA sequence
///
/// Reverses the sequence and complements each nucleotide:
/// - A <-> T
/// - G <-> C
/// - Case is preserved
/// - Non-ATGC characters pass through unchanged
///
/// # Examples
///
/// ```
/// use ferro_txmap::sequence::reverse_complement;
///
/// assert_eq!(reverse_complement("ATGC"), "GCAT");
/// assert_eq!(reverse_complement("aattggcc"), "ggccaatt");
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

/// Trim the common suffix, then the common prefix, of REF and ALT
///
/// Returns (trimmed_ref, trimmed_alt, prefix_len), with `prefix_len` in
/// bytes. Comparison is per character, so multi-byte input never splits.
pub fn trim_common_bases<'a>(reference: &'a str, alt: &'a str) -> (&'a str, &'a str, usize) {
    let suffix_len: usize = reference
        .chars()
        .rev()
        .zip(alt.chars().rev())
        .take_while(|(r, a)| r == a)
        .map(|(r, _)| r.len_utf8())
        .sum();
    let ref_remaining = &reference[..reference.len() - suffix_len];
    let alt_remaining = &alt[..alt.len() - suffix_len];

    let prefix_len: usize = ref_remaining
        .chars()
        .zip(alt_remaining.chars())
        .take_while(|(r, a)| r == a)
        .map(|(r, _)| r.len_utf8())
        .sum();

    (
        &ref_remaining[prefix_len..],
        &alt_remaining[prefix_len..],
        prefix_len,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse_complement_basic() {
        assert_eq!(reverse_complement("ATGC"), "GCAT");
        assert_eq!(reverse_complement(""), "");
    }

    #[test]
    fn test_reverse_complement_is_involution() {
        let seq = "ACGTTGCAAN";
        assert_eq!(reverse_complement(&reverse_complement(seq)), seq);
    }

    #[test]
    fn test_trim_snv_untouched() {
        assert_eq!(trim_common_bases("A", "G"), ("A", "G", 0));
    }

    #[test]
    fn test_trim_vcf_deletion_anchor() {
        // VCF style: anchor base shared on the left
        assert_eq!(trim_common_bases("CTG", "C"), ("TG", "", 1));
    }

    #[test]
    fn test_trim_vcf_insertion_anchor() {
        assert_eq!(trim_common_bases("C", "CTG"), ("", "TG", 1));
    }

    #[test]
    fn test_trim_suffix_before_prefix() {
        // Suffix is consumed first, leaving nothing for the prefix pass
        assert_eq!(trim_common_bases("CAC", "CACAC"), ("", "CA", 0));
    }

    #[test]
    fn test_trim_multibyte_does_not_split() {
        // Shares a leading byte but no character
        assert_eq!(trim_common_bases("\u{e9}", "\u{e8}"), ("\u{e9}", "\u{e8}", 0));
        assert_eq!(trim_common_bases("A\u{e9}", "A\u{e8}"), ("\u{e9}", "\u{e8}", 1));
        assert_eq!(trim_common_bases("\u{e9}G", "\u{e9}"), ("G", "", 2));
    }

    #[test]
    fn test_trim_identical() {
        assert_eq!(trim_common_bases("ACGT", "ACGT"), ("", "", 0));
    }
}
