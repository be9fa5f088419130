//! Genetic code and codon table.

use super::amino_acid::AminoAcid;
use std::collections::HashMap;
use std::sync::OnceLock;

/// A single nucleotide base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Base {
    A,
    T,
    G,
    C,
}

impl Base {
    /// Parse a base from a byte.
    pub fn from_byte(b: u8) -> Option<Self> {
        match b.to_ascii_uppercase() {
            b'A' => Some(Base::A),
            b'T' | b'U' => Some(Base::T), // U is treated as T
            b'G' => Some(Base::G),
            b'C' => Some(Base::C),
            _ => None,
        }
    }

    /// Convert to character.
    pub fn to_char(self) -> char {
        match self {
            Base::A => 'A',
            Base::T => 'T',
            Base::G => 'G',
            Base::C => 'C',
        }
    }
}

/// A codon (three nucleotides).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Codon([Base; 3]);

impl Codon {
    /// Parse a codon from exactly three bytes; None for ambiguous bases.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != 3 {
            return None;
        }
        Some(Self([
            Base::from_byte(bytes[0])?,
            Base::from_byte(bytes[1])?,
            Base::from_byte(bytes[2])?,
        ]))
    }

    /// Get the three bases.
    pub fn bases(&self) -> &[Base; 3] {
        &self.0
    }
}

impl std::fmt::Display for Codon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{}{}",
            self.0[0].to_char(),
            self.0[1].to_char(),
            self.0[2].to_char()
        )
    }
}

/// Standard genetic code table.
#[derive(Debug, Clone)]
pub struct CodonTable {
    /// Codon to amino acid mapping; stop codons map to `Ter`.
    codon_to_aa: HashMap<Codon, AminoAcid>,
}

impl CodonTable {
    /// Create the standard genetic code.
    pub fn standard() -> Self {
        const CODE: &[(&str, AminoAcid)] = &[
            ("TTT", AminoAcid::Phe),
            ("TTC", AminoAcid::Phe),
            ("TTA", AminoAcid::Leu),
            ("TTG", AminoAcid::Leu),
            ("CTT", AminoAcid::Leu),
            ("CTC", AminoAcid::Leu),
            ("CTA", AminoAcid::Leu),
            ("CTG", AminoAcid::Leu),
            ("ATT", AminoAcid::Ile),
            ("ATC", AminoAcid::Ile),
            ("ATA", AminoAcid::Ile),
            ("ATG", AminoAcid::Met),
            ("GTT", AminoAcid::Val),
            ("GTC", AminoAcid::Val),
            ("GTA", AminoAcid::Val),
            ("GTG", AminoAcid::Val),
            ("TCT", AminoAcid::Ser),
            ("TCC", AminoAcid::Ser),
            ("TCA", AminoAcid::Ser),
            ("TCG", AminoAcid::Ser),
            ("AGT", AminoAcid::Ser),
            ("AGC", AminoAcid::Ser),
            ("CCT", AminoAcid::Pro),
            ("CCC", AminoAcid::Pro),
            ("CCA", AminoAcid::Pro),
            ("CCG", AminoAcid::Pro),
            ("ACT", AminoAcid::Thr),
            ("ACC", AminoAcid::Thr),
            ("ACA", AminoAcid::Thr),
            ("ACG", AminoAcid::Thr),
            ("GCT", AminoAcid::Ala),
            ("GCC", AminoAcid::Ala),
            ("GCA", AminoAcid::Ala),
            ("GCG", AminoAcid::Ala),
            ("TAT", AminoAcid::Tyr),
            ("TAC", AminoAcid::Tyr),
            ("TAA", AminoAcid::Ter), // Ochre
            ("TAG", AminoAcid::Ter), // Amber
            ("TGA", AminoAcid::Ter), // Opal
            ("CAT", AminoAcid::His),
            ("CAC", AminoAcid::His),
            ("CAA", AminoAcid::Gln),
            ("CAG", AminoAcid::Gln),
            ("AAT", AminoAcid::Asn),
            ("AAC", AminoAcid::Asn),
            ("AAA", AminoAcid::Lys),
            ("AAG", AminoAcid::Lys),
            ("GAT", AminoAcid::Asp),
            ("GAC", AminoAcid::Asp),
            ("GAA", AminoAcid::Glu),
            ("GAG", AminoAcid::Glu),
            ("TGT", AminoAcid::Cys),
            ("TGC", AminoAcid::Cys),
            ("TGG", AminoAcid::Trp),
            ("CGT", AminoAcid::Arg),
            ("CGC", AminoAcid::Arg),
            ("CGA", AminoAcid::Arg),
            ("CGG", AminoAcid::Arg),
            ("AGA", AminoAcid::Arg),
            ("AGG", AminoAcid::Arg),
            ("GGT", AminoAcid::Gly),
            ("GGC", AminoAcid::Gly),
            ("GGA", AminoAcid::Gly),
            ("GGG", AminoAcid::Gly),
        ];

        let codon_to_aa = CODE
            .iter()
            .filter_map(|(s, aa)| Codon::from_bytes(s.as_bytes()).map(|c| (c, *aa)))
            .collect();

        Self { codon_to_aa }
    }

    /// Shared instance of the standard code.
    pub fn shared() -> &'static CodonTable {
        static TABLE: OnceLock<CodonTable> = OnceLock::new();
        TABLE.get_or_init(CodonTable::standard)
    }

    /// Amino acid for three nucleotides; `Xaa` when any base is ambiguous.
    pub fn translate_codon(&self, bytes: &[u8]) -> AminoAcid {
        Codon::from_bytes(bytes)
            .and_then(|c| self.codon_to_aa.get(&c).copied())
            .unwrap_or(AminoAcid::Xaa)
    }

    /// Check if a codon is a stop codon.
    pub fn is_stop(&self, bytes: &[u8]) -> bool {
        self.translate_codon(bytes).is_stop()
    }

    /// Translate complete codons of `seq`; a trailing partial codon is ignored.
    pub fn translate(&self, seq: &[u8]) -> Vec<AminoAcid> {
        seq.chunks_exact(3).map(|c| self.translate_codon(c)).collect()
    }

    /// Translate until (and including) the first stop codon.
    ///
    /// Returns the peptide and whether a stop codon was reached before the
    /// sequence ran out.
    pub fn translate_to_stop(&self, seq: &[u8]) -> (Vec<AminoAcid>, bool) {
        let mut peptide = Vec::with_capacity(seq.len() / 3);
        for codon in seq.chunks_exact(3) {
            let aa = self.translate_codon(codon);
            peptide.push(aa);
            if aa.is_stop() {
                return (peptide, true);
            }
        }
        (peptide, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table_covers_all_codons() {
        let table = CodonTable::standard();
        assert_eq!(table.codon_to_aa.len(), 64);
    }

    #[test]
    fn test_translate_codon() {
        let table = CodonTable::shared();
        assert_eq!(table.translate_codon(b"ATG"), AminoAcid::Met);
        assert_eq!(table.translate_codon(b"CGC"), AminoAcid::Arg);
        assert_eq!(table.translate_codon(b"CAC"), AminoAcid::His);
        assert_eq!(table.translate_codon(b"TAG"), AminoAcid::Ter);
        assert_eq!(table.translate_codon(b"ANG"), AminoAcid::Xaa);
    }

    #[test]
    fn test_stop_codons() {
        let table = CodonTable::shared();
        assert!(table.is_stop(b"TAA"));
        assert!(table.is_stop(b"TAG"));
        assert!(table.is_stop(b"TGA"));
        assert!(!table.is_stop(b"TGG"));
    }

    #[test]
    fn test_translate_ignores_partial_codon() {
        let table = CodonTable::shared();
        assert_eq!(
            table.translate(b"ATGGCTTA"),
            vec![AminoAcid::Met, AminoAcid::Ala]
        );
    }

    #[test]
    fn test_translate_to_stop() {
        let table = CodonTable::shared();
        let (pep, found) = table.translate_to_stop(b"ATGTAAGGG");
        assert_eq!(pep, vec![AminoAcid::Met, AminoAcid::Ter]);
        assert!(found);

        let (pep, found) = table.translate_to_stop(b"ATGGGG");
        assert_eq!(pep.len(), 2);
        assert!(!found);
    }

    #[test]
    fn test_codon_display() {
        let codon = Codon::from_bytes(b"acg").unwrap();
        assert_eq!(codon.to_string(), "ACG");
        assert_eq!(codon.bases()[0], Base::A);
    }
}
