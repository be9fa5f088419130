//! Variant effect categories and their severity ranking.
//!
//! Effects are declared most severe first, so the derived `Ord` sorts a list
//! of annotations from most to least severe.
//!
//! ```
//! use ferro_annotate::effect::{Impact, VariantEffect};
//!
//! assert!(VariantEffect::StopGained < VariantEffect::Missense);
//! assert_eq!(VariantEffect::Missense.so_term(), "missense_variant");
//! assert_eq!(VariantEffect::Missense.impact(), Impact::Moderate);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::reference::projection::SpliceSite;

/// Effect of a variant on one transcript, most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantEffect {
    /// Start codon changed to other.
    StartLost,
    /// Introduces a premature stop codon.
    StopGained,
    /// Insertion/deletion causing frameshift.
    Frameshift,
    /// Within the donor window of an intron.
    SpliceDonor,
    /// Within the acceptor window of an intron.
    SpliceAcceptor,
    /// Amino acid substitution.
    Missense,
    /// In-frame deletion of amino acids.
    InframeDeletion,
    /// In-frame insertion of amino acids.
    InframeInsertion,
    /// Stop codon changed to amino acid.
    StopLost,
    /// Silent change (codon change, same amino acid).
    Synonymous,
    /// Variant in 5' UTR.
    FivePrimeUtr,
    /// Variant in 3' UTR.
    ThreePrimeUtr,
    /// Variant in intron.
    Intronic,
    /// Exon of a noncoding transcript.
    NoncodingExon,
    /// Outside every transcript.
    Intergenic,
}

impl VariantEffect {
    /// All effects, most severe first
    pub const ALL: [VariantEffect; 15] = [
        VariantEffect::StartLost,
        VariantEffect::StopGained,
        VariantEffect::Frameshift,
        VariantEffect::SpliceDonor,
        VariantEffect::SpliceAcceptor,
        VariantEffect::Missense,
        VariantEffect::InframeDeletion,
        VariantEffect::InframeInsertion,
        VariantEffect::StopLost,
        VariantEffect::Synonymous,
        VariantEffect::FivePrimeUtr,
        VariantEffect::ThreePrimeUtr,
        VariantEffect::Intronic,
        VariantEffect::NoncodingExon,
        VariantEffect::Intergenic,
    ];

    /// Severity rank; 0 is the most severe.
    pub fn rank(&self) -> u8 {
        *self as u8
    }

    /// Splice effect for a splice site.
    pub fn splice(site: SpliceSite) -> Self {
        match site {
            SpliceSite::Donor => VariantEffect::SpliceDonor,
            SpliceSite::Acceptor => VariantEffect::SpliceAcceptor,
        }
    }

    /// Get the Sequence Ontology term.
    pub fn so_term(&self) -> &'static str {
        match self {
            VariantEffect::StartLost => "start_lost",
            VariantEffect::StopGained => "stop_gained",
            VariantEffect::Frameshift => "frameshift_variant",
            VariantEffect::SpliceDonor => "splice_donor_variant",
            VariantEffect::SpliceAcceptor => "splice_acceptor_variant",
            VariantEffect::Missense => "missense_variant",
            VariantEffect::InframeDeletion => "inframe_deletion",
            VariantEffect::InframeInsertion => "inframe_insertion",
            VariantEffect::StopLost => "stop_lost",
            VariantEffect::Synonymous => "synonymous_variant",
            VariantEffect::FivePrimeUtr => "5_prime_UTR_variant",
            VariantEffect::ThreePrimeUtr => "3_prime_UTR_variant",
            VariantEffect::Intronic => "intron_variant",
            VariantEffect::NoncodingExon => "non_coding_transcript_exon_variant",
            VariantEffect::Intergenic => "intergenic_variant",
        }
    }

    /// Get the Sequence Ontology ID.
    pub fn so_id(&self) -> &'static str {
        match self {
            VariantEffect::StartLost => "SO:0002012",
            VariantEffect::StopGained => "SO:0001587",
            VariantEffect::Frameshift => "SO:0001589",
            VariantEffect::SpliceDonor => "SO:0001575",
            VariantEffect::SpliceAcceptor => "SO:0001574",
            VariantEffect::Missense => "SO:0001583",
            VariantEffect::InframeDeletion => "SO:0001822",
            VariantEffect::InframeInsertion => "SO:0001821",
            VariantEffect::StopLost => "SO:0001578",
            VariantEffect::Synonymous => "SO:0001819",
            VariantEffect::FivePrimeUtr => "SO:0001623",
            VariantEffect::ThreePrimeUtr => "SO:0001624",
            VariantEffect::Intronic => "SO:0001627",
            VariantEffect::NoncodingExon => "SO:0001792",
            VariantEffect::Intergenic => "SO:0001628",
        }
    }

    /// Impact level of the effect.
    pub fn impact(&self) -> Impact {
        match self {
            VariantEffect::StartLost
            | VariantEffect::StopGained
            | VariantEffect::Frameshift
            | VariantEffect::SpliceDonor
            | VariantEffect::SpliceAcceptor
            | VariantEffect::StopLost => Impact::High,
            VariantEffect::Missense
            | VariantEffect::InframeDeletion
            | VariantEffect::InframeInsertion => Impact::Moderate,
            VariantEffect::Synonymous => Impact::Low,
            VariantEffect::FivePrimeUtr
            | VariantEffect::ThreePrimeUtr
            | VariantEffect::Intronic
            | VariantEffect::NoncodingExon
            | VariantEffect::Intergenic => Impact::Modifier,
        }
    }

    /// Whether the effect changes the predicted protein sequence
    pub fn is_protein_altering(&self) -> bool {
        matches!(
            self,
            VariantEffect::StartLost
                | VariantEffect::StopGained
                | VariantEffect::Frameshift
                | VariantEffect::Missense
                | VariantEffect::InframeDeletion
                | VariantEffect::InframeInsertion
                | VariantEffect::StopLost
        )
    }
}

impl fmt::Display for VariantEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.so_term())
    }
}

/// Variant impact level (VEP-style).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Impact {
    /// Modifier - minimal predicted impact.
    Modifier,
    /// Low impact.
    Low,
    /// Moderate impact.
    Moderate,
    /// High impact (likely deleterious).
    High,
}

impl Impact {
    /// Get the impact as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Impact::High => "HIGH",
            Impact::Moderate => "MODERATE",
            Impact::Low => "LOW",
            Impact::Modifier => "MODIFIER",
        }
    }
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
