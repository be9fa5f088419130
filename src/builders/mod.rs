//! Annotation builders, one per variant category
//!
//! The dispatcher picks a [`Builder`] from the variant kind and the region it
//! occupies; [`build`] turns that choice into an [`Annotation`].
//!
//! | Builder | Region | Protein |
//! |---------|--------|---------|
//! | `Snv`, `Insertion`, `Deletion`, `Delins` | CDS exon | codon-level prediction |
//! | `Utr` | 5'/3' UTR exon | `p.(=)` |
//! | `Intronic` | intron | `p.(=)` |
//! | `Splice` | splice window or exon/intron junction | `p.?` |
//! | `Noncoding` | exon of a noncoding transcript | none |
//! | `Intergenic` | outside the transcript | none |

pub mod coding;
pub mod exonic;
pub mod positional;

pub use coding::{codon_change, predict, ProteinPrediction};
pub use exonic::ExonicVariant;
pub use positional::span_change;

use crate::annotation::{Annotation, AnnotationMessage};
use crate::coords::Strand;
use crate::dispatch::{Builder, UtrSide};
use crate::effect::VariantEffect;
use crate::error::AnnotateError;
use crate::hgvs::ProteinChange;
use crate::reference::{SpliceSite, TranscriptModel};
use crate::sequence::reverse_complement;
use crate::variant::NormalizedVariant;

/// Alleles of `variant` as read along a transcript on `strand`
pub(crate) fn oriented_alleles(variant: &NormalizedVariant, strand: Strand) -> (String, String) {
    match strand {
        Strand::Plus => (
            variant.reference().to_string(),
            variant.alternate().to_string(),
        ),
        Strand::Minus => (
            reverse_complement(variant.reference()),
            reverse_complement(variant.alternate()),
        ),
    }
}

/// Everything a builder reads
#[derive(Debug, Clone, Copy)]
pub struct BuildInput<'a> {
    pub variant: &'a NormalizedVariant,
    pub transcript: &'a TranscriptModel,
    /// Transcript-space projection, present for variants within one exon
    pub exonic: Option<&'a ExonicVariant>,
}

impl<'a> BuildInput<'a> {
    fn exonic(&self) -> Result<&'a ExonicVariant, AnnotateError> {
        self.exonic.ok_or_else(|| {
            AnnotateError::coordinate(format!(
                "{} does not lie within a single exon of {}",
                self.variant,
                self.transcript.accession()
            ))
        })
    }

    fn annotation(&self, effect: VariantEffect) -> Annotation {
        Annotation {
            transcript: self.transcript.accession().to_string(),
            gene_symbol: self.transcript.gene_symbol().to_string(),
            effect,
            genomic_change: self.genomic_change(),
            cds_change: None,
            protein_change: None,
            codon_change: None,
            messages: self.exonic.and_then(|e| e.mismatch.clone()).into_iter().collect(),
        }
    }

    /// `contig:g.` string; exonic indels report their shifted position
    fn genomic_change(&self) -> String {
        match self.exonic.and_then(|e| e.genomic_change(self.transcript)) {
            Some(change) => format!("{}:{}", self.variant.contig(), change),
            None => self.variant.genomic_change(),
        }
    }

    /// Protein string for non-coding regions of a coding transcript
    fn positional_protein(&self, change: ProteinChange) -> Option<String> {
        self.transcript.is_coding().then(|| change.to_string())
    }
}

/// Run `builder` on `input`
pub fn build(builder: Builder, input: &BuildInput<'_>) -> Result<Annotation, AnnotateError> {
    match builder {
        Builder::Snv | Builder::Insertion | Builder::Deletion | Builder::Delins => {
            build_coding(builder, input)
        }
        Builder::Splice(site) => build_splice(site, input),
        Builder::Utr(side) => build_utr(side, input),
        Builder::Intronic => build_intronic(input),
        Builder::Noncoding => build_noncoding(input),
        Builder::Intergenic => Ok(input.annotation(VariantEffect::Intergenic)),
    }
}

fn build_coding(builder: Builder, input: &BuildInput<'_>) -> Result<Annotation, AnnotateError> {
    let exonic = input.exonic()?;
    let prediction = predict(exonic, input.transcript);

    let mut annotation = input.annotation(prediction.effect);
    annotation.cds_change = Some(exonic.change(input.transcript).to_string());
    annotation.protein_change = Some(prediction.change.to_string());
    if builder == Builder::Snv {
        annotation.codon_change = codon_change(exonic, input.transcript);
    }
    if prediction.incomplete {
        annotation.messages.push(AnnotationMessage::IncompleteTranslation);
    }
    Ok(annotation)
}

fn build_utr(side: UtrSide, input: &BuildInput<'_>) -> Result<Annotation, AnnotateError> {
    let exonic = input.exonic()?;
    let effect = match side {
        UtrSide::FivePrime => VariantEffect::FivePrimeUtr,
        UtrSide::ThreePrime => VariantEffect::ThreePrimeUtr,
    };
    let mut annotation = input.annotation(effect);
    annotation.cds_change = Some(exonic.change(input.transcript).to_string());
    annotation.protein_change = input.positional_protein(ProteinChange::Unchanged);
    Ok(annotation)
}

fn build_noncoding(input: &BuildInput<'_>) -> Result<Annotation, AnnotateError> {
    let exonic = input.exonic()?;
    let mut annotation = input.annotation(VariantEffect::NoncodingExon);
    annotation.cds_change = Some(exonic.change(input.transcript).to_string());
    Ok(annotation)
}

fn build_intronic(input: &BuildInput<'_>) -> Result<Annotation, AnnotateError> {
    let mut annotation = input.annotation(VariantEffect::Intronic);
    annotation.cds_change = Some(span_change(input.variant, input.transcript)?.to_string());
    annotation.protein_change = input.positional_protein(ProteinChange::Unchanged);
    Ok(annotation)
}

fn build_splice(site: SpliceSite, input: &BuildInput<'_>) -> Result<Annotation, AnnotateError> {
    let mut annotation = input.annotation(VariantEffect::splice(site));
    annotation.cds_change = Some(span_change(input.variant, input.transcript)?.to_string());
    annotation.protein_change = input.positional_protein(ProteinChange::Unknown);
    Ok(annotation)
}
