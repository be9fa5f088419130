//! Annotation results for a (variant, transcript) pair

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::effect::VariantEffect;
use crate::error::AnnotateError;

/// A recoverable problem found while building an annotation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnnotationMessage {
    /// Translation ran off the end of the transcript without a stop codon
    IncompleteTranslation,
    /// Stated reference allele differs from the transcript sequence
    SequenceMismatch {
        location: String,
        expected: String,
        found: String,
    },
}

impl AnnotationMessage {
    /// Error equivalent of this message for `transcript`
    pub fn to_error(&self, transcript: &str) -> AnnotateError {
        match self {
            AnnotationMessage::IncompleteTranslation => AnnotateError::IncompleteTranslation {
                transcript: transcript.to_string(),
            },
            AnnotationMessage::SequenceMismatch {
                location,
                expected,
                found,
            } => AnnotateError::SequenceMismatch {
                transcript: transcript.to_string(),
                location: location.clone(),
                expected: expected.clone(),
                found: found.clone(),
            },
        }
    }
}

impl fmt::Display for AnnotationMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnnotationMessage::IncompleteTranslation => write!(f, "incomplete_translation"),
            AnnotationMessage::SequenceMismatch {
                location,
                expected,
                found,
            } => write!(
                f,
                "sequence_mismatch({}: expected {}, found {})",
                location, expected, found
            ),
        }
    }
}

/// Consequence of one variant on one transcript
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Annotation {
    /// Transcript accession; empty for intergenic results
    pub transcript: String,
    pub gene_symbol: String,
    pub effect: VariantEffect,
    /// `contig:g.` description
    pub genomic_change: String,
    /// `c.`/`n.` description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cds_change: Option<String>,
    /// `p.` description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protein_change: Option<String>,
    /// Reference and alternate codon for single-codon substitutions, e.g. `cGc/cAc`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub codon_change: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<AnnotationMessage>,
}

impl Annotation {
    /// Annotation for a variant that overlaps no transcript
    pub fn intergenic(genomic_change: impl Into<String>) -> Self {
        Self {
            transcript: String::new(),
            gene_symbol: String::new(),
            effect: VariantEffect::Intergenic,
            genomic_change: genomic_change.into(),
            cds_change: None,
            protein_change: None,
            codon_change: None,
            messages: Vec::new(),
        }
    }

    /// Whether a recoverable problem makes this annotation uncertain
    pub fn is_uncertain(&self) -> bool {
        !self.messages.is_empty()
    }

    /// `transcript:c.` description, when a coding/noncoding change exists
    pub fn transcript_change(&self) -> Option<String> {
        self.cds_change
            .as_ref()
            .map(|c| format!("{}:{}", self.transcript, c))
    }

    /// Ordering key: most severe first, then accession
    pub fn severity_key(&self) -> (VariantEffect, &str) {
        (self.effect, self.transcript.as_str())
    }
}

/// Annotations of one variant across transcripts, most severe first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationList {
    annotations: Vec<Annotation>,
}

impl AnnotationList {
    pub fn new(mut annotations: Vec<Annotation>) -> Self {
        annotations.sort_by(|a, b| a.severity_key().cmp(&b.severity_key()));
        Self { annotations }
    }

    /// The most severe annotation
    pub fn highest(&self) -> Option<&Annotation> {
        self.annotations.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.annotations.iter()
    }

    pub fn as_slice(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    pub fn into_vec(self) -> Vec<Annotation> {
        self.annotations
    }
}

impl IntoIterator for AnnotationList {
    type Item = Annotation;
    type IntoIter = std::vec::IntoIter<Annotation>;

    fn into_iter(self) -> Self::IntoIter {
        self.annotations.into_iter()
    }
}
