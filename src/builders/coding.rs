//! Codon-level consequence of a variant inside the CDS
//!
//! The mutated transcript is translated from the CDS start until the first
//! stop codon and compared with the reference peptide:
//!
//! 1. A change touching the initiation codon that alters it is a start loss.
//! 2. Identical peptides are synonymous, unless the net length change shifts
//!    the frame past the stop; that is still a frameshift.
//! 3. A first difference at the reference stop is a stop loss with an
//!    extension to the next in-frame stop.
//! 4. A net length change that is not a multiple of three is a frameshift,
//!    reported from the first changed residue to the new stop.
//! 5. Anything else is an in-frame change, reduced to its minimal range.

use crate::effect::VariantEffect;
use crate::hgvs::{first_divergence, format_inframe, minimal_diff, ProteinChange, ProteinPos};
use crate::reference::TranscriptModel;
use crate::translate::{AminoAcid, CodonTable};
use crate::variant::VariantKind;

use super::ExonicVariant;

/// Predicted protein consequence of a CDS variant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProteinPrediction {
    pub effect: VariantEffect,
    pub change: ProteinChange,
    /// The reference stop was lost and no new stop was found before the
    /// transcript ends
    pub incomplete: bool,
}

impl ProteinPrediction {
    fn new(effect: VariantEffect, change: ProteinChange) -> Self {
        Self {
            effect,
            change,
            incomplete: false,
        }
    }
}

fn pos_at(peptide: &[AminoAcid], idx: usize) -> ProteinPos {
    ProteinPos::new(
        peptide.get(idx).copied().unwrap_or(AminoAcid::Xaa),
        idx as u64 + 1,
    )
}

/// Effect of an in-frame change given only its net length
fn inframe_effect(kind: VariantKind, net: i64) -> VariantEffect {
    match kind {
        VariantKind::Insertion => VariantEffect::InframeInsertion,
        VariantKind::Deletion => VariantEffect::InframeDeletion,
        _ if net > 0 => VariantEffect::InframeInsertion,
        _ if net < 0 => VariantEffect::InframeDeletion,
        _ => VariantEffect::Missense,
    }
}

/// Whether the variant changes the amino acid encoded by the initiation codon
fn alters_start(variant: &ExonicVariant, mutated: &[u8], cds_start: usize, first: Option<AminoAcid>) -> bool {
    let (start, cs) = (variant.start as usize, cds_start);
    if start < cs {
        return true;
    }
    let overlaps = if variant.is_insertion() {
        cs < start && start < cs + 3
    } else {
        start < cs + 3
    };
    if !overlaps {
        return false;
    }
    match mutated.get(cs..cs + 3) {
        Some(codon) => Some(CodonTable::shared().translate_codon(codon)) != first,
        None => true,
    }
}

/// Predict the protein change of a variant overlapping the CDS
pub fn predict(variant: &ExonicVariant, transcript: &TranscriptModel) -> ProteinPrediction {
    let table = CodonTable::shared();
    let seq = transcript.sequence().as_bytes();
    let (cs, ce) = (transcript.cds_start() as usize, transcript.cds_end() as usize);
    let mutated = variant.apply(transcript);

    let (reference, ref_stop) = table.translate_to_stop(&seq[cs..ce]);
    if alters_start(variant, &mutated, cs, reference.first().copied()) {
        return ProteinPrediction::new(VariantEffect::StartLost, ProteinChange::StartLoss);
    }
    let (alternate, alt_stop) = table.translate_to_stop(mutated.get(cs..).unwrap_or_default());

    let net = variant.net_length();
    let frameshift = net % 3 != 0;
    let fallback = if frameshift {
        VariantEffect::Frameshift
    } else {
        inframe_effect(variant.kind, net)
    };

    // an in-frame change keeps the reference stop in place
    let keeps_length = !frameshift && alternate.len() as i64 == reference.len() as i64 + net / 3;

    let (effect, change) = match first_divergence(&reference, &alternate) {
        // the peptide survives, but the reading frame downstream does not
        None if frameshift => (VariantEffect::Frameshift, ProteinChange::Unchanged),
        None => (VariantEffect::Synonymous, ProteinChange::Unchanged),
        // one peptide is a prefix of the other: translation ran off the transcript
        Some(i) if i >= reference.len() || i >= alternate.len() => {
            let effect = if !frameshift && reference.get(i).is_some_and(|aa| aa.is_stop()) {
                VariantEffect::StopLost
            } else {
                fallback
            };
            (effect, ProteinChange::Unknown)
        }
        Some(i) if reference[i].is_stop() => (
            VariantEffect::StopLost,
            ProteinChange::Extension {
                at: pos_at(&reference, i),
                alternate: alternate[i],
                stop: alt_stop.then(|| (alternate.len() - 1 - i) as u64),
            },
        ),
        Some(i) if frameshift => {
            let change = if alternate[i].is_stop() {
                ProteinChange::Substitution {
                    at: pos_at(&reference, i),
                    alternate: AminoAcid::Ter,
                }
            } else {
                ProteinChange::Frameshift {
                    at: pos_at(&reference, i),
                    alternate: alternate[i],
                    stop: alt_stop.then(|| (alternate.len() - i) as u64),
                }
            };
            (VariantEffect::Frameshift, change)
        }
        // a deletion ending at the stop moves the reference stop forward
        Some(i) if alternate[i].is_stop() && !(alt_stop && keeps_length) => (
            VariantEffect::StopGained,
            ProteinChange::Substitution {
                at: pos_at(&reference, i),
                alternate: AminoAcid::Ter,
            },
        ),
        Some(_) if !alt_stop => (fallback, ProteinChange::Unknown),
        // in frame, but the new peptide stops before the expected length
        Some(i) if (alternate.len() as i64) < reference.len() as i64 + net / 3 => {
            let j = alternate.len() - 1;
            let inserted = alternate[i..=j].to_vec();
            // last reference residue replaced by alternate[i..=j]
            let replaced = j as i64 - net / 3;
            let change = if replaced < i as i64 && i > 0 {
                ProteinChange::Insertion {
                    left: pos_at(&reference, i - 1),
                    right: pos_at(&reference, i),
                    inserted,
                }
            } else {
                let last = (replaced.max(i as i64) as usize).min(reference.len() - 1);
                ProteinChange::Delins {
                    start: pos_at(&reference, i),
                    end: (last > i).then(|| pos_at(&reference, last)),
                    inserted,
                }
            };
            (VariantEffect::StopGained, change)
        }
        Some(_) => match minimal_diff(&reference, &alternate) {
            Some(diff) => {
                let effect = match diff.alt_len().cmp(&diff.ref_len()) {
                    std::cmp::Ordering::Greater => VariantEffect::InframeInsertion,
                    std::cmp::Ordering::Less => VariantEffect::InframeDeletion,
                    std::cmp::Ordering::Equal => VariantEffect::Missense,
                };
                (effect, format_inframe(&reference, &alternate, diff))
            }
            None => (VariantEffect::Synonymous, ProteinChange::Unchanged),
        },
    };

    ProteinPrediction {
        effect,
        change,
        incomplete: ref_stop && !alt_stop,
    }
}

/// Reference and alternate codon of a CDS substitution, changed base in upper
/// case: `cGc/cAc`
pub fn codon_change(variant: &ExonicVariant, transcript: &TranscriptModel) -> Option<String> {
    if variant.kind != VariantKind::Snv {
        return None;
    }
    let offset = variant.start.checked_sub(transcript.cds_start())?;
    let (_, codon) = transcript.codon_at(offset)?;
    let at = (offset % 3) as usize;
    let mut alternate = codon.to_string();
    alternate.replace_range(at..at + 1, &variant.alternate);

    let render = |c: &str| -> String {
        c.chars()
            .enumerate()
            .map(|(k, ch)| {
                if k == at {
                    ch.to_ascii_uppercase()
                } else {
                    ch.to_ascii_lowercase()
                }
            })
            .collect()
    };
    Some(format!("{}/{}", render(codon), render(&alternate)))
}
