//! Projection of genomic coordinates onto a transcript
//!
//! Exons are stored in genomic order. For a base at forward cumulative offset
//! `f` (its offset into the concatenated exons), the transcript offset is `f`
//! on the plus strand and `L - 1 - f` on the minus strand, `L` being the
//! transcript length. Boundaries between bases flip as `L - f`.

use serde::{Deserialize, Serialize};

use crate::coords::Strand;
use crate::hgvs::position::{PosAnchor, TxPos};
use crate::reference::transcript::TranscriptModel;

/// Where a single genomic base falls on a transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxProjection {
    /// In an exon, at this transcript offset
    Exonic(u64),
    /// In an intron, `offset` bases from the exon base at transcript offset `anchor`
    Intronic { anchor: u64, offset: i64 },
    /// Outside the transcript span
    Outside,
}

/// A transcript offset expressed relative to the CDS
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CdsProjection {
    /// Bases upstream of the first CDS base (>= 1)
    Utr5(u64),
    /// 0-based offset into the CDS
    Cds(u64),
    /// Bases downstream of the last CDS base (>= 1)
    Utr3(u64),
    /// Noncoding transcript; 0-based transcript offset
    Noncoding(u64),
}

/// Splice site type of a window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpliceSite {
    /// 5' end of an intron in transcript orientation
    Donor,
    /// 3' end of an intron in transcript orientation
    Acceptor,
}

/// Intronic bases adjacent to an exon boundary (0-based half-open, genomic)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpliceWindow {
    pub start: u64,
    pub end: u64,
    pub site: SpliceSite,
    /// Intron number in transcript order, 1-based
    pub intron: usize,
}

impl SpliceWindow {
    /// Whether the window shares a base with `[start, end)`.
    ///
    /// An empty interval (insertion point) must fall strictly inside the
    /// window; an insertion at the window edge touches it without entering.
    pub fn intersects(&self, start: u64, end: u64) -> bool {
        if start == end {
            self.start < start && start < self.end
        } else {
            start < self.end && self.start < end
        }
    }
}

impl TranscriptModel {
    /// Index of the exon containing the base at 0-based `pos`
    pub fn exon_index(&self, pos: u64) -> Option<usize> {
        let exons = self.exons();
        let idx = exons.partition_point(|e| e.end <= pos);
        exons.get(idx).filter(|e| e.contains(pos)).map(|_| idx)
    }

    fn forward_offset(&self, idx: usize, pos: u64) -> u64 {
        self.exon_offsets()[idx] + (pos - self.exons()[idx].start)
    }

    /// Transcript offset of an exonic base
    pub fn base_to_tx(&self, pos: u64) -> Option<u64> {
        let idx = self.exon_index(pos)?;
        let fwd = self.forward_offset(idx, pos);
        Some(match self.strand() {
            Strand::Plus => fwd,
            Strand::Minus => self.len() - 1 - fwd,
        })
    }

    /// Transcript boundary for a genomic boundary lying in or at the edge of an exon
    pub fn boundary_to_tx(&self, b: u64) -> Option<u64> {
        let idx = self.exons().iter().position(|e| e.touches_boundary(b))?;
        let fwd = self.forward_offset(idx, b);
        Some(match self.strand() {
            Strand::Plus => fwd,
            Strand::Minus => self.len() - fwd,
        })
    }

    /// Project a genomic half-open interval lying within a single exon.
    ///
    /// Empty intervals (insertion points) may sit on the exon edges.
    pub fn interval_to_tx(&self, start: u64, end: u64) -> Option<(u64, u64)> {
        let exon = self
            .exons()
            .iter()
            .find(|e| e.touches_boundary(start) && e.touches_boundary(end))?;
        if start > end || (start < end && !(exon.contains(start) && end <= exon.end)) {
            return None;
        }
        let a = self.boundary_to_tx(start)?;
        let b = self.boundary_to_tx(end)?;
        Some((a.min(b), a.max(b)))
    }

    /// Project a single genomic base
    pub fn project_base(&self, pos: u64) -> TxProjection {
        if let Some(t) = self.base_to_tx(pos) {
            return TxProjection::Exonic(t);
        }
        let exons = self.exons();
        let idx = exons.partition_point(|e| e.end <= pos);
        if idx == 0 || idx >= exons.len() {
            return TxProjection::Outside;
        }
        let (left, right) = (exons[idx - 1], exons[idx]);
        let from_left = pos - (left.end - 1);
        let from_right = right.start - pos;

        // (upstream anchor base, distance), (downstream anchor base, distance)
        let (up, down) = match self.strand() {
            Strand::Plus => ((left.end - 1, from_left), (right.start, from_right)),
            Strand::Minus => ((right.start, from_right), (left.end - 1, from_left)),
        };
        let (anchor_base, offset) = if up.1 <= down.1 {
            (up.0, up.1 as i64)
        } else {
            (down.0, -(down.1 as i64))
        };
        match self.base_to_tx(anchor_base) {
            Some(anchor) => TxProjection::Intronic { anchor, offset },
            None => TxProjection::Outside,
        }
    }

    /// Express a transcript offset relative to the CDS
    pub fn tx_to_cds(&self, t: u64) -> CdsProjection {
        if !self.is_coding() {
            CdsProjection::Noncoding(t)
        } else if t < self.cds_start() {
            CdsProjection::Utr5(self.cds_start() - t)
        } else if t < self.cds_end() {
            CdsProjection::Cds(t - self.cds_start())
        } else {
            CdsProjection::Utr3(t - self.cds_end() + 1)
        }
    }

    /// Position of transcript offset `t` as written in `c.`/`n.` descriptions
    pub fn tx_pos(&self, t: u64, offset: i64) -> TxPos {
        match self.tx_to_cds(t) {
            CdsProjection::Utr5(d) => TxPos::new(PosAnchor::FivePrimeUtr, d, offset),
            CdsProjection::Cds(c) => TxPos::new(PosAnchor::Cds, c + 1, offset),
            CdsProjection::Utr3(d) => TxPos::new(PosAnchor::ThreePrimeUtr, d, offset),
            CdsProjection::Noncoding(t) => TxPos::new(PosAnchor::Transcript, t + 1, offset),
        }
    }

    /// `c.`/`n.` position of a genomic base, if it lies within the transcript span
    pub fn genomic_tx_pos(&self, pos: u64) -> Option<TxPos> {
        match self.project_base(pos) {
            TxProjection::Exonic(t) => Some(self.tx_pos(t, 0)),
            TxProjection::Intronic { anchor, offset } => Some(self.tx_pos(anchor, offset)),
            TxProjection::Outside => None,
        }
    }

    /// Description prefix: `c` for coding transcripts, `n` otherwise
    pub fn coordinate_prefix(&self) -> char {
        if self.is_coding() {
            'c'
        } else {
            'n'
        }
    }

    /// Transcript-space bounds `[start, end)` of the exon at genomic index `idx`
    pub fn exon_tx_bounds(&self, idx: usize) -> Option<(u64, u64)> {
        let exon = self.exons().get(idx)?;
        let fwd = self.exon_offsets()[idx];
        Some(match self.strand() {
            Strand::Plus => (fwd, fwd + exon.len()),
            Strand::Minus => (self.len() - fwd - exon.len(), self.len() - fwd),
        })
    }

    /// Genomic boundary for transcript boundary `t` lying in or at the edge of
    /// the exon at genomic index `idx`
    pub fn tx_boundary_to_genomic(&self, idx: usize, t: u64) -> Option<u64> {
        let exon = self.exons().get(idx)?;
        let fwd = match self.strand() {
            Strand::Plus => t,
            Strand::Minus => self.len().checked_sub(t)?,
        };
        let offset = fwd.checked_sub(self.exon_offsets()[idx])?;
        (offset <= exon.len()).then(|| exon.start + offset)
    }

    /// Transcript-space bounds `[start, end)` of the exon holding `[ts, te)`
    pub fn exon_bounds(&self, ts: u64, te: u64) -> Option<(u64, u64)> {
        (0..self.exons().len())
            .filter_map(|idx| self.exon_tx_bounds(idx))
            .find(|&(a, b)| a <= ts && te <= b)
    }

    /// Donor and acceptor windows of `width` intronic bases at every exon boundary
    pub fn splice_windows(&self, width: u64) -> Vec<SpliceWindow> {
        let introns = self.introns();
        let n = introns.len();
        let mut windows = Vec::with_capacity(n * 2);
        if width == 0 {
            return windows;
        }
        for (i, (start, end)) in introns.into_iter().enumerate() {
            let (five, three, number) = match self.strand() {
                Strand::Plus => (SpliceSite::Donor, SpliceSite::Acceptor, i + 1),
                Strand::Minus => (SpliceSite::Acceptor, SpliceSite::Donor, n - i),
            };
            windows.push(SpliceWindow {
                start,
                end: (start + width).min(end),
                site: five,
                intron: number,
            });
            windows.push(SpliceWindow {
                start: end.saturating_sub(width).max(start),
                end,
                site: three,
                intron: number,
            });
        }
        windows
    }

    /// Splice site of the first exon/intron boundary strictly inside `[start, end)`,
    /// in transcript order
    pub fn crossed_boundary(&self, start: u64, end: u64) -> Option<SpliceSite> {
        let mut crossed: Vec<(u64, SpliceSite)> = Vec::new();
        for (left, right) in self.introns() {
            if start < left && left < end {
                let site = match self.strand() {
                    Strand::Plus => SpliceSite::Donor,
                    Strand::Minus => SpliceSite::Acceptor,
                };
                crossed.push((left, site));
            }
            if start < right && right < end {
                let site = match self.strand() {
                    Strand::Plus => SpliceSite::Acceptor,
                    Strand::Minus => SpliceSite::Donor,
                };
                crossed.push((right, site));
            }
        }
        match self.strand() {
            Strand::Plus => crossed.first().map(|&(_, s)| s),
            Strand::Minus => crossed.last().map(|&(_, s)| s),
        }
    }

    /// Codon index and bases for a 0-based CDS offset, read from the spliced sequence
    pub fn codon_at(&self, cds_offset: u64) -> Option<(u64, &str)> {
        let index = cds_offset / 3;
        let start = self.cds_start() + index * 3;
        let end = start + 3;
        if end > self.cds_end() {
            return None;
        }
        self.subsequence(start, end).map(|codon| (index, codon))
    }
}
