//! Reference dictionary: canonical contig names, lengths and aliases.
//!
//! Handles the common spellings of human contigs:
//! - Ensembl: 1, 2, ..., X, Y, MT (the canonical form)
//! - UCSC: chr1, chr2, ..., chrX, chrY, chrM
//! - RefSeq: NC_000001.10 (GRCh37), NC_000001.11 (GRCh38)
//! - legacy numeric codes for the sex chromosomes and mitochondrion: 23, 24, 25

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

use crate::error::AnnotateError;

/// Genome build/assembly version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum GenomeBuild {
    /// GRCh37 / hg19
    #[default]
    GRCh37,
    /// GRCh38 / hg38
    GRCh38,
    /// Unknown build; no built-in contigs
    Unknown,
}

impl std::fmt::Display for GenomeBuild {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenomeBuild::GRCh37 => write!(f, "GRCh37"),
            GenomeBuild::GRCh38 => write!(f, "GRCh38"),
            GenomeBuild::Unknown => write!(f, "Unknown"),
        }
    }
}

impl FromStr for GenomeBuild {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "grch37" | "hg19" | "37" => Ok(GenomeBuild::GRCh37),
            "grch38" | "hg38" | "38" => Ok(GenomeBuild::GRCh38),
            "unknown" => Ok(GenomeBuild::Unknown),
            _ => Err(format!("Unknown genome build: {}", s)),
        }
    }
}

const GRCH37_LENGTHS: [u64; 22] = [
    249250621, 243199373, 198022430, 191154276, 180915260, 171115067, 159138663, 146364022,
    141213431, 135534747, 135006516, 133851895, 115169878, 107349540, 102531392, 90354753,
    81195210, 78077248, 59128983, 63025520, 48129895, 51304566,
];

const GRCH38_LENGTHS: [u64; 22] = [
    248956422, 242193529, 198295559, 190214555, 181538259, 170805979, 159345973, 145138636,
    138394717, 133797422, 135086622, 133275309, 114364328, 107043718, 101991189, 90338345,
    83257441, 80373285, 58617616, 64444167, 46709983, 50818468,
];

/// Contig names, lengths and accepted spellings for one assembly.
#[derive(Debug, Clone, Default)]
pub struct ReferenceDictionary {
    build: Option<GenomeBuild>,
    /// Canonical name -> length
    lengths: HashMap<String, u64>,
    /// Any accepted spelling -> canonical name
    aliases: HashMap<String, String>,
    /// Canonical names in insertion order
    order: Vec<String>,
}

impl ReferenceDictionary {
    /// Create an empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in human dictionary for a build. `Unknown` yields an empty one.
    pub fn for_build(build: GenomeBuild) -> Self {
        let mut dict = Self {
            build: Some(build),
            ..Self::default()
        };

        let (lengths, x, y, mt) = match build {
            GenomeBuild::GRCh37 => (&GRCH37_LENGTHS, 155270560, 59373566, 16571),
            GenomeBuild::GRCh38 => (&GRCH38_LENGTHS, 156040895, 57227415, 16569),
            GenomeBuild::Unknown => return dict,
        };

        for (i, len) in lengths.iter().enumerate() {
            let chr = (i + 1) as u32;
            let name = chr.to_string();
            dict.add_contig(&name, *len);
            dict.insert_alias(&format!("chr{}", chr), &name);
            dict.insert_alias(&refseq_accession(chr, build), &name);
        }

        dict.add_contig("X", x);
        dict.add_contig("Y", y);
        dict.add_contig("MT", mt);
        for (alias, canonical) in [
            ("chrX", "X"),
            ("23", "X"),
            ("chrY", "Y"),
            ("24", "Y"),
            ("M", "MT"),
            ("chrM", "MT"),
            ("chrMT", "MT"),
            ("25", "MT"),
            ("NC_012920.1", "MT"),
        ] {
            dict.insert_alias(alias, canonical);
        }
        dict.insert_alias(&refseq_accession(23, build), "X");
        dict.insert_alias(&refseq_accession(24, build), "Y");

        dict
    }

    /// The assembly this dictionary was built for, if any.
    pub fn build(&self) -> Option<GenomeBuild> {
        self.build
    }

    /// Register a canonical contig. Re-adding a contig updates its length.
    pub fn add_contig(&mut self, name: &str, length: u64) -> &mut Self {
        if self.lengths.insert(name.to_string(), length).is_none() {
            self.order.push(name.to_string());
        }
        self.insert_alias(name, name);
        self
    }

    /// Register an alternate spelling for an existing canonical contig.
    pub fn add_alias(&mut self, alias: &str, canonical: &str) -> Result<&mut Self, AnnotateError> {
        if !self.lengths.contains_key(canonical) {
            return Err(AnnotateError::unknown_contig(canonical));
        }
        self.insert_alias(alias, canonical);
        Ok(self)
    }

    fn insert_alias(&mut self, alias: &str, canonical: &str) {
        self.aliases.insert(alias.to_string(), canonical.to_string());
    }

    /// Canonical name for any accepted spelling.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.aliases.get(name).map(String::as_str)
    }

    /// Length of a contig, looked up by any accepted spelling.
    pub fn length(&self, name: &str) -> Option<u64> {
        self.resolve(name).and_then(|c| self.lengths.get(c).copied())
    }

    /// Canonical name and length, or `InvalidVariant` for unrecognized contigs.
    pub fn lookup(&self, name: &str) -> Result<(&str, u64), AnnotateError> {
        let canonical = self
            .resolve(name)
            .ok_or_else(|| AnnotateError::unknown_contig(name))?;
        let length = self
            .lengths
            .get(canonical)
            .copied()
            .ok_or_else(|| AnnotateError::unknown_contig(name))?;
        Ok((canonical, length))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.aliases.contains_key(name)
    }

    /// Canonical contig names in insertion order.
    pub fn contigs(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// RefSeq chromosome accession, e.g. `NC_000014.8` for GRCh37 chr14.
fn refseq_accession(chr: u32, build: GenomeBuild) -> String {
    let version = match build {
        GenomeBuild::GRCh37 => grch37_version(chr),
        _ => grch38_version(chr),
    };
    format!("NC_{:06}.{}", chr, version)
}

fn grch37_version(chr: u32) -> u32 {
    match chr {
        1 => 10,
        2..=4 => 11,
        5 => 9,
        6 => 11,
        7 => 13,
        8 => 10,
        9 => 11,
        10 => 10,
        11 => 9,
        12 => 11,
        13 => 10,
        14 => 8,
        15 | 16 => 9,
        17 => 10,
        18 | 19 => 9,
        20 => 10,
        21 => 8,
        22 => 10,
        23 => 10,
        24 => 9,
        _ => 1,
    }
}

fn grch38_version(chr: u32) -> u32 {
    match chr {
        1 => 11,
        2..=4 => 12,
        5 => 10,
        6 => 12,
        7 => 14,
        8 => 11,
        9 => 12,
        10 => 11,
        11 => 10,
        12 => 12,
        13 => 11,
        14 => 9,
        15 | 16 => 10,
        17 => 11,
        18 | 19 => 10,
        20 => 11,
        21 => 9,
        22 => 11,
        23 => 11,
        24 => 10,
        _ => 1,
    }
}
