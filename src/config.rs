//! Run configuration
//!
//! Both prediction modes are configured from JSON files. Only the inputs
//! are mandatory, everything else has a default:
//!
//! | Key | Default |
//! | --- | --- |
//! | `geometry.chunk_size` | 2 500 000 |
//! | `geometry.overlap` | 500 000 |
//! | `assignment.min_distance` | 0.9 |
//! | `threads` | 1 |
//! | `joiner` | `"joingenes"` |
//! | `normalize` | `false` for AugustusCGP, `true` for AugustusPB |
//! | `binaries` | `augustus`, `joingenes`, `hal2maf`, `halStats` from `PATH` |
//!
//! ```rust
//! use genechunk::config::PbConfig;
//!
//! let json = r#"{
//!     "genome": "hg38",
//!     "fasta": "hg38.fa",
//!     "hints": "hints.gff",
//!     "species": "human",
//!     "extrinsic_cfg": "extrinsic.ESTPB.cfg",
//!     "store": "blobs",
//!     "assignment": {
//!         "reference_gene_db": "genes.tsv",
//!         "prior_models": {"hg38": {"filtered": "f.gp", "unfiltered": "u.gp"}}
//!     },
//!     "geometry": {"chunk_size": 1000000, "overlap": 200000}
//! }"#;
//! let config = PbConfig::from_reader(json.as_bytes()).unwrap();
//! assert_eq!(config.geometry.overlap, 200_000);
//! assert_eq!(config.threads, 1);
//! assert!(config.normalize);
//! assert_eq!(config.assignment.min_distance, 0.9);
//! ```
use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::chunks::validate_geometry;
use crate::models::{GenomeId, GenomeMap, GenomeSet};
use crate::parents::DEFAULT_MIN_DISTANCE;
use crate::utils::errors::ConfigurationError;

pub const DEFAULT_CHUNK_SIZE: u64 = 2_500_000;
pub const DEFAULT_OVERLAP: u64 = 500_000;

/// Size and overlap of the chunks
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkGeometry {
    pub chunk_size: u64,
    pub overlap: u64,
}

impl Default for ChunkGeometry {
    fn default() -> Self {
        ChunkGeometry {
            chunk_size: DEFAULT_CHUNK_SIZE,
            overlap: DEFAULT_OVERLAP,
        }
    }
}

impl ChunkGeometry {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        validate_geometry(self.chunk_size, self.overlap)
    }
}

/// Paths of the external programs
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Binaries {
    pub augustus: PathBuf,
    pub joingenes: PathBuf,
    pub hal2maf: PathBuf,
    pub hal_stats: PathBuf,
}

impl Default for Binaries {
    fn default() -> Self {
        Binaries {
            augustus: "augustus".into(),
            joingenes: "joingenes".into(),
            hal2maf: "hal2maf".into(),
            hal_stats: "halStats".into(),
        }
    }
}

/// Which back-end joins the chunk predictions of a genome
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinerKind {
    /// The `joingenes` program of the AUGUSTUS package
    Joingenes,
    /// The in-process joiner
    Native,
}

impl Default for JoinerKind {
    fn default() -> Self {
        JoinerKind::Joingenes
    }
}

/// Previously computed gene models of one genome, as GenePred
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorModels {
    pub filtered: PathBuf,
    pub unfiltered: PathBuf,
}

/// Inputs of the parent gene assignment
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AssignmentConfig {
    /// `GeneId<TAB>GeneName[<TAB>GeneBiotype]` table of the reference annotation
    pub reference_gene_db: PathBuf,
    pub prior_models: BTreeMap<String, PriorModels>,
    #[serde(default = "default_min_distance")]
    pub min_distance: f64,
}

impl AssignmentConfig {
    pub fn validate(&self, genomes: &GenomeSet) -> Result<(), ConfigurationError> {
        if !(0.0..=1.0).contains(&self.min_distance) {
            return Err(ConfigurationError::new(format!(
                "min_distance must be between 0 and 1, got {}",
                self.min_distance
            )));
        }
        self.priors(genomes).map(|_| ())
    }

    /// Prior gene models of every genome of the run
    pub fn priors(&self, genomes: &GenomeSet) -> Result<GenomeMap<PriorModels>, ConfigurationError> {
        complete_map(genomes, &self.prior_models, "prior gene models")
    }
}

/// Configuration of comparative prediction on a HAL alignment
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CgpConfig {
    pub hal: PathBuf,
    /// Reference genome of the alignment, its sequences are chunked
    pub ref_genome: String,
    /// `sequence_id<TAB>length` table of the reference genome
    pub sequence_sizes: PathBuf,
    pub species: String,
    pub extrinsic_cfg: PathBuf,
    pub param_file: PathBuf,
    pub hints_db: PathBuf,
    pub genomes: Vec<String>,
    /// Genome FASTA file of every genome
    pub fasta: BTreeMap<String, PathBuf>,
    pub assignment: AssignmentConfig,
    /// Directory of the blob store
    pub store: PathBuf,
    #[serde(default)]
    pub geometry: ChunkGeometry,
    #[serde(default)]
    pub binaries: Binaries,
    #[serde(default)]
    pub joiner: JoinerKind,
    #[serde(default = "default_threads")]
    pub threads: usize,
    #[serde(default)]
    pub normalize: bool,
}

impl CgpConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigurationError> {
        Self::from_reader(open(path.as_ref())?)
    }

    /// Parses and validates the configuration
    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self, ConfigurationError> {
        let config: CgpConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.geometry.validate()?;
        validate_threads(self.threads)?;
        if self.genomes.is_empty() {
            return Err(ConfigurationError::new("no genomes configured"));
        }
        let genomes = self.genome_set();
        self.fasta_files()?;
        self.assignment.validate(&genomes)
    }

    pub fn genome_set(&self) -> GenomeSet {
        GenomeSet::new(self.genomes.iter().map(|g| g.as_str()))
    }

    pub fn fasta_files(&self) -> Result<GenomeMap<PathBuf>, ConfigurationError> {
        complete_map(&self.genome_set(), &self.fasta, "FASTA file")
    }
}

/// Configuration of single-genome prediction with hints
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PbConfig {
    pub genome: String,
    pub fasta: PathBuf,
    /// GFF file of hints
    pub hints: PathBuf,
    pub species: String,
    pub extrinsic_cfg: PathBuf,
    pub assignment: AssignmentConfig,
    /// Directory of the blob store
    pub store: PathBuf,
    #[serde(default)]
    pub geometry: ChunkGeometry,
    #[serde(default)]
    pub binaries: Binaries,
    #[serde(default)]
    pub joiner: JoinerKind,
    #[serde(default = "default_threads")]
    pub threads: usize,
    #[serde(default = "default_true")]
    pub normalize: bool,
}

impl PbConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigurationError> {
        Self::from_reader(open(path.as_ref())?)
    }

    /// Parses and validates the configuration
    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self, ConfigurationError> {
        let config: PbConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.geometry.validate()?;
        validate_threads(self.threads)?;
        self.assignment.validate(&self.genome_set())
    }

    pub fn genome_id(&self) -> GenomeId {
        GenomeId::new(self.genome.as_str())
    }

    pub fn genome_set(&self) -> GenomeSet {
        GenomeSet::new([self.genome.as_str()])
    }
}

fn complete_map<T: Clone>(
    genomes: &GenomeSet,
    entries: &BTreeMap<String, T>,
    what: &str,
) -> Result<GenomeMap<T>, ConfigurationError> {
    let map = GenomeMap::from_entries(
        genomes,
        entries.iter().map(|(genome, value)| (genome.as_str(), value.clone())),
    )?;
    let missing = map.missing();
    if !missing.is_empty() {
        return Err(ConfigurationError::new(format!(
            "no {} for genome(s) {}",
            what,
            missing
                .iter()
                .map(|g| g.as_str())
                .collect::<Vec<&str>>()
                .join(", ")
        )));
    }
    Ok(map)
}

fn validate_threads(threads: usize) -> Result<(), ConfigurationError> {
    if threads == 0 {
        return Err(ConfigurationError::new("at least one thread is required"));
    }
    Ok(())
}

fn open(path: &Path) -> Result<File, ConfigurationError> {
    File::open(path).map_err(|err| {
        ConfigurationError::new(format!("unable to open {}: {}", path.display(), err))
    })
}

fn default_min_distance() -> f64 {
    DEFAULT_MIN_DISTANCE
}

fn default_threads() -> usize {
    1
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod test_config {
    use super::*;

    fn cgp_json(genomes: &str, overlap: u64) -> String {
        format!(
            r#"{{
                "hal": "aln.hal",
                "ref_genome": "hg38",
                "sequence_sizes": "hg38.sizes",
                "species": "human",
                "extrinsic_cfg": "cgp.cfg",
                "param_file": "cgp.param",
                "hints_db": "hints.db",
                "genomes": {},
                "fasta": {{"hg38": "hg38.fa", "mm10": "mm10.fa"}},
                "store": "blobs",
                "assignment": {{
                    "reference_gene_db": "genes.tsv",
                    "prior_models": {{
                        "hg38": {{"filtered": "hg38.f.gp", "unfiltered": "hg38.u.gp"}},
                        "mm10": {{"filtered": "mm10.f.gp", "unfiltered": "mm10.u.gp"}}
                    }}
                }},
                "geometry": {{"chunk_size": 1000, "overlap": {}}},
                "joiner": "native",
                "threads": 4
            }}"#,
            genomes, overlap
        )
    }

    #[test]
    fn test_cgp_defaults() {
        let config = CgpConfig::from_reader(cgp_json(r#"["hg38", "mm10"]"#, 100).as_bytes()).unwrap();
        assert!(!config.normalize);
        assert_eq!(config.joiner, JoinerKind::Native);
        assert_eq!(config.binaries.hal_stats, PathBuf::from("halStats"));
        assert_eq!(config.fasta_files().unwrap().len(), 2);
        assert_eq!(config.assignment.min_distance, DEFAULT_MIN_DISTANCE);
    }

    #[test]
    fn test_invalid_geometry() {
        let err = CgpConfig::from_reader(cgp_json(r#"["hg38"]"#, 1000).as_bytes()).unwrap_err();
        assert!(err.message.contains("overlap"));
    }

    #[test]
    fn test_missing_fasta() {
        let err = CgpConfig::from_reader(cgp_json(r#"["hg38", "mm10", "rn6"]"#, 100).as_bytes())
            .unwrap_err();
        // rn6 has neither FASTA file nor prior models
        assert_eq!(err.message, "no FASTA file for genome(s) rn6");
    }

    #[test]
    fn test_unknown_genome_entry() {
        // mm10 has a FASTA file, but is not part of the run
        let err = CgpConfig::from_reader(cgp_json(r#"["hg38"]"#, 100).as_bytes()).unwrap_err();
        assert!(err.message.contains("mm10"));
    }

    #[test]
    fn test_default_geometry() {
        let geometry = ChunkGeometry::default();
        assert_eq!(geometry.chunk_size, 2_500_000);
        assert_eq!(geometry.overlap, 500_000);
        assert!(geometry.validate().is_ok());
    }

    #[test]
    fn test_invalid_json() {
        let err = PbConfig::from_reader("{\"genome\": 3}".as_bytes()).unwrap_err();
        assert!(err.message.starts_with("invalid configuration"));
    }

    #[test]
    fn test_missing_file() {
        assert!(PbConfig::from_file("tests/data/missing.json").is_err());
    }
}
