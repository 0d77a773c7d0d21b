use std::path::{Path, PathBuf};

use crate::models::GenomicInterval;
use crate::process::ExternalCommand;

/// `halStats --tree`: the phylogenetic tree of a HAL alignment in NEWICK format
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HalStatsTree {
    pub binary: PathBuf,
    pub hal: PathBuf,
}

impl HalStatsTree {
    /// The tree is written to stdout, redirected into `output`
    pub fn command(&self, output: &Path) -> ExternalCommand {
        ExternalCommand::new(&self.binary)
            .arg("--tree")
            .arg(path_arg(&self.hal))
            .stdout_file(output)
    }
}

/// `hal2maf`: exports one chunk of the reference genome as MAF alignment
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hal2Maf {
    pub binary: PathBuf,
    pub hal: PathBuf,
    pub ref_genome: String,
    pub chunk: GenomicInterval,
    pub output: PathBuf,
}

impl Hal2Maf {
    pub fn command(&self) -> ExternalCommand {
        ExternalCommand::new(&self.binary)
            .args(["--noAncestors", "--noDupes", "--refGenome"])
            .arg(self.ref_genome.as_str())
            .arg("--refSequence")
            .arg(self.chunk.seq_id())
            .arg("--start")
            .arg(self.chunk.start().to_string())
            .arg("--length")
            .arg(self.chunk.length().to_string())
            .arg(path_arg(&self.hal))
            .arg(path_arg(&self.output))
    }
}

/// Comparative gene prediction on an alignment chunk (AugustusCGP)
///
/// AUGUSTUS writes one `<genome>.cgp.gff` file per genome into `outdir`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AugustusCgp {
    pub binary: PathBuf,
    pub extrinsic_cfg: PathBuf,
    pub species: String,
    pub tree: PathBuf,
    pub alignment: PathBuf,
    pub hints_db: PathBuf,
    pub genome_fofn: PathBuf,
    pub outdir: PathBuf,
    pub param_file: PathBuf,
}

impl AugustusCgp {
    pub fn command(&self) -> ExternalCommand {
        ExternalCommand::new(&self.binary)
            .args([
                "--dbhints=1",
                "--UTR=1",
                "--allow_hinted_splicesites=atac",
            ])
            .arg(format!("--extrinsicCfgFile={}", self.extrinsic_cfg.display()))
            .arg(format!("--species={}", self.species))
            .arg(format!("--treefile={}", self.tree.display()))
            .arg(format!("--alnfile={}", self.alignment.display()))
            .arg(format!("--dbaccess={}", self.hints_db.display()))
            .arg(format!("--speciesfilenames={}", self.genome_fofn.display()))
            .args([
                "--softmasking=1",
                "--exoncands=0",
                "--alternatives-from-evidence=0",
                "--/CompPred/logreg=on",
                "--printOEs=false",
            ])
            .arg(format!("--/CompPred/outdir={}", self.outdir.display()))
            .arg(format!("--optCfgFile={}", self.param_file.display()))
            .workdir(&self.outdir)
    }
}

/// Single-genome gene prediction with hints (AugustusPB)
///
/// `coordinate_offset` is the start of the chunk on its sequence. AUGUSTUS
/// adds it to all predicted coordinates, so the output refers to the full
/// sequence and not to the chunk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AugustusPb {
    pub binary: PathBuf,
    pub hints: PathBuf,
    pub extrinsic_cfg: PathBuf,
    pub species: String,
    pub coordinate_offset: u64,
    pub fasta: PathBuf,
    pub output: PathBuf,
}

impl AugustusPb {
    pub fn command(&self) -> ExternalCommand {
        ExternalCommand::new(&self.binary)
            .args([
                "--UTR=1",
                "--softmasking=1",
                "--allow_hinted_splicesites=atac",
                "--alternatives-from-evidence=1",
            ])
            .arg(format!("--hintsfile={}", self.hints.display()))
            .arg(format!("--extrinsicCfgFile={}", self.extrinsic_cfg.display()))
            .arg(format!("--species={}", self.species))
            .arg(format!("--predictionStart=-{}", self.coordinate_offset))
            .arg(format!("--predictionEnd=-{}", self.coordinate_offset))
            .arg(path_arg(&self.fasta))
            .stdout_file(&self.output)
    }
}

fn path_arg(path: &Path) -> String {
    path.display().to_string()
}

#[cfg(test)]
mod test_commands {
    use super::*;

    #[test]
    fn test_hal2maf() {
        let cmd = Hal2Maf {
            binary: "hal2maf".into(),
            hal: "aln.hal".into(),
            ref_genome: "hg38".to_string(),
            chunk: GenomicInterval::new("chr1", 250, 300).unwrap(),
            output: "chunk.maf".into(),
        }
        .command();
        assert_eq!(
            cmd.to_string(),
            "hal2maf --noAncestors --noDupes --refGenome hg38 --refSequence chr1 \
             --start 250 --length 300 aln.hal chunk.maf"
        );
    }

    #[test]
    fn test_augustus_pb_offset() {
        let cmd = AugustusPb {
            binary: "augustus".into(),
            hints: "hints.gff".into(),
            extrinsic_cfg: "pb.cfg".into(),
            species: "human".to_string(),
            coordinate_offset: 2_000_000,
            fasta: "chunk.fa".into(),
            output: "out.gtf".into(),
        }
        .command();
        let args = cmd.get_args();
        assert!(args.contains(&"--predictionStart=-2000000".to_string()));
        assert!(args.contains(&"--predictionEnd=-2000000".to_string()));
        assert_eq!(args.last().unwrap(), "chunk.fa");
        assert_eq!(args[0], "--UTR=1");
    }

    #[test]
    fn test_augustus_pb_zero_offset() {
        let cmd = AugustusPb {
            binary: "augustus".into(),
            hints: "hints.gff".into(),
            extrinsic_cfg: "pb.cfg".into(),
            species: "human".to_string(),
            coordinate_offset: 0,
            fasta: "chunk.fa".into(),
            output: "out.gtf".into(),
        }
        .command();
        assert!(cmd.get_args().contains(&"--predictionStart=-0".to_string()));
    }

    #[test]
    fn test_augustus_cgp() {
        let cmd = AugustusCgp {
            binary: "/opt/augustus/bin/augustus".into(),
            extrinsic_cfg: "cgp.cfg".into(),
            species: "human".to_string(),
            tree: "tree.nwk".into(),
            alignment: "chunk.maf".into(),
            hints_db: "hints.db".into(),
            genome_fofn: "genomes.tsv".into(),
            outdir: "/tmp/chunk".into(),
            param_file: "cgp.param".into(),
        }
        .command();
        let args = cmd.get_args();
        assert_eq!(cmd.program(), Path::new("/opt/augustus/bin/augustus"));
        assert!(args.contains(&"--/CompPred/outdir=/tmp/chunk".to_string()));
        assert!(args.contains(&"--speciesfilenames=genomes.tsv".to_string()));
        assert!(args.contains(&"--optCfgFile=cgp.param".to_string()));
        assert_eq!(args.len(), 16);
    }

    #[test]
    fn test_hal_stats() {
        let cmd = HalStatsTree {
            binary: "halStats".into(),
            hal: "aln.hal".into(),
        }
        .command(Path::new("tree.nwk"));
        assert_eq!(cmd.to_string(), "halStats --tree aln.hal");
    }
}
