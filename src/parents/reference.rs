use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::utils::errors::ReadWriteError;

/// A gene of the reference annotation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReferenceGene {
    pub id: String,
    pub name: String,
    pub biotype: Option<String>,
}

/// Lookup of reference gene ids to their common names
///
/// The database is a tab-separated table with the columns
/// `GeneId`, `GeneName` and an optional `GeneBiotype`. A header line
/// starting with `GeneId` and `#` comments are ignored.
///
/// # Examples
///
/// ```rust
/// use genechunk::parents::ReferenceGeneDb;
///
/// let table = "GeneId\tGeneName\tGeneBiotype\nENSG01\tBRCA2\tprotein_coding\nENSG02\tTP53\n";
/// let db = ReferenceGeneDb::from_reader(table.as_bytes()).unwrap();
/// assert_eq!(db.len(), 2);
/// assert_eq!(db.name("ENSG01"), Some("BRCA2"));
/// assert_eq!(db.get("ENSG02").unwrap().biotype, None);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ReferenceGeneDb {
    genes: HashMap<String, ReferenceGene>,
}

impl ReferenceGeneDb {
    pub fn new() -> Self {
        ReferenceGeneDb {
            genes: HashMap::new(),
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ReadWriteError> {
        match File::open(path.as_ref()) {
            Ok(file) => Self::from_reader(file),
            Err(err) => Err(ReadWriteError::new(format!(
                "unable to open reference gene table {}: {}",
                path.as_ref().display(),
                err
            ))),
        }
    }

    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self, ReadWriteError> {
        let mut db = ReferenceGeneDb::new();
        for (idx, line) in BufReader::new(reader).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            let cols: Vec<&str> = line.split('\t').collect();
            if cols[0] == "GeneId" {
                continue;
            }
            if cols.len() < 2 {
                return Err(ReadWriteError::new(format!(
                    "line {} of the reference gene table has no gene name: {}",
                    idx + 1,
                    line
                )));
            }
            db.insert(ReferenceGene {
                id: cols[0].to_string(),
                name: cols[1].to_string(),
                biotype: cols.get(2).map(|biotype| biotype.to_string()),
            });
        }
        Ok(db)
    }

    pub fn insert(&mut self, gene: ReferenceGene) {
        self.genes.insert(gene.id.clone(), gene);
    }

    pub fn get(&self, gene_id: &str) -> Option<&ReferenceGene> {
        self.genes.get(gene_id)
    }

    /// Common name of a gene
    pub fn name(&self, gene_id: &str) -> Option<&str> {
        self.genes.get(gene_id).map(|gene| gene.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }
}
