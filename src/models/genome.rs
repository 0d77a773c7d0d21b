use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::utils::errors::ConfigurationError;

/// Identifier of a genome (e.g. `hg38`, `mm10`)
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GenomeId(String);

impl GenomeId {
    pub fn new<S: Into<String>>(id: S) -> Self {
        GenomeId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GenomeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for GenomeId {
    fn from(id: &str) -> Self {
        GenomeId::new(id)
    }
}

impl AsRef<str> for GenomeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The set of genomes that take part in a run
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GenomeSet {
    genomes: BTreeSet<GenomeId>,
}

impl GenomeSet {
    pub fn new<I, G>(genomes: I) -> Self
    where
        I: IntoIterator<Item = G>,
        G: Into<GenomeId>,
    {
        GenomeSet {
            genomes: genomes.into_iter().map(|g| g.into()).collect(),
        }
    }

    pub fn contains(&self, genome: &GenomeId) -> bool {
        self.genomes.contains(genome)
    }

    pub fn len(&self) -> usize {
        self.genomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genomes.is_empty()
    }

    pub fn iter(&self) -> std::collections::btree_set::Iter<'_, GenomeId> {
        self.genomes.iter()
    }
}

/// A mapping from genome to a value, restricted to a known [`GenomeSet`]
///
/// Inserting a genome that is not part of the set is an error, so a
/// typo in a genome name surfaces immediately instead of silently
/// producing a missing output.
///
/// # Examples
///
/// ```rust
/// use genechunk::models::{GenomeId, GenomeMap, GenomeSet};
///
/// let genomes = GenomeSet::new(["hg38", "mm10"]);
/// let mut fasta = GenomeMap::new(&genomes);
/// fasta.insert(GenomeId::from("hg38"), "hg38.fa").unwrap();
///
/// assert!(fasta.insert(GenomeId::from("rn6"), "rn6.fa").is_err());
/// assert_eq!(fasta.missing(), vec![&GenomeId::from("mm10")]);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct GenomeMap<T> {
    genomes: GenomeSet,
    entries: BTreeMap<GenomeId, T>,
}

impl<T> GenomeMap<T> {
    pub fn new(genomes: &GenomeSet) -> Self {
        GenomeMap {
            genomes: genomes.clone(),
            entries: BTreeMap::new(),
        }
    }

    /// Builds a map from key-value pairs, validating every key
    pub fn from_entries<I, G>(genomes: &GenomeSet, entries: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = (G, T)>,
        G: Into<GenomeId>,
    {
        let mut map = GenomeMap::new(genomes);
        for (genome, value) in entries {
            map.insert(genome.into(), value)?;
        }
        Ok(map)
    }

    pub fn insert(&mut self, genome: GenomeId, value: T) -> Result<Option<T>, ConfigurationError> {
        if !self.genomes.contains(&genome) {
            return Err(ConfigurationError::new(format!(
                "genome {} is not part of this run",
                genome
            )));
        }
        Ok(self.entries.insert(genome, value))
    }

    pub fn get(&self, genome: &GenomeId) -> Option<&T> {
        self.entries.get(genome)
    }

    pub fn remove(&mut self, genome: &GenomeId) -> Option<T> {
        self.entries.remove(genome)
    }

    pub fn contains_key(&self, genome: &GenomeId) -> bool {
        self.entries.contains_key(genome)
    }

    pub fn genomes(&self) -> &GenomeSet {
        &self.genomes
    }

    /// Genomes of the set without an entry
    pub fn missing(&self) -> Vec<&GenomeId> {
        self.genomes
            .iter()
            .filter(|g| !self.entries.contains_key(*g))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::collections::btree_map::Iter<'_, GenomeId, T> {
        self.entries.iter()
    }
}

impl<T> IntoIterator for GenomeMap<T> {
    type Item = (GenomeId, T);
    type IntoIter = std::collections::btree_map::IntoIter<GenomeId, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod test_genome {
    use super::*;

    #[test]
    fn test_from_entries_validates() {
        let genomes = GenomeSet::new(["hg38", "mm10"]);
        let map = GenomeMap::from_entries(&genomes, [("hg38", 1), ("mm10", 2)]).unwrap();
        assert_eq!(map.get(&GenomeId::from("mm10")), Some(&2));
        assert!(map.missing().is_empty());

        let err = GenomeMap::from_entries(&genomes, [("galGal4", 1)]).unwrap_err();
        assert_eq!(err.message, "genome galGal4 is not part of this run");
    }

    #[test]
    fn test_iteration_is_sorted() {
        let genomes = GenomeSet::new(["rn6", "hg38", "mm10"]);
        let ids: Vec<&str> = genomes.iter().map(|g| g.as_str()).collect();
        assert_eq!(ids, vec!["hg38", "mm10", "rn6"]);
    }
}
