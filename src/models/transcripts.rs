use std::collections::HashMap;

use crate::models::Transcript;

/// A collection of [`Transcript`]s with lookup by name and by gene
///
/// Unlike a plain `HashMap`, `Transcripts` keeps the insertion order,
/// so iterating over transcripts or genes is deterministic.
///
/// # Examples
///
/// ```rust
/// use genechunk::models::Transcripts;
/// use genechunk::tests::transcripts::standard_transcript;
///
/// let mut transcripts = Transcripts::with_capacity(2);
/// transcripts.push(standard_transcript());
/// transcripts.push(standard_transcript());
///
/// assert_eq!(transcripts.len(), 2);
/// assert_eq!(transcripts.by_name("Test-Transcript").len(), 2);
/// assert_eq!(transcripts.genes(), vec!["Test-Gene"]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Transcripts {
    list: Vec<Transcript>,
    name: HashMap<String, Vec<usize>>,
    gene: HashMap<String, Vec<usize>>,
    gene_order: Vec<String>,
}

impl Transcripts {
    pub fn new() -> Self {
        Transcripts::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Transcripts {
            list: Vec::with_capacity(capacity),
            name: HashMap::with_capacity(capacity),
            gene: HashMap::with_capacity(capacity),
            gene_order: Vec::new(),
        }
    }

    pub fn push(&mut self, transcript: Transcript) {
        let idx = self.list.len();
        self.name
            .entry(transcript.name().to_string())
            .or_default()
            .push(idx);
        let gene = self.gene.entry(transcript.gene().to_string()).or_default();
        if gene.is_empty() {
            self.gene_order.push(transcript.gene().to_string());
        }
        gene.push(idx);
        self.list.push(transcript);
    }

    pub fn by_name(&self, name: &str) -> Vec<&Transcript> {
        match self.name.get(name) {
            Some(ids) => ids.iter().map(|idx| &self.list[*idx]).collect(),
            None => vec![],
        }
    }

    pub fn by_gene(&self, gene: &str) -> Vec<&Transcript> {
        match self.gene.get(gene) {
            Some(ids) => ids.iter().map(|idx| &self.list[*idx]).collect(),
            None => vec![],
        }
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.name.contains_key(name)
    }

    /// All gene names, in the order they were first added
    pub fn genes(&self) -> Vec<&str> {
        self.gene_order.iter().map(|g| g.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn as_vec(&self) -> &Vec<Transcript> {
        &self.list
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Transcript> {
        self.list.iter()
    }

    /// Sorts transcripts by chromosome, start, end and name
    ///
    /// Chromosomes are sorted lexicographically, which matches the
    /// order expected by coordinate-indexed downstream tools.
    pub fn sort(&mut self) {
        let mut list = std::mem::take(&mut self.list);
        list.sort_by(|a, b| {
            a.chrom()
                .cmp(b.chrom())
                .then(a.tx_start().cmp(&b.tx_start()))
                .then(a.tx_end().cmp(&b.tx_end()))
                .then(a.name().cmp(b.name()))
        });
        *self = list.into_iter().collect();
    }
}

impl IntoIterator for Transcripts {
    type Item = Transcript;
    type IntoIter = std::vec::IntoIter<Transcript>;

    fn into_iter(self) -> Self::IntoIter {
        self.list.into_iter()
    }
}

impl<'a> IntoIterator for &'a Transcripts {
    type Item = &'a Transcript;
    type IntoIter = std::slice::Iter<'a, Transcript>;

    fn into_iter(self) -> Self::IntoIter {
        self.list.iter()
    }
}

impl FromIterator<Transcript> for Transcripts {
    fn from_iter<I: IntoIterator<Item = Transcript>>(iter: I) -> Self {
        let mut transcripts = Transcripts::new();
        for tx in iter {
            transcripts.push(tx)
        }
        transcripts
    }
}
