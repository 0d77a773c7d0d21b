use core::str::FromStr;
use std::fmt;

use crate::models::Strand;
use crate::utils::errors::ParseGtfError;

/// The attribute column of a GTF line
///
/// Attributes keep their order. Values without a key (AUGUSTUS writes
/// bare identifiers on `gene` and `transcript` lines) are stored with an
/// empty key and written back verbatim.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Attributes {
    items: Vec<(String, String)>,
}

impl Attributes {
    pub fn new() -> Self {
        Attributes::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.items
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Sets the value of `key`, replacing an existing value or appending it
    pub fn set<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        let key = key.into();
        let value = value.into();
        match self.items.iter_mut().find(|(k, _)| *k == key) {
            Some(item) => item.1 = value,
            None => self.items.push((key, value)),
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, (String, String)> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, (String, String)> {
        self.items.iter_mut()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromStr for Attributes {
    type Err = ParseGtfError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut attributes = Attributes::new();
        for item in s.split(';') {
            let item = item.trim();
            if item.is_empty() {
                continue;
            }
            match item.split_once(' ') {
                Some((key, value)) => {
                    let value = value.trim().trim_matches('"');
                    attributes.items.push((key.to_string(), value.to_string()))
                }
                None => attributes.items.push((String::new(), item.to_string())),
            }
        }
        Ok(attributes)
    }
}

impl fmt::Display for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let parts: Vec<String> = self
            .items
            .iter()
            .map(|(key, value)| {
                if key.is_empty() {
                    value.to_string()
                } else {
                    format!("{} \"{}\";", key, value)
                }
            })
            .collect();
        write!(f, "{}", parts.join(" "))
    }
}

/// A single line of a GTF file
///
/// Coordinates are 1-based and inclusive, as in the file.
///
/// # Examples
///
/// ```rust
/// use genechunk::gtf::GtfRecord;
///
/// let line = "chr1\tAUGUSTUS\tCDS\t101\t200\t0.9\t+\t0\ttranscript_id \"g1.t1\"; gene_id \"g1\";";
/// let record: GtfRecord = line.parse().unwrap();
/// assert_eq!(record.feature(), "CDS");
/// assert_eq!(record.transcript_id(), Some("g1.t1"));
/// assert_eq!(record.to_string(), line);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GtfRecord {
    seqname: String,
    source: String,
    feature: String,
    start: u32,
    end: u32,
    score: String,
    strand: Strand,
    frame: String,
    attributes: Attributes,
}

impl GtfRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        seqname: &str,
        source: &str,
        feature: &str,
        start: u32,
        end: u32,
        strand: Strand,
        frame: Option<u8>,
        attributes: Attributes,
    ) -> Self {
        GtfRecord {
            seqname: seqname.to_string(),
            source: source.to_string(),
            feature: feature.to_string(),
            start,
            end,
            score: ".".to_string(),
            strand,
            frame: frame.map_or(".".to_string(), |f| f.to_string()),
            attributes,
        }
    }

    pub fn seqname(&self) -> &str {
        &self.seqname
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn set_source<S: Into<String>>(&mut self, source: S) {
        self.source = source.into()
    }

    pub fn feature(&self) -> &str {
        &self.feature
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn end(&self) -> u32 {
        self.end
    }

    pub fn score(&self) -> &str {
        &self.score
    }

    pub fn strand(&self) -> Strand {
        self.strand
    }

    /// The frame column, `None` for `.`
    pub fn frame(&self) -> Option<u8> {
        self.frame.parse().ok()
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }

    pub fn transcript_id(&self) -> Option<&str> {
        self.attributes.get("transcript_id")
    }

    pub fn gene_id(&self) -> Option<&str> {
        self.attributes.get("gene_id")
    }
}

impl FromStr for GtfRecord {
    type Err = ParseGtfError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cols: Vec<&str> = s.trim_end_matches(['\n', '\r']).split('\t').collect();
        if cols.len() < 8 {
            return Err(ParseGtfError::new(format!(
                "expected 9 columns, found {}: {}",
                cols.len(),
                s
            )));
        }
        let start: u32 = cols[3]
            .parse()
            .map_err(|_| ParseGtfError::new(format!("invalid start position {}", cols[3])))?;
        let end: u32 = cols[4]
            .parse()
            .map_err(|_| ParseGtfError::new(format!("invalid end position {}", cols[4])))?;
        if end < start {
            return Err(ParseGtfError::new(format!(
                "feature ends before it starts: {}",
                s
            )));
        }
        let strand = Strand::from_str(cols[6]).map_err(|err| ParseGtfError::new(err))?;
        let attributes = match cols.get(8) {
            Some(col) => Attributes::from_str(col)?,
            None => Attributes::new(),
        };
        Ok(GtfRecord {
            seqname: cols[0].to_string(),
            source: cols[1].to_string(),
            feature: cols[2].to_string(),
            start,
            end,
            score: cols[5].to_string(),
            strand,
            frame: cols[7].to_string(),
            attributes,
        })
    }
}

impl fmt::Display for GtfRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            self.seqname,
            self.source,
            self.feature,
            self.start,
            self.end,
            self.score,
            self.strand,
            self.frame,
            self.attributes
        )
    }
}

#[cfg(test)]
mod test_record {
    use super::*;

    #[test]
    fn test_bare_attribute() {
        let line = "chr1\tAUGUSTUS\ttranscript\t101\t500\t0.4\t-\t.\tg1.t1";
        let record = GtfRecord::from_str(line).unwrap();
        assert_eq!(record.transcript_id(), None);
        assert_eq!(record.strand(), Strand::Minus);
        assert_eq!(record.frame(), None);
        assert_eq!(record.to_string(), line);
    }

    #[test]
    fn test_set_attribute() {
        let mut attributes = Attributes::from_str("gene_id \"g1\"; transcript_id \"g1.t1\";").unwrap();
        attributes.set("transcript_id", "jg1.t1");
        attributes.set("source_gene", "ENSG01");
        assert_eq!(
            attributes.to_string(),
            "gene_id \"g1\"; transcript_id \"jg1.t1\"; source_gene \"ENSG01\";"
        );
    }

    #[test]
    fn test_invalid_lines() {
        assert!(GtfRecord::from_str("chr1\tAUGUSTUS\texon").is_err());
        assert!(GtfRecord::from_str("chr1\tA\texon\tx\t10\t.\t+\t.\t").is_err());
        assert!(GtfRecord::from_str("chr1\tA\texon\t20\t10\t.\t+\t.\t").is_err());
        assert!(GtfRecord::from_str("chr1\tA\texon\t10\t20\t.\tX\t.\t").is_err());
    }
}
