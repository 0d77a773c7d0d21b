use std::error::Error;
use std::fmt;

/// Generic error for everything that does not have a more specific error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneChunkError {
    message: String,
}

impl GeneChunkError {
    pub fn new<S: fmt::Display>(message: S) -> GeneChunkError {
        GeneChunkError {
            message: message.to_string(),
        }
    }
}

impl Error for GeneChunkError {}

impl fmt::Display for GeneChunkError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl From<String> for GeneChunkError {
    fn from(message: String) -> Self {
        GeneChunkError { message }
    }
}

impl From<&str> for GeneChunkError {
    fn from(message: &str) -> Self {
        GeneChunkError::new(message)
    }
}

/// A GTF line or a group of GTF lines could not be parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseGtfError {
    pub message: String,
}

impl ParseGtfError {
    pub fn new<S: fmt::Display>(message: S) -> ParseGtfError {
        ParseGtfError {
            message: message.to_string(),
        }
    }
}

impl Error for ParseGtfError {}

impl fmt::Display for ParseGtfError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// A GenePred line could not be parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseGenePredError {
    pub message: String,
}

impl ParseGenePredError {
    pub fn new<S: fmt::Display>(message: S) -> ParseGenePredError {
        ParseGenePredError {
            message: message.to_string(),
        }
    }
}

impl Error for ParseGenePredError {}

impl fmt::Display for ParseGenePredError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// A [`Transcript`](crate::models::Transcript) could not be built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildTranscriptError {
    pub message: String,
}

impl BuildTranscriptError {
    pub fn new<S: fmt::Display>(message: S) -> BuildTranscriptError {
        BuildTranscriptError {
            message: message.to_string(),
        }
    }
}

impl Error for BuildTranscriptError {}

impl fmt::Display for BuildTranscriptError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Invalid chunk geometry or an otherwise unusable configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationError {
    pub message: String,
}

impl ConfigurationError {
    pub fn new<S: fmt::Display>(message: S) -> ConfigurationError {
        ConfigurationError {
            message: message.to_string(),
        }
    }
}

impl Error for ConfigurationError {}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// The external predictor failed on a chunk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionError {
    pub message: String,
}

impl PredictionError {
    pub fn new<S: fmt::Display>(message: S) -> PredictionError {
        PredictionError {
            message: message.to_string(),
        }
    }
}

impl Error for PredictionError {}

impl fmt::Display for PredictionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// The per-genome join of chunk predictions failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeError {
    pub message: String,
}

impl MergeError {
    pub fn new<S: fmt::Display>(message: S) -> MergeError {
        MergeError {
            message: message.to_string(),
        }
    }
}

impl Error for MergeError {}

impl fmt::Display for MergeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// A genome did not receive a single chunk prediction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyInputError {
    pub message: String,
}

impl EmptyInputError {
    pub fn new<S: fmt::Display>(message: S) -> EmptyInputError {
        EmptyInputError {
            message: message.to_string(),
        }
    }
}

impl Error for EmptyInputError {}

impl fmt::Display for EmptyInputError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// The parent gene assignment failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentAssignmentError {
    pub message: String,
}

impl ParentAssignmentError {
    pub fn new<S: fmt::Display>(message: S) -> ParentAssignmentError {
        ParentAssignmentError {
            message: message.to_string(),
        }
    }
}

impl Error for ParentAssignmentError {}

impl fmt::Display for ParentAssignmentError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// An external program could not be started or exited unsuccessfully
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessError {
    pub message: String,
}

impl ProcessError {
    pub fn new<S: fmt::Display>(message: S) -> ProcessError {
        ProcessError {
            message: message.to_string(),
        }
    }
}

impl Error for ProcessError {}

impl fmt::Display for ProcessError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// A blob could not be written to or read from the blob store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError {
    pub message: String,
}

impl StoreError {
    pub fn new<S: fmt::Display>(message: S) -> StoreError {
        StoreError {
            message: message.to_string(),
        }
    }
}

impl Error for StoreError {}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Error reading or writing any of the supported file formats
#[derive(Debug)]
pub struct ReadWriteError {
    message: String,
}

impl ReadWriteError {
    pub fn new<S: fmt::Display>(message: S) -> ReadWriteError {
        ReadWriteError {
            message: message.to_string(),
        }
    }
}

impl Error for ReadWriteError {}

impl fmt::Display for ReadWriteError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl From<std::io::Error> for ReadWriteError {
    fn from(err: std::io::Error) -> Self {
        ReadWriteError::new(err)
    }
}

impl From<ParseGtfError> for ReadWriteError {
    fn from(err: ParseGtfError) -> Self {
        ReadWriteError::new(err.message)
    }
}

impl From<ParseGenePredError> for ReadWriteError {
    fn from(err: ParseGenePredError) -> Self {
        ReadWriteError::new(err.message)
    }
}

impl From<BuildTranscriptError> for ReadWriteError {
    fn from(err: BuildTranscriptError) -> Self {
        ReadWriteError::new(err.message)
    }
}

impl From<std::io::Error> for ConfigurationError {
    fn from(err: std::io::Error) -> Self {
        ConfigurationError::new(err)
    }
}

impl From<serde_json::Error> for ConfigurationError {
    fn from(err: serde_json::Error) -> Self {
        ConfigurationError::new(format!("invalid configuration: {}", err))
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::new(err)
    }
}

impl From<ProcessError> for PredictionError {
    fn from(err: ProcessError) -> Self {
        PredictionError::new(err.message)
    }
}

impl From<ReadWriteError> for PredictionError {
    fn from(err: ReadWriteError) -> Self {
        PredictionError::new(err)
    }
}

impl From<StoreError> for PredictionError {
    fn from(err: StoreError) -> Self {
        PredictionError::new(err.message)
    }
}

impl From<std::io::Error> for PredictionError {
    fn from(err: std::io::Error) -> Self {
        PredictionError::new(err)
    }
}

impl From<ProcessError> for MergeError {
    fn from(err: ProcessError) -> Self {
        MergeError::new(err.message)
    }
}

impl From<ReadWriteError> for MergeError {
    fn from(err: ReadWriteError) -> Self {
        MergeError::new(err)
    }
}

impl From<ParseGtfError> for MergeError {
    fn from(err: ParseGtfError) -> Self {
        MergeError::new(err.message)
    }
}

impl From<std::io::Error> for MergeError {
    fn from(err: std::io::Error) -> Self {
        MergeError::new(err)
    }
}

impl From<ReadWriteError> for ParentAssignmentError {
    fn from(err: ReadWriteError) -> Self {
        ParentAssignmentError::new(err)
    }
}

impl From<ParseGtfError> for ParentAssignmentError {
    fn from(err: ParseGtfError) -> Self {
        ParentAssignmentError::new(err.message)
    }
}

/// Terminal error of a single genome's pipeline
///
/// A genome either finishes with a complete output or with exactly one
/// of these causes. Errors of one genome never affect another genome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    Configuration(ConfigurationError),
    Prediction(PredictionError),
    Merge(MergeError),
    EmptyInput(EmptyInputError),
    ParentAssignment(ParentAssignmentError),
}

impl Error for PipelineError {}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PipelineError::Configuration(err) => write!(f, "configuration error: {}", err),
            PipelineError::Prediction(err) => write!(f, "prediction error: {}", err),
            PipelineError::Merge(err) => write!(f, "merge error: {}", err),
            PipelineError::EmptyInput(err) => write!(f, "empty input: {}", err),
            PipelineError::ParentAssignment(err) => {
                write!(f, "parent assignment error: {}", err)
            }
        }
    }
}

impl From<ConfigurationError> for PipelineError {
    fn from(err: ConfigurationError) -> Self {
        PipelineError::Configuration(err)
    }
}

impl From<PredictionError> for PipelineError {
    fn from(err: PredictionError) -> Self {
        PipelineError::Prediction(err)
    }
}

impl From<MergeError> for PipelineError {
    fn from(err: MergeError) -> Self {
        PipelineError::Merge(err)
    }
}

impl From<EmptyInputError> for PipelineError {
    fn from(err: EmptyInputError) -> Self {
        PipelineError::EmptyInput(err)
    }
}

impl From<ParentAssignmentError> for PipelineError {
    fn from(err: ParentAssignmentError) -> Self {
        PipelineError::ParentAssignment(err)
    }
}

impl From<StoreError> for PipelineError {
    fn from(err: StoreError) -> Self {
        PipelineError::Merge(MergeError::new(err.message))
    }
}
