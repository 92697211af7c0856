use crate::argon2id::{HashError, ParamError};

#[derive(Debug, thiserror::Error)]
pub enum AphError {
    #[error("provided stamp was malformed: '{0}'")]
    MalformedStamp(String),

    #[error("cannot use fractional value with type: '{0}'")]
    SplitAtomicUnit(String),

    #[error("invalid parameter: {0}")]
    Parameter(#[from] ParamError),

    #[error("hashing failed: {0}")]
    Hashing(#[from] HashError),

    #[error("{0}")]
    Usage(&'static str),

    #[error("{name} must be a plain integer, got '{value}'")]
    InvalidInteger { name: &'static str, value: String },

    #[error("argument {position} is not valid UTF-8")]
    InvalidArgument { position: usize },
}

impl AphError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedStamp(_) => "malformed_stamp",
            Self::SplitAtomicUnit(_) => "split_atomic_unit",
            Self::Parameter(_) => "parameter",
            Self::Hashing(_) => "hashing",
            Self::Usage(_) | Self::InvalidInteger { .. } | Self::InvalidArgument { .. } => "usage",
        }
    }

    /// Usage mistakes get the usage line printed after the message.
    pub fn wants_usage(&self) -> bool {
        matches!(self, Self::Usage(_) | Self::InvalidInteger { .. })
    }
}
