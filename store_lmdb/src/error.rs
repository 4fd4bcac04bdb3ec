use thiserror::Error;

#[derive(Debug, Error)]
pub enum LmdbError {
    #[error("LMDB error: {0}")]
    Heed(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("record decode error: {0}")]
    Decode(String),
}

impl From<heed::Error> for LmdbError {
    fn from(e: heed::Error) -> Self {
        LmdbError::Heed(e.to_string())
    }
}

impl From<std::io::Error> for LmdbError {
    fn from(e: std::io::Error) -> Self {
        LmdbError::Io(e.to_string())
    }
}

impl From<Box<bincode::ErrorKind>> for LmdbError {
    fn from(e: Box<bincode::ErrorKind>) -> Self {
        LmdbError::Decode(e.to_string())
    }
}

impl From<LmdbError> for chaindiff_store::StoreError {
    fn from(e: LmdbError) -> Self {
        match e {
            // An undecodable stored record means the database itself is bad.
            LmdbError::Decode(msg) => chaindiff_store::StoreError::Corruption(msg),
            other => chaindiff_store::StoreError::Backend(other.to_string()),
        }
    }
}
