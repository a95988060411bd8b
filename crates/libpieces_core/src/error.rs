use std::path::PathBuf;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid v2 piece length {0}: must be power of two and >= 16384")]
    V2InvalidPieceLength(u32),
    #[error("piece length must be positive")]
    ZeroPieceLength,
    #[error("piece built from zero blocks")]
    EmptyPiece,
    #[error("input with a total length of 0 is useless")]
    ZeroLengthInput,
    #[error("error opening {path:?}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("error reading {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("I/O error")]
    Io(#[from] std::io::Error),
}
