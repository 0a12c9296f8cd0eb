use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("config error: {0}")]
    Config(String),

    #[error("registry error: {0}")]
    Registry(#[from] sigil_registry::RegistryError),

    #[error("store error: {0}")]
    Store(#[from] sigil_store::StoreError),

    #[error("codec error: {0}")]
    Codec(#[from] sigil_codec::CodecError),

    #[error("coef error: {0}")]
    Coef(#[from] sigil_coef::CoefError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SdkResult<T> = Result<T, SdkError>;
