use thiserror::Error;
use vetclinic_client::ApiError;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{}", .0)]
    Custom(String),

    #[error("IO::{:?}: {}", .0, .0)]
    Io(#[from] std::io::Error),

    #[error("FlexiLogger::{:?}: {}", .0, .0)]
    FlexiLogger(#[from] flexi_logger::FlexiLoggerError),

    #[error("{}", .0.user_message())]
    Api(#[from] ApiError),

    #[error("Json: {}", .0)]
    Json(#[from] serde_json::Error),
}
