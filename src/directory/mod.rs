pub mod api;
pub mod client;
pub mod error;
pub mod http;
pub mod types;

pub use api::DirectoryApi;
pub use client::DirectoryClient;
pub use error::DirectoryError;
pub use http::HttpDirectory;
pub use types::{GroupId, GroupPage, RawSessionDetail, Session, SessionDetail, SessionId, SessionRecord};
