pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("view rejected an update of {full_name}: {message}")]
    ViewRejected { full_name: String, message: String },

    #[error("invalid name filter {pattern:?}")]
    InvalidNameFilter {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("unknown node: {full_name}")]
    UnknownNode { full_name: String },

    #[error("update queue closed before the task completed")]
    QueueClosed,

    #[error(transparent)]
    Geometry(#[from] nautilus_geom::Error),
}
