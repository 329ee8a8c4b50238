#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("cannot enclose an empty set of circles")]
    NoCircles,

    #[error("no enclosing basis found for {count} circles")]
    DegenerateBasis { count: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
