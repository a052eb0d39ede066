use crate::table::Column;
use thiserror::Error;

/// Why a preparer could not produce its output.
///
/// `Ok(vec![])` from a preparer means "no data"; an `Err` of this type means
/// the input had the wrong shape. Callers assembling a layout log the error
/// and fall back to an empty series instead of aborting.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PrepareError {
    #[error("missing required columns: {}", join_columns(.0))]
    MissingColumns(Vec<Column>),

    #[error("no input rows for {0}")]
    EmptyInput(&'static str),

    #[error("monitoring data is not loaded")]
    NotLoaded,

    #[error("feature provider failed: {0}")]
    Provider(String),
}

fn join_columns(columns: &[Column]) -> String {
    columns
        .iter()
        .map(|c| c.name())
        .collect::<Vec<_>>()
        .join(", ")
}
