pub mod engine;
pub mod header;
pub mod mapper;
pub mod tokenizer;
pub mod writer;

pub use crate::domain::model::{
    CellValue, ColumnKind, ColumnSchema, MapOutcome, ParseOutcome, TypedRecord,
};
pub use crate::utils::error::Result;
