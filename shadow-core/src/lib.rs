//! shadow-core: data model, text normalization, locale dates and export for Shadow Hours

pub mod dates;
pub mod entry;
pub mod error;
pub mod export;
pub mod normalize;

pub use dates::{month_from_name, parse_date_header};
pub use entry::{MatchedEntry, OutputRecord, ReferenceRecord, TimeEntry, UNMAPPED};
pub use error::{Result, ShadowError};
pub use export::to_output_records;
pub use normalize::normalize;
