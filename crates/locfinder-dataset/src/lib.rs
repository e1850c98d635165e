pub mod client;
pub mod convert;
pub mod decode;
pub mod error;
pub mod retry;
pub mod source;

pub use client::DatasetClient;
pub use convert::{convert_csv_file, csv_to_records};
pub use decode::{decode_locations, DecodedDataset};
pub use error::DatasetError;
pub use source::DatasetSource;
