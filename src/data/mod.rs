//! Loading of the two source documents.

pub mod source;

pub use source::{
    load_dataset, Dataset, DatasetSource, FileDatasetSource, BASE_FILE, EPISODES_FILE,
};
