pub mod csv;

pub use self::csv::{RecordReader, RecordWriter, HEADERS};
