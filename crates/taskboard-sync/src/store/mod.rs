pub mod atomic_writer;
pub mod json_file_remote;

pub use atomic_writer::AtomicWriter;
pub use json_file_remote::{JsonEnvelope, JsonFileRemote, FORMAT_VERSION};
