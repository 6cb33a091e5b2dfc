mod parser;
mod path;

pub use parser::{parse_index, ChapterEntry, FileRef};
pub use path::{decode_path, encode_path};
