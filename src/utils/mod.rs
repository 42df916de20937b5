pub mod paths;
pub mod terminal;
pub mod timestamps;

pub use paths::{is_jsonl_path, read_to_string_limited, validate_file_size};
pub use terminal::{single_line, strip_ansi_codes};
pub use timestamps::{format_duration, parse_timestamp, parse_timestamp_value};
