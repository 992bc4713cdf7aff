pub mod markup;
pub mod parser_factory;
pub mod srt_parser;
pub mod timestamp;
pub mod vtt_parser;
