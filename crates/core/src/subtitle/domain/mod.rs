pub mod subtitle_cue;
pub mod subtitle_parser;
