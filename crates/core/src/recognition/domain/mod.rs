pub mod decode_result;
pub mod decoder_config;
pub mod decoder_session;
pub mod speech_decoder;
