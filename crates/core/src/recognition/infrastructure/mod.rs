pub mod whisper_decoder;
