pub mod audio_reader;
pub mod sample_buffer;
pub mod sample_window;
