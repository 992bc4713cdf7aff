pub mod align_cues_use_case;
pub mod align_error;
pub mod alignment_reporter;
