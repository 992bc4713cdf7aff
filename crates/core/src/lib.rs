pub mod audio;
pub mod grammar;
pub mod pipeline;
pub mod recognition;
pub mod shared;
pub mod subtitle;
