pub mod assets;
pub mod generation;
pub mod poller;
pub mod prediction;
pub mod prompts;
