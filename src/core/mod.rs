pub mod commands;
pub mod credentials;
pub mod export;
pub mod llm;
pub mod logging;
pub mod pipeline;
pub mod session;
