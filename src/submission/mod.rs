pub mod blocklist;
pub mod fields;
pub mod heuristics;
pub mod honeypot;
pub mod metadata;
pub mod parser;
pub mod pipeline;
pub mod validators;
