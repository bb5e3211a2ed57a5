pub mod comment;
pub mod counters;
pub mod report;
pub mod timings;
