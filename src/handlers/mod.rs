pub mod drills;
pub mod words;
