pub mod selector;

pub use selector::{check_answer, select_drill_words};
