pub mod due;
pub mod review;
pub mod words;
