//! Spaced repetition: per-item review state and the SM-2 derived scheduler.

pub mod scheduler;
pub mod state;

pub use scheduler::{
    calculate_interval, mastery_score, process_review, quality_for, updated_ease_factor,
};
pub use state::{MasteryBand, SrsState};
