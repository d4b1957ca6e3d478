pub mod drills;
