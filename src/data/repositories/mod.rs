pub mod word;

pub use word::WordRepository;
