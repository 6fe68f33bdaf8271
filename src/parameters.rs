mod date_pattern;
mod file_pattern;
mod periodicity;
mod retention;
mod rotation;
mod size_bound;

pub use date_pattern::DatePattern;
pub use file_pattern::FilePattern;
pub use periodicity::Periodicity;
pub use retention::Retention;
pub use rotation::Rotation;
pub use size_bound::parse_size_bound;

pub(crate) use size_bound::clamp_size_bound;
