pub mod derived;
pub mod position;

pub use derived::{DerivedPosition, LevelType};
pub use position::{OptionKind, PositionRow};
