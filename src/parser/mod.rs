pub mod types;
pub mod vocabulary;
pub mod line;

pub use types::*;
pub use vocabulary::*;
pub use line::*;
