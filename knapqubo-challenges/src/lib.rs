mod builder;
pub use builder::*;
mod decoder;
pub use decoder::*;
mod error;
pub use error::*;
mod items;
pub use items::*;
mod model;
pub use model::*;
mod pipeline;
pub use pipeline::*;
mod solver;
pub use solver::*;
