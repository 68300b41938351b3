pub mod extraction;
pub mod winding;
pub mod repair;
pub mod decomposition;
pub mod ring;
pub mod ids;

pub use extraction::*;
pub use winding::*;
pub use repair::*;
pub use decomposition::*;
pub use ring::*;
pub use ids::*;
