pub mod reading;
pub mod recommendation;

pub use reading::*;
pub use recommendation::*;
