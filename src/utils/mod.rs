pub mod constants;
pub mod errors;
pub mod math;
pub mod table;

pub use constants::*;
pub use errors::*;
pub use math::*;
pub use table::*;
