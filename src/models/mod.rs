mod assessment;
mod catalog;
mod registration;

pub use assessment::*;
pub use catalog::*;
pub use registration::*;
