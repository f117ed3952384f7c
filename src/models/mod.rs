pub mod card;
pub mod catalog;
pub mod category;
pub mod view_model;

pub use card::*;
pub use catalog::*;
pub use category::*;
pub use view_model::*;
