pub mod media;
pub mod user;

pub use media::*;
pub use user::*;
