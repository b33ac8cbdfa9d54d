pub mod media_type;
pub mod object_key;
pub mod review_status;
pub mod user_role;

pub use media_type::*;
pub use object_key::*;
pub use review_status::*;
pub use user_role::*;
