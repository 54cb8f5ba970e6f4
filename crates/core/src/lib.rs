pub mod elicit;
pub mod eligibility;
pub mod messages;
pub mod models;
pub mod select;

pub use elicit::{ElicitError, ProfileField};
pub use eligibility::evaluate;
pub use messages::MessageCatalog;
pub use models::*;
pub use select::select_candidate;
