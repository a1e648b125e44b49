pub mod saved_fund;
pub mod user;

pub use saved_fund::SavedFund;
pub use user::{CurrentUser, User};
