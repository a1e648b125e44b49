use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// A user's bookmark of a fund. The display name is captured at save time;
/// the fund document itself is never stored locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedFund {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub user_id: ObjectId,
    pub fund_id: String,

    pub name: String,

    // unix millis
    pub created_at: i64,
}
