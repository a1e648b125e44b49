use futures_util::StreamExt;

use chrono::Utc;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::options::FindOptions;

use crate::{
    AppState,
    error::{ApiError, is_duplicate_key},
    models::SavedFund,
};

pub async fn list_saved(state: &AppState, user_id: ObjectId) -> Result<Vec<SavedFund>, ApiError> {
    let saved = state.db.collection::<SavedFund>("saved_funds");

    // newest first; _id breaks ties between same-millisecond saves
    let find_opts = FindOptions::builder()
        .sort(doc! { "created_at": -1, "_id": -1 })
        .build();

    let mut cursor = saved.find(doc! { "user_id": user_id }, find_opts).await?;

    let mut out: Vec<SavedFund> = vec![];
    while let Some(res) = cursor.next().await {
        out.push(res?);
    }
    Ok(out)
}

/// Bookmarks a fund for the user and returns the updated list. The existence
/// pre-check is only a fast path; the unique (user_id, fund_id) index decides
/// when two saves race.
pub async fn save_fund(
    state: &AppState,
    user_id: ObjectId,
    fund_id: &str,
    name: &str,
) -> Result<Vec<SavedFund>, ApiError> {
    if fund_id.trim().is_empty() || name.trim().is_empty() {
        return Err(ApiError::BadRequest("Fund ID and name are required".into()));
    }

    let saved = state.db.collection::<SavedFund>("saved_funds");

    let existing = saved
        .find_one(doc! { "user_id": user_id, "fund_id": fund_id }, None)
        .await?;
    if existing.is_some() {
        return Err(ApiError::Conflict("Fund already saved".into()));
    }

    let record = SavedFund {
        id: ObjectId::new(),
        user_id,
        fund_id: fund_id.to_string(),
        name: name.to_string(),
        created_at: Utc::now().timestamp_millis(),
    };

    match saved.insert_one(&record, None).await {
        Ok(_) => {}
        Err(e) if is_duplicate_key(&e) => {
            return Err(ApiError::Conflict("Fund already saved".into()));
        }
        Err(e) => return Err(e.into()),
    }

    list_saved(state, user_id).await
}

pub async fn remove_fund(
    state: &AppState,
    user_id: ObjectId,
    fund_id: &str,
) -> Result<Vec<SavedFund>, ApiError> {
    let saved = state.db.collection::<SavedFund>("saved_funds");

    let deleted = saved
        .find_one_and_delete(doc! { "user_id": user_id, "fund_id": fund_id }, None)
        .await?;

    if deleted.is_none() {
        return Err(ApiError::NotFound("Saved fund not found".into()));
    }

    list_saved(state, user_id).await
}

pub async fn is_saved(
    state: &AppState,
    user_id: ObjectId,
    fund_id: &str,
) -> Result<bool, ApiError> {
    let saved = state.db.collection::<SavedFund>("saved_funds");

    let found = saved
        .find_one(doc! { "user_id": user_id, "fund_id": fund_id }, None)
        .await?;

    Ok(found.is_some())
}
