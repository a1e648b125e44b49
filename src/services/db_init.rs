use mongodb::{Database, IndexModel, bson::doc, options::IndexOptions};

pub async fn ensure_indexes(db: &Database) -> Result<(), String> {
    // users: unique email
    {
        let col = db.collection::<mongodb::bson::Document>("users");
        let model = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        col.create_index(model, None)
            .await
            .map_err(|e| e.to_string())?;
    }

    // saved_funds: unique per (user_id, fund_id); this index, not the
    // pre-check in the save path, is what enforces one bookmark per fund
    {
        let col = db.collection::<mongodb::bson::Document>("saved_funds");
        let model = IndexModel::builder()
            .keys(doc! { "user_id": 1, "fund_id": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        col.create_index(model, None)
            .await
            .map_err(|e| e.to_string())?;
    }

    // saved_funds: list by user, newest first
    {
        let col = db.collection::<mongodb::bson::Document>("saved_funds");
        let model = IndexModel::builder()
            .keys(doc! { "user_id": 1, "created_at": -1 })
            .build();

        let _ = col.create_index(model, None).await;
    }

    Ok(())
}
