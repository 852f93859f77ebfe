//! User Repository

use async_trait::async_trait;
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::options::UpdateOptions;
use mongodb::{Collection, Database};

use crate::domain::{User, UserInfo};
use crate::error::Result;
use crate::repository::UserStore;

pub struct UserRepository {
    collection: Collection<User>,
}

impl UserRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("users"),
        }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn upsert(&self, info: &UserInfo) -> Result<()> {
        let now = bson::DateTime::from_chrono(Utc::now());
        let filter = doc! { "_id": &info.email };
        let update = doc! {
            "$set": {
                "fullName": &info.full_name,
                "city": &info.city,
                "state": &info.state,
                "phoneNumber": &info.phone_number,
                "updatedAt": now,
            },
            "$setOnInsert": { "createdAt": now },
        };
        let options = UpdateOptions::builder().upsert(true).build();

        self.collection.update_one(filter, update, options).await?;
        Ok(())
    }

    async fn find_by_emails(&self, emails: &[String]) -> Result<Vec<User>> {
        if emails.is_empty() {
            return Ok(Vec::new());
        }
        let cursor = self
            .collection
            .find(doc! { "_id": { "$in": emails } }, None)
            .await?;
        Ok(cursor.try_collect().await?)
    }
}
