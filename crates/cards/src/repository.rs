use crate::models::{Card, CreateCardRequest};
use chrono::{DateTime, Utc};
use database::{self, RepositoryError};
use sqlx::FromRow;

#[derive(FromRow)]
struct CardRecord {
    id: i64,
    user_id: i64,
    contact_number: String,
    card_account_number: String,
    account_type: String,
    initial_balance: String,
    created_at: DateTime<Utc>,
}

impl From<CardRecord> for Card {
    fn from(record: CardRecord) -> Self {
        Card {
            id: record.id,
            user_id: record.user_id,
            contact_number: record.contact_number,
            card_account_number: record.card_account_number,
            account_type: record.account_type,
            initial_balance: record.initial_balance,
            created_at: record.created_at,
        }
    }
}

/// Persistence operations over cards.
pub(crate) trait CardStore {
    async fn find_by_user(&mut self, user_id: i64) -> Result<Vec<Card>, RepositoryError>;

    async fn save(
        &mut self,
        req: &CreateCardRequest,
        created_at: DateTime<Utc>,
    ) -> Result<Card, RepositoryError>;

    async fn exists_by_id(&mut self, id: i64) -> Result<bool, RepositoryError>;

    /// Fails with `NotFound` when no row was removed.
    async fn delete_by_id(&mut self, id: i64) -> Result<(), RepositoryError>;
}

pub(crate) struct CardRepository<'a> {
    conn: &'a mut database::Connection,
}

impl<'a> CardRepository<'a> {
    pub fn new(conn: &'a mut database::Connection) -> Self {
        Self { conn }
    }
}

impl CardStore for CardRepository<'_> {
    async fn find_by_user(&mut self, user_id: i64) -> Result<Vec<Card>, RepositoryError> {
        let records = sqlx::query_as::<_, CardRecord>(
            "SELECT id, user_id, contact_number, card_account_number, account_type, initial_balance, created_at FROM cards WHERE user_id = $1 ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(records.into_iter().map(|r| r.into()).collect())
    }

    async fn save(
        &mut self,
        req: &CreateCardRequest,
        created_at: DateTime<Utc>,
    ) -> Result<Card, RepositoryError> {
        let record = sqlx::query_as::<_, CardRecord>(
            "INSERT INTO cards (user_id, contact_number, card_account_number, account_type, initial_balance, created_at) VALUES ($1, $2, $3, $4, $5, $6) RETURNING id, user_id, contact_number, card_account_number, account_type, initial_balance, created_at",
        )
        .bind(req.user_id())
        .bind(req.contact_number())
        .bind(req.card_account_number())
        .bind(req.account_type())
        .bind(req.initial_balance())
        .bind(created_at)
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(record.into())
    }

    async fn exists_by_id(&mut self, id: i64) -> Result<bool, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cards WHERE id = $1")
            .bind(id)
            .fetch_one(&mut *self.conn)
            .await?;

        Ok(count > 0)
    }

    async fn delete_by_id(&mut self, id: i64) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM cards WHERE id = $1")
            .bind(id)
            .execute(&mut *self.conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawCreateCardRequest;
    use chrono::TimeZone;
    use database::get_test_db;

    fn request(user_id: i64, account: &str) -> CreateCardRequest {
        CreateCardRequest::new(RawCreateCardRequest {
            user_id: Some(user_id),
            contact_number: Some("1234567890".into()),
            card_account_number: Some(account.into()),
            account_type: Some("DEBIT".into()),
            initial_balance: Some("100.00".into()),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_save_card() {
        let db = get_test_db().await;
        let mut uow = db.begin().await.unwrap();
        let mut repo = CardRepository::new(uow.connection());

        let created_at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        let card = repo.save(&request(1, "12345678901234"), created_at).await.unwrap();
        assert!(card.id > 0);
        assert_eq!(card.user_id, 1);
        assert_eq!(card.card_account_number, "12345678901234");
        assert_eq!(card.initial_balance, "100.00");
        assert_eq!(card.created_at, created_at);
    }

    #[tokio::test]
    async fn test_find_by_user() {
        let db = get_test_db().await;
        let mut uow = db.begin().await.unwrap();
        let mut repo = CardRepository::new(uow.connection());

        let first = repo.save(&request(1, "1111111111"), Utc::now()).await.unwrap();
        let second = repo.save(&request(1, "2222222222"), Utc::now()).await.unwrap();
        repo.save(&request(2, "3333333333"), Utc::now()).await.unwrap();

        let cards = repo.find_by_user(1).await.unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].id, first.id);
        assert_eq!(cards[1].id, second.id);
        assert!(cards.iter().all(|c| c.user_id == 1));

        assert!(repo.find_by_user(42).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_exists_and_delete() {
        let db = get_test_db().await;
        let mut uow = db.begin().await.unwrap();
        let mut repo = CardRepository::new(uow.connection());

        let card = repo.save(&request(1, "12345678901234"), Utc::now()).await.unwrap();
        assert!(repo.exists_by_id(card.id).await.unwrap());

        repo.delete_by_id(card.id).await.unwrap();
        assert!(!repo.exists_by_id(card.id).await.unwrap());

        let result = repo.delete_by_id(card.id).await;
        assert!(matches!(result, Err(RepositoryError::NotFound)));
    }
}
