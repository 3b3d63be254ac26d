use crate::models::{Card, CreateCardRequest, RawCreateCardRequest};
use crate::repository::{CardRepository, CardStore};
use chrono::{DateTime, Utc};
use database::{Database, RepositoryError};
use tracing::instrument;

#[derive(Debug, thiserror::Error)]
pub enum CardError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("{0}")]
    Infrastructure(String),
    #[error("Card not found")]
    NotFound,
}

impl From<RepositoryError> for CardError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => CardError::NotFound,
            RepositoryError::Infrastructure(e) => CardError::Infrastructure(e.to_string()),
        }
    }
}

impl CardError {
    /// Prefixes infrastructure failures with the operation that hit them.
    fn during(self, action: &str) -> Self {
        match self {
            CardError::Infrastructure(msg) => {
                CardError::Infrastructure(format!("Failed to {action}: {msg}"))
            }
            other => other,
        }
    }
}

pub struct CardService;

impl CardService {
    /// Cards owned by `user_id`. No user means no cards, not an error.
    #[instrument(skip(db))]
    pub async fn list_cards(db: &Database, user_id: Option<i64>) -> Result<Vec<Card>, CardError> {
        let Some(user_id) = user_id else {
            return Ok(Vec::new());
        };

        Self::find_for_user(db, user_id)
            .await
            .map_err(|e| e.during("list cards"))
    }

    #[instrument(skip(db))]
    pub async fn create_card(db: &Database, raw: RawCreateCardRequest) -> Result<Card, CardError> {
        let req = CreateCardRequest::new(raw).map_err(CardError::InvalidInput)?;
        let created_at = Utc::now();

        let card = Self::persist(db, &req, created_at)
            .await
            .map_err(|e| e.during("create card"))?;

        tracing::info!(card_id = card.id, user_id = card.user_id, "Card created");
        Ok(card)
    }

    #[instrument(skip(db))]
    pub async fn delete_card(db: &Database, id: i64) -> Result<(), CardError> {
        Self::remove(db, id).await.map_err(|e| e.during("delete card"))
    }

    async fn find_for_user(db: &Database, user_id: i64) -> Result<Vec<Card>, CardError> {
        let mut uow = db.begin().await?;
        let mut repo = CardRepository::new(uow.connection());

        let cards = repo.find_by_user(user_id).await?;
        Ok(cards)
    }

    async fn persist(
        db: &Database,
        req: &CreateCardRequest,
        created_at: DateTime<Utc>,
    ) -> Result<Card, CardError> {
        let mut uow = db.begin().await?;
        let mut repo = CardRepository::new(uow.connection());

        let card = repo.save(req, created_at).await?;

        uow.commit().await?;
        Ok(card)
    }

    async fn remove(db: &Database, id: i64) -> Result<(), CardError> {
        let mut uow = db.begin().await?;
        let mut repo = CardRepository::new(uow.connection());

        if !repo.exists_by_id(id).await? {
            return Err(CardError::NotFound);
        }

        // NotFound here means a concurrent delete got there first.
        repo.delete_by_id(id).await?;

        uow.commit().await?;
        Ok(())
    }
}
