use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted card.
#[derive(Debug, PartialEq, Clone)]
pub struct Card {
    pub id: i64,
    pub user_id: i64,
    pub contact_number: String,
    pub card_account_number: String,
    pub account_type: String,
    pub initial_balance: String,
    pub created_at: DateTime<Utc>,
}

/// The shape handed to clients.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CardDto {
    pub id: i64,
    pub user_id: i64,
    pub contact_number: String,
    pub card_account_number: String,
    pub account_type: String,
    pub initial_balance: String,
    pub created_at: DateTime<Utc>,
}

impl From<Card> for CardDto {
    fn from(card: Card) -> Self {
        CardDto {
            id: card.id,
            user_id: card.user_id,
            contact_number: card.contact_number,
            card_account_number: card.card_account_number,
            account_type: card.account_type,
            initial_balance: card.initial_balance,
            created_at: card.created_at,
        }
    }
}

// Raw input struct for deserialization. Everything is optional so a missing
// field surfaces as a validation message instead of an extractor rejection.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCreateCardRequest {
    pub user_id: Option<i64>,
    pub contact_number: Option<String>,
    pub card_account_number: Option<String>,
    pub account_type: Option<String>,
    pub initial_balance: Option<String>,
}

/// A card payload that passed validation. Only obtainable through `new`.
#[derive(Debug)]
pub struct CreateCardRequest {
    user_id: i64,
    contact_number: String,
    card_account_number: String,
    account_type: String,
    initial_balance: String,
}

// Kept as text so that `?userId=` reads as "no user" rather than a parse error.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCardsQuery {
    pub user_id: Option<String>,
}

impl ListCardsQuery {
    pub fn user_id(&self) -> Result<Option<i64>, String> {
        match self.user_id.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => raw
                .parse::<i64>()
                .map(Some)
                .map_err(|_| format!("Invalid user id: {}", raw)),
        }
    }
}

fn required(value: Option<String>, message: &str) -> Result<String, String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(message.to_string()),
    }
}

fn is_digits(value: &str, min: usize, max: usize) -> bool {
    (min..=max).contains(&value.len()) && value.bytes().all(|b| b.is_ascii_digit())
}

impl CreateCardRequest {
    /// Checks run in a fixed order and stop at the first failure.
    pub fn new(raw: RawCreateCardRequest) -> Result<Self, String> {
        let user_id = raw.user_id.ok_or_else(|| "User id is required".to_string())?;
        let contact_number = required(raw.contact_number, "Contact number is required")?;
        let card_account_number =
            required(raw.card_account_number, "Card account number is required")?;
        let account_type = required(raw.account_type, "Account type is required")?;
        let initial_balance = required(raw.initial_balance, "Initial balance is required")?;

        if !is_digits(&contact_number, 10, 15) {
            return Err("Invalid contact number format. Must be 10-15 digits".to_string());
        }

        if !is_digits(&card_account_number, 10, 20) {
            return Err("Invalid card account number format. Must be 10-20 digits".to_string());
        }

        // Plain decimal or exponent notation only; overflow to infinity is still a number.
        let trimmed = initial_balance.trim();
        let well_formed = trimmed
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'));
        let balance = trimmed
            .parse::<f64>()
            .ok()
            .filter(|_| well_formed)
            .ok_or_else(|| "Invalid initial balance format".to_string())?;
        if balance < 0.0 {
            return Err("Initial balance must be a positive number".to_string());
        }

        Ok(Self {
            user_id,
            contact_number,
            card_account_number,
            account_type,
            initial_balance,
        })
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    pub fn contact_number(&self) -> &str {
        &self.contact_number
    }

    pub fn card_account_number(&self) -> &str {
        &self.card_account_number
    }

    pub fn account_type(&self) -> &str {
        &self.account_type
    }

    pub fn initial_balance(&self) -> &str {
        &self.initial_balance
    }
}
