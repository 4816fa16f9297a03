//! Wire models for the betting backend.
//!
//! Each listed entity also knows how to render itself into a [`Haystack`]
//! for the list pages' search box.

use bicho_core::{
    AdministratorId, Animal, AnimalId, BetId, Haystack, LogId, Money, Role, WinnerId,
};
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Format a backend timestamp the way the panel shows it (`dd/mm/yyyy HH:MM:SS`,
/// local time).
#[must_use]
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.with_timezone(&Local)
        .format("%d/%m/%Y %H:%M:%S")
        .to_string()
}

/// Accept a JSON string or number, keep it as text.
///
/// The backend is inconsistent about phone and bank account numbers.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}

const fn yes_no(paid: bool) -> &'static str {
    if paid { "sim" } else { "nao|não" }
}

/// A panel operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Administrator {
    pub id: AdministratorId,
    pub created_at: DateTime<Utc>,
    pub role: Role,
    pub name: String,
    #[serde(deserialize_with = "string_or_number")]
    pub phone: String,
    #[serde(deserialize_with = "string_or_number")]
    pub bank_account: String,
}

impl Administrator {
    #[must_use]
    pub fn created_label(&self) -> String {
        format_timestamp(&self.created_at)
    }

    #[must_use]
    pub fn haystack(&self) -> Haystack {
        Haystack::new()
            .field("id", &self.id)
            .field("data", self.created_label())
            .field("cargo", self.role)
            .field("nome", &self.name)
            .field("tel", &self.phone)
            .field("banco", &self.bank_account)
    }
}

/// A confirmed bet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bet {
    pub id: BetId,
    pub created_at: DateTime<Utc>,
    pub value: Money,
    pub animal: Animal,
    pub name: String,
    #[serde(deserialize_with = "string_or_number")]
    pub phone: String,
    #[serde(deserialize_with = "string_or_number")]
    pub bank_account: String,
}

impl Bet {
    #[must_use]
    pub fn created_label(&self) -> String {
        format_timestamp(&self.created_at)
    }

    #[must_use]
    pub fn haystack(&self) -> Haystack {
        Haystack::new()
            .field("id", &self.id)
            .field("data", self.created_label())
            .field("valor", self.value.amount())
            .field("animal", self.animal.name())
            .field("animalnum", self.animal.number())
            .field("nome", &self.name)
            .field("tel", &self.phone)
            .field("banco", &self.bank_account)
    }
}

/// A bet awaiting validation by its token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingBet {
    pub token: String,
    #[serde(flatten)]
    pub bet: Bet,
}

impl PendingBet {
    #[must_use]
    pub fn haystack(&self) -> Haystack {
        self.bet.haystack().field("token", &self.token)
    }
}

/// A drawn animal together with the bets it made winners.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinnerAnimal {
    pub id: AnimalId,
    pub created_at: DateTime<Utc>,
    pub animal: Animal,
    #[serde(default)]
    pub winners: Vec<Winner>,
}

impl WinnerAnimal {
    #[must_use]
    pub fn created_label(&self) -> String {
        format_timestamp(&self.created_at)
    }

    #[must_use]
    pub fn haystack(&self) -> Haystack {
        let winners = self.winners.iter().fold(Haystack::new(), |hay, w| {
            hay.field("vencedorid", &w.id)
                .field("vencedorpaycheck", w.paycheck.amount())
                .field("vencedorpago", yes_no(w.paid))
                .field("vencedornome", &w.name)
                .field("vencedortel", &w.phone)
                .field("vencedorbanco", &w.bank_account)
        });

        Haystack::new()
            .field("id", &self.id)
            .field("data", self.created_label())
            .field("animal", self.animal.name())
            .field("animalnum", self.animal.number())
            .extend(&winners)
    }
}

/// A winning bet and its payout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Winner {
    pub id: WinnerId,
    pub created_at: DateTime<Utc>,
    #[serde(rename = "animalId")]
    pub animal_id: AnimalId,
    /// Present on the winners list, absent when nested inside an animal.
    #[serde(default)]
    pub animal: Option<Box<WinnerAnimal>>,
    pub name: String,
    #[serde(deserialize_with = "string_or_number")]
    pub phone: String,
    #[serde(deserialize_with = "string_or_number")]
    pub bank_account: String,
    pub paycheck: Money,
    pub paid: bool,
}

impl Winner {
    #[must_use]
    pub fn created_label(&self) -> String {
        format_timestamp(&self.created_at)
    }

    /// Label of the drawn animal, when the backend included it.
    #[must_use]
    pub fn animal_label(&self) -> String {
        self.animal
            .as_ref()
            .map_or_else(|| "-".to_string(), |a| a.animal.label())
    }

    #[must_use]
    pub fn haystack(&self) -> Haystack {
        let mut hay = Haystack::new()
            .field("id", &self.id)
            .field("data", self.created_label())
            .field("pago", yes_no(self.paid))
            .field("paycheck", self.paycheck.amount())
            .field("animalid", &self.animal_id);
        if let Some(animal) = &self.animal {
            hay = hay
                .field("animal", animal.animal.name())
                .field("animalnum", animal.animal.number());
        }
        hay.field("nome", &self.name)
            .field("tel", &self.phone)
            .field("banco", &self.bank_account)
    }
}

/// An audit log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Log {
    pub id: LogId,
    pub created_at: DateTime<Utc>,
    pub action: String,
    pub admin_id: AdministratorId,
}

impl Log {
    #[must_use]
    pub fn created_label(&self) -> String {
        format_timestamp(&self.created_at)
    }

    #[must_use]
    pub fn haystack(&self) -> Haystack {
        Haystack::new()
            .field("id", &self.id)
            .field("adminid", &self.admin_id)
            .field("data", self.created_label())
            .field("acao", &self.action)
    }
}

/// Payload of a successful sign-in.
#[derive(Debug, Clone, Deserialize)]
pub struct SignInPayload {
    pub token: String,
    pub administrator: Administrator,
}

/// Body for creating or editing an administrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdministratorInput {
    pub role: Role,
    pub name: String,
    pub phone: String,
    pub bank_account: u64,
    pub password: String,
}

/// Body for changing a password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PasswordInput {
    pub password: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const ADMINISTRATOR: &str = r#"{
        "id": "adm-1",
        "created_at": "2024-05-01T12:00:00.000Z",
        "role": "SUPERADMIN",
        "name": "Ana",
        "phone": 1234567890,
        "bank_account": "61234567"
    }"#;

    #[test]
    fn test_administrator_accepts_numeric_phone() {
        let admin: Administrator = serde_json::from_str(ADMINISTRATOR).unwrap();
        assert_eq!(admin.role, Role::SuperAdmin);
        assert_eq!(admin.phone, "1234567890");
        assert_eq!(admin.bank_account, "61234567");
    }

    #[test]
    fn test_administrator_haystack() {
        let admin: Administrator = serde_json::from_str(ADMINISTRATOR).unwrap();
        let hay = admin.haystack();
        assert!(hay.contains("cargo:superadmin"));
        assert!(hay.contains("nome:ana"));
        assert!(hay.contains("banco:6123"));
    }

    #[test]
    fn test_pending_bet_flattens() {
        let json = r#"{
            "id": "b1",
            "created_at": "2024-05-01T12:00:00Z",
            "token": "TKN-9",
            "value": 12.5,
            "animal": 16,
            "name": "Bia",
            "phone": "1234567890",
            "bank_account": 61234567
        }"#;
        let pending: PendingBet = serde_json::from_str(json).unwrap();
        assert_eq!(pending.token, "TKN-9");
        assert_eq!(pending.bet.animal.name(), "Leão");
        assert_eq!(pending.bet.value.to_brl(), "R$ 12,50");

        let hay = pending.haystack();
        assert!(hay.contains("token:tkn-9"));
        assert!(hay.contains("animal:leao"));
        assert!(hay.contains("animalnum:16"));
    }

    #[test]
    fn test_winner_with_nested_animal() {
        let json = r#"{
            "id": "w1",
            "created_at": "2024-05-01T12:00:00Z",
            "animalId": "a1",
            "animal": {"id": "a1", "created_at": "2024-05-01T11:00:00Z", "animal": 3},
            "name": "Caio",
            "phone": "1234567890",
            "bank_account": "61234567",
            "paycheck": 180,
            "paid": false
        }"#;
        let winner: Winner = serde_json::from_str(json).unwrap();
        assert_eq!(winner.animal_label(), "Burro (3)");

        let hay = winner.haystack();
        assert!(hay.contains("pago:nao"));
        assert!(!hay.contains("pago:sim"));
        assert!(hay.contains("animal:burro"));
        assert!(hay.contains("animalid:a1"));
    }

    #[test]
    fn test_winner_animal_searches_nested_winners() {
        let json = r#"{
            "id": "a1",
            "created_at": "2024-05-01T11:00:00Z",
            "animal": 25,
            "winners": [{
                "id": "w1",
                "created_at": "2024-05-01T12:00:00Z",
                "animalId": "a1",
                "name": "Dora",
                "phone": "1234567890",
                "bank_account": "61234567",
                "paycheck": 90.5,
                "paid": true
            }]
        }"#;
        let animal: WinnerAnimal = serde_json::from_str(json).unwrap();
        let hay = animal.haystack();
        assert!(hay.contains("animal:vaca"));
        assert!(hay.contains("vencedornome:dora"));
        assert!(hay.contains("vencedorpago:sim"));
        assert!(!hay.contains("vencedornome:bia"));
    }

    #[test]
    fn test_log_haystack() {
        let json = r#"{
            "id": "l1",
            "created_at": "2024-05-01T12:00:00Z",
            "action": "Deletou aposta b1",
            "admin_id": "adm-1"
        }"#;
        let log: Log = serde_json::from_str(json).unwrap();
        let hay = log.haystack();
        assert!(hay.contains("adminid:adm-1"));
        assert!(hay.contains("acao:deletouapostab1"));
    }

    #[test]
    fn test_administrator_input_serializes_account_as_number() {
        let input = AdministratorInput {
            role: Role::Admin,
            name: "Ana".to_string(),
            phone: "1234567890".to_string(),
            bank_account: 61_234_567,
            password: "suasenhasuperforte".to_string(),
        };
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json["role"], "ADMIN");
        assert_eq!(json["bank_account"], 61_234_567);
        assert_eq!(json["phone"], "1234567890");
    }
}
