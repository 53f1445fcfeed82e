use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// A user record keyed by phone number.
///
/// `number` is the natural key, unique across the collection and immutable
/// after creation. Only `name` and `email` are mutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub number: String,
    pub name: String,
    pub email: String,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(number: String, name: String, email: String) -> Self {
        // BSON datetimes carry millisecond precision; truncate up front so
        // the in-memory record matches what a later read returns.
        let now = Utc::now();
        let now = DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now);
        Self {
            id: None,
            number,
            name,
            email,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_user_has_matching_timestamps() {
        let user = User::new("555".into(), "A".into(), "a@x.com".into());
        assert!(user.id.is_none());
        assert_eq!(user.created_at, user.updated_at);
    }

    #[test]
    fn user_round_trips_through_bson() {
        let user = User::new("555".into(), "A".into(), "a@x.com".into());
        let doc = mongodb::bson::to_document(&user).expect("serialize");
        // Timestamps are stored as native BSON datetimes, not strings.
        assert!(matches!(
            doc.get("created_at"),
            Some(mongodb::bson::Bson::DateTime(_))
        ));
        let back: User = mongodb::bson::from_document(doc).expect("deserialize");
        assert_eq!(back.number, "555");
        assert_eq!(back.email, "a@x.com");
    }
}
