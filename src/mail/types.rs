use chrono::{DateTime, Local};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A message as returned by the inbox API.
///
/// Fields the list and detail views don't use are kept in `extra` so that
/// an exported message carries everything the API sent.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct Message {
    #[serde(default, deserialize_with = "nullable_string")]
    pub id: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub subject: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub from: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(default, deserialize_with = "nullable_string")]
    pub envelope_to: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Timestamp>,
    #[serde(default, deserialize_with = "nullable_bool")]
    pub read: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Received time: epoch milliseconds (integral or not) or an RFC 3339 string
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Timestamp {
    Millis(i64),
    FloatMillis(f64),
    Text(String),
}

/// Response body of the `/json` endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InboxResponse {
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub emails: Option<Vec<Message>>,
}

fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn nullable_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or_default())
}

impl Message {
    /// Stable identifier: `id`, falling back to the API's `oid`.
    /// Export file names use this, so they follow `id` rather than `oid`.
    pub fn identifier(&self) -> &str {
        if !self.id.is_empty() {
            return &self.id;
        }
        self.extra
            .get("oid")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .unwrap_or("message")
    }

    /// Case-insensitive substring match on subject, sender and plain-text body.
    /// `needle` must already be lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.subject.to_lowercase().contains(needle)
            || self.from.to_lowercase().contains(needle)
            || self.text.to_lowercase().contains(needle)
    }

    pub fn received_at(&self) -> Option<DateTime<Local>> {
        self.timestamp.as_ref().and_then(Timestamp::to_datetime)
    }

    /// Short date for list rows, e.g. "Feb 02 04:11"
    pub fn date_short(&self) -> String {
        match (self.received_at(), &self.timestamp) {
            (Some(dt), _) => dt.format("%b %d %H:%M").to_string(),
            (None, Some(ts)) => ts.raw(),
            (None, None) => String::new(),
        }
    }

    /// Full date for the detail view
    pub fn date_long(&self) -> String {
        match (self.received_at(), &self.timestamp) {
            (Some(dt), _) => dt.format("%Y-%m-%d %H:%M:%S %Z").to_string(),
            (None, Some(ts)) => ts.raw(),
            (None, None) => "(unknown)".to_string(),
        }
    }
}

impl Timestamp {
    pub fn to_datetime(&self) -> Option<DateTime<Local>> {
        let utc = match self {
            Timestamp::Millis(ms) => DateTime::from_timestamp_millis(*ms)?,
            Timestamp::FloatMillis(ms) if ms.is_finite() => {
                DateTime::from_timestamp_millis(ms.trunc() as i64)?
            }
            Timestamp::FloatMillis(_) => return None,
            Timestamp::Text(s) => match s.trim().parse::<i64>() {
                Ok(ms) => DateTime::from_timestamp_millis(ms)?,
                Err(_) => DateTime::parse_from_rfc3339(s.trim()).ok()?.to_utc(),
            },
        };
        Some(utc.with_timezone(&Local))
    }

    fn raw(&self) -> String {
        match self {
            Timestamp::Millis(ms) => ms.to_string(),
            Timestamp::FloatMillis(ms) => ms.to_string(),
            Timestamp::Text(s) => s.clone(),
        }
    }
}

impl InboxResponse {
    pub fn is_failure(&self) -> bool {
        self.result.as_deref() == Some("fail")
    }

    pub fn into_emails(self) -> Vec<Message> {
        self.emails.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_decode_minimal_message() {
        let body = r#"{"emails":[{"id":"a","subject":"Hello","from":"x@y.com","text":"hi","timestamp":1000,"tag":"t1"}]}"#;
        let resp: InboxResponse = serde_json::from_str(body).unwrap();
        let emails = resp.into_emails();
        assert_eq!(emails.len(), 1);
        let m = &emails[0];
        assert_eq!(m.id, "a");
        assert_eq!(m.subject, "Hello");
        assert_eq!(m.tag, "t1");
        assert_eq!(m.html, None);
        assert!(!m.read);
        assert_eq!(m.timestamp, Some(Timestamp::Millis(1000)));
    }

    #[test]
    fn test_float_timestamp_does_not_reject_inbox() {
        let body = r#"{"emails":[{"id":"a","timestamp":1700000000000.0},{"id":"b","timestamp":1}]}"#;
        let emails = serde_json::from_str::<InboxResponse>(body)
            .unwrap()
            .into_emails();
        assert_eq!(emails.len(), 2);
        assert_eq!(
            emails[0].timestamp,
            Some(Timestamp::FloatMillis(1_700_000_000_000.0))
        );
        let expected = DateTime::<Utc>::from_timestamp_millis(1_700_000_000_000).unwrap();
        assert_eq!(emails[0].received_at().unwrap().to_utc(), expected);
        assert_eq!(emails[1].timestamp, Some(Timestamp::Millis(1)));
    }

    #[test]
    fn test_null_read_flag_is_unread() {
        let body = r#"{"emails":[{"id":"a","read":null},{"id":"b","read":true}]}"#;
        let emails = serde_json::from_str::<InboxResponse>(body)
            .unwrap()
            .into_emails();
        assert_eq!(emails.len(), 2);
        assert!(!emails[0].read);
        assert!(emails[1].read);
    }

    #[test]
    fn test_missing_emails_is_empty() {
        let resp: InboxResponse = serde_json::from_str(r#"{"result":"success","count":0}"#).unwrap();
        assert!(!resp.is_failure());
        assert!(resp.into_emails().is_empty());
    }

    #[test]
    fn test_fail_result() {
        let resp: InboxResponse =
            serde_json::from_str(r#"{"result":"fail","message":"bad key"}"#).unwrap();
        assert!(resp.is_failure());
        assert_eq!(resp.message.as_deref(), Some("bad key"));
    }

    #[test]
    fn test_nulls_become_empty() {
        let m: Message =
            serde_json::from_str(r#"{"id":"b","subject":null,"html":null,"timestamp":null}"#)
                .unwrap();
        assert_eq!(m.subject, "");
        assert_eq!(m.html, None);
        assert_eq!(m.timestamp, None);
        assert_eq!(m.date_long(), "(unknown)");
    }

    #[test]
    fn test_unknown_fields_kept() {
        let m: Message =
            serde_json::from_str(r#"{"id":"c","oid":"o-1","spam_score":0.5}"#).unwrap();
        assert_eq!(m.extra.get("oid"), Some(&Value::from("o-1")));
        let out = serde_json::to_value(&m).unwrap();
        assert_eq!(out["spam_score"], Value::from(0.5));
    }

    #[test]
    fn test_identifier_falls_back_to_oid() {
        let m: Message = serde_json::from_str(r#"{"oid":"o-9"}"#).unwrap();
        assert_eq!(m.identifier(), "o-9");
        assert_eq!(Message::default().identifier(), "message");
    }

    #[test]
    fn test_matches_is_case_insensitive() {
        let m = Message {
            subject: "Welcome Aboard".into(),
            from: "Alerts@Example.com".into(),
            text: "Your CODE is 1234".into(),
            ..Default::default()
        };
        assert!(m.matches(""));
        assert!(m.matches("aboard"));
        assert!(m.matches("alerts@"));
        assert!(m.matches("code is"));
        assert!(!m.matches("missing"));
    }

    #[test]
    fn test_timestamp_parsing() {
        let expected = DateTime::<Utc>::from_timestamp_millis(1_700_000_000_000).unwrap();
        let millis = Timestamp::Millis(1_700_000_000_000).to_datetime().unwrap();
        assert_eq!(millis.to_utc(), expected);

        let iso = Timestamp::Text("2023-11-14T22:13:20Z".into())
            .to_datetime()
            .unwrap();
        assert_eq!(iso.to_utc(), expected);

        assert!(Timestamp::Text("not a date".into()).to_datetime().is_none());
    }

    #[test]
    fn test_unparsable_timestamp_shows_raw() {
        let m = Message {
            timestamp: Some(Timestamp::Text("yesterday".into())),
            ..Default::default()
        };
        assert_eq!(m.date_short(), "yesterday");
        assert_eq!(m.date_long(), "yesterday");
    }
}
