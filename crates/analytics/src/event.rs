use chrono::{DateTime, Utc};
use common::UserId;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Who made a request.
///
/// Serialized as the user ID, or the string `"Anonymous"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Caller {
    User(UserId),
    Anonymous,
}

impl Serialize for Caller {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Caller::User(id) => id.serialize(serializer),
            Caller::Anonymous => serializer.serialize_str("Anonymous"),
        }
    }
}

impl<'de> Deserialize<'de> for Caller {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Id(UserId),
            Name(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Id(id) => Ok(Caller::User(id)),
            Repr::Name(name) if name == "Anonymous" => Ok(Caller::Anonymous),
            Repr::Name(name) => Err(serde::de::Error::custom(format!(
                "expected a user id or \"Anonymous\", got {name:?}"
            ))),
        }
    }
}

impl From<Option<UserId>> for Caller {
    fn from(user: Option<UserId>) -> Self {
        user.map_or(Caller::Anonymous, Caller::User)
    }
}

impl std::fmt::Display for Caller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Caller::User(id) => write!(f, "{id}"),
            Caller::Anonymous => write!(f, "Anonymous"),
        }
    }
}

/// Route parameters of a search request, as the caller sent them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RouteParams {
    pub source: Option<String>,
    pub destination: Option<String>,
}

impl RouteParams {
    /// Blank parameters are stored as absent, so `?source=` and a missing
    /// `source` describe the same route.
    pub fn new(source: Option<String>, destination: Option<String>) -> Self {
        Self {
            source: source.filter(|s| !s.trim().is_empty()),
            destination: destination.filter(|d| !d.trim().is_empty()),
        }
    }

    /// Human-readable route label, `"<source> to <destination>"`.
    pub fn label(&self) -> String {
        format!(
            "{} to {}",
            self.source.as_deref().unwrap_or_default(),
            self.destination.as_deref().unwrap_or_default()
        )
    }
}

/// One logged request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageEvent {
    pub endpoint: String,
    pub params: RouteParams,
    pub user_id: Caller,
    /// Handler latency in seconds.
    pub execution_time: f64,
    pub recorded_at: DateTime<Utc>,
}

impl UsageEvent {
    /// Creates an event stamped with the current time.
    pub fn new(
        endpoint: impl Into<String>,
        params: RouteParams,
        caller: Caller,
        execution_time: f64,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            params,
            user_id: caller,
            execution_time,
            recorded_at: Utc::now(),
        }
    }
}

/// Number of logged searches for one route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteCount {
    pub route: String,
    pub count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caller_serializes_as_id_or_anonymous() {
        let user = serde_json::to_value(Caller::User(UserId::new(5))).unwrap();
        assert_eq!(user, serde_json::json!(5));

        let anonymous = serde_json::to_value(Caller::Anonymous).unwrap();
        assert_eq!(anonymous, serde_json::json!("Anonymous"));
        assert_eq!(Caller::Anonymous.to_string(), "Anonymous");

        let back: Caller = serde_json::from_value(anonymous).unwrap();
        assert_eq!(back, Caller::Anonymous);
        let back: Caller = serde_json::from_value(user).unwrap();
        assert_eq!(back, Caller::User(UserId::new(5)));
    }

    #[test]
    fn caller_from_optional_user() {
        assert_eq!(Caller::from(None), Caller::Anonymous);
        assert_eq!(
            Caller::from(Some(UserId::new(2))),
            Caller::User(UserId::new(2))
        );
    }

    #[test]
    fn route_label_joins_source_and_destination() {
        let params = RouteParams::new(Some("Delhi".to_string()), Some("Agra".to_string()));
        assert_eq!(params.label(), "Delhi to Agra");
        assert_eq!(RouteParams::default().label(), " to ");
    }

    #[test]
    fn blank_parameters_are_absent() {
        let params = RouteParams::new(Some(String::new()), Some("Goa".to_string()));
        assert_eq!(params, RouteParams::new(None, Some("Goa".to_string())));
        assert_eq!(params.label(), " to Goa");
        assert_eq!(RouteParams::new(Some("  ".to_string()), None).source, None);
    }
}
