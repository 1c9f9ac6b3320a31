use serde::{Deserialize, Serialize};

macro_rules! server_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

server_id!(
    /// Account primary key.
    UserId
);
server_id!(PostId);
server_id!(ConversationId);
server_id!(NotificationId);
server_id!(EmailNotificationId);

/// Message identifier.
///
/// Server ids are positive. A negative id marks a provisional message
/// synthesised on the client and never persisted under that id.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct MessageId(pub i64);

impl MessageId {
    pub fn is_provisional(&self) -> bool {
        self.0 < 0
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A point on the globe in decimal degrees.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

/// Which of a post's two toggles an action targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToggleKind {
    Like,
    Share,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provisional_ids_are_negative() {
        assert!(MessageId(-1_700_000_000_000).is_provisional());
        assert!(!MessageId(42).is_provisional());
    }

    #[test]
    fn ids_serialize_as_bare_numbers() {
        assert_eq!(serde_json::to_string(&PostId(7)).unwrap(), "7");
        let id: UserId = serde_json::from_str("12").unwrap();
        assert_eq!(id, UserId(12));
    }

    #[test]
    fn coordinate_bounds() {
        assert!(Coordinates::new(45.5, -122.6).is_valid());
        assert!(!Coordinates::new(91.0, 0.0).is_valid());
    }
}
