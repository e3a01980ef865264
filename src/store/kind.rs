// Document kind definitions
// Maps each persisted document to its file, API route and write acknowledgement

use serde_json::{json, Value};

/// Every JSON document the site administers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Schedule,
    NetInfo,
    Teams,
    Buttons,
    Advertisement,
    Olympic,
    Videos,
}

/// Response body sent after a successful write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteAck {
    /// Bare `200 OK` text body
    Status,
    /// `{"success": true}`
    Success,
}

impl DocumentKind {
    pub const COUNT: usize = 7;

    pub const ALL: [Self; Self::COUNT] = [
        Self::Schedule,
        Self::NetInfo,
        Self::Teams,
        Self::Buttons,
        Self::Advertisement,
        Self::Olympic,
        Self::Videos,
    ];

    /// Position inside [`Self::ALL`]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// File path relative to the storage root
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Schedule => "schedule.json",
            Self::NetInfo => "net_info.json",
            Self::Teams => "teams.json",
            Self::Buttons => "buttons.json",
            Self::Advertisement => "advertisement.json",
            Self::Olympic => "olympic.json",
            Self::Videos => "data/videos.json",
        }
    }

    /// API path serving GET and POST for this document
    pub const fn route(self) -> &'static str {
        match self {
            Self::Schedule => "/api/schedule",
            Self::NetInfo => "/api/net-info",
            Self::Teams => "/api/data",
            Self::Buttons => "/api/buttons",
            Self::Advertisement => "/api/advertisement",
            Self::Olympic => "/api/olympic",
            Self::Videos => "/api/videos",
        }
    }

    pub fn from_route(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.route() == path)
    }

    pub const fn write_ack(self) -> WriteAck {
        match self {
            Self::Schedule | Self::NetInfo => WriteAck::Status,
            _ => WriteAck::Success,
        }
    }

    /// Value seeded at startup, if this document has one
    pub fn default_value(self) -> Option<Value> {
        match self {
            Self::Videos => Some(json!({ "groups": [], "activeGroupId": null })),
            _ => None,
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Schedule => write!(f, "schedule"),
            Self::NetInfo => write!(f, "net-info"),
            Self::Teams => write!(f, "teams"),
            Self::Buttons => write!(f, "buttons"),
            Self::Advertisement => write!(f, "advertisement"),
            Self::Olympic => write!(f, "olympic"),
            Self::Videos => write!(f, "videos"),
        }
    }
}
