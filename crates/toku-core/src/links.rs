//! Shareable meeting links.

/// Stand-in for an empty half of a personal meeting id.
const EMPTY_SEGMENT: &str = "------";

/// Builds meeting URLs from the public base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingLinks {
    base_url: String,
}

impl MeetingLinks {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        Self { base_url }
    }

    /// Link to a meeting room, e.g. `https://host/meeting/abc123`.
    pub fn meeting_url(&self, meeting_id: &str) -> String {
        format!("{}/meeting/{}", self.base_url, urlencoding::encode(meeting_id))
    }

    /// Link to a user's personal room. The meeting id of a personal room is
    /// the owner's user id.
    pub fn personal_room_url(&self, user_id: &str) -> String {
        format!("{}?personal=true", self.meeting_url(user_id))
    }
}

/// Display form of a personal meeting id: the first six characters of the
/// user id, a dash, then the next six.
pub fn personal_meeting_id(user_id: &str) -> String {
    let head: String = user_id.chars().take(6).collect();
    let tail: String = user_id.chars().skip(6).take(6).collect();
    format!("{}-{}", or_placeholder(head), or_placeholder(tail))
}

fn or_placeholder(segment: String) -> String {
    if segment.is_empty() {
        EMPTY_SEGMENT.to_string()
    } else {
        segment
    }
}
