//! Wire types for the flow-event search API and the client-side view
//! state derived from them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome recorded for a flow event. The service only ever emits these
/// two values; anything else is a malformed response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventStatus {
    Accept,
    Reject,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Accept => "ACCEPT",
            EventStatus::Reject => "REJECT",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One flow record as returned by the search endpoint.
///
/// Every field except `status` may be absent: the service emits whatever
/// the matched log line carried, and short lines carry less. Timestamps
/// are epoch seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    #[serde(default)]
    pub source_ip: Option<String>,

    #[serde(default)]
    pub destination_ip: Option<String>,

    #[serde(default)]
    pub start_time: Option<i64>,

    #[serde(default)]
    pub end_time: Option<i64>,

    pub status: EventStatus,

    #[serde(default)]
    pub action: Option<String>,

    #[serde(default)]
    pub filename: Option<String>,

    #[serde(default)]
    pub interface_id: Option<String>,

    /// Packet count, kept as the raw log token (display only).
    #[serde(default, with = "count_str")]
    pub packets: Option<String>,

    /// Byte count, kept as the raw log token (display only).
    #[serde(default, with = "count_str")]
    pub bytes: Option<String>,
}

/// Counter fields arrive as the raw string tokens from the flow logs, but
/// accept bare integers too and normalize them to text.
mod count_str {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(i64),
    }

    pub fn serialize<S>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(text) => serializer.serialize_str(text),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<Raw>::deserialize(deserializer)?;
        Ok(raw.map(|value| match value {
            Raw::Text(text) => text,
            Raw::Number(number) => number.to_string(),
        }))
    }
}

/// Server-side bookkeeping attached to every search response. Only
/// `matches`, `page_size`, and `total_pages` drive the interface; the rest
/// is informational and defaults to zero when the service omits it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchSummary {
    #[serde(default)]
    pub files_scanned: u64,

    #[serde(default)]
    pub lines_checked: u64,

    pub matches: u64,

    #[serde(default = "default_page")]
    pub page: u32,

    pub page_size: u32,

    pub total_pages: u32,

    /// Seconds the service spent scanning, as reported by the service.
    #[serde(default)]
    pub duration_seconds: f64,
}

fn default_page() -> u32 {
    1
}

/// Full payload of a successful search request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<EventRecord>,
    pub summary: SearchSummary,
}

/// Raw form values captured from the search bar. Values travel to the
/// service untouched; no trimming or parsing happens client-side.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams {
    pub search_term: String,
    pub start_time: String,
    pub end_time: String,
}

impl SearchParams {
    /// True when no field carries any text at all. Whitespace counts as
    /// text; the service does its own trimming.
    pub fn is_blank(&self) -> bool {
        self.search_term.is_empty() && self.start_time.is_empty() && self.end_time.is_empty()
    }
}

/// Client-side pagination state. Everything except `page` mirrors the last
/// summary the service returned; `page` is what the user navigated to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageState {
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
    pub total_matches: u64,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 12,
            total_pages: 1,
            total_matches: 0,
        }
    }
}

impl PageState {
    /// Accepts a page change only within [1, total_pages]. Out-of-range
    /// requests are ignored and leave the state untouched.
    pub fn set_page(&mut self, page: u32) -> bool {
        if page >= 1 && page <= self.total_pages {
            self.page = page;
            true
        } else {
            false
        }
    }

    /// Folds a response summary in. `page` stays client-controlled.
    pub fn apply_summary(&mut self, summary: &SearchSummary) {
        self.page_size = summary.page_size;
        self.total_pages = summary.total_pages;
        self.total_matches = summary.matches;
    }
}

/// Which statuses the result view lets through. Applied client-side only,
/// never sent to the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusFilter {
    pub accept: bool,
    pub reject: bool,
}

impl Default for StatusFilter {
    fn default() -> Self {
        Self {
            accept: true,
            reject: true,
        }
    }
}

impl StatusFilter {
    pub fn allows(&self, status: EventStatus) -> bool {
        match status {
            EventStatus::Accept => self.accept,
            EventStatus::Reject => self.reject,
        }
    }

    pub fn toggle(&mut self, status: EventStatus) {
        match status {
            EventStatus::Accept => self.accept = !self.accept,
            EventStatus::Reject => self.reject = !self.reject,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(status: EventStatus) -> EventRecord {
        EventRecord {
            source_ip: None,
            destination_ip: None,
            start_time: None,
            end_time: None,
            status,
            action: None,
            filename: None,
            interface_id: None,
            packets: None,
            bytes: None,
        }
    }

    #[test]
    fn record_decodes_with_only_status() {
        let decoded: EventRecord = serde_json::from_value(json!({"status": "ACCEPT"})).unwrap();
        assert_eq!(decoded.status, EventStatus::Accept);
        assert_eq!(decoded.source_ip, None);
        assert_eq!(decoded.packets, None);
    }

    #[test]
    fn record_decodes_full_shape() {
        let decoded: EventRecord = serde_json::from_value(json!({
            "interface_id": "eni-0123456789abcdef0",
            "source_ip": "10.0.0.5",
            "destination_ip": "24.57.123.131",
            "packets": "14",
            "bytes": "1200",
            "start_time": 1725000000i64,
            "end_time": 1725000090i64,
            "status": "REJECT",
            "action": "REJECT",
            "filename": "flows-2024-08-30.log"
        }))
        .unwrap();
        assert_eq!(decoded.status, EventStatus::Reject);
        assert_eq!(decoded.destination_ip.as_deref(), Some("24.57.123.131"));
        assert_eq!(decoded.packets.as_deref(), Some("14"));
        assert_eq!(decoded.start_time, Some(1725000000));
    }

    #[test]
    fn counters_accept_integers_and_normalize_to_text() {
        let decoded: EventRecord =
            serde_json::from_value(json!({"status": "ACCEPT", "packets": 42, "bytes": "96"}))
                .unwrap();
        assert_eq!(decoded.packets.as_deref(), Some("42"));
        assert_eq!(decoded.bytes.as_deref(), Some("96"));
    }

    #[test]
    fn unknown_status_is_a_decode_error() {
        let result = serde_json::from_value::<EventRecord>(json!({"status": "DROPPED"}));
        assert!(result.is_err());
    }

    #[test]
    fn summary_defaults_optional_bookkeeping() {
        let decoded: SearchSummary = serde_json::from_value(json!({
            "matches": 40,
            "page_size": 12,
            "total_pages": 4
        }))
        .unwrap();
        assert_eq!(decoded.files_scanned, 0);
        assert_eq!(decoded.lines_checked, 0);
        assert_eq!(decoded.page, 1);
        assert_eq!(decoded.duration_seconds, 0.0);
    }

    #[test]
    fn response_decodes_service_shape() {
        let decoded: SearchResponse = serde_json::from_value(json!({
            "results": [{"status": "ACCEPT", "source_ip": "10.0.0.5"}],
            "summary": {
                "files_scanned": 12,
                "lines_checked": 40896,
                "matches": 1,
                "page": 1,
                "page_size": 12,
                "total_pages": 1,
                "duration_seconds": 0.48
            }
        }))
        .unwrap();
        assert_eq!(decoded.results.len(), 1);
        assert_eq!(decoded.summary.lines_checked, 40896);
    }

    #[test]
    fn blank_params_require_all_fields_empty() {
        assert!(SearchParams::default().is_blank());

        let params = SearchParams {
            end_time: "1725000000".to_string(),
            ..SearchParams::default()
        };
        assert!(!params.is_blank());

        // Whitespace is text as far as the client is concerned.
        let params = SearchParams {
            search_term: " ".to_string(),
            ..SearchParams::default()
        };
        assert!(!params.is_blank());
    }

    #[test]
    fn page_state_defaults() {
        let state = PageState::default();
        assert_eq!(state.page, 1);
        assert_eq!(state.page_size, 12);
        assert_eq!(state.total_pages, 1);
        assert_eq!(state.total_matches, 0);
    }

    #[test]
    fn page_changes_outside_range_are_ignored() {
        let mut state = PageState {
            total_pages: 4,
            ..PageState::default()
        };
        assert!(!state.set_page(0));
        assert_eq!(state.page, 1);
        assert!(!state.set_page(5));
        assert_eq!(state.page, 1);
        assert!(state.set_page(4));
        assert_eq!(state.page, 4);
    }

    #[test]
    fn zero_total_pages_rejects_every_page() {
        let mut state = PageState {
            total_pages: 0,
            ..PageState::default()
        };
        assert!(!state.set_page(1));
        assert_eq!(state.page, 1);
    }

    #[test]
    fn summary_merge_leaves_page_alone() {
        let mut state = PageState::default();
        let summary: SearchSummary = serde_json::from_value(json!({
            "matches": 40,
            "page": 3,
            "page_size": 12,
            "total_pages": 4
        }))
        .unwrap();
        state.apply_summary(&summary);
        assert_eq!(state.page, 1);
        assert_eq!(state.total_pages, 4);
        assert_eq!(state.total_matches, 40);
    }

    #[test]
    fn filter_defaults_to_both_enabled() {
        let filter = StatusFilter::default();
        assert!(filter.allows(EventStatus::Accept));
        assert!(filter.allows(EventStatus::Reject));
    }

    #[test]
    fn accept_only_filter_passes_accept_records() {
        let filter = StatusFilter {
            accept: true,
            reject: false,
        };
        let records = [record(EventStatus::Accept), record(EventStatus::Reject)];
        let visible: Vec<_> = records.iter().filter(|r| filter.allows(r.status)).collect();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].status, EventStatus::Accept);
    }

    #[test]
    fn filter_predicate_matches_enabled_statuses() {
        let mut filter = StatusFilter::default();
        filter.toggle(EventStatus::Reject);
        assert!(filter.allows(EventStatus::Accept));
        assert!(!filter.allows(EventStatus::Reject));

        filter.toggle(EventStatus::Accept);
        assert!(!filter.allows(EventStatus::Accept));
        assert!(!filter.allows(EventStatus::Reject));

        let records = [record(EventStatus::Accept), record(EventStatus::Reject)];
        let visible: Vec<_> = records.iter().filter(|r| filter.allows(r.status)).collect();
        assert!(visible.is_empty());
    }

    #[test]
    fn status_round_trips_screaming_case() {
        let encoded = serde_json::to_value(EventStatus::Accept).unwrap();
        assert_eq!(encoded, json!("ACCEPT"));
        let decoded: EventStatus = serde_json::from_value(json!("REJECT")).unwrap();
        assert_eq!(decoded, EventStatus::Reject);
    }
}
