use serde::{Deserialize, Serialize};
use uuid::Uuid;

fn default_attempt() -> i32 {
    1
}

/// One queue message per document awaiting processing.
///
/// Wire form is UTF-8 JSON with exactly these two fields:
/// `{"documentId": "...", "attempt": 1}`. The `attempt` counter is carried
/// for retry bookkeeping but nothing increments or consults it; there is no
/// requeue-on-failure path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct QueuedWorkItem {
    pub document_id: Uuid,
    #[serde(default = "default_attempt")]
    pub attempt: i32,
}

impl QueuedWorkItem {
    pub fn new(document_id: Uuid) -> Self {
        QueuedWorkItem {
            document_id,
            attempt: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_format_has_exactly_two_camel_case_fields() {
        let item = QueuedWorkItem::new(Uuid::nil());
        let json = serde_json::to_value(&item).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 2);
        assert_eq!(
            json["documentId"],
            "00000000-0000-0000-0000-000000000000"
        );
        assert_eq!(json["attempt"], 1);
    }

    #[test]
    fn attempt_defaults_to_one_when_absent() {
        let id = Uuid::new_v4();
        let item: QueuedWorkItem =
            serde_json::from_str(&format!("{{\"documentId\": \"{}\"}}", id)).unwrap();
        assert_eq!(item.document_id, id);
        assert_eq!(item.attempt, 1);
    }

    #[test]
    fn round_trips_structurally_equal() {
        let item = QueuedWorkItem::new(Uuid::new_v4());
        let json = serde_json::to_string(&item).unwrap();
        let back: QueuedWorkItem = serde_json::from_str(&json).unwrap();
        assert_eq!(back, item);
    }
}
