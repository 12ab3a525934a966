use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct LedgerEntry {
    pub records: Vec<bool>,
    #[serde(default)]
    pub note: String,
}

impl LedgerEntry {
    pub fn from_records(records: Vec<bool>) -> Self {
        Self {
            records,
            note: String::new(),
        }
    }

    pub fn present_count(&self) -> usize {
        self.records.iter().filter(|r| **r).count()
    }

    pub fn attendance_percent(&self) -> u8 {
        attendance_percent(&self.records)
    }

    pub fn set_all(&mut self, present: bool) {
        self.records.iter_mut().for_each(|r| *r = present);
    }
}

/// `round(100 * present / total)` rounding half up; an empty log is 0%.
pub fn attendance_percent(records: &[bool]) -> u8 {
    let total = records.len();
    if total == 0 {
        return 0;
    }
    let present = records.iter().filter(|r| **r).count();
    // floor((200p + t) / 2t) == round_half_up(100p / t)
    ((200 * present + total) / (2 * total)) as u8
}

pub fn encode_token(present: bool) -> &'static str {
    if present {
        "P"
    } else {
        "A"
    }
}

pub fn decode_token(token: &str) -> bool {
    token.trim().eq_ignore_ascii_case("P")
}
