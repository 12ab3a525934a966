use chrono::NaiveDate;
use homeroom_core::attendance_csv::encode_records;
use homeroom_core::{LedgerEntry, StudentSummary};
use tabled::settings::object::Rows;
use tabled::settings::{Color, Modify, Style};
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct RosterRow {
    #[tabled(rename = "Student")]
    name: String,
    #[tabled(rename = "Group")]
    group: String,
    #[tabled(rename = "Points")]
    points: i32,
    #[tabled(rename = "Attendance")]
    attendance: String,
}

#[derive(Tabled)]
struct BehaviourRow {
    #[tabled(rename = "Student")]
    name: String,
    #[tabled(rename = "Ratings")]
    ratings: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Poor")]
    poor: usize,
    #[tabled(rename = "Detention")]
    detention: String,
    #[tabled(rename = "Attendance")]
    attendance: String,
}

#[derive(Tabled)]
struct AttendanceRow {
    #[tabled(rename = "Student")]
    name: String,
    #[tabled(rename = "Days (oldest → today)")]
    days: String,
    #[tabled(rename = "Present")]
    present: String,
    #[tabled(rename = "Note")]
    note: String,
}

#[derive(Tabled)]
struct RollCallRow {
    #[tabled(rename = "Student")]
    name: String,
    #[tabled(rename = "Today")]
    today: String,
    #[tabled(rename = "Note")]
    note: String,
}

fn render<T: Tabled>(rows: Vec<T>) -> String {
    let mut table = Table::new(rows);
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN)); // Header color
    table.to_string()
}

pub fn roster_table(summaries: &[StudentSummary]) -> String {
    let rows = summaries
        .iter()
        .map(|s| RosterRow {
            name: s.name.clone(),
            group: s.group.clone(),
            points: s.points,
            attendance: format!("{}%", s.attendance_percent),
        })
        .collect();
    render::<RosterRow>(rows)
}

pub fn behaviour_table(summaries: &[StudentSummary]) -> String {
    let rows = summaries
        .iter()
        .map(|s| BehaviourRow {
            name: s.name.clone(),
            ratings: s
                .ratings
                .iter()
                .map(|r| r.to_string())
                .collect::<Vec<_>>()
                .join(", "),
            description: s.behaviour.clone(),
            poor: s.poor_count,
            detention: if s.detention { "✓ YES".to_string() } else { "No".to_string() },
            attendance: format!("{}%", s.attendance_percent),
        })
        .collect();
    render::<BehaviourRow>(rows)
}

pub fn attendance_table(entries: &[(&str, &LedgerEntry)]) -> String {
    let rows = entries
        .iter()
        .map(|(name, entry)| AttendanceRow {
            name: name.to_string(),
            days: encode_records(&entry.records).replace('|', ""),
            present: format!("{}/{}", entry.present_count(), entry.records.len()),
            note: entry.note.clone(),
        })
        .collect();
    render::<AttendanceRow>(rows)
}

pub fn roll_call_table(entries: &[(&str, &LedgerEntry)], today: NaiveDate) -> String {
    let rows = entries
        .iter()
        .map(|(name, entry)| {
            let present = entry.records.last().copied().unwrap_or(false);
            RollCallRow {
                name: name.to_string(),
                today: format!(
                    "{} {}",
                    today.format("%Y-%m-%d"),
                    if present { "Present" } else { "Absent" }
                ),
                note: entry.note.clone(),
            }
        })
        .collect();
    render::<RollCallRow>(rows)
}
