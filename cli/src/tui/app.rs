use chrono::NaiveDate;
use homeroom_core::{time, AttendanceLedger, LedgerStore, Persistence, RosterStore};
use ratatui::widgets::TableState;

pub enum InputMode {
    Normal,
    EditingNote,
}

pub struct App<'a, S: LedgerStore> {
    pub roster: &'a RosterStore,
    pub ledger: AttendanceLedger<'a, S>,
    pub dates: Vec<NaiveDate>,
    pub state: TableState,
    pub day: usize,
    pub input: String,
    pub input_mode: InputMode,
    pub cursor_position: usize,
    pub status: Option<String>,
}

impl<'a, S: LedgerStore> App<'a, S> {
    pub fn new(roster: &'a RosterStore, ledger: AttendanceLedger<'a, S>, today: NaiveDate) -> Self {
        let dates = time::window_dates(today, ledger.window_days());
        let day = ledger.today_index();
        let mut state = TableState::default();
        if !roster.list().is_empty() {
            state.select(Some(0));
        }
        App {
            roster,
            ledger,
            dates,
            state,
            day,
            input: String::new(),
            input_mode: InputMode::Normal,
            cursor_position: 0,
            status: None,
        }
    }

    pub fn selected_name(&self) -> Option<&'a str> {
        let roster: &'a RosterStore = self.roster;
        self.state
            .selected()
            .and_then(|i| roster.list().get(i))
            .map(|s| s.name.as_str())
    }

    pub fn next(&mut self) {
        let len = self.roster.list().len();
        if len == 0 { return; }

        let i = match self.state.selected() {
            Some(i) => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.roster.list().len();
        if len == 0 { return; }

        let i = match self.state.selected() {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn next_day(&mut self) {
        if self.day < self.ledger.today_index() {
            self.day += 1;
        }
    }

    pub fn previous_day(&mut self) {
        self.day = self.day.saturating_sub(1);
    }

    pub fn jump_to_today(&mut self) {
        self.day = self.ledger.today_index();
    }

    pub fn toggle_selected(&mut self) {
        if let Some(name) = self.selected_name() {
            match self.ledger.toggle_present(name, self.day) {
                Ok(outcome) => self.record(outcome, None),
                Err(err) => self.status = Some(err.to_string()),
            }
        }
    }

    pub fn mark_all(&mut self, present: bool) {
        let outcome = self.ledger.set_all(present);
        let label = if present { "All marked present" } else { "All marked absent" };
        self.record(outcome, Some(label));
    }

    pub fn roll_call(&mut self, present: bool) {
        match self.ledger.set_day(self.day, present) {
            Ok(outcome) => self.record(outcome, Some("Roll-call updated")),
            Err(err) => self.status = Some(err.to_string()),
        }
    }

    pub fn save(&mut self) {
        let outcome = self.ledger.save();
        self.record(outcome, Some("Saved"));
    }

    pub fn reset(&mut self) {
        let outcome = self.ledger.reset();
        self.record(outcome, Some("Reset to roster"));
    }

    fn record(&mut self, outcome: Persistence, label: Option<&str>) {
        self.status = match outcome.warning() {
            Some(err) => Some(format!("Not saved: {}", err)),
            None => label.map(|l| l.to_string()),
        };
    }

    pub fn enter_note_mode(&mut self) {
        if let Some(name) = self.selected_name() {
            self.input = self
                .ledger
                .entry(name)
                .map(|e| e.note.clone())
                .unwrap_or_default();
            self.cursor_position = self.input.chars().count();
            self.input_mode = InputMode::EditingNote;
        }
    }

    pub fn exit_input_mode(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn input_char(&mut self, c: char) {
        let byte_index = self.byte_index(self.cursor_position);
        self.input.insert(byte_index, c);
        self.cursor_position += 1;
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position > 0 {
            let byte_index = self.byte_index(self.cursor_position - 1);
            self.input.remove(byte_index);
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.input.chars().count() {
            self.cursor_position += 1;
        }
    }

    pub fn byte_index(&self, chars: usize) -> usize {
        self.input.chars().take(chars).map(|c| c.len_utf8()).sum()
    }

    pub fn submit_note(&mut self) {
        if let Some(name) = self.selected_name() {
            match self.ledger.update_note(name, self.input.trim()) {
                Ok(outcome) => self.record(outcome, Some("Note saved")),
                Err(err) => self.status = Some(err.to_string()),
            }
        }
        self.input.clear();
        self.cursor_position = 0;
        self.exit_input_mode();
    }
}
