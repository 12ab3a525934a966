mod logging;
mod report;
mod tables;
mod tui;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use homeroom_core::config::resolve_data_dir;
use homeroom_core::{
    parse_day_ref, resolve_student, time, AttendanceLedger, DetentionMonitor, FileLedgerStore,
    LedgerStore, MemoryLedgerStore, Persistence, RosterSeed, RosterStore, StudentSummary,
};

#[derive(Parser)]
#[command(name = "homeroom")]
#[command(about = "Class roster, behaviour and attendance tracker", long_about = None)]
struct Cli {
    /// Directory holding the saved ledger and logs (default: ~/.homeroom)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    /// JSON roster file to seed from instead of the built-in class
    #[arg(long, global = true)]
    roster: Option<PathBuf>,
    /// Keep attendance changes in memory only
    #[arg(long, global = true)]
    ephemeral: bool,
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List students with group, points and attendance
    Roster {
        #[arg(long)]
        group: Option<String>,
    },
    /// Behaviour ratings and detention flags
    Behaviour,
    /// Announce students who have triggered detention
    Alerts,
    /// Show the attendance ledger
    Attendance {
        /// Only today's roll-call column
        #[arg(long)]
        today: bool,
    },
    /// Flip one day for one student (day: today, yesterday, -N, YYYY-MM-DD or index)
    Toggle { student: String, day: String },
    /// Mark every day for every student
    MarkAll { mark: Mark },
    /// Mark one day for every student
    RollCall { day: String, mark: Mark },
    /// Replace a student's note
    Note {
        student: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },
    /// Write the ledger as CSV ("-" for stdout)
    Export {
        #[arg(long, default_value = "attendance_export.csv")]
        out: PathBuf,
    },
    /// Merge a CSV export into the ledger by student name
    Import { path: PathBuf },
    /// Discard edits and notes, rebuilding from the roster
    Reset,
    /// Write the ledger to storage
    Save,
    /// Attendance chart
    Report,
    /// Open the Terminal User Interface
    Tui,
}

#[derive(Clone, Copy, ValueEnum)]
enum Mark {
    Present,
    Absent,
}

impl Mark {
    fn is_present(self) -> bool {
        matches!(self, Mark::Present)
    }
}

fn report_persistence(outcome: &Persistence) {
    if let Some(err) = outcome.warning() {
        println!("Warning: change applied but not saved: {}", err);
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let data_dir = resolve_data_dir(cli.data_dir.clone())?;
    let _logger = logging::init(&cli.log_level, &data_dir)?;

    let seed = match &cli.roster {
        Some(path) => RosterSeed::load(path)?,
        None => RosterSeed::reference(),
    };
    let roster = RosterStore::new(seed).context("invalid roster")?;

    let store: Box<dyn LedgerStore> = if cli.ephemeral {
        Box::new(MemoryLedgerStore::new())
    } else {
        Box::new(FileLedgerStore::new(Some(data_dir))?)
    };
    let mut ledger = AttendanceLedger::load(&roster, &*store);
    let today = time::today();

    match cli.command {
        Some(Commands::Roster { group }) => {
            let summaries: Vec<StudentSummary> = match group.as_deref() {
                Some(label) => roster.group(label).map(StudentSummary::from_student).collect(),
                None => roster.summaries(),
            };
            if summaries.is_empty() {
                println!("No students found.");
            } else {
                println!("{}", tables::roster_table(&summaries));
            }
        },
        Some(Commands::Behaviour) => {
            println!("{}", tables::behaviour_table(&roster.summaries()));
        },
        Some(Commands::Alerts) => {
            let alerts = DetentionMonitor::new().check(&roster);
            if alerts.is_empty() {
                println!("No detention triggers.");
            }
            for alert in alerts {
                println!("{}", alert.announcement);
                println!("  {} poor ratings | Attendance: {}%", alert.poor_count, alert.attendance_percent);
            }
        },
        Some(Commands::Attendance { today: only_today }) => {
            let entries = ledger.entries();
            if only_today {
                println!("{}", tables::roll_call_table(&entries, today));
            } else {
                println!("{}", tables::attendance_table(&entries));
            }
        },
        Some(Commands::Toggle { student, day }) => {
            let name = resolve_student(&student, &roster.names())?;
            let index = parse_day_ref(&day, today, ledger.window_days())?;
            let outcome = ledger.toggle_present(name, index)?;
            let present = ledger.entry(name)?.records[index];
            let date = time::window_dates(today, ledger.window_days())[index];
            println!("{} on {}: {}", name, date, if present { "Present" } else { "Absent" });
            report_persistence(&outcome);
        },
        Some(Commands::MarkAll { mark }) => {
            let outcome = ledger.set_all(mark.is_present());
            println!("Marked every day {}.", if mark.is_present() { "present" } else { "absent" });
            report_persistence(&outcome);
        },
        Some(Commands::RollCall { day, mark }) => {
            let index = parse_day_ref(&day, today, ledger.window_days())?;
            let outcome = ledger.set_day(index, mark.is_present())?;
            let date = time::window_dates(today, ledger.window_days())[index];
            println!("Everyone marked {} on {}.", if mark.is_present() { "present" } else { "absent" }, date);
            report_persistence(&outcome);
        },
        Some(Commands::Note { student, text }) => {
            let name = resolve_student(&student, &roster.names())?;
            let outcome = ledger.update_note(name, &text.join(" "))?;
            println!("Note updated for {}.", name);
            report_persistence(&outcome);
        },
        Some(Commands::Export { out }) => {
            let csv = ledger.export_csv()?;
            if out.as_os_str() == "-" {
                print!("{}", csv);
            } else {
                fs::write(&out, csv)
                    .with_context(|| format!("failed to write {}", out.display()))?;
                println!("Exported {} students to {}.", ledger.entries().len(), out.display());
            }
        },
        Some(Commands::Import { path }) => {
            let text = fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let report = ledger.import_csv(&text)?;
            println!("Imported {} students from {}.", report.applied_count(), path.display());
            for name in &report.unknown_students {
                println!("  Skipped unknown student: {}", name);
            }
            for name in &report.mismatched_rows {
                println!("  Skipped {} (expected {} days)", name, ledger.window_days());
            }
            report_persistence(&report.persistence);
        },
        Some(Commands::Reset) => {
            let outcome = ledger.reset();
            println!("Attendance reset from roster.");
            report_persistence(&outcome);
        },
        Some(Commands::Save) => {
            ledger.persist()?;
            println!("Saved.");
        },
        Some(Commands::Report) => {
            let app = report::ReportApp::new(&roster, &ledger);
            report::run(&app)?;
        },
        Some(Commands::Tui) | None => {
            let mut app = tui::app::App::new(&roster, ledger, today);
            tui::run(&mut app)?;
        },
    }
    Ok(())
}
