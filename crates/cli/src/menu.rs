//! Interactive menu: a dispatcher over the five views.
//!
//! The loop shows the navigation list, reads a selection, runs exactly one
//! view with the session's service and prints the view's status. Failed
//! operations are reported and the loop continues; end of input or `q` ends
//! the session.

use crate::editor::GridEditor;
use crate::prompt::Prompt;
use crate::views::{self, Status};
use hrms_core::RecordService;
use std::io::{self, BufRead, Write};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuChoice {
    Dashboard,
    ViewSearch,
    AddPatient,
    EditRecords,
    DeleteRecord,
    Quit,
}

impl MenuChoice {
    /// Navigation entries in display order; entry `n` is selected with `n + 1`.
    pub const VIEWS: [MenuChoice; 5] = [
        MenuChoice::Dashboard,
        MenuChoice::ViewSearch,
        MenuChoice::AddPatient,
        MenuChoice::EditRecords,
        MenuChoice::DeleteRecord,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MenuChoice::Dashboard => "Dashboard",
            MenuChoice::ViewSearch => "View & Search",
            MenuChoice::AddPatient => "Add Patient",
            MenuChoice::EditRecords => "Edit Records",
            MenuChoice::DeleteRecord => "Delete Record",
            MenuChoice::Quit => "Quit",
        }
    }

    /// Accepts the entry number, the label (any case) or `q`/`quit`.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.eq_ignore_ascii_case("q") || input.eq_ignore_ascii_case("quit") {
            return Some(MenuChoice::Quit);
        }
        if let Ok(n) = input.parse::<usize>() {
            return n.checked_sub(1).and_then(|i| Self::VIEWS.get(i).copied());
        }
        Self::VIEWS
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(input))
    }
}

fn menu_text() -> String {
    let mut text = String::from("\nHealth RMS\n");
    for (i, choice) in MenuChoice::VIEWS.iter().enumerate() {
        text.push_str(&format!("  {}) {}\n", i + 1, choice.label()));
    }
    text.push_str("  q) Quit\n");
    text
}

/// Run one view.
pub fn dispatch<R: BufRead, W: Write>(
    choice: MenuChoice,
    service: &mut RecordService,
    prompt: &mut Prompt<R, W>,
    editor: &dyn GridEditor,
) -> io::Result<Status> {
    match choice {
        MenuChoice::Dashboard => views::dashboard_view(service, prompt),
        MenuChoice::ViewSearch => views::search_view(service, prompt),
        MenuChoice::AddPatient => views::add_patient_view(service, prompt),
        MenuChoice::EditRecords => views::edit_records_view(service, prompt, editor),
        MenuChoice::DeleteRecord => views::delete_record_view(service, prompt),
        MenuChoice::Quit => Ok(Status::Info("Goodbye.".into())),
    }
}

pub fn run<R: BufRead, W: Write>(
    service: &mut RecordService,
    prompt: &mut Prompt<R, W>,
    editor: &dyn GridEditor,
) -> io::Result<()> {
    loop {
        prompt.say(menu_text())?;
        let Some(line) = prompt.ask("Select")? else {
            break;
        };

        let Some(choice) = MenuChoice::parse(&line) else {
            prompt.say(Status::Error(format!("Unknown option {:?}", line.trim())).to_string())?;
            continue;
        };
        if choice == MenuChoice::Quit {
            break;
        }

        prompt.say(format!("\n== {} ==", choice.label()))?;
        let status = dispatch(choice, service, prompt, editor)?;
        if status.is_error() {
            tracing::debug!("view {} failed: {}", choice.label(), status);
        }
        prompt.say(status.to_string())?;
    }

    prompt.say("Goodbye.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use hrms_core::CoreConfig;
    use std::io::Cursor;
    use tempfile::TempDir;

    struct NoEditor;

    impl GridEditor for NoEditor {
        fn edit(&self, _grid: &str) -> io::Result<String> {
            Err(io::Error::other("no editor in tests"))
        }
    }

    fn run_session(dir: &TempDir, input: &str) -> (RecordService, String) {
        let cfg = CoreConfig::new(dir.path().join("health_records.csv"))
            .expect("CoreConfig::new should succeed");
        let mut service = RecordService::open(&cfg).expect("open should succeed");
        let mut prompt = Prompt::new(Cursor::new(input.to_string()), Vec::new());

        run(&mut service, &mut prompt, &NoEditor).expect("menu should run");

        let output = String::from_utf8(prompt.into_output()).expect("utf8 output");
        (service, output)
    }

    #[test]
    fn test_parse_choice() {
        assert_eq!(MenuChoice::parse("1"), Some(MenuChoice::Dashboard));
        assert_eq!(MenuChoice::parse(" 5 "), Some(MenuChoice::DeleteRecord));
        assert_eq!(MenuChoice::parse("view & search"), Some(MenuChoice::ViewSearch));
        assert_eq!(MenuChoice::parse("Q"), Some(MenuChoice::Quit));
        assert_eq!(MenuChoice::parse("0"), None);
        assert_eq!(MenuChoice::parse("6"), None);
        assert_eq!(MenuChoice::parse("help"), None);
    }

    #[test]
    fn test_session_scenario() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let input = [
            "3", "Alice", "30", "Female", "", "", "", "", // add Alice
            "3", "Bob", "40", "Male", "O+", "555-0100", "", "", // add Bob
            "5", "1", // delete Alice
            "3", "Carol", "50", "Other", "", "", "", "", // add Carol
            "1", // dashboard
            "2", "", // list all
            "q",
        ]
        .join("\n")
            + "\n";

        let (service, output) = run_session(&temp_dir, &input);

        let ids: Vec<u64> = service.records().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 3]);
        assert!(output.contains("[ok] Patient Alice added! ID: 1"));
        assert!(output.contains("[ok] Patient Bob added! ID: 2"));
        assert!(output.contains("[ok] Deleted: Alice (ID 1)"));
        assert!(output.contains("[ok] Patient Carol added! ID: 3"));
        assert!(output.contains("Total Patients  2"));
        assert!(output.contains("Showing 2 of 2 records"));
        assert!(output.trim_end().ends_with("Goodbye."));
    }

    #[test]
    fn test_errors_do_not_end_session() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let input = "nonsense\n3\n\n30\nMale\n\n\n\n\n4\n3\nDan\n20\nMale\n\n\n\n\n4\n";

        let (service, output) = run_session(&temp_dir, input);

        assert!(output.contains("[error] Unknown option \"nonsense\""));
        assert!(output.contains("[error] Name, Age and Gender are required!"));
        assert!(output.contains("[info] No data yet."));
        assert!(output.contains("[error] Edit abandoned: no editor in tests"));
        assert_eq!(service.records().len(), 1);
    }
}
