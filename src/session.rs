//! Owned UI session state: the text surfaces, selections, per-action
//! pending flags, and the notification queue. State transitions live here,
//! away from any egui types, so the rendering layer stays a thin shell.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use crate::constants::{NOTICE_FADE_SECS, NOTICE_VISIBLE_SECS};
use crate::types::{ActionKind, Language, Mode, Outcome, SpecialOutput};

// ============================================================================
// NOTIFICATIONS
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Severity {
    Info,
    Success,
    Error,
}

/// A transient user-facing message. Auto-dismissed after a fixed visible
/// window plus a fade, or dismissed via its close control.
#[derive(Debug)]
pub struct Notice {
    pub message: String,
    pub severity: Severity,
    pub created: Instant,
}

impl Notice {
    pub fn lifetime() -> Duration {
        Duration::from_secs_f32(NOTICE_VISIBLE_SECS + NOTICE_FADE_SECS)
    }

    pub fn expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created) >= Self::lifetime()
    }

    /// 1.0 while visible, falling to 0.0 across the fade window.
    pub fn alpha(&self, now: Instant) -> f32 {
        let age = now.saturating_duration_since(self.created).as_secs_f32();
        if age <= NOTICE_VISIBLE_SECS {
            1.0
        } else {
            (1.0 - (age - NOTICE_VISIBLE_SECS) / NOTICE_FADE_SECS).clamp(0.0, 1.0)
        }
    }
}

/// Insertion-ordered notification queue. No deduplication.
#[derive(Default, Debug)]
pub struct Notices {
    items: Vec<Notice>,
}

impl Notices {
    pub fn push(&mut self, severity: Severity, message: impl Into<String>) {
        self.items.push(Notice {
            message: message.into(),
            severity,
            created: Instant::now(),
        });
    }

    pub fn dismiss(&mut self, index: usize) {
        if index < self.items.len() {
            self.items.remove(index);
        }
    }

    pub fn prune(&mut self, now: Instant) {
        self.items.retain(|notice| !notice.expired(now));
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.items.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

// ============================================================================
// SESSION
// ============================================================================

/// Why an action did not start.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BeginError {
    /// The same action is already in flight; the click is a no-op.
    Busy,
    /// A required input was empty; an error notice has been pushed.
    MissingInput,
}

/// Follow-up work an applied outcome asks the caller to start.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FollowUp {
    Execute,
}

pub struct Session {
    pub prompt: String,
    pub code: String,
    pub output: String,
    pub mode: Mode,
    pub language: Language,
    pub model: String,
    pub models: Vec<String>,
    pub run_after_generate: bool,
    pub show_code: bool,
    /// Read-only flag of the code surface. Starts locked.
    pub code_locked: bool,
    pub package_name: String,
    pub special_outputs: Vec<SpecialOutput>,
    pub notices: Notices,
    in_flight: HashSet<ActionKind>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            prompt: String::new(),
            code: String::new(),
            output: String::new(),
            mode: Mode::Code,
            language: Language::Python,
            model: String::new(),
            models: Vec::new(),
            run_after_generate: false,
            show_code: true,
            code_locked: true,
            package_name: String::new(),
            special_outputs: Vec::new(),
            notices: Notices::default(),
            in_flight: HashSet::new(),
        }
    }

    pub fn is_pending(&self, kind: ActionKind) -> bool {
        self.in_flight.contains(&kind)
    }

    /// Gate for starting a backend action: suppresses re-entrant clicks,
    /// validates required input before any request leaves the client, and
    /// flips the pending flag. On `Ok` the caller issues the request.
    pub fn begin(&mut self, kind: ActionKind) -> Result<(), BeginError> {
        if self.in_flight.contains(&kind) {
            return Err(BeginError::Busy);
        }

        let missing = match kind {
            ActionKind::Generate if self.prompt.trim().is_empty() => Some("Please enter a prompt"),
            ActionKind::Execute if self.code.trim().is_empty() => Some("No code to execute"),
            ActionKind::Fix if self.code.trim().is_empty() => Some("Please enter code to fix"),
            ActionKind::Save if self.code.trim().is_empty() => Some("No code to save"),
            ActionKind::Install if self.package_name.trim().is_empty() => {
                Some("Please enter a package name")
            }
            _ => None,
        };
        if let Some(message) = missing {
            self.notices.push(Severity::Error, message);
            return Err(BeginError::MissingInput);
        }

        self.in_flight.insert(kind);
        match kind {
            ActionKind::Generate => self.notices.push(Severity::Info, "Generating code..."),
            ActionKind::Execute => self.notices.push(Severity::Info, "Executing code..."),
            ActionKind::Fix => self.notices.push(Severity::Info, "Fixing code..."),
            ActionKind::Save => self.notices.push(Severity::Info, "Saving code..."),
            ActionKind::Install => self.notices.push(
                Severity::Info,
                format!("Installing package: {}...", self.package_name.trim()),
            ),
            ActionKind::LoadModels => {}
        }
        Ok(())
    }

    /// Applies a completed action. Always clears the pending flag, success
    /// or failure, so the triggering control re-enables.
    pub fn finish(
        &mut self,
        kind: ActionKind,
        outcome: Result<Outcome, String>,
    ) -> Option<FollowUp> {
        self.in_flight.remove(&kind);

        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(message) => {
                self.notices.push(Severity::Error, message);
                return None;
            }
        };

        match outcome {
            Outcome::Generated { code, run_after } => {
                self.code = code;
                self.code_locked = true;
                self.notices
                    .push(Severity::Success, "Code generated successfully");
                run_after.then_some(FollowUp::Execute)
            }
            Outcome::Executed { result, special } => {
                self.output = result;
                self.special_outputs = special;
                self.notices
                    .push(Severity::Success, "Code executed successfully");
                None
            }
            Outcome::Fixed { code } => {
                self.code = code;
                self.notices
                    .push(Severity::Success, "Code fixed successfully");
                None
            }
            Outcome::Saved { message } => {
                self.notices.push(Severity::Success, message);
                None
            }
            Outcome::Installed { message } => {
                self.package_name.clear();
                self.notices.push(Severity::Success, message);
                None
            }
            Outcome::Models { names } => {
                if self.model.is_empty() || !names.contains(&self.model) {
                    self.model = names.first().cloned().unwrap_or_default();
                }
                self.models = names;
                self.notices
                    .push(Severity::Success, "Models loaded successfully");
                None
            }
        }
    }

    /// Local-only transition between {editable, locked}.
    pub fn toggle_code_lock(&mut self) {
        self.code_locked = !self.code_locked;
        let state = if self.code_locked { "locked" } else { "editable" };
        self.notices
            .push(Severity::Info, format!("Code editor is now {state}"));
    }

    /// Button label for the lock toggle: offers the opposite state.
    pub fn lock_label(&self) -> &'static str {
        if self.code_locked {
            "Edit"
        } else {
            "Lock"
        }
    }

    pub fn clear_all(&mut self) {
        self.prompt.clear();
        self.code.clear();
        self.output.clear();
        self.special_outputs.clear();
        self.notices.push(Severity::Info, "All fields cleared");
    }

    /// Appends a formatted block (selected files/folder) to the prompt,
    /// separated from existing text by a blank line.
    pub fn append_prompt_block(&mut self, block: &str) {
        if !self.prompt.is_empty() {
            self.prompt.push_str("\n\n");
        }
        self.prompt.push_str(block);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending_count(session: &Session) -> usize {
        [
            ActionKind::Generate,
            ActionKind::Execute,
            ActionKind::Fix,
            ActionKind::Save,
            ActionKind::Install,
            ActionKind::LoadModels,
        ]
        .iter()
        .filter(|kind| session.is_pending(**kind))
        .count()
    }

    #[test]
    fn empty_prompt_blocks_generate_and_notifies() {
        let mut session = Session::new();
        session.prompt = "   \n\t".to_string();

        assert_eq!(
            session.begin(ActionKind::Generate),
            Err(BeginError::MissingInput)
        );
        assert!(!session.is_pending(ActionKind::Generate));
        let notice = session.notices.iter().next().expect("error notice");
        assert_eq!(notice.severity, Severity::Error);
        assert_eq!(notice.message, "Please enter a prompt");
    }

    #[test]
    fn empty_code_blocks_execute_fix_and_save() {
        let mut session = Session::new();
        for kind in [ActionKind::Execute, ActionKind::Fix, ActionKind::Save] {
            assert_eq!(session.begin(kind), Err(BeginError::MissingInput));
        }
        assert_eq!(pending_count(&session), 0);
        assert_eq!(session.notices.len(), 3);
    }

    #[test]
    fn second_click_while_pending_is_a_no_op() {
        let mut session = Session::new();
        session.prompt = "print hello".to_string();

        assert!(session.begin(ActionKind::Generate).is_ok());
        let notices_after_first = session.notices.len();
        assert_eq!(session.begin(ActionKind::Generate), Err(BeginError::Busy));
        // no extra notice, still exactly one pending action
        assert_eq!(session.notices.len(), notices_after_first);
        assert_eq!(pending_count(&session), 1);
    }

    #[test]
    fn generated_code_replaces_surface_and_relocks() {
        let mut session = Session::new();
        session.prompt = "print hello".to_string();
        session.code_locked = false;
        session.begin(ActionKind::Generate).unwrap();

        let follow = session.finish(
            ActionKind::Generate,
            Ok(Outcome::Generated {
                code: "print('hello')".to_string(),
                run_after: false,
            }),
        );

        assert_eq!(follow, None);
        assert_eq!(session.code, "print('hello')");
        assert!(session.code_locked);
        assert!(!session.is_pending(ActionKind::Generate));
    }

    #[test]
    fn generate_with_run_after_requests_execute_follow_up() {
        let mut session = Session::new();
        session.prompt = "print hello".to_string();
        session.run_after_generate = true;
        session.begin(ActionKind::Generate).unwrap();

        let follow = session.finish(
            ActionKind::Generate,
            Ok(Outcome::Generated {
                code: "print('hello')".to_string(),
                run_after: true,
            }),
        );
        assert_eq!(follow, Some(FollowUp::Execute));
    }

    #[test]
    fn execute_outcome_fills_output_and_replaces_special_blocks() {
        let mut session = Session::new();
        session.special_outputs = vec![SpecialOutput::Html {
            title: "Old".to_string(),
            content: "<b>old</b>".to_string(),
        }];
        session.code = "print('hello')".to_string();
        session.begin(ActionKind::Execute).unwrap();

        session.finish(
            ActionKind::Execute,
            Ok(Outcome::Executed {
                result: "hello\n".to_string(),
                special: Vec::new(),
            }),
        );
        assert_eq!(session.output, "hello\n");
        assert!(session.special_outputs.is_empty());
    }

    #[test]
    fn failure_clears_pending_and_pushes_error() {
        let mut session = Session::new();
        session.code = "x".to_string();
        session.begin(ActionKind::Fix).unwrap();

        let follow = session.finish(ActionKind::Fix, Err("Failed to fix code".to_string()));
        assert_eq!(follow, None);
        assert!(!session.is_pending(ActionKind::Fix));
        let last = session.notices.iter().last().expect("error notice");
        assert_eq!(last.severity, Severity::Error);
        assert_eq!(last.message, "Failed to fix code");
    }

    #[test]
    fn install_success_clears_package_input() {
        let mut session = Session::new();
        session.package_name = "numpy".to_string();
        session.begin(ActionKind::Install).unwrap();

        session.finish(
            ActionKind::Install,
            Ok(Outcome::Installed {
                message: "Package numpy installed successfully".to_string(),
            }),
        );
        assert!(session.package_name.is_empty());
    }

    #[test]
    fn model_load_failure_leaves_selector_empty() {
        let mut session = Session::new();
        session.begin(ActionKind::LoadModels).unwrap();
        session.finish(ActionKind::LoadModels, Err("Failed to fetch models".to_string()));
        assert!(session.models.is_empty());
        assert!(session.model.is_empty());
    }

    #[test]
    fn model_load_success_selects_first_entry() {
        let mut session = Session::new();
        session.begin(ActionKind::LoadModels).unwrap();
        session.finish(
            ActionKind::LoadModels,
            Ok(Outcome::Models {
                names: vec!["code-llama".to_string(), "mistral-7b".to_string()],
            }),
        );
        assert_eq!(session.model, "code-llama");
        assert_eq!(session.models.len(), 2);
    }

    #[test]
    fn toggling_lock_twice_restores_state_and_label() {
        let mut session = Session::new();
        assert!(session.code_locked);
        assert_eq!(session.lock_label(), "Edit");

        session.toggle_code_lock();
        assert!(!session.code_locked);
        assert_eq!(session.lock_label(), "Lock");

        session.toggle_code_lock();
        assert!(session.code_locked);
        assert_eq!(session.lock_label(), "Edit");
    }

    #[test]
    fn prompt_block_append_separates_with_blank_line() {
        let mut session = Session::new();
        session.append_prompt_block("Selected Folder:\n/home/user/project");
        assert_eq!(session.prompt, "Selected Folder:\n/home/user/project");

        session.prompt = "write a parser".to_string();
        session.append_prompt_block("Selected Files:\n/tmp/a.py");
        assert_eq!(
            session.prompt,
            "write a parser\n\nSelected Files:\n/tmp/a.py"
        );
    }

    #[test]
    fn notices_display_in_insertion_order_without_dedup() {
        let mut notices = Notices::default();
        notices.push(Severity::Info, "one");
        notices.push(Severity::Info, "one");
        notices.push(Severity::Error, "two");

        let messages: Vec<&str> = notices.iter().map(|n| n.message.as_str()).collect();
        assert_eq!(messages, vec!["one", "one", "two"]);
    }

    #[test]
    fn notice_expires_after_visible_plus_fade() {
        let mut notices = Notices::default();
        notices.push(Severity::Success, "done");
        let created = notices.iter().next().unwrap().created;

        let just_before = created + Notice::lifetime() - Duration::from_millis(10);
        let just_after = created + Notice::lifetime();

        assert!(!notices.iter().next().unwrap().expired(just_before));
        assert!(notices.iter().next().unwrap().expired(just_after));

        notices.prune(just_after);
        assert!(notices.is_empty());
    }

    #[test]
    fn notice_alpha_fades_to_zero() {
        let mut notices = Notices::default();
        notices.push(Severity::Info, "fading");
        let notice = notices.iter().next().unwrap();

        assert_eq!(notice.alpha(notice.created), 1.0);
        let mid_fade = notice.created
            + Duration::from_secs_f32(crate::constants::NOTICE_VISIBLE_SECS)
            + Duration::from_secs_f32(crate::constants::NOTICE_FADE_SECS / 2.0);
        let alpha = notice.alpha(mid_fade);
        assert!(alpha > 0.0 && alpha < 1.0);
        assert_eq!(notice.alpha(notice.created + Notice::lifetime()), 0.0);
    }
}
