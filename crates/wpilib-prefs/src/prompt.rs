//! ---
//! wpi_section: "01-core-functionality"
//! wpi_subsection: "module"
//! wpi_type: "source"
//! wpi_scope: "code"
//! wpi_description: "Per-workspace preferences store with file-watch reload."
//! wpi_version: "v0.0.0-prealpha"
//! wpi_owner: "tbd"
//! ---
//! Interactive prompts used by the team-number flow.

use async_trait::async_trait;

use crate::NO_TEAM_NUMBER;

/// Prompt text for the team-number input box.
pub const TEAM_NUMBER_PROMPT: &str = "Enter your team number";
/// Question asked when no team number is configured.
pub const SAVE_TEAM_NUMBER_QUESTION: &str = "No team number, would you like to save one?";

/// User interface able to ask questions. `None` means the prompt was dismissed.
#[async_trait]
pub trait Prompter: Send + Sync {
    /// Ask for free-form text.
    async fn input_box(&self, prompt: &str) -> Option<String>;
    /// Show a message with a fixed set of choices and return the chosen label.
    async fn information_message(&self, message: &str, choices: &[&str]) -> Option<String>;
}

/// Answers to [`SAVE_TEAM_NUMBER_QUESTION`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeamNumberChoice {
    /// Save at global scope.
    SaveGlobally,
    /// Save at workspace-folder scope.
    SaveWorkspace,
    /// Use the number once without saving.
    DontSave,
}

impl TeamNumberChoice {
    /// Every choice, in display order.
    pub const ALL: [TeamNumberChoice; 3] = [
        TeamNumberChoice::SaveGlobally,
        TeamNumberChoice::SaveWorkspace,
        TeamNumberChoice::DontSave,
    ];

    /// Label shown to the user.
    pub fn label(&self) -> &'static str {
        match self {
            TeamNumberChoice::SaveGlobally => "Yes (Globally)",
            TeamNumberChoice::SaveWorkspace => "Yes (Workspace)",
            TeamNumberChoice::DontSave => "No",
        }
    }

    /// Choice matching a label, if any.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|choice| choice.label() == label)
    }
}

/// Parse a team number the way a leading-integer parse does.
///
/// Leading whitespace is skipped, an optional sign and the leading digits are
/// read, and anything after them is ignored. `None` when there are no digits.
pub fn parse_team_number(raw: &str) -> Option<i32> {
    let trimmed = raw.trim_start();
    let (sign, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (-1i64, &trimmed[1..]),
        Some(b'+') => (1i64, &trimmed[1..]),
        _ => (1i64, trimmed),
    };
    let digits: &str = &rest[..rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len())];
    if digits.is_empty() {
        return None;
    }
    let magnitude: i64 = digits.parse().ok()?;
    i32::try_from(sign * magnitude).ok()
}

/// Ask for a team number. A dismissed or unparsable answer yields `-1`.
pub async fn request_team_number(prompter: &dyn Prompter) -> i32 {
    match prompter.input_box(TEAM_NUMBER_PROMPT).await {
        Some(answer) => parse_team_number(&answer).unwrap_or(NO_TEAM_NUMBER),
        None => NO_TEAM_NUMBER,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Option<&'static str>);

    #[async_trait]
    impl Prompter for Fixed {
        async fn input_box(&self, _prompt: &str) -> Option<String> {
            self.0.map(str::to_owned)
        }

        async fn information_message(&self, _message: &str, _choices: &[&str]) -> Option<String> {
            None
        }
    }

    #[test]
    fn parses_leading_integer() {
        assert_eq!(parse_team_number("254"), Some(254));
        assert_eq!(parse_team_number("  1678 "), Some(1678));
        assert_eq!(parse_team_number("971abc"), Some(971));
        assert_eq!(parse_team_number("-5"), Some(-5));
        assert_eq!(parse_team_number("+118"), Some(118));
        assert_eq!(parse_team_number("team 254"), None);
        assert_eq!(parse_team_number(""), None);
        assert_eq!(parse_team_number("-"), None);
        assert_eq!(parse_team_number("99999999999"), None);
    }

    #[test]
    fn choice_labels_round_trip() {
        for choice in TeamNumberChoice::ALL {
            assert_eq!(TeamNumberChoice::from_label(choice.label()), Some(choice));
        }
        assert_eq!(TeamNumberChoice::from_label("Maybe"), None);
    }

    #[tokio::test]
    async fn request_maps_dismissal_and_garbage_to_sentinel() {
        assert_eq!(request_team_number(&Fixed(Some("3476"))).await, 3476);
        assert_eq!(request_team_number(&Fixed(None)).await, NO_TEAM_NUMBER);
        assert_eq!(request_team_number(&Fixed(Some("abc"))).await, NO_TEAM_NUMBER);
    }
}
