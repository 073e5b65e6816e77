/// Form validation rules for creating and editing lists
///
/// These are the screens' validation rules expressed as plain functions so
/// the handlers (and tests) can apply them without any store access.
///
/// Create-list rules are checked per pending task in order, first failure
/// wins and blocks the whole submission. Edit rules check every field and
/// report all failures, each annotated with the specific field.

use serde::{Deserialize, Serialize};

/// Minimum trimmed description length
pub const MIN_DESCRIPTION_LENGTH: usize = 3;

/// A field-scoped validation error with the user-facing message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Field that failed validation (e.g., "tasks[1].description")
    pub field: String,

    /// Error message shown to the user
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A validated pending task, trimmed and ready to persist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftTask {
    pub title: String,
    pub description: String,
}

/// Validates one pending task against the tasks already accepted
///
/// Rules, in order, first failure wins:
/// 1. trimmed title non-empty,
/// 2. trimmed description at least 3 characters,
/// 3. title unique among `accepted_titles`, compared case-insensitively.
///
/// `field` is the prefix used to annotate errors (e.g., "tasks[0]").
pub fn validate_draft_task(
    title: &str,
    description: &str,
    accepted_titles: &[String],
    field: &str,
) -> Result<DraftTask, FieldError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(FieldError::new(
            format!("{field}.title"),
            "The task name must not be empty",
        ));
    }

    let description = description.trim();
    if description.chars().count() < MIN_DESCRIPTION_LENGTH {
        return Err(FieldError::new(
            format!("{field}.description"),
            "The description must contain at least 3 characters",
        ));
    }

    let lowered = title.to_lowercase();
    if accepted_titles.iter().any(|t| t.to_lowercase() == lowered) {
        return Err(FieldError::new(
            format!("{field}.title"),
            "The task name must be unique",
        ));
    }

    Ok(DraftTask {
        title: title.to_string(),
        description: description.to_string(),
    })
}

/// Validates a whole pending task list in submission order
///
/// Each task is checked against the titles accepted before it; the first
/// failing task blocks the submission with its field error.
pub fn validate_draft_tasks(
    tasks: &[(String, String)],
) -> Result<Vec<DraftTask>, FieldError> {
    let mut accepted = Vec::with_capacity(tasks.len());
    let mut titles: Vec<String> = Vec::with_capacity(tasks.len());

    for (i, (title, description)) in tasks.iter().enumerate() {
        let draft = validate_draft_task(title, description, &titles, &format!("tasks[{i}]"))?;
        titles.push(draft.title.clone());
        accepted.push(draft);
    }

    Ok(accepted)
}

/// Normalizes a collaborator email: trim + lowercase
///
/// Returns None for input that is empty after trimming. This is the only
/// normalization ever applied; stored entries are matched verbatim later.
pub fn normalize_collaborator_email(raw: &str) -> Option<String> {
    let email = raw.trim().to_lowercase();
    if email.is_empty() {
        None
    } else {
        Some(email)
    }
}

/// Validates the edit-form fields, collecting every failure
///
/// `tasks` carries (title, description) per task, in display order. Unlike
/// the create form, all errors are reported at once, each annotated with its
/// field.
pub fn validate_edit(list_title: &str, tasks: &[(String, String)]) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if list_title.trim().is_empty() {
        errors.push(FieldError::new("title", "List title is required."));
    }

    for (i, (title, description)) in tasks.iter().enumerate() {
        if title.trim().is_empty() {
            errors.push(FieldError::new(
                format!("tasks[{i}].title"),
                "Task title is required.",
            ));
        }
        if description.trim().chars().count() < MIN_DESCRIPTION_LENGTH {
            errors.push(FieldError::new(
                format!("tasks[{i}].description"),
                "Description must be at least 3 characters.",
            ));
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(title: &str, description: &str) -> (String, String) {
        (title.to_string(), description.to_string())
    }

    #[test]
    fn test_empty_title_rejected_first() {
        let err = validate_draft_task("   ", "a description", &[], "tasks[0]").unwrap_err();
        assert_eq!(err.field, "tasks[0].title");
        assert_eq!(err.message, "The task name must not be empty");
    }

    #[test]
    fn test_short_description_rejected() {
        let err = validate_draft_task("Milk", "ab", &[], "tasks[0]").unwrap_err();
        assert_eq!(err.field, "tasks[0].description");
        assert_eq!(err.message, "The description must contain at least 3 characters");
    }

    #[test]
    fn test_description_trimmed_before_length_check() {
        // "ab " trims to 2 chars: rejected.
        assert!(validate_draft_task("Milk", " ab ", &[], "tasks[0]").is_err());
        // exactly 3 after trim: accepted.
        assert!(validate_draft_task("Milk", " abc ", &[], "tasks[0]").is_ok());
    }

    #[test]
    fn test_duplicate_title_case_insensitive() {
        let accepted = vec!["Milk".to_string()];
        let err = validate_draft_task("milk", "2 liters", &accepted, "tasks[1]").unwrap_err();
        assert_eq!(err.field, "tasks[1].title");
        assert_eq!(err.message, "The task name must be unique");

        let err = validate_draft_task("MILK", "2 liters", &accepted, "tasks[1]").unwrap_err();
        assert_eq!(err.message, "The task name must be unique");
    }

    #[test]
    fn test_validation_order_title_before_description() {
        // Both fields invalid: the title error wins.
        let err = validate_draft_task("", "x", &[], "tasks[0]").unwrap_err();
        assert_eq!(err.field, "tasks[0].title");
    }

    #[test]
    fn test_draft_tasks_first_failure_blocks_all() {
        let tasks = vec![
            t("Milk", "2 liters"),
            t("Bread", "xx"), // invalid description
            t("Milk", "dup"), // would also fail, but never reached
        ];
        let err = validate_draft_tasks(&tasks).unwrap_err();
        assert_eq!(err.field, "tasks[1].description");
    }

    #[test]
    fn test_draft_tasks_accepts_and_trims() {
        let tasks = vec![t("  Milk  ", "  2 liters  "), t("Bread", "rye")];
        let drafts = validate_draft_tasks(&tasks).unwrap();
        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].title, "Milk");
        assert_eq!(drafts[0].description, "2 liters");
    }

    #[test]
    fn test_duplicate_detected_within_one_submission() {
        let tasks = vec![t("Milk", "2 liters"), t("mIlK", "again")];
        let err = validate_draft_tasks(&tasks).unwrap_err();
        assert_eq!(err.field, "tasks[1].title");
        assert_eq!(err.message, "The task name must be unique");
    }

    #[test]
    fn test_normalize_collaborator_email() {
        assert_eq!(
            normalize_collaborator_email("  Viewer@Example.COM "),
            Some("viewer@example.com".to_string())
        );
        assert_eq!(normalize_collaborator_email("   "), None);
        assert_eq!(normalize_collaborator_email(""), None);
    }

    #[test]
    fn test_validate_edit_collects_all_errors() {
        let tasks = vec![t("", "ok description"), t("Bread", "x")];
        let errors = validate_edit(" ", &tasks);

        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec!["title", "tasks[0].title", "tasks[1].description"]
        );
        assert_eq!(errors[0].message, "List title is required.");
        assert_eq!(errors[1].message, "Task title is required.");
        assert_eq!(errors[2].message, "Description must be at least 3 characters.");
    }

    #[test]
    fn test_validate_edit_ok() {
        let tasks = vec![t("Milk", "2 liters")];
        assert!(validate_edit("Groceries", &tasks).is_empty());
    }
}
