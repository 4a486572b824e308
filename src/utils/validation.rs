use validator::ValidationErrors;

use crate::utils::response::FieldErrors;

/// Flatten validator output into `{ field: [messages] }`.
pub fn field_errors(errors: &ValidationErrors) -> FieldErrors {
    let mut collected = FieldErrors::new();

    for (field, errors) in errors.field_errors() {
        let messages = errors
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string())
            })
            .collect::<Vec<String>>();

        collected.insert(field.to_string(), messages);
    }

    collected
}

/// Merge rule violations found outside the derive into an existing report.
pub fn merge(into: &mut FieldErrors, more: FieldErrors) {
    for (field, messages) in more {
        into.entry(field).or_default().extend(messages);
    }
}

pub fn push(errors: &mut FieldErrors, field: &str, message: impl Into<String>) {
    errors
        .entry(field.to_string())
        .or_default()
        .push(message.into());
}
