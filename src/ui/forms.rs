use anyhow::{anyhow, Result};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::UserRecord;

/// Warning shown when the form is submitted with a blank field.
pub(crate) const MISSING_FIELDS: &str = "Please fill in both fields!";

/// Contents of the "New user" sidebar form.
#[derive(Default, Clone)]
pub(crate) struct UserForm {
    pub(crate) username: String,
    pub(crate) email: String,
    pub(crate) active: FormField,
}

/// Inputs available within the form.
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub(crate) enum FormField {
    #[default]
    Username,
    Email,
}

impl FormField {
    pub(crate) fn label(self) -> &'static str {
        match self {
            FormField::Username => "Username",
            FormField::Email => "Email",
        }
    }
}

impl UserForm {
    pub(crate) fn focus(&mut self, field: FormField) {
        self.active = field;
    }

    /// Append a character to the active field. Control characters are ignored.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        match self.active {
            FormField::Username => self.username.push(ch),
            FormField::Email => self.email.push(ch),
        }
        true
    }

    pub(crate) fn backspace(&mut self) {
        match self.active {
            FormField::Username => {
                self.username.pop();
            }
            FormField::Email => {
                self.email.pop();
            }
        }
    }

    /// Presence check only. Values are passed on exactly as typed, so
    /// whitespace counts as content.
    pub(crate) fn parse_inputs(&self) -> Result<(String, String)> {
        if self.username.is_empty() || self.email.is_empty() {
            return Err(anyhow!(MISSING_FIELDS));
        }
        Ok((self.username.clone(), self.email.clone()))
    }

    /// Empty both inputs and move focus back to the username.
    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }

    /// Render one input line. The active field is only highlighted while the
    /// form itself has focus.
    pub(crate) fn build_line(&self, field: FormField, focused: bool) -> Line<'static> {
        let value = self.value(field);
        let is_active = focused && self.active == field;

        let display = if value.is_empty() {
            "<required>".to_string()
        } else {
            value.to_string()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{}: ", field.label())),
            Span::styled(display, style),
        ])
    }

    pub(crate) fn value_len(&self, field: FormField) -> usize {
        self.value(field).chars().count()
    }

    fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Username => &self.username,
            FormField::Email => &self.email,
        }
    }
}

/// Pending deletion awaiting a yes/no answer.
#[derive(Clone, Debug)]
pub(crate) struct ConfirmUserDelete {
    pub(crate) record: UserRecord,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typing_goes_to_the_active_field() {
        let mut form = UserForm::default();
        for ch in "al".chars() {
            form.push_char(ch);
        }
        form.focus(FormField::Email);
        form.push_char('a');
        form.push_char('\n');
        form.backspace();
        form.push_char('b');
        assert_eq!(form.username, "al");
        assert_eq!(form.email, "b");
    }

    #[test]
    fn empty_field_fails_the_presence_check() {
        let form = UserForm {
            username: "alice".into(),
            email: String::new(),
            active: FormField::Email,
        };
        let err = form.parse_inputs().unwrap_err();
        assert_eq!(err.to_string(), MISSING_FIELDS);
    }

    #[test]
    fn inputs_pass_through_untouched() {
        let form = UserForm {
            username: " alice ".into(),
            email: "a@x.com ".into(),
            active: FormField::Username,
        };
        assert_eq!(
            form.parse_inputs().unwrap(),
            (" alice ".to_string(), "a@x.com ".to_string())
        );
    }

    #[test]
    fn whitespace_only_counts_as_present() {
        let form = UserForm {
            username: "   ".into(),
            email: "e@x".into(),
            active: FormField::Email,
        };
        assert_eq!(
            form.parse_inputs().unwrap(),
            ("   ".to_string(), "e@x".to_string())
        );
    }

    #[test]
    fn clear_resets_focus() {
        let mut form = UserForm {
            username: "x".into(),
            email: "y".into(),
            active: FormField::Email,
        };
        form.clear();
        assert!(form.username.is_empty() && form.email.is_empty());
        assert_eq!(form.active, FormField::Username);
    }
}
