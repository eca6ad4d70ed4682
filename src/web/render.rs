//! Minimal HTML output.
//!
//! Pages are plain strings assembled here; every dynamic value goes through
//! [`escape`] first.

use crate::core::session::Principal;
use axum::response::Html;

/// Kind of input rendered for a form field.
#[derive(Debug, Clone, Copy)]
pub enum FieldKind<'a> {
    /// `<input type="text">`
    Text,
    /// `<input type="password">`, never pre-filled
    Password,
    /// `<input type="number">`
    Number,
    /// `<input type="date">`
    Date,
    /// `<select>` with (value, label) options
    Select(&'a [(&'a str, &'a str)]),
}

/// One labelled form input.
#[derive(Debug, Clone, Copy)]
pub struct Field<'a> {
    /// Input name, matching the form struct field
    pub name: &'a str,
    /// Visible label
    pub label: &'a str,
    /// Input kind
    pub kind: FieldKind<'a>,
    /// Current value (re-rendered after a failed submit)
    pub value: &'a str,
}

impl<'a> Field<'a> {
    /// A text field.
    #[must_use]
    pub const fn text(name: &'a str, label: &'a str, value: &'a str) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Text,
            value,
        }
    }

    /// A password field.
    #[must_use]
    pub const fn password(name: &'a str, label: &'a str) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Password,
            value: "",
        }
    }

    /// A number field.
    #[must_use]
    pub const fn number(name: &'a str, label: &'a str, value: &'a str) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Number,
            value,
        }
    }

    /// A date field.
    #[must_use]
    pub const fn date(name: &'a str, label: &'a str, value: &'a str) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Date,
            value,
        }
    }

    /// A select field.
    #[must_use]
    pub const fn select(
        name: &'a str,
        label: &'a str,
        options: &'a [(&'a str, &'a str)],
        value: &'a str,
    ) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Select(options),
            value,
        }
    }
}

/// Escapes text for use in HTML content and attribute values.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn nav(principal: Option<&Principal>) -> String {
    match principal {
        Some(p) if p.is_admin => format!(
            "<nav><a href=\"/admin/dashboard\">Dashboard</a> | \
             <a href=\"/admin/courses\">Courses</a> | \
             <a href=\"/admin/students\">Students</a> | \
             <a href=\"/admin/teachers\">Teachers</a> | \
             <a href=\"/admin/departments\">Departments</a> | \
             <a href=\"/admin/enrollments\">Enrollments</a> | \
             <a href=\"/admin/fees\">Fees</a> | \
             <a href=\"/admin/unverified_users\">Unverified users</a> | \
             {} <a href=\"/logout\">Logout</a></nav>",
            escape(&p.username)
        ),
        Some(p) => format!(
            "<nav><a href=\"/dashboard\">Dashboard</a> | {} <a href=\"/logout\">Logout</a></nav>",
            escape(&p.username)
        ),
        None => "<nav><a href=\"/login\">Login</a> | <a href=\"/register\">Register</a></nav>"
            .to_string(),
    }
}

/// Wraps `body` in the common page layout.
#[must_use]
pub fn page(title: &str, principal: Option<&Principal>, body: &str) -> Html<String> {
    Html(format!(
        "<!doctype html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Registrar | {title}</title>\n</head>\n<body>\n{nav}\n<h1>{title}</h1>\n{body}\n</body>\n</html>\n",
        title = escape(title),
        nav = nav(principal),
    ))
}

/// A page holding only a message.
#[must_use]
pub fn message_page(title: &str, message: &str) -> Html<String> {
    page(title, None, &format!("<p>{}</p>", escape(message)))
}

/// A flash-style notice paragraph, or nothing.
#[must_use]
pub fn notice(message: Option<&str>) -> String {
    message.map_or_else(String::new, |m| {
        format!("<p class=\"notice\">{}</p>", escape(m))
    })
}

/// Renders a POST form. `error` is shown above the inputs.
#[must_use]
pub fn form(action: &str, fields: &[Field<'_>], submit: &str, error: Option<&str>) -> String {
    let mut out = String::new();
    if let Some(message) = error {
        out.push_str(&format!("<p class=\"error\">{}</p>\n", escape(message)));
    }
    out.push_str(&format!(
        "<form method=\"post\" action=\"{}\">\n",
        escape(action)
    ));
    for field in fields {
        let name = escape(field.name);
        let value = escape(field.value);
        out.push_str(&format!(
            "<label for=\"{name}\">{}</label>\n",
            escape(field.label)
        ));
        let input = match field.kind {
            FieldKind::Text => {
                format!("<input type=\"text\" id=\"{name}\" name=\"{name}\" value=\"{value}\">")
            }
            FieldKind::Password => {
                format!("<input type=\"password\" id=\"{name}\" name=\"{name}\">")
            }
            FieldKind::Number => {
                format!("<input type=\"number\" id=\"{name}\" name=\"{name}\" value=\"{value}\">")
            }
            FieldKind::Date => {
                format!("<input type=\"date\" id=\"{name}\" name=\"{name}\" value=\"{value}\">")
            }
            FieldKind::Select(options) => {
                let mut select = format!("<select id=\"{name}\" name=\"{name}\">");
                for (option, label) in options {
                    let selected = if *option == field.value { " selected" } else { "" };
                    select.push_str(&format!(
                        "<option value=\"{}\"{selected}>{}</option>",
                        escape(option),
                        escape(label)
                    ));
                }
                select.push_str("</select>");
                select
            }
        };
        out.push_str(&input);
        out.push('\n');
    }
    out.push_str(&format!(
        "<button type=\"submit\">{}</button>\n</form>\n",
        escape(submit)
    ));
    out
}

/// Renders a table. Cells are escaped; `actions` (already HTML) is appended
/// to each row when present.
#[must_use]
pub fn table(headers: &[&str], rows: &[(Vec<String>, Option<String>)]) -> String {
    if rows.is_empty() {
        return "<p>Nothing here yet.</p>".to_string();
    }
    let mut out = String::from("<table>\n<tr>");
    for header in headers {
        out.push_str(&format!("<th>{}</th>", escape(header)));
    }
    out.push_str("</tr>\n");
    for (cells, actions) in rows {
        out.push_str("<tr>");
        for cell in cells {
            out.push_str(&format!("<td>{}</td>", escape(cell)));
        }
        if let Some(actions) = actions {
            out.push_str(&format!("<td>{actions}</td>"));
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</table>");
    out
}

/// A link styled as an action inside a table row.
#[must_use]
pub fn link(href: &str, label: &str) -> String {
    format!("<a href=\"{}\">{}</a>", escape(href), escape(label))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape("<b>\"Tom\" & 'Jerry'</b>"),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_form_keeps_values_but_not_passwords() {
        let html = form(
            "/login",
            &[
                Field::text("email", "Email", "a@b.co"),
                Field::password("password", "Password"),
            ],
            "Login",
            Some("Invalid email or password!"),
        );
        assert!(html.contains("value=\"a@b.co\""));
        assert!(html.contains("Invalid email or password!"));
        assert!(html.contains("<input type=\"password\" id=\"password\" name=\"password\">"));
    }

    #[test]
    fn test_select_marks_current_value() {
        let options = [("CS", "Computer Science"), ("MT", "Mathematics")];
        let html = form(
            "/x",
            &[Field::select("speciality", "Speciality", &options, "MT")],
            "Save",
            None,
        );
        assert!(html.contains("<option value=\"MT\" selected>Mathematics</option>"));
        assert!(html.contains("<option value=\"CS\">Computer Science</option>"));
    }

    #[test]
    fn test_empty_table() {
        assert_eq!(table(&["Name"], &[]), "<p>Nothing here yet.</p>");
    }
}
