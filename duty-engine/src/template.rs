//! Template Renderer
//!
//! `{name}` placeholders are replaced from a binding map. Unknown names are
//! left verbatim and reported in [`RenderedTemplate::passthrough`], so a
//! malformed template degrades to visible placeholder text instead of an
//! error.

use std::collections::HashMap;

use shared::models::Resident;

pub type Bindings<'a> = HashMap<&'a str, &'a str>;

/// Render result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedTemplate {
    pub text: String,
    /// Placeholders that were replaced (first occurrence order, deduplicated)
    pub substituted: Vec<String>,
    /// Placeholders left verbatim because no binding exists
    pub passthrough: Vec<String>,
}

impl RenderedTemplate {
    pub fn is_complete(&self) -> bool {
        self.passthrough.is_empty()
    }
}

fn is_placeholder_name(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn push_unique(list: &mut Vec<String>, name: &str) {
    if !list.iter().any(|n| n == name) {
        list.push(name.to_string());
    }
}

/// Substitute `{name}` placeholders
///
/// Substituted values are not rescanned. A `{` that does not open a valid
/// placeholder is copied as-is.
pub fn render(template: &str, bindings: &Bindings<'_>) -> RenderedTemplate {
    let mut text = String::with_capacity(template.len());
    let mut substituted = Vec::new();
    let mut passthrough = Vec::new();

    let mut rest = template;
    while let Some(start) = rest.find('{') {
        text.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find('}') {
            Some(end) if is_placeholder_name(&after[..end]) => {
                let name = &after[..end];
                match bindings.get(name) {
                    Some(value) => {
                        text.push_str(value);
                        push_unique(&mut substituted, name);
                    }
                    None => {
                        text.push_str(&rest[start..start + end + 2]);
                        push_unique(&mut passthrough, name);
                    }
                }
                rest = &after[end + 1..];
            }
            _ => {
                text.push('{');
                rest = after;
            }
        }
    }
    text.push_str(rest);

    if !passthrough.is_empty() {
        tracing::debug!(placeholders = ?passthrough, "Template has unbound placeholders");
    }

    RenderedTemplate {
        text,
        substituted,
        passthrough,
    }
}

/// `{first_name}`, `{flat_number}`
pub fn reminder_bindings(resident: &Resident) -> Bindings<'_> {
    HashMap::from([
        ("first_name", resident.first_name()),
        ("flat_number", resident.flat_number.as_str()),
    ])
}

/// `{first_name}`, `{message}`
pub fn announcement_bindings<'a>(resident: &'a Resident, message: &'a str) -> Bindings<'a> {
    HashMap::from([("first_name", resident.first_name()), ("message", message)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitutes_known_placeholders() {
        let bindings = HashMap::from([("first_name", "Jane"), ("flat_number", "4B")]);
        let out = render("{first_name} {flat_number}", &bindings);
        assert_eq!(out.text, "Jane 4B");
        assert_eq!(out.substituted, vec!["first_name", "flat_number"]);
        assert!(out.is_complete());
    }

    #[test]
    fn test_unknown_placeholder_left_verbatim() {
        let out = render("{unknown}", &HashMap::new());
        assert_eq!(out.text, "{unknown}");
        assert_eq!(out.passthrough, vec!["unknown"]);
        assert!(out.substituted.is_empty());
    }

    #[test]
    fn test_malformed_braces_are_copied() {
        let bindings = HashMap::from([("x", "1")]);
        assert_eq!(render("a { b } {x", &bindings).text, "a { b } {x");
        assert_eq!(render("{{x}}", &bindings).text, "{1}");
        assert_eq!(render("{}", &bindings).text, "{}");
    }

    #[test]
    fn test_values_are_not_rescanned() {
        let bindings = HashMap::from([("message", "{first_name}"), ("first_name", "Jane")]);
        let out = render("{message}", &bindings);
        assert_eq!(out.text, "{first_name}");
    }

    #[test]
    fn test_repeated_and_multibyte() {
        let bindings = HashMap::from([("first_name", "Zoë")]);
        let out = render("¡Hola {first_name}! {first_name} → {flat_number}", &bindings);
        assert_eq!(out.text, "¡Hola Zoë! Zoë → {flat_number}");
        assert_eq!(out.substituted, vec!["first_name"]);
        assert_eq!(out.passthrough, vec!["flat_number"]);
    }

    #[test]
    fn test_resident_bindings_use_first_token_of_name() {
        let resident = Resident {
            id: "r1".into(),
            name: "Jane Mary Doe".into(),
            flat_number: "4B".into(),
            notes: None,
            contact: Default::default(),
        };
        let out = render("Hi {first_name} ({flat_number})", &reminder_bindings(&resident));
        assert_eq!(out.text, "Hi Jane (4B)");

        let out = render(
            "Hi {first_name}, {message}",
            &announcement_bindings(&resident, "water is off"),
        );
        assert_eq!(out.text, "Hi Jane, water is off");
    }
}
