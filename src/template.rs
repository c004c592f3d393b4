//! Command templates and the substitution directive.
//!
//! A template is a shell command line that may carry at most one live
//! substitution directive (a `%` that is not part of a `%%` pair, typically
//! written `%s`). Templates with a directive receive their payload by string
//! substitution; templates without one receive it on standard input. The
//! classification is fixed at construction and never changes.

/// An immutable command template plus its payload-delivery classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate {
    text: String,
    has_directive: bool,
}

impl CommandTemplate {
    /// Wrap a command line, classifying it once.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let has_directive = has_directive(&text);
        Self {
            text,
            has_directive,
        }
    }

    /// The raw template text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the template carries a live substitution directive.
    pub fn has_directive(&self) -> bool {
        self.has_directive
    }

    /// Whether the payload is delivered on standard input instead of being
    /// substituted into the command line.
    pub fn uses_stdin(&self) -> bool {
        !self.has_directive
    }

    /// Resolve the template against a payload.
    ///
    /// The payload replaces the first live directive (the `%` and its
    /// conversion character); every `%%` pair collapses to a literal `%`.
    /// Templates hold at most one live directive, so any further live `%`
    /// is emitted verbatim.
    pub fn resolve(&self, payload: &str) -> String {
        let mut out = String::with_capacity(self.text.len() + payload.len());
        let mut rest = self.text.as_str();
        let mut substituted = false;
        while let Some(pos) = rest.find('%') {
            out.push_str(&rest[..pos]);
            let after = &rest[pos + 1..];
            if let Some(tail) = after.strip_prefix('%') {
                out.push('%');
                rest = tail;
            } else if substituted {
                out.push('%');
                rest = after;
            } else {
                out.push_str(payload);
                substituted = true;
                let mut tail = after.chars();
                tail.next();
                rest = tail.as_str();
            }
        }
        out.push_str(rest);
        out
    }
}

/// Scan a template for a live substitution directive.
///
/// Iterates left to right; a `%%` pair is consumed as a literal and the scan
/// continues past it; the first `%` not followed by another `%` is the
/// directive.
pub fn has_directive(template: &str) -> bool {
    let bytes = template.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            if i + 1 < bytes.len() && bytes[i + 1] == b'%' {
                i += 2;
                continue;
            }
            return true;
        }
        i += 1;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn plain_commands_have_no_directive() {
        assert!(!has_directive(""));
        assert!(!has_directive("cat"));
        assert!(!has_directive("ls -la /tmp"));
    }

    #[test]
    fn a_lone_percent_is_a_directive() {
        assert!(has_directive("echo %s"));
        assert!(has_directive("%s"));
        assert!(has_directive("grep %s /var/log/syslog"));
        assert!(has_directive("echo %"));
    }

    #[test]
    fn doubled_percents_are_literals() {
        assert!(!has_directive("100%% done"));
        assert!(!has_directive("%%"));
        assert!(!has_directive("%%%%"));
    }

    #[test]
    fn scanning_continues_past_escaped_pairs() {
        assert!(has_directive("100%%%s"));
        assert!(has_directive("%%%"));
    }

    #[test]
    fn stdin_classification_is_the_negation() {
        assert!(CommandTemplate::new("cat").uses_stdin());
        assert!(!CommandTemplate::new("echo %s").uses_stdin());
    }

    #[test]
    fn resolve_substitutes_the_payload() {
        let template = CommandTemplate::new("echo %s");
        assert_eq!(template.resolve("hi"), "echo hi");
        assert_eq!(template.resolve(""), "echo ");
    }

    #[test]
    fn resolve_collapses_escaped_percents() {
        let template = CommandTemplate::new("printf '100%%'");
        assert_eq!(template.resolve("ignored"), "printf '100%'");
    }

    #[test]
    fn resolve_handles_escapes_before_the_directive() {
        let template = CommandTemplate::new("100%%%s");
        assert_eq!(template.resolve("x"), "100%x");
    }

    #[test]
    fn resolve_substitutes_a_trailing_directive() {
        let template = CommandTemplate::new("echo %");
        assert_eq!(template.resolve("hi"), "echo hi");
    }

    proptest! {
        #[test]
        fn percent_free_templates_never_have_a_directive(text in "[^%]*") {
            prop_assert!(!has_directive(&text));
        }

        #[test]
        fn appending_a_directive_always_classifies_as_substitution(text in "[^%]*") {
            let candidate = format!("{}%s", text);
            prop_assert!(has_directive(&candidate));
        }

        #[test]
        fn escaped_pairs_alone_never_classify(parts in prop::collection::vec("[^%]*", 0..5)) {
            prop_assert!(!has_directive(&parts.join("%%")));
        }

        #[test]
        fn resolving_a_percent_free_template_is_identity(text in "[^%]*", payload in ".*") {
            let template = CommandTemplate::new(&text);
            prop_assert_eq!(template.resolve(&payload), text);
        }
    }
}
