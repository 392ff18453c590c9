//! `#NAME#` placeholder templates.

/// A named text template.
///
/// Placeholders are upper-case names between `#` marks (`#ID#`,
/// `#EXPECTED_MAP#`). Anything else containing `#` is left alone.
///
/// # Example
///
/// ```
/// use brscov::coverage::Template;
///
/// let template = Template::new("footer", "sub f_#ID#() ' #note\nend sub");
/// assert_eq!(template.render(&[("ID", "3")]), "sub f_3() ' #note\nend sub");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    name: String,
    text: String,
}

impl Template {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns true if the template contains `#key#`.
    pub fn has_placeholder(&self, key: &str) -> bool {
        self.text.contains(&format!("#{}#", key))
    }

    /// Substitutes every occurrence of each supplied placeholder.
    ///
    /// Placeholders without a supplied value are kept verbatim. Substituted
    /// values are not scanned again.
    pub fn render(&self, values: &[(&str, &str)]) -> String {
        let mut out = String::with_capacity(self.text.len());
        let mut rest = self.text.as_str();

        while let Some(open) = rest.find('#') {
            out.push_str(&rest[..open]);
            let after_open = &rest[open + 1..];

            let substitution = after_open.find('#').and_then(|close| {
                let key = &after_open[..close];
                if !is_placeholder_name(key) {
                    return None;
                }
                values
                    .iter()
                    .find(|(name, _)| *name == key)
                    .map(|(_, value)| (*value, close))
            });

            match substitution {
                Some((value, close)) => {
                    out.push_str(value);
                    rest = &after_open[close + 1..];
                }
                None => {
                    out.push('#');
                    rest = after_open;
                }
            }
        }

        out.push_str(rest);
        out
    }
}

fn is_placeholder_name(key: &str) -> bool {
    !key.is_empty()
        && key
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'_')
}
