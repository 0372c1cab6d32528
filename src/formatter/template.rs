use crate::formatter::{NormalizedRecord, Stringifier};

/// The built-in message line renderer.
///
/// Every `%name%` token in the template is replaced by the stringified value
/// that [`NormalizedRecord::lookup`] finds under `name`. Tokens naming
/// something that doesn't exist are left as they are, as is any `%` that
/// doesn't open a token.
///
/// # Examples
///
/// ```
/// use tracing::Level;
/// use tracing_tabular::formatter::{NormalizedRecord, Stringifier, Template};
/// use tracing_tabular::record::Record;
///
/// let record = Record::new(Level::INFO, "saved").with_context("file", "a.txt");
/// let normalized = NormalizedRecord {
///     record: &record,
///     datetime: "today".to_string(),
///     context: record.context().clone(),
///     extra: record.extra().clone(),
/// };
///
/// let template = Template::new("%level_name%: %message% (%context.file%, %missing%, 100%)");
/// assert_eq!(
///     template.render(&normalized, &Stringifier::new(false, false)),
///     "INFO: saved (a.txt, %missing%, 100%)",
/// );
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Template {
    format: String,
}

impl Template {
    pub fn new(format: impl Into<String>) -> Self {
        Template {
            format: format.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.format
    }

    /// Substitutes every known token.
    pub fn render(&self, record: &NormalizedRecord<'_>, stringifier: &Stringifier) -> String {
        let mut writer = String::with_capacity(self.format.len() * 2);
        let mut rest = self.format.as_str();

        while let Some(start) = rest.find('%') {
            writer.push_str(&rest[..start]);
            let after = &rest[start + 1..];

            match after.find('%') {
                Some(end) if is_token_name(&after[..end]) => {
                    let name = &after[..end];
                    match record.lookup(name) {
                        Some(value) => writer.push_str(&stringifier.stringify(&value)),
                        None => {
                            writer.push('%');
                            writer.push_str(name);
                            writer.push('%');
                        }
                    }
                    rest = &after[end + 1..];
                }
                _ => {
                    writer.push('%');
                    rest = after;
                }
            }
        }

        writer.push_str(rest);
        writer
    }
}

fn is_token_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
}
