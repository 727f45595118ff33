use std::fmt;

/// The key of a question, e.g. `"contactName"`.
///
/// Used as keys in `AnswerStore` and in the normalized submission payload.
/// Keys are flat: every question of a questionnaire has exactly one key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldKey {
    key: String,
}

impl FieldKey {
    /// Create a new key.
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    /// Get the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.key
    }

    /// Check if the key is empty.
    pub fn is_empty(&self) -> bool {
        self.key.is_empty()
    }

    /// Turn the key into a readable label.
    ///
    /// `contactName` becomes `Contact Name`, `lead_goals` becomes `Lead Goals`.
    pub fn humanize(&self) -> String {
        let mut words: Vec<String> = Vec::new();
        let mut current = String::new();
        let mut prev_lower = false;

        for c in self.key.chars() {
            if c == '_' || c == '-' || c.is_whitespace() {
                if !current.is_empty() {
                    words.push(std::mem::take(&mut current));
                }
                prev_lower = false;
                continue;
            }
            if c.is_uppercase() && prev_lower && !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = c.is_lowercase() || c.is_ascii_digit();
            current.push(c);
        }
        if !current.is_empty() {
            words.push(current);
        }

        words
            .iter()
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    None => String::new(),
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key)
    }
}

impl From<&str> for FieldKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for FieldKey {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&String> for FieldKey {
    fn from(s: &String) -> Self {
        Self::new(s.clone())
    }
}

impl From<&FieldKey> for FieldKey {
    fn from(key: &FieldKey) -> Self {
        key.clone()
    }
}

impl AsRef<str> for FieldKey {
    fn as_ref(&self) -> &str {
        &self.key
    }
}
