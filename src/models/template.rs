//! Rendering template discriminator.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Visual layout used when publishing a business page.
///
/// The set is closed. Any stored value that is absent or not one of the
/// known names resolves to [`Template::Classic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Template {
    #[default]
    Classic,
    Modern,
    Minimal,
}

impl Template {
    /// Every variant, in display order for the edit form.
    pub const ALL: [Template; 3] = [Template::Classic, Template::Modern, Template::Minimal];

    pub fn as_str(&self) -> &'static str {
        match self {
            Template::Classic => "classic",
            Template::Modern => "modern",
            Template::Minimal => "minimal",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "classic" => Some(Template::Classic),
            "modern" => Some(Template::Modern),
            "minimal" => Some(Template::Minimal),
            _ => None,
        }
    }

    /// Resolve a stored discriminator, falling back to the default variant.
    pub fn resolve(value: Option<&str>) -> Self {
        value.and_then(Template::from_str).unwrap_or_default()
    }
}

impl Serialize for Template {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Template {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(Template::resolve(raw.as_deref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_values() {
        assert_eq!(Template::resolve(Some("classic")), Template::Classic);
        assert_eq!(Template::resolve(Some("modern")), Template::Modern);
        assert_eq!(Template::resolve(Some("minimal")), Template::Minimal);
    }

    #[test]
    fn test_resolve_falls_back_to_classic() {
        for value in [None, Some(""), Some("bogus"), Some("Modern")] {
            assert_eq!(Template::resolve(value), Template::Classic);
        }
    }

    #[test]
    fn test_deserialize_is_total() {
        let t: Template = serde_json::from_str("\"minimal\"").unwrap();
        assert_eq!(t, Template::Minimal);
        let t: Template = serde_json::from_str("\"retro\"").unwrap();
        assert_eq!(t, Template::Classic);
        let t: Template = serde_json::from_str("null").unwrap();
        assert_eq!(t, Template::Classic);
    }

    #[test]
    fn test_as_str_round_trips() {
        for t in Template::ALL {
            assert_eq!(Template::from_str(t.as_str()), Some(t));
        }
    }
}
