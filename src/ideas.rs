//! The plaintext payload: an ordered list of draft post ideas.

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::error::Error;

/// One draft idea. Only `title` is required.
///
/// Zeroised on drop, so ideas decoded before a parse error are scrubbed too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct Idea {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl Idea {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            tags: None,
            date: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }
}

/// The ordered idea list. Serialises as a bare JSON array.
///
/// Zeroised on drop: an unlocked list is plaintext that must not linger after
/// the session locks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(transparent)]
pub struct Ideas(Vec<Idea>);

impl Ideas {
    pub fn new(ideas: Vec<Idea>) -> Self {
        Self(ideas)
    }

    /// The list used when the operator has no idea file yet.
    pub fn example() -> Self {
        Self(vec![
            Idea::new("Introduction to Machine Learning")
                .with_description(
                    "A beginner-friendly guide to ML concepts and practical applications",
                )
                .with_tags(["ai", "ml", "tutorial"])
                .with_date("2026-01-15"),
            Idea::new("Building Scalable APIs")
                .with_description(
                    "Best practices for designing and implementing scalable REST APIs",
                )
                .with_tags(["api", "backend", "scalability"])
                .with_date("2026-02-01"),
        ])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Idea> {
        self.0.iter()
    }

    /// Compact JSON, the exact bytes that get sealed.
    pub fn to_json(&self) -> Result<Zeroizing<Vec<u8>>, Error> {
        serde_json::to_vec(self)
            .map(Zeroizing::new)
            .map_err(|_| Error::Serialization)
    }

    /// Indented JSON for the operator's preview.
    pub fn to_json_pretty(&self) -> Result<String, Error> {
        serde_json::to_string_pretty(self).map_err(|_| Error::Serialization)
    }

    /// Parse decrypted bytes. Anything that is not an idea list is
    /// [`Error::PayloadParse`].
    pub fn from_json(bytes: &[u8]) -> Result<Self, Error> {
        serde_json::from_slice(bytes).map_err(|_| Error::PayloadParse)
    }
}

impl<'a> IntoIterator for &'a Ideas {
    type Item = &'a Idea;
    type IntoIter = std::slice::Iter<'a, Idea>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<Idea> for Ideas {
    fn from_iter<T: IntoIterator<Item = Idea>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_fields_are_omitted() {
        let ideas = Ideas::new(vec![Idea::new("A").with_tags(["x"])]);
        let json = ideas.to_json().unwrap();
        assert_eq!(json.as_slice(), br#"[{"title":"A","tags":["x"]}]"#);
    }

    #[test]
    fn test_parse_accepts_nulls_and_extra_fields() {
        let ideas = Ideas::from_json(
            br#"[{"title":"A","description":null,"draft":true},{"title":"B","date":"2026-03-01"}]"#,
        )
        .unwrap();
        assert_eq!(ideas.len(), 2);
        assert_eq!(ideas.iter().next().unwrap(), &Idea::new("A"));
        assert_eq!(
            ideas.iter().nth(1).unwrap().date.as_deref(),
            Some("2026-03-01")
        );
    }

    #[test]
    fn test_parse_rejects_non_lists() {
        assert!(matches!(
            Ideas::from_json(br#"{"title":"A"}"#),
            Err(Error::PayloadParse)
        ));
        assert!(matches!(
            Ideas::from_json(br#"[{"description":"no title"}]"#),
            Err(Error::PayloadParse)
        ));
        assert!(matches!(Ideas::from_json(b"\xff\xfe"), Err(Error::PayloadParse)));
    }

    #[test]
    fn test_ideas_scrub_on_drop() {
        fn assert_zeroize_on_drop<T: ZeroizeOnDrop>() {}
        assert_zeroize_on_drop::<Idea>();
        assert_zeroize_on_drop::<Ideas>();
    }

    #[test]
    fn test_zeroize_clears_every_field() {
        let mut idea = Idea::new("A")
            .with_description("secret plan")
            .with_tags(["x"])
            .with_date("2026-03-01");
        idea.zeroize();
        assert!(idea.title.is_empty());
        assert_eq!(idea.description, None);
        assert_eq!(idea.tags, None);
        assert_eq!(idea.date, None);
    }

    #[test]
    fn test_example_list() {
        let ideas = Ideas::example();
        assert_eq!(ideas.len(), 2);
        assert!(ideas.iter().all(|idea| idea.date.is_some()));
    }
}
