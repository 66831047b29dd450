//! Search Projection
//!
//! Case-insensitive token matching over a fixed set of text fields per
//! listing type. A document's score is the number of distinct query tokens
//! found in any searched field; results are ordered by score, then newest
//! first. Documents matching no token are dropped.

use std::borrow::Cow;
use std::cmp::Ordering;

use kernel::validation::FieldErrors;
use platform::document::Document;

use crate::domain::entity::{Job, Post, Product};

/// A listing type with indexed text fields
pub trait Searchable: Document {
    /// Indexed field names, as they appear on the wire
    const SEARCH_FIELDS: &'static [&'static str];

    /// Text of one indexed field; list fields are joined with spaces
    fn field_text(&self, field: &str) -> Option<Cow<'_, str>>;
}

impl Searchable for Product {
    const SEARCH_FIELDS: &'static [&'static str] = &["title", "description", "location"];

    fn field_text(&self, field: &str) -> Option<Cow<'_, str>> {
        match field {
            "title" => Some(Cow::Borrowed(&self.title)),
            "description" => Some(Cow::Borrowed(&self.description)),
            "location" => Some(Cow::Borrowed(&self.location)),
            _ => None,
        }
    }
}

impl Searchable for Post {
    const SEARCH_FIELDS: &'static [&'static str] = &["title", "content", "tags"];

    fn field_text(&self, field: &str) -> Option<Cow<'_, str>> {
        match field {
            "title" => Some(Cow::Borrowed(&self.title)),
            "content" => Some(Cow::Borrowed(&self.content)),
            "tags" => Some(Cow::Owned(self.tags.join(" "))),
            _ => None,
        }
    }
}

impl Searchable for Job {
    const SEARCH_FIELDS: &'static [&'static str] = &["title", "description", "location", "skills"];

    fn field_text(&self, field: &str) -> Option<Cow<'_, str>> {
        match field {
            "title" => Some(Cow::Borrowed(&self.title)),
            "description" => Some(Cow::Borrowed(&self.description)),
            "location" => Some(Cow::Borrowed(&self.location)),
            "skills" => Some(Cow::Owned(self.skills.join(" "))),
            _ => None,
        }
    }
}

// ============================================================================
// Query
// ============================================================================

/// Parsed search request for one listing type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    tokens: Vec<String>,
    fields: Vec<&'static str>,
}

impl SearchQuery {
    /// Tokenise `q` and resolve the optional comma-separated `fields` subset
    /// against the type's indexed fields
    pub fn parse<S: Searchable>(q: Option<&str>, fields: Option<&str>) -> Result<Self, FieldErrors> {
        let mut tokens: Vec<String> = Vec::new();
        for token in q.unwrap_or_default().split_whitespace() {
            let token = token.to_lowercase();
            if !tokens.contains(&token) {
                tokens.push(token);
            }
        }

        let requested: Vec<&str> = fields
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .collect();

        let fields = if requested.is_empty() {
            S::SEARCH_FIELDS.to_vec()
        } else {
            let mut resolved = Vec::with_capacity(requested.len());
            for name in requested {
                match S::SEARCH_FIELDS.iter().find(|f| **f == name) {
                    Some(field) if !resolved.contains(field) => resolved.push(*field),
                    Some(_) => {}
                    None => {
                        return Err(FieldErrors::single(
                            "fields",
                            format!(
                                "Unknown search field '{}'; searchable: {}",
                                name,
                                S::SEARCH_FIELDS.join(", ")
                            ),
                        ));
                    }
                }
            }
            resolved
        };

        Ok(Self { tokens, fields })
    }

    /// No tokens: every document matches
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Terms for the storage pre-filter
    ///
    /// The store matches terms against the serialized document, where quotes
    /// and backslashes are escaped; such tokens disable the pre-filter.
    pub fn prefilter_terms(&self) -> Vec<String> {
        let escaped = self
            .tokens
            .iter()
            .any(|t| t.contains(['"', '\\']) || t.chars().any(char::is_control));
        if escaped { Vec::new() } else { self.tokens.clone() }
    }

    /// Number of distinct tokens present in the searched fields
    pub fn score<S: Searchable>(&self, doc: &S) -> usize {
        let texts: Vec<String> = self
            .fields
            .iter()
            .filter_map(|f| doc.field_text(f))
            .map(|t| t.to_lowercase())
            .collect();

        self.tokens
            .iter()
            .filter(|token| texts.iter().any(|text| text.contains(token.as_str())))
            .count()
    }

    /// Drop non-matches and order by score, then newest first
    ///
    /// An empty query keeps everything, newest first.
    pub fn rank<S: Searchable>(&self, docs: Vec<S>) -> Vec<S> {
        let mut scored: Vec<(usize, S)> = docs
            .into_iter()
            .map(|doc| (self.score(&doc), doc))
            .filter(|(score, _)| self.is_empty() || *score > 0)
            .collect();

        scored.sort_by(|(sa, a), (sb, b)| {
            sb.cmp(sa)
                .then_with(|| newest_first(a, b))
        });

        scored.into_iter().map(|(_, doc)| doc).collect()
    }
}

fn newest_first<D: Document>(a: &D, b: &D) -> Ordering {
    b.created_at()
        .cmp(&a.created_at())
        .then_with(|| b.key().cmp(&a.key()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::validator::{Mode, ProductInput, validate_product};
    use chrono::{Duration, Utc};
    use kernel::id::UserId;
    use kernel::validation::NumberInput;

    fn product(title: &str, description: &str, location: &str, age_minutes: i64) -> Product {
        let draft = validate_product(
            ProductInput {
                title: Some(title.into()),
                description: Some(description.into()),
                price: Some(NumberInput::Number(10.0)),
                category: Some("other".into()),
                location: Some(location.into()),
                unit: Some("kg".into()),
                ..Default::default()
            },
            Mode::Update,
        )
        .unwrap();
        let mut p = Product::new(UserId::new(), draft);
        p.created_at = Utc::now() - Duration::minutes(age_minutes);
        p
    }

    #[test]
    fn test_case_insensitive_match() {
        let organic = product("Organic Tomatoes", "Fresh", "Kolar", 5);
        let rice = product("Basmati Rice", "Aromatic", "Karnal", 1);

        let query = SearchQuery::parse::<Product>(Some("organic"), None).unwrap();
        let hits = query.rank(vec![organic.clone(), rice]);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, organic.id);
    }

    #[test]
    fn test_more_tokens_rank_higher_then_newer() {
        let both = product("Organic rice", "-", "Mysuru", 30);
        let one_old = product("Rice bran", "-", "Mysuru", 20);
        let one_new = product("Brown rice", "-", "Mysuru", 10);
        let none = product("Cow dung manure", "-", "Mysuru", 0);

        let query = SearchQuery::parse::<Product>(Some("RICE organic rice"), None).unwrap();
        assert_eq!(query.tokens(), &["rice".to_string(), "organic".to_string()]);

        let hits = query.rank(vec![one_old.clone(), none, both.clone(), one_new.clone()]);
        let ids: Vec<_> = hits.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![both.id, one_new.id, one_old.id]);
    }

    #[test]
    fn test_empty_query_is_newest_first() {
        let old = product("A", "-", "X", 10);
        let new = product("B", "-", "X", 1);
        let query = SearchQuery::parse::<Product>(Some("   "), None).unwrap();
        assert!(query.is_empty());
        let hits = query.rank(vec![old.clone(), new.clone()]);
        assert_eq!(hits.iter().map(|p| p.id).collect::<Vec<_>>(), vec![new.id, old.id]);
    }

    #[test]
    fn test_field_subset() {
        let in_location = product("Seeds", "-", "Organic Valley", 1);
        let query = SearchQuery::parse::<Product>(Some("organic"), Some("title, description")).unwrap();
        assert!(query.rank(vec![in_location.clone()]).is_empty());

        let query = SearchQuery::parse::<Product>(Some("organic"), Some("location")).unwrap();
        assert_eq!(query.rank(vec![in_location]).len(), 1);

        let err = SearchQuery::parse::<Product>(Some("x"), Some("title,price")).unwrap_err();
        assert!(err.contains("fields"));
    }

    #[test]
    fn test_list_fields_are_searchable() {
        let query = SearchQuery::parse::<Post>(Some("irrigation"), Some("tags")).unwrap();
        assert_eq!(query.fields, vec!["tags"]);
        let query = SearchQuery::parse::<Job>(None, None).unwrap();
        assert_eq!(query.fields, Job::SEARCH_FIELDS.to_vec());
    }

    #[test]
    fn test_prefilter_terms() {
        let query = SearchQuery::parse::<Product>(Some("Organic seeds"), None).unwrap();
        assert_eq!(query.prefilter_terms(), vec!["organic".to_string(), "seeds".to_string()]);

        let query = SearchQuery::parse::<Product>(Some("12\" pipe"), None).unwrap();
        assert!(query.prefilter_terms().is_empty());
    }
}
