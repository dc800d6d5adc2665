//! The ask pipeline.
//!
//! Owns the table cache and drives a question through the full answer
//! chain: exact-match specials, role substring rules, then keyword
//! categorization with a time-bucketed deterministic response pick.

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use tracing::debug;

use crate::classify::{self, KeywordTable, GENERAL_CATEGORY};
use crate::error::{BanterError, BanterResult};
use crate::select;
use crate::tables::{Table, TableCache, TableKey, TableSource, TableSpec};

/// Categories table: category -> keyword phrases.
pub const CATEGORIES_TABLE: &str = "categories";
/// Responses table: category -> response templates.
pub const RESPONSES_TABLE: &str = "responses";
/// Specials table: exact question -> single response.
pub const SPECIALS_TABLE: &str = "specials";
/// Role substring rules: (role, substring) -> response templates.
pub const ROLE_ASK_TABLE: &str = "role_ask_responses";
/// Per-role responses: (role, name) -> one response.
pub const ROLE_RESPONSES_TABLE: &str = "role_responses";

/// Every table the engine knows how to load.
const KNOWN_TABLES: [TableSpec; 5] = [
    TableSpec::new(CATEGORIES_TABLE, 1),
    TableSpec::new(RESPONSES_TABLE, 1),
    TableSpec::new(SPECIALS_TABLE, 1),
    TableSpec::new(ROLE_ASK_TABLE, 2),
    TableSpec::capped(ROLE_RESPONSES_TABLE, 2, 1),
];

/// Outcome of an ask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// A rendered reply, placeholders substituted.
    Reply(String),
    /// Category or response data could not be loaded; the caller should
    /// surface a "data unavailable" message and suggest a refresh.
    Unavailable,
}

/// Names of every table the engine knows how to load.
pub fn table_names() -> impl Iterator<Item = &'static str> {
    KNOWN_TABLES.iter().map(|spec| spec.name)
}

/// Substitute `{user}` placeholders in a response template.
pub fn render(template: &str, user: &str) -> String {
    template.replace("{user}", user)
}

/// Question-answering engine over one workbook.
pub struct AskEngine<S> {
    cache: TableCache<S>,
    workbook: String,
}

impl<S: TableSource> AskEngine<S> {
    /// Create an engine reading tables from `workbook` via `source`.
    pub fn new(source: S, workbook: impl Into<String>) -> Self {
        Self {
            cache: TableCache::new(source),
            workbook: workbook.into(),
        }
    }

    fn spec(name: &str) -> BanterResult<&'static TableSpec> {
        KNOWN_TABLES
            .iter()
            .find(|spec| spec.name == name)
            .ok_or_else(|| BanterError::unknown_table(name))
    }

    /// Get a known table by name, from cache unless `force`.
    ///
    /// Unknown names are a caller bug and error out; a known table that
    /// cannot be loaded comes back empty.
    pub fn table(&mut self, name: &str, force: bool) -> BanterResult<&Table> {
        let spec = Self::spec(name)?;
        Ok(self.cache.get(&self.workbook, spec, force))
    }

    /// Force-reload one table, or every known table for `"all"`.
    ///
    /// Returns the names refreshed.
    pub fn refresh(&mut self, name: &str) -> BanterResult<Vec<&'static str>> {
        let target = name.trim().to_lowercase();
        if target == "all" {
            let mut refreshed = Vec::with_capacity(KNOWN_TABLES.len());
            for spec in &KNOWN_TABLES {
                self.cache.get(&self.workbook, spec, true);
                refreshed.push(spec.name);
            }
            Ok(refreshed)
        } else {
            let spec = Self::spec(&target)?;
            self.cache.get(&self.workbook, spec, true);
            Ok(vec![spec.name])
        }
    }

    /// Diagnostic copy of a cached table.
    pub fn cache_snapshot(&mut self, name: &str) -> BanterResult<Table> {
        Ok(self.table(name, false)?.clone())
    }

    /// Answer a question for a user with the given roles.
    pub fn respond(
        &mut self,
        question: &str,
        user: &str,
        roles: &[String],
        now: DateTime<Utc>,
    ) -> BanterResult<Answer> {
        let question = question.trim().to_lowercase();

        // 1) Exact-match special responses.
        let specials = self.table(SPECIALS_TABLE, false)?;
        if let Some(values) = specials.get(&TableKey::One(question.clone())) {
            if let Some(special) = values.first() {
                debug!(%question, "answered from specials");
                return Ok(Answer::Reply(render(special, user)));
            }
        }

        // 2) Role substring rules; first matching rule wins.
        if let Some(rule_reply) = self.role_rule_reply(&question, roles)? {
            return Ok(Answer::Reply(render(&rule_reply, user)));
        }

        // 3) Categorize and pick deterministically.
        let keywords = keyword_table(self.table(CATEGORIES_TABLE, false)?);
        if keywords.is_empty() {
            return Ok(Answer::Unavailable);
        }
        let category = classify::categorize(&question, &keywords).to_string();

        let responses = self.table(RESPONSES_TABLE, false)?;
        if responses.is_empty() {
            return Ok(Answer::Unavailable);
        }
        let general = responses
            .get(&TableKey::One(GENERAL_CATEGORY.to_string()))
            .ok_or_else(BanterError::missing_general)?;
        let pool = responses
            .get(&TableKey::One(category.clone()))
            .unwrap_or(general);

        debug!(%question, %category, pool = pool.len(), "categorized question");
        match select::select(&question, pool, now) {
            Some(reply) => Ok(Answer::Reply(render(reply, user))),
            None => Ok(Answer::Unavailable),
        }
    }

    /// First role substring rule matching the question, with a uniform
    /// pick among the rule's responses. Unlike the category pipeline,
    /// this pick is not time-bucketed.
    fn role_rule_reply(
        &mut self,
        question: &str,
        roles: &[String],
    ) -> BanterResult<Option<String>> {
        let rules = self.table(ROLE_ASK_TABLE, false)?;
        for role in roles {
            for (key, responses) in rules {
                let parts = key.parts();
                if parts.len() == 2 && parts[0] == role && question.contains(parts[1]) {
                    return Ok(responses
                        .choose(&mut rand::thread_rng())
                        .cloned());
                }
            }
        }
        Ok(None)
    }
}

/// Shape a raw categories table into a lowercased keyword table,
/// keeping row order. Multi-column keys are ignored.
fn keyword_table(table: &Table) -> KeywordTable {
    let mut keywords = KeywordTable::default();
    for (key, phrases) in table {
        if let Some(category) = key.as_single() {
            keywords
                .entry(category.trim().to_lowercase())
                .or_default()
                .extend(phrases.iter().map(|p| p.trim().to_lowercase()));
        }
    }
    keywords
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_substitutes_every_placeholder() {
        assert_eq!(render("hi {user}, {user}!", "mocha"), "hi mocha, mocha!");
        assert_eq!(render("no placeholder", "mocha"), "no placeholder");
    }

    #[test]
    fn test_known_table_names() {
        let names: Vec<_> = table_names().collect();
        assert_eq!(
            names,
            vec![
                CATEGORIES_TABLE,
                RESPONSES_TABLE,
                SPECIALS_TABLE,
                ROLE_ASK_TABLE,
                ROLE_RESPONSES_TABLE
            ]
        );
    }
}
