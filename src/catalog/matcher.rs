//! Rule matching: resolve inbound text or button ids to reply payloads.
//!
//! First-match-wins scan in catalog declaration order. Keyword matching
//! is case-insensitive substring (not token) matching — "hello there"
//! matches the keyword "hello", and so does "othello". Tie-break on a
//! shared keyword goes to the earlier-declared rule.

use tracing::debug;

use crate::catalog::model::{Catalog, Reply};

impl Catalog {
    /// Resolve free text to the first rule with a matching keyword.
    ///
    /// Returns the rule key and its reply, or `None` when nothing
    /// matches (caller falls back to the default reply and audit-logs).
    pub fn match_text(&self, text: &str) -> Option<(&str, &Reply)> {
        let text = text.to_lowercase();
        for (key, rule) in &self.rules {
            if rule
                .keywords
                .iter()
                .any(|kw| text.contains(&kw.to_lowercase()))
            {
                debug!(rule = %key, "Text matched catalog rule");
                return Some((key.as_str(), &rule.reply));
            }
        }
        None
    }

    /// Resolve a button click to the first rule carrying that button id
    /// in its `button_responses` map.
    pub fn match_button(&self, button_id: &str) -> Option<(&str, &Reply)> {
        for (key, rule) in &self.rules {
            if let Some(reply) = rule.button_responses.get(button_id) {
                debug!(rule = %key, button = %button_id, "Button matched catalog rule");
                return Some((key.as_str(), reply));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;

    use super::*;
    use crate::catalog::model::Rule;

    fn text_rule(keywords: &[&str], reply: &str) -> Rule {
        Rule {
            keywords: keywords.iter().map(|s| s.to_string()).collect(),
            reply: Reply::Text(reply.into()),
            button_responses: IndexMap::new(),
        }
    }

    fn catalog(rules: Vec<(&str, Rule)>) -> Catalog {
        Catalog {
            rules: rules.into_iter().map(|(k, r)| (k.to_string(), r)).collect(),
        }
    }

    #[test]
    fn matches_keyword_case_insensitively() {
        let cat = catalog(vec![("greet", text_rule(&["Hello"], "Hi!"))]);
        assert!(cat.match_text("HELLO everyone").is_some());
        assert!(cat.match_text("well hello there").is_some());
    }

    #[test]
    fn matches_substring_not_token() {
        let cat = catalog(vec![("greet", text_rule(&["hello"], "Hi!"))]);
        // Substring semantics: embedded occurrences count too.
        assert!(cat.match_text("othello").is_some());
    }

    #[test]
    fn earlier_declared_rule_wins_shared_keyword() {
        let cat = catalog(vec![
            ("first", text_rule(&["price"], "first reply")),
            ("second", text_rule(&["price"], "second reply")),
        ]);
        let (key, reply) = cat.match_text("what's the price?").unwrap();
        assert_eq!(key, "first");
        assert_eq!(*reply, Reply::Text("first reply".into()));
    }

    #[test]
    fn scans_in_declaration_order_not_alphabetical() {
        let cat = catalog(vec![
            ("zebra", text_rule(&["hi"], "from zebra")),
            ("alpha", text_rule(&["hi"], "from alpha")),
        ]);
        let (key, _) = cat.match_text("hi").unwrap();
        assert_eq!(key, "zebra");
    }

    #[test]
    fn no_match_returns_none() {
        let cat = catalog(vec![("greet", text_rule(&["hello"], "Hi!"))]);
        assert!(cat.match_text("goodbye").is_none());
    }

    #[test]
    fn empty_catalog_matches_nothing() {
        let cat = Catalog::empty();
        assert!(cat.match_text("hello").is_none());
        assert!(cat.match_button("sell").is_none());
    }

    #[test]
    fn button_id_resolves_to_sub_reply() {
        let mut rule = text_rule(&["menu"], "Menu");
        rule.button_responses
            .insert("support".into(), Reply::Text("support reply".into()));
        let cat = catalog(vec![("menu", rule)]);

        let (key, reply) = cat.match_button("support").unwrap();
        assert_eq!(key, "menu");
        assert_eq!(*reply, Reply::Text("support reply".into()));
        assert!(cat.match_button("unknown-id").is_none());
    }

    #[test]
    fn button_scan_first_rule_wins() {
        let mut a = text_rule(&["a"], "a");
        a.button_responses
            .insert("dup".into(), Reply::Text("from a".into()));
        let mut b = text_rule(&["b"], "b");
        b.button_responses
            .insert("dup".into(), Reply::Text("from b".into()));
        let cat = catalog(vec![("a", a), ("b", b)]);

        let (key, _) = cat.match_button("dup").unwrap();
        assert_eq!(key, "a");
    }
}
