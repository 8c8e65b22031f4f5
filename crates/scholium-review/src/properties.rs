//! The deployment property map and query-template resolution.
//!
//! Queries are written against abstract property names like `{anchorin}`
//! rather than raw ids, because each Wikibase deployment mints its own
//! `P`/`Q` numbers for the annotation schema. The map below binds every
//! abstract name to the deployment's identifier; all fields are required,
//! so a half-filled map fails at config load rather than mid-request.

use serde::{Deserialize, Serialize};

/// Abstract name to backend identifier bindings for one deployment.
///
/// The values are opaque here. Most are property ids (`P...`); `article` is
/// the item id of the article class and rides along because the article
/// listing query needs it in the same way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyMap {
    /// Article title (e.g. `P4`).
    pub title: String,
    /// MediaWiki page id of the article page (e.g. `P12`).
    pub pageid: String,
    /// Upstream Wikidata id of the article (e.g. `P3`).
    pub wikidataid: String,
    /// Class membership (e.g. `P11`).
    pub instanceof: String,
    /// The article class item (e.g. `Q2`).
    pub article: String,
    /// Links an anchor to the article it sits in (e.g. `P16`).
    pub anchorin: String,
    /// Links an annotation to its anchor (e.g. `P21`).
    pub basedon: String,
    /// The matched term text (e.g. `P18`).
    pub term: String,
    /// Name of the dictionary that produced the match (e.g. `P20`).
    pub dictionary: String,
    /// Character offset of the anchor in the article text (e.g. `P7`).
    pub offset: String,
    /// Text immediately before the anchor (e.g. `P8`).
    pub preceding_phrase: String,
    /// Text immediately after the anchor (e.g. `P9`).
    pub following_phrase: String,
    /// The drug-to-disease claim property written on review (e.g. `P22`).
    pub claim: String,
}

/// Every abstract name [`PropertyMap::get`] answers, in schema order.
pub const PROPERTY_NAMES: &[&str] = &[
    "title",
    "pageid",
    "wikidataid",
    "instanceof",
    "article",
    "anchorin",
    "basedon",
    "term",
    "dictionary",
    "offset",
    "preceding_phrase",
    "following_phrase",
    "claim",
];

impl PropertyMap {
    /// The backend identifier bound to an abstract name, or `None` for a
    /// name outside the schema.
    pub fn get(&self, name: &str) -> Option<&str> {
        let id = match name {
            "title" => &self.title,
            "pageid" => &self.pageid,
            "wikidataid" => &self.wikidataid,
            "instanceof" => &self.instanceof,
            "article" => &self.article,
            "anchorin" => &self.anchorin,
            "basedon" => &self.basedon,
            "term" => &self.term,
            "dictionary" => &self.dictionary,
            "offset" => &self.offset,
            "preceding_phrase" => &self.preceding_phrase,
            "following_phrase" => &self.following_phrase,
            "claim" => &self.claim,
            _ => return None,
        };
        Some(id)
    }
}

fn is_placeholder_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|byte| byte.is_ascii_alphabetic() || byte == b'_')
}

/// Substitute every `{name}` hole in `template` with its mapped identifier.
///
/// One left-to-right pass: substituted text is never rescanned, so an id
/// that itself looks like a placeholder cannot trigger a second round.
/// A hole has the exact shape `{` + letters/underscores + `}`; SPARQL block
/// braces never match it and pass through untouched, as does any `{name}`
/// the map does not know.
pub fn resolve_template(template: &str, map: &PropertyMap) -> String {
    let mut resolved = String::with_capacity(template.len() + 16);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        resolved.push_str(&rest[..open]);
        let tail = &rest[open + 1..];
        match tail.find('}') {
            Some(close) if is_placeholder_name(&tail[..close]) => {
                let name = &tail[..close];
                match map.get(name) {
                    Some(id) => resolved.push_str(id),
                    None => {
                        resolved.push('{');
                        resolved.push_str(name);
                        resolved.push('}');
                    }
                }
                rest = &tail[close + 1..];
            }
            _ => {
                resolved.push('{');
                rest = tail;
            }
        }
    }

    resolved.push_str(rest);
    resolved
}

/// All placeholder names present in `template`, in order of appearance,
/// repeats included.
pub fn placeholders(template: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        let tail = &rest[open + 1..];
        match tail.find('}') {
            Some(close) if is_placeholder_name(&tail[..close]) => {
                names.push(&tail[..close]);
                rest = &tail[close + 1..];
            }
            _ => rest = tail,
        }
    }

    names
}

#[cfg(test)]
pub(crate) fn test_map() -> PropertyMap {
    PropertyMap {
        title: "P4".to_string(),
        pageid: "P12".to_string(),
        wikidataid: "P3".to_string(),
        instanceof: "P11".to_string(),
        article: "Q2".to_string(),
        anchorin: "P16".to_string(),
        basedon: "P21".to_string(),
        term: "P18".to_string(),
        dictionary: "P20".to_string(),
        offset: "P7".to_string(),
        preceding_phrase: "P8".to_string(),
        following_phrase: "P9".to_string(),
        claim: "P22".to_string(),
    }
}
