//! Structured line templates.
//!
//! A template is parsed once into ordered text and slot segments. Rendering asks
//! a [`SlotResolver`] for every slot and fails with [`TemplateError::MissingSlot`]
//! instead of leaving a placeholder in the output.

use serde::{Deserialize, Serialize};
use std::fmt;

use thiserror::Error;

/// Named placeholder inside a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    /// Whoever is speaking or acting
    Speaker,
    /// Whoever is addressed
    Target,
    /// Third party being talked about
    Subject,
    Player,
    Topic,
    Tone,
    Summary,
    Day,
}

impl Slot {
    pub fn name(self) -> &'static str {
        match self {
            Slot::Speaker => "speaker",
            Slot::Target => "target",
            Slot::Subject => "subject",
            Slot::Player => "player",
            Slot::Topic => "topic",
            Slot::Tone => "tone",
            Slot::Summary => "summary",
            Slot::Day => "day",
        }
    }

    pub fn from_name(name: &str) -> Option<Slot> {
        match name.trim() {
            "speaker" => Some(Slot::Speaker),
            "target" => Some(Slot::Target),
            "subject" => Some(Slot::Subject),
            "player" => Some(Slot::Player),
            "topic" => Some(Slot::Topic),
            "tone" => Some(Slot::Tone),
            "summary" => Some(Slot::Summary),
            "day" => Some(Slot::Day),
            _ => None,
        }
    }
}

/// Errors from parsing or rendering templates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("unknown slot `{{{0}}}`")]
    UnknownSlot(String),
    #[error("unterminated slot starting at byte {0}")]
    Unterminated(usize),
    #[error("no value for slot `{}`", .0.name())]
    MissingSlot(Slot),
    #[error("no template available for `{0}`")]
    NoTemplate(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Slot(Slot),
}

/// Supplies values for template slots.
pub trait SlotResolver {
    fn resolve(&self, slot: Slot) -> Option<String>;
}

impl<F> SlotResolver for F
where
    F: Fn(Slot) -> Option<String>,
{
    fn resolve(&self, slot: Slot) -> Option<String> {
        self(slot)
    }
}

/// Fixed slot values collected up front.
#[derive(Debug, Clone, Default)]
pub struct SlotValues {
    values: Vec<(Slot, String)>,
}

impl SlotValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, slot: Slot, value: impl Into<String>) -> Self {
        self.set(slot, value);
        self
    }

    pub fn set(&mut self, slot: Slot, value: impl Into<String>) {
        let value = value.into();
        match self.values.iter_mut().find(|(s, _)| *s == slot) {
            Some(entry) => entry.1 = value,
            None => self.values.push((slot, value)),
        }
    }
}

impl SlotResolver for SlotValues {
    fn resolve(&self, slot: Slot) -> Option<String> {
        self.values
            .iter()
            .find(|(s, _)| *s == slot)
            .map(|(_, v)| v.clone())
    }
}

/// A line template made of literal text and slots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        if let Some(Segment::Text(last)) = self.segments.last_mut() {
            last.push_str(&text);
        } else if !text.is_empty() {
            self.segments.push(Segment::Text(text));
        }
        self
    }

    pub fn slot(mut self, slot: Slot) -> Self {
        self.segments.push(Segment::Slot(slot));
        self
    }

    /// Parses `"Hey {target}, it's {speaker}."`. `{{` and `}}` are literal braces.
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let mut template = Template::new();
        let mut literal = String::new();
        let mut chars = source.char_indices().peekable();

        while let Some((pos, c)) = chars.next() {
            match c {
                '{' if matches!(chars.peek(), Some((_, '{'))) => {
                    chars.next();
                    literal.push('{');
                }
                '}' if matches!(chars.peek(), Some((_, '}'))) => {
                    chars.next();
                    literal.push('}');
                }
                '{' => {
                    let mut name = String::new();
                    let mut closed = false;
                    for (_, n) in chars.by_ref() {
                        if n == '}' {
                            closed = true;
                            break;
                        }
                        name.push(n);
                    }
                    if !closed {
                        return Err(TemplateError::Unterminated(pos));
                    }
                    let slot = Slot::from_name(&name)
                        .ok_or_else(|| TemplateError::UnknownSlot(name.clone()))?;
                    template = template.text(std::mem::take(&mut literal)).slot(slot);
                }
                _ => literal.push(c),
            }
        }

        Ok(template.text(literal))
    }

    /// Slots in the order they appear.
    pub fn slots(&self) -> impl Iterator<Item = Slot> + '_ {
        self.segments.iter().filter_map(|s| match s {
            Segment::Slot(slot) => Some(*slot),
            Segment::Text(_) => None,
        })
    }

    pub fn render(&self, resolver: &dyn SlotResolver) -> Result<String, TemplateError> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Slot(slot) => {
                    let value = resolver
                        .resolve(*slot)
                        .ok_or(TemplateError::MissingSlot(*slot))?;
                    out.push_str(&value);
                }
            }
        }
        Ok(out)
    }

    /// Renders, or returns `fallback` when a slot cannot be resolved.
    pub fn render_or(&self, resolver: &dyn SlotResolver, fallback: &str) -> String {
        self.render(resolver).unwrap_or_else(|_| fallback.to_string())
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => write!(f, "{}", text.replace('{', "{{").replace('}', "}}"))?,
                Segment::Slot(slot) => write!(f, "{{{}}}", slot.name())?,
            }
        }
        Ok(())
    }
}

impl TryFrom<String> for Template {
    type Error = TemplateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Template::parse(&value)
    }
}

impl From<Template> for String {
    fn from(value: Template) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_render() {
        let template = Template::parse("Hey {target}, it's {speaker}.").unwrap();
        let values = SlotValues::new()
            .with(Slot::Target, "Mira")
            .with(Slot::Speaker, "Dex");
        assert_eq!(template.render(&values).unwrap(), "Hey Mira, it's Dex.");
        assert_eq!(template.slots().collect::<Vec<_>>(), vec![Slot::Target, Slot::Speaker]);
    }

    #[test]
    fn test_missing_slot_is_an_error() {
        let template = Template::parse("{speaker} wants {subject} gone").unwrap();
        let values = SlotValues::new().with(Slot::Speaker, "Dex");
        assert_eq!(
            template.render(&values),
            Err(TemplateError::MissingSlot(Slot::Subject))
        );
        assert_eq!(template.render_or(&values, "Dex is plotting"), "Dex is plotting");
    }

    #[test]
    fn test_unknown_and_unterminated_slots() {
        assert_eq!(
            Template::parse("hi {nobody}"),
            Err(TemplateError::UnknownSlot("nobody".to_string()))
        );
        assert!(matches!(
            Template::parse("hi {speaker"),
            Err(TemplateError::Unterminated(3))
        ));
    }

    #[test]
    fn test_escaped_braces_survive_round_trip() {
        let template = Template::parse("{{not a slot}} {speaker}").unwrap();
        let values = SlotValues::new().with(Slot::Speaker, "Theo");
        assert_eq!(template.render(&values).unwrap(), "{not a slot} Theo");
        let reparsed = Template::parse(&template.to_string()).unwrap();
        assert_eq!(reparsed, template);
    }

    #[test]
    fn test_closure_resolver() {
        let template = Template::new().text("Day ").slot(Slot::Day);
        let resolver = |slot: Slot| (slot == Slot::Day).then(|| "4".to_string());
        assert_eq!(template.render(&resolver).unwrap(), "Day 4");
    }

    #[test]
    fn test_serde_uses_source_string() {
        let template = Template::parse("{speaker} shrugs").unwrap();
        let json = serde_json::to_string(&template).unwrap();
        assert_eq!(json, r#""{speaker} shrugs""#);
        let bad: Result<Template, _> = serde_json::from_str(r#""{ghost} shrugs""#);
        assert!(bad.is_err());
    }
}
