//! Phrase Rendering
//!
//! NPC replies are produced by an optional external [`PhraseRenderer`]. Every
//! call is bounded by a timeout and an optional abort signal. When the renderer
//! fails, stalls, is aborted or returns nothing, the narrator falls back to a
//! template, then to the strategy summary, then to a fixed line.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use cast_events::{ResponseStrategy, ResponseTone};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{ConfigError, NarratorConfig};
use crate::template::{Slot, SlotValues};
use crate::templates::{default_templates, NarrationTemplates};

/// Errors raised by a phrase renderer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("renderer `{0}` unavailable")]
    Unavailable(String),
    #[error("render timed out after {0} ms")]
    Timeout(u64),
    #[error("render aborted")]
    Aborted,
    #[error("renderer returned empty text")]
    Empty,
    #[error("renderer failed: {0}")]
    Failed(String),
}

/// External text generator turning a reply summary into a spoken line.
#[async_trait]
pub trait PhraseRenderer: Send + Sync {
    async fn render(
        &self,
        summary: &str,
        npc_profile: &str,
        tone: ResponseTone,
    ) -> Result<String, RenderError>;

    fn name(&self) -> &str;
}

/// Everything needed to phrase one reply. Built by the engine, then rendered
/// without holding any engine borrow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderRequest {
    pub npc_name: String,
    /// Short personality description handed to the external renderer
    pub npc_profile: String,
    pub player_name: String,
    pub strategy: ResponseStrategy,
    pub tone: ResponseTone,
    /// One-line gist of what the NPC means to say
    pub summary: String,
    /// Player broke the fiction
    #[serde(default)]
    pub fourth_wall: bool,
    /// Template selector, derived from the engine RNG
    #[serde(default)]
    pub variant: u64,
    /// Day the request was issued on
    pub day: u32,
    /// Engine turn counter when the request was issued
    pub turn: u64,
}

/// Which tier produced a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineSource {
    External,
    Template,
    Summary,
    Fixed,
}

/// A rendered reply tagged with the request it answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedLine {
    pub text: String,
    pub source: LineSource,
    pub day: u32,
    pub turn: u64,
}

/// Renders NPC replies with a bounded external call and local fallbacks.
pub struct ResponseNarrator {
    templates: NarrationTemplates,
    config: NarratorConfig,
    renderer: Option<Arc<dyn PhraseRenderer>>,
}

impl Default for ResponseNarrator {
    fn default() -> Self {
        Self::new(default_templates(), NarratorConfig::default())
    }
}

impl ResponseNarrator {
    pub fn new(templates: NarrationTemplates, config: NarratorConfig) -> Self {
        Self {
            templates,
            config,
            renderer: None,
        }
    }

    /// Builds a narrator from its config, loading `templates_path` over the
    /// built-in templates when set.
    pub fn from_config(config: NarratorConfig) -> Result<Self, ConfigError> {
        let templates = match config.templates_path.as_deref() {
            Some(path) => NarrationTemplates::from_file(Path::new(path))?,
            None => default_templates(),
        };
        Ok(Self::new(templates, config))
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn PhraseRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn templates(&self) -> &NarrationTemplates {
        &self.templates
    }

    pub fn config(&self) -> &NarratorConfig {
        &self.config
    }

    /// Renders a reply. Never fails.
    pub async fn render(&self, request: &RenderRequest) -> RenderedLine {
        self.render_until(request, std::future::pending::<()>()).await
    }

    /// Renders a reply, giving up on the external renderer as soon as `abort`
    /// completes. Never fails.
    pub async fn render_until<A>(&self, request: &RenderRequest, abort: A) -> RenderedLine
    where
        A: Future<Output = ()> + Send,
    {
        if let Some(renderer) = &self.renderer {
            match self.call_external(renderer.as_ref(), request, abort).await {
                Ok(text) => {
                    return RenderedLine {
                        text,
                        source: LineSource::External,
                        day: request.day,
                        turn: request.turn,
                    };
                }
                Err(e) => {
                    warn!(
                        renderer = renderer.name(),
                        npc = %request.npc_name,
                        error = %e,
                        "phrase renderer failed, using fallback"
                    );
                }
            }
        }
        self.render_fallback(request)
    }

    async fn call_external<A>(
        &self,
        renderer: &dyn PhraseRenderer,
        request: &RenderRequest,
        abort: A,
    ) -> Result<String, RenderError>
    where
        A: Future<Output = ()> + Send,
    {
        let timeout_ms = self.config.render_timeout_ms;
        let call = tokio::time::timeout(
            Duration::from_millis(timeout_ms),
            renderer.render(&request.summary, &request.npc_profile, request.tone),
        );

        let text = tokio::select! {
            result = call => match result {
                Ok(inner) => inner?,
                Err(_) => return Err(RenderError::Timeout(timeout_ms)),
            },
            _ = abort => return Err(RenderError::Aborted),
        };

        let text = text.trim();
        if text.is_empty() {
            return Err(RenderError::Empty);
        }
        Ok(text.to_string())
    }

    /// Local rendering: template, then summary, then the fixed line.
    pub fn render_fallback(&self, request: &RenderRequest) -> RenderedLine {
        let template = if request.fourth_wall {
            self.templates.fourth_wall(request.variant)
        } else {
            self.templates.response(request.strategy, request.variant)
        };

        let values = SlotValues::new()
            .with(Slot::Speaker, request.npc_name.clone())
            .with(Slot::Player, request.player_name.clone())
            .with(Slot::Tone, request.tone.as_str())
            .with(Slot::Summary, request.summary.clone())
            .with(Slot::Day, request.day.to_string());

        let (text, source) = match template.map(|t| t.render(&values)) {
            Some(Ok(text)) if !text.trim().is_empty() => (text, LineSource::Template),
            other => {
                if let Some(Err(e)) = other {
                    debug!(error = %e, "reply template failed");
                }
                if request.summary.trim().is_empty() {
                    (self.config.fixed_line.clone(), LineSource::Fixed)
                } else {
                    (request.summary.clone(), LineSource::Summary)
                }
            }
        };

        RenderedLine {
            text,
            source,
            day: request.day,
            turn: request.turn,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::Template;
    use std::collections::BTreeMap;

    fn request(strategy: ResponseStrategy) -> RenderRequest {
        RenderRequest {
            npc_name: "Theo".to_string(),
            npc_profile: "loyal, calm".to_string(),
            player_name: "Jordan".to_string(),
            strategy,
            tone: ResponseTone::Warm,
            summary: "Theo is open to working together.".to_string(),
            fourth_wall: false,
            variant: 0,
            day: 2,
            turn: 5,
        }
    }

    #[test]
    fn test_fallback_prefers_template() {
        let narrator = ResponseNarrator::default();
        let line = narrator.render_fallback(&request(ResponseStrategy::StrategicAlliance));
        assert_eq!(line.source, LineSource::Template);
        assert!(line.text.contains("Jordan"));
        assert_eq!((line.day, line.turn), (2, 5));
    }

    #[test]
    fn test_fallback_uses_summary_when_template_missing_slot() {
        let mut templates = NarrationTemplates::default();
        let mut responses = BTreeMap::new();
        responses.insert(
            "neutral".to_string(),
            vec![Template::parse("{subject}?").unwrap()],
        );
        templates.responses = responses;
        let narrator = ResponseNarrator::new(templates, NarratorConfig::default());
        let line = narrator.render_fallback(&request(ResponseStrategy::Neutral));
        assert_eq!(line.source, LineSource::Summary);
        assert_eq!(line.text, "Theo is open to working together.");
    }

    #[test]
    fn test_fallback_fixed_line_last() {
        let narrator = ResponseNarrator::new(NarrationTemplates::default(), NarratorConfig::default());
        let mut req = request(ResponseStrategy::Hostile);
        req.summary = String::new();
        let line = narrator.render_fallback(&req);
        assert_eq!(line.source, LineSource::Fixed);
        assert_eq!(line.text, NarratorConfig::default().fixed_line);
    }

    #[test]
    fn test_fourth_wall_uses_its_own_table() {
        let narrator = ResponseNarrator::default();
        let mut req = request(ResponseStrategy::Suspicious);
        req.fourth_wall = true;
        let line = narrator.render_fallback(&req);
        let expected = narrator
            .templates()
            .fourth_wall(0)
            .unwrap()
            .render(&SlotValues::new().with(Slot::Player, "Jordan"))
            .unwrap();
        assert_eq!(line.text, expected);
    }
}
