// preview - HTML produced by the external processor, refreshed as the text changes
use std::time::{Duration, Instant};

use egui::Ui;

use crate::core::export::Exporter;

// processors are separate programs; don't start one per keystroke
const REFRESH_INTERVAL: Duration = Duration::from_millis(750);

#[derive(Debug, Clone, PartialEq)]
enum Content {
    Empty,
    Html(String),
    Failed(String),
}

#[derive(Debug)]
pub struct Preview {
    content: Content,
    rendered_revision: Option<u64>,
    last_render: Option<Instant>,
}

impl Default for Preview {
    fn default() -> Self {
        Self {
            content: Content::Empty,
            rendered_revision: None,
            last_render: None,
        }
    }
}

impl Preview {
    /// Forces a render on the next refresh, e.g. after the exporter changed.
    pub fn invalidate(&mut self) {
        self.rendered_revision = None;
        self.last_render = None;
    }

    /// Re-renders when the text changed and the last render is old enough.
    /// Returns whether a render ran.
    pub fn refresh(
        &mut self,
        markdown: &str,
        revision: u64,
        exporter: Option<&dyn Exporter>,
        now: Instant,
    ) -> bool {
        if self.rendered_revision == Some(revision) {
            return false;
        }
        if self
            .last_render
            .is_some_and(|last| now.duration_since(last) < REFRESH_INTERVAL)
        {
            return false;
        }

        self.content = match exporter {
            None => Content::Empty,
            Some(exporter) => match exporter.to_html(markdown) {
                Ok(html) => Content::Html(html),
                Err(e) => {
                    tracing::warn!("Preview failed: {e}");
                    Content::Failed(e.to_string())
                }
            },
        };
        self.rendered_revision = Some(revision);
        self.last_render = Some(now);
        true
    }

    pub fn show(&self, ui: &mut Ui) {
        egui::ScrollArea::vertical()
            .id_salt("preview_scroll")
            .auto_shrink([false, false])
            .show(ui, |ui| match &self.content {
                Content::Empty => {
                    ui.weak("No Markdown processor found. Install pandoc, cmark, multimarkdown or markdown to enable the preview.");
                }
                Content::Html(html) => {
                    let mut text = html.as_str();
                    ui.add(
                        egui::TextEdit::multiline(&mut text)
                            .font(egui::TextStyle::Monospace)
                            .desired_width(f32::INFINITY)
                            .frame(false),
                    );
                }
                Content::Failed(error) => {
                    ui.colored_label(ui.visuals().error_fg_color, error);
                }
            });
    }
}
