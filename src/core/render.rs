use crate::domain::model::{MatchView, PresentationModel};
use crate::domain::ports::Renderer;
use crate::utils::error::Result;
use std::io::Write;

/// Human-readable output for a terminal.
pub struct TextRenderer<W: Write> {
    out: W,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_entry(&mut self, entry: &MatchView) -> Result<()> {
        writeln!(
            self.out,
            "  {}. {} ({}) - {}",
            entry.rank, entry.scientific_name, entry.common_name, entry.confidence
        )?;
        Ok(())
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn render(&mut self, model: &PresentationModel) -> Result<()> {
        match model {
            PresentationModel::Success { best, others } => {
                writeln!(self.out, "🌿 Best match: {}", best.scientific_name)?;
                writeln!(self.out, "   Common name: {}", best.common_name)?;
                writeln!(self.out, "   Confidence: {}", best.confidence)?;
                if !others.is_empty() {
                    writeln!(self.out)?;
                    writeln!(self.out, "Other candidates:")?;
                    for entry in others {
                        self.write_entry(entry)?;
                    }
                }
            }
            PresentationModel::NoMatch => {
                writeln!(
                    self.out,
                    "⚠️ No matching species found. Try a clearer photo of a single organ."
                )?;
            }
            PresentationModel::Failed { error } => {
                match error.http_status {
                    Some(code) => writeln!(self.out, "❌ Identification failed (HTTP {}): {}", code, error.message)?,
                    None => writeln!(self.out, "❌ Identification failed: {}", error.message)?,
                }
                if let Some(body) = &error.server_body {
                    writeln!(self.out, "   Server response body: {}", body)?;
                }
            }
        }
        self.out.flush()?;
        Ok(())
    }
}

/// One JSON document per presentation, for scripting.
pub struct JsonRenderer<W: Write> {
    out: W,
}

impl<W: Write> JsonRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for JsonRenderer<W> {
    fn render(&mut self, model: &PresentationModel) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.out, model).map_err(std::io::Error::from)?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}
