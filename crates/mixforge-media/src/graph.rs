//! Typed filter-graph intermediate representation.
//!
//! A [`FilterGraph`] is an ordered list of named transform stages, each
//! consuming named input labels and producing named output labels. The
//! list is topologically pre-sorted: no stage may reference a later
//! stage's output. Construction is separated from serialization so graph
//! shape can be tested without touching FFmpeg syntax or escaping.
//!
//! Label conventions: stream specifiers from input files contain a colon
//! (`0:v`, `1:a`, `2:v`) and may be consumed any number of times;
//! intermediate labels are bare names and must be consumed exactly once.

use std::collections::HashMap;
use std::fmt::Display;

use crate::error::{MediaError, MediaResult};

/// One filter parameter: keyed (`k=v`) or positional (`v`).
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub key: Option<String>,
    pub value: String,
}

/// One transform stage in the graph.
#[derive(Debug, Clone)]
pub struct FilterStage {
    filter: String,
    inputs: Vec<String>,
    outputs: Vec<String>,
    params: Vec<Param>,
}

impl FilterStage {
    pub fn new(filter: impl Into<String>) -> Self {
        Self {
            filter: filter.into(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            params: Vec::new(),
        }
    }

    pub fn input(mut self, label: impl Into<String>) -> Self {
        self.inputs.push(label.into());
        self
    }

    pub fn output(mut self, label: impl Into<String>) -> Self {
        self.outputs.push(label.into());
        self
    }

    /// Add a keyed parameter.
    pub fn param(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.params.push(Param {
            key: Some(key.into()),
            value: value.to_string(),
        });
        self
    }

    /// Add a positional parameter.
    pub fn arg(mut self, value: impl Display) -> Self {
        self.params.push(Param {
            key: None,
            value: value.to_string(),
        });
        self
    }

    pub fn filter_name(&self) -> &str {
        &self.filter
    }

    pub fn inputs(&self) -> &[String] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[String] {
        &self.outputs
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    fn render(&self) -> String {
        let mut out = String::new();
        for input in &self.inputs {
            out.push('[');
            out.push_str(input);
            out.push(']');
        }
        out.push_str(&self.filter);
        if !self.params.is_empty() {
            out.push('=');
            let rendered: Vec<String> = self
                .params
                .iter()
                .map(|p| match &p.key {
                    Some(key) => format!("{}={}", key, quote_value(&p.value)),
                    None => quote_value(&p.value),
                })
                .collect();
            out.push_str(&rendered.join(":"));
        }
        for output in &self.outputs {
            out.push('[');
            out.push_str(output);
            out.push(']');
        }
        out
    }
}

/// Quote a parameter value when it contains filter-syntax characters.
fn quote_value(value: &str) -> String {
    const SYNTAX: &[char] = &[',', ':', ';', '=', '[', ']', ' '];
    if value.contains(SYNTAX) {
        format!("'{}'", value)
    } else {
        value.to_string()
    }
}

/// Whether a label is a stream specifier from an input file.
fn is_source_label(label: &str) -> bool {
    label.contains(':')
}

/// A complete filter graph for one rendered segment.
///
/// Built fresh per render call; terminates in exactly one video output
/// label and one audio output label (the audio label may be a stream
/// specifier when audio passes through unfiltered).
#[derive(Debug, Clone)]
pub struct FilterGraph {
    stages: Vec<FilterStage>,
    video_out: String,
    audio_out: String,
}

impl FilterGraph {
    pub fn new() -> Self {
        Self {
            stages: Vec::new(),
            video_out: String::new(),
            audio_out: String::new(),
        }
    }

    /// Append a stage; stages must be pushed in topological order.
    pub fn push(&mut self, stage: FilterStage) {
        self.stages.push(stage);
    }

    pub fn set_video_out(&mut self, label: impl Into<String>) {
        self.video_out = label.into();
    }

    pub fn set_audio_out(&mut self, label: impl Into<String>) {
        self.audio_out = label.into();
    }

    pub fn video_out(&self) -> &str {
        &self.video_out
    }

    pub fn audio_out(&self) -> &str {
        &self.audio_out
    }

    pub fn stages(&self) -> &[FilterStage] {
        &self.stages
    }

    /// Whether any stage reads the mask input (`2:v`).
    pub fn uses_mask_input(&self) -> bool {
        self.stages
            .iter()
            .any(|s| s.inputs.iter().any(|l| l == "2:v"))
    }

    /// Check the structural invariants.
    ///
    /// - every non-source input was produced by an earlier stage
    /// - intermediate labels are consumed exactly once
    /// - no label is produced twice
    /// - the declared video/audio outputs exist and are unconsumed
    pub fn validate(&self) -> MediaResult<()> {
        let mut produced: HashMap<&str, bool> = HashMap::new(); // label -> consumed

        for stage in &self.stages {
            for input in &stage.inputs {
                if is_source_label(input) {
                    continue;
                }
                match produced.get_mut(input.as_str()) {
                    None => {
                        return Err(MediaError::InvalidGraph(format!(
                            "stage '{}' consumes label '{}' before it is produced",
                            stage.filter, input
                        )));
                    }
                    Some(consumed) if *consumed => {
                        return Err(MediaError::InvalidGraph(format!(
                            "label '{}' consumed more than once",
                            input
                        )));
                    }
                    Some(consumed) => *consumed = true,
                }
            }
            for output in &stage.outputs {
                if produced.insert(output.as_str(), false).is_some() {
                    return Err(MediaError::InvalidGraph(format!(
                        "label '{}' produced more than once",
                        output
                    )));
                }
            }
        }

        if self.video_out.is_empty() {
            return Err(MediaError::InvalidGraph("no video output label".into()));
        }
        match produced.get(self.video_out.as_str()).copied() {
            Some(false) => {}
            Some(true) => {
                return Err(MediaError::InvalidGraph(format!(
                    "video output '{}' was consumed by a stage",
                    self.video_out
                )));
            }
            None => {
                return Err(MediaError::InvalidGraph(format!(
                    "video output '{}' is never produced",
                    self.video_out
                )));
            }
        }

        if self.audio_out.is_empty() {
            return Err(MediaError::InvalidGraph("no audio output label".into()));
        }
        if !is_source_label(&self.audio_out)
            && produced.get(self.audio_out.as_str()).copied() != Some(false)
        {
            return Err(MediaError::InvalidGraph(format!(
                "audio output '{}' is missing or consumed",
                self.audio_out
            )));
        }

        // Everything produced must be consumed or be a declared output.
        for (label, consumed) in &produced {
            if !*consumed && *label != self.video_out && *label != self.audio_out {
                return Err(MediaError::InvalidGraph(format!(
                    "label '{}' is produced but never consumed",
                    label
                )));
            }
        }

        Ok(())
    }

    /// Serialize to FFmpeg `filter_complex` syntax.
    pub fn render(&self) -> String {
        self.stages
            .iter()
            .map(FilterStage::render)
            .collect::<Vec<_>>()
            .join(";")
    }
}

impl Default for FilterGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simple_graph() -> FilterGraph {
        let mut g = FilterGraph::new();
        g.push(
            FilterStage::new("scale")
                .input("0:v")
                .param("w", 1920)
                .param("h", 1080)
                .output("scaled"),
        );
        g.push(FilterStage::new("crop").input("scaled").arg(1920).arg(1080).output("v"));
        g.set_video_out("v");
        g.set_audio_out("1:a");
        g
    }

    #[test]
    fn test_valid_graph() {
        simple_graph().validate().unwrap();
    }

    #[test]
    fn test_render_syntax() {
        let rendered = simple_graph().render();
        assert_eq!(
            rendered,
            "[0:v]scale=w=1920:h=1080[scaled];[scaled]crop=1920:1080[v]"
        );
    }

    #[test]
    fn test_expression_values_quoted() {
        let stage = FilterStage::new("zoompan")
            .input("bg")
            .param("z", "min(1+0.0003*on,1.5)")
            .param("d", 900)
            .output("zoomed");
        assert_eq!(
            stage.render(),
            "[bg]zoompan=z='min(1+0.0003*on,1.5)':d=900[zoomed]"
        );
    }

    #[test]
    fn test_forward_reference_rejected() {
        let mut g = FilterGraph::new();
        g.push(FilterStage::new("crop").input("scaled").output("v"));
        g.push(FilterStage::new("scale").input("0:v").output("scaled"));
        g.set_video_out("v");
        g.set_audio_out("1:a");
        assert!(matches!(g.validate(), Err(MediaError::InvalidGraph(_))));
    }

    #[test]
    fn test_double_consume_rejected() {
        let mut g = FilterGraph::new();
        g.push(FilterStage::new("scale").input("0:v").output("s"));
        g.push(FilterStage::new("gblur").input("s").output("a"));
        g.push(FilterStage::new("vignette").input("s").output("b"));
        g.push(FilterStage::new("blend").input("a").input("b").output("v"));
        g.set_video_out("v");
        g.set_audio_out("1:a");
        assert!(matches!(g.validate(), Err(MediaError::InvalidGraph(_))));
    }

    #[test]
    fn test_source_label_multi_use_allowed() {
        let mut g = FilterGraph::new();
        g.push(FilterStage::new("showwaves").input("1:a").output("w"));
        g.push(FilterStage::new("showfreqs").input("1:a").output("f"));
        g.push(FilterStage::new("overlay").input("w").input("f").output("v"));
        g.set_video_out("v");
        g.set_audio_out("1:a");
        g.validate().unwrap();
    }

    #[test]
    fn test_dangling_label_rejected() {
        let mut g = FilterGraph::new();
        g.push(
            FilterStage::new("split")
                .input("0:v")
                .output("a")
                .output("b"),
        );
        g.push(FilterStage::new("gblur").input("a").output("v"));
        g.set_video_out("v");
        g.set_audio_out("1:a");
        assert!(matches!(g.validate(), Err(MediaError::InvalidGraph(_))));
    }

    #[test]
    fn test_missing_video_out_rejected() {
        let mut g = FilterGraph::new();
        g.push(FilterStage::new("scale").input("0:v").output("v"));
        g.set_video_out("missing");
        g.set_audio_out("1:a");
        assert!(matches!(g.validate(), Err(MediaError::InvalidGraph(_))));
    }
}
