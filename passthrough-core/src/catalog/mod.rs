//! Selection lists offered to the user and their mapping to platform values.

pub mod table;

use serde::{Deserialize, Serialize};

use crate::models::audio_params::{
    CaptureSource, InputChannelMask, OutputChannelMask, Parameter, SampleEncoding, StreamClass,
};
use crate::models::config::SessionConfig;

pub use table::ParameterTable;

/// The five selection lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParameterCategory {
    CaptureSource,
    SampleEncoding,
    InputChannelMask,
    OutputChannelMask,
    StreamClass,
}

impl ParameterCategory {
    pub const ALL: [ParameterCategory; 5] = [
        Self::CaptureSource,
        Self::SampleEncoding,
        Self::InputChannelMask,
        Self::OutputChannelMask,
        Self::StreamClass,
    ];
}

/// A concrete value from any category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterValue {
    CaptureSource(CaptureSource),
    SampleEncoding(SampleEncoding),
    InputChannelMask(InputChannelMask),
    OutputChannelMask(OutputChannelMask),
    StreamClass(StreamClass),
}

impl ParameterValue {
    pub fn code(&self) -> i32 {
        match self {
            Self::CaptureSource(v) => v.code(),
            Self::SampleEncoding(v) => v.code(),
            Self::InputChannelMask(v) => v.code(),
            Self::OutputChannelMask(v) => v.code(),
            Self::StreamClass(v) => v.code(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::CaptureSource(v) => v.label(),
            Self::SampleEncoding(v) => v.label(),
            Self::InputChannelMask(v) => v.label(),
            Self::OutputChannelMask(v) => v.label(),
            Self::StreamClass(v) => v.label(),
        }
    }
}

/// Selected position in each list, as reported by the selection widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub source: usize,
    pub encoding: usize,
    pub input_mask: usize,
    pub output_mask: usize,
    pub stream_class: usize,
}

impl Default for Selection {
    fn default() -> Self {
        ParameterCatalog::standard().default_selection()
    }
}

/// Catalog of every selectable parameter.
#[derive(Debug, Clone)]
pub struct ParameterCatalog {
    sources: ParameterTable<CaptureSource>,
    encodings: ParameterTable<SampleEncoding>,
    input_masks: ParameterTable<InputChannelMask>,
    output_masks: ParameterTable<OutputChannelMask>,
    stream_classes: ParameterTable<StreamClass>,
}

impl ParameterCatalog {
    /// Full catalog with defaults MIC / PCM 16-bit / stereo in / stereo out /
    /// music stream.
    pub fn standard() -> Self {
        let defaults = SessionConfig::default();
        Self {
            sources: ParameterTable::standard(defaults.source),
            encodings: ParameterTable::standard(defaults.encoding),
            input_masks: ParameterTable::standard(defaults.input_mask),
            output_masks: ParameterTable::standard(defaults.output_mask),
            stream_classes: ParameterTable::standard(defaults.stream_class),
        }
    }

    pub fn sources(&self) -> &ParameterTable<CaptureSource> {
        &self.sources
    }

    pub fn encodings(&self) -> &ParameterTable<SampleEncoding> {
        &self.encodings
    }

    pub fn input_masks(&self) -> &ParameterTable<InputChannelMask> {
        &self.input_masks
    }

    pub fn output_masks(&self) -> &ParameterTable<OutputChannelMask> {
        &self.output_masks
    }

    pub fn stream_classes(&self) -> &ParameterTable<StreamClass> {
        &self.stream_classes
    }

    /// Value at `index` in `category`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds for the category.
    pub fn value_at(&self, category: ParameterCategory, index: usize) -> ParameterValue {
        match category {
            ParameterCategory::CaptureSource => {
                ParameterValue::CaptureSource(self.sources.value_at(index))
            }
            ParameterCategory::SampleEncoding => {
                ParameterValue::SampleEncoding(self.encodings.value_at(index))
            }
            ParameterCategory::InputChannelMask => {
                ParameterValue::InputChannelMask(self.input_masks.value_at(index))
            }
            ParameterCategory::OutputChannelMask => {
                ParameterValue::OutputChannelMask(self.output_masks.value_at(index))
            }
            ParameterCategory::StreamClass => {
                ParameterValue::StreamClass(self.stream_classes.value_at(index))
            }
        }
    }

    pub fn labels_for(&self, category: ParameterCategory) -> Vec<&'static str> {
        match category {
            ParameterCategory::CaptureSource => self.sources.labels(),
            ParameterCategory::SampleEncoding => self.encodings.labels(),
            ParameterCategory::InputChannelMask => self.input_masks.labels(),
            ParameterCategory::OutputChannelMask => self.output_masks.labels(),
            ParameterCategory::StreamClass => self.stream_classes.labels(),
        }
    }

    pub fn default_index(&self, category: ParameterCategory) -> usize {
        match category {
            ParameterCategory::CaptureSource => self.sources.default_index(),
            ParameterCategory::SampleEncoding => self.encodings.default_index(),
            ParameterCategory::InputChannelMask => self.input_masks.default_index(),
            ParameterCategory::OutputChannelMask => self.output_masks.default_index(),
            ParameterCategory::StreamClass => self.stream_classes.default_index(),
        }
    }

    pub fn len(&self, category: ParameterCategory) -> usize {
        self.labels_for(category).len()
    }

    pub fn default_selection(&self) -> Selection {
        Selection {
            source: self.sources.default_index(),
            encoding: self.encodings.default_index(),
            input_mask: self.input_masks.default_index(),
            output_mask: self.output_masks.default_index(),
            stream_class: self.stream_classes.default_index(),
        }
    }

    /// Build the session parameters for the current selection.
    ///
    /// # Panics
    ///
    /// Panics if any index is out of bounds for its category.
    pub fn resolve(&self, selection: &Selection) -> SessionConfig {
        SessionConfig {
            source: self.sources.value_at(selection.source),
            encoding: self.encodings.value_at(selection.encoding),
            input_mask: self.input_masks.value_at(selection.input_mask),
            output_mask: self.output_masks.value_at(selection.output_mask),
            stream_class: self.stream_classes.value_at(selection.stream_class),
        }
    }

    /// Selection that resolves to `config`.
    pub fn select(&self, config: &SessionConfig) -> Option<Selection> {
        Some(Selection {
            source: self.sources.index_of(config.source)?,
            encoding: self.encodings.index_of(config.encoding)?,
            input_mask: self.input_masks.index_of(config.input_mask)?,
            output_mask: self.output_masks.index_of(config.output_mask)?,
            stream_class: self.stream_classes.index_of(config.stream_class)?,
        })
    }
}

impl Default for ParameterCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_sizes() {
        let catalog = ParameterCatalog::standard();
        assert_eq!(catalog.len(ParameterCategory::CaptureSource), 11);
        assert_eq!(catalog.len(ParameterCategory::SampleEncoding), 10);
        assert_eq!(catalog.len(ParameterCategory::InputChannelMask), 17);
        assert_eq!(catalog.len(ParameterCategory::OutputChannelMask), 18);
        assert_eq!(catalog.len(ParameterCategory::StreamClass), 7);
    }

    #[test]
    fn default_indices_point_at_reference_values() {
        let catalog = ParameterCatalog::standard();
        assert_eq!(catalog.default_index(ParameterCategory::CaptureSource), 1);
        assert_eq!(catalog.default_index(ParameterCategory::SampleEncoding), 1);
        assert_eq!(catalog.default_index(ParameterCategory::InputChannelMask), 16);
        assert_eq!(catalog.default_index(ParameterCategory::OutputChannelMask), 13);
        assert_eq!(catalog.default_index(ParameterCategory::StreamClass), 3);

        let config = catalog.resolve(&Selection::default());
        assert_eq!(config, SessionConfig::default());
    }

    #[test]
    fn value_at_matches_labels() {
        let catalog = ParameterCatalog::standard();
        for category in ParameterCategory::ALL {
            let labels = catalog.labels_for(category);
            for (i, label) in labels.iter().enumerate() {
                assert_eq!(catalog.value_at(category, i).label(), *label);
            }
        }
    }

    #[test]
    fn platform_codes() {
        let catalog = ParameterCatalog::standard();
        assert_eq!(
            catalog.value_at(ParameterCategory::SampleEncoding, 8),
            ParameterValue::SampleEncoding(SampleEncoding::Iec61937)
        );
        assert_eq!(catalog.value_at(ParameterCategory::SampleEncoding, 8).code(), 13);
        assert_eq!(catalog.value_at(ParameterCategory::StreamClass, 6).code(), 8);
        assert_eq!(catalog.value_at(ParameterCategory::CaptureSource, 10).code(), 10);
        assert_eq!(catalog.value_at(ParameterCategory::InputChannelMask, 0).code(), 1);
        assert_eq!(catalog.value_at(ParameterCategory::OutputChannelMask, 0).code(), 1);
    }

    #[test]
    fn select_inverts_resolve() {
        let catalog = ParameterCatalog::standard();
        let selection = Selection {
            source: 5,
            encoding: 3,
            input_mask: 15,
            output_mask: 12,
            stream_class: 0,
        };
        let config = catalog.resolve(&selection);
        assert_eq!(config.source, CaptureSource::Camcorder);
        assert_eq!(config.encoding, SampleEncoding::PcmFloat);
        assert_eq!(config.input_mask, InputChannelMask::Mono);
        assert_eq!(config.output_mask, OutputChannelMask::Mono);
        assert_eq!(config.stream_class, StreamClass::VoiceCall);
        assert_eq!(catalog.select(&config), Some(selection));
    }

    #[test]
    #[should_panic]
    fn resolve_rejects_out_of_range_selection() {
        let catalog = ParameterCatalog::standard();
        let selection = Selection {
            stream_class: 42,
            ..Selection::default()
        };
        catalog.resolve(&selection);
    }
}
