use serde::{Deserialize, Serialize};

/// Segmentation and padding geometry, in seconds of 16 kHz audio.
///
/// The defaults keep any single segment (plus its padding) within a ~32 s
/// working set, which bounds peak memory for arbitrarily long input while
/// staying well above typical utterance lengths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Reflect padding applied to each side of the waveform (and of each
    /// segment, implicitly) before analysis.
    pub x_pad: usize,
    /// Half-width of the cut-point search window around each candidate.
    pub x_query: usize,
    /// Spacing between cut-point candidates.
    pub x_center: usize,
    /// Maximum duration processed without segmentation.
    pub x_max: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            x_pad: 1,
            x_query: 6,
            x_center: 30,
            x_max: 32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_geometry() {
        let cfg = PipelineConfig::default();
        assert!(cfg.x_query < cfg.x_center);
        assert!(cfg.x_center < cfg.x_max);
    }

    #[test]
    fn serde_roundtrip() {
        let cfg = PipelineConfig {
            x_pad: 3,
            x_query: 10,
            x_center: 60,
            x_max: 65,
        };
        let json = serde_json::to_string(&cfg).unwrap();
        let back: PipelineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cfg);
    }
}
