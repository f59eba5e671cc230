/// Wall-clock totals accumulated across every segment of one or more
/// pipeline invocations. Owned by the caller; the pipeline only adds.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TimingAccumulator {
    /// Feature extraction, blending, and upsampling.
    pub feature_secs: f64,
    /// Pitch estimation and conditioning.
    pub pitch_secs: f64,
    /// Synthesizer inference.
    pub infer_secs: f64,
}

impl TimingAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum of all three counters.
    pub fn total_secs(&self) -> f64 {
        self.feature_secs + self.pitch_secs + self.infer_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals_add_up() {
        let t = TimingAccumulator {
            feature_secs: 1.0,
            pitch_secs: 0.25,
            infer_secs: 2.5,
        };
        assert_eq!(t.total_secs(), 3.75);
        assert_eq!(TimingAccumulator::new().total_secs(), 0.0);
    }
}
