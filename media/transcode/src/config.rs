/*!
    Pipeline configuration.
*/

use std::time::Duration;

use serde::{Deserialize, Deserializer, de::Error as _};

use media_types::{Error, Result};

/// Rounds between progress reports.
const DEFAULT_PROGRESS_INTERVAL: u64 = 10;

/**
    Configuration for a transcoding run.

    Can be built in code or loaded from YAML:

    ```yaml
    max_duration_secs: 30.0
    audio: false
    progress_interval: 20
    ```
*/
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TranscodeConfig {
    /**
        Stop forwarding samples once a track passes this timestamp.

        Applies to every pass-through slot, so all output tracks end at the
        same point. `None` or zero disables truncation.

        Samples are compared in the source's decode order: a track ends at
        its first sample stamped past the limit. With reordered frames (B
        frames), a later sample that is still within the limit is dropped
        along with the rest of the track.
    */
    #[serde(rename = "max_duration_secs", deserialize_with = "deserialize_secs")]
    pub max_duration: Option<Duration>,
    /// Include the source's video track in the output.
    pub video: bool,
    /// Include the source's audio track in the output.
    pub audio: bool,
    /// Rounds between progress reports (0 reports only on completion).
    pub progress_interval: u64,
}

impl Default for TranscodeConfig {
    fn default() -> Self {
        Self {
            max_duration: None,
            video: true,
            audio: true,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

impl TranscodeConfig {
    /**
        Parse a configuration from YAML. Missing keys take their defaults.
    */
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| Error::config(e.to_string()))
    }

    pub fn with_max_duration(mut self, max_duration: Duration) -> Self {
        self.max_duration = Some(max_duration);
        self
    }

    /**
        Exclude the video slot from the output.
    */
    pub fn without_video(mut self) -> Self {
        self.video = false;
        self
    }

    /**
        Exclude the audio slot from the output.
    */
    pub fn without_audio(mut self) -> Self {
        self.audio = false;
        self
    }

    pub fn with_progress_interval(mut self, rounds: u64) -> Self {
        self.progress_interval = rounds;
        self
    }
}

fn deserialize_secs<'de, D>(deserializer: D) -> std::result::Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<f64>::deserialize(deserializer)? {
        None => Ok(None),
        Some(secs) => Duration::try_from_secs_f64(secs)
            .map(Some)
            .map_err(|_| D::Error::custom(format!("invalid duration: {secs} seconds"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = TranscodeConfig::default();
        assert_eq!(config.max_duration, None);
        assert!(config.video);
        assert!(config.audio);
        assert_eq!(config.progress_interval, 10);
    }

    #[test]
    fn builder() {
        let config = TranscodeConfig::default()
            .with_max_duration(Duration::from_secs(5))
            .without_audio()
            .with_progress_interval(0);
        assert_eq!(config.max_duration, Some(Duration::from_secs(5)));
        assert!(config.video);
        assert!(!config.audio);
        assert_eq!(config.progress_interval, 0);
    }

    #[test]
    fn from_yaml() {
        let config = TranscodeConfig::from_yaml(
            "max_duration_secs: 1.5\naudio: false\nprogress_interval: 20\n",
        )
        .unwrap();
        assert_eq!(config.max_duration, Some(Duration::from_millis(1500)));
        assert!(config.video);
        assert!(!config.audio);
        assert_eq!(config.progress_interval, 20);
    }

    #[test]
    fn from_yaml_partial() {
        let config = TranscodeConfig::from_yaml("video: false\n").unwrap();
        assert_eq!(config.max_duration, None);
        assert!(!config.video);
        assert_eq!(config.progress_interval, 10);
    }

    #[test]
    fn from_yaml_rejects_negative_duration() {
        let err = TranscodeConfig::from_yaml("max_duration_secs: -2\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn from_yaml_rejects_unknown_keys() {
        assert!(TranscodeConfig::from_yaml("max_video_duration: 3\n").is_err());
    }
}
