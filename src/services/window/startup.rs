use tracing::debug;
use url::Url;

use super::{MiniplayerLaunch, WindowError};
use crate::services::sync::MediaSource;

const MINIPLAYER_FLAG: &str = "miniplayer";
const VIDEO_SRC: &str = "videoSrc";
const TIME: &str = "time";
const IS_PLAYING: &str = "isPlaying";

/// Initial playback state a miniplayer reads from its load URL.
///
/// This is the only way a new miniplayer learns what to play; it never waits
/// for a live message before starting.
#[derive(Debug, Clone, PartialEq)]
pub struct StartupParams {
    /// Media to load
    pub video_src: MediaSource,
    /// Start position in seconds
    pub time: f64,
    /// Whether to start playing
    pub is_playing: bool,
}

impl From<&MiniplayerLaunch> for StartupParams {
    fn from(launch: &MiniplayerLaunch) -> Self {
        Self {
            video_src: launch.source.clone(),
            time: launch.time,
            is_playing: launch.is_playing,
        }
    }
}

impl StartupParams {
    /// Append the parameters to `base` as a query string.
    ///
    /// # Errors
    ///
    /// Returns `WindowError::InvalidUrl` if `base` is not an absolute URL.
    pub fn to_url(&self, base: &str) -> Result<Url, WindowError> {
        let mut url = Url::parse(base).map_err(|e| WindowError::InvalidUrl {
            url: base.to_string(),
            details: e.to_string(),
        })?;

        url.query_pairs_mut()
            .clear()
            .append_pair(MINIPLAYER_FLAG, "true")
            .append_pair(VIDEO_SRC, self.video_src.as_str())
            .append_pair(TIME, &self.time.to_string())
            .append_pair(IS_PLAYING, if self.is_playing { "true" } else { "false" });

        Ok(url)
    }

    /// Read parameters back from a miniplayer load URL.
    ///
    /// An unparsable or negative time starts from zero.
    ///
    /// # Errors
    ///
    /// Returns `WindowError::InvalidStartupParams` if the URL is not marked
    /// as a miniplayer URL.
    pub fn from_url(url: &Url) -> Result<Self, WindowError> {
        let mut is_miniplayer = false;
        let mut params = Self {
            video_src: MediaSource::empty(),
            time: 0.0,
            is_playing: false,
        };

        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                MINIPLAYER_FLAG => is_miniplayer = value == "true",
                VIDEO_SRC => params.video_src = MediaSource::new(value.into_owned()),
                TIME => params.time = parse_time(&value),
                IS_PLAYING => params.is_playing = value == "true",
                other => debug!(key = other, "Ignoring unknown startup parameter"),
            }
        }

        if !is_miniplayer {
            return Err(WindowError::InvalidStartupParams(format!(
                "{url} is not a miniplayer URL"
            )));
        }

        Ok(params)
    }
}

fn parse_time(raw: &str) -> f64 {
    match raw.parse::<f64>() {
        Ok(time) if time.is_finite() && time >= 0.0 => time,
        _ => {
            debug!(raw, "Unusable startup time, starting from zero");
            0.0
        }
    }
}
