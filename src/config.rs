use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub filter: FilterConfig,
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_crf")]
    pub crf: u32,
    #[serde(default = "default_codec")]
    pub codec: String,
    #[serde(default = "default_pix_fmt")]
    pub pix_fmt: String,
}

#[derive(Debug, Deserialize)]
pub struct FilterConfig {
    #[serde(default = "default_window_seconds")]
    pub window_seconds: f32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            crf: default_crf(),
            codec: default_codec(),
            pix_fmt: default_pix_fmt(),
        }
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            window_seconds: default_window_seconds(),
        }
    }
}

fn default_crf() -> u32 { 18 }
fn default_codec() -> String { "libx264".into() }
fn default_pix_fmt() -> String { "yuv420p".into() }
fn default_window_seconds() -> f32 { 2.0 }

pub fn load_config(path: &PathBuf) -> Option<Config> {
    let content = std::fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_fills_defaults() {
        let cfg: Config = toml::from_str("[filter]\nwindow_seconds = 1.5\n").unwrap();
        assert_eq!(cfg.filter.window_seconds, 1.5);
        assert_eq!(cfg.output.codec, "libx264");
        assert_eq!(cfg.output.crf, 18);
    }
}
