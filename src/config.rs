// src/config.rs
//! Run configuration.
//!
//! Resolution order:
//! 1) `$CATALOG_CONFIG_PATH`
//! 2) `config/catalog.toml`
//! 3) `config/catalog.json`
//! 4) built-in seed
//!
//! Afterwards `CATALOG_TTL_DAYS`, `CATALOG_OBSERVATIONS_PATH` and
//! `CATALOG_METRICS_PATH` override the loaded values when set.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::curate::{ChannelProfile, CurateOptions};
use crate::error::CatalogError;
use crate::guard::GuardPolicy;
use crate::reconcile::RenamePolicy;

pub const ENV_CONFIG_PATH: &str = "CATALOG_CONFIG_PATH";
pub const ENV_TTL_DAYS: &str = "CATALOG_TTL_DAYS";
pub const ENV_OBSERVATIONS_PATH: &str = "CATALOG_OBSERVATIONS_PATH";
pub const ENV_METRICS_PATH: &str = "CATALOG_METRICS_PATH";

pub const DEFAULT_CONFIG_TOML: &str = "config/catalog.toml";
pub const DEFAULT_CONFIG_JSON: &str = "config/catalog.json";

fn default_ttl_days() -> u32 {
    30
}
fn default_catalog_path() -> PathBuf {
    PathBuf::from("data.csv")
}
fn default_playlist_path() -> PathBuf {
    PathBuf::from("tvo.m3u")
}
fn default_text_path() -> PathBuf {
    PathBuf::from("tvo.txt")
}
fn default_group_title() -> String {
    CurateOptions::default().group_title
}
fn default_markers() -> Vec<String> {
    CurateOptions::default().preferred_markers
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_ttl_days")]
    pub ttl_days: u32,
    #[serde(default)]
    pub guard: GuardPolicy,
    #[serde(default)]
    pub rename_policy: RenamePolicy,
    #[serde(default)]
    pub paths: PathsCfg,
    #[serde(default)]
    pub publish: PublishCfg,
    #[serde(default)]
    pub profiles: Vec<ProfileCfg>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PathsCfg {
    #[serde(default = "default_catalog_path")]
    pub catalog: PathBuf,
    #[serde(default = "default_playlist_path")]
    pub playlist: PathBuf,
    #[serde(default = "default_text_path")]
    pub text: PathBuf,
    /// JSON file written by the harvesting agent.
    #[serde(default)]
    pub observations: Option<PathBuf>,
    /// Prometheus textfile written after each run.
    #[serde(default)]
    pub metrics: Option<PathBuf>,
}

impl Default for PathsCfg {
    fn default() -> Self {
        Self {
            catalog: default_catalog_path(),
            playlist: default_playlist_path(),
            text: default_text_path(),
            observations: None,
            metrics: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PublishCfg {
    /// Program guide reference placed in the playlist header.
    #[serde(default)]
    pub epg_url: Option<String>,
    #[serde(default = "default_group_title")]
    pub group_title: String,
    #[serde(default = "default_markers")]
    pub preferred_markers: Vec<String>,
    /// Cap for profiles without their own `max_count`. Unset means unbounded.
    #[serde(default)]
    pub default_max_count: Option<usize>,
}

impl Default for PublishCfg {
    fn default() -> Self {
        Self {
            epg_url: None,
            group_title: default_group_title(),
            preferred_markers: default_markers(),
            default_max_count: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileCfg {
    pub search_key: String,
    /// Published label; defaults to `search_key`.
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
    /// Upper-case tokens that disqualify a matching channel name.
    #[serde(default)]
    pub exclude_containing: Vec<String>,
    #[serde(default)]
    pub max_count: Option<usize>,
    /// Position in the playlist; defaults to the position in this list.
    #[serde(default)]
    pub order: Option<i64>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self::default_seed()
    }
}

impl CatalogConfig {
    /// Load from an explicit path. Supports TOML or JSON.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading catalog config from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let cfg = Self::parse(&content, &ext)
            .with_context(|| format!("parsing catalog config {}", path.display()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load using env var + fallbacks, then apply env overrides.
    pub fn load_default() -> Result<Self> {
        let mut cfg = if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
            }
            Self::load_from(&pb)?
        } else if Path::new(DEFAULT_CONFIG_TOML).exists() {
            Self::load_from(Path::new(DEFAULT_CONFIG_TOML))?
        } else if Path::new(DEFAULT_CONFIG_JSON).exists() {
            Self::load_from(Path::new(DEFAULT_CONFIG_JSON))?
        } else {
            tracing::info!(target: "config", "no catalog config found, using built-in seed");
            Self::default_seed()
        };
        cfg.apply_env_overrides()?;
        Ok(cfg)
    }

    fn parse(s: &str, hint_ext: &str) -> Result<Self> {
        if hint_ext == "json" {
            return serde_json::from_str(s).context("invalid JSON config");
        }
        match toml::from_str(s) {
            Ok(cfg) => Ok(cfg),
            Err(toml_err) if hint_ext != "toml" => {
                serde_json::from_str(s)
                    .map_err(|_| anyhow!(toml_err).context("unsupported config format"))
            }
            Err(e) => Err(anyhow!(e).context("invalid TOML config")),
        }
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(v) = std::env::var(ENV_TTL_DAYS) {
            self.ttl_days = v.trim().parse().map_err(|_| {
                CatalogError::Config(format!("{ENV_TTL_DAYS}={v:?} is not a day count"))
            })?;
        }
        if let Ok(v) = std::env::var(ENV_OBSERVATIONS_PATH) {
            self.paths.observations = Some(PathBuf::from(v));
        }
        if let Ok(v) = std::env::var(ENV_METRICS_PATH) {
            self.paths.metrics = Some(PathBuf::from(v));
        }
        Ok(())
    }

    pub fn validate(&self) -> std::result::Result<(), CatalogError> {
        let ratio = self.guard.min_ratio;
        if !(0.0..=1.0).contains(&ratio) {
            return Err(CatalogError::Config(format!(
                "guard.min_ratio must be within 0..=1, got {ratio}"
            )));
        }
        if let Some(p) = self.profiles.iter().find(|p| p.search_key.trim().is_empty()) {
            return Err(CatalogError::Config(format!(
                "profile with empty search_key (display_name {:?})",
                p.display_name
            )));
        }
        Ok(())
    }

    /// Profiles in publish order: by `order`, then by position in the file.
    pub fn channel_profiles(&self) -> Vec<ChannelProfile> {
        let mut out: Vec<ChannelProfile> = self
            .profiles
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let mut profile = ChannelProfile::new(
                    p.search_key.trim(),
                    p.display_name.clone().unwrap_or_else(|| p.search_key.trim().to_string()),
                )
                .exclude_containing(p.exclude_containing.as_slice())
                .order(p.order.unwrap_or(i as i64));
                profile.logo_url = p.logo.clone().filter(|l| !l.is_empty());
                profile.max_count = p.max_count.or(self.publish.default_max_count);
                profile
            })
            .collect();
        out.sort_by_key(|p| p.order);
        out
    }

    pub fn curate_options(&self) -> CurateOptions {
        CurateOptions {
            preferred_markers: self.publish.preferred_markers.clone(),
            group_title: self.publish.group_title.clone(),
        }
    }

    /// Built-in seed: the Hong Kong / Guangdong line-up the harvester was
    /// first written for. Used when no config file is found.
    pub(crate) fn default_seed() -> Self {
        const LOGO_BASE: &str = "https://raw.githubusercontent.com/fanmingming/live/main/tv";
        let profile = |key: &str, name: &str, logo: &str, exclude: &[&str]| ProfileCfg {
            search_key: key.to_string(),
            display_name: Some(name.to_string()),
            logo: Some(format!("{LOGO_BASE}/{logo}.png")),
            exclude_containing: exclude.iter().map(|s| s.to_string()).collect(),
            max_count: Some(6),
            order: None,
        };

        Self {
            ttl_days: default_ttl_days(),
            guard: GuardPolicy::default(),
            rename_policy: RenamePolicy::default(),
            paths: PathsCfg::default(),
            publish: PublishCfg {
                epg_url: Some(
                    "https://raw.githubusercontent.com/fanmingming/live/main/e.xml".into(),
                ),
                group_title: "精选频道".into(),
                ..PublishCfg::default()
            },
            profiles: vec![
                profile("翡翠台", "翡翠台", "翡翠台", &[]),
                profile("无线新闻", "无线新闻", "无线新闻台", &[]),
                profile("TVB PLUS", "TVBPlus", "TVBPlus", &[]),
                profile("VIU", "VIUTV", "viutv", &["6", "SIX"]),
                profile("广东体育", "广东体育", "广东体育", &[]),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_defaults_fill_gaps() {
        let cfg = CatalogConfig::parse(
            r#"
[[profiles]]
search_key = "VIU"
display_name = "VIUTV"
exclude_containing = ["6", "SIX"]
"#,
            "toml",
        )
        .unwrap();
        assert_eq!(cfg.ttl_days, 30);
        assert_eq!(cfg.guard, GuardPolicy::default());
        assert_eq!(cfg.rename_policy, RenamePolicy::PlaceholderOnly);
        assert_eq!(cfg.paths.catalog, PathBuf::from("data.csv"));
        let profiles = cfg.channel_profiles();
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].max_count, None);
        assert!(profiles[0].exclude.is_some());
    }

    #[test]
    fn json_is_accepted_without_hint() {
        let cfg = CatalogConfig::parse(
            r#"{
                "ttl_days": 7,
                "rename_policy": "on_newer_date",
                "profiles": [{"search_key": "Jade"}]
            }"#,
            "",
        )
        .unwrap();
        assert_eq!(cfg.ttl_days, 7);
        assert_eq!(cfg.rename_policy, RenamePolicy::OnNewerDate);
        assert_eq!(cfg.channel_profiles()[0].display_name, "Jade");
    }

    #[test]
    fn order_field_reorders_stably() {
        let cfg = CatalogConfig::parse(
            r#"
publish = { default_max_count = 2 }
[[profiles]]
search_key = "A"
order = 5
[[profiles]]
search_key = "B"
[[profiles]]
search_key = "C"
order = 1
max_count = 9
"#,
            "toml",
        )
        .unwrap();
        let keys: Vec<_> = cfg
            .channel_profiles()
            .into_iter()
            .map(|p| (p.search_key, p.max_count))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("B".to_string(), Some(2)),
                ("C".to_string(), Some(9)),
                ("A".to_string(), Some(2)),
            ]
        );
    }

    #[test]
    fn bad_ratio_is_rejected() {
        let cfg = CatalogConfig::parse("guard = { min_ratio = 1.5 }", "toml").unwrap();
        assert!(matches!(cfg.validate(), Err(CatalogError::Config(_))));
    }

    #[test]
    fn seed_keeps_published_order() {
        let names: Vec<_> = CatalogConfig::default_seed()
            .channel_profiles()
            .into_iter()
            .map(|p| p.display_name)
            .collect();
        assert_eq!(names, ["翡翠台", "无线新闻", "TVBPlus", "VIUTV", "广东体育"]);
    }
}
