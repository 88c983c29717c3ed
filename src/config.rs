use anyhow::{Result, anyhow};
use directories::ProjectDirs;
use log::info;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Meta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Distance change that commits a two-pointer session to pinch.
    pub pinch_distance_px: f64,
    /// Angle change that commits a two-pointer session to twist.
    pub twist_angle_deg: f64,
    pub vertical_pan_divisor: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            pinch_distance_px: 32.0,
            twist_angle_deg: 8.0,
            vertical_pan_divisor: 100.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub initial: f64,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Percent.
    pub zoom: Range,
    /// Percent.
    pub brightness: Range,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            zoom: Range {
                initial: 100.0,
                min: 100.0,
                max: 200.0,
            },
            brightness: Range {
                initial: 100.0,
                min: 50.0,
                max: 150.0,
            },
        }
    }
}

/// Content and viewport size in pixels; fixes the pan bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Surface {
    pub content_width: f64,
    pub content_height: f64,
    pub viewport_width: f64,
    pub viewport_height: f64,
}

impl Default for Surface {
    fn default() -> Self {
        Self {
            content_width: 1920.0,
            content_height: 1080.0,
            viewport_width: 960.0,
            viewport_height: 640.0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub meta: Meta,
    pub thresholds: Thresholds,
    pub limits: Limits,
    pub surface: Surface,
}

impl Profile {
    pub fn from_toml(txt: &str) -> Result<Self> {
        let profile: Profile = toml::from_str(txt)?;
        validate_profile(&profile)?;
        Ok(profile)
    }

    pub fn load_file(path: &Path) -> Result<Self> {
        let txt = fs::read_to_string(path)
            .map_err(|e| anyhow!("failed to read {}: {e}", path.display()))?;
        Self::from_toml(&txt).map_err(|e| anyhow!("failed to parse {}: {e}", path.display()))
    }

    pub fn display_name(&self) -> &str {
        self.meta.name.as_deref().unwrap_or("unnamed")
    }
}

fn config_dir() -> Result<PathBuf> {
    ProjectDirs::from("", "", "viewgest")
        .map(|d| d.config_dir().to_path_buf())
        .ok_or_else(|| anyhow!("no home directory to place profiles in"))
}

fn default_profile_text() -> &'static str {
    include_str!("../profiles/default.toml")
}

#[derive(Debug, Clone)]
pub struct ProfileStore {
    pub profiles_dir: PathBuf,
}

impl ProfileStore {
    pub fn open_default() -> Result<Self> {
        Self::open(config_dir()?.join("profiles"))
    }

    /// Creates `dir` and installs `default.toml` into it when missing.
    pub fn open(dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&dir)?;
        let def_path = dir.join("default.toml");
        if !def_path.exists() {
            fs::write(&def_path, default_profile_text())?;
            info!("installed default profile at {}", def_path.display());
        }
        Ok(Self { profiles_dir: dir })
    }

    pub fn load(&self, name: &str) -> Result<Profile> {
        let path = self.profiles_dir.join(format!("{name}.toml"));
        if !path.exists() {
            return Err(anyhow!("profile not found: {}", path.display()));
        }
        Profile::load_file(&path)
    }

    pub fn list_profiles(&self) -> Vec<String> {
        let mut v = Vec::new();
        if let Ok(rd) = fs::read_dir(&self.profiles_dir) {
            for e in rd.flatten() {
                let path = e.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                        v.push(stem.to_string());
                    }
                }
            }
        }
        v.sort();
        v
    }
}

fn validate_range(what: &str, r: &Range) -> Result<()> {
    if !(r.min.is_finite() && r.max.is_finite() && r.initial.is_finite()) {
        return Err(anyhow!("limits.{what} must be finite"));
    }
    if r.min > r.max {
        return Err(anyhow!("limits.{what}: min {} exceeds max {}", r.min, r.max));
    }
    if !(r.min..=r.max).contains(&r.initial) {
        return Err(anyhow!(
            "limits.{what}: initial {} outside [{}, {}]",
            r.initial,
            r.min,
            r.max
        ));
    }
    Ok(())
}

fn validate_profile(p: &Profile) -> Result<()> {
    let th = &p.thresholds;
    for (key, v) in [
        ("pinch_distance_px", th.pinch_distance_px),
        ("twist_angle_deg", th.twist_angle_deg),
        ("vertical_pan_divisor", th.vertical_pan_divisor),
    ] {
        if !(v.is_finite() && v > 0.0) {
            return Err(anyhow!("thresholds.{key} must be positive, got {v}"));
        }
    }

    validate_range("zoom", &p.limits.zoom)?;
    validate_range("brightness", &p.limits.brightness)?;

    let s = &p.surface;
    for (key, v) in [
        ("content_width", s.content_width),
        ("content_height", s.content_height),
        ("viewport_width", s.viewport_width),
        ("viewport_height", s.viewport_height),
    ] {
        if !(v.is_finite() && v > 0.0) {
            return Err(anyhow!("surface.{key} must be positive, got {v}"));
        }
    }
    Ok(())
}
