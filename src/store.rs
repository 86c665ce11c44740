use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::parser::markup::BR;
use crate::parser::HeroTips;
use crate::profile::Lang;

const TIPS_FIELD: &str = "tips";

const HTML_HEAD: &str = r#"<!doctype html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, user-scalable=no, initial-scale=1.0, maximum-scale=1.0, minimum-scale=1.0">
<meta http-equiv="X-UA-Compatible" content="ie=edge">
<title>GamePedia</title>
</head>
<body>"#;
const HTML_TAIL: &str = "\n</body>\n</html>";

pub fn json_path(data_dir: &Path, lang: Lang) -> PathBuf {
    data_dir.join(format!("heroes-{}.json", lang.code()))
}

pub fn html_path(data_dir: &Path, lang: Lang) -> PathBuf {
    data_dir.join(format!("heroes-{}.html", lang.code()))
}

/// Per-hero JSON records keyed by alias; only the `tips` field is touched.
pub struct HeroStore {
    path: PathBuf,
    heroes: Map<String, Value>,
}

impl HeroStore {
    pub fn open(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read hero store {}", path.display()))?;
        let value: Value = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid JSON in {}", path.display()))?;
        let Value::Object(heroes) = value else {
            anyhow::bail!("{} must contain a JSON object keyed by hero", path.display());
        };
        Ok(Self {
            path: path.to_path_buf(),
            heroes,
        })
    }

    /// Set `tips` on an existing hero. Unknown heroes are left out of the store.
    pub fn merge_tips(&mut self, alias: &str, tips: &str) -> bool {
        match self.heroes.get_mut(alias) {
            Some(Value::Object(hero)) => {
                hero.insert(TIPS_FIELD.to_string(), Value::String(tips.to_string()));
                true
            }
            Some(_) => {
                warn!("Hero {} in {} is not an object", alias, self.path.display());
                false
            }
            None => {
                warn!("Cannot find hero {} in {}", alias, self.path.display());
                false
            }
        }
    }

    pub fn save(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.heroes)?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write hero store {}", self.path.display()))?;
        info!("Saved {} heroes to {}", self.heroes.len(), self.path.display());
        Ok(())
    }
}

/// Wrap every hero fragment into one standalone HTML page.
pub fn render_html(heroes: &[HeroTips]) -> String {
    let mut body = String::new();
    for hero in heroes {
        body.push_str(&hero.tips);
        body.push_str(BR);
        body.push_str(BR);
    }
    format!("{HTML_HEAD}{body}{HTML_TAIL}")
}

pub fn write_html(path: &Path, heroes: &[HeroTips]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, render_html(heroes))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Wrote {} hero guides to {}", heroes.len(), path.display());
    Ok(())
}
