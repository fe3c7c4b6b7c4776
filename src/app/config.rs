use crate::app::cli::Cli;
use crate::app::error::ExcerptError;
use crate::app::models::RuntimeConfig;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_SUFFIXES: &str = ".go";
pub const DEFAULT_OUTPUT: &str = "程序鉴别材料.docx";

#[derive(Deserialize, Debug)]
struct PresetsFile {
    #[serde(flatten)]
    presets: HashMap<String, PresetConfig>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct PresetConfig {
    root: Option<PathBuf>,
    suffixes: Option<Vec<String>>,
    name: Option<String>,
    output: Option<PathBuf>,
    exclude: Option<Vec<String>>,
}

fn presets_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home
        .join(".config")
        .join("code_material")
        .join("presets.toml"))
}

/// Loads presets from `path`. A missing file yields no presets.
pub fn load_presets(path: &Path) -> Result<HashMap<String, PresetConfig>> {
    if !path.exists() {
        return Ok(HashMap::new());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read presets at {}", path.display()))?;

    let parsed: PresetsFile = toml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    Ok(parsed.presets)
}

/// Splits a `;`-separated suffix list, dropping blank segments.
///
/// An empty suffix would match every file, so a list with nothing usable
/// left is rejected.
pub fn parse_suffixes(raw: &str) -> Result<Vec<String>, ExcerptError> {
    let suffixes: Vec<String> = raw
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();

    if suffixes.is_empty() {
        return Err(ExcerptError::InvalidSuffixes(raw.to_string()));
    }
    Ok(suffixes)
}

fn merge_vecs(preset_vec: Option<Vec<String>>, cli_vec: Option<Vec<String>>) -> Vec<String> {
    let mut combined = preset_vec.unwrap_or_default();
    if let Some(mut cli_items) = cli_vec {
        combined.append(&mut cli_items);
    }
    let mut seen = HashSet::new();
    combined.retain(|item| seen.insert(item.clone()));
    combined
}

pub fn resolve_config(cli: Cli, project_name: Option<&str>) -> Result<RuntimeConfig> {
    let presets = load_presets(&presets_path()?)?;
    resolve_with_presets(cli, project_name, &presets)
}

/// Preset choice: `--preset` flag, then the working directory's name, then none.
pub fn resolve_with_presets(
    cli: Cli,
    project_name: Option<&str>,
    presets: &HashMap<String, PresetConfig>,
) -> Result<RuntimeConfig> {
    if let Some(requested) = cli.preset.as_deref() {
        if !presets.contains_key(requested) {
            log::warn!("Preset '{}' not found, using command-line values only", requested);
        }
    }

    let preset_key = cli.preset.as_deref().or(project_name);
    let preset = preset_key
        .and_then(|k| {
            let found = presets.get(k);
            if found.is_some() {
                log::debug!("Using preset '{}'", k);
            }
            found
        })
        .cloned()
        .unwrap_or_default();

    let root = cli.root.or(preset.root).ok_or(ExcerptError::ConfigMissing)?;

    let suffixes = match (cli.suffixes, preset.suffixes) {
        (Some(raw), _) => parse_suffixes(&raw)?,
        (None, Some(list)) => parse_suffixes(&list.join(";"))?,
        (None, None) => parse_suffixes(DEFAULT_SUFFIXES)?,
    };

    Ok(RuntimeConfig {
        root,
        suffixes,
        name: cli.name.or(preset.name).unwrap_or_default(),
        output: cli
            .output
            .or(preset.output)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
        exclude: merge_vecs(preset.exclude, cli.exclude),
        sort: cli.sort,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["code_material"];
        argv.extend_from_slice(args);
        Cli::parse_from(argv)
    }

    #[test]
    fn parse_suffixes_splits_on_semicolons() {
        assert_eq!(parse_suffixes(".go;.vue").unwrap(), vec![".go", ".vue"]);
    }

    #[test]
    fn parse_suffixes_drops_blank_segments() {
        assert_eq!(parse_suffixes(".go; ;.rs;").unwrap(), vec![".go", ".rs"]);
    }

    #[test]
    fn parse_suffixes_rejects_empty_input() {
        assert!(matches!(
            parse_suffixes(""),
            Err(ExcerptError::InvalidSuffixes(_))
        ));
        assert!(parse_suffixes(";;").is_err());
    }

    #[test]
    fn defaults_apply_without_preset() {
        let config = resolve_with_presets(cli(&["-r", "src"]), None, &HashMap::new()).unwrap();
        assert_eq!(config.root, PathBuf::from("src"));
        assert_eq!(config.suffixes, vec![".go"]);
        assert_eq!(config.name, "");
        assert_eq!(config.output, PathBuf::from(DEFAULT_OUTPUT));
        assert!(config.exclude.is_empty());
        assert!(!config.sort);
    }

    #[test]
    fn missing_root_is_config_missing() {
        let err = resolve_with_presets(cli(&["-n", "x"]), None, &HashMap::new()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ExcerptError>(),
            Some(ExcerptError::ConfigMissing)
        ));
    }

    #[test]
    fn cli_values_override_preset() {
        let presets: HashMap<String, PresetConfig> = toml::from_str::<PresetsFile>(
            r#"
            [demo]
            root = "/srv/demo"
            suffixes = [".vue"]
            name = "Demo v1.0"
            exclude = ["vendor/**"]
            "#,
        )
        .unwrap()
        .presets;

        let config = resolve_with_presets(
            cli(&["--preset", "demo", "-f", ".go", "-e", "gen/**", "vendor/**"]),
            None,
            &presets,
        )
        .unwrap();

        assert_eq!(config.root, PathBuf::from("/srv/demo"));
        assert_eq!(config.suffixes, vec![".go"]);
        assert_eq!(config.name, "Demo v1.0");
        assert_eq!(config.exclude, vec!["vendor/**", "gen/**"]);
    }

    #[test]
    fn project_name_selects_preset() {
        let mut presets = HashMap::new();
        presets.insert(
            "myproj".to_string(),
            PresetConfig {
                root: Some(PathBuf::from("/work/myproj")),
                suffixes: Some(vec![".rs".to_string(), ".toml".to_string()]),
                ..PresetConfig::default()
            },
        );

        let config = resolve_with_presets(cli(&[]), Some("myproj"), &presets).unwrap();
        assert_eq!(config.root, PathBuf::from("/work/myproj"));
        assert_eq!(config.suffixes, vec![".rs", ".toml"]);
    }

    #[test]
    fn load_presets_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let presets = load_presets(&dir.path().join("presets.toml")).unwrap();
        assert!(presets.is_empty());
    }

    #[test]
    fn load_presets_rejects_malformed_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("presets.toml");
        fs::write(&path, "[demo\nroot = 1").unwrap();
        assert!(load_presets(&path).is_err());
    }
}
