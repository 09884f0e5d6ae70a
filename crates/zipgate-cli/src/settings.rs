use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use serde::Deserialize;
use zipgate::{AllowList, Cleanup, DigestStrategy, ExtractConfig};

use crate::cli::app::GlobalOpts;

/// Contents of the `--config` file. Every section is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub base: Option<PathBuf>,
    pub destination: Option<PathBuf>,
    pub staging: Option<PathBuf>,
    pub extract: ExtractConfig,
    pub cleanup: Cleanup,
    pub allow: AllowList,
}

impl FileConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        toml::from_str(&text)
            .with_context(|| format!("failed to parse config file '{}'", path.display()))
    }
}

/// File config with command line overrides applied.
#[derive(Debug)]
pub struct Settings {
    pub base: PathBuf,
    pub destination: Option<PathBuf>,
    pub staging: Option<PathBuf>,
    pub extract: ExtractConfig,
    pub cleanup: Cleanup,
    pub allow: AllowList,
}

impl Settings {
    pub fn resolve(opts: &GlobalOpts) -> anyhow::Result<Self> {
        let file = match &opts.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Self::merge(file, opts)
    }

    fn merge(file: FileConfig, opts: &GlobalOpts) -> anyhow::Result<Self> {
        let mut extract = file.extract;
        if opts.no_greedy {
            extract = extract.greedy(false);
        }
        if opts.flatten {
            extract = extract.same_structure(false);
        }
        if opts.rename {
            extract = extract.same_name(false);
        }
        if let Some(separator) = &opts.separator {
            extract = extract.separator(separator);
        }
        if let Some(suffix) = &opts.suffix {
            extract = extract.suffix(suffix);
        }
        if opts.sha256 {
            extract = extract.digest(DigestStrategy::Sha256);
        }

        let mut cleanup = file.cleanup;
        if opts.remove_zip {
            cleanup = cleanup.remove_zip_file(true);
        }
        if opts.keep_staging {
            cleanup = cleanup.remove_tmp_dir(false);
        }

        let allow = opts
            .allow
            .iter()
            .try_fold(file.allow, |list, value| parse_allow(list, value))?;

        Ok(Self {
            base: opts.base.clone().or(file.base).unwrap_or_else(|| PathBuf::from(".")),
            destination: opts.dest.clone().or(file.destination),
            staging: opts.staging.clone().or(file.staging),
            extract,
            cleanup,
            allow,
        })
    }
}

/// `pdf` or `pdf=application/pdf`.
fn parse_allow(list: AllowList, value: &str) -> anyhow::Result<AllowList> {
    match value.split_once('=') {
        Some((ext, mime)) => {
            let (ext, mime) = (ext.trim(), mime.trim());
            if ext.is_empty() || mime.is_empty() {
                bail!("invalid --allow value '{value}', expected EXT or EXT=MIME");
            }
            Ok(list.allow(ext, mime))
        }
        None => list
            .allow_guessed(value.trim())
            .with_context(|| format!("invalid --allow value '{value}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_file() {
        let file: FileConfig = toml::from_str(
            r#"
            destination = "from-file"

            [extract]
            same_structure = true
            separator = "-"

            [cleanup]
            remove_tmp_dir = true

            [allow]
            pdf = "application/pdf"
            "#,
        )
        .unwrap();
        let opts = GlobalOpts {
            dest: Some("from-flag".into()),
            flatten: true,
            suffix: Some("v1".into()),
            keep_staging: true,
            allow: vec!["png".into(), "log=text/plain".into()],
            ..Default::default()
        };

        let settings = Settings::merge(file, &opts).unwrap();

        assert_eq!(settings.base, PathBuf::from("."));
        assert_eq!(settings.destination, Some(PathBuf::from("from-flag")));
        assert!(!settings.extract.same_structure);
        assert_eq!(settings.extract.explicit_suffix().as_deref(), Some("-v1"));
        assert!(!settings.cleanup.remove_tmp_dir);
        assert!(!settings.cleanup.remove_zip_file);
        assert_eq!(settings.allow.mime_for("pdf"), Some("application/pdf"));
        assert_eq!(settings.allow.mime_for("png"), Some("image/png"));
        assert_eq!(settings.allow.mime_for("log"), Some("text/plain"));
    }

    #[test]
    fn defaults_without_file_or_flags() {
        let settings = Settings::merge(FileConfig::default(), &GlobalOpts::default()).unwrap();

        assert!(settings.extract.greedy);
        assert!(settings.cleanup.remove_tmp_dir);
        assert!(settings.allow.is_empty());
        assert!(settings.destination.is_none());
    }

    #[test]
    fn malformed_allow_is_rejected() {
        for value in ["=image/png", "png=", "no-such-extension-here"] {
            assert!(parse_allow(AllowList::new(), value).is_err(), "{value}");
        }
    }

    #[test]
    fn load_reads_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zipgate.toml");
        std::fs::write(&path, "staging = \"tmp\"\n[extract]\ngreedy = false\n").unwrap();

        let file = FileConfig::load(&path).unwrap();
        assert_eq!(file.staging, Some(PathBuf::from("tmp")));
        assert!(!file.extract.greedy);

        assert!(FileConfig::load(&dir.path().join("missing.toml")).is_err());
    }
}
