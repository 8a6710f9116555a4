//! Console settings.
//!
//! Values start from [`Settings::default`], are overlaid by `admin-console.toml` when that
//! file exists, and finally by `ADMIN__*` environment variables:
//!
//! | key             | env                     | default                 |
//! |-----------------|-------------------------|-------------------------|
//! | `backend_url`   | `ADMIN__BACKEND_URL`    | `http://localhost:4000` |
//! | `token`         | `ADMIN__TOKEN`          | empty                   |
//! | `currency`      | `ADMIN__CURRENCY`       | `$`                     |
//! | `csv_delimiter` | `ADMIN__CSV_DELIMITER`  | `,`                     |
//! | `store_buffer`  | `ADMIN__STORE_BUFFER`   | `32`                    |
//! | `output_dir`    | `ADMIN__OUTPUT_DIR`     | `.`                     |

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_FILE: &str = "admin-console.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub backend_url: String,
    pub token: String,
    /// Prefix for money values in reports.
    pub currency: String,
    /// Single ASCII byte between CSV cells.
    pub csv_delimiter: u8,
    /// Request channel capacity of each store.
    pub store_buffer: usize,
    /// Where exports are written.
    pub output_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:4000".into(),
            token: String::new(),
            currency: "$".into(),
            csv_delimiter: b',',
            store_buffer: 32,
            output_dir: PathBuf::from("."),
        }
    }
}

/// `admin-console.toml`; every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    backend_url: Option<String>,
    token: Option<String>,
    currency: Option<String>,
    csv_delimiter: Option<String>,
    store_buffer: Option<usize>,
    output_dir: Option<PathBuf>,
}

impl Settings {
    /// Loads from `admin-console.toml` in the working directory and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new(CONFIG_FILE), |key| std::env::var(key).ok())
    }

    /// Loads from `path` (skipped when missing) and the variables `env` returns.
    pub fn load_from(
        path: &Path,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let file = match std::fs::read_to_string(path) {
            Ok(raw) => toml::from_str::<FileSettings>(&raw).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => FileSettings::default(),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let mut settings = Settings::default();
        settings.apply_file(file)?;
        settings.apply_env(env)?;
        Ok(settings)
    }

    fn apply_file(&mut self, file: FileSettings) -> Result<(), ConfigError> {
        if let Some(v) = file.backend_url {
            self.backend_url = v;
        }
        if let Some(v) = file.token {
            self.token = v;
        }
        if let Some(v) = file.currency {
            self.currency = v;
        }
        if let Some(v) = file.csv_delimiter {
            self.csv_delimiter = parse_delimiter(&v)?;
        }
        if let Some(v) = file.store_buffer {
            self.store_buffer = check_buffer(v)?;
        }
        if let Some(v) = file.output_dir {
            self.output_dir = v;
        }
        Ok(())
    }

    fn apply_env(&mut self, env: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(v) = env("ADMIN__BACKEND_URL") {
            self.backend_url = v;
        }
        if let Some(v) = env("ADMIN__TOKEN") {
            self.token = v;
        }
        if let Some(v) = env("ADMIN__CURRENCY") {
            self.currency = v;
        }
        if let Some(v) = env("ADMIN__CSV_DELIMITER") {
            self.csv_delimiter = parse_delimiter(&v)?;
        }
        if let Some(v) = env("ADMIN__STORE_BUFFER") {
            let parsed = v.parse::<usize>().map_err(|e| ConfigError::Invalid {
                key: "store_buffer",
                reason: format!("{v:?}: {e}"),
            })?;
            self.store_buffer = check_buffer(parsed)?;
        }
        if let Some(v) = env("ADMIN__OUTPUT_DIR") {
            self.output_dir = PathBuf::from(v);
        }
        Ok(())
    }
}

fn parse_delimiter(raw: &str) -> Result<u8, ConfigError> {
    match raw.as_bytes() {
        [b] if b.is_ascii() && *b != b'\n' && *b != b'\r' => Ok(*b),
        _ => Err(ConfigError::Invalid {
            key: "csv_delimiter",
            reason: format!("expected one ASCII character other than a line break, got {raw:?}"),
        }),
    }
}

fn check_buffer(size: usize) -> Result<usize, ConfigError> {
    if size == 0 {
        return Err(ConfigError::Invalid {
            key: "store_buffer",
            reason: "must be at least 1".into(),
        });
    }
    Ok(size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir()
            .join(format!("admin-console-{}-{name}", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn defaults_when_nothing_is_configured() {
        let settings =
            Settings::load_from(Path::new("/nonexistent/admin-console.toml"), no_env).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn file_then_env_overrides() {
        let path = temp_file(
            "overrides.toml",
            "backend_url = \"https://api.example.com\"\ncurrency = \"€\"\ncsv_delimiter = \";\"\n",
        );
        let env: HashMap<&str, &str> =
            HashMap::from([("ADMIN__CURRENCY", "£"), ("ADMIN__STORE_BUFFER", "8")]);

        let settings =
            Settings::load_from(&path, |key| env.get(key).map(|v| v.to_string())).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(settings.backend_url, "https://api.example.com");
        assert_eq!(settings.currency, "£");
        assert_eq!(settings.csv_delimiter, b';');
        assert_eq!(settings.store_buffer, 8);
    }

    #[test]
    fn rejects_bad_values() {
        let path = temp_file("bad.toml", "csv_delimiter = \"||\"\n");
        let err = Settings::load_from(&path, no_env).unwrap_err();
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(err, ConfigError::Invalid { key: "csv_delimiter", .. }));

        let err = Settings::load_from(Path::new("/nonexistent"), |key| {
            (key == "ADMIN__STORE_BUFFER").then(|| "0".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "store_buffer", .. }));

        let err = Settings::load_from(Path::new("/nonexistent"), |key| {
            (key == "ADMIN__CSV_DELIMITER").then(|| "§".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "csv_delimiter", .. }));
    }

    #[test]
    fn unknown_keys_are_an_error() {
        let path = temp_file("unknown.toml", "backend = \"x\"\n");
        let err = Settings::load_from(&path, no_env).unwrap_err();
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
