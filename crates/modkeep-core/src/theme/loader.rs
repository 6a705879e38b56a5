use std::path::{Path, PathBuf};

use super::{DEFAULT_THEME_LOCATOR, ResourceLocator, ResourceSet, ResourceValue};
use crate::{color::parse_color, error::ThemeError};

const BUILTIN_RESOURCES: &[(&str, &str)] = &[(
    DEFAULT_THEME_LOCATOR,
    include_str!("../../themes/default.toml"),
)];

/// Loads resource sets by locator.
pub trait ResourceLoader {
    fn load(&self, locator: &ResourceLocator) -> Result<ResourceSet, ThemeError>;
}

/// Serves theme files compiled into the binary, optionally shadowed by
/// files found under a user theme directory.
#[derive(Debug, Clone, Default)]
pub struct BuiltinResourceLoader {
    override_root: Option<PathBuf>,
}

impl BuiltinResourceLoader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Files at `<root>/<locator>` take precedence over the built-in copies.
    #[must_use]
    pub fn with_override_root(root: impl Into<PathBuf>) -> Self {
        Self {
            override_root: Some(root.into()),
        }
    }

    fn override_path(&self, locator: &ResourceLocator) -> Option<PathBuf> {
        let root = self.override_root.as_deref()?;
        let path = root.join(Path::new(locator.as_str()));
        path.is_file().then_some(path)
    }
}

fn builtin_text(locator: &ResourceLocator) -> Option<&'static str> {
    BUILTIN_RESOURCES
        .iter()
        .find(|(path, _)| *path == locator.as_str())
        .map(|(_, text)| *text)
}

/// True for locators that could resolve outside the override root: parent
/// segments, rooted paths and drive or stream prefixes.
fn escapes_root(locator: &ResourceLocator) -> bool {
    let path = locator.as_str();
    path.starts_with('/')
        || Path::new(path).has_root()
        || path
            .split('/')
            .any(|segment| segment == ".." || segment.contains(':'))
}

fn read_override(locator: &ResourceLocator, path: &Path) -> Result<ResourceSet, ThemeError> {
    tracing::debug!(path = %path.display(), "loading theme resource from disk");
    let text = std::fs::read_to_string(path).map_err(|source| ThemeError::Io {
        locator: locator.clone(),
        source,
    })?;
    parse_resource_set(locator, &text)
}

impl ResourceLoader for BuiltinResourceLoader {
    fn load(&self, locator: &ResourceLocator) -> Result<ResourceSet, ThemeError> {
        if escapes_root(locator) {
            return Err(ThemeError::Malformed {
                locator: locator.clone(),
                reason: "locator escapes the resource root".to_string(),
            });
        }

        let builtin = builtin_text(locator);

        if let Some(path) = self.override_path(locator) {
            match read_override(locator, &path) {
                Ok(set) => return Ok(set),
                Err(e) if builtin.is_some() => {
                    tracing::warn!(error = %e, "theme file on disk is unusable, using built-in copy");
                }
                Err(e) => return Err(e),
            }
        }

        let text = builtin.ok_or_else(|| ThemeError::NotFound(locator.clone()))?;
        parse_resource_set(locator, text)
    }
}

/// Parses a flat TOML table of resource keys.
///
/// String values that parse as hex colors become [`ResourceValue::Color`];
/// other scalars are kept as text. Arrays and nested tables are rejected.
pub fn parse_resource_set(locator: &ResourceLocator, text: &str) -> Result<ResourceSet, ThemeError> {
    let malformed = |reason: String| ThemeError::Malformed {
        locator: locator.clone(),
        reason,
    };

    let table: toml::Table = toml::from_str(text).map_err(|e| malformed(e.to_string()))?;

    let mut set = ResourceSet::new(Some(locator.clone()));
    for (key, value) in table {
        let value = match value {
            toml::Value::String(s) => match parse_color(&s) {
                Some(color) => ResourceValue::Color(color),
                None => ResourceValue::Text(s),
            },
            toml::Value::Integer(i) => ResourceValue::Text(i.to_string()),
            toml::Value::Float(f) => ResourceValue::Text(f.to_string()),
            toml::Value::Boolean(b) => ResourceValue::Text(b.to_string()),
            toml::Value::Datetime(d) => ResourceValue::Text(d.to_string()),
            toml::Value::Array(_) | toml::Value::Table(_) => {
                return Err(malformed(format!("'{key}' must be a scalar value")));
            }
        };
        set.insert(key, value);
    }

    Ok(set)
}

#[cfg(test)]
mod tests {
    use std::{
        fs,
        time::{SystemTime, UNIX_EPOCH},
    };

    use tracing_test::traced_test;

    use super::*;
    use crate::color::Color;

    fn unique_temp_dir(prefix: &str) -> PathBuf {
        let ts = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("modkeep-tests-{prefix}-{ts}"))
    }

    #[test]
    fn builtin_default_theme_loads() {
        let set = BuiltinResourceLoader::new()
            .load(&ResourceLocator::default_theme())
            .unwrap();

        assert!(set.is_theme());
        assert!(set.get("AccentColor").and_then(ResourceValue::as_color).is_some());
        assert!(set.get("BackgroundColor").and_then(ResourceValue::as_color).is_some());
    }

    #[test]
    fn unknown_locator_is_not_found() {
        let err = BuiltinResourceLoader::new()
            .load(&ResourceLocator::new("themes/missing.toml"))
            .unwrap_err();
        assert!(matches!(err, ThemeError::NotFound(_)));
    }

    #[test]
    fn parent_segments_are_rejected() {
        let err = BuiltinResourceLoader::new()
            .load(&ResourceLocator::new("themes/../secrets.toml"))
            .unwrap_err();
        assert!(matches!(err, ThemeError::Malformed { .. }));
    }

    #[test]
    fn rooted_locators_are_rejected() {
        let loader = BuiltinResourceLoader::with_override_root(std::env::temp_dir());

        for locator in ["/etc/themes/default.toml", "C:/themes/default.toml", "themes/x:stream.toml"] {
            let err = loader.load(&ResourceLocator::new(locator)).unwrap_err();
            assert!(matches!(err, ThemeError::Malformed { .. }), "{locator}");
        }
    }

    #[test]
    fn scalars_become_colors_or_text() {
        let locator = ResourceLocator::new("themes/test.toml");
        let set = parse_resource_set(
            &locator,
            r##"
                AccentColor = "#FF8800"
                OverlayColor = "#80000000"
                FontFamily = "Segoe UI"
                CornerRadius = 4
            "##,
        )
        .unwrap();

        assert_eq!(set.get("AccentColor"), Some(&ResourceValue::Color(Color::rgb(0xFF, 0x88, 0))));
        assert_eq!(set.get("OverlayColor").and_then(ResourceValue::as_color).map(|c| c.a), Some(0x80));
        assert_eq!(set.get("FontFamily"), Some(&ResourceValue::Text("Segoe UI".into())));
        assert_eq!(set.get("CornerRadius"), Some(&ResourceValue::Text("4".into())));
        assert_eq!(set.origin(), Some(&locator));
    }

    #[test]
    fn nested_tables_are_malformed() {
        let err = parse_resource_set(
            &ResourceLocator::new("themes/test.toml"),
            "[palette]\nAccentColor = \"#FF8800\"\n",
        )
        .unwrap_err();
        assert!(matches!(err, ThemeError::Malformed { .. }));
    }

    #[test]
    fn disk_file_shadows_builtin() {
        let root = unique_temp_dir("override");
        fs::create_dir_all(root.join("themes")).unwrap();
        fs::write(root.join(DEFAULT_THEME_LOCATOR), "AccentColor = \"#010203\"\n").unwrap();

        let set = BuiltinResourceLoader::with_override_root(root.clone())
            .load(&ResourceLocator::default_theme())
            .unwrap();

        assert_eq!(set.len(), 1);
        assert_eq!(set.get("AccentColor").and_then(ResourceValue::as_color), Some(Color::rgb(1, 2, 3)));

        let _ = fs::remove_dir_all(root);
    }

    #[traced_test]
    #[test]
    fn broken_disk_copy_of_builtin_falls_back_to_embedded() {
        let root = unique_temp_dir("override-broken");
        fs::create_dir_all(root.join("themes")).unwrap();
        fs::write(root.join(DEFAULT_THEME_LOCATOR), "not toml [[[").unwrap();

        let set = BuiltinResourceLoader::with_override_root(root.clone())
            .load(&ResourceLocator::default_theme())
            .unwrap();

        assert!(set.get("BackgroundColor").and_then(ResourceValue::as_color).is_some());
        assert!(logs_contain("using built-in copy"));

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn broken_disk_file_without_builtin_is_an_error() {
        let root = unique_temp_dir("override-custom");
        fs::create_dir_all(root.join("themes")).unwrap();
        fs::write(root.join("themes").join("custom.toml"), "not toml [[[").unwrap();

        let err = BuiltinResourceLoader::with_override_root(root.clone())
            .load(&ResourceLocator::new("themes/custom.toml"))
            .unwrap_err();
        assert!(matches!(err, ThemeError::Malformed { .. }));

        let _ = fs::remove_dir_all(root);
    }
}
