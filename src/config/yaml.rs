//! 配置与端点清单的文件加载
//!
//! 配置文件使用 YAML；端点清单按扩展名识别，`.json` 走 JSON，其余按 YAML 解析。

use std::path::Path;

use super::types::RegistryConfig;
use crate::models::ManifestSet;

/// 配置加载错误
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// 解析 YAML 配置，缺省字段使用默认值
pub fn parse_config_yaml(content: &str) -> Result<RegistryConfig, ConfigError> {
    if content.trim().is_empty() {
        return Ok(RegistryConfig::default());
    }
    Ok(serde_yaml::from_str(content)?)
}

/// 从文件加载配置
pub fn load_config(path: &Path) -> Result<RegistryConfig, ConfigError> {
    let content = read_file(path)?;
    let config = parse_config_yaml(&content)?;
    tracing::debug!("[CONFIG] Loaded registry config from {:?}", path);
    Ok(config)
}

pub fn parse_manifest_yaml(content: &str) -> Result<ManifestSet, ConfigError> {
    Ok(serde_yaml::from_str(content)?)
}

pub fn parse_manifest_json(content: &str) -> Result<ManifestSet, ConfigError> {
    Ok(serde_json::from_str(content)?)
}

/// 从文件加载端点清单
pub fn load_manifest(path: &Path) -> Result<ManifestSet, ConfigError> {
    let content = read_file(path)?;
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let manifest = if is_json {
        parse_manifest_json(&content)?
    } else {
        parse_manifest_yaml(&content)?
    };
    tracing::debug!(
        "[CONFIG] Loaded {} endpoint(s) from {:?}",
        manifest.len(),
        path
    );
    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const MANIFEST_YAML: &str = r#"
/items:
  methods: GET, POST
  callback: list_items
  permission_callback: is_admin
  args:
    page:
      type: integer
      minimum: 1
      default: 1
/items/search:
  methods: GET
  callback: search_items
"#;

    #[test]
    fn test_parse_partial_config() {
        let config = parse_config_yaml("debug: true\n").unwrap();
        assert!(config.debug);
        assert_eq!(config.url_root, RegistryConfig::default().url_root);
        assert_eq!(parse_config_yaml("").unwrap(), RegistryConfig::default());
    }

    #[test]
    fn test_invalid_config_yaml() {
        let err = parse_config_yaml("debug: [not, a, bool]").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn test_parse_manifest_yaml_keeps_order() {
        let manifest = parse_manifest_yaml(MANIFEST_YAML).unwrap();
        assert_eq!(
            manifest.keys().collect::<Vec<_>>(),
            vec!["/items", "/items/search"]
        );
        let items = &manifest["/items"];
        assert_eq!(items.methods.as_deref(), Some("GET, POST"));
        assert_eq!(items.permission_callback.as_deref(), Some("is_admin"));
        assert_eq!(items.args.as_ref().unwrap()["page"].minimum, Some(1.0));
    }

    #[test]
    fn test_load_manifest_by_extension() {
        let mut json_file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            json_file,
            r#"{{"/ping": {{"methods": "GET", "callback": "ping"}}}}"#
        )
        .unwrap();
        let manifest = load_manifest(json_file.path()).unwrap();
        assert_eq!(manifest["/ping"].callback.as_deref(), Some("ping"));

        let mut yaml_file = NamedTempFile::new().unwrap();
        yaml_file.write_all(MANIFEST_YAML.as_bytes()).unwrap();
        assert_eq!(load_manifest(yaml_file.path()).unwrap().len(), 2);
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/nonexistent/registry.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
