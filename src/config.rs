use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    pub store: StoreConfig,
    #[serde(default)]
    pub provisioning: ProvisioningConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StoreConfig {
    #[serde(rename = "type")]
    pub store_type: String,
}

/// Options for the account created when a student record is first saved.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvisioningConfig {
    #[serde(default = "default_send_welcome_email")]
    pub send_welcome_email: bool,
    #[serde(default = "default_roles")]
    pub roles: Vec<String>,
    /// Base URL used when building password-reset links.
    #[serde(default = "default_portal_url")]
    pub portal_url: String,
}

fn default_send_welcome_email() -> bool {
    true
}

fn default_roles() -> Vec<String> {
    vec!["Student".to_string(), "LMS User".to_string()]
}

fn default_portal_url() -> String {
    "http://localhost:8000".to_string()
}

impl Default for ProvisioningConfig {
    fn default() -> Self {
        Self {
            send_welcome_email: default_send_welcome_email(),
            roles: default_roles(),
            portal_url: default_portal_url(),
        }
    }
}

impl AppConfig {
    pub fn load_from_file<P: AsRef<Path>>(config_path: P) -> Result<Self, String> {
        let path = config_path.as_ref();

        if !path.exists() {
            return Err(format!("Configuration file not found: {}", path.display()));
        }

        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file {}: {}", path.display(), e))?;

        let config: AppConfig = serde_yaml::from_str(&content)
            .map_err(|e| format!("Failed to parse config file {}: {}", path.display(), e))?;

        Ok(config)
    }

    pub fn default_config() -> Self {
        AppConfig {
            store: StoreConfig {
                store_type: "memory".to_string(),
            },
            provisioning: ProvisioningConfig::default(),
        }
    }
}
