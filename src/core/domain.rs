use serde::{Deserialize, Serialize};

// Configuration abstracts config options for the library engine. It is built
// once per process and handed to the context that wires the services.
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct Configuration {
    pub library_name: String,
    pub data_dir: String,
    pub default_loan_days: i64,
}

impl Configuration {
    pub fn new(library_name: &str) -> Self {
        Configuration {
            library_name: library_name.to_string(),
            data_dir: "data".to_string(),
            default_loan_days: 14,
        }
    }

    pub fn with_data_dir(library_name: &str, data_dir: &str) -> Self {
        Configuration {
            data_dir: data_dir.to_string(),
            ..Configuration::new(library_name)
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::core::domain::Configuration;

    #[tokio::test]
    async fn test_should_build_config() {
        let config = Configuration::new("test");
        assert_eq!("test", config.library_name.as_str());
        assert_eq!("data", config.data_dir.as_str());
        assert_eq!(14, config.default_loan_days);
    }

    #[tokio::test]
    async fn test_should_override_data_dir() {
        let config = Configuration::with_data_dir("test", "/tmp/lib");
        assert_eq!("/tmp/lib", config.data_dir.as_str());
        assert_eq!(14, config.default_loan_days);
    }
}
