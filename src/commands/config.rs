use gitpass::config::ConfigStore;
use gitpass::error::{GitPassError, Result};

/// Show or change configuration values.
pub fn config(key: Option<&str>, set: Option<&str>) -> Result<()> {
    let mut store = ConfigStore::open()?;

    match (key, set) {
        (None, None) => {
            let rendered = serde_json::to_string_pretty(store.configuration())
                .map_err(|e| GitPassError::Config(e.to_string()))?;
            println!("{}", rendered);
        }
        (None, Some(_)) => {
            return Err(GitPassError::Config(
                "a --key must be provided when setting a configuration value".to_string(),
            ));
        }
        (Some(key), None) => {
            println!("{} = {}", key, store.get(key)?);
        }
        (Some(key), Some(value)) => {
            store.set(key, value)?;
            println!("{} = {}", key, store.get(key)?);
        }
    }

    Ok(())
}
