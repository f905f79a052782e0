//! Inspect and edit persisted focus settings.

use medfocus_common::config::{config_file_path, AppConfig, FocusSettings};

pub fn show(config: &AppConfig) -> anyhow::Result<()> {
    println!("Focus settings ({})", config_file_path().display());
    let values = serde_json::to_value(&config.focus)?;
    for key in FocusSettings::KEYS {
        let value = match values.get(*key) {
            Some(serde_json::Value::Null) | None => "none".to_string(),
            Some(v) => v.to_string(),
        };
        println!("  {key:<26} {value}");
    }
    Ok(())
}

pub fn set(mut config: AppConfig, key: &str, value: &str) -> anyhow::Result<()> {
    if let Err(e) = config.focus.apply_edit(key, value) {
        anyhow::bail!("{} (previous value kept)", e.user_message());
    }
    config.save()?;
    println!("Set {key} = {value}");
    Ok(())
}

pub fn reset(mut config: AppConfig) -> anyhow::Result<()> {
    config.focus = FocusSettings::default();
    config.save()?;
    println!("Focus settings restored to defaults");
    Ok(())
}
