use std::{fs::File, path::Path};

use anyhow::{Context, Result};

use crate::StickerConfig;

/// Reads a RON sticker setup; missing fields take their defaults
pub fn load(path: impl AsRef<Path>) -> Result<StickerConfig> {
    let path = path.as_ref();
    let f = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let config = ron::de::from_reader(f)
        .with_context(|| format!("Failed to parse config {}", path.display()))?;
    tracing::info!("Loaded config from {}", path.display());
    Ok(config)
}

pub fn save(path: impl AsRef<Path>, config: &StickerConfig) -> Result<()> {
    let path = path.as_ref();
    let f = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    ron::ser::to_writer_pretty(f, config, Default::default())
        .with_context(|| format!("Failed to write config {}", path.display()))?;
    tracing::info!("Saved config to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("peel_sticker_{}_{}", std::process::id(), name))
    }

    #[test]
    fn partial_file_takes_defaults() {
        let path = temp_path("partial.ron");
        std::fs::write(&path, "(lift_scale: 1.25)").unwrap();
        let config = load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.lift_scale, 1.25);
        assert_eq!(config.sticker, StickerConfig::default().sticker);
        assert!(config.artwork.is_none());
    }

    #[test]
    fn saved_file_loads_back() {
        let path = temp_path("saved.ron");
        let mut config = StickerConfig::default();
        config.sticker.rotation = 30.;
        config.highlight.width = 12.;
        save(&path, &config).unwrap();
        let loaded = load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn garbage_is_an_error() {
        let path = temp_path("garbage.ron");
        std::fs::write(&path, "not ron at all {").unwrap();
        let err = load(&path).unwrap_err();
        std::fs::remove_file(&path).unwrap();

        assert!(format!("{:#}", err).contains("Failed to parse config"));
    }
}
