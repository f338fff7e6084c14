use crate::commands::{CmdMessage, CmdResult, ShelfPaths};
use crate::config::{ConfigKey, ShelfConfig};
use crate::error::Result;

#[derive(Debug, Clone)]
pub enum ConfigAction {
    ShowAll,
    Show(ConfigKey),
    Set(ConfigKey, String),
}

/// Key/value pairs to display; unset keys carry `None`.
pub type ConfigValues = Vec<(ConfigKey, Option<String>)>;

pub fn run(paths: &ShelfPaths, action: ConfigAction) -> Result<CmdResult<ConfigValues>> {
    let mut config = ShelfConfig::load(&paths.data)?;
    match action {
        ConfigAction::ShowAll => {
            let values = ConfigKey::ALL
                .iter()
                .map(|key| (*key, config.get(*key)))
                .collect();
            Ok(CmdResult::new(values))
        }
        ConfigAction::Show(key) => Ok(CmdResult::new(vec![(key, config.get(key))])),
        ConfigAction::Set(key, value) => {
            config.set(key, &value)?;
            config.save(&paths.data)?;
            let shown = config.get(key);
            let message = match &shown {
                Some(v) => CmdMessage::success(format!("{} set to {}", key.name(), v)),
                None => CmdMessage::success(format!("{} unset", key.name())),
            };
            Ok(CmdResult::new(vec![(key, shown)]).with_message(message))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn paths() -> (TempDir, ShelfPaths) {
        let dir = TempDir::new().unwrap();
        let paths = ShelfPaths {
            data: dir.path().to_path_buf(),
        };
        (dir, paths)
    }

    #[test]
    fn show_all_lists_every_key() {
        let (_dir, paths) = paths();
        let result = run(&paths, ConfigAction::ShowAll).unwrap();
        assert_eq!(result.value.len(), ConfigKey::ALL.len());
        assert!(result.value.iter().all(|(_, v)| v.is_none()));
    }

    #[test]
    fn set_persists_and_reports() {
        let (_dir, paths) = paths();
        let result = run(
            &paths,
            ConfigAction::Set(ConfigKey::LineWidth, "90".into()),
        )
        .unwrap();
        assert_eq!(result.messages[0].content, "line-width set to 90");

        let shown = run(&paths, ConfigAction::Show(ConfigKey::LineWidth)).unwrap();
        assert_eq!(shown.value[0].1.as_deref(), Some("90"));
        assert_eq!(paths.config().unwrap().line_width, Some(90));
    }

    #[test]
    fn invalid_value_is_an_error_and_not_saved() {
        let (_dir, paths) = paths();
        assert!(run(
            &paths,
            ConfigAction::Set(ConfigKey::LineWidth, "narrow".into())
        )
        .is_err());
        assert_eq!(paths.config().unwrap().line_width, None);
    }

    #[test]
    fn media_dir_follows_config() {
        let (dir, paths) = paths();
        assert_eq!(paths.media_dir().unwrap(), dir.path().join("files"));
        run(
            &paths,
            ConfigAction::Set(ConfigKey::MediaDir, "blobs".into()),
        )
        .unwrap();
        assert_eq!(paths.media_dir().unwrap(), dir.path().join("blobs"));
    }
}
