//! Character data lookup.

use hanzi_quiz::{CharacterDataSource, CharacterJson, QuizError, QuizResult};
use std::path::PathBuf;

/// Characters bundled with the binary. Medians are simplified straight-line
/// traces, enough to practice stroke order without a full database.
const BUILTIN: [(&str, &str); 6] = [
    ("一", include_str!("../data/yi.json")),
    ("二", include_str!("../data/er.json")),
    ("三", include_str!("../data/san.json")),
    ("十", include_str!("../data/shi.json")),
    ("人", include_str!("../data/ren.json")),
    ("口", include_str!("../data/kou.json")),
];

pub fn builtin(symbol: &str) -> Option<&'static str> {
    BUILTIN
        .iter()
        .find(|(s, _)| *s == symbol)
        .map(|(_, json)| *json)
}

/// Reads `<dir>/<symbol>.json`, falling back to the bundled set.
#[derive(Debug, Clone, Default)]
pub struct DirectorySource {
    dir: Option<PathBuf>,
}

impl DirectorySource {
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self { dir }
    }
}

impl CharacterDataSource for DirectorySource {
    fn load(&self, symbol: &str) -> QuizResult<CharacterJson> {
        if let Some(dir) = &self.dir {
            let path = dir.join(format!("{symbol}.json"));
            match std::fs::read_to_string(&path) {
                Ok(json) => {
                    tracing::debug!(path = %path.display(), "loading character file");
                    return CharacterJson::from_json(&json);
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(QuizError::LoadFailed(format!("{}: {e}", path.display()))),
            }
        }
        builtin(symbol)
            .ok_or_else(|| QuizError::LoadFailed(format!("no stroke data for {symbol}")))
            .and_then(CharacterJson::from_json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hanzi_quiz::Character;
    use hanzi_testing::Fixtures;

    #[test]
    fn test_builtins_parse() {
        for (symbol, json) in BUILTIN {
            let character = Character::from_json(symbol, json).unwrap();
            assert!(character.stroke_count() > 0, "{symbol}");
        }
    }

    #[test]
    fn test_directory_overrides_builtin() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("十.json"), Fixtures::THREE).unwrap();
        let source = DirectorySource::new(Some(dir.path().to_path_buf()));
        let raw = source.load("十").unwrap();
        assert_eq!(raw.medians.unwrap().len(), 3);
        // Not in the directory: bundled data.
        assert_eq!(source.load("二").unwrap().medians.unwrap().len(), 2);
    }

    #[test]
    fn test_unknown_symbol() {
        let source = DirectorySource::default();
        assert!(matches!(source.load("龍"), Err(QuizError::LoadFailed(_))));
    }

    #[test]
    fn test_invalid_file_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("一.json"), "{ not json").unwrap();
        let source = DirectorySource::new(Some(dir.path().to_path_buf()));
        assert!(matches!(
            source.load("一"),
            Err(QuizError::MalformedCharacterData(_))
        ));
    }
}
