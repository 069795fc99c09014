//! Deterministic character fixtures.
//!
//! Medians are straight lines with a handful of samples so that expected
//! matcher outcomes can be worked out by hand. Outline paths are
//! placeholders; nothing under test renders them.

/// Collection of deterministic character fixtures.
pub struct Fixtures;

impl Fixtures {
    /// 十: a horizontal stroke at y=390 then a vertical one at x=510.
    pub const CROSS: &'static str = r#"{
        "strokes": ["M 120 390 L 900 390", "M 510 800 L 510 -50"],
        "medians": [
            [[120, 390], [315, 390], [510, 390], [705, 390], [900, 390]],
            [[510, 800], [510, 600], [510, 390], [510, 170], [510, -50]]
        ]
    }"#;

    /// 二: a short upper horizontal and a long lower one.
    pub const TWO: &'static str = r#"{
        "strokes": ["M 250 600 L 750 600", "M 100 250 L 900 250"],
        "medians": [
            [[250, 600], [500, 600], [750, 600]],
            [[100, 250], [300, 250], [500, 250], [700, 250], [900, 250]]
        ]
    }"#;

    /// 三: three horizontals, top to bottom. The first is the radical.
    pub const THREE: &'static str = r#"{
        "strokes": ["M 250 700 L 750 700", "M 300 420 L 700 420", "M 100 120 L 900 120"],
        "medians": [
            [[250, 700], [500, 700], [750, 700]],
            [[300, 420], [500, 420], [700, 420]],
            [[100, 120], [300, 120], [500, 120], [700, 120], [900, 120]]
        ],
        "radStrokes": [0]
    }"#;

    /// Every fixture with the symbol it stands for.
    pub fn all() -> [(&'static str, &'static str); 3] {
        [("十", Self::CROSS), ("二", Self::TWO), ("三", Self::THREE)]
    }

    /// Look a fixture up by symbol.
    pub fn by_symbol(symbol: &str) -> Option<&'static str> {
        Self::all()
            .into_iter()
            .find(|(s, _)| *s == symbol)
            .map(|(_, json)| json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixtures_are_well_formed() {
        for (symbol, json) in Fixtures::all() {
            let value: serde_json::Value = serde_json::from_str(json).unwrap();
            let strokes = value["strokes"].as_array().unwrap();
            let medians = value["medians"].as_array().unwrap();
            assert_eq!(strokes.len(), medians.len(), "{symbol}");
            assert!(medians.iter().all(|m| m.as_array().is_some_and(|m| m.len() >= 2)));
        }
    }

    #[test]
    fn test_by_symbol() {
        assert_eq!(Fixtures::by_symbol("二"), Some(Fixtures::TWO));
        assert_eq!(Fixtures::by_symbol("龍"), None);
    }
}
