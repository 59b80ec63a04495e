//! Target selector keywords.

use crate::board::ObjectKind;
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Which object(s) an action applies to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TargetSelector {
    /// Topmost eligible object under the cursor
    ObjectAtCursor,
    /// Every selected object of an eligible kind
    AllSelected,
    /// Selected objects of one kind
    SelectedOfKind(ObjectKind),
    /// Topmost eligible object under the crosshair mark
    MarkedPoint,
    /// Everything in the paste buffer
    PasteBufferContents,
    /// Every object of an eligible kind on the board
    AllObjects,
    /// A keyword with no defined meaning
    Unknown(String),
}

/// Keyword table, built once. Keys are lowercase.
static KEYWORDS: LazyLock<HashMap<&'static str, TargetSelector>> = LazyLock::new(|| {
    use TargetSelector::*;
    HashMap::from([
        ("object", ObjectAtCursor),
        ("selected", AllSelected),
        ("selectedobjects", AllSelected),
        ("selectedlines", SelectedOfKind(ObjectKind::Line)),
        ("selectedarcs", SelectedOfKind(ObjectKind::Arc)),
        ("selectedvias", SelectedOfKind(ObjectKind::Via)),
        ("selectedpads", SelectedOfKind(ObjectKind::Pad)),
        ("selectedpins", SelectedOfKind(ObjectKind::Pad)),
        ("selectedpolygons", SelectedOfKind(ObjectKind::Polygon)),
        ("selectedtexts", SelectedOfKind(ObjectKind::Text)),
        ("selectednames", SelectedOfKind(ObjectKind::Text)),
        ("selectedelements", SelectedOfKind(ObjectKind::Element)),
        ("mark", MarkedPoint),
        ("buffer", PasteBufferContents),
        ("pastebuffer", PasteBufferContents),
        ("all", AllObjects),
    ])
});

impl TargetSelector {
    /// Maps a keyword to a selector. Matching is case-insensitive; anything
    /// not in the table becomes [`TargetSelector::Unknown`].
    pub fn parse(keyword: &str) -> TargetSelector {
        let key = keyword.trim().to_ascii_lowercase();
        KEYWORDS
            .get(key.as_str())
            .cloned()
            .unwrap_or_else(|| TargetSelector::Unknown(keyword.trim().to_string()))
    }

    /// Canonical spelling of the selector.
    pub fn keyword(&self) -> &str {
        match self {
            TargetSelector::ObjectAtCursor => "Object",
            TargetSelector::AllSelected => "Selected",
            TargetSelector::SelectedOfKind(kind) => match kind {
                ObjectKind::Line => "SelectedLines",
                ObjectKind::Arc => "SelectedArcs",
                ObjectKind::Via => "SelectedVias",
                ObjectKind::Pad => "SelectedPads",
                ObjectKind::Polygon => "SelectedPolygons",
                ObjectKind::Text => "SelectedTexts",
                ObjectKind::Element => "SelectedElements",
            },
            TargetSelector::MarkedPoint => "Mark",
            TargetSelector::PasteBufferContents => "Buffer",
            TargetSelector::AllObjects => "All",
            TargetSelector::Unknown(keyword) => keyword,
        }
    }

    /// Every recognised keyword, sorted, for help output.
    pub fn keywords() -> Vec<&'static str> {
        let mut keys: Vec<&'static str> = KEYWORDS.keys().copied().collect();
        keys.sort_unstable();
        keys
    }
}

impl fmt::Display for TargetSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_are_case_insensitive() {
        assert_eq!(TargetSelector::parse("SELECTED"), TargetSelector::AllSelected);
        assert_eq!(TargetSelector::parse(" object "), TargetSelector::ObjectAtCursor);
        assert_eq!(
            TargetSelector::parse("SelectedPins"),
            TargetSelector::SelectedOfKind(ObjectKind::Pad)
        );
    }

    #[test]
    fn unrecognised_keyword_is_unknown() {
        assert_eq!(
            TargetSelector::parse("Everything"),
            TargetSelector::Unknown("Everything".into())
        );
    }

    #[test]
    fn canonical_keyword_parses_back() {
        for keyword in TargetSelector::keywords() {
            let selector = TargetSelector::parse(keyword);
            assert!(!matches!(selector, TargetSelector::Unknown(_)));
            assert_eq!(TargetSelector::parse(selector.keyword()), selector);
        }
    }
}
