/// Formatted text with the boundary-space flags used by message assembly.
///
/// `space_before`/`space_after` record that whitespace surrounded the text
/// in its source (or was requested by a template author). The content
/// itself never starts or ends with such whitespace when built with
/// [`Text::from_source`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Text {
    text: String,
    space_before: bool,
    space_after: bool,
}

impl Text {
    /// Create text with explicit flags. The content is stored as given.
    pub fn new(text: impl Into<String>, space_before: bool, space_after: bool) -> Self {
        Text {
            text: text.into(),
            space_before,
            space_after,
        }
    }

    /// Text with no boundary spaces.
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, false, false)
    }

    /// The empty text without boundary spaces.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create text from source, moving boundary spaces into the flags.
    ///
    /// A source consisting only of spaces yields empty content with both
    /// flags set.
    pub fn from_source(source: &str) -> Self {
        let space_before = source.chars().next().is_some_and(is_space_char);
        let space_after = source.chars().next_back().is_some_and(is_space_char);
        Text {
            text: trim_spaces(source).to_string(),
            space_before,
            space_after,
        }
    }

    /// The text content.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Consume and return the content.
    pub fn into_string(self) -> String {
        self.text
    }

    pub fn space_before(&self) -> bool {
        self.space_before
    }

    pub fn space_after(&self) -> bool {
        self.space_after
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Merge additional space flags with logical OR.
    #[must_use]
    pub fn with_spaces(mut self, space_before: bool, space_after: bool) -> Self {
        self.space_before |= space_before;
        self.space_after |= space_after;
        self
    }
}

/// Whether `c` is a Unicode space separator (Zs) or paragraph separator (Zp).
///
/// Control characters such as tab and newline are not spaces here.
pub fn is_space_char(c: char) -> bool {
    matches!(
        c,
        '\u{0020}'
            | '\u{00A0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
            | '\u{2029}'
    )
}

/// Trim leading and trailing space characters.
pub fn trim_spaces(s: &str) -> &str {
    s.trim_matches(is_space_char)
}

/// Whether `s` is empty after trimming space characters.
pub fn is_trimmed_empty(s: &str) -> bool {
    trim_spaces(s).is_empty()
}
