use std::fmt::{Debug, Display};

/// 闭区间字符范围, 始终满足 `from <= to`.
#[derive(PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct CharRange {
    from: char,
    to: char,
}

impl Debug for CharRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(&format!("CharRange({self})"))
    }
}

impl Display for CharRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.from == self.to {
            f.pad(&self.from.escape_debug().to_string())
        } else {
            f.pad(&format!(
                "{}-{}",
                self.from.escape_debug(),
                self.to.escape_debug()
            ))
        }
    }
}

impl From<char> for CharRange {
    fn from(c: char) -> Self {
        Self::single(c)
    }
}

impl From<(char, char)> for CharRange {
    fn from((a, b): (char, char)) -> Self {
        Self::new(a, b)
    }
}

impl CharRange {
    /// 两端顺序任意, 反序时会被交换.
    #[must_use]
    pub fn new(a: char, b: char) -> Self {
        if a > b {
            Self { from: b, to: a }
        } else {
            Self { from: a, to: b }
        }
    }

    #[must_use]
    pub fn single(c: char) -> Self {
        Self { from: c, to: c }
    }

    #[must_use]
    pub fn from(&self) -> char {
        self.from
    }

    #[must_use]
    pub fn to(&self) -> char {
        self.to
    }

    #[must_use]
    pub fn contains(&self, c: char) -> bool {
        self.from <= c && c <= self.to
    }

    #[must_use]
    pub fn is_disjoint(&self, other: &CharRange) -> bool {
        self.to < other.from || other.to < self.from
    }

    #[must_use]
    pub(crate) fn with_from(self, from: char) -> Self {
        Self::new(from, self.to)
    }

    #[must_use]
    pub(crate) fn with_to(self, to: char) -> Self {
        Self::new(self.from, to)
    }
}

/// 前一个合法的 [`char`], 跳过代理区 `D800..=DFFF`.
pub(crate) fn char_before(c: char) -> Option<char> {
    match c {
        '\0' => None,
        '\u{E000}' => Some('\u{D7FF}'),
        c => char::from_u32(c as u32 - 1),
    }
}

/// 后一个合法的 [`char`], 跳过代理区 `D800..=DFFF`.
pub(crate) fn char_after(c: char) -> Option<char> {
    match c {
        char::MAX => None,
        '\u{D7FF}' => Some('\u{E000}'),
        c => char::from_u32(c as u32 + 1),
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::{CharRange, char_after, char_before};

    #[test]
    fn normalized() {
        assert_eq!(CharRange::new('z', 'a'), CharRange::new('a', 'z'));
        assert_eq!(CharRange::new('z', 'a').from(), 'a');
        let q: CharRange = ('q', 'q').into();
        assert_eq!(q, CharRange::single('q'));
    }

    #[test]
    fn display() {
        assert_eq!(CharRange::new('a', 'f').to_string(), "a-f");
        assert_eq!(CharRange::single('x').to_string(), "x");
        assert_eq!(CharRange::new('\t', '\n').to_string(), "\\t-\\n");
    }

    #[test]
    fn stepping() {
        assert_eq!(char_before('\0'), None);
        assert_eq!(char_before('b'), Some('a'));
        assert_eq!(char_before('\u{E000}'), Some('\u{D7FF}'));
        assert_eq!(char_after('\u{D7FF}'), Some('\u{E000}'));
        assert_eq!(char_after(char::MAX), None);
        assert_eq!(char_after('a'), Some('b'));
    }

    #[test]
    fn disjoint() {
        let ae = CharRange::new('a', 'e');
        assert!(ae.is_disjoint(&CharRange::new('f', 'z')));
        assert!(!ae.is_disjoint(&CharRange::new('e', 'z')));
        assert!(ae.contains('c'));
        assert!(!ae.contains('f'));
    }
}
