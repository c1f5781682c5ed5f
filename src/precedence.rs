use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Associativity {
    Left,
    Right,
    NonAssociative,
}

impl Display for Associativity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::NonAssociative => "nonassoc",
        })
    }
}

/// 优先级组, 用于在建表时解决移入/归约冲突.
///
/// `precedence` 越大, 结合越紧.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PrecedenceGroup {
    associativity: Associativity,
    precedence: usize,
}

impl Display for PrecedenceGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(&format!("{}({})", self.associativity, self.precedence))
    }
}

impl PrecedenceGroup {
    #[must_use]
    pub fn new(associativity: Associativity, precedence: usize) -> Self {
        Self {
            associativity,
            precedence,
        }
    }

    #[must_use]
    pub fn associativity(&self) -> Associativity {
        self.associativity
    }

    #[must_use]
    pub fn precedence(&self) -> usize {
        self.precedence
    }
}
