use std::{
    cell::{Cell, RefCell},
    fmt::{Debug, Display},
};

use bumpalo::Bump;

use crate::{PrecedenceGroup, Production};

/// 终结符的语义动作, 把匹配到的文本转换成值.
pub type TerminalAction<'a, T> = &'a dyn Fn(&str) -> T;

/// 符号的调试名称, 保存在 arena 中, 可以在构造之后修改.
pub struct SymbolName<'a> {
    bump: &'a Bump,
    name: Cell<&'a str>,
}

impl<'a> SymbolName<'a> {
    #[must_use]
    pub fn new_in(bump: &'a Bump, name: &str) -> Self {
        Self {
            bump,
            name: Cell::new(bump.alloc_str(name)),
        }
    }

    #[must_use]
    pub fn get(&self) -> &'a str {
        self.name.get()
    }

    pub fn set(&self, name: &str) {
        self.name.set(self.bump.alloc_str(name));
    }
}

pub struct Terminal<'a, T> {
    index: usize,
    name: SymbolName<'a>,
    /// 交给词法分析器构造的正则表达式.
    pattern: &'a str,
    on_parse: Option<TerminalAction<'a, T>>,
    precedence: Cell<Option<&'a PrecedenceGroup>>,
    error: bool,
}

impl<T> Debug for Terminal<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(&format!(r#"t{:?}"#, self.name.get()))
    }
}

impl<T> Display for Terminal<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.name.get())
    }
}

impl<'a, T> Terminal<'a, T> {
    /// 在 arena 中创建终结符, 调试名称默认为 `pattern`.
    ///
    /// `index` 由创建者分配, 用于给终结符确定的编号.
    pub fn new_in(
        bump: &'a Bump,
        index: usize,
        pattern: &str,
        on_parse: Option<TerminalAction<'a, T>>,
    ) -> &'a Self {
        bump.alloc(Self {
            index,
            name: SymbolName::new_in(bump, pattern),
            pattern: bump.alloc_str(pattern),
            on_parse,
            precedence: Cell::new(None),
            error: false,
        })
    }

    /// 错误恢复产生式中使用的保留终结符, 不对应任何输入模式.
    pub(crate) fn error_in(bump: &'a Bump, index: usize) -> &'a Self {
        bump.alloc(Self {
            index,
            name: SymbolName::new_in(bump, "error"),
            pattern: "",
            on_parse: None,
            precedence: Cell::new(None),
            error: true,
        })
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn pattern(&self) -> &'a str {
        self.pattern
    }

    #[must_use]
    pub fn debug_name(&self) -> &'a str {
        self.name.get()
    }

    pub fn set_debug_name(&self, name: &str) {
        self.name.set(name);
    }

    #[must_use]
    pub fn is_error_token(&self) -> bool {
        self.error
    }

    #[must_use]
    pub fn has_action(&self) -> bool {
        self.on_parse.is_some()
    }

    /// 对匹配到的文本执行语义动作, 没有动作时返回 [`None`].
    pub fn on_parse(&self, text: &str) -> Option<T> {
        self.on_parse.map(|action| action(text))
    }

    #[must_use]
    pub fn precedence(&self) -> Option<&'a PrecedenceGroup> {
        self.precedence.get()
    }

    pub(crate) fn set_precedence(&self, group: &'a PrecedenceGroup) {
        self.precedence.set(Some(group));
    }
}

pub struct NonTerminal<'a, T> {
    index: usize,
    name: SymbolName<'a>,
    pub(crate) bump: &'a Bump,
    /// 按添加顺序排列, 顺序决定了产生式的编号.
    pub(crate) productions: RefCell<bumpalo::collections::Vec<'a, &'a Production<'a, T>>>,
}

impl<T> Debug for NonTerminal<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(&format!(r#"nt{:?}"#, self.name.get()))
    }
}

impl<T> Display for NonTerminal<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.name.get())
    }
}

impl<'a, T> NonTerminal<'a, T> {
    pub fn new_in(bump: &'a Bump, index: usize, name: &str) -> &'a Self {
        bump.alloc(Self {
            index,
            name: SymbolName::new_in(bump, name),
            bump,
            productions: RefCell::new(bumpalo::collections::Vec::new_in(bump)),
        })
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn debug_name(&self) -> &'a str {
        self.name.get()
    }

    pub fn set_debug_name(&self, name: &str) {
        self.name.set(name);
    }

    /// 按添加顺序返回自身的所有产生式.
    #[must_use]
    pub fn productions(&self) -> Vec<&'a Production<'a, T>> {
        self.productions.borrow().iter().copied().collect()
    }

    #[must_use]
    pub fn production_count(&self) -> usize {
        self.productions.borrow().len()
    }
}

/// 文法符号, 比较的是符号的身份 (同一次分配), 而不是名称.
pub enum Symbol<'a, T> {
    Terminal(&'a Terminal<'a, T>),
    NonTerminal(&'a NonTerminal<'a, T>),
}

impl<T> Clone for Symbol<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Symbol<'_, T> {}

impl<T> Debug for Symbol<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Terminal(t) => f.pad(&format!("{:?}", t)),
            Self::NonTerminal(nt) => f.pad(&format!("{:?}", nt)),
        }
    }
}

impl<T> Display for Symbol<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.debug_name())
    }
}

impl<T> PartialEq for Symbol<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Terminal(l0), Self::Terminal(r0)) => std::ptr::eq(*l0, *r0),
            (Self::NonTerminal(l0), Self::NonTerminal(r0)) => std::ptr::eq(*l0, *r0),
            _ => false,
        }
    }
}

impl<T> Eq for Symbol<'_, T> {}

impl<'a, T> Symbol<'a, T> {
    #[must_use]
    pub fn debug_name(&self) -> &'a str {
        match self {
            Self::Terminal(t) => t.debug_name(),
            Self::NonTerminal(nt) => nt.debug_name(),
        }
    }

    pub fn set_debug_name(&self, name: &str) {
        match self {
            Self::Terminal(t) => t.set_debug_name(name),
            Self::NonTerminal(nt) => nt.set_debug_name(name),
        }
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminal(_))
    }

    #[must_use]
    pub fn as_terminal(&self) -> Option<&'a Terminal<'a, T>> {
        match *self {
            Self::Terminal(t) => Some(t),
            Self::NonTerminal(_) => None,
        }
    }

    #[must_use]
    pub fn as_non_terminal(&self) -> Option<&'a NonTerminal<'a, T>> {
        match *self {
            Self::Terminal(_) => None,
            Self::NonTerminal(nt) => Some(nt),
        }
    }
}

impl<'a, T> From<&'a Terminal<'a, T>> for Symbol<'a, T> {
    fn from(value: &'a Terminal<'a, T>) -> Self {
        Self::Terminal(value)
    }
}

impl<'a, T> From<&'a NonTerminal<'a, T>> for Symbol<'a, T> {
    fn from(value: &'a NonTerminal<'a, T>) -> Self {
        Self::NonTerminal(value)
    }
}
