use std::{
    borrow::Cow,
    cell::Cell,
    fmt::{Debug, Display},
};

use bumpalo::Bump;
use tracing::debug;

use crate::{
    LexerSettings, NonTerminal, PrecedenceGroup, Symbol, Terminal,
    error::{Error, ParseError},
    escape::escape_literal,
    symbol::TerminalAction,
};

/// 统一的归约动作签名, 普通归约会忽略错误上下文.
pub type ReduceAction<'a, T> = &'a dyn Fn(Option<&ParseError>, &[T]) -> T;

/// 根据正则表达式模式创建终结符, 去重策略由实现者决定.
pub trait TerminalFactory<'a, T> {
    fn create_terminal(
        &self,
        pattern: &str,
        on_parse: Option<TerminalAction<'a, T>>,
    ) -> Result<&'a Terminal<'a, T>, Error>;
}

/// 产生式的组成部分: 字面量文本或者已有符号.
pub enum Part<'a, T> {
    /// 字面量会被提升为终结符, 调试名称保持未转义的原文.
    Literal(Cow<'a, str>),
    Symbol(Symbol<'a, T>),
}

impl<'a, T> From<&'a str> for Part<'a, T> {
    fn from(value: &'a str) -> Self {
        Self::Literal(Cow::Borrowed(value))
    }
}

impl<T> From<String> for Part<'_, T> {
    fn from(value: String) -> Self {
        Self::Literal(Cow::Owned(value))
    }
}

impl<'a, T> From<Symbol<'a, T>> for Part<'a, T> {
    fn from(value: Symbol<'a, T>) -> Self {
        Self::Symbol(value)
    }
}

impl<'a, T> From<&'a Terminal<'a, T>> for Part<'a, T> {
    fn from(value: &'a Terminal<'a, T>) -> Self {
        Self::Symbol(value.into())
    }
}

impl<'a, T> From<&'a NonTerminal<'a, T>> for Part<'a, T> {
    fn from(value: &'a NonTerminal<'a, T>) -> Self {
        Self::Symbol(value.into())
    }
}

/// 把字面量交给终结符工厂, 按照 `settings` 决定是否转义.
pub(crate) fn lift_literal<'a, T, F>(
    factory: &F,
    settings: &LexerSettings,
    text: &str,
) -> Result<&'a Terminal<'a, T>, Error>
where
    F: TerminalFactory<'a, T> + ?Sized,
{
    let pattern = if settings.escape_literals {
        Cow::Owned(escape_literal(text))
    } else {
        Cow::Borrowed(text)
    };
    let terminal = factory.create_terminal(&pattern, None)?;
    terminal.set_debug_name(text);
    Ok(terminal)
}

pub struct Production<'a, T> {
    bump: &'a Bump,
    symbols: &'a [Symbol<'a, T>],
    result: &'a NonTerminal<'a, T>,
    reduce_action: Cell<Option<ReduceAction<'a, T>>>,
    precedence: Cell<Option<&'a PrecedenceGroup>>,
}

impl<T> Debug for Production<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Production")
            .field(&format_args!(
                "{:?} => {}",
                self.result,
                self.symbols
                    .iter()
                    .map(|t| format!("{:?} ", t))
                    .collect::<String>()
                    .trim_end()
            ))
            .finish()
    }
}

impl<T> Display for Production<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(
            format!(
                "{} => {}",
                self.result,
                self.symbols
                    .iter()
                    .map(|t| format!("{} ", t))
                    .collect::<String>()
                    .trim_end()
            )
            .trim_end(),
        )
    }
}

impl<'a, T: 'a> Production<'a, T> {
    fn new_in(
        bump: &'a Bump,
        result: &'a NonTerminal<'a, T>,
        symbols: &[Symbol<'a, T>],
    ) -> &'a Self {
        bump.alloc(Self {
            bump,
            symbols: bump.alloc_slice_copy(symbols),
            result,
            reduce_action: Cell::new(None),
            precedence: Cell::new(None),
        })
    }

    #[must_use]
    pub fn symbols(&self) -> &'a [Symbol<'a, T>] {
        self.symbols
    }

    #[must_use]
    pub fn result_symbol(&self) -> &'a NonTerminal<'a, T> {
        self.result
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    #[must_use]
    pub fn reduce_action(&self) -> Option<ReduceAction<'a, T>> {
        self.reduce_action.get()
    }

    /// 通过统一签名调用归约动作, `values` 与 [`Production::symbols`] 一一对应.
    pub fn reduce(&self, error: Option<&ParseError>, values: &[T]) -> Option<T> {
        self.reduce_action.get().map(|action| action(error, values))
    }

    /// 设置普通归约动作, 统一签名中的错误上下文会被忽略.
    pub fn set_reduce_function<F>(&self, action: F)
    where
        F: Fn(&[T]) -> T + 'a,
    {
        let action: ReduceAction<'a, T> = self
            .bump
            .alloc(move |_: Option<&ParseError>, values: &[T]| action(values));
        self.reduce_action.set(Some(action));
    }

    /// 设置错误恢复归约动作, 额外接收语法错误的上下文.
    pub fn set_error_function<F>(&self, handler: F)
    where
        F: Fn(Option<&ParseError>, &[T]) -> T + 'a,
    {
        let handler: ReduceAction<'a, T> = self.bump.alloc(handler);
        self.reduce_action.set(Some(handler));
    }

    #[must_use]
    pub fn precedence(&self) -> Option<&'a PrecedenceGroup> {
        self.precedence.get()
    }

    /// 显式指定优先级, 覆盖建表时根据最右终结符推断的优先级.
    pub fn set_precedence(&self, group: &'a PrecedenceGroup) {
        self.precedence.set(Some(group));
    }
}

impl<'a, T: 'a> NonTerminal<'a, T> {
    /// 添加一个以自身为头部的产生式, 返回新产生式用于后续设置归约动作和优先级.
    ///
    /// 字面量经过 `factory` 提升为终结符, `settings.escape_literals` 为真时先转义,
    /// 终结符的调试名称设置为未转义的原文.
    /// # Errors
    /// 见: [`TerminalFactory::create_terminal`]. 出错时产生式列表不变.
    pub fn add_production<F, I>(
        &'a self,
        factory: &F,
        settings: &LexerSettings,
        parts: I,
    ) -> Result<&'a Production<'a, T>, Error>
    where
        F: TerminalFactory<'a, T> + ?Sized,
        I: IntoIterator<Item = Part<'a, T>>,
    {
        let symbols = parts
            .into_iter()
            .map(|part| match part {
                Part::Literal(text) => lift_literal(factory, settings, &text).map(Symbol::from),
                Part::Symbol(symbol) => Ok(symbol),
            })
            .collect::<Result<Vec<_>, _>>()?;
        let prod = Production::new_in(self.bump, self, &symbols);
        self.productions.borrow_mut().push(prod);
        debug!("production added: {prod}");
        Ok(prod)
    }
}
