use std::{
    cell::{Cell, RefCell},
    fmt::Display,
};

use bumpalo::Bump;
use tracing::{debug, trace};

use crate::{
    NonTerminal, Production, Symbol, Terminal,
    error::Error,
    grammar::{Part, TerminalFactory, lift_literal},
    precedence::{Associativity, PrecedenceGroup},
    symbol::TerminalAction,
};

/// 词法相关的配置, 显式传给构造产生式的操作.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexerSettings {
    /// 为真时, 产生式中的字面量在交给终结符工厂之前会被转义.
    pub escape_literals: bool,
}

impl Default for LexerSettings {
    fn default() -> Self {
        Self {
            escape_literals: true,
        }
    }
}

/// 文法的构造入口, 持有所有符号并作为默认的终结符工厂.
///
/// 终结符按模式去重, 终结符和非终结符按创建顺序编号.
pub struct ParserConfigurator<'a, T> {
    bump: &'a Bump,
    settings: LexerSettings,
    terminals: RefCell<Vec<&'a Terminal<'a, T>>>,
    non_terminals: RefCell<Vec<&'a NonTerminal<'a, T>>>,
    precedence_groups: RefCell<Vec<&'a PrecedenceGroup>>,
    error_token: Cell<Option<&'a Terminal<'a, T>>>,
    start: Cell<Option<&'a NonTerminal<'a, T>>>,
}

impl<T> Display for ParserConfigurator<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s: String = self
            .productions()
            .iter()
            .enumerate()
            .map(|(i, prod)| format!("{i:>4} {prod}\n"))
            .collect();
        f.pad(s.trim_end())
    }
}

impl<'a, T> TerminalFactory<'a, T> for ParserConfigurator<'a, T> {
    /// 模式已经存在时返回已有的终结符.
    /// # Errors
    /// - [`Error::TerminalRedefined`] 模式已经存在, 又给出了新的语义动作.
    fn create_terminal(
        &self,
        pattern: &str,
        on_parse: Option<TerminalAction<'a, T>>,
    ) -> Result<&'a Terminal<'a, T>, Error> {
        if let Some(terminal) = self.find_terminal(pattern) {
            if on_parse.is_some() {
                Err(Error::TerminalRedefined(pattern.to_string()))?
            }
            trace!("terminal {pattern:?} reused");
            return Ok(terminal);
        }
        Ok(self.push_terminal(pattern, on_parse))
    }
}

impl<'a, T> ParserConfigurator<'a, T> {
    #[must_use]
    pub fn new(bump: &'a Bump) -> Self {
        Self::with_settings(bump, LexerSettings::default())
    }

    #[must_use]
    pub fn with_settings(bump: &'a Bump, settings: LexerSettings) -> Self {
        Self {
            bump,
            settings,
            terminals: RefCell::new(Vec::new()),
            non_terminals: RefCell::new(Vec::new()),
            precedence_groups: RefCell::new(Vec::new()),
            error_token: Cell::new(None),
            start: Cell::new(None),
        }
    }

    #[must_use]
    pub fn lexer_settings(&self) -> &LexerSettings {
        &self.settings
    }

    fn find_terminal(&self, pattern: &str) -> Option<&'a Terminal<'a, T>> {
        self.terminals
            .borrow()
            .iter()
            .find(|t| !t.is_error_token() && t.pattern() == pattern)
            .copied()
    }

    fn push_terminal(
        &self,
        pattern: &str,
        on_parse: Option<TerminalAction<'a, T>>,
    ) -> &'a Terminal<'a, T> {
        let mut terminals = self.terminals.borrow_mut();
        let terminal = Terminal::new_in(self.bump, terminals.len(), pattern, on_parse);
        terminals.push(terminal);
        debug!("terminal {} created: {pattern:?}", terminal.index());
        terminal
    }

    /// 获取或者创建一个没有语义动作的终结符.
    pub fn terminal(&self, pattern: &str) -> &'a Terminal<'a, T> {
        match self.find_terminal(pattern) {
            Some(terminal) => terminal,
            None => self.push_terminal(pattern, None),
        }
    }

    /// 创建一个带语义动作的终结符.
    /// # Errors
    /// - [`Error::TerminalRedefined`] 模式已经存在.
    pub fn terminal_with_action<F>(
        &self,
        pattern: &str,
        action: F,
    ) -> Result<&'a Terminal<'a, T>, Error>
    where
        F: Fn(&str) -> T + 'a,
    {
        let action: TerminalAction<'a, T> = self.bump.alloc(action);
        self.create_terminal(pattern, Some(action))
    }

    /// 错误恢复产生式使用的保留终结符, 每个文法只有一个.
    pub fn error_token(&self) -> &'a Terminal<'a, T> {
        if let Some(error) = self.error_token.get() {
            return error;
        }
        let mut terminals = self.terminals.borrow_mut();
        let error = Terminal::error_in(self.bump, terminals.len());
        terminals.push(error);
        self.error_token.set(Some(error));
        error
    }

    /// 创建一个非终结符, 调试名称为 `NT{编号}`.
    pub fn create_non_terminal(&self) -> &'a NonTerminal<'a, T> {
        let index = self.non_terminals.borrow().len();
        self.non_terminal(&format!("NT{index}"))
    }

    pub fn non_terminal(&self, name: &str) -> &'a NonTerminal<'a, T> {
        let mut non_terminals = self.non_terminals.borrow_mut();
        let nt = NonTerminal::new_in(self.bump, non_terminals.len(), name);
        non_terminals.push(nt);
        nt
    }

    pub fn set_start_symbol(&self, start: &'a NonTerminal<'a, T>) {
        self.start.set(Some(start));
    }

    #[must_use]
    pub fn start_symbol(&self) -> Option<&'a NonTerminal<'a, T>> {
        self.start.get()
    }

    #[must_use]
    pub fn terminals(&self) -> Vec<&'a Terminal<'a, T>> {
        self.terminals.borrow().clone()
    }

    #[must_use]
    pub fn non_terminals(&self) -> Vec<&'a NonTerminal<'a, T>> {
        self.non_terminals.borrow().clone()
    }

    #[must_use]
    pub fn precedence_groups(&self) -> Vec<&'a PrecedenceGroup> {
        self.precedence_groups.borrow().clone()
    }

    /// 所有产生式, 先按非终结符的创建顺序, 再按添加顺序排列, 下标即产生式编号.
    #[must_use]
    pub fn productions(&self) -> Vec<&'a Production<'a, T>> {
        self.non_terminals
            .borrow()
            .iter()
            .flat_map(|nt| nt.productions())
            .collect()
    }

    pub fn left_associative<I>(&self, parts: I) -> Result<&'a PrecedenceGroup, Error>
    where
        I: IntoIterator<Item = Part<'a, T>>,
    {
        self.assign_precedence(Associativity::Left, parts)
    }

    pub fn right_associative<I>(&self, parts: I) -> Result<&'a PrecedenceGroup, Error>
    where
        I: IntoIterator<Item = Part<'a, T>>,
    {
        self.assign_precedence(Associativity::Right, parts)
    }

    pub fn non_associative<I>(&self, parts: I) -> Result<&'a PrecedenceGroup, Error>
    where
        I: IntoIterator<Item = Part<'a, T>>,
    {
        self.assign_precedence(Associativity::NonAssociative, parts)
    }

    /// 创建新的优先级组, 并标记给出的终结符. 越晚声明的组优先级越高.
    /// # Errors
    /// - [`Error::InvalidGrammarPart`] 给出了非终结符, 此时不会创建优先级组, 也不会创建终结符.
    /// - 其他见: [`TerminalFactory::create_terminal`].
    fn assign_precedence<I>(
        &self,
        associativity: Associativity,
        parts: I,
    ) -> Result<&'a PrecedenceGroup, Error>
    where
        I: IntoIterator<Item = Part<'a, T>>,
    {
        // 先检查全部部分, 再提升字面量.
        let parts = parts
            .into_iter()
            .enumerate()
            .map(|(i, part)| match part {
                Part::Symbol(Symbol::NonTerminal(_)) => Err(Error::invalid_grammar_part(
                    i,
                    "precedence applies to terminals only",
                )),
                Part::Symbol(Symbol::Terminal(t)) => Ok(Ok(t)),
                Part::Literal(text) => Ok(Err(text)),
            })
            .collect::<Result<Vec<_>, _>>()?;
        let terminals = parts
            .into_iter()
            .map(|part| part.or_else(|text| lift_literal(self, &self.settings, &text)))
            .collect::<Result<Vec<_>, _>>()?;

        let mut groups = self.precedence_groups.borrow_mut();
        let group = &*self
            .bump
            .alloc(PrecedenceGroup::new(associativity, groups.len()));
        groups.push(group);
        for t in terminals {
            t.set_precedence(group);
        }
        debug!("precedence group {group} assigned");
        Ok(group)
    }
}

#[cfg(test)]
mod test {
    use bumpalo::Bump;
    use pretty_assertions::assert_eq;

    use super::{LexerSettings, ParserConfigurator};
    use crate::{
        PrecedenceGroup, error::Error, grammar::TerminalFactory, parts,
        precedence::Associativity,
    };

    #[test]
    fn terminals_deduplicated_by_pattern() {
        let bump = Bump::new();
        let config = ParserConfigurator::<i32>::new(&bump);
        let a = config.terminal("[a-z]+");
        let b = config.terminal("[a-z]+");
        assert!(std::ptr::eq(a, b));
        let c = config.create_terminal("[0-9]+", None).unwrap();
        assert_eq!(c.index(), 1);
        assert_eq!(config.terminals().len(), 2);
    }

    #[test]
    fn literal_reuses_terminal() {
        let bump = Bump::new();
        let config = ParserConfigurator::<i32>::new(&bump);
        let plus = config.terminal(r"\+");
        let expr = config.non_terminal("expr");
        let p = expr
            .add_production(&config, config.lexer_settings(), parts![expr, "+", expr])
            .unwrap();
        assert!(std::ptr::eq(p.symbols()[1].as_terminal().unwrap(), plus));
        // 调试名称变为字面量原文.
        assert_eq!(plus.debug_name(), "+");
        assert_eq!(config.terminals().len(), 1);
    }

    #[test]
    fn terminal_redefinition() {
        let bump = Bump::new();
        let config = ParserConfigurator::<i32>::new(&bump);
        let num = config
            .terminal_with_action("[0-9]+", |s| s.parse().unwrap_or_default())
            .unwrap();
        assert_eq!(num.on_parse("17"), Some(17));
        assert_eq!(
            config.terminal_with_action("[0-9]+", |_| 0).err(),
            Some(Error::TerminalRedefined("[0-9]+".to_string()))
        );
        // 不带动作时复用.
        assert!(std::ptr::eq(config.terminal("[0-9]+"), num));
    }

    #[test]
    fn error_token_is_unique() {
        let bump = Bump::new();
        let config = ParserConfigurator::<i32>::new(&bump);
        let error = config.error_token();
        assert!(error.is_error_token());
        assert!(std::ptr::eq(error, config.error_token()));
        assert_eq!(error.debug_name(), "error");
        let empty = config.terminal("");
        assert!(!std::ptr::eq(error, empty));
        assert_eq!(config.terminals().len(), 2);
    }

    #[test]
    fn non_terminal_names() {
        let bump = Bump::new();
        let config = ParserConfigurator::<i32>::new(&bump);
        let a = config.create_non_terminal();
        let b = config.non_terminal("stmt");
        let c = config.create_non_terminal();
        assert_eq!(a.debug_name(), "NT0");
        assert_eq!(b.index(), 1);
        assert_eq!(c.debug_name(), "NT2");
        a.set_debug_name("program");
        assert_eq!(a.debug_name(), "program");
    }

    #[test]
    fn precedence_groups() {
        let bump = Bump::new();
        let config = ParserConfigurator::<i32>::new(&bump);
        let plus = config.left_associative(parts!["+", "-"]).unwrap();
        let mul = config.left_associative(parts!["*", "/"]).unwrap();
        let pow = config.right_associative(parts!["^"]).unwrap();
        assert_eq!(plus, &PrecedenceGroup::new(Associativity::Left, 0));
        assert_eq!(mul, &PrecedenceGroup::new(Associativity::Left, 1));
        assert_eq!(pow, &PrecedenceGroup::new(Associativity::Right, 2));

        let star = config.terminal(r"\*");
        assert_eq!(star.precedence(), Some(mul));
        assert_eq!(star.debug_name(), "*");
        assert_eq!(config.terminal(r"\^").precedence(), Some(pow));
        assert_eq!(config.precedence_groups().len(), 3);
        assert_eq!(pow.to_string(), "right(2)");
    }

    #[test]
    fn precedence_rejects_non_terminals() {
        let bump = Bump::new();
        let config = ParserConfigurator::<i32>::new(&bump);
        let expr = config.non_terminal("expr");
        let result = config.non_associative(parts!["<", expr]);
        assert_eq!(
            result.err(),
            Some(Error::InvalidGrammarPart {
                index: 1,
                reason: "precedence applies to terminals only".to_string()
            })
        );
        assert!(config.precedence_groups().is_empty());
        assert!(config.terminals().is_empty());
    }

    #[test]
    fn precedence_mixes_literals_and_terminals() {
        let bump = Bump::new();
        let config = ParserConfigurator::<i32>::new(&bump);
        let eq = config.terminal("==");
        let group = config.non_associative(parts!["<", eq]).unwrap();
        assert_eq!(group.precedence(), 0);
        assert_eq!(eq.precedence(), Some(group));
        assert_eq!(config.terminal("<").precedence(), Some(group));
        assert_eq!(config.terminals().len(), 2);
    }

    #[test]
    fn unescaped_literals() {
        let bump = Bump::new();
        let config = ParserConfigurator::<i32>::with_settings(
            &bump,
            LexerSettings {
                escape_literals: false,
            },
        );
        let ident = config.non_terminal("ident");
        let p = ident
            .add_production(&config, config.lexer_settings(), parts!["[a-z]+"])
            .unwrap();
        assert_eq!(p.symbols()[0].as_terminal().unwrap().pattern(), "[a-z]+");
    }

    #[test]
    fn grammar_dump() {
        let bump = Bump::new();
        let config = ParserConfigurator::<i32>::new(&bump);
        let expr = config.non_terminal("expr");
        let term = config.non_terminal("term");
        config.set_start_symbol(expr);
        let settings = config.lexer_settings();
        term.add_production(&config, settings, parts!["(", expr, ")"])
            .unwrap();
        expr.add_production(&config, settings, parts![expr, "+", term])
            .unwrap();
        expr.add_production(&config, settings, parts![term])
            .unwrap();
        term.add_production(&config, settings, parts![config.terminal("[0-9]+")])
            .unwrap();

        assert!(std::ptr::eq(config.start_symbol().unwrap(), expr));
        assert_eq!(
            config.to_string(),
            [
                "   0 expr => expr + term",
                "   1 expr => term",
                "   2 term => ( expr )",
                "   3 term => [0-9]+",
            ]
            .join("\n")
        );
    }
}
