/// 构造产生式的组成部分数组, 每一项通过 [`From`] 转换为 [`crate::Part`].
///
/// ```
/// # use grammar_kit::{ParserConfigurator, parts};
/// let bump = bumpalo::Bump::new();
/// let config = ParserConfigurator::<i32>::new(&bump);
/// let expr = config.non_terminal("expr");
/// expr.add_production(&config, config.lexer_settings(), parts![expr, "+", expr])
///     .unwrap();
/// ```
#[macro_export]
macro_rules! parts {
    ($($part:expr),* $(,)?) => {
        [$($crate::Part::from($part)),*]
    };
}
