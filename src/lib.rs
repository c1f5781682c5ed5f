pub mod alphabet;
pub mod char_range;
pub mod char_set;
pub mod configurator;
pub mod error;
pub(crate) mod escape;
pub mod grammar;
pub(crate) mod macros;
pub mod precedence;
pub mod symbol;

pub use alphabet::Alphabet;
pub use char_range::CharRange;
pub use char_set::CharSet;
pub use configurator::{LexerSettings, ParserConfigurator};
pub use error::{Error, ParseError};
pub use escape::escape_literal;
pub use grammar::{Part, Production, ReduceAction, TerminalFactory};
pub use precedence::{Associativity, PrecedenceGroup};
pub use symbol::{NonTerminal, Symbol, Terminal};
