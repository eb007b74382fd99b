pub(crate) mod ast;
pub(crate) mod bind;
pub(crate) mod bytecode;
pub(crate) mod compile;
pub(crate) mod lexer;
pub(crate) mod lower;
pub(crate) mod parser;
pub(crate) mod slot;
pub(crate) mod vm;
