/// AST (Abstract Syntax Tree) module
/// Contains the untyped tree produced by the parser
///
/// Submodules:
/// - ast: Query, version, network and declaration nodes
/// - expressions: Arithmetic and boolean expression nodes
pub mod ast;
pub mod expressions;
