pub use parser::{Operator, ParseError, RPNExpr, ShuntingParser, scan_operator};
pub use token::{BinOp, Func, Slot, Token};

mod parser;
mod token;

pub use self::rpneval::Cell;
pub use self::rpnprint::Infix;

mod rpneval;
mod rpnprint;

pub use function::Function;
pub use findroot::{Point, RootError, RootFinder, find_intersections, newton_raphson};
pub use implicit::ImplicitCurve;
pub use integrate::integrate;

mod findroot;
#[cfg(test)]
mod findroot_test;
mod function;
mod implicit;
mod integrate;
