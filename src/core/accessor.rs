//! Value-or-function properties.
//!
//! Visual properties such as position, fill or tooltip text may be given as a
//! constant or as a function of an evaluation context (usually a datum).
//! [`Accessor`] stores either form and resolves both to one callable shape, so
//! drawing code never branches on which one it was handed.
//!
//! Accessors are evaluated per draw pass. Nothing here caches results, since
//! data and scales may change between frames.

use std::fmt;
use std::rc::Rc;

/// Shared evaluation function produced by [`Accessor::resolve`].
pub type AccessorFn<C, T> = Rc<dyn Fn(&C) -> T>;

pub enum Accessor<C: ?Sized, T> {
    Constant(T),
    Function(AccessorFn<C, T>),
}

impl<C: ?Sized, T> Accessor<C, T> {
    #[must_use]
    pub fn constant(value: T) -> Self {
        Self::Constant(value)
    }

    #[must_use]
    pub fn function(f: impl Fn(&C) -> T + 'static) -> Self {
        Self::Function(Rc::new(f))
    }

    #[must_use]
    pub fn is_constant(&self) -> bool {
        matches!(self, Self::Constant(_))
    }
}

impl<C: ?Sized + 'static, T: Clone + 'static> Accessor<C, T> {
    /// Turns the accessor into an evaluation function.
    ///
    /// A function accessor is returned as the same `Rc`; a constant becomes a
    /// function that ignores its argument.
    #[must_use]
    pub fn resolve(self) -> AccessorFn<C, T> {
        match self {
            Self::Function(f) => f,
            Self::Constant(value) => Rc::new(move |_: &C| value.clone()),
        }
    }

    #[must_use]
    pub fn evaluate(&self, context: &C) -> T {
        match self {
            Self::Constant(value) => value.clone(),
            Self::Function(f) => f(context),
        }
    }
}

impl<C: ?Sized, T> From<T> for Accessor<C, T> {
    fn from(value: T) -> Self {
        Self::Constant(value)
    }
}

impl<C: ?Sized, T: Clone> Clone for Accessor<C, T> {
    fn clone(&self) -> Self {
        match self {
            Self::Constant(value) => Self::Constant(value.clone()),
            Self::Function(f) => Self::Function(Rc::clone(f)),
        }
    }
}

impl<C: ?Sized, T: fmt::Debug> fmt::Debug for Accessor<C, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
            Self::Function(_) => f.write_str("Function(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluate_matches_resolve() {
        let accessor: Accessor<i32, i32> = Accessor::function(|v| v * 2);
        assert_eq!(accessor.evaluate(&4), 8);
        assert_eq!(accessor.resolve()(&4), 8);
    }

    #[test]
    fn debug_hides_closure() {
        let constant: Accessor<(), &str> = "up".into();
        let function: Accessor<(), &str> = Accessor::function(|_| "down");
        assert_eq!(format!("{constant:?}"), "Constant(\"up\")");
        assert_eq!(format!("{function:?}"), "Function(..)");
    }
}
