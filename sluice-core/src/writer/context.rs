use crate::{Query, Value};
use std::ops::{Deref, DerefMut};

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fragment {
    #[default]
    None,
    SqlDeleteFrom,
    SqlDeleteFromWhere,
    SqlInsertInto,
    SqlInsertIntoOnConflict,
    SqlInsertIntoReturning,
    SqlInsertIntoValues,
    SqlSelect,
    SqlSelectFrom,
    SqlSelectLimit,
    SqlSelectOrderBy,
    SqlSelectWhere,
    SqlUpdate,
    SqlUpdateSet,
    SqlUpdateWhere,
}

/// Mutable state threaded through a single statement rendering.
///
/// `counter` is the number of placeholders written so far, `args` the values bound to them in
/// the same order.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Context {
    pub counter: u32,
    pub fragment: Fragment,
    pub args: Vec<Value>,
}

impl Context {
    pub fn new(fragment: Fragment) -> Self {
        Self {
            counter: 0,
            fragment,
            args: Vec::new(),
        }
    }

    /// Records a bound value, returns its 1 based position.
    pub fn bind(&mut self, value: Value) -> u32 {
        self.counter += 1;
        self.args.push(value);
        self.counter
    }

    /// Enters `fragment` until the returned guard is dropped.
    pub fn switch_fragment<'s>(&'s mut self, fragment: Fragment) -> ContextUpdater<'s> {
        let previous = self.fragment;
        self.fragment = fragment;
        ContextUpdater {
            previous,
            current: self,
        }
    }

    pub fn into_query(self, sql: String) -> Query {
        Query {
            sql,
            args: self.args,
        }
    }
}

pub struct ContextUpdater<'a> {
    pub previous: Fragment,
    pub current: &'a mut Context,
}

impl Deref for ContextUpdater<'_> {
    type Target = Context;
    fn deref(&self) -> &Self::Target {
        &*self.current
    }
}

impl DerefMut for ContextUpdater<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.current
    }
}

impl Drop for ContextUpdater<'_> {
    fn drop(&mut self) {
        self.current.fragment = self.previous;
    }
}
